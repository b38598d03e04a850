use std::path::PathBuf;

use chrono::Utc;

use crate::{
    config,
    error::MigrationError,
    spotify,
    types::{Service, Token},
    warning,
};

/// Seconds before expiry at which a token is already treated as expired.
const EXPIRY_MARGIN_SECS: u64 = 240;

/// Access token of one service, cached in the local data directory.
///
/// Each catalog client owns its manager for the duration of a run, so tokens
/// are never shared through global state.
pub struct TokenManager {
    service: Service,
    token: Token,
}

impl TokenManager {
    pub fn new(service: Service, token: Token) -> Self {
        TokenManager { service, token }
    }

    pub async fn load(service: Service) -> Result<Self, MigrationError> {
        let path = Self::token_path(service);
        let content = async_fs::read_to_string(&path).await.map_err(|e| {
            MigrationError::Io(format!(
                "no {} token at {} ({}), run deezify auth {}",
                service,
                path.display(),
                e,
                service
            ))
        })?;
        let token: Token = serde_json::from_str(&content)?;
        Ok(Self { service, token })
    }

    pub async fn persist(&self) -> Result<(), MigrationError> {
        let path = Self::token_path(self.service);
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(&self.token)?;
        async_fs::write(path, json).await?;
        Ok(())
    }

    /// Returns a usable access token, refreshing it first when it expired.
    ///
    /// Only Spotify issues refresh tokens. An expired Deezer token requires a
    /// new `deezify auth deezer`.
    pub async fn get_valid_token(&mut self) -> Result<String, MigrationError> {
        if self.is_expired() {
            match self.service {
                Service::Spotify if !self.token.refresh_token.is_empty() => {
                    let refreshed = spotify::auth::refresh_token(&self.token.refresh_token).await?;
                    self.apply_refresh(refreshed);
                    if let Err(e) = self.persist().await {
                        warning!(
                            "Refreshed {} token could not be cached, the next run may need deezify auth {}: {}",
                            self.service,
                            self.service,
                            e
                        );
                    }
                }
                service => {
                    return Err(MigrationError::Configuration(format!(
                        "{} token expired, run deezify auth {}",
                        service, service
                    )));
                }
            }
        }

        Ok(self.token.access_token.clone())
    }

    /// Replaces the token with a refreshed one. Spotify only sometimes
    /// rotates the refresh token, so the old one is kept when none came back.
    fn apply_refresh(&mut self, mut refreshed: Token) {
        if refreshed.refresh_token.is_empty() {
            refreshed.refresh_token = std::mem::take(&mut self.token.refresh_token);
        }
        self.token = refreshed;
    }

    /// Tokens with `expires_in == 0` never expire (Deezer `offline_access`).
    pub fn is_expired(&self) -> bool {
        if self.token.expires_in == 0 {
            return false;
        }
        let now = Utc::now().timestamp() as u64;
        now >= (self.token.obtained_at + self.token.expires_in).saturating_sub(EXPIRY_MARGIN_SECS)
    }

    fn token_path(service: Service) -> PathBuf {
        let mut path = config::data_dir();
        path.push(format!("cache/{}-token.json", service));
        path
    }
}
