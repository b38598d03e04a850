use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;

use crate::{
    config,
    error::MigrationError,
    management::TokenManager,
    migration::SourceCatalog,
    types::{DeezerPage, DeezerPlaylist, DeezerTrack, PlaylistSummary, SourceTrack},
    utils,
};

/// Deezer API client owning the session of one authenticated user.
pub struct DeezerClient {
    http: Client,
    api_url: String,
    session: Mutex<TokenManager>,
}

impl DeezerClient {
    pub fn new(session: TokenManager) -> Result<Self, MigrationError> {
        Ok(Self {
            http: crate::utils::http_client()?,
            api_url: config::deezer_apiurl(),
            session: Mutex::new(session),
        })
    }

    /// Collects `data` of every page, following `next` links until Deezer
    /// stops returning one.
    async fn fetch_all<T>(&self, path: &str) -> Result<Vec<T>, MigrationError>
    where
        T: DeserializeOwned + Send,
    {
        let token = self.session.lock().await.get_valid_token().await?;
        let mut items = Vec::new();
        let mut url = format!("{}{}", self.api_url, path);
        let mut first = true;

        loop {
            let mut request = self.http.get(&url);
            if first {
                request = request.query(&[("access_token", token.as_str())]);
            }

            let response = request.send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(MigrationError::upstream(
                    "deezer",
                    Some(status.as_u16()),
                    status.canonical_reason().unwrap_or("request failed"),
                ));
            }

            let page: DeezerPage<T> = utils::decode_response("deezer", response).await?;
            if let Some(error) = page.error {
                return Err(MigrationError::upstream(
                    "deezer",
                    error.code.map(|c| c as u16),
                    format!("{}: {}", error.kind, error.message),
                ));
            }

            items.extend(page.data);

            match page.next {
                // `next` links already carry the access token
                Some(next) if next != url => {
                    url = next;
                    first = false;
                }
                _ => return Ok(items),
            }
        }
    }
}

#[async_trait]
impl SourceCatalog for DeezerClient {
    async fn list_playlists(&self) -> Result<Vec<PlaylistSummary>, MigrationError> {
        let playlists: Vec<DeezerPlaylist> = self.fetch_all("/user/me/playlists").await?;
        Ok(playlists.into_iter().map(Into::into).collect())
    }

    async fn playlist_tracks(&self, playlist_id: &str) -> Result<Vec<SourceTrack>, MigrationError> {
        let tracks: Vec<DeezerTrack> = self
            .fetch_all(&format!("/playlist/{}/tracks", playlist_id))
            .await?;
        Ok(tracks.into_iter().map(Into::into).collect())
    }
}
