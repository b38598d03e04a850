use reqwest::{Client, RequestBuilder, Response};
use tokio::sync::Mutex;

use crate::{
    config,
    error::MigrationError,
    management::TokenManager,
    types::{CurrentUserResponse, SpotifyErrorResponse},
    utils::decode_response,
};

/// Spotify Web API client owning the session of one authenticated user.
pub struct SpotifyClient {
    http: Client,
    api_url: String,
    session: Mutex<TokenManager>,
    user_id: Mutex<Option<String>>,
}

impl SpotifyClient {
    pub fn new(session: TokenManager) -> Result<Self, MigrationError> {
        // both are needed to refresh the token mid-run
        config::spotify_client_id()?;
        config::spotify_redirect_uri()?;

        Ok(Self {
            http: crate::utils::http_client()?,
            api_url: config::spotify_apiurl(),
            session: Mutex::new(session),
            user_id: Mutex::new(None),
        })
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    /// Attaches a valid bearer token to `builder`.
    pub(crate) async fn authorized(
        &self,
        builder: impl FnOnce(&Client) -> RequestBuilder,
    ) -> Result<RequestBuilder, MigrationError> {
        let token = self.session.lock().await.get_valid_token().await?;
        Ok(builder(&self.http).bearer_auth(token))
    }

    /// Id of the user owning the token, fetched once from `GET /me`.
    pub async fn current_user_id(&self) -> Result<String, MigrationError> {
        let mut cached = self.user_id.lock().await;
        if let Some(id) = cached.as_ref() {
            return Ok(id.clone());
        }

        let url = self.url("/me");
        let response = self.authorized(|http| http.get(&url)).await?.send().await?;
        let user: CurrentUserResponse = decode_response("spotify", check(response).await?).await?;

        *cached = Some(user.id.clone());
        Ok(user.id)
    }
}

/// Turns a non-success response into [`MigrationError::Upstream`], using the
/// message of Spotify's `{"error": {...}}` body when there is one.
pub(crate) async fn check(response: Response) -> Result<Response, MigrationError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = match response.json::<SpotifyErrorResponse>().await {
        Ok(body) => body.error.message,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
    };

    Err(MigrationError::upstream(
        "spotify",
        Some(status.as_u16()),
        message,
    ))
}
