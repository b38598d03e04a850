use std::{sync::Arc, time::Duration};

use chrono::Utc;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::{
    config,
    error::MigrationError,
    server::start_api_server,
    success,
    types::{AuthState, PkceToken, Token},
    utils, warning,
};

/// Runs the OAuth 2.0 authorization-code flow with PKCE against Spotify.
///
/// 1. Generates a PKCE code verifier and its SHA256 challenge
/// 2. Starts the local callback server
/// 3. Opens the authorization URL in the user's browser
/// 4. Waits up to 60 seconds for `/callback/spotify` to exchange the code
///
/// The callback handler persists the token; this function only reports the
/// outcome.
///
/// # Errors
///
/// Fails when the client id or redirect URI is not configured, or when no
/// token arrived before the timeout.
pub async fn auth(shared_state: Arc<Mutex<AuthState>>) -> Result<(), MigrationError> {
    let auth_url = begin(&shared_state).await?;

    // start API server
    let server_state = Arc::clone(&shared_state);
    tokio::spawn(async move {
        start_api_server(server_state).await;
    });

    // Open the authorization URL in the default browser
    if webbrowser::open(&auth_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    match wait_for_token(shared_state).await {
        Some(_) => {
            success!("Spotify authentication successful!");
            Ok(())
        }
        None => Err(MigrationError::upstream(
            "spotify",
            None,
            "authentication failed or timed out",
        )),
    }
}

/// Stores a fresh PKCE verifier in `shared_state` and returns the Spotify
/// authorization URL carrying its challenge.
pub async fn begin(shared_state: &Arc<Mutex<AuthState>>) -> Result<String, MigrationError> {
    let code_verifier = utils::generate_code_verifier();
    let code_challenge = utils::generate_code_challenge(&code_verifier);
    let auth_url = authorize_url(&code_challenge)?;

    let mut lock = shared_state.lock().await;
    lock.spotify = Some(PkceToken {
        code_verifier,
        token: None,
    });

    Ok(auth_url)
}

pub fn authorize_url(code_challenge: &str) -> Result<String, MigrationError> {
    let url = reqwest::Url::parse_with_params(
        &config::spotify_apiauth_url(),
        &[
            ("client_id", config::spotify_client_id()?),
            ("response_type", "code".to_string()),
            ("redirect_uri", config::spotify_redirect_uri()?),
            ("code_challenge", code_challenge.to_string()),
            ("code_challenge_method", "S256".to_string()),
            ("scope", config::spotify_scope()),
        ],
    )
    .map_err(|e| MigrationError::Configuration(format!("invalid SPOTIFY_API_AUTH_URL: {}", e)))?;

    Ok(url.to_string())
}

/// Polls `shared_state` once per second for up to 60 seconds until the
/// callback handler stored a Spotify token.
async fn wait_for_token(shared_state: Arc<Mutex<AuthState>>) -> Option<Token> {
    use std::time::Instant;

    let max_wait = Duration::from_secs(60);
    let start = Instant::now();

    while start.elapsed() < max_wait {
        let lock = shared_state.lock().await;
        if let Some(token) = lock.spotify.as_ref().and_then(|p| p.token.as_ref()) {
            return Some(token.clone());
        }
        drop(lock);
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    None
}

/// Exchanges a refresh token for a new access token.
///
/// Spotify may or may not rotate the refresh token; when it does not, the
/// returned token has an empty `refresh_token` and the caller keeps the old
/// one.
pub async fn refresh_token(refresh_token: &str) -> Result<Token, MigrationError> {
    let client_id = config::spotify_client_id()?;

    let client = utils::http_client()?;
    let res = client
        .post(config::spotify_apitoken_url())
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", client_id.as_str()),
        ])
        .send()
        .await?;

    let status = res.status();
    let json: Value = utils::decode_response("spotify", res).await?;
    token_from_json(status, &json)
}

/// Exchanges an authorization code for an access token using PKCE.
///
/// The verifier must be the one whose challenge was sent in the
/// authorization request.
pub async fn exchange_code_pkce(code: &str, verifier: &str) -> Result<Token, MigrationError> {
    let client_id = config::spotify_client_id()?;
    let redirect_uri = config::spotify_redirect_uri()?;

    let client = utils::http_client()?;
    let res = client
        .post(config::spotify_apitoken_url())
        .form(&[
            ("grant_type", "authorization_code"),
            ("client_id", client_id.as_str()),
            ("code", code),
            ("code_verifier", verifier),
            ("redirect_uri", redirect_uri.as_str()),
        ])
        .send()
        .await?;

    let status = res.status();
    let json: Value = utils::decode_response("spotify", res).await?;
    token_from_json(status, &json)
}

fn token_from_json(status: reqwest::StatusCode, json: &Value) -> Result<Token, MigrationError> {
    let Some(access_token) = json["access_token"].as_str() else {
        let message = json["error_description"]
            .as_str()
            .or_else(|| json["error"].as_str())
            .unwrap_or("token response without access_token");
        return Err(MigrationError::upstream(
            "spotify",
            Some(status.as_u16()),
            message,
        ));
    };

    Ok(Token {
        access_token: access_token.to_string(),
        refresh_token: json["refresh_token"]
            .as_str()
            .unwrap_or_default()
            .to_string(),
        scope: json["scope"].as_str().unwrap_or_default().to_string(),
        expires_in: json["expires_in"].as_u64().unwrap_or(3600),
        obtained_at: Utc::now().timestamp() as u64,
    })
}
