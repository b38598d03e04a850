use std::{sync::Arc, time::Duration};

use chrono::Utc;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::{
    config,
    error::MigrationError,
    server::start_api_server,
    success,
    types::{AuthState, Token},
    utils, warning,
};

/// Runs Deezer's OAuth flow: opens the authorization page in the browser and
/// waits up to 60 seconds for `/callback/deezer` to exchange the code.
pub async fn auth(shared_state: Arc<Mutex<AuthState>>) -> Result<(), MigrationError> {
    let auth_url = authorize_url()?;
    shared_state.lock().await.deezer = None;

    let server_state = Arc::clone(&shared_state);
    tokio::spawn(async move {
        start_api_server(server_state).await;
    });

    if webbrowser::open(&auth_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    let max_wait = Duration::from_secs(60);
    let start = std::time::Instant::now();

    while start.elapsed() < max_wait {
        if shared_state.lock().await.deezer.is_some() {
            success!("Deezer authentication successful!");
            return Ok(());
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    Err(MigrationError::upstream(
        "deezer",
        None,
        "authentication failed or timed out",
    ))
}

pub fn authorize_url() -> Result<String, MigrationError> {
    let url = reqwest::Url::parse_with_params(
        &config::deezer_auth_url(),
        &[
            ("app_id", config::deezer_app_id()?),
            ("redirect_uri", config::deezer_redirect_uri()?),
            ("perms", config::deezer_perms()),
        ],
    )
    .map_err(|e| MigrationError::Configuration(format!("invalid DEEZER_AUTH_URL: {}", e)))?;

    Ok(url.to_string())
}

/// Exchanges the authorization code of the callback for an access token.
pub async fn exchange_code(code: &str) -> Result<Token, MigrationError> {
    let app_id = config::deezer_app_id()?;
    let secret = config::deezer_secret()?;

    let client = utils::http_client()?;
    let res = client
        .get(config::deezer_token_url())
        .query(&[
            ("app_id", app_id.as_str()),
            ("secret", secret.as_str()),
            ("code", code),
            ("output", "json"),
        ])
        .send()
        .await?;

    let status = res.status();
    let body = res.text().await?;
    token_from_body(status, &body)
}

/// Deezer answers with JSON on success and with plain text such as
/// `wrong code` on failure.
fn token_from_body(status: reqwest::StatusCode, body: &str) -> Result<Token, MigrationError> {
    let json: Value = serde_json::from_str(body).unwrap_or(Value::Null);

    let Some(access_token) = json["access_token"].as_str() else {
        let message = json["error"]["message"]
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| body.trim().to_string());
        return Err(MigrationError::upstream(
            "deezer",
            Some(status.as_u16()),
            message,
        ));
    };

    // `expires` is 0 for offline_access tokens and may be sent as a string
    let expires_in = json["expires"]
        .as_u64()
        .or_else(|| json["expires"].as_str().and_then(|s| s.parse().ok()))
        .unwrap_or(0);

    Ok(Token {
        access_token: access_token.to_string(),
        refresh_token: String::new(),
        scope: config::deezer_perms(),
        expires_in,
        obtained_at: Utc::now().timestamp() as u64,
    })
}
