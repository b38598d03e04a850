use axum::{Extension, Router, routing::get};
use std::{net::SocketAddr, str::FromStr, sync::Arc};
use tokio::sync::Mutex;

use crate::{api, config, error::MigrationError, info, types::AuthState, warning};

pub fn router(state: Arc<Mutex<AuthState>>) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/login/spotify", get(api::login_spotify))
        .route("/login/deezer", get(api::login_deezer))
        .route("/callback/spotify", get(api::callback_spotify))
        .route("/callback/deezer", get(api::callback_deezer))
        .route("/migrate", get(api::migrate).post(api::migrate))
        .layer(Extension(state))
}

/// Serves the OAuth callbacks (and the other routes) until the process ends.
///
/// Used in the background by `deezify auth`, where a failure to bind only
/// warns because the user may still finish the flow on an already running
/// `deezify serve`.
pub async fn start_api_server(state: Arc<Mutex<AuthState>>) {
    if let Err(e) = serve(state).await {
        warning!("Local server stopped: {}", e);
    }
}

pub async fn serve(state: Arc<Mutex<AuthState>>) -> Result<(), MigrationError> {
    let addr = SocketAddr::from_str(&config::server_addr()?).map_err(|e| {
        MigrationError::Configuration(format!("Failed to parse server address: {}", e))
    })?;

    let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
        MigrationError::Configuration(format!("Failed to bind {}: {}", addr, e))
    })?;
    info!("Listening on http://{}", addr);
    axum::serve(listener, router(state)).await?;
    Ok(())
}
