use std::sync::Arc;

use axum::{extract::Extension, response::Json};
use serde_json::{Value, json};
use tokio::sync::Mutex;

use crate::types::AuthState;

/// Liveness probe. Also tells which services were authorized through this
/// server since it started.
pub async fn health(Extension(state): Extension<Arc<Mutex<AuthState>>>) -> Json<Value> {
    let state = state.lock().await;
    Json(json!({
        "status": "ok",
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "authorized": {
            "spotify": state.spotify.as_ref().is_some_and(|t| t.token.is_some()),
            "deezer": state.deezer.is_some(),
        }
    }))
}
