use std::sync::Arc;

use axum::{
    Extension,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use tokio::sync::Mutex;

use crate::{deezer, error::MigrationError, spotify, types::AuthState, warning};

pub async fn login_spotify(Extension(shared_state): Extension<Arc<Mutex<AuthState>>>) -> Response {
    redirect_or_error(spotify::auth::begin(&shared_state).await)
}

pub async fn login_deezer() -> Response {
    redirect_or_error(deezer::auth::authorize_url())
}

fn redirect_or_error(url: Result<String, MigrationError>) -> Response {
    match url {
        Ok(url) => Redirect::to(&url).into_response(),
        Err(e) => {
            warning!("Cannot start login: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Login is not configured.").into_response()
        }
    }
}
