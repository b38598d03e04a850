use std::{collections::HashMap, sync::Arc};

use axum::{Extension, extract::Query, response::Html};
use tokio::sync::Mutex;

use crate::{
    deezer,
    management::TokenManager,
    spotify,
    types::{AuthState, Service},
    warning,
};

pub async fn callback_spotify(
    Query(params): Query<HashMap<String, String>>,
    Extension(shared_state): Extension<Arc<Mutex<AuthState>>>,
) -> Html<&'static str> {
    let Some(code) = params.get("code") else {
        return Html("<h4>Missing authorization code.</h4>");
    };

    // Take code verifier from state
    let verifier = match shared_state.lock().await.spotify.as_ref() {
        Some(pkce_state) => pkce_state.code_verifier.clone(),
        None => return Html("<h4>Missing PKCE code verifier.</h4>"),
    };

    match spotify::auth::exchange_code_pkce(code, &verifier).await {
        Ok(token) => {
            if let Err(e) = TokenManager::new(Service::Spotify, token.clone())
                .persist()
                .await
            {
                warning!("Failed to save Spotify token to cache: {}", e);
                return Html("<h4>Login succeeded but the token could not be saved.</h4>");
            }

            if let Some(pkce_state) = shared_state.lock().await.spotify.as_mut() {
                pkce_state.token = Some(token);
            }
            Html("<h2>Spotify authentication successful.</h2><p>Close browser window.</p>")
        }
        Err(e) => {
            warning!("Spotify token exchange failed: {}", e);
            Html("<h4>Login failed.</h4>")
        }
    }
}

pub async fn callback_deezer(
    Query(params): Query<HashMap<String, String>>,
    Extension(shared_state): Extension<Arc<Mutex<AuthState>>>,
) -> Html<&'static str> {
    let Some(code) = params.get("code") else {
        // Deezer sends `error_reason` when the user declines
        if let Some(reason) = params.get("error_reason") {
            warning!("Deezer authorization denied: {}", reason);
        }
        return Html("<h4>Missing authorization code.</h4>");
    };

    match deezer::auth::exchange_code(code).await {
        Ok(token) => {
            if let Err(e) = TokenManager::new(Service::Deezer, token.clone())
                .persist()
                .await
            {
                warning!("Failed to save Deezer token to cache: {}", e);
                return Html("<h4>Login succeeded but the token could not be saved.</h4>");
            }

            shared_state.lock().await.deezer = Some(token);
            Html("<h2>Deezer authentication successful.</h2><p>Close browser window.</p>")
        }
        Err(e) => {
            warning!("Deezer token exchange failed: {}", e);
            Html("<h4>Login failed.</h4>")
        }
    }
}
