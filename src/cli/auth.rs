use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{
    deezer, error, spotify,
    types::{AuthState, Service},
};

pub async fn auth(service: Service, shared_state: Arc<Mutex<AuthState>>) {
    let result = match service {
        Service::Spotify => spotify::auth::auth(shared_state).await,
        Service::Deezer => deezer::auth::auth(shared_state).await,
    };

    if let Err(e) = result {
        error!("Authentication with {} failed: {}", service, e);
    }
}
