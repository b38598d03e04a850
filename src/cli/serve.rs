use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{error, server, types::AuthState};

pub async fn serve(shared_state: Arc<Mutex<AuthState>>) {
    if let Err(e) = server::serve(shared_state).await {
        error!("Cannot run server. Err: {}", e);
    }
}
