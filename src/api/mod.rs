//! # API Module
//!
//! HTTP endpoints served by the local deezify server.
//!
//! ## Endpoints
//!
//! ### Authentication
//!
//! - [`login_spotify`] / [`login_deezer`] - Redirect the browser to the
//!   provider's authorization page. The Spotify route stores a fresh PKCE
//!   verifier first.
//! - [`callback_spotify`] / [`callback_deezer`] - Exchange the authorization
//!   code for a token and persist it in the local data directory.
//!
//! ### Migration
//!
//! - [`migrate`] - Runs a migration with the cached tokens and answers with
//!   `{"message": ..., "errors": {...}}`, where `errors` is the serialized
//!   error ledger. A run that stops early answers 500 with only a message.
//!
//! ### Monitoring
//!
//! - [`health`] - Status and version information.
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tokio::sync::Mutex;
//!
//! let app = deezify::server::router(Arc::new(Mutex::new(Default::default())));
//! ```

mod callback;
mod health;
mod login;
mod migrate;

pub use callback::{callback_deezer, callback_spotify};
pub use health::health;
pub use login::{login_deezer, login_spotify};
pub use migrate::migrate;
