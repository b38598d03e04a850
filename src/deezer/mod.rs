//! # Deezer Integration Module
//!
//! Source side of a migration: reads the authenticated user's playlists and
//! their tracks through the Deezer API and exposes them through the
//! [`SourceCatalog`](crate::migration::SourceCatalog) trait.
//!
//! - [`auth`] - OAuth with app id and secret; the callback lands on
//!   `/callback/deezer`. With `offline_access` the token does not expire.
//! - [`client`] - `GET /user/me/playlists` and `GET /playlist/{id}/tracks`,
//!   both following Deezer's `next` links until the last page.
//!
//! Deezer reports API errors with HTTP 200 and an `{"error": {...}}` body;
//! those are turned into `MigrationError::Upstream`.

pub mod auth;
pub mod client;

pub use client::DeezerClient;
