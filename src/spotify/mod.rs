//! # Spotify Integration Module
//!
//! Destination side of a migration. This module implements the Spotify Web
//! API calls deezify needs and plugs them into the migration through the
//! [`PageFetcher`](crate::search::PageFetcher) and
//! [`DestinationCatalog`](crate::migration::DestinationCatalog) traits.
//!
//! ## Architecture
//!
//! ```text
//! Migration (resolve / create phases)
//!          ↓
//! SpotifyClient
//!     ├── Authentication (OAuth 2.0 PKCE, token refresh)
//!     ├── Track search (paginated)
//!     └── Playlist operations (create, add tracks)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## Core Modules
//!
//! ### Authentication Module
//!
//! [`auth`] - OAuth 2.0 authorization-code flow with PKCE:
//! - **Browser Integration**: opens the authorization URL in the default browser
//! - **Local Callback Server**: `/callback/spotify` exchanges the code for a token
//! - **Token Refresh**: expired access tokens are refreshed with the refresh token
//!
//! ### Search Module
//!
//! [`search`] - `GET /search?type=track` by track title. Later pages are
//! requested through the `next` URL of the previous page.
//!
//! ### Playlist Module
//!
//! [`playlist`] - `POST /users/{user_id}/playlists` and
//! `POST /playlists/{playlist_id}/tracks` (at most 100 uris per call).
//!
//! ## API Coverage
//!
//! - `GET /me` - Id of the authenticated user, needed to create playlists
//! - `GET /search` - Track search
//! - `POST /users/{user_id}/playlists` - Create new playlists
//! - `POST /playlists/{playlist_id}/tracks` - Add tracks to playlists
//! - `POST /api/token` - Token exchange and refresh operations
//!
//! ## Error Types
//!
//! Every call returns [`MigrationError`](crate::error::MigrationError):
//! transport failures become `Network`, non-success responses become
//! `Upstream` carrying Spotify's error message.
//!
//! ## Thread Safety
//!
//! The session (access and refresh token) is owned by the client behind an
//! async mutex, so a token refresh can happen while the client is shared by
//! reference.

pub mod auth;
pub mod client;
pub mod playlist;
pub mod search;

pub use client::SpotifyClient;
