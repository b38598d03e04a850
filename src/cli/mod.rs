//! # CLI Module
//!
//! User-facing commands of deezify. Each command delegates to the service
//! modules and turns their results into console output.
//!
//! ## Commands
//!
//! - [`auth`] - Authorize deezify with Spotify (OAuth 2.0 PKCE) or Deezer and
//!   cache the token in the local data directory
//! - [`migrate`] - Recreate all Deezer playlists on Spotify and print the
//!   tracks that could not be matched
//! - [`serve`] - Run the local HTTP server with the login, callback and
//!   migration routes
//!
//! ## Usage Patterns
//!
//! ```bash
//! deezify auth deezer          # Authorize access to the Deezer library
//! deezify auth spotify         # Authorize playlist creation on Spotify
//! deezify migrate              # Migrate and print a table of misses
//! deezify migrate --json       # Same, as {"message": ..., "errors": {...}}
//! deezify serve                # Browser flow: /login/*, /callback/*, /migrate
//! ```
//!
//! ## Error Handling
//!
//! Commands print errors with the `error!` macro, which exits with status 1.
//! Tracks that cannot be matched are not errors: they are listed after the
//! migration finished.

mod auth;
mod migrate;
mod serve;

pub use auth::auth;
pub use migrate::migrate;
pub use serve::serve;
