//! deezify library
//!
//! Migrates a user's Deezer playlists to Spotify. Tracks are read from the
//! Deezer library, resolved against the Spotify catalog with a normalized,
//! multi-artist aware matcher and uploaded into freshly created playlists.
//! Tracks without a match are collected in an error ledger and reported at
//! the end of a run.
//!
//! # Modules
//!
//! - `api` - HTTP endpoints of the local server
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `deezer` - Deezer OAuth and playlist reader
//! - `error` - The [`error::MigrationError`] taxonomy
//! - `management` - Token caching and refresh
//! - `matching` - Text normalization and candidate selection
//! - `migration` - The fetch, resolve, create and report pipeline
//! - `search` - Paginated search over a destination catalog
//! - `server` - Local HTTP server for OAuth callbacks and migrations
//! - `spotify` - Spotify Web API client implementation
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers

pub mod api;
pub mod cli;
pub mod config;
pub mod deezer;
pub mod error;
pub mod management;
pub mod matching;
pub mod migration;
pub mod search;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

use std::sync::atomic::{AtomicBool, Ordering};

static STATUS_TO_STDERR: AtomicBool = AtomicBool::new(false);

/// Routes the status macros to stderr so stdout only carries
/// machine-readable output, e.g. `deezify migrate --json`.
pub fn status_to_stderr(enabled: bool) {
    STATUS_TO_STDERR.store(enabled, Ordering::Relaxed);
}

pub fn status_on_stderr() -> bool {
    STATUS_TO_STDERR.load(Ordering::Relaxed)
}

#[doc(hidden)]
pub fn print_status(marker: colored::ColoredString, args: std::fmt::Arguments<'_>) {
    if status_on_stderr() {
        eprintln!("[{}] {}", marker, args);
    } else {
        println!("[{}] {}", marker, args);
    }
}

/// Prints a status line prefixed with a blue `o`.
///
/// ```ignore
/// info!("Resolving {} tracks", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    $crate::print_status("o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a status line prefixed with a green check mark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    $crate::print_status("✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a red `!` line and exits the process with status 1.
///
/// Only for command-level failures; library code returns
/// [`MigrationError`](crate::error::MigrationError) instead.
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    $crate::print_status("!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a yellow `!` line for problems the run survives, such as a track
/// without a match.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    $crate::print_status("!".yellow().bold(), std::format_args!($($arg)*));
  })
}
