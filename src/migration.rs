//! # Migration
//!
//! Moves every playlist of the source catalog to the destination catalog in
//! four sequential phases:
//!
//! 1. **Fetch**: list source playlists and their tracks.
//! 2. **Resolve**: search each track on the destination, in playlist order.
//!    A track that cannot be resolved, for whatever reason, is written to the
//!    [`ErrorLedger`] and the run moves on to the next track.
//! 3. **Create**: create one destination playlist per source playlist and
//!    upload the resolved uris in chunks of [`UPLOAD_CHUNK_SIZE`]. Any error
//!    here aborts the remaining run; no partial report is produced.
//! 4. **Report**: summary message plus the ledger.
//!
//! Playlists and tracks are processed one at a time, which keeps the request
//! rate on the destination API low.

use async_trait::async_trait;
use indicatif::ProgressBar;

use crate::{
    config,
    deezer::DeezerClient,
    error::MigrationError,
    info,
    management::TokenManager,
    search::{self, DEFAULT_MAX_PAGES, PageFetcher},
    success,
    spotify::SpotifyClient,
    types::{
        ErrorLedger, MatchResult, MigrationReport, PlaylistSummary, ResolvedPlaylist, Service,
        SourcePlaylist, SourceTrack,
    },
    utils, warning,
};

/// Largest number of track uris the destination accepts per upload request.
pub const UPLOAD_CHUNK_SIZE: usize = 100;

/// Catalog the playlists are read from.
#[async_trait]
pub trait SourceCatalog: Send + Sync {
    async fn list_playlists(&self) -> Result<Vec<PlaylistSummary>, MigrationError>;

    /// All tracks of a playlist, in playlist order.
    async fn playlist_tracks(&self, playlist_id: &str) -> Result<Vec<SourceTrack>, MigrationError>;
}

/// Catalog the playlists are recreated in.
#[async_trait]
pub trait DestinationCatalog: PageFetcher {
    /// Creates a playlist and returns its id.
    async fn create_playlist(&self, name: &str) -> Result<String, MigrationError>;

    /// Appends `uris` to the playlist. Callers pass at most
    /// [`UPLOAD_CHUNK_SIZE`] uris.
    async fn add_tracks(&self, playlist_id: &str, uris: &[String]) -> Result<(), MigrationError>;
}

#[derive(Debug, Clone)]
pub struct MigrationSettings {
    pub source_tag: String,
    pub max_search_pages: usize,
}

impl MigrationSettings {
    pub fn from_env() -> Result<Self, MigrationError> {
        Ok(Self {
            source_tag: config::source_tag(),
            max_search_pages: config::max_search_pages()?,
        })
    }
}

impl Default for MigrationSettings {
    fn default() -> Self {
        Self {
            source_tag: config::DEFAULT_SOURCE_TAG.to_string(),
            max_search_pages: DEFAULT_MAX_PAGES,
        }
    }
}

pub struct Migrator<S, D> {
    source: S,
    destination: D,
    settings: MigrationSettings,
    progress: Option<ProgressBar>,
}

impl Migrator<DeezerClient, SpotifyClient> {
    /// Deezer to Spotify migration using the cached tokens of both services.
    ///
    /// Fails with `MigrationError::Configuration` when a required setting is
    /// missing and with `MigrationError::Io` when a service was never
    /// authorized, before any request is made.
    pub async fn from_env() -> Result<Self, MigrationError> {
        let settings = MigrationSettings::from_env()?;
        let source = DeezerClient::new(TokenManager::load(Service::Deezer).await?)?;
        let destination = SpotifyClient::new(TokenManager::load(Service::Spotify).await?)?;
        Ok(Self::new(source, destination, settings))
    }
}

impl<S, D> Migrator<S, D>
where
    S: SourceCatalog,
    D: DestinationCatalog,
{
    pub fn new(source: S, destination: D, settings: MigrationSettings) -> Self {
        Self {
            source,
            destination,
            settings,
            progress: None,
        }
    }

    /// Reports resolve-phase progress on `pb`, one tick per track.
    pub fn with_progress(mut self, pb: ProgressBar) -> Self {
        self.progress = Some(pb);
        self
    }

    pub fn destination(&self) -> &D {
        &self.destination
    }

    pub async fn run(&self) -> Result<MigrationReport, MigrationError> {
        let playlists = self.fetch_playlists().await?;

        let mut errors = ErrorLedger::new();
        let resolved = self.resolve_playlists(&playlists, &mut errors).await;

        let uploaded_tracks = self.create_playlists(&resolved).await?;

        let message = format!(
            "Migrated {} playlists with {} tracks, {} tracks could not be matched",
            resolved.len(),
            uploaded_tracks,
            errors.total()
        );

        Ok(MigrationReport {
            message,
            playlists: resolved.len(),
            uploaded_tracks,
            errors,
        })
    }

    async fn fetch_playlists(&self) -> Result<Vec<SourcePlaylist>, MigrationError> {
        let summaries = self.source.list_playlists().await?;
        let mut playlists = Vec::with_capacity(summaries.len());

        for summary in summaries {
            let tracks = self.source.playlist_tracks(&summary.id).await?;
            playlists.push(SourcePlaylist {
                id: summary.id,
                title: summary.title,
                tracks,
            });
        }

        Ok(playlists)
    }

    async fn resolve_playlists(
        &self,
        playlists: &[SourcePlaylist],
        errors: &mut ErrorLedger,
    ) -> Vec<ResolvedPlaylist> {
        if let Some(pb) = &self.progress {
            pb.set_length(playlists.iter().map(|p| p.tracks.len() as u64).sum());
        }

        let mut resolved = Vec::with_capacity(playlists.len());

        for playlist in playlists {
            let name = utils::normalize_playlist_name(&playlist.title);
            let mut uris = Vec::with_capacity(playlist.tracks.len());

            for track in &playlist.tracks {
                if let Some(pb) = &self.progress {
                    pb.set_message(format!("{}: {}", playlist.title, track.label()));
                }

                match self.resolve_track(track).await {
                    Ok(uri) => uris.push(uri),
                    Err(e) => {
                        self.warn(&format!("{}: {}", name, e));
                        errors.record(&name, track.label());
                    }
                }

                if let Some(pb) = &self.progress {
                    pb.inc(1);
                }
            }

            resolved.push(ResolvedPlaylist { name, uris });
        }

        if let Some(pb) = &self.progress {
            pb.finish_and_clear();
        }

        resolved
    }

    async fn resolve_track(&self, track: &SourceTrack) -> Result<String, MigrationError> {
        let outcome = search::search(
            &track.title,
            &track.artist,
            &self.destination,
            self.settings.max_search_pages,
        )
        .await?;

        if outcome.capped {
            self.warn(&format!(
                "Stopped searching for {} after {} pages",
                track.label(),
                outcome.pages
            ));
        }

        match outcome.result {
            MatchResult::Matched(found) => Ok(found.uri),
            MatchResult::NoMatch => Err(MigrationError::NoMatchFound {
                artist: track.artist.clone(),
                title: track.title.clone(),
            }),
        }
    }

    /// Prints a warning without tearing the progress bar.
    fn warn(&self, message: &str) {
        match &self.progress {
            Some(pb) => pb.suspend(|| warning!("{}", message)),
            None => warning!("{}", message),
        }
    }

    /// Returns the number of uploaded tracks.
    async fn create_playlists(&self, playlists: &[ResolvedPlaylist]) -> Result<usize, MigrationError> {
        let mut uploaded = 0;

        for playlist in playlists {
            let name = utils::destination_playlist_name(&self.settings.source_tag, &playlist.name);
            info!("Create playlist {} with {} tracks", name, playlist.uris.len());

            let playlist_id = self.destination.create_playlist(&name).await?;

            for chunk in playlist.uris.chunks(UPLOAD_CHUNK_SIZE) {
                self.destination.add_tracks(&playlist_id, chunk).await?;
                uploaded += chunk.len();
            }

            success!("Playlist {} created", name);
        }

        Ok(uploaded)
    }
}
