use std::{collections::BTreeMap, fmt};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Service {
    Spotify,
    Deezer,
}

impl Service {
    pub fn as_str(&self) -> &'static str {
        match self {
            Service::Spotify => "spotify",
            Service::Deezer => "deezer",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
    #[serde(default)]
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

#[derive(Debug, Clone)]
pub struct PkceToken {
    pub code_verifier: String,
    pub token: Option<Token>,
}

/// Pending OAuth handshakes for the local callback server.
#[derive(Debug, Clone, Default)]
pub struct AuthState {
    pub spotify: Option<PkceToken>,
    pub deezer: Option<Token>,
}

// ---- source catalog (Deezer) ----

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeezerApiError {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub code: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeezerPage<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    pub next: Option<String>,
    pub error: Option<DeezerApiError>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeezerPlaylist {
    pub id: u64,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeezerArtist {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeezerTrack {
    pub title: String,
    pub artist: DeezerArtist,
}

// ---- destination catalog (Spotify) ----

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyApiError {
    pub status: Option<u16>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyErrorResponse {
    pub error: SpotifyApiError,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyArtist {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyTrack {
    pub name: String,
    pub uri: String,
    pub artists: Vec<SpotifyArtist>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchTracks {
    pub items: Vec<SpotifyTrack>,
    pub next: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub tracks: SearchTracks,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUserResponse {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
    pub collaborative: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistResponse {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistRequest {
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistResponse {
    pub snapshot_id: String,
}

// ---- migration domain ----

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceTrack {
    pub title: String,
    pub artist: String,
}

impl SourceTrack {
    pub fn new(title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
        }
    }

    /// Entry written to the error ledger when the track cannot be resolved.
    pub fn label(&self) -> String {
        format!("{} - {}", self.artist, self.title)
    }
}

impl From<DeezerTrack> for SourceTrack {
    fn from(track: DeezerTrack) -> Self {
        SourceTrack {
            title: track.title,
            artist: track.artist.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistSummary {
    pub id: String,
    pub title: String,
}

impl From<DeezerPlaylist> for PlaylistSummary {
    fn from(playlist: DeezerPlaylist) -> Self {
        PlaylistSummary {
            id: playlist.id.to_string(),
            title: playlist.title,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SourcePlaylist {
    pub id: String,
    pub title: String,
    pub tracks: Vec<SourceTrack>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateTrack {
    pub name: String,
    pub artists: Vec<String>,
    pub uri: String,
}

impl From<SpotifyTrack> for CandidateTrack {
    fn from(track: SpotifyTrack) -> Self {
        CandidateTrack {
            name: track.name,
            artists: track.artists.into_iter().map(|a| a.name).collect(),
            uri: track.uri,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchedTrack {
    pub artist: String,
    pub name: String,
    pub uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    Matched(MatchedTrack),
    NoMatch,
}

impl MatchResult {
    pub fn is_match(&self) -> bool {
        matches!(self, MatchResult::Matched(_))
    }
}

/// One page of destination search results.
#[derive(Debug, Clone, Default)]
pub struct SearchPage {
    pub candidates: Vec<CandidateTrack>,
    pub next: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ResolvedPlaylist {
    pub name: String,
    pub uris: Vec<String>,
}

/// Unmatched tracks keyed by normalized playlist name.
///
/// Serializes flat: one key per playlist plus `total`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ErrorLedger {
    #[serde(flatten)]
    playlists: BTreeMap<String, Vec<String>>,
    total: usize,
}

impl ErrorLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, playlist: &str, entry: String) {
        self.playlists
            .entry(playlist.to_string())
            .or_default()
            .push(entry);
        self.total += 1;
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn get(&self, playlist: &str) -> Option<&[String]> {
        self.playlists.get(playlist).map(|e| e.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.playlists.iter()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MigrationReport {
    pub message: String,
    pub playlists: usize,
    pub uploaded_tracks: usize,
    pub errors: ErrorLedger,
}

/// JSON body returned by the `/migrate` route.
#[derive(Debug, Clone, Serialize)]
pub struct MigrationResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<ErrorLedger>,
}

#[derive(Tabled)]
pub struct ErrorTableRow {
    pub playlist: String,
    pub track: String,
}
