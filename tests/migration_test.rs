use std::sync::Mutex;

use async_trait::async_trait;
use deezify::error::MigrationError;
use deezify::migration::{
    DestinationCatalog, MigrationSettings, Migrator, SourceCatalog, UPLOAD_CHUNK_SIZE,
};
use deezify::search::PageFetcher;
use deezify::types::{
    CandidateTrack, ErrorLedger, MigrationResponse, PlaylistSummary, SearchPage, SourceTrack,
};
use serde_json::json;

struct FakeSource {
    playlists: Vec<(String, String, Vec<SourceTrack>)>,
    fail_listing: bool,
}

impl FakeSource {
    fn new() -> Self {
        Self {
            playlists: Vec::new(),
            fail_listing: false,
        }
    }

    fn with_playlist(mut self, id: &str, title: &str, tracks: Vec<SourceTrack>) -> Self {
        self.playlists
            .push((id.to_string(), title.to_string(), tracks));
        self
    }
}

#[async_trait]
impl SourceCatalog for FakeSource {
    async fn list_playlists(&self) -> Result<Vec<PlaylistSummary>, MigrationError> {
        if self.fail_listing {
            return Err(MigrationError::upstream("deezer", Some(500), "boom"));
        }
        Ok(self
            .playlists
            .iter()
            .map(|(id, title, _)| PlaylistSummary {
                id: id.clone(),
                title: title.clone(),
            })
            .collect())
    }

    async fn playlist_tracks(&self, playlist_id: &str) -> Result<Vec<SourceTrack>, MigrationError> {
        Ok(self
            .playlists
            .iter()
            .find(|(id, _, _)| id == playlist_id)
            .map(|(_, _, tracks)| tracks.clone())
            .unwrap_or_default())
    }
}

/// Destination with a single-page search over a fixed catalog.
struct FakeDestination {
    catalog: Vec<CandidateTrack>,
    broken_queries: Vec<String>,
    /// 1-based index of the `create_playlist` call that fails.
    fail_create_at: Option<usize>,
    /// 1-based index of the `add_tracks` call that fails.
    fail_upload_at: Option<usize>,
    create_calls: Mutex<usize>,
    upload_calls: Mutex<usize>,
    created: Mutex<Vec<String>>,
    uploads: Mutex<Vec<(String, Vec<String>)>>,
}

impl FakeDestination {
    fn new() -> Self {
        Self {
            catalog: Vec::new(),
            broken_queries: Vec::new(),
            fail_create_at: None,
            fail_upload_at: None,
            create_calls: Mutex::new(0),
            upload_calls: Mutex::new(0),
            created: Mutex::new(Vec::new()),
            uploads: Mutex::new(Vec::new()),
        }
    }

    fn with_track(mut self, name: &str, artist: &str, uri: &str) -> Self {
        self.catalog.push(CandidateTrack {
            name: name.to_string(),
            artists: vec![artist.to_string()],
            uri: uri.to_string(),
        });
        self
    }

    fn created(&self) -> Vec<String> {
        self.created.lock().unwrap().clone()
    }

    fn uploads(&self) -> Vec<(String, Vec<String>)> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for FakeDestination {
    async fn fetch_page(
        &self,
        query: &str,
        _page: Option<&str>,
    ) -> Result<SearchPage, MigrationError> {
        if self.broken_queries.iter().any(|q| q == query) {
            return Err(MigrationError::upstream("spotify", Some(502), "bad gateway"));
        }
        Ok(SearchPage {
            candidates: self
                .catalog
                .iter()
                .filter(|c| c.name == query)
                .cloned()
                .collect(),
            next: None,
        })
    }
}

#[async_trait]
impl DestinationCatalog for FakeDestination {
    async fn create_playlist(&self, name: &str) -> Result<String, MigrationError> {
        let call = {
            let mut calls = self.create_calls.lock().unwrap();
            *calls += 1;
            *calls
        };
        if self.fail_create_at == Some(call) {
            return Err(MigrationError::upstream("spotify", Some(403), "forbidden"));
        }
        let mut created = self.created.lock().unwrap();
        created.push(name.to_string());
        Ok(format!("playlist-{}", created.len()))
    }

    async fn add_tracks(&self, playlist_id: &str, uris: &[String]) -> Result<(), MigrationError> {
        assert!(uris.len() <= UPLOAD_CHUNK_SIZE);
        let call = {
            let mut calls = self.upload_calls.lock().unwrap();
            *calls += 1;
            *calls
        };
        if self.fail_upload_at == Some(call) {
            return Err(MigrationError::upstream("spotify", Some(500), "upload failed"));
        }
        self.uploads
            .lock()
            .unwrap()
            .push((playlist_id.to_string(), uris.to_vec()));
        Ok(())
    }
}

fn settings(tag: &str) -> MigrationSettings {
    MigrationSettings {
        source_tag: tag.to_string(),
        max_search_pages: 50,
    }
}

#[tokio::test]
async fn test_migrates_playlist_and_records_misses() {
    let source = FakeSource::new().with_playlist(
        "1",
        "My Mix",
        vec![
            SourceTrack::new("Yesterday", "The Beatles"),
            SourceTrack::new("Unknown Song", "Nonexistent Artist"),
        ],
    );
    let destination =
        FakeDestination::new().with_track("Yesterday", "The Beatles", "spotify:track:yesterday");

    let migrator = Migrator::new(source, destination, settings("src"));
    let report = migrator.run().await.unwrap();

    assert_eq!(migrator.destination().created(), vec!["src_my_mix"]);
    assert_eq!(
        migrator.destination().uploads(),
        vec![(
            "playlist-1".to_string(),
            vec!["spotify:track:yesterday".to_string()]
        )]
    );

    assert_eq!(report.playlists, 1);
    assert_eq!(report.uploaded_tracks, 1);
    assert_eq!(
        report.message,
        "Migrated 1 playlists with 1 tracks, 1 tracks could not be matched"
    );
    assert_eq!(
        serde_json::to_value(&report.errors).unwrap(),
        json!({"my_mix": ["Nonexistent Artist - Unknown Song"], "total": 1})
    );
}

#[tokio::test]
async fn test_uploads_in_chunks_preserving_order() {
    let tracks: Vec<SourceTrack> = (0..250)
        .map(|i| SourceTrack::new(format!("Song {}", i), "Artist"))
        .collect();
    let mut destination = FakeDestination::new();
    for i in 0..250 {
        destination = destination.with_track(
            &format!("Song {}", i),
            "Artist",
            &format!("spotify:track:{}", i),
        );
    }

    let source = FakeSource::new().with_playlist("1", "Long One", tracks);
    let migrator = Migrator::new(source, destination, settings("deezer"));
    let report = migrator.run().await.unwrap();

    let uploads = migrator.destination().uploads();
    let sizes: Vec<usize> = uploads.iter().map(|(_, uris)| uris.len()).collect();
    assert_eq!(sizes, vec![100, 100, 50]);
    assert!(uploads.iter().all(|(id, _)| id == "playlist-1"));

    let uploaded: Vec<String> = uploads.into_iter().flat_map(|(_, uris)| uris).collect();
    let expected: Vec<String> = (0..250).map(|i| format!("spotify:track:{}", i)).collect();
    assert_eq!(uploaded, expected);

    assert_eq!(report.uploaded_tracks, 250);
    assert!(report.errors.is_empty());
}

#[tokio::test]
async fn test_search_failure_is_recorded_and_run_continues() {
    let source = FakeSource::new().with_playlist(
        "1",
        "Chill",
        vec![
            SourceTrack::new("Broken Song", "Artist"),
            SourceTrack::new("Good Song", "Artist"),
        ],
    );
    let mut destination = FakeDestination::new()
        .with_track("Broken Song", "Artist", "spotify:track:broken")
        .with_track("Good Song", "Artist", "spotify:track:good");
    destination.broken_queries.push("Broken Song".to_string());

    let migrator = Migrator::new(source, destination, settings("deezer"));
    let report = migrator.run().await.unwrap();

    assert_eq!(
        report.errors.get("chill"),
        Some(&["Artist - Broken Song".to_string()][..])
    );
    assert_eq!(
        migrator.destination().uploads(),
        vec![("playlist-1".to_string(), vec!["spotify:track:good".to_string()])]
    );
}

#[tokio::test]
async fn test_create_failure_aborts_run() {
    let source = FakeSource::new()
        .with_playlist("1", "First", vec![SourceTrack::new("Song", "Artist")])
        .with_playlist("2", "Second", vec![SourceTrack::new("Song", "Artist")]);
    let mut destination = FakeDestination::new().with_track("Song", "Artist", "spotify:track:1");
    destination.fail_create_at = Some(1);

    let migrator = Migrator::new(source, destination, settings("deezer"));
    let err = migrator.run().await.unwrap_err();

    assert!(matches!(err, MigrationError::Upstream { status: Some(403), .. }));
    assert!(migrator.destination().uploads().is_empty());
}

#[tokio::test]
async fn test_second_create_failure_skips_remaining_playlists() {
    let source = FakeSource::new()
        .with_playlist("1", "First", vec![SourceTrack::new("Song", "Artist")])
        .with_playlist("2", "Second", vec![SourceTrack::new("Song", "Artist")])
        .with_playlist("3", "Third", vec![SourceTrack::new("Song", "Artist")]);
    let mut destination = FakeDestination::new().with_track("Song", "Artist", "spotify:track:1");
    destination.fail_create_at = Some(2);

    let migrator = Migrator::new(source, destination, settings("deezer"));
    let err = migrator.run().await.unwrap_err();

    assert!(matches!(err, MigrationError::Upstream { status: Some(403), .. }));
    assert_eq!(migrator.destination().created(), vec!["deezer_first"]);
    assert_eq!(
        migrator.destination().uploads(),
        vec![("playlist-1".to_string(), vec!["spotify:track:1".to_string()])]
    );
    assert_eq!(*migrator.destination().create_calls.lock().unwrap(), 2);
}

#[tokio::test]
async fn test_upload_failure_aborts_run() {
    let long: Vec<SourceTrack> = (0..150)
        .map(|i| SourceTrack::new(format!("Song {}", i), "Artist"))
        .collect();
    let source = FakeSource::new()
        .with_playlist("1", "Long", long)
        .with_playlist("2", "Next", vec![SourceTrack::new("Song 0", "Artist")]);
    let mut destination = FakeDestination::new();
    for i in 0..150 {
        destination = destination.with_track(
            &format!("Song {}", i),
            "Artist",
            &format!("spotify:track:{}", i),
        );
    }
    // first chunk of the first playlist is accepted, the second one fails
    destination.fail_upload_at = Some(2);

    let migrator = Migrator::new(source, destination, settings("deezer"));
    let err = migrator.run().await.unwrap_err();

    assert!(matches!(err, MigrationError::Upstream { status: Some(500), .. }));
    assert_eq!(migrator.destination().created(), vec!["deezer_long"]);

    let uploads = migrator.destination().uploads();
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].1.len(), UPLOAD_CHUNK_SIZE);
    assert_eq!(*migrator.destination().upload_calls.lock().unwrap(), 2);
}

#[tokio::test]
async fn test_source_failure_is_fatal() {
    let mut source = FakeSource::new().with_playlist("1", "First", vec![]);
    source.fail_listing = true;

    let migrator = Migrator::new(source, FakeDestination::new(), settings("deezer"));
    let err = migrator.run().await.unwrap_err();

    assert!(matches!(err, MigrationError::Upstream { service: "deezer", .. }));
    assert!(migrator.destination().created().is_empty());
}

#[tokio::test]
async fn test_empty_playlist_is_still_created() {
    let source = FakeSource::new().with_playlist("1", "Empty", vec![]);

    let migrator = Migrator::new(source, FakeDestination::new(), settings("deezer"));
    let report = migrator.run().await.unwrap();

    assert_eq!(migrator.destination().created(), vec!["deezer_empty"]);
    assert!(migrator.destination().uploads().is_empty());
    assert_eq!(report.playlists, 1);
    assert_eq!(report.uploaded_tracks, 0);
}

#[tokio::test]
async fn test_same_normalized_name_shares_ledger_entry() {
    let source = FakeSource::new()
        .with_playlist("1", "My Mix", vec![SourceTrack::new("Lost", "Nobody")])
        .with_playlist("2", "my mix", vec![SourceTrack::new("Gone", "Nobody")]);

    let migrator = Migrator::new(source, FakeDestination::new(), settings("deezer"));
    let report = migrator.run().await.unwrap();

    assert_eq!(
        migrator.destination().created(),
        vec!["deezer_my_mix", "deezer_my_mix"]
    );
    assert_eq!(report.errors.total(), 2);
    assert_eq!(
        serde_json::to_value(&report.errors).unwrap(),
        json!({"my_mix": ["Nobody - Lost", "Nobody - Gone"], "total": 2})
    );
}

#[test]
fn test_migration_response_shape() {
    let mut errors = ErrorLedger::new();
    errors.record("my_mix", "Artist - Song".to_string());

    let ok = MigrationResponse {
        message: "done".to_string(),
        errors: Some(errors),
    };
    assert_eq!(
        serde_json::to_value(&ok).unwrap(),
        json!({"message": "done", "errors": {"my_mix": ["Artist - Song"], "total": 1}})
    );

    let failed = MigrationResponse {
        message: "Migration failed".to_string(),
        errors: None,
    };
    assert_eq!(
        serde_json::to_value(&failed).unwrap(),
        json!({"message": "Migration failed"})
    );
}
