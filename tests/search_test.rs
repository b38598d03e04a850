use std::sync::Mutex;

use async_trait::async_trait;
use deezify::error::MigrationError;
use deezify::search::{PageFetcher, search};
use deezify::types::{CandidateTrack, MatchResult, SearchPage};

/// Serves canned pages; page `n` links to `n + 1` until the last one.
struct FakeFetcher {
    pages: Vec<Vec<CandidateTrack>>,
    endless: bool,
    fail_on: Option<usize>,
    requests: Mutex<Vec<Option<String>>>,
}

impl FakeFetcher {
    fn new(pages: Vec<Vec<CandidateTrack>>) -> Self {
        Self {
            pages,
            endless: false,
            fail_on: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl PageFetcher for FakeFetcher {
    async fn fetch_page(
        &self,
        _query: &str,
        page: Option<&str>,
    ) -> Result<SearchPage, MigrationError> {
        let index = match page {
            None => 0,
            Some(token) => token.parse::<usize>().unwrap(),
        };
        self.requests.lock().unwrap().push(page.map(str::to_string));

        if self.fail_on == Some(index) {
            return Err(MigrationError::upstream("spotify", Some(503), "unavailable"));
        }

        let candidates = self.pages.get(index).cloned().unwrap_or_default();
        let has_next = self.endless || index + 1 < self.pages.len();

        Ok(SearchPage {
            candidates,
            next: has_next.then(|| (index + 1).to_string()),
        })
    }
}

fn candidate(artist: &str, uri: &str) -> CandidateTrack {
    CandidateTrack {
        name: "Song".to_string(),
        artists: vec![artist.to_string()],
        uri: uri.to_string(),
    }
}

#[tokio::test]
async fn test_match_on_first_page_stops_paging() {
    let fetcher = FakeFetcher::new(vec![
        vec![candidate("Stromae", "spotify:track:1")],
        vec![candidate("Stromae", "spotify:track:2")],
    ]);

    let outcome = search("Song", "Stromae", &fetcher, 50).await.unwrap();
    let result = outcome.result;

    match result {
        MatchResult::Matched(track) => assert_eq!(track.uri, "spotify:track:1"),
        MatchResult::NoMatch => panic!("expected a match"),
    }
    assert_eq!(fetcher.request_count(), 1);
}

#[tokio::test]
async fn test_match_on_later_page_follows_next_tokens() {
    let fetcher = FakeFetcher::new(vec![
        vec![candidate("Someone", "spotify:track:a")],
        vec![candidate("Other", "spotify:track:b")],
        vec![candidate("Stromae", "spotify:track:c")],
    ]);

    let outcome = search("Song", "Stromae", &fetcher, 50).await.unwrap();
    let result = outcome.result;

    assert_eq!(
        result,
        MatchResult::Matched(deezify::types::MatchedTrack {
            artist: "Stromae".to_string(),
            name: "Song".to_string(),
            uri: "spotify:track:c".to_string(),
        })
    );
    assert_eq!(
        *fetcher.requests.lock().unwrap(),
        vec![None, Some("1".to_string()), Some("2".to_string())]
    );
}

#[tokio::test]
async fn test_no_match_after_last_page() {
    let fetcher = FakeFetcher::new(vec![
        vec![candidate("Someone", "spotify:track:a")],
        vec![candidate("Other", "spotify:track:b")],
    ]);

    let outcome = search("Song", "Stromae", &fetcher, 50).await.unwrap();
    let result = outcome.result;

    assert_eq!(result, MatchResult::NoMatch);
    assert!(!outcome.capped);
    assert_eq!(outcome.pages, 2);
    assert_eq!(fetcher.request_count(), 2);
}

#[tokio::test]
async fn test_empty_result_is_no_match() {
    let fetcher = FakeFetcher::new(vec![]);
    let outcome = search("Song", "Stromae", &fetcher, 50).await.unwrap();
    let result = outcome.result;

    assert_eq!(result, MatchResult::NoMatch);
    assert_eq!(fetcher.request_count(), 1);
}

#[tokio::test]
async fn test_page_cap_ends_endless_results() {
    let mut fetcher = FakeFetcher::new(vec![vec![candidate("Someone", "spotify:track:a")]]);
    fetcher.endless = true;

    let outcome = search("Song", "Stromae", &fetcher, 3).await.unwrap();

    assert_eq!(outcome.result, MatchResult::NoMatch);
    assert!(outcome.capped);
    assert_eq!(outcome.pages, 3);
    assert_eq!(fetcher.request_count(), 3);
}

#[tokio::test]
async fn test_fetch_error_is_propagated() {
    let mut fetcher = FakeFetcher::new(vec![
        vec![candidate("Someone", "spotify:track:a")],
        vec![candidate("Stromae", "spotify:track:b")],
    ]);
    fetcher.fail_on = Some(1);

    let err = search("Song", "Stromae", &fetcher, 50).await.unwrap_err();

    assert!(matches!(
        err,
        MigrationError::Upstream {
            status: Some(503),
            ..
        }
    ));
}

#[tokio::test]
async fn test_last_page_at_cap_is_not_reported_as_capped() {
    let fetcher = FakeFetcher::new(vec![
        vec![candidate("Someone", "spotify:track:a")],
        vec![candidate("Other", "spotify:track:b")],
    ]);

    let outcome = search("Song", "Stromae", &fetcher, 2).await.unwrap();

    assert_eq!(outcome.result, MatchResult::NoMatch);
    assert!(!outcome.capped);
}
