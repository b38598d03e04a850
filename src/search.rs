use async_trait::async_trait;

use crate::{
    error::MigrationError,
    matching,
    types::{MatchResult, SearchPage},
};

/// Page cap used when none is configured. Spotify stops serving search
/// results past offset 1000, which is 50 pages of 20 tracks.
pub const DEFAULT_MAX_PAGES: usize = 50;

/// Paginated track search on the destination catalog.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches one page of candidates for `query`. `page` is `None` for the
    /// first page and the token returned as [`SearchPage::next`] afterwards.
    async fn fetch_page(&self, query: &str, page: Option<&str>)
    -> Result<SearchPage, MigrationError>;
}

/// Result of a paginated search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    pub result: MatchResult,
    pub pages: usize,
    /// The page cap ended the search while more pages were available.
    pub capped: bool,
}

/// Walks search result pages for `query_title` until a candidate matches
/// `artist`.
///
/// The result is `MatchResult::NoMatch` once the last page (no next token)
/// has been scanned, or when `max_pages` pages were scanned without a match;
/// the latter sets [`SearchOutcome::capped`]. Page fetch errors are returned
/// as is.
pub async fn search<F>(
    query_title: &str,
    artist: &str,
    fetcher: &F,
    max_pages: usize,
) -> Result<SearchOutcome, MigrationError>
where
    F: PageFetcher + ?Sized,
{
    let mut page_token: Option<String> = None;

    for pages in 1..=max_pages {
        let page = fetcher.fetch_page(query_title, page_token.as_deref()).await?;

        if let found @ MatchResult::Matched(_) = matching::find_best_match(artist, &page.candidates)
        {
            return Ok(SearchOutcome {
                result: found,
                pages,
                capped: false,
            });
        }

        match page.next {
            Some(next) => page_token = Some(next),
            None => {
                return Ok(SearchOutcome {
                    result: MatchResult::NoMatch,
                    pages,
                    capped: false,
                });
            }
        }
    }

    Ok(SearchOutcome {
        result: MatchResult::NoMatch,
        pages: max_pages,
        capped: true,
    })
}
