use async_trait::async_trait;

use crate::{
    error::MigrationError,
    search::PageFetcher,
    spotify::client::{SpotifyClient, check},
    types::{SearchPage, SearchResponse},
    utils::decode_response,
};

/// Results per search page.
pub const SEARCH_PAGE_SIZE: u32 = 20;

#[async_trait]
impl PageFetcher for SpotifyClient {
    /// Searches tracks by title only; the artist is checked by the matcher.
    /// Later pages are fetched from the absolute `next` URL Spotify returns.
    async fn fetch_page(
        &self,
        query: &str,
        page: Option<&str>,
    ) -> Result<SearchPage, MigrationError> {
        let request = match page {
            Some(next) => self.authorized(|http| http.get(next)).await?,
            None => {
                let url = self.url("/search");
                let limit = SEARCH_PAGE_SIZE.to_string();
                self.authorized(|http| {
                    http.get(&url).query(&[
                        ("q", query),
                        ("type", "track"),
                        ("limit", limit.as_str()),
                    ])
                })
                .await?
            }
        };

        let response = check(request.send().await?).await?;
        let body: SearchResponse = decode_response("spotify", response).await?;

        Ok(SearchPage {
            candidates: body.tracks.items.into_iter().map(Into::into).collect(),
            next: body.tracks.next,
        })
    }
}
