use crate::{MoodError, types::SearchResponse};

use super::CatalogClient;

pub const SEARCH_TYPES: &str = "artist,track";
pub const DEFAULT_SEARCH_LIMIT: u32 = 3;

impl CatalogClient {
    /// Searches the catalog for artists and tracks.
    ///
    /// Calls `GET /search?q=..&type=artist,track&limit=N&market=..` with the
    /// client's configured market.
    ///
    /// # Arguments
    ///
    /// * `query` - Free-text search terms
    /// * `limit` - Maximum number of results per type
    ///
    /// # Errors
    ///
    /// Propagates the errors of [`CatalogClient::request`].
    pub async fn search(&self, query: &str, limit: u32) -> Result<SearchResponse, MoodError> {
        let params = [
            ("q", query.to_string()),
            ("type", SEARCH_TYPES.to_string()),
            ("limit", limit.to_string()),
            ("market", self.market().to_string()),
        ];

        self.get("/search", &params).await
    }
}
