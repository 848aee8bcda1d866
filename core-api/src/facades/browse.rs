use std::sync::Arc;

use crate::descriptor::RequestDescriptor;
use crate::error::Result;
use crate::models::{
    AutocompleteQuery, AutocompleteResult, BrowseQuery, BrowseResult, DrivesResult, SearchQuery,
    SearchResult,
};
use crate::transport::ApiClient;

/// Server-side directory browsing for the path pickers
#[derive(Debug, Clone)]
pub struct BrowseApi {
    client: Arc<ApiClient>,
}

impl BrowseApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// List a directory. Called on every click in the picker, so no overlay.
    pub async fn browse(&self, query: &BrowseQuery) -> Result<BrowseResult> {
        let request = RequestDescriptor::get("/browse/")
            .query_from(query)?
            .with_loading(false);
        self.client.request(request).await
    }

    pub async fn search(&self, query: &SearchQuery) -> Result<SearchResult> {
        let request = RequestDescriptor::get("/browse/search").query_from(query)?;
        self.client.request(request).await
    }

    /// Path suggestions while typing; runs without the overlay.
    pub async fn autocomplete(&self, query: &AutocompleteQuery) -> Result<AutocompleteResult> {
        let request = RequestDescriptor::get("/browse/autocomplete")
            .query_from(query)?
            .with_loading(false);
        self.client.request(request).await
    }

    pub async fn get_drives(&self) -> Result<DrivesResult> {
        self.client.get("/browse/drives").await
    }
}
