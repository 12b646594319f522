//! External id lookup for enrichment

use std::sync::Arc;

use async_trait::async_trait;
use boxdline_core::{CollectError, DetailFetcher, PageFetcher};
use scraper::Html;

use crate::extract::extract_external_ids;
use crate::film::{ExternalIds, Film};

/// Fetches a film page and reads its IMDb/TMDb links
pub struct FilmDetails {
    fetcher: Arc<dyn PageFetcher>,
    base_url: String,
}

impl FilmDetails {
    pub fn new(fetcher: Arc<dyn PageFetcher>, base_url: impl Into<String>) -> Self {
        Self {
            fetcher,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl DetailFetcher<Film> for FilmDetails {
    async fn fetch_detail(&self, address: &str) -> Result<ExternalIds, CollectError> {
        if address.is_empty() {
            return Err(CollectError::parse("", "film has no target link"));
        }
        let body = self.fetcher.fetch(&format!("{}{address}", self.base_url)).await?;
        extract_external_ids(&Html::parse_document(&body))
    }
}
