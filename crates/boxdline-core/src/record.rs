//! Records, extractors, and addressable sources

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::CollectError;
use crate::pagination::Page;

/// A collected entity that can be enriched by a second fetch.
pub trait Record: Send + Sync + 'static {
    /// Extra fields filled in by the enricher
    type Detail: Send + 'static;

    /// Stable identifier
    fn id(&self) -> &str;

    /// Site-relative address of the detail page
    fn detail_address(&self) -> &str;

    fn attach_detail(&mut self, detail: Self::Detail);

    fn has_detail(&self) -> bool;
}

/// Turns one page body into records plus pagination.
///
/// Implementations must treat missing pagination markup as a single
/// complete page rather than an error.
pub trait Extractor<R>: Send + Sync {
    fn extract(&self, body: &str) -> Result<Page<R>, CollectError>;
}

/// Fetches the detail payload for one record.
#[async_trait]
pub trait DetailFetcher<R: Record>: Send + Sync {
    async fn fetch_detail(&self, address: &str) -> Result<R::Detail, CollectError>;
}

/// A named paginated source: `{base}{path}/page/{n}/` for n = 1, 2, ...
pub struct Source<R> {
    pub label: String,
    pub path: String,
    pub extractor: Arc<dyn Extractor<R>>,
}

impl<R> Source<R> {
    pub fn new(
        label: impl Into<String>,
        path: impl Into<String>,
        extractor: Arc<dyn Extractor<R>>,
    ) -> Self {
        Self {
            label: label.into(),
            path: path.into().trim_end_matches('/').to_string(),
            extractor,
        }
    }

    /// Absolute address of page `page`
    pub fn page_address(&self, base_url: &str, page: u32) -> String {
        format!("{base_url}{}/page/{page}/", self.path)
    }
}

impl<R> Clone for Source<R> {
    fn clone(&self) -> Self {
        Self {
            label: self.label.clone(),
            path: self.path.clone(),
            extractor: Arc::clone(&self.extractor),
        }
    }
}

impl<R> fmt::Debug for Source<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Source")
            .field("label", &self.label)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::Pagination;

    struct Empty;

    impl Extractor<String> for Empty {
        fn extract(&self, _body: &str) -> Result<Page<String>, CollectError> {
            Ok(Page {
                records: Vec::new(),
                pagination: Pagination::single_page(),
            })
        }
    }

    #[test]
    fn page_address_format() {
        let source: Source<String> = Source::new("watched:dave", "/dave/films/", Arc::new(Empty));
        assert_eq!(source.path, "/dave/films");
        assert_eq!(
            source.page_address("https://letterboxd.com", 3),
            "https://letterboxd.com/dave/films/page/3/"
        );
    }

    #[test]
    fn clone_shares_extractor() {
        let source: Source<String> = Source::new("x", "/x", Arc::new(Empty));
        let copy = source.clone();
        assert!(Arc::ptr_eq(&source.extractor, &copy.extractor));
        assert!(format!("{copy:?}").contains("label"));
    }
}
