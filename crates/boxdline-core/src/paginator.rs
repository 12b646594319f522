//! Sequential page collection over an open-ended page range.
//!
//! The total page count is unknown until the first page has been fetched,
//! so a range ending in [`LastPage::All`] is resolved against the
//! `total_pages` declared by that first page. The declared total is trusted
//! for the rest of the run even if the remote changes underneath us.

use std::sync::Arc;

use crate::config::EngineConfig;
use crate::enrich::{EnrichReport, Enricher};
use crate::error::CollectError;
use crate::fetch::PageFetcher;
use crate::pagination::{LastPage, Page, PageRange, Pagination};
use crate::record::{DetailFetcher, Record, Source};

/// A fully materialized collection
#[derive(Debug, Clone)]
pub struct Collection<R> {
    /// Records in page order
    pub records: Vec<R>,
    /// Pagination of the final page fetched; `total_items` is the record count
    pub pagination: Pagination,
}

/// Collects records from paginated sources, optionally enriching each page.
///
/// Cheap to clone; every clone shares the same fetchers and configuration.
pub struct Collector<R: Record> {
    pub(crate) config: Arc<EngineConfig>,
    pub(crate) fetcher: Arc<dyn PageFetcher>,
    pub(crate) enricher: Option<Enricher<R>>,
}

impl<R: Record> Clone for Collector<R> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            fetcher: Arc::clone(&self.fetcher),
            enricher: self.enricher.clone(),
        }
    }
}

impl<R: Record> Collector<R> {
    pub fn new(config: EngineConfig, fetcher: Arc<dyn PageFetcher>) -> Self {
        Self {
            config: Arc::new(config),
            fetcher,
            enricher: None,
        }
    }

    /// Enrich every collected page through `details`
    pub fn with_details(mut self, details: Arc<dyn DetailFetcher<R>>) -> Self {
        self.enricher = Some(Enricher::new(details, self.config.enrich_concurrency));
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Fetch a single site-relative address, no extraction
    pub async fn fetch_path(&self, path: &str) -> Result<String, CollectError> {
        self.fetcher.fetch(&self.config.url_for(path)).await
    }

    /// Run the enricher over records gathered outside of a paginated source
    pub async fn enrich(&self, records: &mut [R]) -> EnrichReport {
        match &self.enricher {
            Some(enricher) => enricher.enrich(records).await,
            None => EnrichReport::default(),
        }
    }

    /// Fetch, extract, and enrich one page of `source`.
    ///
    /// No page ceiling here; only the sequential walk enforces it.
    pub async fn fetch_page(&self, source: &Source<R>, page: u32) -> Result<Page<R>, CollectError> {
        let address = source.page_address(&self.config.base_url, page);
        log::debug!("{}: fetching {address}", source.label);
        let body = self.fetcher.fetch(&address).await?;
        let mut extracted = source.extractor.extract(&body).map_err(|e| match e {
            CollectError::Parse { message, .. } => CollectError::Parse {
                address: address.clone(),
                message,
            },
            other => other,
        })?;

        if let Some(enricher) = &self.enricher {
            let report = enricher.enrich(&mut extracted.records).await;
            if report.failed > 0 {
                log::warn!(
                    "{}: page {page}: {}/{} records left without details",
                    source.label,
                    report.failed,
                    report.attempted
                );
            }
        }
        Ok(extracted)
    }

    /// Iterate pages of `source` within `range`, one at a time.
    pub fn walk<'a>(&'a self, source: &'a Source<R>, range: PageRange) -> PageWalker<'a, R> {
        PageWalker {
            collector: self,
            source,
            next: Some(range.first),
            stop: range.last,
            resolved: false,
        }
    }

    /// Collect every record of `source` within `range`, in page order.
    pub async fn collect(
        &self,
        source: &Source<R>,
        range: PageRange,
    ) -> Result<Collection<R>, CollectError> {
        let mut walker = self.walk(source, range);
        let mut records = Vec::new();
        let mut pagination = Pagination::single_page();
        while let Some(page) = walker.next().await {
            let page = page?;
            pagination = page.pagination;
            records.extend(page.records);
        }
        pagination.total_items = records.len();
        log::debug!(
            "{}: collected {} records through page {}",
            source.label,
            records.len(),
            pagination.current_page
        );
        Ok(Collection {
            records,
            pagination,
        })
    }

    /// [`collect`](Self::collect) with a raw `(first, last)` pair, -1 meaning "all".
    pub async fn collect_range(
        &self,
        source: &Source<R>,
        first: i64,
        last: i64,
    ) -> Result<Collection<R>, CollectError> {
        let range = PageRange::normalize(first, last)?;
        self.collect(source, range).await
    }
}

/// Sequential walk over the pages of one source.
///
/// Stops after the page that reports `is_last`, after the resolved stop
/// page, on the first error, or with a fatal
/// [`CollectError::PageCeilingExceeded`] before fetching a page past
/// `page_ceiling`.
pub struct PageWalker<'a, R: Record> {
    collector: &'a Collector<R>,
    source: &'a Source<R>,
    next: Option<u32>,
    stop: LastPage,
    resolved: bool,
}

impl<R: Record> PageWalker<'_, R> {
    /// Next page, or `None` once the walk is over.
    pub async fn next(&mut self) -> Option<Result<Page<R>, CollectError>> {
        let page_no = self.next?;
        let ceiling = self.collector.config.page_ceiling;
        if page_no > ceiling {
            log::error!(
                "{}: page {page_no} exceeds ceiling of {ceiling}",
                self.source.label
            );
            self.next = None;
            return Some(Err(CollectError::PageCeilingExceeded {
                page: page_no,
                ceiling,
            }));
        }
        let page = match self.collector.fetch_page(self.source, page_no).await {
            Ok(page) => page,
            Err(e) => {
                self.next = None;
                return Some(Err(e));
            }
        };

        if !self.resolved {
            self.resolved = true;
            if self.stop == LastPage::All {
                self.stop = LastPage::Page(page.pagination.total_pages);
            }
        }

        let reached_stop = matches!(self.stop, LastPage::Page(stop) if page_no >= stop);
        self.next = if page.pagination.is_last || reached_stop {
            None
        } else {
            Some(page_no + 1)
        };
        Some(Ok(page))
    }
}
