//! Bounded fan-out of per-record detail fetches.
//!
//! Each [`Enricher::enrich`] call gets its own counting semaphore, so two
//! concurrent streams each run up to `concurrency` fetches; caps are not
//! pooled across calls.

use std::sync::Arc;

use futures_util::future::join_all;
use tokio::sync::Semaphore;

use crate::error::CollectError;
use crate::record::{DetailFetcher, Record};

/// Outcome of one enrichment pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichReport {
    pub attempted: usize,
    pub enriched: usize,
    pub failed: usize,
}

/// Fills in each record's detail payload with a second fetch.
pub struct Enricher<R: Record> {
    fetcher: Arc<dyn DetailFetcher<R>>,
    concurrency: usize,
}

impl<R: Record> Clone for Enricher<R> {
    fn clone(&self) -> Self {
        Self {
            fetcher: Arc::clone(&self.fetcher),
            concurrency: self.concurrency,
        }
    }
}

impl<R: Record> Enricher<R> {
    pub fn new(fetcher: Arc<dyn DetailFetcher<R>>, concurrency: usize) -> Self {
        Self {
            fetcher,
            concurrency: concurrency.max(1),
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Enrich every record in place.
    ///
    /// Returns once all dispatched fetches have finished. A failed fetch
    /// leaves its record without a payload; records are never removed.
    pub async fn enrich(&self, records: &mut [R]) -> EnrichReport {
        let permits = Semaphore::new(self.concurrency);
        let fetches = records.iter_mut().map(|record| {
            let permits = &permits;
            async move {
                // The semaphore is local and never closed
                let Ok(_permit) = permits.acquire().await else {
                    return false;
                };
                let address = record.detail_address().to_string();
                match self.fetcher.fetch_detail(&address).await {
                    Ok(detail) => {
                        record.attach_detail(detail);
                        true
                    }
                    Err(e) => {
                        let e = CollectError::Enrichment {
                            address,
                            message: e.to_string(),
                        };
                        log::warn!("{}: {e}", record.id());
                        false
                    }
                }
            }
        });
        let outcomes = join_all(fetches).await;

        let enriched = outcomes.iter().filter(|ok| **ok).count();
        EnrichReport {
            attempted: outcomes.len(),
            enriched,
            failed: outcomes.len() - enriched,
        }
    }
}
