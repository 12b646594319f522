//! Merge of several independent sources into one stream

use serde::Serialize;
use tokio::task::JoinSet;

use crate::error::CollectError;
use crate::paginator::Collector;
use crate::record::{Record, Source};
use crate::stream::{StreamHandle, StreamSummary};

/// Completion report of a batch stream
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchSummary {
    /// Sources that completed, in completion order
    pub sources: Vec<StreamSummary>,
    /// `(label, error)` for every source that aborted
    pub failed_sources: Vec<(String, String)>,
}

impl BatchSummary {
    pub fn records_emitted(&self) -> usize {
        self.sources.iter().map(|s| s.records_emitted).sum()
    }

    pub fn log(&self) {
        log::info!("=== Batch Summary ===");
        log::info!(
            "Sources: {} completed, {} failed",
            self.sources.len(),
            self.failed_sources.len()
        );
        log::info!("Records: {}", self.records_emitted());
        for (label, error) in &self.failed_sources {
            log::warn!("{label}: {error}");
        }
    }
}

impl<R: Record> Collector<R> {
    /// Stream all `sources` concurrently into one channel.
    ///
    /// Each source runs its own stream (with its own enrichment cap). The
    /// completion value is the first per-source error, if any, and is only
    /// delivered once every source has finished; a failing source does not
    /// stop its siblings. No ordering holds across sources.
    ///
    /// Must be called within a tokio runtime.
    pub fn stream_batch(&self, sources: Vec<Source<R>>) -> StreamHandle<R, BatchSummary> {
        let (sink, handle) = StreamHandle::channel(self.config.channel_capacity);
        let collector = self.clone();
        tokio::spawn(async move {
            log::debug!("batch: starting {} sources", sources.len());
            let mut tasks = JoinSet::new();
            for source in sources {
                let collector = collector.clone();
                let tx = sink.records.clone();
                tasks.spawn(async move {
                    let result = collector.run_stream(&source, tx).await;
                    (source.label, result)
                });
            }
            drop(sink.records);

            let mut summary = BatchSummary::default();
            let mut first_error = None;
            while let Some(joined) = tasks.join_next().await {
                match joined {
                    Ok((_, Ok(stream))) => {
                        stream.log();
                        summary.sources.push(stream);
                    }
                    Ok((label, Err(e))) => {
                        log::error!("{label}: stream aborted: {e}");
                        summary.failed_sources.push((label, e.to_string()));
                        first_error.get_or_insert(e);
                    }
                    Err(e) => {
                        log::error!("batch: source task died: {e}");
                        first_error.get_or_insert(CollectError::Aborted(e.to_string()));
                    }
                }
            }
            summary.log();

            let result = match first_error {
                Some(e) => Err(e),
                None => Ok(summary),
            };
            let _ = sink.done.send(result);
        });
        handle
    }
}
