//! Incremental record streaming.
//!
//! A stream walks its source in three phases:
//!
//! 1. Seed: page 1, fetched and pushed first. Its pagination fixes
//!    `total_pages` and its record count is taken as the full-page size.
//! 2. Tail: the last page (usually partial), when there is more than one.
//! 3. Fan-out: one task per page in `2..total_pages`, all concurrent. Each
//!    task pushes its records as soon as they are ready, so middle pages
//!    arrive in no particular order.
//!
//! Seed and tail failures abort the stream. A failed fan-out page is
//! logged, recorded in [`StreamSummary::failed_pages`], and skipped.
//!
//! Every page the seed declares is fetched. The page ceiling only bounds
//! sequential walks, where the total is not known up front.

use serde::Serialize;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinSet;

use crate::error::CollectError;
use crate::pagination::Pagination;
use crate::paginator::Collector;
use crate::record::{Record, Source};

/// Completion report of a single-source stream
#[derive(Debug, Clone, Default, Serialize)]
pub struct StreamSummary {
    pub label: String,
    /// `total_items` is an estimate: seed + tail + full-size middle pages
    pub pagination: Pagination,
    pub records_emitted: usize,
    /// Fan-out pages dropped after a fetch or parse failure
    pub failed_pages: Vec<u32>,
    /// The consumer went away before the stream finished
    pub interrupted: bool,
}

impl StreamSummary {
    fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            ..Default::default()
        }
    }

    pub fn log(&self) {
        log::info!(
            "{}: {} records from {} pages (estimated {}), {} pages dropped",
            self.label,
            self.records_emitted,
            self.pagination.total_pages,
            self.pagination.total_items,
            self.failed_pages.len()
        );
    }
}

/// Consumer side of a stream: a record channel plus one completion value.
///
/// Drain with [`recv`](Self::recv) until it returns `None`, then call
/// [`finish`](Self::finish). Dropping the handle early makes the producers
/// stop at their next send.
pub struct StreamHandle<R, S> {
    records: mpsc::Receiver<R>,
    done: oneshot::Receiver<Result<S, CollectError>>,
}

/// Producer side of a [`StreamHandle`]
pub(crate) struct StreamSink<R, S> {
    pub(crate) records: mpsc::Sender<R>,
    pub(crate) done: oneshot::Sender<Result<S, CollectError>>,
}

impl<R, S> StreamHandle<R, S> {
    pub(crate) fn channel(capacity: usize) -> (StreamSink<R, S>, Self) {
        let (records_tx, records_rx) = mpsc::channel(capacity.max(1));
        let (done_tx, done_rx) = oneshot::channel();
        (
            StreamSink {
                records: records_tx,
                done: done_tx,
            },
            Self {
                records: records_rx,
                done: done_rx,
            },
        )
    }

    /// Next record; `None` once every producer has finished.
    pub async fn recv(&mut self) -> Option<R> {
        self.records.recv().await
    }

    /// Wait for the completion signal.
    ///
    /// Records not yet received are discarded and producers still running
    /// are told to stop.
    pub async fn finish(self) -> Result<S, CollectError> {
        let Self { records, done } = self;
        drop(records);
        done.await.unwrap_or_else(|_| {
            Err(CollectError::Aborted(
                "producer dropped its completion signal".to_string(),
            ))
        })
    }

    /// Drain the whole stream into memory.
    pub async fn collect_all(mut self) -> Result<(Vec<R>, S), CollectError> {
        let mut out = Vec::new();
        while let Some(record) = self.recv().await {
            out.push(record);
        }
        let summary = self.finish().await?;
        Ok((out, summary))
    }
}

/// Push records in order; `Err(sent)` when the receiver has gone away.
pub(crate) async fn send_all<R>(tx: &mpsc::Sender<R>, records: Vec<R>) -> Result<usize, usize> {
    let mut sent = 0;
    for record in records {
        if tx.send(record).await.is_err() {
            return Err(sent);
        }
        sent += 1;
    }
    Ok(sent)
}

enum PageOutcome {
    Sent(usize),
    Failed(u32),
    Closed(usize),
}

impl<R: Record> Collector<R> {
    /// Stream every record of `source` as pages complete.
    ///
    /// Must be called within a tokio runtime.
    pub fn stream(&self, source: Source<R>) -> StreamHandle<R, StreamSummary> {
        let (sink, handle) = StreamHandle::channel(self.config.channel_capacity);
        let collector = self.clone();
        tokio::spawn(async move {
            let result = collector.run_stream(&source, sink.records).await;
            if let Ok(summary) = &result {
                summary.log();
            }
            // Receiver may already be gone; nothing left to tell it
            let _ = sink.done.send(result);
        });
        handle
    }

    /// Seed, tail, and fan-out phases for one source, pushing into `tx`.
    ///
    /// Returns after every dispatched page task has finished; `tx` and all
    /// its clones are dropped by then.
    pub(crate) async fn run_stream(
        &self,
        source: &Source<R>,
        tx: mpsc::Sender<R>,
    ) -> Result<StreamSummary, CollectError> {
        let mut summary = StreamSummary::new(&source.label);

        // Seed
        let first = self.fetch_page(source, 1).await?;
        let mut pagination = first.pagination;
        let per_page = first.records.len();
        pagination.total_items = per_page;
        summary.pagination = pagination;
        let total_pages = pagination.total_pages;
        log::debug!(
            "{}: seed page has {per_page} records, {total_pages} pages total",
            source.label
        );
        match send_all(&tx, first.records).await {
            Ok(n) => summary.records_emitted += n,
            Err(n) => return Ok(interrupted(summary, n)),
        }

        // Tail
        if total_pages > 1 {
            let last = self.fetch_page(source, total_pages).await?;
            pagination.total_items += last.records.len();
            summary.pagination = pagination;
            match send_all(&tx, last.records).await {
                Ok(n) => summary.records_emitted += n,
                Err(n) => return Ok(interrupted(summary, n)),
            }
        }

        // Fan-out
        if total_pages > 2 {
            pagination.total_items += (total_pages as usize - 2) * per_page;
            summary.pagination = pagination;

            let mut tasks = JoinSet::new();
            for page in 2..total_pages {
                let collector = self.clone();
                let source = source.clone();
                let tx = tx.clone();
                tasks.spawn(async move {
                    match collector.fetch_page(&source, page).await {
                        Ok(extracted) => match send_all(&tx, extracted.records).await {
                            Ok(n) => PageOutcome::Sent(n),
                            Err(n) => PageOutcome::Closed(n),
                        },
                        Err(e) => {
                            log::warn!("{}: failed to extract page {page}: {e}", source.label);
                            PageOutcome::Failed(page)
                        }
                    }
                });
            }
            drop(tx);

            while let Some(joined) = tasks.join_next().await {
                match joined {
                    Ok(PageOutcome::Sent(n)) => summary.records_emitted += n,
                    Ok(PageOutcome::Failed(page)) => summary.failed_pages.push(page),
                    Ok(PageOutcome::Closed(n)) => {
                        summary.records_emitted += n;
                        summary.interrupted = true;
                    }
                    Err(e) => log::error!("{}: page task died: {e}", source.label),
                }
            }
            summary.failed_pages.sort_unstable();
        }

        Ok(summary)
    }
}

fn interrupted(mut summary: StreamSummary, sent: usize) -> StreamSummary {
    log::debug!("{}: consumer went away, stopping", summary.label);
    summary.records_emitted += sent;
    summary.interrupted = true;
    summary
}
