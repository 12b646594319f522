//! Boxdline Core - paginated collection and enrichment engine
//!
//! Walks paginated remote sources page by page, optionally enriches each
//! record with a second fetch, and streams the results incrementally.
//! Several sources can be merged into a single stream.

pub mod batch;
pub mod config;
pub mod enrich;
pub mod error;
pub mod fetch;
pub mod logging;
pub mod pagination;
pub mod paginator;
pub mod progress;
pub mod record;
pub mod shutdown;
pub mod stream;

// Re-exports for convenience
pub use batch::BatchSummary;
pub use config::{EngineConfig, HttpConfig};
pub use enrich::{EnrichReport, Enricher};
pub use error::{CollectError, TransportKind};
pub use fetch::{HttpFetcher, PageFetcher};
pub use logging::{IndicatifLogger, init_logging};
pub use pagination::{LastPage, Page, PageRange, Pagination};
pub use paginator::{Collection, Collector, PageWalker};
pub use progress::{ProgressContext, SharedProgress, fmt_num};
pub use record::{DetailFetcher, Extractor, Record, Source};
pub use shutdown::{install_signal_handlers, is_shutdown_requested, request_shutdown, shutdown_flag};
pub use stream::{StreamHandle, StreamSummary};
