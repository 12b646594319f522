//! Error taxonomy for page collection

/// Coarse classification of a transport failure, derived from the HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    /// 429: the remote is throttling us
    RateLimited,
    /// 404
    NotFound,
    /// Any other status, or no status at all (connect/read failure)
    Other,
}

impl TransportKind {
    pub fn from_status(status: Option<u16>) -> Self {
        match status {
            Some(429) => Self::RateLimited,
            Some(404) => Self::NotFound,
            _ => Self::Other,
        }
    }
}

/// Error from collecting, extracting, or enriching pages.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CollectError {
    /// Bad page range, rejected before any fetch
    #[error("invalid page range {first}..{last}: last page must be greater than first page")]
    InvalidRange { first: i64, last: i64 },

    #[error("{message}")]
    Transport {
        kind: TransportKind,
        status: Option<u16>,
        message: String,
    },

    /// The extractor could not interpret a page
    #[error("parse error at {address}: {message}")]
    Parse { address: String, message: String },

    /// Runaway pagination. Fatal: callers must not continue past it.
    #[error("page {page} is beyond the safety ceiling of {ceiling} pages")]
    PageCeilingExceeded { page: u32, ceiling: u32 },

    /// Per-record detail fetch failure. Logged and swallowed by the enricher.
    #[error("enrichment failed for {address}: {message}")]
    Enrichment { address: String, message: String },

    /// A producer task went away without delivering its completion signal
    #[error("stream ended without completion: {0}")]
    Aborted(String),
}

impl CollectError {
    /// Build a transport error from an HTTP status, using the same wording
    /// for rate limiting and missing entries everywhere.
    pub fn from_status(status: u16) -> Self {
        let kind = TransportKind::from_status(Some(status));
        let message = match kind {
            TransportKind::RateLimited => {
                "too many requests. Check rate limit and make sure the user agent is set right"
                    .to_string()
            }
            TransportKind::NotFound => {
                "that entry was not found, are you sure it exists?".to_string()
            }
            TransportKind::Other => format!("error, status code: {status}"),
        };
        Self::Transport {
            kind,
            status: Some(status),
            message,
        }
    }

    /// Create transport error from reqwest error
    pub fn from_reqwest(e: &reqwest::Error) -> Self {
        let status = e.status().map(|s| s.as_u16());
        Self::Transport {
            kind: TransportKind::from_status(status),
            status,
            message: e.to_string(),
        }
    }

    pub fn parse(address: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Parse {
            address: address.into(),
            message: message.to_string(),
        }
    }

    /// Only the page ceiling breach is fatal to the whole run.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::PageCeilingExceeded { .. })
    }

    pub fn transport_kind(&self) -> Option<TransportKind> {
        match self {
            Self::Transport { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}
