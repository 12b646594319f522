//! Errors surfaced by the Letterboxd client

use boxdline_core::CollectError;

#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Collect(#[from] CollectError),

    /// Absolute URL pointing somewhere other than letterboxd.com
    #[error("not a letterboxd url: {0}")]
    ForeignUrl(String),

    #[error("invalid url {url}: {message}")]
    InvalidUrl { url: String, message: String },

    /// Well-formed path that matches no known collection
    #[error("unsupported url: {0}")]
    UnsupportedUrl(String),

    #[error("invalid list id {0:?}, expected user/slug")]
    InvalidListId(String),

    #[error("invalid profession {0:?}, expected one of actor, director, producer, writer")]
    InvalidProfession(String),

    #[error("{0} is required")]
    Missing(&'static str),
}

impl Error {
    /// True when the run must stop immediately
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Collect(e) if e.is_fatal())
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
