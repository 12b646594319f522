//! Boxdline Letterboxd - Letterboxd as a paginated source
//!
//! Scrapes watched films, lists, watchlists, filmographies, film pages, and
//! profiles from letterboxd.com HTML, with optional per-film enrichment of
//! IMDb/TMDb ids.
//!
//! # Example
//!
//! ```ignore
//! use boxdline_letterboxd::{Client, Config};
//!
//! let client = Client::new(Config::default())?;
//! let mut stream = client.stream_watched("dave");
//! while let Some(film) = stream.recv().await {
//!     println!("{} ({})", film.title, film.slug);
//! }
//! let summary = stream.finish().await?;
//! ```

pub mod batch;
pub mod client;
pub mod config;
pub mod detail;
pub mod error;
pub mod extract;
pub mod film;
pub mod url;

// Re-exports
pub use batch::{BatchSpec, ListId};
pub use client::{Client, FilmographyOpts, ListOpts};
pub use config::Config;
pub use error::{Error, Result};
pub use extract::PosterGrid;
pub use film::{ExternalIds, Film, User};
pub use url::{Profession, UrlTarget, normalize_url_path};
