//! Letterboxd collections on top of the paginated engine

use std::sync::Arc;

use boxdline_core::{
    BatchSummary, CollectError, Collection, Collector, HttpFetcher, PageFetcher, PageRange,
    Source, StreamHandle, StreamSummary,
};

use crate::batch::{BatchSpec, ListId};
use crate::config::Config;
use crate::detail::FilmDetails;
use crate::error::{Error, Result};
use crate::extract::{self, PosterGrid};
use crate::film::{Film, User};
use crate::url::{Profession, UrlTarget, normalize_url_path};

/// Page range of a single list
#[derive(Debug, Clone)]
pub struct ListOpts {
    pub list: ListId,
    pub first_page: i64,
    /// `-1` for every remaining page
    pub last_page: i64,
}

impl ListOpts {
    /// Every page of `list`
    pub fn all(list: ListId) -> Self {
        Self {
            list,
            first_page: 1,
            last_page: -1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FilmographyOpts {
    pub person: String,
    pub profession: Profession,
}

impl FilmographyOpts {
    pub fn new(person: impl Into<String>, profession: &str) -> Result<Self> {
        let opts = Self {
            person: person.into(),
            profession: profession.parse()?,
        };
        opts.validate()?;
        Ok(opts)
    }

    pub fn validate(&self) -> Result<()> {
        if self.person.trim().is_empty() {
            return Err(Error::Missing("person"));
        }
        Ok(())
    }

    fn path(&self) -> String {
        format!("/{}/{}/", self.profession, self.person)
    }
}

/// Pin extractor errors to the page they came from
fn at_path(path: &str, e: CollectError) -> Error {
    match e {
        CollectError::Parse { message, .. } => CollectError::Parse {
            address: path.to_string(),
            message,
        }
        .into(),
        other => other.into(),
    }
}

fn require(value: &str, what: &'static str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::Missing(what));
    }
    Ok(())
}

/// Entry point for every Letterboxd operation.
///
/// Cheap to clone. Stream operations spawn onto the current tokio runtime.
#[derive(Clone)]
pub struct Client {
    collector: Collector<Film>,
}

impl Client {
    /// Client over a real HTTP fetcher
    pub fn new(config: Config) -> Result<Self> {
        let fetcher = HttpFetcher::new(&config.engine.http)?;
        Ok(Self::with_fetcher(config, Arc::new(fetcher)))
    }

    /// Client over any page fetcher
    pub fn with_fetcher(config: Config, fetcher: Arc<dyn PageFetcher>) -> Self {
        let details = FilmDetails::new(Arc::clone(&fetcher), config.engine.base_url.clone());
        let mut collector = Collector::new(config.engine, fetcher);
        if config.enrich {
            collector = collector.with_details(Arc::new(details));
        }
        Self { collector }
    }

    pub fn collector(&self) -> &Collector<Film> {
        &self.collector
    }

    fn grid(label: String, path: String) -> Source<Film> {
        Source::new(label, path, Arc::new(PosterGrid))
    }

    pub fn watched_source(user: &str) -> Source<Film> {
        Self::grid(format!("watched:{user}"), format!("/{user}/films"))
    }

    pub fn list_source(list: &ListId) -> Source<Film> {
        Self::grid(
            format!("list:{list}"),
            format!("/{}/list/{}", list.user, list.slug),
        )
    }

    pub fn watchlist_source(user: &str) -> Source<Film> {
        Self::grid(format!("watchlist:{user}"), format!("/{user}/watchlist"))
    }

    /// Labelled sources for a batch: watched films, then lists, then watchlists
    pub fn batch_sources(spec: &BatchSpec) -> Vec<Source<Film>> {
        let watched = spec.watched.iter().map(|u| Self::watched_source(u));
        let lists = spec.lists.iter().map(Self::list_source);
        let watchlists = spec.watchlists.iter().map(|u| Self::watchlist_source(u));
        watched.chain(lists).chain(watchlists).collect()
    }

    /// Every film `user` has watched
    pub async fn watched(&self, user: &str) -> Result<Collection<Film>> {
        require(user, "username")?;
        let source = Self::watched_source(user);
        Ok(self.collector.collect(&source, PageRange::ALL).await?)
    }

    pub fn stream_watched(&self, user: &str) -> StreamHandle<Film, StreamSummary> {
        self.collector.stream(Self::watched_source(user))
    }

    /// Films on the requested pages of a list
    pub async fn list(&self, opts: &ListOpts) -> Result<Collection<Film>> {
        require(&opts.list.user, "username")?;
        require(&opts.list.slug, "list slug")?;
        let source = Self::list_source(&opts.list);
        Ok(self
            .collector
            .collect_range(&source, opts.first_page, opts.last_page)
            .await?)
    }

    pub fn stream_list(&self, list: &ListId) -> StreamHandle<Film, StreamSummary> {
        self.collector.stream(Self::list_source(list))
    }

    pub async fn watchlist(&self, user: &str) -> Result<Collection<Film>> {
        require(user, "username")?;
        let source = Self::watchlist_source(user);
        Ok(self.collector.collect(&source, PageRange::ALL).await?)
    }

    pub fn stream_watchlist(&self, user: &str) -> StreamHandle<Film, StreamSummary> {
        self.collector.stream(Self::watchlist_source(user))
    }

    /// One stream over every source in `spec`. No ordering across sources.
    pub fn stream_batch(&self, spec: &BatchSpec) -> StreamHandle<Film, BatchSummary> {
        self.collector.stream_batch(Self::batch_sources(spec))
    }

    /// A single film by slug, external ids included
    pub async fn film(&self, slug: &str) -> Result<Film> {
        require(slug, "film slug")?;
        let path = format!("/film/{slug}/");
        let body = self.collector.fetch_path(&path).await?;
        extract::extract_film_page(&body).map_err(|e| at_path(&path, e))
    }

    /// Films a person is credited on in `opts.profession`
    pub async fn filmography(&self, opts: &FilmographyOpts) -> Result<Vec<Film>> {
        opts.validate()?;
        let path = opts.path();
        let body = self.collector.fetch_path(&path).await?;
        let mut films = extract::extract_filmography(&body)
            .map_err(|e| at_path(&path, e))?;
        let report = self.collector.enrich(&mut films).await;
        if report.failed > 0 {
            log::warn!(
                "{path}: {}/{} films left without details",
                report.failed,
                report.attempted
            );
        }
        Ok(films)
    }

    pub async fn profile(&self, user: &str) -> Result<User> {
        require(user, "username")?;
        let path = format!("/{user}/");
        let body = self.collector.fetch_path(&path).await?;
        extract::extract_user(&body).map_err(|e| at_path(&path, e))
    }

    /// Films behind any supported Letterboxd URL
    pub async fn items_for_url(&self, url: &str) -> Result<Vec<Film>> {
        let path = normalize_url_path(url)?;
        let target = UrlTarget::classify(&path)?;
        log::debug!("{url} -> {target:?}");
        match target {
            UrlTarget::Filmography { profession, person } => {
                self.filmography(&FilmographyOpts { person, profession }).await
            }
            UrlTarget::Watchlist { user } => Ok(self.watchlist(&user).await?.records),
            UrlTarget::List { user, slug } => Ok(self
                .list(&ListOpts::all(ListId::new(user, slug)))
                .await?
                .records),
            UrlTarget::Watched { user } => Ok(self.watched(&user).await?.records),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_labels_and_paths() {
        let watched = Client::watched_source("dave");
        assert_eq!(watched.label, "watched:dave");
        assert_eq!(watched.path, "/dave/films");

        let list = Client::list_source(&ListId::new("dave", "top-10"));
        assert_eq!(list.label, "list:dave/top-10");
        assert_eq!(list.path, "/dave/list/top-10");

        let watchlist = Client::watchlist_source("dave");
        assert_eq!(watchlist.label, "watchlist:dave");
        assert_eq!(
            watchlist.page_address("https://letterboxd.com", 3),
            "https://letterboxd.com/dave/watchlist/page/3/"
        );
    }

    #[test]
    fn batch_sources_in_spec_order() {
        let spec = BatchSpec {
            watched: vec!["a".into(), "b".into()],
            lists: vec![ListId::new("c", "d")],
            watchlists: vec!["e".into()],
        };
        let labels: Vec<String> = Client::batch_sources(&spec)
            .into_iter()
            .map(|s| s.label)
            .collect();
        assert_eq!(labels, ["watched:a", "watched:b", "list:c/d", "watchlist:e"]);
    }

    #[test]
    fn filmography_opts() {
        let opts = FilmographyOpts::new("nicolas-cage", "actor").unwrap();
        assert_eq!(opts.path(), "/actor/nicolas-cage/");
        assert!(matches!(
            FilmographyOpts::new("", "actor"),
            Err(Error::Missing("person"))
        ));
        assert!(matches!(
            FilmographyOpts::new("nicolas-cage", "gaffer"),
            Err(Error::InvalidProfession(_))
        ));
    }
}
