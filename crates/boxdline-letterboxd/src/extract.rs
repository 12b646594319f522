//! HTML extraction for Letterboxd pages
//!
//! Poster grids (watched films, lists, watchlists, filmographies) share one
//! markup: `li.poster-container > div.film-poster` carrying the film id, slug,
//! and target link as data attributes, with the title on the poster image's
//! `alt`. Pagination lives in `div.paginate-pages`.

use boxdline_core::{CollectError, Extractor, Page, Pagination};
use scraper::{CaseSensitivity, ElementRef, Html, Selector};

use crate::film::{ExternalIds, Film, User};

fn selector(css: &str) -> Result<Selector, CollectError> {
    Selector::parse(css).map_err(|e| CollectError::parse("", format!("selector {css}: {e}")))
}

fn has_class(el: &ElementRef<'_>, class: &str) -> bool {
    el.value().has_class(class, CaseSensitivity::CaseSensitive)
}

fn attr<'a>(el: &ElementRef<'a>, name: &str) -> &'a str {
    el.value().attr(name).unwrap_or_default()
}

fn text_of(el: &ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// `/film/some-film/` -> `some-film`
pub fn normalize_slug(raw: &str) -> String {
    let slug = raw.strip_prefix("/film/").unwrap_or(raw);
    slug.strip_suffix('/').unwrap_or(slug).to_string()
}

/// Pull the database id out of an IMDb or TMDb link.
///
/// Both sites put it in the fifth path segment counted from the scheme:
/// `https://www.imdb.com/title/tt0067810/maindetails`.
pub fn id_from_url(url: &str) -> Option<String> {
    if !(url.contains("imdb.com") || url.contains("themoviedb.org")) {
        return None;
    }
    url.split('/')
        .nth(4)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

/// Current and total page from the pagination strip.
///
/// Errors when there is no current-page marker, which is how single-page
/// collections render.
pub fn extract_pagination(doc: &Html) -> Result<Pagination, CollectError> {
    let items = selector("div.paginate-pages li")?;
    let mut current = 0;
    let mut total = 0;
    for li in doc.select(&items) {
        let text = text_of(&li);
        if text == "…" {
            continue;
        }
        if has_class(&li, "paginate-current") {
            match text.parse::<u32>() {
                Ok(n) => {
                    current = n;
                    total = n;
                }
                Err(e) => log::debug!("unreadable current page {text:?}: {e}"),
            }
        } else if has_class(&li, "paginate-page") {
            match text.parse::<u32>() {
                Ok(n) => total = n,
                Err(e) => log::debug!("unreadable page link {text:?}: {e}"),
            }
        }
    }
    if current == 0 {
        return Err(CollectError::parse("", "no current page in pagination"));
    }
    Ok(Pagination::at(current, total))
}

fn film_from_poster(poster: &ElementRef<'_>, image: &Selector) -> Film {
    let title = poster
        .select(image)
        .next()
        .map(|img| attr(&img, "alt").to_string())
        .unwrap_or_default();
    Film {
        id: attr(poster, "data-film-id").to_string(),
        title,
        slug: normalize_slug(attr(poster, "data-film-slug")),
        target: attr(poster, "data-target-link").to_string(),
        external_ids: None,
    }
}

/// Every film in a poster grid, in document order
pub fn extract_posters(doc: &Html) -> Result<Vec<Film>, CollectError> {
    let posters = selector("li.poster-container div.film-poster")?;
    let image = selector("img.image")?;
    Ok(doc
        .select(&posters)
        .map(|poster| film_from_poster(&poster, &image))
        .collect())
}

/// IMDb and TMDb ids linked from a film page
pub fn extract_external_ids(doc: &Html) -> Result<ExternalIds, CollectError> {
    let links = selector("a[data-track-action]")?;
    let mut ids = ExternalIds::default();
    for link in doc.select(&links) {
        let href = attr(&link, "href");
        match attr(&link, "data-track-action") {
            "IMDb" => ids.imdb = id_from_url(href),
            "TMDb" => ids.tmdb = id_from_url(href),
            _ => {}
        }
    }
    Ok(ids)
}

/// Drop a trailing ` (1971)` from an `og:title`
fn strip_year(title: &str) -> &str {
    title
        .strip_suffix(')')
        .and_then(|t| t.rsplit_once(" ("))
        .filter(|(_, year)| year.len() == 4 && year.chars().all(|c| c.is_ascii_digit()))
        .map_or(title, |(name, _)| name)
}

/// A single film page, external ids included
pub fn extract_film_page(body: &str) -> Result<Film, CollectError> {
    let doc = Html::parse_document(body);
    let og_title = selector(r#"meta[property="og:title"]"#)?;
    let poster = selector("div.film-poster")?;

    let poster = doc
        .select(&poster)
        .next()
        .ok_or_else(|| CollectError::parse("", "no film poster on page"))?;
    let title = doc
        .select(&og_title)
        .next()
        .map(|meta| strip_year(attr(&meta, "content")).to_string())
        .unwrap_or_default();

    Ok(Film {
        id: attr(&poster, "data-film-id").to_string(),
        title,
        slug: normalize_slug(attr(&poster, "data-film-slug")),
        target: attr(&poster, "data-target-link").to_string(),
        external_ids: Some(extract_external_ids(&doc)?),
    })
}

/// Films on a person's page. These are never paginated.
pub fn extract_filmography(body: &str) -> Result<Vec<Film>, CollectError> {
    extract_posters(&Html::parse_document(body))
}

/// Profile header, bio, and watched count of a member page
pub fn extract_user(body: &str) -> Result<User, CollectError> {
    let doc = Html::parse_document(body);
    let header = selector("section.js-profile-header")?;
    let bio = selector("section#person-bio div.collapsible-text")?;
    let stats = selector("div.profile-stats a")?;
    let value = selector("span.value")?;

    let username = doc
        .select(&header)
        .next()
        .and_then(|h| h.value().attr("data-person"))
        .filter(|u| !u.is_empty())
        .ok_or_else(|| CollectError::parse("", "no username in profile header"))?
        .to_string();

    let bio = doc
        .select(&bio)
        .next()
        .map(|b| text_of(&b))
        .unwrap_or_default();

    let films_href = format!("/{username}/films/");
    let watched_film_count = doc
        .select(&stats)
        .find(|a| attr(a, "href") == films_href)
        .and_then(|a| a.select(&value).next())
        .map(|v| text_of(&v).replace(',', ""))
        .and_then(|count| match count.parse::<u64>() {
            Ok(n) => Some(n),
            Err(e) => {
                log::warn!("{username}: unreadable watched count {count:?}: {e}");
                None
            }
        })
        .unwrap_or(0);

    Ok(User {
        username,
        bio,
        watched_film_count,
    })
}

/// Extractor for any paginated poster grid
#[derive(Debug, Clone, Copy, Default)]
pub struct PosterGrid;

impl Extractor<Film> for PosterGrid {
    fn extract(&self, body: &str) -> Result<Page<Film>, CollectError> {
        let doc = Html::parse_document(body);
        let records = extract_posters(&doc)?;
        let pagination = extract_pagination(&doc).unwrap_or_else(|e| {
            log::debug!("{e}, assuming single page");
            Pagination::single_page()
        });
        Ok(Page {
            records,
            pagination,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIRST_OF_59: &str = r#"<div class="pagination">
<div class="paginate-nextprev paginate-disabled"><span class="previous">Newer</span></div>
<div class="paginate-nextprev"><a class="next" href="/dave/films/page/2/">Older</a></div>
<div class="paginate-pages"><ul>
<li class="paginate-page paginate-current"><span>1</span></li>
<li class="paginate-page"><a href="/dave/films/page/2/">2</a></li>
<li class="paginate-page"><a href="/dave/films/page/3/">3</a></li>
<li class="paginate-page unseen-pages">…</li>
<li class="paginate-page"><a href="/dave/films/page/59/">59</a></li>
</ul></div></div>"#;

    const LAST_OF_59: &str = r#"<div class="pagination">
<div class="paginate-nextprev"><a class="previous" href="/dave/films/page/58/">Newer</a></div>
<div class="paginate-pages"><ul>
<li class="paginate-page"><a href="/dave/films/">1</a></li>
<li class="paginate-page unseen-pages">…</li>
<li class="paginate-page"><a href="/dave/films/page/57/">57</a></li>
<li class="paginate-page"><a href="/dave/films/page/58/">58</a></li>
<li class="paginate-page paginate-current"><span>59</span></li>
</ul></div></div>"#;

    const GRID: &str = r#"<ul class="poster-list">
<li class="poster-container">
  <div class="really-lazy-load poster film-poster" data-film-id="51568"
       data-film-slug="/film/sweet-sweetbacks-baadasssss-song/"
       data-target-link="/film/sweet-sweetbacks-baadasssss-song/">
    <img class="image" alt="Sweet Sweetback's Baadasssss Song" src="x.png"/>
  </div>
</li>
<li class="poster-container">
  <div class="poster film-poster" data-film-id="1009" data-film-slug="shaft"
       data-target-link="/film/shaft/">
    <img class="image" alt="Shaft"/>
  </div>
</li>
</ul>"#;

    const FILM_PAGE: &str = r#"<html><head>
<meta property="og:title" content="Sweet Sweetback's Baadasssss Song (1971)" />
</head><body>
<div class="film-poster" data-film-id="51568"
     data-film-slug="sweet-sweetbacks-baadasssss-song"
     data-target-link="/film/sweet-sweetbacks-baadasssss-song/"></div>
<p class="text-link text-footer">
  <a href="http://www.imdb.com/title/tt0067810/maindetails" data-track-action="IMDb">IMDb</a>
  <a href="https://www.themoviedb.org/movie/5822/" data-track-action="TMDb">TMDb</a>
</p>
</body></html>"#;

    const PROFILE: &str = r#"<section class="profile-header js-profile-header" data-person="dave">
<div class="profile-stats js-profile-stats">
  <h4 class="profile-statistic statistic"><a href="/dave/films/"><span class="value">1,234</span><span class="definition">Films</span></a></h4>
  <h4 class="profile-statistic statistic"><a href="/dave/lists/"><span class="value">12</span><span class="definition">Lists</span></a></h4>
</div>
</section>
<section id="person-bio"><div class="collapsible-text"> <p>Watches movies.</p> </div></section>"#;

    #[test]
    fn pagination_first_of_many() {
        let p = extract_pagination(&Html::parse_document(FIRST_OF_59)).unwrap();
        assert_eq!(p.current_page, 1);
        assert_eq!(p.next_page, 2);
        assert_eq!(p.total_pages, 59);
        assert!(!p.is_last);
    }

    #[test]
    fn pagination_last_of_many() {
        let p = extract_pagination(&Html::parse_document(LAST_OF_59)).unwrap();
        assert_eq!(p.current_page, 59);
        assert_eq!(p.next_page, 0);
        assert_eq!(p.total_pages, 59);
        assert!(p.is_last);
    }

    #[test]
    fn pagination_missing_is_an_error() {
        assert!(extract_pagination(&Html::parse_document(GRID)).is_err());
    }

    #[test]
    fn grid_without_pagination_is_single_page() {
        let page = PosterGrid.extract(GRID).unwrap();
        assert_eq!(page.pagination, Pagination::single_page());
        assert_eq!(page.records.len(), 2);
    }

    #[test]
    fn grid_films() {
        let page = PosterGrid.extract(&format!("{GRID}{FIRST_OF_59}")).unwrap();
        assert_eq!(page.pagination.total_pages, 59);

        let film = &page.records[0];
        assert_eq!(film.id, "51568");
        assert_eq!(film.title, "Sweet Sweetback's Baadasssss Song");
        assert_eq!(film.slug, "sweet-sweetbacks-baadasssss-song");
        assert_eq!(film.target, "/film/sweet-sweetbacks-baadasssss-song/");
        assert!(film.external_ids.is_none());

        assert_eq!(page.records[1].slug, "shaft");
        assert_eq!(page.records[1].title, "Shaft");
    }

    #[test]
    fn empty_grid() {
        let page = PosterGrid.extract("<html><body></body></html>").unwrap();
        assert!(page.records.is_empty());
        assert!(page.pagination.is_last);
    }

    #[test]
    fn slug_normalization() {
        assert_eq!(normalize_slug("/film/shaft/"), "shaft");
        assert_eq!(normalize_slug("shaft/"), "shaft");
        assert_eq!(normalize_slug("shaft"), "shaft");
    }

    #[test]
    fn external_id_urls() {
        assert_eq!(
            id_from_url("http://www.imdb.com/title/tt0067810/maindetails").as_deref(),
            Some("tt0067810")
        );
        assert_eq!(
            id_from_url("https://www.themoviedb.org/movie/5822/").as_deref(),
            Some("5822")
        );
        assert_eq!(id_from_url("https://example.com/a/b/c/d"), None);
        assert_eq!(id_from_url("https://www.imdb.com/"), None);
    }

    #[test]
    fn film_page() {
        let film = extract_film_page(FILM_PAGE).unwrap();
        assert_eq!(film.id, "51568");
        assert_eq!(film.title, "Sweet Sweetback's Baadasssss Song");
        assert_eq!(film.slug, "sweet-sweetbacks-baadasssss-song");
        assert_eq!(
            film.external_ids,
            Some(ExternalIds {
                imdb: Some("tt0067810".into()),
                tmdb: Some("5822".into()),
            })
        );
    }

    #[test]
    fn film_page_without_poster() {
        assert!(extract_film_page("<html></html>").is_err());
    }

    #[test]
    fn title_year_suffix() {
        assert_eq!(strip_year("Shaft (1971)"), "Shaft");
        assert_eq!(strip_year("Shaft"), "Shaft");
        assert_eq!(strip_year("Film (Director's Cut)"), "Film (Director's Cut)");
    }

    #[test]
    fn user_profile() {
        let user = extract_user(PROFILE).unwrap();
        assert_eq!(user.username, "dave");
        assert_eq!(user.bio, "Watches movies.");
        assert_eq!(user.watched_film_count, 1234);
    }

    #[test]
    fn user_profile_without_header() {
        assert!(extract_user("<html><body></body></html>").is_err());
    }
}
