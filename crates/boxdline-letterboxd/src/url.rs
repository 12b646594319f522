//! Mapping of Letterboxd URLs to the collections behind them

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use url::Url;

use crate::error::{Error, Result};

/// Roles a person page can be listed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Profession {
    Actor,
    Director,
    Producer,
    Writer,
}

impl Profession {
    pub const ALL: [Profession; 4] = [
        Profession::Actor,
        Profession::Director,
        Profession::Producer,
        Profession::Writer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Actor => "actor",
            Self::Director => "director",
            Self::Producer => "producer",
            Self::Writer => "writer",
        }
    }
}

impl fmt::Display for Profession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Profession {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| Error::InvalidProfession(s.to_string()))
    }
}

/// Reduce a Letterboxd URL to its site-relative path, without trailing slash.
///
/// Relative paths pass through. Absolute URLs must point at letterboxd.com.
pub fn normalize_url_path(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.starts_with('/') {
        return Ok(trimmed.to_string());
    }
    let url = Url::parse(trimmed).map_err(|e| Error::InvalidUrl {
        url: raw.to_string(),
        message: e.to_string(),
    })?;
    match url.host_str() {
        Some(host) if host == "letterboxd.com" || host.ends_with(".letterboxd.com") => {
            Ok(url.path().trim_end_matches('/').to_string())
        }
        _ => Err(Error::ForeignUrl(raw.to_string())),
    }
}

/// What a normalized path points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlTarget {
    Filmography {
        profession: Profession,
        person: String,
    },
    Watchlist {
        user: String,
    },
    List {
        user: String,
        slug: String,
    },
    Watched {
        user: String,
    },
}

impl UrlTarget {
    /// Classify a path from [`normalize_url_path`]. Checked in order:
    /// person pages, watchlists, lists, then watched films.
    pub fn classify(path: &str) -> Result<Self> {
        let parts: Vec<&str> = path.split('/').collect();
        let part = |i: usize| parts.get(i).copied().filter(|p| !p.is_empty());
        let unsupported = || Error::UnsupportedUrl(path.to_string());

        for profession in Profession::ALL {
            if path.starts_with(&format!("/{profession}/")) {
                let person = part(2).ok_or_else(unsupported)?;
                return Ok(Self::Filmography {
                    profession,
                    person: person.to_string(),
                });
            }
        }

        if path.ends_with("/watchlist") {
            let user = part(1).ok_or_else(unsupported)?;
            Ok(Self::Watchlist {
                user: user.to_string(),
            })
        } else if path.contains("/list/") {
            let user = part(1).ok_or_else(unsupported)?;
            let slug = part(3).ok_or_else(unsupported)?;
            Ok(Self::List {
                user: user.to_string(),
                slug: slug.to_string(),
            })
        } else if path.ends_with("/films") {
            let user = part(1).ok_or_else(unsupported)?;
            Ok(Self::Watched {
                user: user.to_string(),
            })
        } else {
            Err(unsupported())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_paths() {
        let cases = [
            ("/dave/films/", "/dave/films"),
            ("/dave/films", "/dave/films"),
            ("https://letterboxd.com/dave/list/top-10/", "/dave/list/top-10"),
            ("https://www.letterboxd.com/director/nicolas-cage", "/director/nicolas-cage"),
        ];
        for (raw, want) in cases {
            assert_eq!(normalize_url_path(raw).unwrap(), want, "{raw}");
        }
    }

    #[test]
    fn normalize_rejects_other_hosts() {
        assert!(matches!(
            normalize_url_path("https://www.imdb.com/title/tt0067810/"),
            Err(Error::ForeignUrl(_))
        ));
        assert!(matches!(
            normalize_url_path("not a url"),
            Err(Error::InvalidUrl { .. })
        ));
    }

    #[test]
    fn classify_targets() {
        assert_eq!(
            UrlTarget::classify("/actor/nicolas-cage").unwrap(),
            UrlTarget::Filmography {
                profession: Profession::Actor,
                person: "nicolas-cage".into()
            }
        );
        assert_eq!(
            UrlTarget::classify("/dave/watchlist").unwrap(),
            UrlTarget::Watchlist {
                user: "dave".into()
            }
        );
        assert_eq!(
            UrlTarget::classify("/dave/list/top-10").unwrap(),
            UrlTarget::List {
                user: "dave".into(),
                slug: "top-10".into()
            }
        );
        assert_eq!(
            UrlTarget::classify("/dave/films").unwrap(),
            UrlTarget::Watched {
                user: "dave".into()
            }
        );
    }

    #[test]
    fn classify_unknown() {
        for path in ["/televangelist/nicolas-cage", "/dave", "/film/shaft", "/actor/"] {
            assert!(
                matches!(UrlTarget::classify(path), Err(Error::UnsupportedUrl(_))),
                "{path}"
            );
        }
    }

    #[test]
    fn professions_parse() {
        assert_eq!("writer".parse::<Profession>().unwrap(), Profession::Writer);
        assert!(matches!(
            "gaffer".parse::<Profession>(),
            Err(Error::InvalidProfession(_))
        ));
        assert_eq!(Profession::Director.to_string(), "director");
    }
}
