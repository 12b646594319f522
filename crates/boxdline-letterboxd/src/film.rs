//! Film and user records

use boxdline_core::Record;
use serde::{Deserialize, Serialize};

/// Identifiers of a film on other databases, from its film page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalIds {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imdb: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tmdb: Option<String>,
}

/// A film as it appears in a poster grid
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Film {
    pub id: String,
    pub title: String,
    /// Short name used in film URLs, e.g. `sweet-sweetbacks-baadasssss-song`
    pub slug: String,
    /// Site-relative film page, e.g. `/film/sweet-sweetbacks-baadasssss-song/`
    pub target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_ids: Option<ExternalIds>,
}

impl Record for Film {
    type Detail = ExternalIds;

    fn id(&self) -> &str {
        &self.id
    }

    fn detail_address(&self) -> &str {
        &self.target
    }

    fn attach_detail(&mut self, detail: ExternalIds) {
        self.external_ids = Some(detail);
    }

    fn has_detail(&self) -> bool {
        self.external_ids.is_some()
    }
}

/// A member profile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub bio: String,
    pub watched_film_count: u64,
}
