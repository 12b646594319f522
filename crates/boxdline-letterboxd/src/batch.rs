//! Batch requests spanning several users and lists

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// A list addressed as `user/slug`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListId {
    pub user: String,
    pub slug: String,
}

impl ListId {
    pub fn new(user: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            slug: slug.into(),
        }
    }

    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim().trim_matches('/').split_once('/') {
            Some((user, slug)) if !user.is_empty() && !slug.is_empty() && !slug.contains('/') => {
                Ok(Self::new(user, slug))
            }
            _ => Err(Error::InvalidListId(raw.to_string())),
        }
    }
}

impl FromStr for ListId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for ListId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.user, self.slug)
    }
}

/// Everything one batch stream should merge
#[derive(Debug, Clone, Default)]
pub struct BatchSpec {
    /// Users whose watched films to include
    pub watched: Vec<String>,
    pub lists: Vec<ListId>,
    /// Users whose watchlists to include
    pub watchlists: Vec<String>,
}

impl BatchSpec {
    pub fn is_empty(&self) -> bool {
        self.watched.is_empty() && self.lists.is_empty() && self.watchlists.is_empty()
    }

    pub fn len(&self) -> usize {
        self.watched.len() + self.lists.len() + self.watchlists.len()
    }
}
