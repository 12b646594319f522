//! Pagination descriptors and requested page ranges

use serde::Serialize;

use crate::error::CollectError;

/// Where a page sits in its paginated source.
///
/// Invariant: `is_last` iff `current_page == total_pages`. `next_page` is 0
/// on the last page except for [`Pagination::single_page`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Pagination {
    pub current_page: u32,
    pub next_page: u32,
    pub total_pages: u32,
    pub total_items: usize,
    pub is_last: bool,
}

impl Pagination {
    /// Descriptor for a page carrying no pagination markup at all
    pub fn single_page() -> Self {
        Self {
            current_page: 1,
            next_page: 1,
            total_pages: 1,
            total_items: 0,
            is_last: true,
        }
    }

    /// Descriptor for page `current` of `total`
    pub fn at(current: u32, total: u32) -> Self {
        let total = total.max(current);
        let is_last = current == total;
        Self {
            current_page: current,
            next_page: if is_last { 0 } else { current + 1 },
            total_pages: total,
            total_items: 0,
            is_last,
        }
    }
}

/// Last page of a requested range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LastPage {
    Page(u32),
    /// Keep going until the source reports its last page
    All,
}

/// A validated, 1-based page range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    pub first: u32,
    pub last: LastPage,
}

impl PageRange {
    /// Every page of the source
    pub const ALL: Self = Self {
        first: 1,
        last: LastPage::All,
    };

    /// Normalize a raw `(first, last)` request.
    ///
    /// 0 means "unset" and -1 (for `last`) means "until the last page":
    /// `(0,0)` → `(1,1)`, `(0,X)` → `(1,X)`, `(X,0)` → `(X,X)`.
    pub fn normalize(first: i64, last: i64) -> Result<Self, CollectError> {
        let invalid = || CollectError::InvalidRange { first, last };
        let (first, last) = match (first, last) {
            (0, 0) => (1, 1),
            (0, l) => (1, l),
            (f, 0) => (f, f),
            (f, l) => (f, l),
        };
        if first < 1 || last < -1 {
            return Err(invalid());
        }
        if last >= 0 && first > last {
            return Err(invalid());
        }
        let first = u32::try_from(first).map_err(|_| invalid())?;
        let last = if last == -1 {
            LastPage::All
        } else {
            LastPage::Page(u32::try_from(last).map_err(|_| invalid())?)
        };
        Ok(Self { first, last })
    }

    /// Back to the raw `(first, last)` form, -1 standing for "all"
    pub fn as_raw(&self) -> (i64, i64) {
        let last = match self.last {
            LastPage::Page(n) => i64::from(n),
            LastPage::All => -1,
        };
        (i64::from(self.first), last)
    }
}

impl Default for PageRange {
    fn default() -> Self {
        Self {
            first: 1,
            last: LastPage::Page(1),
        }
    }
}

/// One extracted page: records in markup order plus the page's pagination.
#[derive(Debug, Clone)]
pub struct Page<R> {
    pub records: Vec<R>,
    pub pagination: Pagination,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(first: i64, last: i64) -> Option<(i64, i64)> {
        PageRange::normalize(first, last).ok().map(|r| r.as_raw())
    }

    #[test]
    fn zero_substitution() {
        assert_eq!(norm(0, 0), Some((1, 1)));
        assert_eq!(norm(0, 1), Some((1, 1)));
        assert_eq!(norm(0, 7), Some((1, 7)));
        assert_eq!(norm(0, -1), Some((1, -1)));
        assert_eq!(norm(1, 0), Some((1, 1)));
        assert_eq!(norm(4, 0), Some((4, 4)));
    }

    #[test]
    fn valid_ranges_unchanged() {
        assert_eq!(norm(1, 1), Some((1, 1)));
        assert_eq!(norm(1, 2), Some((1, 2)));
        assert_eq!(norm(2, 2), Some((2, 2)));
        assert_eq!(norm(1, -1), Some((1, -1)));
        assert_eq!(norm(9, -1), Some((9, -1)));
    }

    #[test]
    fn first_after_last_rejected() {
        for (first, last) in [(2, 1), (10, 3), (5, 4)] {
            assert!(matches!(
                PageRange::normalize(first, last),
                Err(CollectError::InvalidRange { .. })
            ));
        }
    }

    #[test]
    fn negative_values_rejected() {
        assert!(PageRange::normalize(-1, 3).is_err());
        assert!(PageRange::normalize(1, -2).is_err());
    }

    #[test]
    fn all_sentinel() {
        let range = PageRange::normalize(1, -1).unwrap();
        assert_eq!(range, PageRange::ALL);
    }

    #[test]
    fn pagination_at_middle() {
        let p = Pagination::at(1, 59);
        assert_eq!(p.next_page, 2);
        assert_eq!(p.total_pages, 59);
        assert!(!p.is_last);
    }

    #[test]
    fn pagination_at_last() {
        let p = Pagination::at(59, 59);
        assert_eq!(p.next_page, 0);
        assert!(p.is_last);
    }

    #[test]
    fn single_page_is_last() {
        let p = Pagination::single_page();
        assert_eq!(p.current_page, 1);
        assert_eq!(p.total_pages, 1);
        assert!(p.is_last);
    }
}
