//! Page/limit normalization shared by every paginated listing.
//!
//! Out-of-range values are never an error: anything below 1 falls back to
//! the default so the repository never builds a negative OFFSET or a
//! zero-row LIMIT.

use serde::Serialize;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Page number used when the caller omits `page` or sends a value below 1.
pub const DEFAULT_PAGE: i64 = 1;

/// Page size used when the caller omits `limit` or sends a value below 1.
pub const DEFAULT_PAGE_LIMIT: i64 = 10;

/// Number of rows returned by the rankings endpoint when no limit is given.
pub const DEFAULT_RANKING_LIMIT: i64 = 50;

// ---------------------------------------------------------------------------
// Page
// ---------------------------------------------------------------------------

/// A validated page request. Both fields are always `>= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Page {
    pub page: i64,
    pub limit: i64,
}

impl Page {
    /// Build a page from raw user input, substituting defaults for missing or
    /// non-positive values.
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            page: positive_or(page, DEFAULT_PAGE),
            limit: positive_or(limit, DEFAULT_PAGE_LIMIT),
        }
    }

    /// The first page with the given size, used by fixed listings such as
    /// rankings.
    pub fn first(limit: Option<i64>, default_limit: i64) -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: positive_or(limit, default_limit),
        }
    }

    /// Number of rows to skip: `(page - 1) * limit`.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(None, None)
    }
}

fn positive_or(value: Option<i64>, default: i64) -> i64 {
    match value {
        Some(v) if v >= 1 => v,
        _ => default,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_absent() {
        let page = Page::new(None, None);
        assert_eq!(page.page, 1);
        assert_eq!(page.limit, 10);
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn non_positive_values_fall_back_to_defaults() {
        assert_eq!(Page::new(Some(0), Some(0)), Page { page: 1, limit: 10 });
        assert_eq!(Page::new(Some(-3), Some(-1)), Page { page: 1, limit: 10 });
    }

    #[test]
    fn valid_values_pass_through() {
        let page = Page::new(Some(3), Some(25));
        assert_eq!(page, Page { page: 3, limit: 25 });
        assert_eq!(page.offset(), 50);
    }

    #[test]
    fn offset_for_second_page() {
        assert_eq!(Page::new(Some(2), Some(10)).offset(), 10);
    }

    #[test]
    fn first_page_uses_given_default_limit() {
        assert_eq!(
            Page::first(None, DEFAULT_RANKING_LIMIT),
            Page { page: 1, limit: 50 }
        );
        assert_eq!(Page::first(Some(0), 50), Page { page: 1, limit: 50 });
        assert_eq!(Page::first(Some(5), 50), Page { page: 1, limit: 5 });
    }
}
