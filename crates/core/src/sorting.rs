//! Allow-listed sorting.
//!
//! Sort keys arrive as free text from the client. They are only ever looked
//! up in a fixed table ([`SortKey::parse`]) and the SQL column comes from the
//! matched variant, never from the input string.

/// Sort direction. Anything other than `asc` means descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    /// Parse a client-supplied direction (case-insensitive).
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(s) if s.eq_ignore_ascii_case("asc") => Self::Asc,
            _ => Self::Desc,
        }
    }

    /// SQL keyword for this direction.
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// A sortable column of some entity.
pub trait SortKey: Copy + std::fmt::Debug {
    /// Look up a client-supplied key. Returns `None` for unknown keys.
    fn parse(raw: &str) -> Option<Self>;

    /// Fully qualified SQL column for this key.
    fn column(self) -> &'static str;

    /// Column used as the final ascending tie-break so pages are stable.
    fn tie_break() -> &'static str;
}

/// A resolved sort: a known key plus a direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort<K: SortKey> {
    pub key: K,
    pub direction: SortDirection,
}

impl<K: SortKey> Sort<K> {
    pub fn new(key: K, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// Resolve raw `sortBy` / `sortOrder` input.
    ///
    /// An unknown or missing `sortBy` yields `default` (including its
    /// direction); `sortOrder` only applies to a recognized key.
    pub fn resolve(sort_by: Option<&str>, sort_order: Option<&str>, default: Sort<K>) -> Self {
        match sort_by.map(str::trim).filter(|s| !s.is_empty()).and_then(K::parse) {
            Some(key) => Self::new(key, SortDirection::parse(sort_order)),
            None => default,
        }
    }
}
