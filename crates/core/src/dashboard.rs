//! Fixed vocabularies for dashboard aggregates.
//!
//! Grouping columns and trend buckets are chosen from these enums, so the
//! only SQL fragments that reach a query are the literals below.

/// Script column a distribution is grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistributionDimension {
    Status,
    SourceType,
    Team,
}

impl DistributionDimension {
    pub fn column(self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::SourceType => "source_type",
            Self::Team => "team",
        }
    }
}

/// Bucket width of the score trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrendPeriod {
    #[default]
    Day,
    Week,
    Month,
}

impl TrendPeriod {
    /// Parse a client-supplied period; unknown values fall back to `day`.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(p) if p.eq_ignore_ascii_case("week") => Self::Week,
            Some(p) if p.eq_ignore_ascii_case("month") => Self::Month,
            _ => Self::Day,
        }
    }

    /// Field name passed to PostgreSQL `date_trunc`.
    pub fn trunc_unit(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
        }
    }
}
