//! Read-only aggregate rows for the dashboard.

use chrono::NaiveDate;
use deepdrama_core::dates::parse_optional_date;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One group of a distribution. `value` is `None` for scripts with the
/// grouping column unset.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionBucket {
    pub value: Option<String>,
    pub count: i64,
    pub avg_score: Decimal,
}

/// Headline counters.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Kpi {
    pub total_submissions: i64,
    pub project_count: i64,
    pub rated_count: i64,
    pub pending_count: i64,
    pub avg_score: Decimal,
}

/// Mean rating total for one time bucket.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub period: NaiveDate,
    pub avg_score: Decimal,
    pub count: i64,
}

/// Optional submit-date window for distributions.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DateRange {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl DateRange {
    /// Parsed bounds; unparsable values become open bounds.
    pub fn bounds(&self) -> (Option<NaiveDate>, Option<NaiveDate>) {
        (
            parse_optional_date(self.start_date.as_deref()),
            parse_optional_date(self.end_date.as_deref()),
        )
    }
}
