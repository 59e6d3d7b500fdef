//! Shared query parameter types for API handlers.

use deepdrama_core::dashboard::TrendPeriod;
use serde::Deserialize;

/// `?limit=` for the rankings endpoint. Non-positive or missing values fall
/// back to the default when the listing is resolved.
#[derive(Debug, Default, Deserialize)]
pub struct RankingParams {
    pub limit: Option<i64>,
}

/// `?period=day|week|month` for the score trend.
#[derive(Debug, Default, Deserialize)]
pub struct TrendParams {
    pub period: Option<String>,
}

impl TrendParams {
    pub fn period(&self) -> TrendPeriod {
        TrendPeriod::parse(self.period.as_deref())
    }
}
