//! Rating entity model and DTOs.

use chrono::NaiveDate;
use deepdrama_core::dates::{parse_optional_date, today};
use deepdrama_core::pagination::Page;
use deepdrama_core::rating_filter::{RatingFilter, RatingListing, DEFAULT_RATING_SORT};
use deepdrama_core::script_filter::non_blank;
use deepdrama_core::scoring::DimensionScores;
use deepdrama_core::serde_ext::{flag, lenient_date, lenient_decimal, lenient_i64, lenient_text, present};
use deepdrama_core::sorting::Sort;
use deepdrama_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::script::merge;

/// Role recorded when the rater does not state one.
pub const DEFAULT_USER_ROLE: &str = "内容评审";

/// A rating row joined with its script's name.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    pub id: DbId,
    pub script_id: DbId,
    pub script_name: Option<String>,
    pub user_id: DbId,
    pub user_name: Option<String>,
    pub user_role: String,
    pub content_score: Option<Decimal>,
    pub market_score: Option<Decimal>,
    pub compliance_score: Option<Decimal>,
    pub commercial_score: Option<Decimal>,
    pub total_score: Option<Decimal>,
    pub comments: Option<String>,
    pub rating_date: NaiveDate,
    pub is_locked: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Rating {
    pub fn scores(&self) -> DimensionScores {
        DimensionScores {
            content: self.content_score,
            market: self.market_score,
            compliance: self.compliance_score,
            commercial: self.commercial_score,
        }
    }
}

/// DTO for recording a rating.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRating {
    pub script_id: DbId,
    pub user_id: DbId,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub user_role: Option<String>,
    #[serde(default)]
    pub content_score: Option<Decimal>,
    #[serde(default)]
    pub market_score: Option<Decimal>,
    #[serde(default)]
    pub compliance_score: Option<Decimal>,
    #[serde(default)]
    pub commercial_score: Option<Decimal>,
    #[serde(default)]
    pub comments: Option<String>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub rating_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "flag")]
    pub is_locked: Option<bool>,
}

impl CreateRating {
    /// Submitted scores, rounded to the stored precision.
    pub fn scores(&self) -> DimensionScores {
        DimensionScores {
            content: self.content_score,
            market: self.market_score,
            compliance: self.compliance_score,
            commercial: self.commercial_score,
        }
        .normalized()
    }

    pub fn user_role_or_default(&self) -> String {
        non_blank(self.user_role.as_deref()).unwrap_or_else(|| DEFAULT_USER_ROLE.to_string())
    }

    pub fn rating_date_or_today(&self) -> NaiveDate {
        self.rating_date.unwrap_or_else(today)
    }
}

/// DTO for partially updating a rating. The total score is always derived,
/// so it is not accepted here.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateRating {
    #[serde(deserialize_with = "present")]
    pub user_name: Option<Option<String>>,
    pub user_role: Option<String>,
    #[serde(deserialize_with = "present")]
    pub content_score: Option<Option<Decimal>>,
    #[serde(deserialize_with = "present")]
    pub market_score: Option<Option<Decimal>>,
    #[serde(deserialize_with = "present")]
    pub compliance_score: Option<Option<Decimal>>,
    #[serde(deserialize_with = "present")]
    pub commercial_score: Option<Option<Decimal>>,
    #[serde(deserialize_with = "present")]
    pub comments: Option<Option<String>>,
    #[serde(deserialize_with = "lenient_date")]
    pub rating_date: Option<NaiveDate>,
    #[serde(deserialize_with = "flag")]
    pub is_locked: Option<bool>,
}

impl UpdateRating {
    /// Scores newly set by this patch. Cleared and untouched dimensions are
    /// `None`.
    pub fn patched_scores(&self) -> DimensionScores {
        DimensionScores {
            content: self.content_score.flatten(),
            market: self.market_score.flatten(),
            compliance: self.compliance_score.flatten(),
            commercial: self.commercial_score.flatten(),
        }
        .normalized()
    }

    /// Overwrite the fields this patch carries and re-derive the total.
    pub fn apply(&self, rating: &mut Rating) {
        merge(&mut rating.user_name, &self.user_name);
        merge(&mut rating.content_score, &self.content_score);
        merge(&mut rating.market_score, &self.market_score);
        merge(&mut rating.compliance_score, &self.compliance_score);
        merge(&mut rating.commercial_score, &self.commercial_score);
        merge(&mut rating.comments, &self.comments);
        if let Some(role) = non_blank(self.user_role.as_deref()) {
            rating.user_role = role;
        }
        if let Some(date) = self.rating_date {
            rating.rating_date = date;
        }
        if let Some(locked) = self.is_locked {
            rating.is_locked = locked;
        }
        let scores = rating.scores().normalized();
        rating.content_score = scores.content;
        rating.market_score = scores.market;
        rating.compliance_score = scores.compliance;
        rating.commercial_score = scores.commercial;
        rating.total_score = scores.total();
    }
}

/// Listing request body for `POST /ratings`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RatingQuery {
    #[serde(deserialize_with = "lenient_i64")]
    pub page: Option<i64>,
    #[serde(deserialize_with = "lenient_i64")]
    pub limit: Option<i64>,
    #[serde(deserialize_with = "lenient_i64")]
    pub script_id: Option<DbId>,
    #[serde(deserialize_with = "lenient_i64")]
    pub user_id: Option<DbId>,
    #[serde(deserialize_with = "lenient_text")]
    pub user_role: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub start_date: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub end_date: Option<String>,
    #[serde(deserialize_with = "lenient_decimal")]
    pub min_score: Option<Decimal>,
    #[serde(deserialize_with = "lenient_decimal")]
    pub max_score: Option<Decimal>,
    #[serde(deserialize_with = "lenient_text")]
    pub sort_by: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub sort_order: Option<String>,
}

impl RatingQuery {
    pub fn resolve(&self) -> RatingListing {
        RatingListing {
            filter: RatingFilter {
                script_id: self.script_id,
                user_id: self.user_id,
                user_role: non_blank(self.user_role.as_deref()),
                rated_from: parse_optional_date(self.start_date.as_deref()),
                rated_to: parse_optional_date(self.end_date.as_deref()),
                min_score: self.min_score,
                max_score: self.max_score,
            },
            sort: Sort::resolve(
                self.sort_by.as_deref(),
                self.sort_order.as_deref(),
                DEFAULT_RATING_SORT,
            ),
            page: Page::new(self.page, self.limit),
        }
    }
}
