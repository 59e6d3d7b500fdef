//! Resolved filter, sort and page for rating listings.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::pagination::Page;
use crate::sorting::{Sort, SortDirection, SortKey};
use crate::types::DbId;

/// Columns a rating listing may be ordered by. Columns are qualified with
/// the `r` alias used by the listing query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingSortKey {
    RatingDate,
    TotalScore,
    ContentScore,
    MarketScore,
    ComplianceScore,
    CommercialScore,
    CreatedAt,
    Id,
}

impl SortKey for RatingSortKey {
    fn parse(raw: &str) -> Option<Self> {
        let key = match raw {
            "ratingDate" | "rating_date" => Self::RatingDate,
            "totalScore" | "total_score" => Self::TotalScore,
            "contentScore" | "content_score" => Self::ContentScore,
            "marketScore" | "market_score" => Self::MarketScore,
            "complianceScore" | "compliance_score" => Self::ComplianceScore,
            "commercialScore" | "commercial_score" => Self::CommercialScore,
            "createdAt" | "created_at" => Self::CreatedAt,
            "id" => Self::Id,
            _ => return None,
        };
        Some(key)
    }

    fn column(self) -> &'static str {
        match self {
            Self::RatingDate => "r.rating_date",
            Self::TotalScore => "r.total_score",
            Self::ContentScore => "r.content_score",
            Self::MarketScore => "r.market_score",
            Self::ComplianceScore => "r.compliance_score",
            Self::CommercialScore => "r.commercial_score",
            Self::CreatedAt => "r.created_at",
            Self::Id => "r.id",
        }
    }

    fn tie_break() -> &'static str {
        "r.id"
    }
}

/// Sort applied when the client sends no (or an unknown) `sortBy`.
pub const DEFAULT_RATING_SORT: Sort<RatingSortKey> = Sort {
    key: RatingSortKey::RatingDate,
    direction: SortDirection::Desc,
};

/// Normalized rating predicates. `None` means "no predicate".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RatingFilter {
    pub script_id: Option<DbId>,
    pub user_id: Option<DbId>,
    pub user_role: Option<String>,
    pub rated_from: Option<NaiveDate>,
    pub rated_to: Option<NaiveDate>,
    pub min_score: Option<Decimal>,
    pub max_score: Option<Decimal>,
}

/// A fully resolved rating listing request.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingListing {
    pub filter: RatingFilter,
    pub sort: Sort<RatingSortKey>,
    pub page: Page,
}
