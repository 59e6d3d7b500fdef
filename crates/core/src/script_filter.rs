//! Resolved filter, sort and page for script listings.
//!
//! A [`ScriptListing`] is what the repository turns into SQL. Everything in
//! it has already been normalized: blank strings are gone, dates are parsed,
//! the tab name is replaced by its preset, and the sort key is a known
//! column.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::pagination::{Page, DEFAULT_RANKING_LIMIT};
use crate::sorting::{Sort, SortDirection, SortKey};

// ---------------------------------------------------------------------------
// Sort keys
// ---------------------------------------------------------------------------

/// Columns a script listing may be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptSortKey {
    AvgScore,
    RatingCount,
    SubmitDate,
    CreatedAt,
    UpdatedAt,
    Name,
    ScriptCode,
    Id,
}

impl SortKey for ScriptSortKey {
    fn parse(raw: &str) -> Option<Self> {
        let key = match raw {
            "avgScore" | "avg_score" => Self::AvgScore,
            "ratingCount" | "rating_count" => Self::RatingCount,
            "submitDate" | "submit_date" => Self::SubmitDate,
            "createdAt" | "created_at" => Self::CreatedAt,
            "updatedAt" | "updated_at" => Self::UpdatedAt,
            "name" => Self::Name,
            "scriptId" | "script_id" => Self::ScriptCode,
            "id" => Self::Id,
            _ => return None,
        };
        Some(key)
    }

    fn column(self) -> &'static str {
        match self {
            Self::AvgScore => "avg_score",
            Self::RatingCount => "rating_count",
            Self::SubmitDate => "submit_date",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
            Self::Name => "name",
            Self::ScriptCode => "script_id",
            Self::Id => "id",
        }
    }

    fn tie_break() -> &'static str {
        "id"
    }
}

/// Sort applied when the client sends no (or an unknown) `sortBy`.
pub const DEFAULT_SCRIPT_SORT: Sort<ScriptSortKey> = Sort {
    key: ScriptSortKey::SubmitDate,
    direction: SortDirection::Desc,
};

/// Sort used by the rankings endpoint.
pub const RANKING_SORT: Sort<ScriptSortKey> = Sort {
    key: ScriptSortKey::AvgScore,
    direction: SortDirection::Desc,
};

// ---------------------------------------------------------------------------
// Tab presets
// ---------------------------------------------------------------------------

/// Predicates bundled under a tab name. Unset fields add nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TabPreset {
    pub statuses: Vec<String>,
    pub unrated: Option<bool>,
    pub assign_status: Option<String>,
    pub is_project: Option<bool>,
}

/// Lookup table from tab name to preset.
///
/// Loaded from configuration; [`TabPresets::default`] holds the built-in
/// workflow tabs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct TabPresets(HashMap<String, TabPreset>);

impl TabPresets {
    /// Parse a JSON object of `name -> preset`.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Find the preset for a tab name. Unknown names return `None`.
    pub fn get(&self, tab: &str) -> Option<&TabPreset> {
        self.0.get(tab.trim())
    }
}

impl Default for TabPresets {
    fn default() -> Self {
        let presets = [
            (
                "pending",
                TabPreset {
                    unrated: Some(true),
                    ..Default::default()
                },
            ),
            (
                "claimed",
                TabPreset {
                    unrated: Some(true),
                    assign_status: Some("已认领".to_string()),
                    ..Default::default()
                },
            ),
            (
                "project",
                TabPreset {
                    is_project: Some(true),
                    ..Default::default()
                },
            ),
            (
                "abandoned",
                TabPreset {
                    statuses: vec!["已废弃".to_string()],
                    ..Default::default()
                },
            ),
        ];
        Self(
            presets
                .into_iter()
                .map(|(name, preset)| (name.to_string(), preset))
                .collect(),
        )
    }
}

// ---------------------------------------------------------------------------
// Filter
// ---------------------------------------------------------------------------

/// Normalized script predicates. `None` / empty means "no predicate".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScriptFilter {
    pub tab: Option<TabPreset>,
    pub statuses: Vec<String>,
    pub keyword: Option<String>,
    pub source_type: Option<String>,
    pub genre: Option<String>,
    pub team: Option<String>,
    pub content_team: Option<String>,
    pub producer_team: Option<String>,
    pub assign_status: Option<String>,
    pub unrated: Option<bool>,
    pub is_project: Option<bool>,
    pub submitted_from: Option<NaiveDate>,
    pub submitted_to: Option<NaiveDate>,
    pub min_score: Option<Decimal>,
    pub max_score: Option<Decimal>,
}

/// A fully resolved script listing request.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptListing {
    pub filter: ScriptFilter,
    pub sort: Sort<ScriptSortKey>,
    pub page: Page,
}

impl ScriptListing {
    /// Top-N by average score with no filters.
    pub fn rankings(limit: Option<i64>) -> Self {
        Self {
            filter: ScriptFilter::default(),
            sort: RANKING_SORT,
            page: Page::first(limit, DEFAULT_RANKING_LIMIT),
        }
    }
}

/// Trim a client string, dropping it when blank.
pub fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Trim every entry of a client list, dropping blanks.
pub fn non_blank_all(values: &[String]) -> Vec<String> {
    values.iter().filter_map(|v| non_blank(Some(v))).collect()
}
