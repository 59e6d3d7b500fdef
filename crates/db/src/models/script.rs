//! Script entity model and DTOs.

use chrono::NaiveDate;
use deepdrama_core::dates::{parse_optional_date, today};
use deepdrama_core::script_filter::{
    non_blank, non_blank_all, ScriptFilter, ScriptListing, TabPresets, DEFAULT_SCRIPT_SORT,
};
use deepdrama_core::pagination::Page;
use deepdrama_core::serde_ext::{
    flag, lenient_date, lenient_decimal, lenient_i64, lenient_present_text, lenient_text,
    lenient_text_list,
};
use deepdrama_core::sorting::Sort;
use deepdrama_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A script row from the `scripts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Script {
    pub id: DbId,
    /// External script code, e.g. `SP012`.
    pub script_id: Option<String>,
    pub name: Option<String>,
    pub preview: Option<String>,
    pub file_url: Option<String>,
    pub tags: Option<String>,
    pub source_type: Option<String>,
    pub team: Option<String>,
    pub status: Option<String>,
    pub genre: Option<String>,
    pub content_type: Option<String>,
    pub is_project: bool,
    pub project_owner: Option<String>,
    pub project_name: Option<String>,
    pub remarks: Option<String>,
    pub submit_user: Option<String>,
    pub writer: Option<String>,
    pub content_team: Option<String>,
    pub producer: Option<String>,
    pub producer_team: Option<String>,
    pub feishu_url: Option<String>,
    pub assign_status: Option<String>,
    pub submit_date: NaiveDate,
    pub avg_score: Decimal,
    pub rating_count: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a script. Unknown keys in the payload are ignored, and
/// text fields take numbers as their decimal text.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateScript {
    /// Generated from the row id when omitted.
    #[serde(deserialize_with = "lenient_text")]
    pub script_id: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub preview: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub file_url: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub tags: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub source_type: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub team: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub status: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub genre: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub content_type: Option<String>,
    #[serde(deserialize_with = "flag")]
    pub is_project: Option<bool>,
    #[serde(deserialize_with = "lenient_text")]
    pub project_owner: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub project_name: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub remarks: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub submit_user: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub writer: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub content_team: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub producer: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub producer_team: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub feishu_url: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub assign_status: Option<String>,
    /// Today when missing or unparsable.
    #[serde(deserialize_with = "lenient_date")]
    pub submit_date: Option<NaiveDate>,
}

impl CreateScript {
    /// The submit date to store.
    pub fn submit_date_or_today(&self) -> NaiveDate {
        self.submit_date.unwrap_or_else(today)
    }
}

/// DTO for partially updating a script.
///
/// Text fields are `None` when absent from the payload or of the wrong type,
/// `Some(None)` when sent as `null` and `Some(Some(v))` when set. `isProject`
/// and `submitDate` back non-null columns, so `null` or an unparsable date
/// leaves them as they are. The script code is fixed once created, so a
/// `scriptId` key is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateScript {
    #[serde(deserialize_with = "lenient_present_text")]
    pub name: Option<Option<String>>,
    #[serde(deserialize_with = "lenient_present_text")]
    pub preview: Option<Option<String>>,
    #[serde(deserialize_with = "lenient_present_text")]
    pub file_url: Option<Option<String>>,
    #[serde(deserialize_with = "lenient_present_text")]
    pub tags: Option<Option<String>>,
    #[serde(deserialize_with = "lenient_present_text")]
    pub source_type: Option<Option<String>>,
    #[serde(deserialize_with = "lenient_present_text")]
    pub team: Option<Option<String>>,
    #[serde(deserialize_with = "lenient_present_text")]
    pub status: Option<Option<String>>,
    #[serde(deserialize_with = "lenient_present_text")]
    pub genre: Option<Option<String>>,
    #[serde(deserialize_with = "lenient_present_text")]
    pub content_type: Option<Option<String>>,
    #[serde(deserialize_with = "flag")]
    pub is_project: Option<bool>,
    #[serde(deserialize_with = "lenient_present_text")]
    pub project_owner: Option<Option<String>>,
    #[serde(deserialize_with = "lenient_present_text")]
    pub project_name: Option<Option<String>>,
    #[serde(deserialize_with = "lenient_present_text")]
    pub remarks: Option<Option<String>>,
    #[serde(deserialize_with = "lenient_present_text")]
    pub submit_user: Option<Option<String>>,
    #[serde(deserialize_with = "lenient_present_text")]
    pub writer: Option<Option<String>>,
    #[serde(deserialize_with = "lenient_present_text")]
    pub content_team: Option<Option<String>>,
    #[serde(deserialize_with = "lenient_present_text")]
    pub producer: Option<Option<String>>,
    #[serde(deserialize_with = "lenient_present_text")]
    pub producer_team: Option<Option<String>>,
    #[serde(deserialize_with = "lenient_present_text")]
    pub feishu_url: Option<Option<String>>,
    #[serde(deserialize_with = "lenient_present_text")]
    pub assign_status: Option<Option<String>>,
    #[serde(deserialize_with = "lenient_date")]
    pub submit_date: Option<NaiveDate>,
}

impl UpdateScript {
    /// Overwrite every field of `script` that this patch carries.
    pub fn apply(&self, script: &mut Script) {
        merge(&mut script.name, &self.name);
        merge(&mut script.preview, &self.preview);
        merge(&mut script.file_url, &self.file_url);
        merge(&mut script.tags, &self.tags);
        merge(&mut script.source_type, &self.source_type);
        merge(&mut script.team, &self.team);
        merge(&mut script.status, &self.status);
        merge(&mut script.genre, &self.genre);
        merge(&mut script.content_type, &self.content_type);
        merge(&mut script.project_owner, &self.project_owner);
        merge(&mut script.project_name, &self.project_name);
        merge(&mut script.remarks, &self.remarks);
        merge(&mut script.submit_user, &self.submit_user);
        merge(&mut script.writer, &self.writer);
        merge(&mut script.content_team, &self.content_team);
        merge(&mut script.producer, &self.producer);
        merge(&mut script.producer_team, &self.producer_team);
        merge(&mut script.feishu_url, &self.feishu_url);
        merge(&mut script.assign_status, &self.assign_status);
        if let Some(is_project) = self.is_project {
            script.is_project = is_project;
        }
        if let Some(submit_date) = self.submit_date {
            script.submit_date = submit_date;
        }
    }
}

/// Replace `target` when the patch field is present (including `null`).
pub(crate) fn merge<T: Clone>(target: &mut Option<T>, patch: &Option<Option<T>>) {
    if let Some(value) = patch {
        target.clone_from(value);
    }
}

/// Listing request body for `POST /scripts`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScriptQuery {
    #[serde(deserialize_with = "lenient_i64")]
    pub page: Option<i64>,
    #[serde(deserialize_with = "lenient_i64")]
    pub limit: Option<i64>,
    /// Named preset, resolved through [`TabPresets`].
    #[serde(deserialize_with = "lenient_text")]
    pub tab: Option<String>,
    #[serde(deserialize_with = "flag")]
    pub unrated: Option<bool>,
    #[serde(deserialize_with = "lenient_text")]
    pub assign_status: Option<String>,
    #[serde(deserialize_with = "lenient_text_list")]
    pub statuses: Option<Vec<String>>,
    #[serde(deserialize_with = "lenient_text")]
    pub source_type: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub genre: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub team: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub content_team: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub producer_team: Option<String>,
    #[serde(deserialize_with = "flag")]
    pub is_project: Option<bool>,
    /// Matched against name and script code.
    #[serde(deserialize_with = "lenient_text")]
    pub keyword: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub sort_by: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub sort_order: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub start_date: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub end_date: Option<String>,
    #[serde(deserialize_with = "lenient_decimal")]
    pub min_score: Option<Decimal>,
    #[serde(deserialize_with = "lenient_decimal")]
    pub max_score: Option<Decimal>,
}

impl ScriptQuery {
    /// Normalize the raw request into a listing the repository can run.
    ///
    /// Blank strings and unparsable dates are dropped, unknown tabs add no
    /// predicate, and page/limit/sort fall back to their defaults.
    pub fn resolve(&self, presets: &TabPresets) -> ScriptListing {
        let tab = non_blank(self.tab.as_deref()).and_then(|name| {
            let preset = presets.get(&name).cloned();
            if preset.is_none() {
                tracing::debug!(tab = %name, "Ignoring unknown script tab");
            }
            preset
        });

        let filter = ScriptFilter {
            tab,
            statuses: self.statuses.as_deref().map(non_blank_all).unwrap_or_default(),
            keyword: non_blank(self.keyword.as_deref()),
            source_type: non_blank(self.source_type.as_deref()),
            genre: non_blank(self.genre.as_deref()),
            team: non_blank(self.team.as_deref()),
            content_team: non_blank(self.content_team.as_deref()),
            producer_team: non_blank(self.producer_team.as_deref()),
            assign_status: non_blank(self.assign_status.as_deref()),
            unrated: self.unrated,
            is_project: self.is_project,
            submitted_from: parse_optional_date(self.start_date.as_deref()),
            submitted_to: parse_optional_date(self.end_date.as_deref()),
            min_score: self.min_score,
            max_score: self.max_score,
        };

        ScriptListing {
            filter,
            sort: Sort::resolve(
                self.sort_by.as_deref(),
                self.sort_order.as_deref(),
                DEFAULT_SCRIPT_SORT,
            ),
            page: Page::new(self.page, self.limit),
        }
    }
}

/// Distinct known values for each listing filter, used to populate
/// drop-downs.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptOptions {
    pub content_teams: Vec<String>,
    pub writers: Vec<String>,
    pub producers: Vec<String>,
    pub teams: Vec<String>,
    pub statuses: Vec<String>,
    pub source_types: Vec<String>,
    pub genres: Vec<String>,
}

/// A rankings row: the script plus its 1-based position and letter grade.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedScript {
    pub rank: i64,
    pub grade: &'static str,
    #[serde(flatten)]
    pub script: Script,
}
