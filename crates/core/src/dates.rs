//! Stateless date parsing for client-supplied date strings.
//!
//! Every function here is reentrant; there is no shared formatter instance.
//! Unparsable input yields `None` and callers decide the fallback (ignore
//! the filter, keep the previous value, or use today).

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Accepted calendar-date layouts, tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Accepted date-time layouts. Only the date part is kept.
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Parse a date such as `2025-12-17`.
///
/// Also accepts `2025/12/17`, `2025-12-17 10:30:00` and RFC 3339 timestamps
/// (for which the date in the given offset is returned). Surrounding
/// whitespace is ignored. Returns `None` for blank or unparsable input.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
    {
        return Some(date);
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.date_naive());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.date())
}

/// Parse an optional raw date, treating `None` like unparsable input.
pub fn parse_optional_date(raw: Option<&str>) -> Option<NaiveDate> {
    raw.and_then(parse_date)
}

/// The current date in UTC.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}
