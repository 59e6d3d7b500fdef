//! Serde helpers for loosely-typed client payloads.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;
use serde_json::Value;

use crate::dates::parse_date;

/// Deserialize a field that may be absent, `null`, or a value into
/// `Option<Option<T>>`.
///
/// Use with `#[serde(default, deserialize_with = "present")]`:
///
/// - key absent        -> `None` (leave unchanged)
/// - `"key": null`     -> `Some(None)` (clear)
/// - `"key": value`    -> `Some(Some(value))` (set)
pub fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Deserialize a boolean flag that clients send either as a JSON boolean,
/// as `0`/`1`, or as the strings `"true"`/`"false"`/`"0"`/`"1"`.
pub fn flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(FlagVisitor)
}

/// Deserialize an optional date leniently: any value that is not a parsable
/// date string (a number, an object, `"yesterday"`) becomes `None` instead of
/// failing the whole payload.
pub fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(serde_json::Value::String(s)) => parse_date(&s),
        _ => None,
    })
}

/// Deserialize an optional text field leniently: numbers are kept as their
/// decimal text, any other non-string value becomes `None`.
pub fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.and_then(text))
}

/// [`present`] for text fields, with the coercion of [`lenient_text`].
///
/// A value of the wrong type (boolean, array, object) counts as absent, so the
/// stored field is left unchanged.
pub fn lenient_present_text<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        None => Some(None),
        Some(value) => text(value).map(Some),
    })
}

/// Deserialize a list of strings, keeping the elements [`lenient_text`]
/// accepts. Anything but an array becomes `None`.
pub fn lenient_text_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::Array(items)) => Some(items.into_iter().filter_map(text).collect()),
        _ => None,
    })
}

/// Deserialize an optional integer from a JSON number or a numeric string
/// (`2`, `"2"`). Anything else becomes `None`.
pub fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Deserialize an optional decimal from a JSON number or a numeric string
/// (`80`, `"80.5"`). Anything else becomes `None`.
pub fn lenient_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::Number(n)) => parse_decimal(&n.to_string()),
        Some(Value::String(s)) => parse_decimal(s.trim()),
        _ => None,
    })
}

fn text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

struct FlagVisitor;

impl<'de> Visitor<'de> for FlagVisitor {
    type Value = Option<bool>;

    fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str("a boolean, 0/1, or null")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(Some(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Some(v != 0))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Some(v != 0))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        match v.trim() {
            "" => Ok(None),
            "1" => Ok(Some(true)),
            "0" => Ok(Some(false)),
            s if s.eq_ignore_ascii_case("true") => Ok(Some(true)),
            s if s.eq_ignore_ascii_case("false") => Ok(Some(false)),
            other => Err(E::invalid_value(de::Unexpected::Str(other), &self)),
        }
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(FlagVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "present")]
        name: Option<Option<String>>,
        #[serde(default, deserialize_with = "flag")]
        active: Option<bool>,
        #[serde(default, deserialize_with = "lenient_date")]
        due: Option<NaiveDate>,
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    struct Loose {
        #[serde(deserialize_with = "lenient_text")]
        name: Option<String>,
        #[serde(deserialize_with = "lenient_present_text")]
        note: Option<Option<String>>,
        #[serde(deserialize_with = "lenient_text_list")]
        tags: Option<Vec<String>>,
        #[serde(deserialize_with = "lenient_i64")]
        page: Option<i64>,
        #[serde(deserialize_with = "lenient_decimal")]
        score: Option<Decimal>,
    }

    fn loose(json: &str) -> Loose {
        serde_json::from_str(json).unwrap()
    }

    fn parse(json: &str) -> Patch {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn absent_field_is_none() {
        let p = parse("{}");
        assert_eq!(p.name, None);
        assert_eq!(p.active, None);
    }

    #[test]
    fn explicit_null_is_some_none() {
        let p = parse(r#"{"name": null}"#);
        assert_eq!(p.name, Some(None));
    }

    #[test]
    fn value_is_some_some() {
        let p = parse(r#"{"name": "x"}"#);
        assert_eq!(p.name, Some(Some("x".to_string())));
    }

    #[test]
    fn flag_accepts_bool_int_and_string() {
        assert_eq!(parse(r#"{"active": true}"#).active, Some(true));
        assert_eq!(parse(r#"{"active": 0}"#).active, Some(false));
        assert_eq!(parse(r#"{"active": 1}"#).active, Some(true));
        assert_eq!(parse(r#"{"active": "false"}"#).active, Some(false));
        assert_eq!(parse(r#"{"active": null}"#).active, None);
    }

    #[test]
    fn lenient_date_swallows_bad_values() {
        assert_eq!(
            parse(r#"{"due": "2025-12-17"}"#).due,
            NaiveDate::from_ymd_opt(2025, 12, 17)
        );
        assert_eq!(parse(r#"{"due": "tomorrow"}"#).due, None);
        assert_eq!(parse(r#"{"due": 20251217}"#).due, None);
        assert_eq!(parse(r#"{"due": null}"#).due, None);
    }

    #[test]
    fn flag_rejects_other_strings() {
        assert!(serde_json::from_str::<Patch>(r#"{"active": "maybe"}"#).is_err());
    }

    // ---------------------------------------------------------------------------
    // Lenient text and numbers
    // ---------------------------------------------------------------------------

    #[test]
    fn lenient_text_keeps_strings_and_stringifies_numbers() {
        assert_eq!(loose(r#"{"name": "x"}"#).name.as_deref(), Some("x"));
        assert_eq!(loose(r#"{"name": 123}"#).name.as_deref(), Some("123"));
        assert_eq!(loose(r#"{"name": 1.5}"#).name.as_deref(), Some("1.5"));
    }

    #[test]
    fn lenient_text_drops_other_types() {
        assert_eq!(loose(r#"{"name": true}"#).name, None);
        assert_eq!(loose(r#"{"name": {"a": 1}}"#).name, None);
        assert_eq!(loose(r#"{"name": [1]}"#).name, None);
        assert_eq!(loose(r#"{"name": null}"#).name, None);
    }

    #[test]
    fn lenient_present_text_separates_clear_from_ignore() {
        assert_eq!(loose("{}").note, None);
        assert_eq!(loose(r#"{"note": null}"#).note, Some(None));
        assert_eq!(loose(r#"{"note": 7}"#).note, Some(Some("7".to_string())));
        assert_eq!(loose(r#"{"note": {"a": 1}}"#).note, None);
        assert_eq!(loose(r#"{"note": false}"#).note, None);
    }

    #[test]
    fn lenient_text_list_filters_elements() {
        assert_eq!(
            loose(r#"{"tags": ["a", 2, null, {}]}"#).tags,
            Some(vec!["a".to_string(), "2".to_string()])
        );
        assert_eq!(loose(r#"{"tags": "a"}"#).tags, None);
    }

    #[test]
    fn lenient_i64_accepts_numeric_strings() {
        assert_eq!(loose(r#"{"page": 2}"#).page, Some(2));
        assert_eq!(loose(r#"{"page": " 3 "}"#).page, Some(3));
        assert_eq!(loose(r#"{"page": "two"}"#).page, None);
        assert_eq!(loose(r#"{"page": 2.5}"#).page, None);
        assert_eq!(loose(r#"{"page": [2]}"#).page, None);
    }

    #[test]
    fn lenient_decimal_accepts_numeric_strings() {
        let d = |s: &str| Decimal::from_str(s).unwrap();
        assert_eq!(loose(r#"{"score": 80}"#).score, Some(d("80")));
        assert_eq!(loose(r#"{"score": 80.25}"#).score, Some(d("80.25")));
        assert_eq!(loose(r#"{"score": "72.5"}"#).score, Some(d("72.5")));
        assert_eq!(loose(r#"{"score": "abc"}"#).score, None);
        assert_eq!(loose(r#"{"score": true}"#).score, None);
    }
}
