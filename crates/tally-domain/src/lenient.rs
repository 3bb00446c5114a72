//! Forgiving field decoders for records produced by the upstream backend.
//!
//! Malformed values decode to `None` instead of rejecting the whole payload.

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{de::IgnoredAny, Deserialize, Deserializer};

const ISO_DATE: &str = "%Y-%m-%d";

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Int(i64),
    Float(f64),
    Text(String),
    Other(IgnoredAny),
}

impl Scalar {
    fn into_amount(self) -> Option<f64> {
        match self {
            Scalar::Int(value) => Some(value as f64),
            Scalar::Float(value) => Some(value),
            Scalar::Text(raw) => raw.trim().parse::<f64>().ok(),
            Scalar::Other(_) => None,
        }
        .filter(|value| value.is_finite())
    }

    fn into_text(self) -> Option<String> {
        match self {
            Scalar::Int(value) => Some(value.to_string()),
            Scalar::Float(value) if value.is_finite() => Some(value.to_string()),
            Scalar::Text(raw) => {
                let trimmed = raw.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            _ => None,
        }
    }
}

/// Parses `YYYY-MM-DD`, or the date part of an ISO timestamp.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, ISO_DATE) {
        return Some(date);
    }
    match raw.as_bytes().get(10) {
        Some(b'T') | Some(b' ') => raw
            .get(..10)
            .and_then(|prefix| NaiveDate::parse_from_str(prefix, ISO_DATE).ok()),
        _ => None,
    }
}

pub(crate) fn amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.and_then(Scalar::into_amount))
}

pub(crate) fn date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Scalar>::deserialize(deserializer)? {
        Some(Scalar::Text(raw)) => parse_date(&raw),
        _ => None,
    })
}

pub(crate) fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.and_then(Scalar::into_text))
}

/// Like [`text`], but only genuine strings are accepted.
pub(crate) fn string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Scalar>::deserialize(deserializer)? {
        Some(scalar @ Scalar::Text(_)) => scalar.into_text(),
        _ => None,
    })
}

pub(crate) fn id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(text(deserializer)?.unwrap_or_default())
}

pub(crate) fn parsed<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    Ok(text(deserializer)?.and_then(|raw| raw.parse().ok()))
}
