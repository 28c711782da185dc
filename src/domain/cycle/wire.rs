//! Serde helpers for the cycle wire format.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer};

use crate::domain::foundation::CycleStatus;

/// Parses a calendar date that the server may send either as `YYYY-MM-DD`
/// or as a full RFC 3339 timestamp. The date part is taken verbatim; no
/// timezone conversion is applied.
pub(crate) fn parse_flexible_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    raw.get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

/// `deserialize_with` target for optional, loosely formatted dates.
pub(crate) fn optional_flexible_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => parse_flexible_date(&s)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date '{}'", s))),
    }
}

/// Distinguishes "field absent" (`None`) from "field null" (`Some(None)`).
pub(crate) fn present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Server status, dropping values this client does not know.
///
/// A new status on the server degrades one record to "no status" rather than
/// failing the whole list it arrived in.
pub(crate) fn lenient_status<'de, D>(deserializer: D) -> Result<Option<CycleStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|raw| match raw.parse() {
        Ok(status) => Some(status),
        Err(e) => {
            tracing::warn!("Ignoring cycle status: {}", e);
            None
        }
    }))
}

/// Nullable sort order; the server occasionally sends `null` for new rows.
pub(crate) fn sort_order_or_default<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(super::DEFAULT_SORT_ORDER))
}
