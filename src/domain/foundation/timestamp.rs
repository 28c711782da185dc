//! Server-stamped instants such as `archived_at`.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A UTC instant. The API may send any RFC 3339 offset; it is normalized
/// on the way in so equality and ordering compare the same clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// UTC calendar date of the instant.
    pub fn date(&self) -> NaiveDate {
        self.0.date_naive()
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = DateTime::<FixedOffset>::deserialize(deserializer)?;
        Ok(Self(raw.with_timezone(&Utc)))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_rfc3339())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> Timestamp {
        serde_json::from_str(&format!("\"{}\"", raw)).unwrap()
    }

    #[test]
    fn offsets_normalize_to_utc_date() {
        let ts = parse("2024-01-15T23:30:00-02:00");
        assert_eq!(ts.date(), NaiveDate::from_ymd_opt(2024, 1, 16).unwrap());
        assert_eq!(ts, parse("2024-01-16T01:30:00Z"));
    }

    #[test]
    fn orders_chronologically() {
        assert!(parse("2024-01-15T10:30:00Z") < parse("2024-01-15T10:31:00Z"));
    }

    #[test]
    fn serializes_as_rfc3339() {
        let ts = parse("2024-01-15T10:30:00Z");
        assert_eq!(
            serde_json::to_string(&ts).unwrap(),
            "\"2024-01-15T10:30:00Z\""
        );
    }
}
