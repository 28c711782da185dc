//! CycleStatus enum as reported by the server.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// Server-computed status of a cycle.
///
/// The server is inconsistent about casing (`"CURRENT"`, `"current"`), so
/// parsing ignores case. Serialization always emits lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CycleStatus {
    Current,
    Completed,
    Upcoming,
    Draft,
}

impl CycleStatus {
    /// Returns the lowercase wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            CycleStatus::Current => "current",
            CycleStatus::Completed => "completed",
            CycleStatus::Upcoming => "upcoming",
            CycleStatus::Draft => "draft",
        }
    }

    /// Returns true for the live iteration of a project.
    pub fn is_current(&self) -> bool {
        matches!(self, CycleStatus::Current)
    }
}

impl FromStr for CycleStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "current" => Ok(CycleStatus::Current),
            "completed" => Ok(CycleStatus::Completed),
            "upcoming" => Ok(CycleStatus::Upcoming),
            "draft" => Ok(CycleStatus::Draft),
            other => Err(ValidationError::unknown_value("status", other)),
        }
    }
}

impl<'de> Deserialize<'de> for CycleStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for CycleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("CURRENT".parse::<CycleStatus>().unwrap(), CycleStatus::Current);
        assert_eq!("Completed".parse::<CycleStatus>().unwrap(), CycleStatus::Completed);
        assert_eq!(" upcoming ".parse::<CycleStatus>().unwrap(), CycleStatus::Upcoming);
        assert_eq!("draft".parse::<CycleStatus>().unwrap(), CycleStatus::Draft);
    }

    #[test]
    fn rejects_unknown_status() {
        assert!("paused".parse::<CycleStatus>().is_err());
    }

    #[test]
    fn serializes_to_lowercase_json() {
        assert_eq!(
            serde_json::to_string(&CycleStatus::Current).unwrap(),
            "\"current\""
        );
    }

    #[test]
    fn deserializes_uppercase_json() {
        let status: CycleStatus = serde_json::from_str("\"UPCOMING\"").unwrap();
        assert_eq!(status, CycleStatus::Upcoming);
    }

    #[test]
    fn only_current_is_current() {
        assert!(CycleStatus::Current.is_current());
        assert!(!CycleStatus::Draft.is_current());
    }
}
