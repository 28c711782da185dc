//! Search and filter predicates applied to cycle list views.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{CycleStatus, ValidationError};

use super::wire::parse_flexible_date;
use super::CycleRecord;

/// Direction of a date bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateBound {
    After,
    Before,
}

/// One date constraint, written on the wire as `"YYYY-MM-DD;after"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateFilter {
    pub date: NaiveDate,
    pub bound: DateBound,
}

impl DateFilter {
    pub fn after(date: NaiveDate) -> Self {
        Self {
            date,
            bound: DateBound::After,
        }
    }

    pub fn before(date: NaiveDate) -> Self {
        Self {
            date,
            bound: DateBound::Before,
        }
    }

    /// Strict comparison: a date equal to the bound does not satisfy it.
    pub fn is_satisfied_by(&self, date: NaiveDate) -> bool {
        match self.bound {
            DateBound::After => date > self.date,
            DateBound::Before => date < self.date,
        }
    }
}

impl FromStr for DateFilter {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (date, bound) = s
            .split_once(';')
            .ok_or_else(|| ValidationError::invalid_format("date_filter", "expected 'date;bound'"))?;
        let date = parse_flexible_date(date)
            .ok_or_else(|| ValidationError::invalid_format("date_filter", "invalid date"))?;
        let bound = match bound.trim().to_ascii_lowercase().as_str() {
            "after" => DateBound::After,
            "before" => DateBound::Before,
            other => return Err(ValidationError::unknown_value("date_bound", other)),
        };
        Ok(Self { date, bound })
    }
}

impl fmt::Display for DateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bound = match self.bound {
            DateBound::After => "after",
            DateBound::Before => "before",
        };
        write!(f, "{};{}", self.date.format("%Y-%m-%d"), bound)
    }
}

impl Serialize for DateFilter {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DateFilter {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Predicate set for a cycle list.
///
/// Empty keys impose no constraint. `status` is any-of; every date filter
/// must hold and a record lacking the date fails a non-empty date key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CycleFilters {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub status: Vec<CycleStatus>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub start_date: Vec<DateFilter>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub end_date: Vec<DateFilter>,
}

impl CycleFilters {
    /// No constraints.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, status: CycleStatus) -> Self {
        self.status.push(status);
        self
    }

    pub fn with_start_date(mut self, filter: DateFilter) -> Self {
        self.start_date.push(filter);
        self
    }

    pub fn with_end_date(mut self, filter: DateFilter) -> Self {
        self.end_date.push(filter);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_empty() && self.start_date.is_empty() && self.end_date.is_empty()
    }

    /// Evaluates the predicate set against one record.
    pub fn matches(&self, record: &CycleRecord) -> bool {
        if !self.status.is_empty()
            && !record.status.is_some_and(|s| self.status.contains(&s))
        {
            return false;
        }
        satisfies_all(&self.start_date, record.start_date)
            && satisfies_all(&self.end_date, record.end_date)
    }
}

fn satisfies_all(filters: &[DateFilter], date: Option<NaiveDate>) -> bool {
    if filters.is_empty() {
        return true;
    }
    match date {
        Some(date) => filters.iter().all(|f| f.is_satisfied_by(date)),
        None => false,
    }
}

/// Case-insensitive substring match on the cycle name. Blank queries match.
pub fn matches_search(record: &CycleRecord, query: &str) -> bool {
    let query = query.trim();
    query.is_empty() || record.name.to_lowercase().contains(&query.to_lowercase())
}
