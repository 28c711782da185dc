//! CycleRecord - the cached copy of a server-side cycle.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::foundation::{CycleId, CycleStatus, ProjectId, Timestamp};

use super::wire;

/// Sort order assigned by the server to rows created without one.
pub const DEFAULT_SORT_ORDER: f64 = 65535.0;

/// Issue counters for a cycle, as reported by the progress endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleProgress {
    #[serde(default)]
    pub total_issues: u32,
    #[serde(default)]
    pub completed_issues: u32,
    #[serde(default)]
    pub started_issues: u32,
    #[serde(default)]
    pub unstarted_issues: u32,
    #[serde(default)]
    pub backlog_issues: u32,
    #[serde(default)]
    pub cancelled_issues: u32,
}

impl CycleProgress {
    /// Share of issues completed, 0-100. An empty cycle reports 0.
    pub fn completion_percent(&self) -> u8 {
        if self.total_issues == 0 {
            return 0;
        }
        let done = u64::from(self.completed_issues.min(self.total_issues));
        (done * 100 / u64::from(self.total_issues)) as u8
    }
}

/// One project iteration as held in the cache.
///
/// Records are plain data: every mutation goes through [`CycleRecord::apply_patch`]
/// or [`CycleRecord::absorb`] so merge rules live in one place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleRecord {
    pub id: CycleId,
    #[serde(alias = "project")]
    pub project_id: ProjectId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "wire::optional_flexible_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "wire::optional_flexible_date")]
    pub end_date: Option<NaiveDate>,
    #[serde(default = "default_sort_order", deserialize_with = "wire::sort_order_or_default")]
    pub sort_order: f64,
    #[serde(default, deserialize_with = "wire::lenient_status")]
    pub status: Option<CycleStatus>,
    #[serde(default)]
    pub archived_at: Option<Timestamp>,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owned_by_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<CycleProgress>,
}

fn default_sort_order() -> f64 {
    DEFAULT_SORT_ORDER
}

impl CycleRecord {
    /// Creates a bare record with no dates, i.e. a draft.
    pub fn new(id: CycleId, project_id: ProjectId, name: impl Into<String>) -> Self {
        Self {
            id,
            project_id,
            name: name.into(),
            description: None,
            start_date: None,
            end_date: None,
            sort_order: DEFAULT_SORT_ORDER,
            status: Some(CycleStatus::Draft),
            archived_at: None,
            is_favorite: false,
            owned_by_id: None,
            progress: None,
        }
    }

    /// Sets the date window.
    pub fn with_dates(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    /// Sets the server status.
    pub fn with_status(mut self, status: CycleStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the manual sort order.
    pub fn with_sort_order(mut self, sort_order: f64) -> Self {
        self.sort_order = sort_order;
        self
    }

    /// Marks the record archived at the given instant.
    pub fn with_archived_at(mut self, archived_at: Timestamp) -> Self {
        self.archived_at = Some(archived_at);
        self
    }

    /// Returns true if the record carries an archive stamp.
    pub fn is_archived(&self) -> bool {
        self.archived_at.is_some()
    }

    /// Returns true if the server reports this cycle as the live iteration.
    pub fn is_current(&self) -> bool {
        self.status.is_some_and(|s| s.is_current())
    }

    /// Returns true if the server status is `completed`, regardless of dates.
    pub fn has_completed_status(&self) -> bool {
        self.status == Some(CycleStatus::Completed)
    }

    /// Shallow field-level merge of a partial payload.
    pub fn apply_patch(&mut self, patch: &CyclePatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(start_date) = patch.start_date {
            self.start_date = start_date;
        }
        if let Some(end_date) = patch.end_date {
            self.end_date = end_date;
        }
        if let Some(sort_order) = patch.sort_order {
            self.sort_order = sort_order;
        }
        if let Some(archived_at) = patch.archived_at {
            self.archived_at = archived_at;
        }
        if let Some(is_favorite) = patch.is_favorite {
            self.is_favorite = is_favorite;
        }
        if let Some(owned_by_id) = patch.owned_by_id {
            self.owned_by_id = owned_by_id;
        }
        if let Some(progress) = patch.progress {
            self.progress = Some(progress);
        }
    }

    /// Returns a new record with `patch` merged over this one.
    pub fn merged(&self, patch: &CyclePatch) -> Self {
        let mut next = self.clone();
        next.apply_patch(patch);
        next
    }

    /// Merges a freshly fetched copy of the same cycle over this one.
    ///
    /// Fields every cycle payload carries are overwritten. Fields only some
    /// endpoints return (description, owner, progress) keep their cached
    /// value when the incoming payload omits them.
    pub fn absorb(&mut self, incoming: CycleRecord) {
        let CycleRecord {
            id,
            project_id,
            name,
            description,
            start_date,
            end_date,
            sort_order,
            status,
            archived_at,
            is_favorite,
            owned_by_id,
            progress,
        } = incoming;

        self.id = id;
        self.project_id = project_id;
        self.name = name;
        self.start_date = start_date;
        self.end_date = end_date;
        self.sort_order = sort_order;
        self.status = status;
        self.archived_at = archived_at;
        self.is_favorite = is_favorite;
        if description.is_some() {
            self.description = description;
        }
        if owned_by_id.is_some() {
            self.owned_by_id = owned_by_id;
        }
        if progress.is_some() {
            self.progress = progress;
        }
    }
}

/// Partial cycle payload for create, update and local merges.
///
/// Outer `None` means "leave unchanged"; for nullable fields `Some(None)`
/// clears the value and serializes as JSON `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CyclePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "wire::present")]
    pub description: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "wire::present")]
    pub start_date: Option<Option<NaiveDate>>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "wire::present")]
    pub end_date: Option<Option<NaiveDate>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "wire::present")]
    pub archived_at: Option<Option<Timestamp>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_favorite: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "wire::present")]
    pub owned_by_id: Option<Option<Uuid>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<CycleProgress>,
}

impl CyclePatch {
    /// Empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }

    pub fn dates(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    pub fn sort_order(mut self, sort_order: f64) -> Self {
        self.sort_order = Some(sort_order);
        self
    }

    pub fn archived_at(mut self, archived_at: Option<Timestamp>) -> Self {
        self.archived_at = Some(archived_at);
        self
    }

    pub fn favorite(mut self, is_favorite: bool) -> Self {
        self.is_favorite = Some(is_favorite);
        self
    }

    pub fn progress(mut self, progress: CycleProgress) -> Self {
        self.progress = Some(progress);
        self
    }

    /// True if applying this patch would change nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Payload for the server-side date overlap check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateCheckRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cycle_id: Option<CycleId>,
}

/// Server verdict on a proposed date window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateCheckResult {
    pub status: bool,
}
