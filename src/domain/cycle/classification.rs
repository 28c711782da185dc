//! Date-derived cycle classification.
//!
//! The server's `status` field is advisory; list views classify by dates
//! relative to "today" so that a cycle rolls over at midnight without a
//! refetch. All comparisons are on calendar dates.

use chrono::NaiveDate;

use super::CycleRecord;

impl CycleRecord {
    /// No start date and no end date.
    pub fn is_draft(&self) -> bool {
        self.start_date.is_none() && self.end_date.is_none()
    }

    /// End date is in the past and is not today.
    pub fn is_completed_on(&self, today: NaiveDate) -> bool {
        self.end_date.is_some_and(|end| end < today)
    }

    /// Start date is strictly in the future.
    pub fn is_upcoming_on(&self, today: NaiveDate) -> bool {
        self.start_date.is_some_and(|start| start > today)
    }

    /// Complement of [`CycleRecord::is_completed_on`].
    pub fn is_incomplete_on(&self, today: NaiveDate) -> bool {
        !self.is_completed_on(today)
    }
}
