//! Clock port.

use chrono::NaiveDate;

/// Port supplying the calendar date used for date-derived classification.
pub trait Clock: Send + Sync {
    /// Today's date in the user's calendar.
    fn today(&self) -> NaiveDate;
}
