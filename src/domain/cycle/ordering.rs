//! Deterministic orderings for cycle lists.

use std::cmp::Ordering;

use crate::domain::foundation::CycleStatus;

use super::CycleRecord;

/// Ascending by manual sort order. Ties fall back to id so the result is
/// total even when two rows share a sort order.
pub fn by_sort_order(a: &CycleRecord, b: &CycleRecord) -> Ordering {
    a.sort_order
        .total_cmp(&b.sort_order)
        .then_with(|| a.id.cmp(&b.id))
}

/// Sorts in place by [`by_sort_order`].
pub fn sort_by_sort_order(records: &mut [&CycleRecord]) {
    records.sort_by(|a, b| by_sort_order(a, b));
}

/// Stable partition: records with a start date keep their relative order
/// and come before records without one.
pub fn sort_dated_first(records: &mut [&CycleRecord]) {
    records.sort_by_key(|r| r.start_date.is_none());
}

/// Ordering used by filtered list views.
///
/// Implementations must be total and deterministic over sort order, name
/// and dates so repeated renders never reshuffle rows.
pub trait OrderingPolicy: Send + Sync {
    /// Orders `records`. `manual` is true when the user has chosen to
    /// arrange cycles by hand.
    fn order(&self, records: &mut [&CycleRecord], manual: bool);
}

/// Default policy: manual mode sorts by sort order; otherwise by status
/// (current, upcoming, draft, completed), then upcoming cycles by start
/// date and the rest by lowercase name.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusOrderingPolicy;

fn status_rank(status: Option<CycleStatus>) -> u8 {
    match status {
        Some(CycleStatus::Current) => 1,
        Some(CycleStatus::Upcoming) => 2,
        Some(CycleStatus::Draft) => 3,
        Some(CycleStatus::Completed) => 4,
        None => 5,
    }
}

fn by_status_then_label(a: &CycleRecord, b: &CycleRecord) -> Ordering {
    status_rank(a.status)
        .cmp(&status_rank(b.status))
        .then_with(|| {
            if a.status == Some(CycleStatus::Upcoming) {
                // None sorts before Some; undated upcoming rows lead.
                a.start_date.cmp(&b.start_date)
            } else {
                Ordering::Equal
            }
        })
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| by_sort_order(a, b))
}

impl OrderingPolicy for StatusOrderingPolicy {
    fn order(&self, records: &mut [&CycleRecord], manual: bool) {
        if manual {
            records.sort_by(|a, b| by_sort_order(a, b));
        } else {
            records.sort_by(|a, b| by_status_then_label(a, b));
        }
    }
}
