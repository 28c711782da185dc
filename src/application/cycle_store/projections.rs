//! Derived list views over a cache snapshot.
//!
//! Every project-scoped view returns `None` until the project's cycles have
//! been fetched, so callers can tell "not loaded" from "loaded, empty".

use chrono::NaiveDate;

use crate::domain::cycle::{
    matches_search, sort_by_sort_order, sort_dated_first, CycleFilters, CycleRecord,
    OrderingPolicy,
};
use crate::domain::foundation::{CycleId, ProjectId};

use super::CycleState;

fn ids(records: &[&CycleRecord]) -> Vec<CycleId> {
    records.iter().map(|r| r.id).collect()
}

/// Unarchived project records matching `keep`, by sort order.
fn sorted_unarchived<F>(state: &CycleState, project_id: &ProjectId, keep: F) -> Option<Vec<CycleId>>
where
    F: Fn(&CycleRecord) -> bool,
{
    if !state.is_project_fetched(project_id) {
        return None;
    }
    let mut records: Vec<&CycleRecord> = state
        .project_cycles(project_id)
        .filter(|c| !c.is_archived() && keep(*c))
        .collect();
    sort_by_sort_order(&mut records);
    Some(ids(&records))
}

/// Every unarchived cycle of the project.
pub fn all_ids(state: &CycleState, project_id: &ProjectId) -> Option<Vec<CycleId>> {
    sorted_unarchived(state, project_id, |_| true)
}

/// Cycles whose end date has passed (and is not today).
pub fn completed_ids(
    state: &CycleState,
    project_id: &ProjectId,
    today: NaiveDate,
) -> Option<Vec<CycleId>> {
    sorted_unarchived(state, project_id, |c| c.is_completed_on(today))
}

/// Cycles starting strictly after today.
pub fn upcoming_ids(
    state: &CycleState,
    project_id: &ProjectId,
    today: NaiveDate,
) -> Option<Vec<CycleId>> {
    sorted_unarchived(state, project_id, |c| c.is_upcoming_on(today))
}

/// Cycles that are not completed.
pub fn incomplete_ids(
    state: &CycleState,
    project_id: &ProjectId,
    today: NaiveDate,
) -> Option<Vec<CycleId>> {
    sorted_unarchived(state, project_id, |c| c.is_incomplete_on(today))
}

/// Cycles with neither a start nor an end date.
pub fn draft_ids(state: &CycleState, project_id: &ProjectId) -> Option<Vec<CycleId>> {
    sorted_unarchived(state, project_id, CycleRecord::is_draft)
}

/// First unarchived cycle (in id order) whose server status is `current`.
pub fn active_id(state: &CycleState, project_id: &ProjectId) -> Option<CycleId> {
    if !state.is_project_fetched(project_id) {
        return None;
    }
    state
        .project_cycles(project_id)
        .find(|c| !c.is_archived() && c.is_current())
        .map(|c| c.id)
}

/// Archived cycles of the project by sort order.
pub fn archived_ids(state: &CycleState, project_id: &ProjectId) -> Option<Vec<CycleId>> {
    if !state.is_project_fetched(project_id) {
        return None;
    }
    let mut records: Vec<&CycleRecord> = state
        .project_cycles(project_id)
        .filter(|c| c.is_archived())
        .collect();
    sort_by_sort_order(&mut records);
    Some(ids(&records))
}

/// Unarchived cycles passing search and filters, ordered by `policy`.
pub fn filtered_ids(
    state: &CycleState,
    project_id: &ProjectId,
    query: &str,
    filters: &CycleFilters,
    policy: &dyn OrderingPolicy,
    manual: bool,
) -> Option<Vec<CycleId>> {
    if !state.is_project_fetched(project_id) {
        return None;
    }
    let mut records: Vec<&CycleRecord> = state
        .project_cycles(project_id)
        .filter(|c| !c.is_archived() && matches_search(c, query) && filters.matches(c))
        .collect();
    policy.order(&mut records, manual);
    Some(ids(&records))
}

/// Unarchived cycles with server status `completed` passing search and
/// filters. Dated cycles come first.
pub fn filtered_completed_ids(
    state: &CycleState,
    project_id: &ProjectId,
    query: &str,
    filters: &CycleFilters,
) -> Option<Vec<CycleId>> {
    if !state.is_project_fetched(project_id) {
        return None;
    }
    let mut records: Vec<&CycleRecord> = state
        .project_cycles(project_id)
        .filter(|c| {
            !c.is_archived()
                && c.has_completed_status()
                && matches_search(c, query)
                && filters.matches(c)
        })
        .collect();
    sort_by_sort_order(&mut records);
    sort_dated_first(&mut records);
    Some(ids(&records))
}

/// Archived cycles passing the archived search and filters. Dated cycles
/// come first.
pub fn filtered_archived_ids(
    state: &CycleState,
    project_id: &ProjectId,
    query: &str,
    filters: &CycleFilters,
) -> Option<Vec<CycleId>> {
    if !state.is_project_fetched(project_id) {
        return None;
    }
    let mut records: Vec<&CycleRecord> = state
        .project_cycles(project_id)
        .filter(|c| c.is_archived() && matches_search(c, query) && filters.matches(c))
        .collect();
    sort_by_sort_order(&mut records);
    sort_dated_first(&mut records);
    Some(ids(&records))
}
