//! Memoization of derived views.
//!
//! Entries are valid for exactly one `(version, today)` pair. The first
//! lookup after a write or a date rollover clears the table, so the table
//! never holds more than one generation of results.

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::NaiveDate;

use crate::domain::cycle::{CycleFilters, OrderingPolicy};
use crate::domain::foundation::{CycleId, ProjectId};

/// Ordering policy compared by identity.
///
/// Holding the `Arc` keeps the allocation alive for as long as the entry,
/// so a replaced policy can never share an address with a cached one.
#[derive(Clone)]
pub(crate) struct PolicyHandle(Arc<dyn OrderingPolicy>);

impl PolicyHandle {
    pub(crate) fn new(policy: Arc<dyn OrderingPolicy>) -> Self {
        Self(policy)
    }

    fn addr(&self) -> *const () {
        Arc::as_ptr(&self.0) as *const ()
    }
}

impl PartialEq for PolicyHandle {
    fn eq(&self, other: &Self) -> bool {
        self.addr() == other.addr()
    }
}

impl Eq for PolicyHandle {}

impl Hash for PolicyHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.addr().hash(state);
    }
}

impl fmt::Debug for PolicyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PolicyHandle({:p})", self.addr())
    }
}

/// Identifies one derived list and its inputs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum ProjectionKey {
    All(ProjectId),
    Completed(ProjectId),
    Upcoming(ProjectId),
    Incomplete(ProjectId),
    Draft(ProjectId),
    Archived(ProjectId),
    Filtered {
        project_id: ProjectId,
        query: String,
        filters: CycleFilters,
        manual: bool,
        policy: PolicyHandle,
    },
    FilteredCompleted {
        project_id: ProjectId,
        query: String,
        filters: CycleFilters,
    },
    FilteredArchived {
        project_id: ProjectId,
        query: String,
        filters: CycleFilters,
    },
}

#[derive(Debug, Default)]
struct MemoTable {
    version: u64,
    today: Option<NaiveDate>,
    lists: HashMap<ProjectionKey, Option<Vec<CycleId>>>,
}

/// Cache of derived id lists keyed by snapshot version and inputs.
#[derive(Debug, Default)]
pub(crate) struct ProjectionMemo {
    table: Mutex<MemoTable>,
}

impl ProjectionMemo {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Returns the cached list for `key`, computing it on a miss.
    ///
    /// `compute` runs without the table lock held.
    pub(crate) fn get_or_compute<F>(
        &self,
        version: u64,
        today: NaiveDate,
        key: ProjectionKey,
        compute: F,
    ) -> Option<Vec<CycleId>>
    where
        F: FnOnce() -> Option<Vec<CycleId>>,
    {
        {
            let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
            if table.version != version || table.today != Some(today) {
                table.lists.clear();
                table.version = version;
                table.today = Some(today);
            } else if let Some(hit) = table.lists.get(&key) {
                return hit.clone();
            }
        }

        let computed = compute();

        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        if table.version == version && table.today == Some(today) {
            table.lists.insert(key, computed.clone());
        }
        computed
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.table
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .lists
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    #[test]
    fn hit_skips_recompute() {
        let memo = ProjectionMemo::new();
        let project = ProjectId::new();
        let calls = Cell::new(0);
        let compute = || {
            calls.set(calls.get() + 1);
            Some(vec![])
        };

        memo.get_or_compute(1, today(), ProjectionKey::All(project), compute);
        memo.get_or_compute(1, today(), ProjectionKey::All(project), compute);

        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn version_change_invalidates() {
        let memo = ProjectionMemo::new();
        let project = ProjectId::new();
        let id = CycleId::new();

        memo.get_or_compute(1, today(), ProjectionKey::Draft(project), || None);
        let fresh = memo.get_or_compute(2, today(), ProjectionKey::Draft(project), || {
            Some(vec![id])
        });

        assert_eq!(fresh, Some(vec![id]));
        assert_eq!(memo.len(), 1);
    }

    #[test]
    fn date_rollover_invalidates() {
        let memo = ProjectionMemo::new();
        let project = ProjectId::new();
        let tomorrow = today().succ_opt().unwrap();

        memo.get_or_compute(1, today(), ProjectionKey::Completed(project), || Some(vec![]));
        let after = memo.get_or_compute(1, tomorrow, ProjectionKey::Completed(project), || None);

        assert_eq!(after, None);
    }

    #[test]
    fn policy_identity_is_part_of_the_key() {
        use crate::domain::cycle::StatusOrderingPolicy;

        let memo = ProjectionMemo::new();
        let project = ProjectId::new();
        let first: Arc<dyn OrderingPolicy> = Arc::new(StatusOrderingPolicy);
        let second: Arc<dyn OrderingPolicy> = Arc::new(StatusOrderingPolicy);
        let key = |policy: &Arc<dyn OrderingPolicy>| ProjectionKey::Filtered {
            project_id: project,
            query: String::new(),
            filters: CycleFilters::none(),
            manual: true,
            policy: PolicyHandle::new(Arc::clone(policy)),
        };
        let id = CycleId::new();

        memo.get_or_compute(1, today(), key(&first), || Some(vec![]));
        let same = memo.get_or_compute(1, today(), key(&first), || Some(vec![id]));
        let swapped = memo.get_or_compute(1, today(), key(&second), || Some(vec![id]));

        assert_eq!(same, Some(vec![]));
        assert_eq!(swapped, Some(vec![id]));
    }

    #[test]
    fn distinct_arguments_are_distinct_entries() {
        let memo = ProjectionMemo::new();
        let project = ProjectId::new();
        let key = |query: &str| ProjectionKey::FilteredArchived {
            project_id: project,
            query: query.to_string(),
            filters: CycleFilters::none(),
        };

        memo.get_or_compute(1, today(), key("a"), || Some(vec![]));
        memo.get_or_compute(1, today(), key("b"), || None);

        assert_eq!(memo.len(), 2);
    }
}
