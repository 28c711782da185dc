//! CycleStore - observable cycle cache and its read side.
//!
//! The store owns one `Arc<CycleState>` inside a `tokio::sync::watch`
//! channel. Every write clones the state on demand, applies all of its field
//! changes, bumps the version and notifies subscribers exactly once. Readers
//! either take a snapshot or call the derived views below, which are
//! memoized per snapshot version.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::NaiveDate;
use futures::future::join_all;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::domain::cycle::{CyclePlotType, CycleRecord};
use crate::domain::foundation::{CycleId, ProjectId};
use crate::ports::{
    Clock, CycleArchiveService, CycleFilterSource, CycleService, EstimateFlags, RouterContext,
};

use super::memo::{PolicyHandle, ProjectionKey, ProjectionMemo};
use super::{projections, CycleState, StoreChange};

/// Collaborators a [`CycleStore`] is wired to.
#[derive(Clone)]
pub struct CycleStoreDeps {
    pub cycle_service: Arc<dyn CycleService>,
    pub archive_service: Arc<dyn CycleArchiveService>,
    pub router: Arc<dyn RouterContext>,
    pub filters: Arc<dyn CycleFilterSource>,
    pub estimates: Arc<dyn EstimateFlags>,
    pub clock: Arc<dyn Clock>,
}

pub(super) struct StoreInner {
    pub(super) state: watch::Sender<Arc<CycleState>>,
    pub(super) memo: ProjectionMemo,
    pub(super) deps: CycleStoreDeps,
    pub(super) background: Mutex<Vec<JoinHandle<()>>>,
}

/// Observable cache of cycle records with CRUD actions.
///
/// Cloning is cheap and yields a handle to the same cache.
#[derive(Clone)]
pub struct CycleStore {
    pub(super) inner: Arc<StoreInner>,
}

impl CycleStore {
    pub fn new(deps: CycleStoreDeps) -> Self {
        let (state, _) = watch::channel(Arc::new(CycleState::default()));
        Self {
            inner: Arc::new(StoreInner {
                state,
                memo: ProjectionMemo::new(),
                deps,
                background: Mutex::new(Vec::new()),
            }),
        }
    }

    // ───────────────────────────────────────────────────────────────
    // Observation
    // ───────────────────────────────────────────────────────────────

    /// Current immutable snapshot.
    pub fn snapshot(&self) -> Arc<CycleState> {
        Arc::clone(&self.inner.state.borrow())
    }

    /// Receiver notified once per settled write.
    pub fn subscribe(&self) -> watch::Receiver<Arc<CycleState>> {
        self.inner.state.subscribe()
    }

    /// True while a project list fetch is in flight.
    pub fn is_loading(&self) -> bool {
        self.inner.state.borrow().is_loading()
    }

    /// True once the project's cycles have been fetched at least once.
    pub fn is_project_fetched(&self, project_id: &ProjectId) -> bool {
        self.inner.state.borrow().is_project_fetched(project_id)
    }

    /// Applies `write` as one transaction.
    ///
    /// `write` returns false when it changed nothing; no version bump or
    /// notification happens in that case.
    pub(super) fn commit<F>(&self, change: StoreChange, write: F) -> bool
    where
        F: FnOnce(&mut CycleState) -> bool,
    {
        self.inner.state.send_if_modified(|current| {
            let next = Arc::make_mut(current);
            if !write(next) {
                return false;
            }
            next.stamp(change);
            true
        })
    }

    /// Runs `task` detached, keeping its handle for [`CycleStore::settle`].
    pub(super) fn spawn_background<F>(&self, task: F)
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(task);
        let mut background = self
            .inner
            .background
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        background.retain(|h| !h.is_finished());
        background.push(handle);
    }

    /// Waits for every detached reconciliation pass started so far,
    /// including passes those passes start.
    pub async fn settle(&self) {
        loop {
            let pending: Vec<JoinHandle<()>> = std::mem::take(
                &mut *self
                    .inner
                    .background
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner),
            );
            if pending.is_empty() {
                return;
            }
            for result in join_all(pending).await {
                if let Err(e) = result {
                    tracing::warn!("Background cycle refresh aborted: {}", e);
                }
            }
        }
    }

    // ───────────────────────────────────────────────────────────────
    // Derived views
    // ───────────────────────────────────────────────────────────────

    /// Looks up `key` for the current snapshot, computing on a miss.
    ///
    /// The clock is read once; that date both keys the entry and feeds
    /// `compute`.
    fn memoized<F>(&self, key: ProjectionKey, compute: F) -> Option<Vec<CycleId>>
    where
        F: FnOnce(&CycleState, NaiveDate) -> Option<Vec<CycleId>>,
    {
        let snapshot = self.snapshot();
        let today = self.inner.deps.clock.today();
        self.inner
            .memo
            .get_or_compute(snapshot.version(), today, key, || compute(&snapshot, today))
    }

    fn current_project(&self) -> Option<ProjectId> {
        self.inner.deps.router.project_id()
    }

    /// Unarchived cycles of the open project by sort order.
    pub fn current_project_cycle_ids(&self) -> Option<Vec<CycleId>> {
        let project_id = self.current_project()?;
        self.project_cycle_ids(&project_id)
    }

    /// Cycles of the open project whose end date has passed.
    pub fn current_project_completed_cycle_ids(&self) -> Option<Vec<CycleId>> {
        let project_id = self.current_project()?;
        self.memoized(ProjectionKey::Completed(project_id), |s, today| {
            projections::completed_ids(s, &project_id, today)
        })
    }

    /// Cycles of the open project starting after today.
    pub fn current_project_upcoming_cycle_ids(&self) -> Option<Vec<CycleId>> {
        let project_id = self.current_project()?;
        self.memoized(ProjectionKey::Upcoming(project_id), |s, today| {
            projections::upcoming_ids(s, &project_id, today)
        })
    }

    /// Cycles of the open project that are not completed.
    pub fn current_project_incomplete_cycle_ids(&self) -> Option<Vec<CycleId>> {
        let project_id = self.current_project()?;
        self.memoized(ProjectionKey::Incomplete(project_id), |s, today| {
            projections::incomplete_ids(s, &project_id, today)
        })
    }

    /// Undated cycles of the open project.
    pub fn current_project_draft_cycle_ids(&self) -> Option<Vec<CycleId>> {
        let project_id = self.current_project()?;
        self.memoized(ProjectionKey::Draft(project_id), |s, _| {
            projections::draft_ids(s, &project_id)
        })
    }

    /// Archived cycles of the open project by sort order.
    pub fn current_project_archived_cycle_ids(&self) -> Option<Vec<CycleId>> {
        let project_id = self.current_project()?;
        self.memoized(ProjectionKey::Archived(project_id), |s, _| {
            projections::archived_ids(s, &project_id)
        })
    }

    /// Id of the open project's live cycle.
    pub fn current_project_active_cycle_id(&self) -> Option<CycleId> {
        let project_id = self.current_project()?;
        projections::active_id(&self.snapshot(), &project_id)
    }

    /// Record of the open project's live cycle.
    pub fn current_project_active_cycle(&self) -> Option<CycleRecord> {
        let cycle_id = self.current_project_active_cycle_id()?;
        self.cycle_by_id(&cycle_id)
    }

    /// Unarchived cycles of `project_id` by sort order, no search or filters.
    pub fn project_cycle_ids(&self, project_id: &ProjectId) -> Option<Vec<CycleId>> {
        self.memoized(ProjectionKey::All(*project_id), |s, _| {
            projections::all_ids(s, project_id)
        })
    }

    /// Records behind [`CycleStore::project_cycle_ids`].
    pub fn project_cycle_details(&self, project_id: &ProjectId) -> Option<Vec<CycleRecord>> {
        let ids = self.project_cycle_ids(project_id)?;
        let snapshot = self.snapshot();
        Some(
            ids.iter()
                .filter_map(|id| snapshot.cycle(id).cloned())
                .collect(),
        )
    }

    /// Unarchived cycles passing the filter store's search and predicates.
    pub fn filtered_cycle_ids(&self, project_id: &ProjectId, manual: bool) -> Option<Vec<CycleId>> {
        let source = &self.inner.deps.filters;
        let query = source.search_query();
        let filters = source.filters(project_id);
        let policy = source.ordering_policy();
        let key = ProjectionKey::Filtered {
            project_id: *project_id,
            query: query.clone(),
            filters: filters.clone(),
            manual,
            policy: PolicyHandle::new(Arc::clone(&policy)),
        };
        self.memoized(key, |s, _| {
            projections::filtered_ids(s, project_id, &query, &filters, policy.as_ref(), manual)
        })
    }

    /// Filtered cycles whose server status is `completed`.
    pub fn filtered_completed_cycle_ids(&self, project_id: &ProjectId) -> Option<Vec<CycleId>> {
        let source = &self.inner.deps.filters;
        let query = source.search_query();
        let filters = source.filters(project_id);
        let key = ProjectionKey::FilteredCompleted {
            project_id: *project_id,
            query: query.clone(),
            filters: filters.clone(),
        };
        self.memoized(key, |s, _| {
            projections::filtered_completed_ids(s, project_id, &query, &filters)
        })
    }

    /// Archived cycles passing the archived search and predicates.
    pub fn filtered_archived_cycle_ids(&self, project_id: &ProjectId) -> Option<Vec<CycleId>> {
        let source = &self.inner.deps.filters;
        let query = source.archived_search_query();
        let filters = source.archived_filters(project_id);
        let key = ProjectionKey::FilteredArchived {
            project_id: *project_id,
            query: query.clone(),
            filters: filters.clone(),
        };
        self.memoized(key, |s, _| {
            projections::filtered_archived_ids(s, project_id, &query, &filters)
        })
    }

    // ───────────────────────────────────────────────────────────────
    // Point lookups
    // ───────────────────────────────────────────────────────────────

    pub fn cycle_by_id(&self, cycle_id: &CycleId) -> Option<CycleRecord> {
        self.inner.state.borrow().cycle(cycle_id).cloned()
    }

    pub fn cycle_name_by_id(&self, cycle_id: &CycleId) -> Option<String> {
        self.inner
            .state
            .borrow()
            .cycle(cycle_id)
            .map(|c| c.name.clone())
    }

    /// The record, but only if an active-cycle fetch marked it active.
    pub fn active_cycle_by_id(&self, cycle_id: &CycleId) -> Option<CycleRecord> {
        let state = self.inner.state.borrow();
        if !state.is_marked_active(cycle_id) {
            return None;
        }
        state.cycle(cycle_id).cloned()
    }

    // ───────────────────────────────────────────────────────────────
    // Chart selection
    // ───────────────────────────────────────────────────────────────

    /// Chart type for a cycle. Always the default unless the open project
    /// has estimates enabled.
    pub fn cycle_plot_type(&self, cycle_id: &CycleId) -> CyclePlotType {
        let estimated = self
            .current_project()
            .is_some_and(|p| self.inner.deps.estimates.estimates_enabled(&p));
        if !estimated {
            return CyclePlotType::default();
        }
        self.inner
            .state
            .borrow()
            .plot_type(cycle_id)
            .unwrap_or_default()
    }

    /// Stores a chart type for a cycle, unconditionally.
    pub fn set_plot_type(&self, cycle_id: CycleId, plot_type: CyclePlotType) {
        self.commit(StoreChange::PlotTypeChanged { cycle_id }, |state| {
            state.set_plot_type(cycle_id, plot_type);
            true
        });
    }
}
