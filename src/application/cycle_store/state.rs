//! Immutable cache snapshot.
//!
//! Readers hold an `Arc<CycleState>`; writers clone-on-write through the
//! store so a snapshot never changes underneath a reader.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::domain::cycle::{CyclePatch, CyclePlotType, CycleRecord};
use crate::domain::foundation::{CycleId, ProjectId};

/// What the last settled write did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreChange {
    /// Workspace-wide list merged into the cache.
    WorkspaceCyclesLoaded { count: usize },
    /// Project list loaded and the project marked fetched.
    ProjectCyclesLoaded { project_id: ProjectId, count: usize },
    /// Active cycle(s) of a project loaded and marked active.
    ActiveCyclesLoaded { project_id: ProjectId, count: usize },
    /// Archived list of a project merged into the cache.
    ArchivedCyclesLoaded { project_id: ProjectId, count: usize },
    /// One record inserted or changed.
    CycleChanged { cycle_id: CycleId },
    /// One record removed.
    CycleRemoved { cycle_id: CycleId },
    /// Chart selection changed for one cycle.
    PlotTypeChanged { cycle_id: CycleId },
    /// Project-list loading flag flipped.
    LoadingChanged { loading: bool },
}

/// Snapshot of everything the cycle cache knows.
///
/// Records are keyed in a `BTreeMap` so "first match" lookups such as the
/// active cycle are deterministic across runs.
#[derive(Debug, Clone, Default)]
pub struct CycleState {
    cycles: BTreeMap<CycleId, CycleRecord>,
    fetched_projects: BTreeSet<ProjectId>,
    active_cycle_ids: BTreeSet<CycleId>,
    plot_types: HashMap<CycleId, CyclePlotType>,
    loading: bool,
    version: u64,
    last_change: Option<StoreChange>,
}

impl CycleState {
    /// Monotonic counter bumped once per settled write.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Description of the write that produced this snapshot.
    pub fn last_change(&self) -> Option<&StoreChange> {
        self.last_change.as_ref()
    }

    /// True while a project list fetch is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// True once the project's cycle list has been fetched at least once.
    pub fn is_project_fetched(&self, project_id: &ProjectId) -> bool {
        self.fetched_projects.contains(project_id)
    }

    pub fn cycle(&self, cycle_id: &CycleId) -> Option<&CycleRecord> {
        self.cycles.get(cycle_id)
    }

    /// All cached records in id order.
    pub fn cycles(&self) -> impl Iterator<Item = &CycleRecord> {
        self.cycles.values()
    }

    /// Cached records belonging to one project, in id order.
    pub fn project_cycles<'a>(
        &'a self,
        project_id: &'a ProjectId,
    ) -> impl Iterator<Item = &'a CycleRecord> + 'a {
        self.cycles
            .values()
            .filter(move |c| &c.project_id == project_id)
    }

    /// True if the id was returned by an active-cycle fetch.
    pub fn is_marked_active(&self, cycle_id: &CycleId) -> bool {
        self.active_cycle_ids.contains(cycle_id)
    }

    /// Stored chart selection, ignoring feature gating.
    pub fn plot_type(&self, cycle_id: &CycleId) -> Option<CyclePlotType> {
        self.plot_types.get(cycle_id).copied()
    }

    /// True if no records are cached (test-only helper).
    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.cycles.is_empty()
    }

    // ───────────────────────────────────────────────────────────────
    // Writes (store-internal)
    // ───────────────────────────────────────────────────────────────

    pub(crate) fn stamp(&mut self, change: StoreChange) {
        self.version += 1;
        self.last_change = Some(change);
    }

    /// Shallow merge over any cached copy; inserts if absent.
    pub(crate) fn merge_cycle(&mut self, incoming: CycleRecord) {
        match self.cycles.get_mut(&incoming.id) {
            Some(existing) => existing.absorb(incoming),
            None => {
                self.cycles.insert(incoming.id, incoming);
            }
        }
    }

    /// Full replace of any cached copy.
    pub(crate) fn replace_cycle(&mut self, incoming: CycleRecord) {
        self.cycles.insert(incoming.id, incoming);
    }

    /// Applies a partial payload to a cached record. Returns false if the
    /// record is not cached.
    pub(crate) fn patch_cycle(&mut self, cycle_id: &CycleId, patch: &CyclePatch) -> bool {
        match self.cycles.get_mut(cycle_id) {
            Some(record) => {
                record.apply_patch(patch);
                true
            }
            None => false,
        }
    }

    /// Drops the record and any active marking.
    pub(crate) fn remove_cycle(&mut self, cycle_id: &CycleId) -> bool {
        let removed = self.cycles.remove(cycle_id).is_some();
        let unmarked = self.active_cycle_ids.remove(cycle_id);
        removed || unmarked
    }

    pub(crate) fn mark_fetched(&mut self, project_id: ProjectId) {
        self.fetched_projects.insert(project_id);
    }

    pub(crate) fn mark_active(&mut self, cycle_id: CycleId) {
        self.active_cycle_ids.insert(cycle_id);
    }

    pub(crate) fn set_plot_type(&mut self, cycle_id: CycleId, plot_type: CyclePlotType) {
        self.plot_types.insert(cycle_id, plot_type);
    }

    /// Returns true if the flag actually changed.
    pub(crate) fn set_loading(&mut self, loading: bool) -> bool {
        let changed = self.loading != loading;
        self.loading = loading;
        changed
    }
}
