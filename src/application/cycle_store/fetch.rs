//! Fetch actions.
//!
//! List fetches for a project are best-effort: failures are logged and the
//! caller gets `None`, which means "try again" rather than "no cycles".
//! Point fetches propagate the service error.

use crate::domain::cycle::{CyclePatch, CycleProgress, CycleRecord};
use crate::domain::foundation::{CycleId, ProjectId, WorkspaceSlug};
use crate::ports::{CycleListFilter, ServiceError};

use super::{CycleStore, StoreChange};

impl CycleStore {
    /// Loads every cycle of a workspace and marks each owning project fetched.
    ///
    /// Records are merged, so detail fields already cached survive.
    pub async fn fetch_workspace_cycles(
        &self,
        workspace: &WorkspaceSlug,
    ) -> Result<Vec<CycleRecord>, ServiceError> {
        let cycles = self
            .inner
            .deps
            .cycle_service
            .list_workspace_cycles(workspace)
            .await?;

        tracing::debug!("Fetched {} cycles for workspace {}", cycles.len(), workspace);
        let change = StoreChange::WorkspaceCyclesLoaded {
            count: cycles.len(),
        };
        self.commit(change, |state| {
            for cycle in &cycles {
                state.mark_fetched(cycle.project_id);
                state.merge_cycle(cycle.clone());
            }
            true
        });
        Ok(cycles)
    }

    /// Loads a project's cycles, replacing cached copies, and marks the
    /// project fetched.
    ///
    /// The loading flag is raised for the duration of the call. Failures are
    /// swallowed and reported as `None`.
    pub async fn fetch_all_cycles(
        &self,
        workspace: &WorkspaceSlug,
        project_id: &ProjectId,
    ) -> Option<Vec<CycleRecord>> {
        self.commit(StoreChange::LoadingChanged { loading: true }, |state| {
            state.set_loading(true)
        });

        let result = self
            .inner
            .deps
            .cycle_service
            .list_project_cycles(workspace, project_id, None)
            .await;

        match result {
            Ok(cycles) => {
                tracing::debug!(project_id = %project_id, "Fetched {} project cycles", cycles.len());
                let change = StoreChange::ProjectCyclesLoaded {
                    project_id: *project_id,
                    count: cycles.len(),
                };
                self.commit(change, |state| {
                    for cycle in &cycles {
                        state.replace_cycle(cycle.clone());
                    }
                    state.mark_fetched(*project_id);
                    state.set_loading(false);
                    true
                });
                Some(cycles)
            }
            Err(e) => {
                tracing::warn!(project_id = %project_id, "Failed to fetch project cycles: {}", e);
                self.commit(StoreChange::LoadingChanged { loading: false }, |state| {
                    state.set_loading(false)
                });
                None
            }
        }
    }

    /// Loads the project's live cycle(s), marks them active and merges them
    /// into the cache. Failures are swallowed and reported as `None`.
    pub async fn fetch_active_cycle(
        &self,
        workspace: &WorkspaceSlug,
        project_id: &ProjectId,
    ) -> Option<Vec<CycleRecord>> {
        let result = self
            .inner
            .deps
            .cycle_service
            .list_project_cycles(workspace, project_id, Some(CycleListFilter::Current))
            .await;

        match result {
            Ok(cycles) => {
                let change = StoreChange::ActiveCyclesLoaded {
                    project_id: *project_id,
                    count: cycles.len(),
                };
                self.commit(change, |state| {
                    for cycle in &cycles {
                        state.mark_active(cycle.id);
                        state.merge_cycle(cycle.clone());
                    }
                    true
                });
                Some(cycles)
            }
            Err(e) => {
                tracing::warn!(project_id = %project_id, "Failed to fetch active cycle: {}", e);
                None
            }
        }
    }

    /// Loads a project's archived cycles and merges them into the cache.
    ///
    /// Does not mark the project fetched; the regular list owns that flag.
    /// Failures are swallowed and reported as `None`.
    pub async fn fetch_archived_cycles(
        &self,
        workspace: &WorkspaceSlug,
        project_id: &ProjectId,
    ) -> Option<Vec<CycleRecord>> {
        self.commit(StoreChange::LoadingChanged { loading: true }, |state| {
            state.set_loading(true)
        });

        let result = self
            .inner
            .deps
            .archive_service
            .list_archived_cycles(workspace, project_id)
            .await;

        match result {
            Ok(cycles) => {
                let change = StoreChange::ArchivedCyclesLoaded {
                    project_id: *project_id,
                    count: cycles.len(),
                };
                self.commit(change, |state| {
                    for cycle in &cycles {
                        state.merge_cycle(cycle.clone());
                    }
                    state.set_loading(false);
                    true
                });
                Some(cycles)
            }
            Err(e) => {
                tracing::warn!(project_id = %project_id, "Failed to fetch archived cycles: {}", e);
                self.commit(StoreChange::LoadingChanged { loading: false }, |state| {
                    state.set_loading(false)
                });
                None
            }
        }
    }

    /// Loads one archived cycle and merges it into the cache.
    pub async fn fetch_archived_cycle_details(
        &self,
        workspace: &WorkspaceSlug,
        project_id: &ProjectId,
        cycle_id: &CycleId,
    ) -> Result<CycleRecord, ServiceError> {
        let cycle = self
            .inner
            .deps
            .archive_service
            .get_archived_cycle(workspace, project_id, cycle_id)
            .await?;
        self.merge_detail(&cycle);
        Ok(cycle)
    }

    /// Loads one cycle with its detail fields and merges it into the cache.
    pub async fn fetch_cycle_details(
        &self,
        workspace: &WorkspaceSlug,
        project_id: &ProjectId,
        cycle_id: &CycleId,
    ) -> Result<CycleRecord, ServiceError> {
        let cycle = self
            .inner
            .deps
            .cycle_service
            .get_cycle(workspace, project_id, cycle_id)
            .await?;
        self.merge_detail(&cycle);
        Ok(cycle)
    }

    /// Loads issue counters for a cycle and attaches them to the cached
    /// record, if any.
    pub async fn fetch_active_cycle_progress(
        &self,
        workspace: &WorkspaceSlug,
        project_id: &ProjectId,
        cycle_id: &CycleId,
    ) -> Result<CycleProgress, ServiceError> {
        let progress = self
            .inner
            .deps
            .cycle_service
            .cycle_progress(workspace, project_id, cycle_id)
            .await?;

        let patch = CyclePatch::new().progress(progress);
        self.commit(
            StoreChange::CycleChanged {
                cycle_id: *cycle_id,
            },
            |state| state.patch_cycle(cycle_id, &patch),
        );
        Ok(progress)
    }

    fn merge_detail(&self, cycle: &CycleRecord) {
        self.commit(StoreChange::CycleChanged { cycle_id: cycle.id }, |state| {
            state.merge_cycle(cycle.clone());
            true
        });
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{harness, Harness};
    use crate::domain::cycle::{CycleProgress, CycleRecord};
    use crate::domain::foundation::{CycleId, CycleStatus, ProjectId, Timestamp};
    use crate::ports::ServiceError;

    // ───────────────────────────────────────────────────────────────
    // Project list
    // ───────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn fetch_all_marks_project_fetched() {
        let Harness { store, backend, ws, project } = harness();
        backend.seed(CycleRecord::new(CycleId::new(), project, "Sprint 1"));

        assert_eq!(store.current_project_cycle_ids(), None);
        let fetched = store.fetch_all_cycles(&ws, &project).await.unwrap();

        assert_eq!(fetched.len(), 1);
        assert!(store.is_project_fetched(&project));
        assert_eq!(store.current_project_cycle_ids().unwrap().len(), 1);
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn fetch_all_failure_is_silent_and_clears_loading() {
        let Harness { store, backend, ws, project } = harness();
        backend.fail_next("list_project_cycles", ServiceError::network("reset"));

        assert!(store.fetch_all_cycles(&ws, &project).await.is_none());
        assert!(!store.is_loading());
        assert!(!store.is_project_fetched(&project));
        assert_eq!(store.current_project_cycle_ids(), None);
    }

    #[tokio::test]
    async fn fetch_all_replaces_cached_detail_fields() {
        let Harness { store, backend, ws, project } = harness();
        let mut detailed = CycleRecord::new(CycleId::new(), project, "Sprint");
        detailed.description = Some("stale".into());
        backend.seed(detailed.clone());
        store.fetch_cycle_details(&ws, &project, &detailed.id).await.unwrap();

        let mut listed = detailed.clone();
        listed.description = None;
        backend.seed(listed);
        store.fetch_all_cycles(&ws, &project).await.unwrap();

        assert_eq!(store.cycle_by_id(&detailed.id).unwrap().description, None);
    }

    #[tokio::test]
    async fn fetch_all_settles_with_one_notification() {
        let Harness { store, backend, ws, project } = harness();
        backend.seed(CycleRecord::new(CycleId::new(), project, "a"));
        backend.seed(CycleRecord::new(CycleId::new(), project, "b"));
        let before = store.snapshot().version();

        store.fetch_all_cycles(&ws, &project).await;

        // loading on, then the batched load
        assert_eq!(store.snapshot().version(), before + 2);
    }

    // ───────────────────────────────────────────────────────────────
    // Workspace, active, archived
    // ───────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn workspace_fetch_marks_every_project() {
        let Harness { store, backend, ws, project } = harness();
        let other = ProjectId::new();
        backend.seed(CycleRecord::new(CycleId::new(), project, "mine"));
        backend.seed(CycleRecord::new(CycleId::new(), other, "theirs"));

        store.fetch_workspace_cycles(&ws).await.unwrap();

        assert!(store.is_project_fetched(&project));
        assert!(store.is_project_fetched(&other));
    }

    #[tokio::test]
    async fn workspace_fetch_propagates_errors() {
        let Harness { store, backend, ws, .. } = harness();
        backend.fail_next("list_workspace_cycles", ServiceError::status(500, "boom"));

        let err = store.fetch_workspace_cycles(&ws).await.unwrap_err();
        assert_eq!(err, ServiceError::status(500, "boom"));
    }

    #[tokio::test]
    async fn active_fetch_marks_current_cycles() {
        let Harness { store, backend, ws, project } = harness();
        let live = CycleRecord::new(CycleId::new(), project, "live").with_status(CycleStatus::Current);
        let done =
            CycleRecord::new(CycleId::new(), project, "done").with_status(CycleStatus::Completed);
        backend.seed(live.clone());
        backend.seed(done.clone());

        let active = store.fetch_active_cycle(&ws, &project).await.unwrap();

        assert_eq!(active, vec![live.clone()]);
        assert_eq!(store.active_cycle_by_id(&live.id), Some(live));
        assert_eq!(store.active_cycle_by_id(&done.id), None);
    }

    #[tokio::test]
    async fn active_fetch_failure_is_silent() {
        let Harness { store, backend, ws, project } = harness();
        backend.fail_next("list_project_cycles", ServiceError::network("down"));
        assert!(store.fetch_active_cycle(&ws, &project).await.is_none());
    }

    #[tokio::test]
    async fn archived_fetch_does_not_mark_project_fetched() {
        let Harness { store, backend, ws, project } = harness();
        let old = CycleRecord::new(CycleId::new(), project, "old")
            .with_archived_at(Timestamp::now());
        backend.seed(old.clone());

        let archived = store.fetch_archived_cycles(&ws, &project).await.unwrap();

        assert_eq!(archived.len(), 1);
        assert!(store.cycle_by_id(&old.id).is_some());
        assert!(!store.is_project_fetched(&project));
        assert!(!store.is_loading());
    }

    // ───────────────────────────────────────────────────────────────
    // Details and progress
    // ───────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn detail_fetch_merges_without_clobbering() {
        let Harness { store, backend, ws, project } = harness();
        let listed = CycleRecord::new(CycleId::new(), project, "Sprint");
        backend.seed(listed.clone());
        store.fetch_all_cycles(&ws, &project).await;
        store
            .fetch_active_cycle_progress(&ws, &project, &listed.id)
            .await
            .unwrap();

        store.fetch_cycle_details(&ws, &project, &listed.id).await.unwrap();

        assert!(store.cycle_by_id(&listed.id).unwrap().progress.is_some());
    }

    #[tokio::test]
    async fn detail_fetch_propagates_not_found() {
        let Harness { store, ws, project, .. } = harness();
        let err = store
            .fetch_cycle_details(&ws, &project, &CycleId::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn progress_attaches_to_cached_record() {
        let Harness { store, backend, ws, project } = harness();
        let cycle = CycleRecord::new(CycleId::new(), project, "Sprint");
        backend.seed(cycle.clone());
        let counters = CycleProgress {
            total_issues: 10,
            completed_issues: 4,
            ..CycleProgress::default()
        };
        backend.set_progress(cycle.id, counters);
        store.fetch_all_cycles(&ws, &project).await;

        let progress = store
            .fetch_active_cycle_progress(&ws, &project, &cycle.id)
            .await
            .unwrap();

        assert_eq!(progress.completion_percent(), 40);
        assert_eq!(store.cycle_by_id(&cycle.id).unwrap().progress, Some(counters));
    }
}
