//! Mutating actions.
//!
//! Three failure policies apply:
//! - update and favorite toggles roll back or reconcile, then return the error;
//! - archive and restore log the error and leave the cache untouched;
//! - create, delete and date checks write nothing until the server confirms.

use crate::domain::cycle::{CyclePatch, CycleRecord, DateCheckRequest, DateCheckResult};
use crate::domain::foundation::{CycleId, ProjectId, WorkspaceSlug};
use crate::ports::ServiceError;

use super::{CycleStore, StoreChange};

impl CycleStore {
    /// Creates a cycle and caches the stored record.
    pub async fn create_cycle(
        &self,
        workspace: &WorkspaceSlug,
        project_id: &ProjectId,
        payload: &CyclePatch,
    ) -> Result<CycleRecord, ServiceError> {
        let cycle = self
            .inner
            .deps
            .cycle_service
            .create_cycle(workspace, project_id, payload)
            .await?;

        tracing::debug!(cycle_id = %cycle.id, "Created cycle");
        self.commit(StoreChange::CycleChanged { cycle_id: cycle.id }, |state| {
            state.replace_cycle(cycle.clone());
            true
        });
        Ok(cycle)
    }

    /// Applies `payload` locally, then sends it to the server.
    ///
    /// On success a detail refetch runs in the background to pick up
    /// server-computed fields. On failure the project list and active cycle
    /// are refetched in the background and the error is returned.
    pub async fn update_cycle_details(
        &self,
        workspace: &WorkspaceSlug,
        project_id: &ProjectId,
        cycle_id: &CycleId,
        payload: &CyclePatch,
    ) -> Result<CycleRecord, ServiceError> {
        self.update_cycle_local(cycle_id, payload);

        let result = self
            .inner
            .deps
            .cycle_service
            .patch_cycle(workspace, project_id, cycle_id, payload)
            .await;

        let store = self.clone();
        let workspace = workspace.clone();
        let project_id = *project_id;
        let cycle_id = *cycle_id;

        match result {
            Ok(updated) => {
                self.spawn_background(async move {
                    if let Err(e) = store
                        .fetch_cycle_details(&workspace, &project_id, &cycle_id)
                        .await
                    {
                        tracing::warn!(cycle_id = %cycle_id, "Failed to refresh updated cycle: {}", e);
                    }
                });
                Ok(updated)
            }
            Err(e) => {
                tracing::warn!(cycle_id = %cycle_id, "Cycle update rejected, refetching: {}", e);
                self.spawn_background(async move {
                    store.fetch_all_cycles(&workspace, &project_id).await;
                    store.fetch_active_cycle(&workspace, &project_id).await;
                });
                Err(e)
            }
        }
    }

    /// Merges `payload` into the cached record without a network call.
    ///
    /// Returns false if the cycle is not cached.
    pub fn update_cycle_local(&self, cycle_id: &CycleId, payload: &CyclePatch) -> bool {
        self.commit(
            StoreChange::CycleChanged {
                cycle_id: *cycle_id,
            },
            |state| state.patch_cycle(cycle_id, payload),
        )
    }

    /// Deletes a cycle, then drops it and its active marking from the cache.
    pub async fn delete_cycle(
        &self,
        workspace: &WorkspaceSlug,
        project_id: &ProjectId,
        cycle_id: &CycleId,
    ) -> Result<(), ServiceError> {
        self.inner
            .deps
            .cycle_service
            .delete_cycle(workspace, project_id, cycle_id)
            .await?;

        tracing::debug!(cycle_id = %cycle_id, "Deleted cycle");
        self.commit(
            StoreChange::CycleRemoved {
                cycle_id: *cycle_id,
            },
            |state| state.remove_cycle(cycle_id),
        );
        Ok(())
    }

    /// Marks a cycle favorite, optimistically.
    pub async fn add_cycle_to_favorites(
        &self,
        workspace: &WorkspaceSlug,
        project_id: &ProjectId,
        cycle_id: &CycleId,
    ) -> Result<(), ServiceError> {
        let previous = self.set_favorite_local(cycle_id, true);
        let result = self
            .inner
            .deps
            .cycle_service
            .add_favorite(workspace, project_id, cycle_id)
            .await;
        self.settle_favorite(cycle_id, previous, result)
    }

    /// Clears a cycle's favorite flag, optimistically.
    pub async fn remove_cycle_from_favorites(
        &self,
        workspace: &WorkspaceSlug,
        project_id: &ProjectId,
        cycle_id: &CycleId,
    ) -> Result<(), ServiceError> {
        let previous = self.set_favorite_local(cycle_id, false);
        let result = self
            .inner
            .deps
            .cycle_service
            .remove_favorite(workspace, project_id, cycle_id)
            .await;
        self.settle_favorite(cycle_id, previous, result)
    }

    /// Sets the cached flag and returns its prior value, if cached.
    fn set_favorite_local(&self, cycle_id: &CycleId, favorite: bool) -> Option<bool> {
        let previous = self.cycle_by_id(cycle_id).map(|c| c.is_favorite)?;
        self.update_cycle_local(cycle_id, &CyclePatch::new().favorite(favorite));
        Some(previous)
    }

    fn settle_favorite(
        &self,
        cycle_id: &CycleId,
        previous: Option<bool>,
        result: Result<(), ServiceError>,
    ) -> Result<(), ServiceError> {
        if let Err(e) = result {
            tracing::warn!(cycle_id = %cycle_id, "Favorite toggle failed, rolling back: {}", e);
            if let Some(previous) = previous {
                self.update_cycle_local(cycle_id, &CyclePatch::new().favorite(previous));
            }
            return Err(e);
        }
        Ok(())
    }

    /// Archives a cycle and stamps the server's archive time locally.
    ///
    /// A cycle already archived in the cache is left alone without a network
    /// call. Failures are logged and not returned.
    pub async fn archive_cycle(
        &self,
        workspace: &WorkspaceSlug,
        project_id: &ProjectId,
        cycle_id: &CycleId,
    ) {
        if self.cycle_by_id(cycle_id).is_some_and(|c| c.is_archived()) {
            return;
        }

        let result = self
            .inner
            .deps
            .archive_service
            .archive_cycle(workspace, project_id, cycle_id)
            .await;

        match result {
            Ok(receipt) => {
                let patch = CyclePatch::new().archived_at(Some(receipt.archived_at));
                self.commit(
                    StoreChange::CycleChanged {
                        cycle_id: *cycle_id,
                    },
                    |state| state.patch_cycle(cycle_id, &patch),
                );
            }
            Err(e) => {
                tracing::error!(cycle_id = %cycle_id, "Failed to archive cycle: {}", e);
            }
        }
    }

    /// Restores an archived cycle and clears its archive stamp locally.
    ///
    /// A cycle not archived in the cache is left alone without a network
    /// call. Failures are logged and not returned.
    pub async fn restore_cycle(
        &self,
        workspace: &WorkspaceSlug,
        project_id: &ProjectId,
        cycle_id: &CycleId,
    ) {
        if !self.cycle_by_id(cycle_id).is_some_and(|c| c.is_archived()) {
            return;
        }

        let result = self
            .inner
            .deps
            .archive_service
            .restore_cycle(workspace, project_id, cycle_id)
            .await;

        match result {
            Ok(()) => {
                let patch = CyclePatch::new().archived_at(None);
                self.commit(
                    StoreChange::CycleChanged {
                        cycle_id: *cycle_id,
                    },
                    |state| state.patch_cycle(cycle_id, &patch),
                );
            }
            Err(e) => {
                tracing::error!(cycle_id = %cycle_id, "Failed to restore cycle: {}", e);
            }
        }
    }

    /// Asks the server whether a date window is free. Touches no state.
    pub async fn validate_cycle_dates(
        &self,
        workspace: &WorkspaceSlug,
        project_id: &ProjectId,
        payload: &DateCheckRequest,
    ) -> Result<DateCheckResult, ServiceError> {
        self.inner
            .deps
            .cycle_service
            .check_dates(workspace, project_id, payload)
            .await
    }
}
