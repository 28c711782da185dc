//! In-memory cycle backend for testing.
//!
//! Implements both remote cycle ports against a local table so store tests
//! run without a server.
//!
//! # Features
//!
//! - Seeded records, split into live and archived listings like the API
//! - One-shot error injection per operation
//! - Gates that hold an operation until the test releases it
//! - Call counting for verification
//!
//! # Example
//!
//! ```ignore
//! let backend = Arc::new(InMemoryCycleService::new());
//! backend.seed(CycleRecord::new(CycleId::new(), project, "Sprint 1"));
//! backend.fail_next("add_favorite", ServiceError::network("reset"));
//!
//! store.add_cycle_to_favorites(&ws, &project, &id).await.unwrap_err();
//! assert_eq!(backend.calls("add_favorite"), 1);
//! ```

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;

use crate::domain::cycle::{
    CyclePatch, CycleProgress, CycleRecord, DateCheckRequest, DateCheckResult,
};
use crate::domain::foundation::{CycleId, ProjectId, Timestamp, WorkspaceSlug};
use crate::ports::{
    ArchiveReceipt, CycleArchiveService, CycleListFilter, CycleService, ServiceError,
};

#[derive(Debug, Default)]
struct BackendState {
    cycles: BTreeMap<CycleId, CycleRecord>,
    progress: HashMap<CycleId, CycleProgress>,
    failures: HashMap<String, ServiceError>,
    gates: HashMap<String, Arc<Notify>>,
    calls: HashMap<String, usize>,
}

/// Fake cycle API holding records in memory.
///
/// Workspace slugs are accepted but not checked; every record belongs to the
/// single workspace the backend stands for.
#[derive(Debug, Default)]
pub struct InMemoryCycleService {
    state: Mutex<BackendState>,
}

impl InMemoryCycleService {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    // === Test Helpers ===

    /// Inserts or replaces a record on the "server".
    pub fn seed(&self, record: CycleRecord) {
        self.lock().cycles.insert(record.id, record);
    }

    /// Sets the counters the progress endpoint reports for a cycle.
    pub fn set_progress(&self, cycle_id: CycleId, progress: CycleProgress) {
        self.lock().progress.insert(cycle_id, progress);
    }

    /// Makes the next call to `op` fail with `error`.
    pub fn fail_next(&self, op: &str, error: ServiceError) {
        self.lock().failures.insert(op.to_string(), error);
    }

    /// Holds the next call to `op` until the returned handle is notified.
    pub fn pause_next(&self, op: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.lock().gates.insert(op.to_string(), Arc::clone(&gate));
        gate
    }

    /// Number of calls made to `op`.
    pub fn calls(&self, op: &str) -> usize {
        self.lock().calls.get(op).copied().unwrap_or(0)
    }

    /// The server's copy of a record.
    pub fn stored(&self, cycle_id: &CycleId) -> Option<CycleRecord> {
        self.lock().cycles.get(cycle_id).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, BackendState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Counts the call, waits on any gate, then consumes any injected failure.
    async fn enter(&self, op: &str) -> Result<(), ServiceError> {
        let gate = {
            let mut state = self.lock();
            *state.calls.entry(op.to_string()).or_insert(0) += 1;
            state.gates.remove(op)
        };
        if let Some(gate) = gate {
            gate.notified().await;
        }
        match self.lock().failures.remove(op) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn project_records<F>(&self, project_id: &ProjectId, keep: F) -> Vec<CycleRecord>
    where
        F: Fn(&CycleRecord) -> bool,
    {
        self.lock()
            .cycles
            .values()
            .filter(|c| &c.project_id == project_id && keep(*c))
            .cloned()
            .collect()
    }

    fn find(
        &self,
        project_id: &ProjectId,
        cycle_id: &CycleId,
        archived: bool,
    ) -> Result<CycleRecord, ServiceError> {
        self.lock()
            .cycles
            .get(cycle_id)
            .filter(|c| &c.project_id == project_id && c.is_archived() == archived)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound(format!("cycle {}", cycle_id)))
    }

    fn set_favorite(
        &self,
        project_id: &ProjectId,
        cycle_id: &CycleId,
        favorite: bool,
    ) -> Result<(), ServiceError> {
        let mut state = self.lock();
        let record = state
            .cycles
            .get_mut(cycle_id)
            .filter(|c| &c.project_id == project_id)
            .ok_or_else(|| ServiceError::NotFound(format!("cycle {}", cycle_id)))?;
        record.is_favorite = favorite;
        Ok(())
    }
}

#[async_trait]
impl CycleService for InMemoryCycleService {
    async fn list_workspace_cycles(
        &self,
        _workspace: &WorkspaceSlug,
    ) -> Result<Vec<CycleRecord>, ServiceError> {
        self.enter("list_workspace_cycles").await?;
        Ok(self
            .lock()
            .cycles
            .values()
            .filter(|c| !c.is_archived())
            .cloned()
            .collect())
    }

    async fn list_project_cycles(
        &self,
        _workspace: &WorkspaceSlug,
        project_id: &ProjectId,
        filter: Option<CycleListFilter>,
    ) -> Result<Vec<CycleRecord>, ServiceError> {
        self.enter("list_project_cycles").await?;
        Ok(self.project_records(project_id, |c| {
            !c.is_archived()
                && match filter {
                    None => true,
                    Some(CycleListFilter::Current) => c.is_current(),
                }
        }))
    }

    async fn get_cycle(
        &self,
        _workspace: &WorkspaceSlug,
        project_id: &ProjectId,
        cycle_id: &CycleId,
    ) -> Result<CycleRecord, ServiceError> {
        self.enter("get_cycle").await?;
        self.find(project_id, cycle_id, false)
    }

    async fn cycle_progress(
        &self,
        _workspace: &WorkspaceSlug,
        project_id: &ProjectId,
        cycle_id: &CycleId,
    ) -> Result<CycleProgress, ServiceError> {
        self.enter("cycle_progress").await?;
        self.find(project_id, cycle_id, false)?;
        Ok(self
            .lock()
            .progress
            .get(cycle_id)
            .copied()
            .unwrap_or_default())
    }

    async fn create_cycle(
        &self,
        _workspace: &WorkspaceSlug,
        project_id: &ProjectId,
        payload: &CyclePatch,
    ) -> Result<CycleRecord, ServiceError> {
        self.enter("create_cycle").await?;
        let name = payload
            .name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| ServiceError::status(400, "name is required"))?;
        let record = CycleRecord::new(CycleId::new(), *project_id, name).merged(payload);
        self.seed(record.clone());
        Ok(record)
    }

    async fn patch_cycle(
        &self,
        _workspace: &WorkspaceSlug,
        project_id: &ProjectId,
        cycle_id: &CycleId,
        payload: &CyclePatch,
    ) -> Result<CycleRecord, ServiceError> {
        self.enter("patch_cycle").await?;
        let updated = self.find(project_id, cycle_id, false)?.merged(payload);
        self.seed(updated.clone());
        Ok(updated)
    }

    async fn delete_cycle(
        &self,
        _workspace: &WorkspaceSlug,
        project_id: &ProjectId,
        cycle_id: &CycleId,
    ) -> Result<(), ServiceError> {
        self.enter("delete_cycle").await?;
        self.find(project_id, cycle_id, false)?;
        self.lock().cycles.remove(cycle_id);
        Ok(())
    }

    async fn add_favorite(
        &self,
        _workspace: &WorkspaceSlug,
        project_id: &ProjectId,
        cycle_id: &CycleId,
    ) -> Result<(), ServiceError> {
        self.enter("add_favorite").await?;
        self.set_favorite(project_id, cycle_id, true)
    }

    async fn remove_favorite(
        &self,
        _workspace: &WorkspaceSlug,
        project_id: &ProjectId,
        cycle_id: &CycleId,
    ) -> Result<(), ServiceError> {
        self.enter("remove_favorite").await?;
        self.set_favorite(project_id, cycle_id, false)
    }

    async fn check_dates(
        &self,
        _workspace: &WorkspaceSlug,
        project_id: &ProjectId,
        payload: &DateCheckRequest,
    ) -> Result<DateCheckResult, ServiceError> {
        self.enter("check_dates").await?;
        if payload.end_date < payload.start_date {
            return Err(ServiceError::status(
                400,
                "start date cannot exceed end date",
            ));
        }
        let overlaps = self
            .project_records(project_id, |c| {
                !c.is_archived() && Some(c.id) != payload.cycle_id
            })
            .iter()
            .any(|c| match (c.start_date, c.end_date) {
                (Some(start), Some(end)) => {
                    start <= payload.end_date && payload.start_date <= end
                }
                _ => false,
            });
        Ok(DateCheckResult { status: !overlaps })
    }
}

#[async_trait]
impl CycleArchiveService for InMemoryCycleService {
    async fn list_archived_cycles(
        &self,
        _workspace: &WorkspaceSlug,
        project_id: &ProjectId,
    ) -> Result<Vec<CycleRecord>, ServiceError> {
        self.enter("list_archived_cycles").await?;
        Ok(self.project_records(project_id, CycleRecord::is_archived))
    }

    async fn get_archived_cycle(
        &self,
        _workspace: &WorkspaceSlug,
        project_id: &ProjectId,
        cycle_id: &CycleId,
    ) -> Result<CycleRecord, ServiceError> {
        self.enter("get_archived_cycle").await?;
        self.find(project_id, cycle_id, true)
    }

    async fn archive_cycle(
        &self,
        _workspace: &WorkspaceSlug,
        project_id: &ProjectId,
        cycle_id: &CycleId,
    ) -> Result<ArchiveReceipt, ServiceError> {
        self.enter("archive_cycle").await?;
        let archived_at = Timestamp::now();
        let record = self
            .find(project_id, cycle_id, false)?
            .with_archived_at(archived_at);
        self.seed(record);
        Ok(ArchiveReceipt { archived_at })
    }

    async fn restore_cycle(
        &self,
        _workspace: &WorkspaceSlug,
        project_id: &ProjectId,
        cycle_id: &CycleId,
    ) -> Result<(), ServiceError> {
        self.enter("restore_cycle").await?;
        let mut record = self.find(project_id, cycle_id, true)?;
        record.archived_at = None;
        self.seed(record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ws() -> WorkspaceSlug {
        WorkspaceSlug::new("acme").unwrap()
    }

    #[tokio::test]
    async fn listings_split_live_and_archived() {
        let backend = InMemoryCycleService::new();
        let project = ProjectId::new();
        let live = CycleRecord::new(CycleId::new(), project, "live");
        let old = CycleRecord::new(CycleId::new(), project, "old").with_archived_at(Timestamp::now());
        backend.seed(live.clone());
        backend.seed(old.clone());

        let listed = backend.list_project_cycles(&ws(), &project, None).await.unwrap();
        let archived = backend.list_archived_cycles(&ws(), &project).await.unwrap();

        assert_eq!(listed, vec![live]);
        assert_eq!(archived, vec![old]);
    }

    #[tokio::test]
    async fn injected_failure_fires_once() {
        let backend = InMemoryCycleService::new();
        backend.fail_next("list_workspace_cycles", ServiceError::network("reset"));

        assert!(backend.list_workspace_cycles(&ws()).await.is_err());
        assert!(backend.list_workspace_cycles(&ws()).await.is_ok());
        assert_eq!(backend.calls("list_workspace_cycles"), 2);
    }

    #[tokio::test]
    async fn create_requires_a_name() {
        let backend = InMemoryCycleService::new();
        let err = backend
            .create_cycle(&ws(), &ProjectId::new(), &CyclePatch::new())
            .await
            .unwrap_err();
        assert!(err.is_client_error());
    }

    #[tokio::test]
    async fn archive_then_restore() {
        let backend = InMemoryCycleService::new();
        let project = ProjectId::new();
        let cycle = CycleRecord::new(CycleId::new(), project, "c");
        backend.seed(cycle.clone());

        let receipt = backend.archive_cycle(&ws(), &project, &cycle.id).await.unwrap();
        assert_eq!(backend.stored(&cycle.id).unwrap().archived_at, Some(receipt.archived_at));

        backend.restore_cycle(&ws(), &project, &cycle.id).await.unwrap();
        assert!(!backend.stored(&cycle.id).unwrap().is_archived());
    }

    #[tokio::test]
    async fn date_check_rejects_inverted_window() {
        let backend = InMemoryCycleService::new();
        let request = DateCheckRequest {
            start_date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            cycle_id: None,
        };
        assert!(backend.check_dates(&ws(), &ProjectId::new(), &request).await.is_err());
    }
}
