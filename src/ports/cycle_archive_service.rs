//! Archived cycle port.
//!
//! Archived cycles live behind a separate endpoint family; they are never
//! returned by the regular list calls.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::cycle::CycleRecord;
use crate::domain::foundation::{CycleId, ProjectId, Timestamp, WorkspaceSlug};

use super::ServiceError;

/// Server acknowledgement of an archive request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveReceipt {
    /// When the server stamped the cycle archived.
    pub archived_at: Timestamp,
}

/// Port for archive, restore and archived listings.
#[async_trait]
pub trait CycleArchiveService: Send + Sync {
    /// List archived cycles of a project.
    async fn list_archived_cycles(
        &self,
        workspace: &WorkspaceSlug,
        project_id: &ProjectId,
    ) -> Result<Vec<CycleRecord>, ServiceError>;

    /// Fetch one archived cycle with its detail-only fields.
    async fn get_archived_cycle(
        &self,
        workspace: &WorkspaceSlug,
        project_id: &ProjectId,
        cycle_id: &CycleId,
    ) -> Result<CycleRecord, ServiceError>;

    /// Archive a cycle.
    async fn archive_cycle(
        &self,
        workspace: &WorkspaceSlug,
        project_id: &ProjectId,
        cycle_id: &CycleId,
    ) -> Result<ArchiveReceipt, ServiceError>;

    /// Restore an archived cycle.
    async fn restore_cycle(
        &self,
        workspace: &WorkspaceSlug,
        project_id: &ProjectId,
        cycle_id: &CycleId,
    ) -> Result<(), ServiceError>;
}
