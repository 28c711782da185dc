//! Cycle service port.
//!
//! Defines the contract for the remote cycle API. The store never talks to
//! the network directly; it goes through this trait so tests can swap in an
//! in-memory backend.
//!
//! # Addressing
//!
//! Every call is scoped by workspace slug and project id, mirroring the REST
//! layout `/workspaces/{slug}/projects/{project}/cycles/{cycle}`.

use async_trait::async_trait;

use crate::domain::cycle::{CyclePatch, CycleProgress, CycleRecord, DateCheckRequest, DateCheckResult};
use crate::domain::foundation::{CycleId, ProjectId, WorkspaceSlug};

use super::ServiceError;

/// Server-side list filter for project cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CycleListFilter {
    /// Only the cycle whose status is `current`.
    Current,
}

impl CycleListFilter {
    /// Value of the `cycle_view` query parameter.
    pub fn as_query_value(&self) -> &'static str {
        match self {
            CycleListFilter::Current => "current",
        }
    }
}

/// Port for standard cycle CRUD.
#[async_trait]
pub trait CycleService: Send + Sync {
    /// List every cycle across all projects of a workspace.
    async fn list_workspace_cycles(
        &self,
        workspace: &WorkspaceSlug,
    ) -> Result<Vec<CycleRecord>, ServiceError>;

    /// List the cycles of one project, optionally filtered server-side.
    async fn list_project_cycles(
        &self,
        workspace: &WorkspaceSlug,
        project_id: &ProjectId,
        filter: Option<CycleListFilter>,
    ) -> Result<Vec<CycleRecord>, ServiceError>;

    /// Fetch one cycle with its detail-only fields.
    async fn get_cycle(
        &self,
        workspace: &WorkspaceSlug,
        project_id: &ProjectId,
        cycle_id: &CycleId,
    ) -> Result<CycleRecord, ServiceError>;

    /// Fetch issue counters for one cycle.
    async fn cycle_progress(
        &self,
        workspace: &WorkspaceSlug,
        project_id: &ProjectId,
        cycle_id: &CycleId,
    ) -> Result<CycleProgress, ServiceError>;

    /// Create a cycle and return the stored record.
    async fn create_cycle(
        &self,
        workspace: &WorkspaceSlug,
        project_id: &ProjectId,
        payload: &CyclePatch,
    ) -> Result<CycleRecord, ServiceError>;

    /// Partially update a cycle and return the stored record.
    async fn patch_cycle(
        &self,
        workspace: &WorkspaceSlug,
        project_id: &ProjectId,
        cycle_id: &CycleId,
        payload: &CyclePatch,
    ) -> Result<CycleRecord, ServiceError>;

    /// Delete a cycle.
    async fn delete_cycle(
        &self,
        workspace: &WorkspaceSlug,
        project_id: &ProjectId,
        cycle_id: &CycleId,
    ) -> Result<(), ServiceError>;

    /// Mark a cycle as a favorite of the calling user.
    async fn add_favorite(
        &self,
        workspace: &WorkspaceSlug,
        project_id: &ProjectId,
        cycle_id: &CycleId,
    ) -> Result<(), ServiceError>;

    /// Remove a cycle from the calling user's favorites.
    async fn remove_favorite(
        &self,
        workspace: &WorkspaceSlug,
        project_id: &ProjectId,
        cycle_id: &CycleId,
    ) -> Result<(), ServiceError>;

    /// Ask the server whether a date window overlaps another cycle.
    async fn check_dates(
        &self,
        workspace: &WorkspaceSlug,
        project_id: &ProjectId,
        payload: &DateCheckRequest,
    ) -> Result<DateCheckResult, ServiceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_service_is_object_safe() {
        fn _accepts_dyn(_service: &dyn CycleService) {}
    }

    #[test]
    fn list_filter_query_values() {
        assert_eq!(CycleListFilter::Current.as_query_value(), "current");
    }
}
