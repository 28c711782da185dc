//! Estimate feature flag port.

use crate::domain::foundation::ProjectId;

/// Port answering whether a project estimates issues with points.
///
/// Point-based charts are meaningless without estimates, so chart lookups
/// fall back to the default when this returns false.
pub trait EstimateFlags: Send + Sync {
    fn estimates_enabled(&self, project_id: &ProjectId) -> bool;
}
