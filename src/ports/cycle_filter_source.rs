//! Filter source port.
//!
//! Search text and filter predicates are owned by a sibling filter store;
//! the cycle cache only reads them when computing filtered views.

use std::sync::Arc;

use crate::domain::cycle::{CycleFilters, OrderingPolicy};
use crate::domain::foundation::ProjectId;

/// Port exposing per-project search and filter state.
pub trait CycleFilterSource: Send + Sync {
    /// Filters applied to the regular list of a project.
    fn filters(&self, project_id: &ProjectId) -> CycleFilters;

    /// Free-text search for the regular list.
    fn search_query(&self) -> String;

    /// Filters applied to the archived list of a project.
    fn archived_filters(&self, project_id: &ProjectId) -> CycleFilters;

    /// Free-text search for the archived list.
    fn archived_search_query(&self) -> String;

    /// Ordering used by the filtered regular list.
    fn ordering_policy(&self) -> Arc<dyn OrderingPolicy>;
}
