//! Static implementations of the context ports.
//!
//! Hosts without a router or a filter store (the CLI, tests) use these to
//! feed the cycle store fixed values that can be swapped at runtime.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use crate::domain::cycle::{CycleFilters, OrderingPolicy, StatusOrderingPolicy};
use crate::domain::foundation::{ProjectId, WorkspaceSlug};
use crate::ports::{CycleFilterSource, EstimateFlags, RouterContext};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ════════════════════════════════════════════════════════════════════════════════
// Router
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Default)]
struct Route {
    workspace: Option<WorkspaceSlug>,
    project_id: Option<ProjectId>,
}

/// Router context with a settable workspace and project.
#[derive(Debug, Default)]
pub struct StaticRouterContext {
    route: Mutex<Route>,
}

impl StaticRouterContext {
    pub fn new(workspace: WorkspaceSlug, project_id: ProjectId) -> Self {
        Self {
            route: Mutex::new(Route {
                workspace: Some(workspace),
                project_id: Some(project_id),
            }),
        }
    }

    /// Navigates to another project, or away from any project.
    pub fn set_project(&self, project_id: Option<ProjectId>) {
        lock(&self.route).project_id = project_id;
    }
}

impl RouterContext for StaticRouterContext {
    fn workspace_slug(&self) -> Option<WorkspaceSlug> {
        lock(&self.route).workspace.clone()
    }

    fn project_id(&self) -> Option<ProjectId> {
        lock(&self.route).project_id
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Filters
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Default)]
struct FilterSettings {
    filters: HashMap<ProjectId, CycleFilters>,
    archived_filters: HashMap<ProjectId, CycleFilters>,
    search_query: String,
    archived_search_query: String,
}

/// Filter source holding plain values.
///
/// Ordering defaults to [`StatusOrderingPolicy`].
pub struct StaticFilterSource {
    settings: Mutex<FilterSettings>,
    policy: RwLock<Arc<dyn OrderingPolicy>>,
}

impl Default for StaticFilterSource {
    fn default() -> Self {
        Self {
            settings: Mutex::new(FilterSettings::default()),
            policy: RwLock::new(Arc::new(StatusOrderingPolicy)),
        }
    }
}

impl StaticFilterSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_filters(&self, project_id: ProjectId, filters: CycleFilters) {
        lock(&self.settings).filters.insert(project_id, filters);
    }

    pub fn set_archived_filters(&self, project_id: ProjectId, filters: CycleFilters) {
        lock(&self.settings)
            .archived_filters
            .insert(project_id, filters);
    }

    pub fn set_search_query(&self, query: impl Into<String>) {
        lock(&self.settings).search_query = query.into();
    }

    pub fn set_archived_search_query(&self, query: impl Into<String>) {
        lock(&self.settings).archived_search_query = query.into();
    }

    pub fn set_ordering_policy(&self, policy: Arc<dyn OrderingPolicy>) {
        *self.policy.write().unwrap_or_else(PoisonError::into_inner) = policy;
    }
}

impl CycleFilterSource for StaticFilterSource {
    fn filters(&self, project_id: &ProjectId) -> CycleFilters {
        lock(&self.settings)
            .filters
            .get(project_id)
            .cloned()
            .unwrap_or_default()
    }

    fn search_query(&self) -> String {
        lock(&self.settings).search_query.clone()
    }

    fn archived_filters(&self, project_id: &ProjectId) -> CycleFilters {
        lock(&self.settings)
            .archived_filters
            .get(project_id)
            .cloned()
            .unwrap_or_default()
    }

    fn archived_search_query(&self) -> String {
        lock(&self.settings).archived_search_query.clone()
    }

    fn ordering_policy(&self) -> Arc<dyn OrderingPolicy> {
        Arc::clone(&self.policy.read().unwrap_or_else(PoisonError::into_inner))
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Estimates
// ════════════════════════════════════════════════════════════════════════════════

/// Estimate flags backed by a set of enabled projects.
#[derive(Debug, Default)]
pub struct StaticEstimateFlags {
    enabled: Mutex<HashSet<ProjectId>>,
}

impl StaticEstimateFlags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flags with estimates enabled for every listed project.
    pub fn with_projects(projects: impl IntoIterator<Item = ProjectId>) -> Self {
        Self {
            enabled: Mutex::new(projects.into_iter().collect()),
        }
    }

    pub fn set_enabled(&self, project_id: ProjectId, enabled: bool) {
        let mut set = lock(&self.enabled);
        if enabled {
            set.insert(project_id);
        } else {
            set.remove(&project_id);
        }
    }
}

impl EstimateFlags for StaticEstimateFlags {
    fn estimates_enabled(&self, project_id: &ProjectId) -> bool {
        lock(&self.enabled).contains(project_id)
    }
}
