//! Router context port.
//!
//! The cache has no notion of navigation; it asks the host which workspace
//! and project are on screen when resolving the `current_project_*` views.

use crate::domain::foundation::{ProjectId, WorkspaceSlug};

/// Port exposing the active workspace and project.
pub trait RouterContext: Send + Sync {
    /// Workspace currently open, if any.
    fn workspace_slug(&self) -> Option<WorkspaceSlug>;

    /// Project currently open, if any.
    fn project_id(&self) -> Option<ProjectId>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn router_context_is_object_safe() {
        fn _accepts_dyn(_router: &dyn RouterContext) {}
    }
}
