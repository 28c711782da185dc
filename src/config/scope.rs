//! Workspace and project the CLI operates on

use serde::Deserialize;

use crate::domain::foundation::{ProjectId, WorkspaceSlug};

use super::error::ValidationError;

/// Target workspace and project
#[derive(Debug, Clone, Deserialize)]
pub struct ScopeConfig {
    /// Workspace slug
    pub workspace: String,

    /// Project UUID
    pub project_id: String,
}

impl ScopeConfig {
    /// Parsed workspace slug
    pub fn workspace_slug(&self) -> Result<WorkspaceSlug, ValidationError> {
        WorkspaceSlug::new(self.workspace.as_str())
            .map_err(|e| ValidationError::InvalidWorkspaceSlug(e.to_string()))
    }

    /// Parsed project id
    pub fn project(&self) -> Result<ProjectId, ValidationError> {
        self.project_id
            .trim()
            .parse()
            .map_err(|_| ValidationError::InvalidProjectId(self.project_id.clone()))
    }

    /// Validate scope configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.workspace_slug()?;
        self.project()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_scope() {
        let project = ProjectId::new();
        let scope = ScopeConfig {
            workspace: "acme".to_string(),
            project_id: project.to_string(),
        };
        assert_eq!(scope.workspace_slug().unwrap().as_str(), "acme");
        assert_eq!(scope.project().unwrap(), project);
    }

    #[test]
    fn test_rejects_blank_workspace() {
        let scope = ScopeConfig {
            workspace: " ".to_string(),
            project_id: ProjectId::new().to_string(),
        };
        assert!(matches!(
            scope.validate(),
            Err(ValidationError::InvalidWorkspaceSlug(_))
        ));
    }
}
