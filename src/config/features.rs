//! Feature flags configuration

use serde::Deserialize;

use crate::domain::foundation::ProjectId;

use super::error::ValidationError;

/// Feature flags for enabling/disabling functionality
#[derive(Debug, Clone, Deserialize, Default)]
pub struct FeatureFlags {
    /// Projects with point estimates enabled (comma-separated UUIDs)
    pub estimate_projects: Option<String>,
}

impl FeatureFlags {
    /// Parse the estimate project list
    pub fn estimate_project_ids(&self) -> Result<Vec<ProjectId>, ValidationError> {
        self.estimate_projects
            .as_deref()
            .map(|s| {
                s.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(|s| {
                        s.parse::<ProjectId>()
                            .map_err(|_| ValidationError::InvalidProjectId(s.to_string()))
                    })
                    .collect()
            })
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    /// Validate feature flags
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.estimate_project_ids().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_flags_defaults() {
        let flags = FeatureFlags::default();
        assert_eq!(flags.estimate_project_ids(), Ok(vec![]));
    }

    #[test]
    fn test_parses_project_list() {
        let a = ProjectId::new();
        let b = ProjectId::new();
        let flags = FeatureFlags {
            estimate_projects: Some(format!("{}, {},", a, b)),
        };
        assert_eq!(flags.estimate_project_ids(), Ok(vec![a, b]));
    }

    #[test]
    fn test_rejects_bad_project_id() {
        let flags = FeatureFlags {
            estimate_projects: Some("not-a-uuid".to_string()),
        };
        assert_eq!(
            flags.validate(),
            Err(ValidationError::InvalidProjectId("not-a-uuid".to_string()))
        );
    }
}
