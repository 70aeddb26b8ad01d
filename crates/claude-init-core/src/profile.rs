use std::fmt;
use std::path::Path;

use ai_provider::ProviderId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analyzer::RepositoryAnalysis;
use crate::error::{InitError, Result};
use crate::{io, paths};

pub const MIN_BUSINESS_CONTEXT_CHARS: usize = 20;

// ---------------------------------------------------------------------------
// ProjectOrigin
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProjectOrigin {
    #[default]
    New,
    Existing,
}

impl fmt::Display for ProjectOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectOrigin::New => f.write_str("new"),
            ProjectOrigin::Existing => f.write_str("existing"),
        }
    }
}

// ---------------------------------------------------------------------------
// ProjectProfile
// ---------------------------------------------------------------------------

/// Facts about the project every later stage reads. Persisted once as
/// `.claude/project.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectProfile {
    #[serde(rename = "project_origin", default)]
    pub origin: ProjectOrigin,
    #[serde(rename = "project_name")]
    pub name: String,
    pub description: String,
    pub language: String,
    #[serde(default)]
    pub framework: String,
    pub architecture: String,
    #[serde(default)]
    pub database: String,
    #[serde(rename = "project_category")]
    pub category: String,
    pub business_context: String,
    #[serde(rename = "ai_provider")]
    pub provider: ProviderId,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub documentation_dirs: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl ProjectProfile {
    /// An empty draft, the starting point of the survey for new projects.
    pub fn draft(origin: ProjectOrigin, provider: ProviderId) -> Self {
        Self {
            origin,
            name: String::new(),
            description: String::new(),
            language: String::new(),
            framework: String::new(),
            architecture: String::new(),
            database: String::new(),
            category: String::new(),
            business_context: String::new(),
            provider,
            documentation_dirs: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Pre-filled draft for an existing project.
    pub fn from_analysis(analysis: &RepositoryAnalysis, provider: ProviderId) -> Self {
        Self {
            name: analysis.name.clone(),
            description: analysis.description.clone(),
            language: analysis.language.clone(),
            framework: analysis.framework.clone(),
            architecture: analysis.architecture.clone(),
            database: analysis.database.clone(),
            category: analysis.project_category.clone(),
            business_context: analysis.business_context.clone(),
            ..Self::draft(ProjectOrigin::Existing, provider)
        }
    }

    /// Trim whitespace around every free-text field.
    pub fn trimmed(mut self) -> Self {
        for field in [
            &mut self.name,
            &mut self.description,
            &mut self.language,
            &mut self.framework,
            &mut self.architecture,
            &mut self.database,
            &mut self.category,
            &mut self.business_context,
        ] {
            *field = field.trim().to_string();
        }
        self
    }

    /// Reject whitespace-only required fields and a too-short business context.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("project name", &self.name),
            ("description", &self.description),
            ("language", &self.language),
            ("architecture", &self.architecture),
            ("project category", &self.category),
            ("business context", &self.business_context),
        ];
        for (label, value) in required {
            if value.trim().is_empty() {
                return Err(InitError::InvalidProfile(format!("{label} is required")));
            }
        }
        if self.business_context.trim().chars().count() < MIN_BUSINESS_CONTEXT_CHARS {
            return Err(InitError::InvalidProfile(format!(
                "business context must be at least {MIN_BUSINESS_CONTEXT_CHARS} characters"
            )));
        }
        Ok(())
    }

    pub fn has_framework(&self) -> bool {
        !self.framework.trim().is_empty()
    }

    /// Write the YAML sidecar under `<root>/.claude/project.yaml`.
    pub fn save_sidecar(&self, root: &Path) -> Result<()> {
        self.save_to(&paths::project_file(root))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let data = serde_yaml::to_string(self)?;
        io::atomic_write(path, data.as_bytes())
    }

    pub fn load_sidecar(root: &Path) -> Result<Self> {
        Self::load_from(&paths::project_file(root))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let Some(data) = io::read_if_exists(path)? else {
            return Err(InitError::ProjectConfigNotFound(path.to_path_buf()));
        };
        Ok(serde_yaml::from_str(&data)?)
    }
}

// ---------------------------------------------------------------------------
// Documentation directories
// ---------------------------------------------------------------------------

/// Which of the common documentation directories exist under `root`.
pub fn detect_documentation_dirs(root: &Path) -> Vec<String> {
    paths::DOC_DIRS
        .iter()
        .filter(|d| root.join(d).is_dir())
        .map(|d| d.to_string())
        .collect()
}

/// Keep only the user-supplied directories that exist and are not already
/// listed. Missing ones are logged and skipped.
pub fn merge_documentation_dirs(root: &Path, detected: &[String], extra: &[String]) -> Vec<String> {
    let mut dirs = detected.to_vec();
    for dir in extra.iter().map(|d| d.trim().trim_end_matches('/')) {
        if dir.is_empty() || dirs.iter().any(|d| d == dir) {
            continue;
        }
        if root.join(dir).is_dir() {
            dirs.push(dir.to_string());
        } else {
            tracing::warn!(dir, "documentation directory does not exist, skipping");
        }
    }
    dirs
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn valid() -> ProjectProfile {
        ProjectProfile {
            name: "svc".into(),
            description: "Order service".into(),
            language: "Go".into(),
            architecture: "Clean".into(),
            category: "API REST".into(),
            business_context: "Handles orders for a mid-size retailer".into(),
            ..ProjectProfile::draft(ProjectOrigin::New, ProviderId::Cli)
        }
    }

    #[test]
    fn valid_profile_passes() {
        valid().validate().unwrap();
    }

    #[test]
    fn whitespace_only_required_field_fails() {
        let p = ProjectProfile {
            language: "   ".into(),
            ..valid()
        };
        let err = p.validate().unwrap_err();
        assert_eq!(err.to_string(), "invalid project profile: language is required");
    }

    #[test]
    fn nineteen_char_business_context_fails() {
        let p = ProjectProfile {
            business_context: "a".repeat(19),
            ..valid()
        };
        let err = p.validate().unwrap_err();
        assert!(err.to_string().contains("at least 20 characters"));

        let p = ProjectProfile {
            business_context: "a".repeat(20),
            ..valid()
        };
        p.validate().unwrap();
    }

    #[test]
    fn optional_fields_may_be_empty() {
        let p = ProjectProfile {
            framework: String::new(),
            database: String::new(),
            ..valid()
        };
        p.validate().unwrap();
        assert!(!p.has_framework());
    }

    #[test]
    fn trimmed_strips_fields() {
        let p = ProjectProfile {
            name: "  svc \n".into(),
            ..valid()
        }
        .trimmed();
        assert_eq!(p.name, "svc");
    }

    #[test]
    fn sidecar_uses_documented_keys() {
        let dir = TempDir::new().unwrap();
        let p = valid();
        p.save_sidecar(dir.path()).unwrap();

        let raw = std::fs::read_to_string(dir.path().join(".claude/project.yaml")).unwrap();
        for key in [
            "project_origin: new",
            "project_name: svc",
            "project_category: API REST",
            "ai_provider: cli",
            "created_at:",
        ] {
            assert!(raw.contains(key), "missing {key} in:\n{raw}");
        }

        let loaded = ProjectProfile::load_sidecar(dir.path()).unwrap();
        assert_eq!(loaded, p);
    }

    #[test]
    fn load_without_sidecar_is_a_clear_error() {
        let dir = TempDir::new().unwrap();
        let err = ProjectProfile::load_sidecar(dir.path()).unwrap_err();
        assert!(matches!(err, InitError::ProjectConfigNotFound(_)));
    }

    #[test]
    fn documentation_dirs_only_keep_existing() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("docs")).unwrap();
        std::fs::create_dir_all(dir.path().join("design/adr")).unwrap();

        let detected = detect_documentation_dirs(dir.path());
        assert_eq!(detected, ["docs"]);

        let merged = merge_documentation_dirs(
            dir.path(),
            &detected,
            &["design/adr/".into(), "missing".into(), "docs".into()],
        );
        assert_eq!(merged, ["docs", "design/adr"]);
    }
}
