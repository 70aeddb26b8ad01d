//! Repository analyzer: scans an existing codebase and asks the provider to
//! classify it, so the survey can be pre-filled.

use std::fmt::Write as _;
use std::path::Path;

use ai_provider::Provider;
use serde::{Deserialize, Serialize};

use crate::error::{InitError, Result};
use crate::extract::{extract_json, null_as_default};
use crate::io::truncate_chars;
use crate::paths;

const MAX_DEPTH: usize = 5;
const MAX_FILES_PER_DIR: usize = 10;
const MANIFEST_PREVIEW_CHARS: usize = 500;

/// Build manifests whose head is shown to the model.
pub const MANIFEST_FILES: &[&str] = &[
    "package.json",
    "go.mod",
    "requirements.txt",
    "pyproject.toml",
    "Cargo.toml",
    "pom.xml",
    "build.gradle",
    "composer.json",
    "Gemfile",
];

pub const DEFAULT_NAME: &str = "Unknown Project";
pub const DEFAULT_LANGUAGE: &str = "Unknown";
pub const DEFAULT_ARCHITECTURE: &str = "Monolith";
pub const DEFAULT_CATEGORY: &str = "General";
pub const DEFAULT_BUSINESS_CONTEXT: &str = "General purpose software project";

const SYSTEM_PROMPT: &str = "You are an expert software project analyst. Your task is to analyze \
existing projects and extract structured information about them.

Be precise and concise in your analysis. If unsure about any field, use an empty string or a \
generic appropriate value.";

// ---------------------------------------------------------------------------
// RepositoryAnalysis
// ---------------------------------------------------------------------------

/// Every field may be missing or `null` in the reply; both read as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryAnalysis {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub language: String,
    #[serde(deserialize_with = "null_as_default")]
    pub framework: String,
    #[serde(deserialize_with = "null_as_default")]
    pub architecture: String,
    #[serde(deserialize_with = "null_as_default")]
    pub database: String,
    #[serde(deserialize_with = "null_as_default")]
    pub project_category: String,
    #[serde(deserialize_with = "null_as_default")]
    pub business_context: String,
    #[serde(deserialize_with = "null_as_default")]
    pub git_system: String,
    #[serde(deserialize_with = "null_as_default")]
    pub testing_framework: String,
}

impl RepositoryAnalysis {
    /// Parse a model reply, filling missing required fields with defaults.
    pub fn from_reply(reply: &str) -> Result<Self> {
        let json = extract_json(reply);
        if json.is_empty() {
            return Err(InitError::NoJson);
        }
        let mut analysis: Self = serde_json::from_str(&json)?;
        analysis.fill_defaults();
        Ok(analysis)
    }

    fn fill_defaults(&mut self) {
        for (field, label, default) in [
            (&mut self.name, "name", DEFAULT_NAME),
            (&mut self.language, "language", DEFAULT_LANGUAGE),
            (&mut self.architecture, "architecture", DEFAULT_ARCHITECTURE),
            (&mut self.project_category, "project_category", DEFAULT_CATEGORY),
            (&mut self.business_context, "business_context", DEFAULT_BUSINESS_CONTEXT),
        ] {
            if field.trim().is_empty() {
                tracing::debug!(field = label, default, "missing field in analysis, using default");
                *field = default.to_string();
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Analyzer
// ---------------------------------------------------------------------------

pub struct Analyzer<'a> {
    root: &'a Path,
    provider: &'a dyn Provider,
}

impl<'a> Analyzer<'a> {
    pub fn new(root: &'a Path, provider: &'a dyn Provider) -> Self {
        Self { root, provider }
    }

    /// Scan the tree, ask the provider to classify it and parse the reply.
    pub async fn analyze(&self) -> Result<RepositoryAnalysis> {
        let summary = self.scan();
        tracing::debug!(root = %self.root.display(), "analyzing project");

        let reply = self
            .provider
            .send(SYSTEM_PROMPT, &analysis_prompt(&summary))
            .await?;
        tracing::debug!(reply = %truncate_chars(&reply, 500), "analysis reply");

        let analysis = RepositoryAnalysis::from_reply(&reply)?;
        tracing::debug!(
            name = %analysis.name,
            language = %analysis.language,
            category = %analysis.project_category,
            "analysis parsed"
        );
        Ok(analysis)
    }

    /// Plain-text summary of the directory tree and build manifests.
    pub fn scan(&self) -> String {
        let mut out = String::new();
        let name = self
            .root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.root.display().to_string());
        let _ = writeln!(out, "Project directory: {name}\n");

        if self.root.join(".git").exists() {
            out.push_str("Version control: git\n");
        }

        out.push_str("\nDirectory structure:\n");
        scan_dir(self.root, "", 0, &mut out);

        out.push_str("\n\nConfiguration files:\n");
        for manifest in MANIFEST_FILES {
            if let Ok(content) = std::fs::read_to_string(self.root.join(manifest)) {
                let _ = write!(
                    out,
                    "\n--- {manifest} ---\n{}\n",
                    truncate_chars(&content, MANIFEST_PREVIEW_CHARS)
                );
            }
        }
        out
    }
}

fn scan_dir(dir: &Path, indent: &str, depth: usize, out: &mut String) {
    if depth > MAX_DEPTH {
        return;
    }
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };

    let mut dirs = Vec::new();
    let mut files = Vec::new();
    for entry in entries.flatten() {
        let name = entry.file_name().to_string_lossy().into_owned();
        if paths::IGNORED_DIRS.contains(&name.as_str()) {
            continue;
        }
        if entry.file_type().is_ok_and(|t| t.is_dir()) {
            dirs.push(name);
        } else {
            files.push(name);
        }
    }
    dirs.sort();
    files.sort();

    let child_indent = format!("{indent}  ");
    for d in &dirs {
        let _ = writeln!(out, "{indent}{d}/");
        scan_dir(&dir.join(d), &child_indent, depth + 1, out);
    }
    for (i, f) in files.iter().enumerate() {
        if i >= MAX_FILES_PER_DIR {
            let _ = writeln!(out, "{indent}... ({} more files)", files.len() - MAX_FILES_PER_DIR);
            break;
        }
        let _ = writeln!(out, "{indent}{f}");
    }
}

fn analysis_prompt(summary: &str) -> String {
    format!(
        r#"Analyze this project based on the following information:

{summary}

Based on this file structure and configuration, identify:
1. Project name (from directory or config files)
2. Main programming language
3. Framework(s) used
4. Architecture type (Monolith, Microservices, etc.)
5. Database if applicable
6. Project category (API, Web App, CLI, Library, etc.)
7. Business context and purpose
8. Testing framework if present

Respond with a JSON object using this exact structure:
{{
  "name": "project name",
  "description": "brief project description",
  "language": "main programming language (Go, Python, JavaScript, TypeScript, etc.)",
  "framework": "framework used (optional, or empty string if not applicable)",
  "architecture": "architecture type (Monolith, Microservices, Hexagonal, Layered, etc.)",
  "database": "database used (optional, or empty string if not applicable)",
  "project_category": "project type (REST API, Web App, CLI, Library, etc.)",
  "business_context": "business context and project purpose",
  "git_system": "version control system (git, svn, etc., or empty string)",
  "testing_framework": "testing framework (optional, or empty string)"
}}

CRITICAL: Respond with ONLY the raw JSON object. Do not include markdown code blocks, explanations, or any additional text."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use ai_provider::MockProvider;
    use tempfile::TempDir;

    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join(".git")).unwrap();
        std::fs::create_dir_all(root.join("node_modules/left-pad")).unwrap();
        std::fs::create_dir_all(root.join("src/handlers")).unwrap();
        std::fs::write(root.join("src/handlers/orders.go"), "package handlers").unwrap();
        std::fs::write(root.join("go.mod"), "module example.com/svc\n\ngo 1.22\n").unwrap();
        for i in 0..12 {
            std::fs::write(root.join(format!("f{i:02}.txt")), "").unwrap();
        }
        dir
    }

    #[test]
    fn scan_lists_tree_and_manifests() {
        let dir = fixture();
        let provider = MockProvider::replying("{}");
        let summary = Analyzer::new(dir.path(), &provider).scan();

        assert!(summary.contains("Version control: git"));
        assert!(summary.contains("\nsrc/\n  handlers/\n    orders.go\n"));
        assert!(!summary.contains("node_modules"));
        assert!(!summary.contains(".git/"));
        assert!(summary.contains("... (3 more files)"));
        assert!(summary.contains("--- go.mod ---\nmodule example.com/svc"));
    }

    #[test]
    fn manifest_preview_is_truncated() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("package.json"), "x".repeat(800)).unwrap();
        let provider = MockProvider::replying("{}");
        let summary = Analyzer::new(dir.path(), &provider).scan();
        assert!(summary.contains(&format!("{}...", "x".repeat(500))));
        assert!(!summary.contains(&"x".repeat(501)));
    }

    #[test]
    fn missing_name_gets_default_and_rest_is_verbatim() {
        let reply = r#"{"description":"Order API","language":"Go","framework":"Gin",
            "architecture":"Hexagonal","project_category":"REST API",
            "business_context":"Orders for retail stores","testing_framework":"testify"}"#;
        let a = RepositoryAnalysis::from_reply(reply).unwrap();
        assert_eq!(a.name, DEFAULT_NAME);
        assert_eq!(a.description, "Order API");
        assert_eq!(a.language, "Go");
        assert_eq!(a.framework, "Gin");
        assert_eq!(a.architecture, "Hexagonal");
        assert_eq!(a.testing_framework, "testify");
        assert_eq!(a.database, "");
    }

    #[test]
    fn empty_object_gets_every_default() {
        let a = RepositoryAnalysis::from_reply("{}").unwrap();
        assert_eq!(a.name, DEFAULT_NAME);
        assert_eq!(a.language, DEFAULT_LANGUAGE);
        assert_eq!(a.architecture, DEFAULT_ARCHITECTURE);
        assert_eq!(a.project_category, DEFAULT_CATEGORY);
        assert_eq!(a.business_context, DEFAULT_BUSINESS_CONTEXT);
    }

    #[test]
    fn null_fields_read_as_empty() {
        let reply = r#"{"name":"svc","language":"Go","framework":null,
            "database":"PostgreSQL","architecture":null}"#;
        let a = RepositoryAnalysis::from_reply(reply).unwrap();
        assert_eq!(a.name, "svc");
        assert_eq!(a.language, "Go");
        assert_eq!(a.framework, "");
        assert_eq!(a.database, "PostgreSQL");
        assert_eq!(a.architecture, DEFAULT_ARCHITECTURE);
    }

    #[test]
    fn prose_reply_is_an_error() {
        assert!(matches!(
            RepositoryAnalysis::from_reply("I could not analyze this."),
            Err(InitError::NoJson)
        ));
    }

    #[tokio::test]
    async fn analyze_sends_scan_to_provider() {
        let dir = fixture();
        let provider = MockProvider::replying(
            "```json\n{\"name\":\"svc\",\"language\":\"Go\"}\n```",
        );
        let a = Analyzer::new(dir.path(), &provider).analyze().await.unwrap();
        assert_eq!(a.name, "svc");

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].user.contains("--- go.mod ---"));
        assert!(requests[0].system.contains("software project analyst"));
    }

    #[tokio::test]
    async fn provider_failure_propagates() {
        let dir = TempDir::new().unwrap();
        let provider = MockProvider::failing("boom");
        let err = Analyzer::new(dir.path(), &provider).analyze().await.unwrap_err();
        assert!(err.to_string().contains("boom"));
    }
}
