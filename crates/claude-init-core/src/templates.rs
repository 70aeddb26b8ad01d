//! External template resolver and the textual adaptation pass.
//!
//! External templates live in a `claude_examples/` tree written for a
//! reference TypeScript project ("Griddo API"). Adaptation swaps those baked-in
//! tokens for the target project's and applies a per-language substitution
//! table. It is plain string replacement; the table is the contract.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::error::Result;
use crate::paths;
use crate::profile::ProjectProfile;

// ---------------------------------------------------------------------------
// ArtifactKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Agent,
    Skill,
    Command,
}

impl ArtifactKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ArtifactKind::Agent => "agent",
            ArtifactKind::Skill => "skill",
            ArtifactKind::Command => "command",
        }
    }

    /// Directory name under both the template tree and `.claude/`.
    pub fn dir(self) -> &'static str {
        match self {
            ArtifactKind::Agent => paths::AGENTS_DIR,
            ArtifactKind::Skill => paths::SKILLS_DIR,
            ArtifactKind::Command => paths::COMMANDS_DIR,
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// TemplateResolver
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AvailableTemplates {
    pub agents: Vec<String>,
    pub commands: Vec<String>,
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct TemplateResolver {
    base: Option<PathBuf>,
}

impl TemplateResolver {
    /// Probe the standard relative locations from the current directory.
    pub fn new() -> Self {
        let base = paths::TEMPLATE_SEARCH_PATHS
            .iter()
            .map(PathBuf::from)
            .find(|p| p.is_dir());
        if let Some(base) = &base {
            tracing::debug!(path = %base.display(), "external templates found");
        }
        Self { base }
    }

    /// Pin the template tree to `base`. A missing directory disables lookup.
    pub fn with_base(base: impl Into<PathBuf>) -> Self {
        let base = base.into();
        Self {
            base: base.is_dir().then_some(base),
        }
    }

    /// A resolver that never finds anything.
    pub fn disabled() -> Self {
        Self { base: None }
    }

    pub fn base(&self) -> Option<&Path> {
        self.base.as_deref()
    }

    /// Path of the template for `(kind, key)`, if one exists. Skill keys may
    /// carry a category prefix (`language/go`).
    pub fn find(&self, kind: ArtifactKind, key: &str) -> Option<PathBuf> {
        let base = self.base.as_ref()?;
        let path = base.join(kind.dir()).join(format!("{key}.md"));
        path.is_file().then_some(path)
    }

    pub fn has_template(&self, kind: ArtifactKind, key: &str) -> bool {
        self.find(kind, key).is_some()
    }

    pub fn load_template(&self, kind: ArtifactKind, key: &str) -> Result<Option<String>> {
        match self.find(kind, key) {
            Some(path) => Ok(Some(std::fs::read_to_string(path)?)),
            None => Ok(None),
        }
    }

    /// Skill lookup: `<category>/<name>`, then the normalized name under the
    /// category, then both names at the top of `skills/`.
    pub fn find_skill(&self, category: &str, name: &str) -> Option<PathBuf> {
        let normalized = normalize_skill_name(name);
        [
            format!("{category}/{name}"),
            format!("{category}/{normalized}"),
            name.to_string(),
            normalized,
        ]
        .iter()
        .find_map(|key| self.find(ArtifactKind::Skill, key))
    }

    /// Every `.md` template name per kind, sorted.
    pub fn available_templates(&self) -> AvailableTemplates {
        let Some(base) = &self.base else {
            return AvailableTemplates::default();
        };
        let list = |kind: ArtifactKind| {
            let mut names: Vec<String> = std::fs::read_dir(base.join(kind.dir()))
                .into_iter()
                .flatten()
                .flatten()
                .filter_map(|e| {
                    let name = e.file_name().to_string_lossy().into_owned();
                    name.strip_suffix(".md").map(str::to_string)
                })
                .collect();
            names.sort();
            names
        };
        AvailableTemplates {
            agents: list(ArtifactKind::Agent),
            commands: list(ArtifactKind::Command),
            skills: list(ArtifactKind::Skill),
        }
    }
}

/// Map bare language names to the `-expert` template names.
pub fn normalize_skill_name(name: &str) -> String {
    match name.to_lowercase().as_str() {
        "typescript" => "typescript-expert".to_string(),
        "javascript" => "javascript-expert".to_string(),
        "go" => "go-expert".to_string(),
        "python" => "python-expert".to_string(),
        _ => name.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Adaptation
// ---------------------------------------------------------------------------

const SOURCE_PROJECT: &str = "Griddo API";
const SOURCE_FRAMEWORK: &str = "Griddo";

static SPANISH_DESC_RE: OnceLock<Regex> = OnceLock::new();

fn spanish_desc_re() -> &'static Regex {
    SPANISH_DESC_RE
        .get_or_init(|| Regex::new(r"description: Especialista[^\n]*para Griddo API[^.]*\.").expect("static regex"))
}

/// Rewrite an external template for `profile`.
pub fn adapt(kind: ArtifactKind, content: &str, profile: &ProjectProfile) -> String {
    let framework = if profile.has_framework() {
        profile.framework.as_str()
    } else {
        profile.name.as_str()
    };

    let mut out = content.to_string();
    if kind == ArtifactKind::Agent {
        let desc = format!(
            "description: Architecture design specialist for {}. Responsible for defining module structure, layers and the interaction between components.",
            profile.name
        );
        out = spanish_desc_re()
            .replace_all(&out, regex::NoExpand(&desc))
            .into_owned();
    }
    out = out.replace(SOURCE_PROJECT, &profile.name);
    out = out.replace(SOURCE_FRAMEWORK, framework);
    replace_technology(&out, profile)
}

fn replace_technology(content: &str, profile: &ProjectProfile) -> String {
    let rules: Vec<(&str, &str)> = match profile.language.to_lowercase().as_str() {
        "go" | "golang" => vec![
            ("TypeScript", "Go"),
            ("typescript", "go"),
            ("npm run", "go run"),
            ("Express", "Gin"),
            ("Zod", "validator"),
            ("TypeORM", "GORM"),
        ],
        "python" => vec![
            ("TypeScript", "Python"),
            ("typescript", "python"),
            ("npm run", "python"),
            ("Express", "Flask"),
            ("Zod", "Pydantic"),
            ("TypeORM", "SQLAlchemy"),
            (".ts", ".py"),
        ],
        "rust" => vec![
            ("TypeScript", "Rust"),
            ("typescript", "rust"),
            ("npm run", "cargo run"),
            ("Express", "Actix-web"),
            (".ts", ".rs"),
        ],
        "typescript" | "javascript" | "js" | "ts" => {
            let fw = profile.framework.to_lowercase();
            let target = [
                ("react", "React"),
                ("next", "Next.js"),
                ("vue", "Vue"),
                ("angular", "Angular"),
            ]
            .into_iter()
            .find(|(needle, _)| fw.contains(needle))
            .map(|(_, t)| t);
            target.map(|t| vec![("Express", t)]).unwrap_or_default()
        }
        _ => Vec::new(),
    };

    rules
        .into_iter()
        .fold(content.to_string(), |acc, (from, to)| acc.replace(from, to))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::ProjectOrigin;
    use ai_provider::ProviderId;
    use tempfile::TempDir;

    fn profile(language: &str, framework: &str) -> ProjectProfile {
        ProjectProfile {
            name: "Billing".into(),
            language: language.into(),
            framework: framework.into(),
            ..ProjectProfile::draft(ProjectOrigin::New, ProviderId::Cli)
        }
    }

    fn tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        for rel in [
            "agents/architect.md",
            "commands/test.md",
            "skills/language/go-expert.md",
            "skills/code-reviewer.md",
        ] {
            let p = root.join(rel);
            std::fs::create_dir_all(p.parent().unwrap()).unwrap();
            std::fs::write(p, format!("template {rel}")).unwrap();
        }
        dir
    }

    #[test]
    fn lookup_by_kind_and_name() {
        let dir = tree();
        let r = TemplateResolver::with_base(dir.path());
        assert!(r.has_template(ArtifactKind::Agent, "architect"));
        assert!(!r.has_template(ArtifactKind::Agent, "developer"));
        assert_eq!(
            r.load_template(ArtifactKind::Command, "test").unwrap().as_deref(),
            Some("template commands/test.md")
        );
        assert_eq!(r.load_template(ArtifactKind::Command, "lint").unwrap(), None);
    }

    #[test]
    fn skill_lookup_falls_back_to_normalized_and_flat() {
        let dir = tree();
        let r = TemplateResolver::with_base(dir.path());
        assert!(r.find_skill("language", "go").is_some());
        assert!(r.find_skill("base", "code-reviewer").is_some());
        assert!(r.find_skill("language", "rust").is_none());
    }

    #[test]
    fn missing_base_disables_lookup() {
        let r = TemplateResolver::with_base("/definitely/not/here");
        assert!(r.base().is_none());
        assert!(!r.has_template(ArtifactKind::Agent, "architect"));
        assert_eq!(r.available_templates(), AvailableTemplates::default());
    }

    #[test]
    fn lists_available_templates() {
        let dir = tree();
        let t = TemplateResolver::with_base(dir.path()).available_templates();
        assert_eq!(t.agents, ["architect"]);
        assert_eq!(t.commands, ["test"]);
        assert_eq!(t.skills, ["code-reviewer"]);
    }

    #[test]
    fn normalizes_language_skill_names() {
        assert_eq!(normalize_skill_name("TypeScript"), "typescript-expert");
        assert_eq!(normalize_skill_name("go"), "go-expert");
        assert_eq!(normalize_skill_name("code-reviewer"), "code-reviewer");
        assert_eq!(normalize_skill_name("rust"), "rust");
    }

    #[test]
    fn adapts_project_tokens_and_go_stack() {
        let src = "# Architect for Griddo API\nUse TypeScript with Express and Zod.\nRun `npm run test`.";
        let out = adapt(ArtifactKind::Agent, src, &profile("Go", "Gin"));
        assert_eq!(
            out,
            "# Architect for Billing\nUse Go with Gin and validator.\nRun `go run test`."
        );
    }

    #[test]
    fn rewrites_spanish_agent_description() {
        let src = "---\nname: architect\ndescription: Especialista en arquitectura para Griddo API y sus módulos.\n---";
        let out = adapt(ArtifactKind::Agent, src, &profile("Go", ""));
        assert!(out.contains("description: Architecture design specialist for Billing."));
        assert!(!out.contains("Especialista"));
    }

    #[test]
    fn python_and_rust_swap_extensions() {
        let src = "Edit handler.ts in TypeScript";
        assert_eq!(
            adapt(ArtifactKind::Skill, src, &profile("python", "")),
            "Edit handler.py in Python"
        );
        assert_eq!(
            adapt(ArtifactKind::Skill, src, &profile("Rust", "")),
            "Edit handler.rs in Rust"
        );
    }

    #[test]
    fn typescript_keeps_stack_but_swaps_framework() {
        let src = "Built on Express with TypeScript";
        assert_eq!(
            adapt(ArtifactKind::Command, src, &profile("TypeScript", "Next.js 14")),
            "Built on Next.js with TypeScript"
        );
        assert_eq!(
            adapt(ArtifactKind::Command, src, &profile("TypeScript", "")),
            src
        );
    }

    #[test]
    fn bare_griddo_uses_framework_or_name() {
        assert_eq!(
            adapt(ArtifactKind::Skill, "Griddo SDK", &profile("Go", "Echo")),
            "Echo SDK"
        );
        assert_eq!(
            adapt(ArtifactKind::Skill, "Griddo SDK", &profile("Go", "")),
            "Billing SDK"
        );
    }
}
