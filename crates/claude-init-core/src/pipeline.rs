//! The staged synthesis run.
//!
//! ```text
//! 1  CLAUDE.md            (kept when present)
//! 3  merge with base items
//! 4  agents/*.md          5  agents/README.md
//! 6  skills/<cat>/*.md    7  skills/README.md
//! 8  commands/*.md        9  commands/README.md      (8 reads 5 and 7 from disk)
//! 10 development_guide.md
//! ```
//!
//! Stage 2, the recommendation, is requested by the caller (see
//! [`crate::recommend`]) so it can be shown before anything is written.
//! Stages run strictly in order. Every stage that depends on an earlier one
//! reads that artifact back from disk. Per-item failures become warnings in
//! the [`PipelineReport`]; the run itself only fails if the output directory
//! cannot be created.

use std::path::{Path, PathBuf};

use ai_provider::Provider;
use serde::Serialize;

use crate::context::analyze_project_context;
use crate::error::Result;
use crate::frontmatter::{AgentInfo, CommandInfo, SkillInfo};
use crate::generator::{classify_skill, CommandContext, Generated, Generator};
use crate::io::{atomic_write, ensure_dir, read_if_exists};
use crate::paths;
use crate::profile::ProjectProfile;
use crate::prompts;
use crate::readme;
use crate::recommend::{Recommendation, BASE_ITEMS};
use crate::sanitize::sanitize_name;
use crate::templates::TemplateResolver;

/// Which stage groups to run. `generate --only-*` maps onto this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StageSelection {
    pub agents: bool,
    pub skills: bool,
    pub commands: bool,
    /// `CLAUDE.md` and the development guide.
    pub guides: bool,
}

impl StageSelection {
    pub const ALL: StageSelection = StageSelection {
        agents: true,
        skills: true,
        commands: true,
        guides: true,
    };

    /// The selection for a set of `--only-*` flags; none set means all.
    pub fn only(agents: bool, skills: bool, commands: bool, guides: bool) -> Self {
        if !(agents || skills || commands || guides) {
            return Self::ALL;
        }
        StageSelection {
            agents,
            skills,
            commands,
            guides,
        }
    }
}

impl Default for StageSelection {
    fn default() -> Self {
        Self::ALL
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageWarning {
    pub stage: &'static str,
    pub name: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PipelineReport {
    /// The recommendation after merging with the base items.
    pub plan: Recommendation,
    pub artifacts: Vec<Generated>,
    /// CLAUDE.md, README indices and the development guide.
    pub documents: Vec<PathBuf>,
    pub claude_md_preserved: bool,
    pub warnings: Vec<StageWarning>,
}

impl PipelineReport {
    fn warn(&mut self, stage: &'static str, name: &str, error: impl std::fmt::Display) {
        tracing::warn!(stage, name, error = %error, "stage item failed");
        self.warnings.push(StageWarning {
            stage,
            name: name.to_string(),
            message: error.to_string(),
        });
    }

    pub fn written(&self) -> Vec<&Path> {
        self.documents
            .iter()
            .map(PathBuf::as_path)
            .chain(self.artifacts.iter().map(|a| a.path.as_path()))
            .collect()
    }
}

pub struct Pipeline<'a> {
    root: PathBuf,
    out: PathBuf,
    profile: ProjectProfile,
    provider: &'a dyn Provider,
    templates: TemplateResolver,
}

impl<'a> Pipeline<'a> {
    pub fn new(root: impl Into<PathBuf>, profile: ProjectProfile, provider: &'a dyn Provider) -> Self {
        let root = root.into();
        Self {
            out: paths::claude_dir(&root),
            root,
            profile,
            provider,
            templates: TemplateResolver::new(),
        }
    }

    pub fn with_templates(mut self, templates: TemplateResolver) -> Self {
        self.templates = templates;
        self
    }

    /// Write artifacts somewhere other than `<root>/.claude`. `CLAUDE.md`
    /// still goes to the project root.
    pub fn with_output_dir(mut self, out: impl Into<PathBuf>) -> Self {
        self.out = out.into();
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.out
    }

    fn generator(&self) -> Generator<'_> {
        Generator::new(&self.root, &self.out, &self.profile, self.provider, &self.templates)
    }

    pub async fn run(&self, recommendation: &Recommendation) -> Result<PipelineReport> {
        self.run_selected(recommendation, StageSelection::ALL).await
    }

    pub async fn run_selected(
        &self,
        recommendation: &Recommendation,
        selection: StageSelection,
    ) -> Result<PipelineReport> {
        let mut report = PipelineReport {
            plan: recommendation.merged(&BASE_ITEMS),
            ..PipelineReport::default()
        };
        tracing::info!(
            project = %self.profile.name,
            out = %self.out.display(),
            agents = report.plan.agents.len(),
            skills = report.plan.skills.len(),
            commands = report.plan.commands.len(),
            "starting generation"
        );
        ensure_dir(&self.out)?;
        let plan = report.plan.clone();

        if selection.guides {
            self.project_context_file(&mut report).await;
        }
        if selection.agents {
            self.agents(&plan.agents, &mut report).await;
        }
        if selection.skills {
            self.skills(&plan.skills, &mut report).await;
        }
        if selection.commands {
            self.commands(&plan.commands, &mut report).await;
        }
        if selection.guides {
            self.development_guide(&plan.commands, &mut report).await;
        }

        tracing::info!(
            written = report.written().len(),
            warnings = report.warnings.len(),
            "generation finished"
        );
        Ok(report)
    }

    /// Files a run with `selection` would write, in stage order.
    pub fn planned_files(&self, recommendation: &Recommendation, selection: StageSelection) -> Vec<PathBuf> {
        let plan = recommendation.merged(&BASE_ITEMS);
        let mut files = Vec::new();
        if selection.guides {
            files.push(paths::claude_md(&self.root));
        }
        if selection.agents {
            files.extend(plan.agents.iter().map(|a| paths::agent_file(&self.out, &sanitize_name(a))));
            files.push(paths::agents_readme(&self.out));
        }
        if selection.skills {
            files.extend(plan.skills.iter().map(|s| {
                let name = sanitize_name(s);
                paths::skill_file(&self.out, classify_skill(&name, &self.profile), &name)
            }));
            files.push(paths::skills_readme(&self.out));
        }
        if selection.commands {
            files.extend(plan.commands.iter().map(|c| paths::command_file(&self.out, &sanitize_name(c))));
            files.push(paths::commands_readme(&self.out));
        }
        if selection.guides {
            files.push(paths::development_guide(&self.out));
        }
        files
    }

    // -----------------------------------------------------------------------
    // Stages
    // -----------------------------------------------------------------------

    async fn project_context_file(&self, report: &mut PipelineReport) {
        let path = paths::claude_md(&self.root);
        if path.exists() {
            tracing::info!(path = %path.display(), "CLAUDE.md exists, keeping it");
            report.claude_md_preserved = true;
            return;
        }
        let context = analyze_project_context(&self.root, &self.profile.documentation_dirs);
        let prompt = prompts::claude_md_prompt(&self.profile, &context);
        let written = async {
            let content = self.generator().ask(&prompt).await?;
            atomic_write(&path, content.as_bytes())
        };
        match written.await {
            Ok(()) => {
                tracing::info!(path = %path.display(), "CLAUDE.md written");
                report.documents.push(path);
            }
            Err(e) => report.warn("claude-md", paths::CLAUDE_MD, e),
        }
    }

    async fn agents(&self, names: &[String], report: &mut PipelineReport) {
        let gen = self.generator();
        for name in names {
            match gen.agent(name).await {
                Ok(g) => report.artifacts.push(g),
                Err(e) => report.warn("agents", name, e),
            }
        }

        let agents: Vec<AgentInfo> = names
            .iter()
            .map(|n| paths::agent_file(&self.out, &sanitize_name(n)))
            .filter(|p| p.is_file())
            .filter_map(|p| AgentInfo::read(&p).ok())
            .collect();
        self.write_document(
            paths::agents_readme(&self.out),
            readme::agents_readme(&self.profile.name, &agents),
            "agents-readme",
            report,
        );
    }

    fn skill_path(&self, name: &str) -> Option<PathBuf> {
        let primary = classify_skill(name, &self.profile);
        std::iter::once(primary)
            .chain(["base", "language", "framework"])
            .map(|cat| paths::skill_file(&self.out, cat, name))
            .find(|p| p.is_file())
    }

    async fn skills(&self, names: &[String], report: &mut PipelineReport) {
        let gen = self.generator();
        for name in names {
            match gen.skill(name).await {
                Ok(g) => report.artifacts.push(g),
                Err(e) => report.warn("skills", name, e),
            }
        }

        let skills: Vec<SkillInfo> = names
            .iter()
            .filter_map(|n| self.skill_path(&sanitize_name(n)))
            .filter_map(|p| SkillInfo::read(&p).ok())
            .collect();
        self.write_document(
            paths::skills_readme(&self.out),
            readme::skills_readme(&self.profile.name, &skills),
            "skills-readme",
            report,
        );
    }

    fn readme_context(&self) -> CommandContext {
        let read = |path: PathBuf| match read_if_exists(&path) {
            Ok(text) => text.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "cannot read index");
                String::new()
            }
        };
        CommandContext {
            agents: read(paths::agents_readme(&self.out)),
            skills: read(paths::skills_readme(&self.out)),
        }
    }

    async fn commands(&self, names: &[String], report: &mut PipelineReport) {
        let context = self.readme_context();
        let gen = self.generator();
        for name in names {
            match gen.command(name, Some(&context)).await {
                Ok(g) => report.artifacts.push(g),
                Err(e) => report.warn("commands", name, e),
            }
        }

        let commands: Vec<CommandInfo> = names
            .iter()
            .map(|n| paths::command_file(&self.out, &sanitize_name(n)))
            .filter(|p| p.is_file())
            .filter_map(|p| CommandInfo::read(&p).ok())
            .collect();
        self.write_document(
            paths::commands_readme(&self.out),
            readme::commands_readme(&self.profile.name, &commands),
            "commands-readme",
            report,
        );
    }

    async fn development_guide(&self, command_names: &[String], report: &mut PipelineReport) {
        let context = analyze_project_context(&self.root, &self.profile.documentation_dirs);
        let indices = self.readme_context();
        let prompt = prompts::development_guide_prompt(
            &self.profile,
            &context,
            &indices.agents,
            &indices.skills,
            command_names,
        );
        let path = paths::development_guide(&self.out);
        let written = async {
            let content = self.generator().ask(&prompt).await?;
            atomic_write(&path, content.as_bytes())
        };
        match written.await {
            Ok(()) => report.documents.push(path),
            Err(e) => report.warn("development-guide", paths::DEVELOPMENT_GUIDE_FILE, e),
        }
    }

    fn write_document(&self, path: PathBuf, content: String, stage: &'static str, report: &mut PipelineReport) {
        match atomic_write(&path, content.as_bytes()) {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "index written");
                report.documents.push(path);
            }
            Err(e) => report.warn(stage, paths::README_FILE, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::ProjectOrigin;
    use crate::recommend::default_recommendation;
    use ai_provider::{MockProvider, ProviderId};
    use std::sync::{Arc, Mutex};
    use std::time::SystemTime;
    use tempfile::TempDir;

    fn go_profile() -> ProjectProfile {
        ProjectProfile {
            name: "svc".into(),
            description: "Order processing service".into(),
            language: "Go".into(),
            architecture: "Clean".into(),
            category: "API REST".into(),
            business_context: "Processes orders for the online shop".into(),
            ..ProjectProfile::draft(ProjectOrigin::New, ProviderId::Cli)
        }
    }

    fn canned_provider() -> MockProvider {
        MockProvider::replying("---\ndescription: Generated\nusage: run\n---\n\n# Generated\n")
    }

    fn mtime(path: &Path) -> SystemTime {
        std::fs::metadata(path).unwrap().modified().unwrap()
    }

    #[tokio::test]
    async fn failed_recommendation_for_new_go_project() {
        let dir = TempDir::new().unwrap();
        let profile = go_profile();
        let rec = default_recommendation(&profile);
        assert!(!rec.agents.contains(&"debugger".to_string()));
        let provider = canned_provider();
        let pipeline = Pipeline::new(dir.path(), profile, &provider)
            .with_templates(TemplateResolver::disabled());

        let report = pipeline.run(&rec).await.unwrap();
        assert!(report.warnings.is_empty(), "{:?}", report.warnings);

        let out = dir.path().join(".claude");
        for agent in ["architect", "writer", "debugger", "planning-agent", "orchestrator-agent", "developer", "tester", "reviewer"] {
            assert!(out.join(format!("agents/{agent}.md")).is_file(), "{agent}");
        }
        assert!(out.join("skills/language/go.md").is_file());
        for cmd in ["plan-manage", "orchestrator", "pre-flight", "test", "lint", "build"] {
            assert!(out.join(format!("commands/{cmd}.md")).is_file(), "{cmd}");
        }
        assert!(out.join("development_guide.md").is_file());

        let agents_index = std::fs::read_to_string(out.join("agents/README.md")).unwrap();
        assert_eq!(agents_index.matches("\n### ").count(), 8);
        let commands_index = std::fs::read_to_string(out.join("commands/README.md")).unwrap();
        assert_eq!(commands_index.matches("\n### ").count(), 6);
        let skills_index = std::fs::read_to_string(out.join("skills/README.md")).unwrap();
        assert_eq!(skills_index.matches("\n#### ").count(), 4);
    }

    #[tokio::test]
    async fn stages_run_in_order() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().to_path_buf();
        let seen_indices = Arc::new(Mutex::new(Vec::new()));
        let seen = seen_indices.clone();
        let out = root.join(".claude");
        let provider = MockProvider::from_fn(move |_, user| {
            if user.contains("command configuration file") {
                seen.lock().unwrap().push(
                    out.join("agents/README.md").is_file() && out.join("skills/README.md").is_file(),
                );
            }
            Ok("---\ndescription: x\n---\n".to_string())
        });
        let pipeline = Pipeline::new(&root, go_profile(), &provider)
            .with_templates(TemplateResolver::disabled());
        let report = pipeline.run(&default_recommendation(&go_profile())).await.unwrap();
        assert!(report.warnings.is_empty());

        let seen = seen_indices.lock().unwrap();
        assert_eq!(seen.len(), 6);
        assert!(seen.iter().all(|ok| *ok));

        let claude_md = mtime(&root.join("CLAUDE.md"));
        let agents_readme = mtime(&root.join(".claude/agents/README.md"));
        for entry in std::fs::read_dir(root.join(".claude/agents")).unwrap() {
            let t = mtime(&entry.unwrap().path());
            assert!(claude_md <= t);
            assert!(t <= agents_readme);
        }
    }

    #[tokio::test]
    async fn later_prompts_see_claude_md() {
        let dir = TempDir::new().unwrap();
        let provider = MockProvider::from_fn(|_, user| {
            if user.starts_with("Generate a complete and detailed CLAUDE.md") {
                Ok("# CLAUDE.md\nmarker-7731".to_string())
            } else {
                Ok("---\ndescription: x\n---\n".to_string())
            }
        });
        let pipeline = Pipeline::new(dir.path(), go_profile(), &provider)
            .with_templates(TemplateResolver::disabled());
        pipeline.run(&default_recommendation(&go_profile())).await.unwrap();

        let requests = provider.requests();
        assert!(!requests[0].system.contains("marker-7731"));
        assert!(requests[1..].iter().all(|r| r.system.contains("marker-7731")));
    }

    #[tokio::test]
    async fn existing_claude_md_is_kept() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("CLAUDE.md"), "hand written").unwrap();
        let provider = canned_provider();
        let pipeline = Pipeline::new(dir.path(), go_profile(), &provider)
            .with_templates(TemplateResolver::disabled());
        let report = pipeline.run(&default_recommendation(&go_profile())).await.unwrap();

        assert!(report.claude_md_preserved);
        assert_eq!(std::fs::read_to_string(dir.path().join("CLAUDE.md")).unwrap(), "hand written");
        assert!(provider.requests().iter().all(|r| r.system.contains("hand written")));
    }

    #[tokio::test]
    async fn node_microservices_defaults() {
        let dir = TempDir::new().unwrap();
        let profile = ProjectProfile {
            origin: ProjectOrigin::Existing,
            language: "nodejs".into(),
            framework: "Express".into(),
            architecture: "Microservicios".into(),
            ..go_profile()
        };
        let rec = default_recommendation(&profile);
        let provider = canned_provider();
        let pipeline = Pipeline::new(dir.path(), profile, &provider)
            .with_templates(TemplateResolver::disabled());
        let report = pipeline.run(&rec).await.unwrap();

        assert!(rec.agents.contains(&"debugger".to_string()));
        assert!(report.plan.skills.contains(&"nodejs".to_string()));
        assert!(report.plan.skills.contains(&"express".to_string()));
        let out = dir.path().join(".claude");
        assert!(out.join("skills/language/nodejs.md").is_file());
        assert!(out.join("skills/framework/express.md").is_file());
    }

    #[tokio::test]
    async fn failing_command_is_skipped() {
        let dir = TempDir::new().unwrap();
        let provider = MockProvider::from_fn(|_, user| {
            if user.starts_with("Generate a comprehensive command configuration file for a lint command") {
                Err("upstream 500".to_string())
            } else {
                Ok("---\ndescription: ok\nusage: x\n---\n".to_string())
            }
        });
        let pipeline = Pipeline::new(dir.path(), go_profile(), &provider)
            .with_templates(TemplateResolver::disabled());
        let report = pipeline.run(&default_recommendation(&go_profile())).await.unwrap();

        let out = dir.path().join(".claude");
        assert!(!out.join("commands/lint.md").exists());
        for cmd in ["plan-manage", "orchestrator", "pre-flight", "test", "build"] {
            assert!(out.join(format!("commands/{cmd}.md")).is_file(), "{cmd}");
        }
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].stage, "commands");
        assert_eq!(report.warnings[0].name, "lint");
        let index = std::fs::read_to_string(out.join("commands/README.md")).unwrap();
        assert!(index.contains("### test\n"));
        assert!(!index.contains("### lint\n"));
        assert!(out.join("development_guide.md").is_file());
    }

    #[tokio::test]
    async fn external_template_for_one_agent() {
        let dir = TempDir::new().unwrap();
        let tpl = dir.path().join("claude_examples/agents");
        std::fs::create_dir_all(&tpl).unwrap();
        std::fs::write(
            tpl.join("architect.md"),
            "---\nname: architect\ndescription: Architect\n---\n# Architect for Griddo API\n",
        )
        .unwrap();
        let provider = canned_provider();
        let pipeline = Pipeline::new(dir.path(), go_profile(), &provider)
            .with_templates(TemplateResolver::with_base(dir.path().join("claude_examples")));
        pipeline.run(&default_recommendation(&go_profile())).await.unwrap();

        let out = dir.path().join(".claude/agents");
        let architect = std::fs::read_to_string(out.join("architect.md")).unwrap();
        assert!(architect.contains("# Architect for svc"));
        let developer = std::fs::read_to_string(out.join("developer.md")).unwrap();
        assert!(developer.contains("# Agent Developer - svc"));
    }

    #[tokio::test]
    async fn only_selected_stages_run() {
        let dir = TempDir::new().unwrap();
        let provider = canned_provider();
        let pipeline = Pipeline::new(dir.path(), go_profile(), &provider)
            .with_templates(TemplateResolver::disabled());
        let selection = StageSelection::only(true, false, false, false);
        let report = pipeline
            .run_selected(&default_recommendation(&go_profile()), selection)
            .await
            .unwrap();

        let out = dir.path().join(".claude");
        assert!(out.join("agents/README.md").is_file());
        assert!(!out.join("skills").exists());
        assert!(!out.join("commands").exists());
        assert!(!dir.path().join("CLAUDE.md").exists());
        assert!(provider.requests().is_empty());
        assert_eq!(report.artifacts.len(), 8);
    }

    #[test]
    fn no_only_flags_means_everything() {
        assert_eq!(StageSelection::only(false, false, false, false), StageSelection::ALL);
        assert!(!StageSelection::only(false, true, false, false).agents);
    }

    #[test]
    fn planned_files_follow_stage_order() {
        let dir = TempDir::new().unwrap();
        let provider = canned_provider();
        let pipeline = Pipeline::new(dir.path(), go_profile(), &provider).with_output_dir(dir.path().join("out"));
        let files = pipeline.planned_files(&default_recommendation(&go_profile()), StageSelection::ALL);
        assert_eq!(files.first().unwrap(), &dir.path().join("CLAUDE.md"));
        assert_eq!(files.last().unwrap(), &dir.path().join("out/development_guide.md"));
        assert!(files.contains(&dir.path().join("out/skills/base/code-reviewer.md")));
        assert!(files.iter().all(|f| !f.exists()));
    }
}
