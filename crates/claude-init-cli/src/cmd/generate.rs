use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use claude_init_core::{
    config::GlobalConfig, factory::create_provider, paths, recommend::recommend, Pipeline,
    ProjectProfile, StageSelection,
};

use super::{block_on, ensure_available, template_resolver, under_root};
use crate::output::{print_planned, print_recommendation, print_report};
use crate::root::resolve_project;

#[derive(Args)]
pub struct GenerateArgs {
    /// Project directory (default: current directory)
    path: Option<PathBuf>,

    /// Overwrite previously generated files
    #[arg(long, short = 'f')]
    force: bool,

    /// Show what would be generated without writing anything
    #[arg(long)]
    dry_run: bool,

    /// Output directory (default: <project>/.claude)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Generate only agents
    #[arg(long)]
    only_agents: bool,

    /// Generate only skills
    #[arg(long)]
    only_skills: bool,

    /// Generate only commands
    #[arg(long)]
    only_commands: bool,

    /// Generate only CLAUDE.md and the development guide
    #[arg(long)]
    only_guides: bool,

    /// Directory of external templates (agents/, skills/, commands/)
    #[arg(long)]
    templates: Option<PathBuf>,
}

pub fn run(args: GenerateArgs) -> anyhow::Result<()> {
    let root = resolve_project(args.path.as_deref())?;
    let profile = ProjectProfile::load_sidecar(&root)
        .context("failed to load project config (run 'claude-init init' first)")?;
    let out = args
        .output_dir
        .as_deref()
        .map(|d| under_root(&root, d))
        .unwrap_or_else(|| paths::claude_dir(&root));

    if !args.force && !args.dry_run && has_generated_files(&out) {
        anyhow::bail!(
            "generated files already exist in {} (use --force to overwrite)",
            out.display()
        );
    }

    let selection = StageSelection::only(
        args.only_agents,
        args.only_skills,
        args.only_commands,
        args.only_guides,
    );
    let templates = template_resolver(args.templates.as_deref())?;
    let global = GlobalConfig::load().context("failed to load global config")?;
    let provider = create_provider(profile.provider.as_str(), &global)?;
    tracing::debug!(project = %profile.name, provider = %profile.provider, ?selection, "generate");

    block_on(async {
        ensure_available(provider.as_ref()).await?;

        println!("Generating configuration for {} in: {}", profile.name, out.display());
        let rec = recommend(provider.as_ref(), &profile, &root).await;
        print_recommendation(&rec);

        let pipeline = Pipeline::new(&root, profile.clone(), provider.as_ref())
            .with_templates(templates)
            .with_output_dir(&out);

        if args.dry_run {
            print_planned(&pipeline.planned_files(&rec, selection), &root);
            return Ok(());
        }

        let report = pipeline
            .run_selected(&rec, selection)
            .await
            .context("generation failed")?;
        print_report(&report, &root);
        provider.close();
        Ok::<(), anyhow::Error>(())
    })?
}

/// Whether `out` already holds agents, skills or commands.
fn has_generated_files(out: &Path) -> bool {
    [paths::AGENTS_DIR, paths::SKILLS_DIR, paths::COMMANDS_DIR]
        .iter()
        .any(|d| out.join(d).exists())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn sidecar_alone_is_not_generated_output() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join(".claude");
        std::fs::create_dir_all(&out).unwrap();
        std::fs::write(out.join("project.yaml"), "x").unwrap();
        assert!(!has_generated_files(&out));

        std::fs::create_dir_all(out.join("skills/base")).unwrap();
        assert!(has_generated_files(&out));
    }
}
