use std::path::{Path, PathBuf};

use ai_provider::{Provider, ProviderId};
use anyhow::Context;
use clap::Args;
use claude_init_core::{
    analyzer::Analyzer,
    config::GlobalConfig,
    factory::create_provider,
    paths,
    profile::{detect_documentation_dirs, merge_documentation_dirs},
    recommend::recommend,
    InitError, Pipeline, ProjectOrigin, ProjectProfile, StageSelection,
};
use console::style;

use super::{block_on, ensure_available, template_resolver, under_root};
use crate::output::{print_planned, print_recommendation, print_report};
use crate::root::resolve_project;
use crate::survey::Prompter;

#[derive(Args)]
pub struct InitArgs {
    /// Project directory (default: current directory)
    path: Option<PathBuf>,

    /// Replace an existing config directory
    #[arg(long, short = 'f')]
    force: bool,

    /// Show what would be generated without writing anything
    #[arg(long)]
    dry_run: bool,

    /// Config directory, relative to the project
    #[arg(long, default_value = paths::CLAUDE_DIR)]
    config_dir: PathBuf,

    /// AI provider: cli, claude-api, openai, zai, gemini or groq
    #[arg(long)]
    provider: Option<String>,

    /// Directory of external templates (agents/, skills/, commands/)
    #[arg(long)]
    templates: Option<PathBuf>,
}

pub fn run(args: InitArgs) -> anyhow::Result<()> {
    let root = resolve_project(args.path.as_deref())?;
    let config_dir = under_root(&root, &args.config_dir);
    check_existing_config(&config_dir, args.force, args.dry_run)?;
    let templates = template_resolver(args.templates.as_deref())?;

    println!("Initializing claude-init in: {}", root.display());

    let mut prompter = Prompter::stdio();
    let mut global = GlobalConfig::load().context("failed to load global config")?;
    let id = select_provider(&mut prompter, args.provider.as_deref(), &global)?;
    let provider = connect(&mut prompter, id, &mut global)?;

    block_on(async {
        ensure_available(provider.as_ref()).await?;
        prompter.say(&format!("{} using {}", style("✓").green(), id.display_name()))?;

        let draft = match prompter.origin()? {
            ProjectOrigin::New => ProjectProfile::draft(ProjectOrigin::New, id),
            ProjectOrigin::Existing => analyzed_draft(&root, provider.as_ref(), id).await,
        };
        let mut profile = prompter.profile(draft)?;

        let detected = detect_documentation_dirs(&root);
        let extra = prompter.documentation_dirs(&detected)?;
        profile.documentation_dirs = merge_documentation_dirs(&root, &detected, &extra);
        profile.validate()?;

        let pipeline = Pipeline::new(&root, profile.clone(), provider.as_ref())
            .with_templates(templates)
            .with_output_dir(&config_dir);

        println!("\nAsking {} for a recommended structure...", id.display_name());
        let rec = recommend(provider.as_ref(), &profile, &root).await;
        print_recommendation(&rec);

        if args.dry_run {
            let mut files = vec![config_dir.join(paths::PROJECT_FILE)];
            files.extend(pipeline.planned_files(&rec, StageSelection::ALL));
            print_planned(&files, &root);
            return Ok(());
        }

        let sidecar = config_dir.join(paths::PROJECT_FILE);
        profile
            .save_to(&sidecar)
            .with_context(|| format!("failed to write {}", sidecar.display()))?;
        println!("  created: {}", crate::output::display_path(&sidecar, &root));

        let report = pipeline.run(&rec).await.context("generation failed")?;
        print_report(&report, &root);
        println!("Next: open the project in Claude Code and try /plan-manage");
        provider.close();
        Ok::<(), anyhow::Error>(())
    })?
}

fn check_existing_config(config_dir: &Path, force: bool, dry_run: bool) -> anyhow::Result<()> {
    if !config_dir.exists() {
        return Ok(());
    }
    if !force {
        anyhow::bail!(
            "config directory already exists: {} (use --force to overwrite)",
            config_dir.display()
        );
    }
    if !dry_run {
        tracing::info!(path = %config_dir.display(), "removing existing config directory");
        std::fs::remove_dir_all(config_dir)
            .with_context(|| format!("failed to remove {}", config_dir.display()))?;
    }
    Ok(())
}

fn select_provider<R: std::io::BufRead, W: std::io::Write>(
    prompter: &mut Prompter<R, W>,
    flag: Option<&str>,
    global: &GlobalConfig,
) -> anyhow::Result<ProviderId> {
    if let Some(flag) = flag {
        return flag
            .parse()
            .map_err(|_| InitError::InvalidProvider(flag.trim().to_string()).into());
    }
    let options: Vec<String> = ProviderId::ALL
        .iter()
        .map(|id| {
            let state = if global.is_provider_configured(*id) { "" } else { ", needs API key" };
            format!("{id} ({}{state})", id.display_name())
        })
        .collect();
    let default = ProviderId::ALL
        .iter()
        .position(|id| *id == global.provider)
        .unwrap_or(0);
    let i = prompter.choose("Which AI provider should generate the files?", &options, default)?;
    Ok(ProviderId::ALL[i])
}

/// Build the provider, asking for an API key first when none is stored.
fn connect<R: std::io::BufRead, W: std::io::Write>(
    prompter: &mut Prompter<R, W>,
    id: ProviderId,
    global: &mut GlobalConfig,
) -> anyhow::Result<Box<dyn Provider>> {
    match create_provider(id.as_str(), global) {
        Ok(provider) => Ok(provider),
        Err(InitError::ProviderNotConfigured(_)) => {
            prompter.say(&format!(
                "{} is not configured yet. Get a key at {}",
                id.display_name(),
                id.api_key_url()
            ))?;
            let key = prompter.secret(&format!("{} API key:", id.display_name()))?;
            let mut cfg = global.provider_config(id).cloned().unwrap_or_default();
            cfg.api_key = key;
            global.set_provider_config(id, cfg);
            global.save().context("failed to save global config")?;
            Ok(create_provider(id.as_str(), global)?)
        }
        Err(e) => Err(e.into()),
    }
}

async fn analyzed_draft(root: &Path, provider: &dyn Provider, id: ProviderId) -> ProjectProfile {
    println!("\nAnalyzing the existing code...");
    match Analyzer::new(root, provider).analyze().await {
        Ok(analysis) => {
            println!("  {} analysis done, answers are pre-filled", style("✓").green());
            ProjectProfile::from_analysis(&analysis, id)
        }
        Err(e) => {
            tracing::warn!(error = %e, "project analysis failed, falling back to the manual survey");
            ProjectProfile::draft(ProjectOrigin::Existing, id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn existing_config_needs_force() {
        let dir = TempDir::new().unwrap();
        let cfg = dir.path().join(".claude");
        std::fs::create_dir_all(cfg.join("agents")).unwrap();

        let err = check_existing_config(&cfg, false, false).unwrap_err();
        assert!(err.to_string().contains("use --force"));

        check_existing_config(&cfg, true, true).unwrap();
        assert!(cfg.exists());
        check_existing_config(&cfg, true, false).unwrap();
        assert!(!cfg.exists());
    }

    #[test]
    fn provider_flag_is_parsed() {
        let global = GlobalConfig::default();
        let id = select_provider(&mut prompter(""), Some("groq"), &global).unwrap();
        assert_eq!(id, ProviderId::Groq);
        let err = select_provider(&mut prompter(""), Some("bard"), &global).unwrap_err();
        assert!(err.to_string().contains("invalid provider: bard"));
    }

    #[test]
    fn provider_prompt_defaults_to_configured_default() {
        let mut global = GlobalConfig::default();
        global.set_default_provider(ProviderId::Gemini);
        assert_eq!(select_provider(&mut prompter("\n"), None, &global).unwrap(), ProviderId::Gemini);
        assert_eq!(select_provider(&mut prompter("openai\n"), None, &global).unwrap(), ProviderId::Openai);
    }
}
