use std::path::Path;

use ai_provider::ProviderId;
use anyhow::Context;
use clap::Args;
use claude_init_core::{config::GlobalConfig, InitError};
use serde::Serialize;

use crate::output::{print_json, print_table};
use crate::survey::Prompter;

#[derive(Args)]
pub struct ConfigArgs {
    /// Provider to configure and make the default
    #[arg(long)]
    provider: Option<String>,

    /// API key (prompted when omitted and none is stored)
    #[arg(long)]
    api_key: Option<String>,

    /// Override the provider's API base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Override the provider's model
    #[arg(long)]
    model: Option<String>,

    /// Override the provider's max output tokens
    #[arg(long)]
    max_tokens: Option<u32>,

    /// List providers and their configuration state
    #[arg(long)]
    show: bool,

    /// Output as JSON (with --show)
    #[arg(long, short = 'j')]
    json: bool,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(args: ConfigArgs) -> anyhow::Result<()> {
    let path = GlobalConfig::default_path()?;
    let mut cfg = GlobalConfig::load_from(&path)
        .with_context(|| format!("failed to load {}", path.display()))?;

    let Some(flag) = args.provider.as_deref() else {
        return show(&cfg, &path, args.json);
    };
    if args.show {
        return show(&cfg, &path, args.json);
    }

    let id: ProviderId = flag
        .parse()
        .map_err(|_| InitError::InvalidProvider(flag.trim().to_string()))?;

    if id.requires_api_key() {
        let mut provider_cfg = cfg.provider_config(id).cloned().unwrap_or_default();
        match args.api_key {
            Some(key) => provider_cfg.api_key = key.trim().to_string(),
            None if provider_cfg.has_key() => {}
            None => {
                let mut prompter = Prompter::stdio();
                prompter.say(&format!("Get a {} key at {}", id.display_name(), id.api_key_url()))?;
                provider_cfg.api_key = prompter.secret(&format!("{} API key:", id.display_name()))?;
            }
        }
        if let Some(url) = args.base_url {
            provider_cfg.base_url = Some(url);
        }
        if let Some(model) = args.model {
            provider_cfg.model = Some(model);
        }
        if let Some(n) = args.max_tokens.filter(|n| *n > 0) {
            provider_cfg.max_tokens = Some(n);
        }
        cfg.set_provider_config(id, provider_cfg);
    }
    cfg.set_default_provider(id);
    cfg.save_to(&path)
        .with_context(|| format!("failed to write {}", path.display()))?;

    println!("Default provider: {id} ({})", id.display_name());
    if let Some(p) = cfg.provider_config(id) {
        println!("  api key: {}", p.masked_key());
    }
    println!("  saved:   {}", path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// show
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct ProviderRow {
    id: ProviderId,
    name: &'static str,
    default: bool,
    configured: bool,
    api_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

fn rows(cfg: &GlobalConfig) -> Vec<ProviderRow> {
    ProviderId::ALL
        .iter()
        .map(|&id| {
            let p = cfg.provider_config(id);
            ProviderRow {
                id,
                name: id.display_name(),
                default: cfg.provider == id,
                configured: cfg.is_provider_configured(id),
                api_key: p.map(|p| p.masked_key()).unwrap_or_default(),
                base_url: p.and_then(|p| p.base_url.clone()),
                model: p.and_then(|p| p.model.clone()),
                max_tokens: p.and_then(|p| p.max_tokens),
            }
        })
        .collect()
}

fn show(cfg: &GlobalConfig, path: &Path, json: bool) -> anyhow::Result<()> {
    let rows = rows(cfg);
    if json {
        return print_json(&serde_json::json!({
            "path": path,
            "default": cfg.provider,
            "providers": rows,
        }));
    }

    println!("Config: {}\n", path.display());
    let table = rows
        .iter()
        .map(|r| {
            vec![
                if r.default { "*".to_string() } else { String::new() },
                r.id.to_string(),
                r.name.to_string(),
                if r.configured { "yes" } else { "no" }.to_string(),
                r.api_key.clone(),
                r.model.clone().unwrap_or_default(),
            ]
        })
        .collect();
    print_table(&["", "ID", "NAME", "CONFIGURED", "KEY", "MODEL"], table);
    Ok(())
}
