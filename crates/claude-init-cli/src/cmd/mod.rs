pub mod completion;
pub mod config;
pub mod generate;
pub mod init;
pub mod version;

use std::future::Future;
use std::path::{Path, PathBuf};

use ai_provider::Provider;
use anyhow::Context;
use claude_init_core::templates::TemplateResolver;

/// Drive one async command to completion on a fresh runtime.
pub(crate) fn block_on<F: Future>(fut: F) -> anyhow::Result<F::Output> {
    let rt = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
    Ok(rt.block_on(fut))
}

/// Fail unless `provider` answers its availability probe.
pub(crate) async fn ensure_available(provider: &dyn Provider) -> anyhow::Result<()> {
    let id = provider.id();
    let available = provider
        .is_available()
        .await
        .with_context(|| format!("{} is not available", id.display_name()))?;
    if !available {
        anyhow::bail!(
            "{} is not available; run: claude-init config --provider {id}",
            id.display_name()
        );
    }
    tracing::debug!(provider = %id, "provider available");
    Ok(())
}

pub(crate) fn template_resolver(dir: Option<&Path>) -> anyhow::Result<TemplateResolver> {
    match dir {
        Some(dir) if !dir.is_dir() => {
            anyhow::bail!("templates directory does not exist: {}", dir.display())
        }
        Some(dir) => Ok(TemplateResolver::with_base(dir)),
        None => Ok(TemplateResolver::new()),
    }
}

/// `dir` resolved against the project root when relative.
pub(crate) fn under_root(root: &Path, dir: &Path) -> PathBuf {
    if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        root.join(dir)
    }
}
