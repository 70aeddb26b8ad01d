use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InitError {
    #[error("invalid provider: {0}")]
    InvalidProvider(String),

    #[error("{0} provider not configured. Please run: claude-init config --provider {0}")]
    ProviderNotConfigured(String),

    #[error("invalid project profile: {0}")]
    InvalidProfile(String),

    #[error("project config not found at {} (run 'claude-init init' first)", .0.display())]
    ProjectConfigNotFound(PathBuf),

    #[error("cannot locate a config directory: set HOME or XDG_CONFIG_HOME")]
    ConfigDirNotFound,

    #[error("no JSON object found in response")]
    NoJson,

    #[error(transparent)]
    Provider(#[from] ai_provider::ProviderError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, InitError>;
