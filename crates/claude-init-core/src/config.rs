//! Global, per-user configuration: the default provider and the API
//! credentials for every configured back-end.
//!
//! Lives at `$XDG_CONFIG_HOME/claude-init/config.yaml` (or the platform
//! equivalent) and is only ever mutated by the `config` and `init` commands.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use ai_provider::{ProviderId, ProviderSettings};
use serde::{Deserialize, Serialize};

use crate::error::{InitError, Result};
use crate::{io, paths};

// ---------------------------------------------------------------------------
// ProviderConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl ProviderConfig {
    pub fn with_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    pub fn has_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// The key with everything but the last four characters hidden.
    pub fn masked_key(&self) -> String {
        let key = self.api_key.trim();
        let n = key.chars().count();
        if n == 0 {
            return String::new();
        }
        if n <= 8 {
            return "*".repeat(n);
        }
        let tail: String = key.chars().skip(n - 4).collect();
        format!("{}{tail}", "*".repeat(n - 4))
    }

    pub fn to_settings(&self) -> ProviderSettings {
        ProviderSettings {
            api_key: self.api_key.clone(),
            base_url: self.base_url.clone(),
            model: self.model.clone(),
            max_tokens: self.max_tokens,
        }
    }
}

// ---------------------------------------------------------------------------
// GlobalConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default = "default_provider")]
    pub provider: ProviderId,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub providers: BTreeMap<ProviderId, ProviderConfig>,
}

fn default_provider() -> ProviderId {
    ProviderId::Cli
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            providers: BTreeMap::new(),
        }
    }
}

impl GlobalConfig {
    /// Resolve the config file location for the current user.
    pub fn default_path() -> Result<PathBuf> {
        config_path_from(
            std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
            std::env::var_os("APPDATA").map(PathBuf::from),
            home::home_dir(),
        )
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path()?)
    }

    /// Missing file yields the default config.
    pub fn load_from(path: &Path) -> Result<Self> {
        match io::read_if_exists(path)? {
            Some(data) if !data.trim().is_empty() => Ok(serde_yaml::from_str(&data)?),
            _ => Ok(Self::default()),
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let data = serde_yaml::to_string(self)?;
        io::atomic_write_private(path, data.as_bytes())
    }

    pub fn provider_config(&self, id: ProviderId) -> Option<&ProviderConfig> {
        self.providers.get(&id)
    }

    pub fn set_provider_config(&mut self, id: ProviderId, cfg: ProviderConfig) {
        self.providers.insert(id, cfg);
    }

    pub fn set_default_provider(&mut self, id: ProviderId) {
        self.provider = id;
    }

    pub fn is_provider_configured(&self, id: ProviderId) -> bool {
        if !id.requires_api_key() {
            return true;
        }
        self.provider_config(id).is_some_and(ProviderConfig::has_key)
    }

    pub fn has_any_provider_configured(&self) -> bool {
        self.providers.values().any(ProviderConfig::has_key)
    }

    /// Providers that carry a usable key, in table order.
    pub fn configured_providers(&self) -> Vec<ProviderId> {
        ProviderId::ALL
            .iter()
            .copied()
            .filter(|id| id.requires_api_key() && self.is_provider_configured(*id))
            .collect()
    }
}

fn config_path_from(
    xdg: Option<PathBuf>,
    appdata: Option<PathBuf>,
    home: Option<PathBuf>,
) -> Result<PathBuf> {
    let base = match (xdg.filter(|p| !p.as_os_str().is_empty()), appdata) {
        (Some(xdg), _) => xdg,
        (None, Some(appdata)) if cfg!(windows) => appdata,
        _ => home
            .ok_or(InitError::ConfigDirNotFound)?
            .join(".config"),
    };
    Ok(base.join(paths::CONFIG_APP_DIR).join(paths::CONFIG_FILE))
}
