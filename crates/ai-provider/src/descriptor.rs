use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ProviderError;

// ─── ProviderId ───────────────────────────────────────────────────────────

/// The closed set of back-ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderId {
    Cli,
    ClaudeApi,
    Openai,
    Zai,
    Gemini,
    Groq,
}

impl ProviderId {
    pub const ALL: [ProviderId; 6] = [
        ProviderId::Cli,
        ProviderId::ClaudeApi,
        ProviderId::Openai,
        ProviderId::Zai,
        ProviderId::Gemini,
        ProviderId::Groq,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ProviderId::Cli => "cli",
            ProviderId::ClaudeApi => "claude-api",
            ProviderId::Openai => "openai",
            ProviderId::Zai => "zai",
            ProviderId::Gemini => "gemini",
            ProviderId::Groq => "groq",
        }
    }

    pub fn display_name(self) -> &'static str {
        self.descriptor().display_name
    }

    pub fn requires_api_key(self) -> bool {
        self.descriptor().requires_api_key
    }

    /// Console page where a user obtains a key. Empty for `cli`.
    pub fn api_key_url(self) -> &'static str {
        match self {
            ProviderId::Cli => "",
            ProviderId::ClaudeApi => "https://console.anthropic.com/settings/keys",
            ProviderId::Openai => "https://platform.openai.com/account/api-keys",
            ProviderId::Zai => "https://z.ai/manage-apikey/apikey-list",
            ProviderId::Gemini => "https://aistudio.google.com/apikey",
            ProviderId::Groq => "https://console.groq.com/keys",
        }
    }

    pub fn descriptor(self) -> &'static ProviderDescriptor {
        match self {
            ProviderId::Cli => &CLI,
            ProviderId::ClaudeApi => &CLAUDE_API,
            ProviderId::Openai => &OPENAI,
            ProviderId::Zai => &ZAI,
            ProviderId::Gemini => &GEMINI,
            ProviderId::Groq => &GROQ,
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProviderId::ALL
            .into_iter()
            .find(|id| id.as_str() == s.trim())
            .ok_or_else(|| ProviderError::InvalidProvider(s.to_string()))
    }
}

// ─── Descriptors ──────────────────────────────────────────────────────────

/// Fixed per-provider constants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderDescriptor {
    pub id: ProviderId,
    pub display_name: &'static str,
    pub requires_api_key: bool,
    /// Binary name for `cli`, base URL for the HTTP back-ends.
    pub default_endpoint: &'static str,
    pub default_model: &'static str,
    pub default_max_tokens: u32,
    pub timeout: Duration,
}

const CLI: ProviderDescriptor = ProviderDescriptor {
    id: ProviderId::Cli,
    display_name: "Claude CLI",
    requires_api_key: false,
    default_endpoint: "claude",
    default_model: "",
    default_max_tokens: 0,
    timeout: Duration::from_secs(120),
};

const CLAUDE_API: ProviderDescriptor = ProviderDescriptor {
    id: ProviderId::ClaudeApi,
    display_name: "Claude API",
    requires_api_key: true,
    default_endpoint: "https://api.anthropic.com/v1/messages",
    default_model: "claude-opus-4",
    default_max_tokens: 200_000,
    timeout: Duration::from_secs(120),
};

const OPENAI: ProviderDescriptor = ProviderDescriptor {
    id: ProviderId::Openai,
    display_name: "OpenAI",
    requires_api_key: true,
    default_endpoint: "https://api.openai.com/v1",
    default_model: "gpt-5.1",
    default_max_tokens: 100_000,
    timeout: Duration::from_secs(120),
};

const ZAI: ProviderDescriptor = ProviderDescriptor {
    id: ProviderId::Zai,
    display_name: "Z.AI",
    requires_api_key: true,
    default_endpoint: "https://api.z.ai/api/paas/v4",
    default_model: "glm-4.6",
    default_max_tokens: 32_768,
    timeout: Duration::from_secs(120),
};

const GEMINI: ProviderDescriptor = ProviderDescriptor {
    id: ProviderId::Gemini,
    display_name: "Gemini",
    requires_api_key: true,
    default_endpoint: "https://generativelanguage.googleapis.com/v1beta/models",
    default_model: "gemini-2.5-flash",
    default_max_tokens: 1_000_000,
    timeout: Duration::from_secs(120),
};

const GROQ: ProviderDescriptor = ProviderDescriptor {
    id: ProviderId::Groq,
    display_name: "Groq",
    requires_api_key: true,
    default_endpoint: "https://api.groq.com/openai/v1",
    default_model: "llama-3.3-70b-versatile",
    default_max_tokens: 32_768,
    timeout: Duration::from_secs(60),
};

// ─── Settings ─────────────────────────────────────────────────────────────

/// User-supplied values for one provider. Unset fields fall back to the
/// descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderSettings {
    pub api_key: String,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
}

impl ProviderSettings {
    pub fn with_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    pub(crate) fn resolve(&self, d: &ProviderDescriptor) -> Result<Resolved, ProviderError> {
        let api_key = self.api_key.trim();
        if d.requires_api_key && api_key.is_empty() {
            return Err(ProviderError::MissingApiKey(d.display_name));
        }
        let pick = |v: &Option<String>, default: &str| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or(default)
                .to_string()
        };
        Ok(Resolved {
            api_key: api_key.to_string(),
            endpoint: pick(&self.base_url, d.default_endpoint),
            model: pick(&self.model, d.default_model),
            max_tokens: self
                .max_tokens
                .filter(|n| *n > 0)
                .unwrap_or(d.default_max_tokens),
            timeout: d.timeout,
        })
    }
}

/// Settings merged with defaults; what a back-end actually uses.
#[derive(Debug, Clone)]
pub(crate) struct Resolved {
    pub api_key: String,
    pub endpoint: String,
    pub model: String,
    pub max_tokens: u32,
    pub timeout: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_strings() {
        for id in ProviderId::ALL {
            assert_eq!(id.as_str().parse::<ProviderId>().unwrap(), id);
        }
        assert_eq!(
            serde_json::to_string(&ProviderId::ClaudeApi).unwrap(),
            "\"claude-api\""
        );
    }

    #[test]
    fn unknown_id_is_rejected() {
        let err = "mistral".parse::<ProviderId>().unwrap_err();
        assert_eq!(err.to_string(), "invalid provider: mistral");
    }

    #[test]
    fn only_cli_runs_without_a_key() {
        for id in ProviderId::ALL {
            assert_eq!(id.requires_api_key(), id != ProviderId::Cli, "{id}");
        }
    }

    #[test]
    fn overrides_replace_defaults() {
        let settings = ProviderSettings {
            api_key: " sk-1 ".into(),
            base_url: Some("http://localhost:9000/v1".into()),
            model: Some("gpt-4o".into()),
            max_tokens: Some(512),
        };
        let r = settings.resolve(ProviderId::Openai.descriptor()).unwrap();
        assert_eq!(r.api_key, "sk-1");
        assert_eq!(r.endpoint, "http://localhost:9000/v1");
        assert_eq!(r.model, "gpt-4o");
        assert_eq!(r.max_tokens, 512);
    }

    #[test]
    fn blank_overrides_keep_defaults() {
        let settings = ProviderSettings {
            api_key: "k".into(),
            base_url: Some("  ".into()),
            model: None,
            max_tokens: Some(0),
        };
        let r = settings.resolve(ProviderId::Groq.descriptor()).unwrap();
        assert_eq!(r.endpoint, "https://api.groq.com/openai/v1");
        assert_eq!(r.model, "llama-3.3-70b-versatile");
        assert_eq!(r.max_tokens, 32_768);
        assert_eq!(r.timeout, Duration::from_secs(60));
    }

    #[test]
    fn missing_key_names_the_provider() {
        let err = ProviderSettings::default()
            .resolve(ProviderId::Gemini.descriptor())
            .unwrap_err();
        assert!(err.to_string().contains("Gemini"));
    }
}
