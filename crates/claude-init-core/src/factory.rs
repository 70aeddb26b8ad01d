use ai_provider::{Provider, ProviderError, ProviderId};

use crate::config::GlobalConfig;
use crate::error::{InitError, Result};

/// Build the provider named by `id` from the user's global config.
///
/// Unknown ids and providers that need a key but have none are configuration
/// errors; the latter names the command that fixes it.
pub fn create_provider(id: &str, cfg: &GlobalConfig) -> Result<Box<dyn Provider>> {
    let id: ProviderId = id
        .parse()
        .map_err(|_| InitError::InvalidProvider(id.trim().to_string()))?;

    if !cfg.is_provider_configured(id) {
        return Err(InitError::ProviderNotConfigured(id.as_str().to_string()));
    }

    let settings = cfg
        .provider_config(id)
        .map(|c| c.to_settings())
        .unwrap_or_default();

    ai_provider::connect(id, settings).map_err(|e| match e {
        ProviderError::MissingApiKey(_) => InitError::ProviderNotConfigured(id.as_str().to_string()),
        other => other.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderConfig;

    #[test]
    fn unknown_provider_is_rejected() {
        let Err(err) = create_provider("bard", &GlobalConfig::default()) else {
            panic!("bard is not a provider");
        };
        assert_eq!(err.to_string(), "invalid provider: bard");
    }

    #[test]
    fn missing_key_names_the_provider_and_the_fix() {
        let Err(err) = create_provider("gemini", &GlobalConfig::default()) else {
            panic!("gemini has no key configured");
        };
        assert!(matches!(err, InitError::ProviderNotConfigured(ref id) if id == "gemini"));
        assert_eq!(
            err.to_string(),
            "gemini provider not configured. Please run: claude-init config --provider gemini"
        );
    }

    #[test]
    fn cli_needs_no_config() {
        let provider = create_provider("cli", &GlobalConfig::default()).unwrap();
        assert_eq!(provider.id(), ProviderId::Cli);
    }

    #[test]
    fn configured_http_provider_is_built() {
        let mut cfg = GlobalConfig::default();
        cfg.set_provider_config(
            ProviderId::Groq,
            ProviderConfig {
                api_key: "gsk_test".into(),
                max_tokens: Some(1024),
                ..ProviderConfig::default()
            },
        );
        let provider = create_provider(" groq ", &cfg).unwrap();
        assert_eq!(provider.id(), ProviderId::Groq);
    }
}
