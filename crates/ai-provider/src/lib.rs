//! `ai-provider`: one `send(system, user) -> text` call over every LLM
//! back-end `claude-init` can talk to.
//!
//! Six back-ends share the [`Provider`] trait: the local `claude` binary
//! driven as a subprocess, and five hosted HTTP APIs. Back-ends differ only in
//! request shaping, the header set and response decoding; everything else
//! (timeouts, status handling, error mapping) lives in `http.rs`.
//!
//! # Architecture
//!
//! ```text
//! ProviderId + ProviderSettings
//!     │
//!     ▼
//! connect()          ← merges user overrides over the descriptor defaults
//!     │
//!     ├── CliProvider        spawns `claude -p [--system-prompt s] <msg>`
//!     ├── AnthropicProvider  POST /v1/messages            (x-api-key)
//!     ├── OpenAiCompatible   POST {base}/chat/completions (Bearer)  openai | zai | groq
//!     └── GeminiProvider     POST {base}/{model}:generateContent?key=…
//!     │
//!     ▼
//! Box<dyn Provider>
//! ```
//!
//! # Quick start
//!
//! ```rust,ignore
//! use ai_provider::{connect, ProviderId, ProviderSettings};
//!
//! let provider = connect(ProviderId::Groq, ProviderSettings::with_key("gsk_…"))?;
//! let text = provider.send("You are terse.", "Name three Rust web frameworks.").await?;
//! ```

pub mod anthropic;
pub mod descriptor;
pub mod error;
pub mod gemini;
pub mod mock;
pub mod openai;
pub mod process;

mod http;

use async_trait::async_trait;

pub use anthropic::AnthropicProvider;
pub use descriptor::{ProviderDescriptor, ProviderId, ProviderSettings};
pub use error::ProviderError;
pub use gemini::GeminiProvider;
pub use mock::MockProvider;
pub use openai::OpenAiCompatible;
pub use process::CliProvider;

/// Convenience `Result` alias for this crate.
pub type Result<T> = std::result::Result<T, ProviderError>;

/// A back-end that turns a system prompt plus a user message into text.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Which back-end this is.
    fn id(&self) -> ProviderId;

    /// Send one prompt and wait for the full response.
    async fn send(&self, system_prompt: &str, user_message: &str) -> Result<String>;

    /// Whether the back-end can be used right now.
    ///
    /// HTTP back-ends only check that a key is configured; the remote
    /// endpoint is never probed.
    async fn is_available(&self) -> Result<bool>;

    /// Release held resources. Every current back-end drops its HTTP client
    /// with the value, so this is a no-op by default.
    fn close(&self) {}
}

/// Build a ready client for `id`, with `settings` layered over the
/// descriptor defaults.
pub fn connect(id: ProviderId, settings: ProviderSettings) -> Result<Box<dyn Provider>> {
    let provider: Box<dyn Provider> = match id {
        ProviderId::Cli => Box::new(CliProvider::from_env()),
        ProviderId::ClaudeApi => Box::new(AnthropicProvider::new(settings)?),
        ProviderId::Openai | ProviderId::Zai | ProviderId::Groq => {
            Box::new(OpenAiCompatible::new(id, settings)?)
        }
        ProviderId::Gemini => Box::new(GeminiProvider::new(settings)?),
    };
    tracing::debug!(provider = id.as_str(), "provider client ready");
    Ok(provider)
}
