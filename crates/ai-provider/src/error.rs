use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("invalid provider: {0}")]
    InvalidProvider(String),

    #[error("API key required for {0}")]
    MissingApiKey(&'static str),

    #[error("API error (status {status}): {body}")]
    Http { status: u16, body: String },

    /// The provider answered with an `error` object in a successful body.
    /// `kind` is the provider's error type or status, and may be empty.
    #[error("API error: {}", api_message(.kind, .message))]
    Api { kind: String, message: String },

    #[error("{0}")]
    EmptyResponse(&'static str),

    #[error("claude CLI error: {0}")]
    Process(String),

    #[error("request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("Claude CLI not found. Please install it from: https://claude.com/claude-code")]
    NotInstalled,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Request(#[from] reqwest::Error),

    #[error("failed to decode response: {0}")]
    Json(#[from] serde_json::Error),
}

fn api_message(kind: &str, message: &str) -> String {
    if kind.is_empty() {
        message.to_string()
    } else {
        format!("{kind} - {message}")
    }
}
