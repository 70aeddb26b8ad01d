use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::{ProviderError, Result};

/// One `reqwest::Client` per provider instance; no shared pool.
pub(crate) fn build_client(timeout: Duration) -> Result<Client> {
    Ok(Client::builder().timeout(timeout).build()?)
}

/// POST `body` as JSON and decode the reply into `T`.
///
/// A non-2xx status is surfaced verbatim (status + raw body) before any
/// decoding is attempted.
pub(crate) async fn post_json<B, T>(request: RequestBuilder, body: &B) -> Result<T>
where
    B: Serialize + ?Sized,
    T: DeserializeOwned,
{
    let response = request
        .header(reqwest::header::CONTENT_TYPE, "application/json")
        .json(body)
        .send()
        .await?;

    let status = response.status();
    let text = response.text().await?;
    if !status.is_success() {
        return Err(ProviderError::Http {
            status: status.as_u16(),
            body: text,
        });
    }
    tracing::trace!(status = status.as_u16(), bytes = text.len(), "provider response");
    Ok(serde_json::from_str(&text)?)
}

/// `{"error": {...}}` body shared by OpenAI, Groq, Z.AI and Anthropic.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub message: String,
}

impl ErrorBody {
    pub fn into_error(self) -> ProviderError {
        ProviderError::Api {
            kind: self.kind.unwrap_or_default(),
            message: self.message,
        }
    }
}
