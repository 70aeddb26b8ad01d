//! Anthropic Messages API back-end (`claude-api`).

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::descriptor::Resolved;
use crate::http::{self, ErrorBody};
use crate::{Provider, ProviderError, ProviderId, ProviderSettings, Result};

const ANTHROPIC_VERSION: &str = "2023-06-01";

pub struct AnthropicProvider {
    client: Client,
    config: Resolved,
}

#[derive(Debug, Serialize)]
pub(crate) struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [UserMessage<'a>; 1],
    #[serde(skip_serializing_if = "str::is_empty")]
    system: &'a str,
}

#[derive(Debug, Serialize)]
struct UserMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    #[serde(default)]
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

impl AnthropicProvider {
    pub fn new(settings: ProviderSettings) -> Result<Self> {
        let config = settings.resolve(ProviderId::ClaudeApi.descriptor())?;
        Ok(Self {
            client: http::build_client(config.timeout)?,
            config,
        })
    }

    pub(crate) fn request_body<'a>(&'a self, system: &'a str, user: &'a str) -> MessagesRequest<'a> {
        MessagesRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            messages: [UserMessage {
                role: "user",
                content: user,
            }],
            system,
        }
    }
}

#[async_trait]
impl Provider for AnthropicProvider {
    fn id(&self) -> ProviderId {
        ProviderId::ClaudeApi
    }

    async fn send(&self, system_prompt: &str, user_message: &str) -> Result<String> {
        let body = self.request_body(system_prompt, user_message);
        let request = self
            .client
            .post(&self.config.endpoint)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION);

        let response: MessagesResponse = http::post_json(request, &body).await?;
        if let Some(err) = response.error {
            return Err(err.into_error());
        }
        response
            .content
            .into_iter()
            .next()
            .map(|block| block.text)
            .ok_or(ProviderError::EmptyResponse("empty response from API"))
    }

    async fn is_available(&self) -> Result<bool> {
        Ok(!self.config.api_key.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn provider(base: &str) -> AnthropicProvider {
        AnthropicProvider::new(ProviderSettings {
            api_key: "sk-ant".into(),
            base_url: Some(format!("{base}/v1/messages")),
            model: None,
            max_tokens: Some(1024),
        })
        .unwrap()
    }

    #[test]
    fn system_prompt_sits_outside_messages() {
        let p = provider("http://unused");
        let body = serde_json::to_value(p.request_body("be brief", "hi")).unwrap();
        assert_eq!(body["system"], "be brief");
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "hi");
        assert_eq!(body["model"], "claude-opus-4");
        assert_eq!(body["max_tokens"], 1024);

        let body = serde_json::to_value(p.request_body("", "hi")).unwrap();
        assert!(body.get("system").is_none());
    }

    #[tokio::test]
    async fn send_sets_headers_and_reads_first_block() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/messages")
            .match_header("x-api-key", "sk-ant")
            .match_header("anthropic-version", "2023-06-01")
            .match_body(Matcher::PartialJson(serde_json::json!({"system": "sys"})))
            .with_status(200)
            .with_body(r#"{"content":[{"type":"text","text":"hello"}]}"#)
            .create_async()
            .await;

        let text = provider(&server.url()).send("sys", "ping").await.unwrap();
        assert_eq!(text, "hello");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn error_object_becomes_api_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/messages")
            .with_status(200)
            .with_body(r#"{"type":"error","error":{"type":"overloaded_error","message":"Overloaded"}}"#)
            .create_async()
            .await;

        let err = provider(&server.url()).send("", "ping").await.unwrap_err();
        assert_eq!(err.to_string(), "API error: overloaded_error - Overloaded");
    }

    #[tokio::test]
    async fn non_success_status_is_surfaced_verbatim() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/messages")
            .with_status(401)
            .with_body("invalid x-api-key")
            .create_async()
            .await;

        let err = provider(&server.url()).send("", "ping").await.unwrap_err();
        assert_eq!(err.to_string(), "API error (status 401): invalid x-api-key");
    }

    #[tokio::test]
    async fn empty_content_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/messages")
            .with_status(200)
            .with_body(r#"{"content":[]}"#)
            .create_async()
            .await;

        let err = provider(&server.url()).send("", "ping").await.unwrap_err();
        assert!(matches!(err, ProviderError::EmptyResponse(_)));
    }
}
