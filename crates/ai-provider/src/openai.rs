//! Chat Completions back-end shared by OpenAI, Groq and Z.AI.
//!
//! The three services accept the same request and response shapes; only the
//! base URL, default model and token budget differ, and those come from the
//! descriptor table.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::descriptor::Resolved;
use crate::http::{self, ErrorBody};
use crate::{Provider, ProviderError, ProviderId, ProviderSettings, Result};

const TEMPERATURE: f32 = 0.7;

pub struct OpenAiCompatible {
    id: ProviderId,
    client: Client,
    config: Resolved,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_completion_tokens: Option<u32>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Newer OpenAI models reject `max_tokens` and want `max_completion_tokens`.
pub fn uses_completion_tokens(model: &str) -> bool {
    model.contains("gpt-5") && !model.contains("gpt-4") && !model.contains("gpt-3")
}

impl OpenAiCompatible {
    pub fn new(id: ProviderId, settings: ProviderSettings) -> Result<Self> {
        let config = settings.resolve(id.descriptor())?;
        Ok(Self {
            id,
            client: http::build_client(config.timeout)?,
            config,
        })
    }

    fn url(&self) -> String {
        format!("{}/chat/completions", self.config.endpoint.trim_end_matches('/'))
    }

    pub(crate) fn request_body<'a>(&'a self, system: &'a str, user: &'a str) -> ChatRequest<'a> {
        let mut messages = Vec::with_capacity(2);
        if !system.is_empty() {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: user,
        });

        let budget = Some(self.config.max_tokens);
        let (max_tokens, max_completion_tokens) = if uses_completion_tokens(&self.config.model) {
            (None, budget)
        } else {
            (budget, None)
        };

        ChatRequest {
            model: &self.config.model,
            messages,
            max_tokens,
            max_completion_tokens,
            temperature: TEMPERATURE,
        }
    }
}

#[async_trait]
impl Provider for OpenAiCompatible {
    fn id(&self) -> ProviderId {
        self.id
    }

    async fn send(&self, system_prompt: &str, user_message: &str) -> Result<String> {
        let body = self.request_body(system_prompt, user_message);
        let request = self.client.post(self.url()).bearer_auth(&self.config.api_key);

        let response: ChatResponse = http::post_json(request, &body).await?;
        if let Some(err) = response.error {
            return Err(err.into_error());
        }
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or(ProviderError::EmptyResponse("no choices in response"))?;
        Ok(choice.message.content.unwrap_or_default())
    }

    async fn is_available(&self) -> Result<bool> {
        Ok(!self.config.api_key.is_empty())
    }
}
