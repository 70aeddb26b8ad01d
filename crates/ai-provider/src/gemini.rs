//! Google Gemini `generateContent` back-end.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::descriptor::Resolved;
use crate::http;
use crate::{Provider, ProviderError, ProviderId, ProviderSettings, Result};

pub struct GeminiProvider {
    client: Client,
    config: Resolved,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<SystemInstruction<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct SystemInstruction<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    error: Option<GeminiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    #[serde(default)]
    status: String,
    #[serde(default)]
    message: String,
}

impl GeminiProvider {
    pub fn new(settings: ProviderSettings) -> Result<Self> {
        let config = settings.resolve(ProviderId::Gemini.descriptor())?;
        Ok(Self {
            client: http::build_client(config.timeout)?,
            config,
        })
    }

    fn url(&self) -> String {
        format!(
            "{}/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        )
    }

    pub(crate) fn request_body<'a>(&self, system: &'a str, user: &'a str) -> GenerateRequest<'a> {
        GenerateRequest {
            contents: [Content {
                role: "user",
                parts: [Part { text: user }],
            }],
            system_instruction: (!system.is_empty()).then_some(SystemInstruction {
                parts: [Part { text: system }],
            }),
            generation_config: GenerationConfig {
                max_output_tokens: self.config.max_tokens,
            },
        }
    }
}

#[async_trait]
impl Provider for GeminiProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Gemini
    }

    async fn send(&self, system_prompt: &str, user_message: &str) -> Result<String> {
        let body = self.request_body(system_prompt, user_message);
        let request = self
            .client
            .post(self.url())
            .query(&[("key", self.config.api_key.as_str())]);

        let response: GenerateResponse = http::post_json(request, &body).await?;
        if let Some(err) = response.error {
            return Err(ProviderError::Api {
                kind: err.status,
                message: err.message,
            });
        }
        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or(ProviderError::EmptyResponse("no candidates in response"))?;
        candidate
            .content
            .and_then(|c| c.parts.into_iter().next())
            .map(|part| part.text)
            .ok_or(ProviderError::EmptyResponse("no content parts in response"))
    }

    async fn is_available(&self) -> Result<bool> {
        Ok(!self.config.api_key.is_empty())
    }
}
