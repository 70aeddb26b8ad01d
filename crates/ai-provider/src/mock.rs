//! Scripted provider for tests.
//!
//! Replies are produced by a closure over `(system, user)`, so a test can
//! fail one specific prompt and answer the rest. Every request is recorded in
//! arrival order.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::{Provider, ProviderError, ProviderId, Result};

type Responder = dyn Fn(&str, &str) -> std::result::Result<String, String> + Send + Sync;

/// One recorded `send` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub system: String,
    pub user: String,
}

pub struct MockProvider {
    id: ProviderId,
    available: bool,
    responder: Box<Responder>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockProvider {
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&str, &str) -> std::result::Result<String, String> + Send + Sync + 'static,
    {
        Self {
            id: ProviderId::Cli,
            available: true,
            responder: Box::new(f),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Answer every prompt with `text`.
    pub fn replying(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::from_fn(move |_, _| Ok(text.clone()))
    }

    /// Fail every prompt with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::from_fn(move |_, _| Err(message.clone()))
    }

    pub fn with_id(mut self, id: ProviderId) -> Self {
        self.id = id;
        self
    }

    pub fn with_available(mut self, available: bool) -> Self {
        self.available = available;
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn id(&self) -> ProviderId {
        self.id
    }

    async fn send(&self, system_prompt: &str, user_message: &str) -> Result<String> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(RecordedRequest {
                system: system_prompt.to_string(),
                user: user_message.to_string(),
            });
        }
        (self.responder)(system_prompt, user_message)
            .map_err(|message| ProviderError::Api {
                kind: String::new(),
                message,
            })
    }

    async fn is_available(&self) -> Result<bool> {
        Ok(self.available)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_requests_in_order() {
        let mock = MockProvider::from_fn(|_, user| {
            if user.contains("fail") {
                Err("boom".into())
            } else {
                Ok(user.to_uppercase())
            }
        });
        assert_eq!(mock.send("s", "one").await.unwrap(), "ONE");
        assert!(mock.send("s", "please fail").await.is_err());

        let seen: Vec<_> = mock.requests().into_iter().map(|r| r.user).collect();
        assert_eq!(seen, ["one", "please fail"]);
    }
}
