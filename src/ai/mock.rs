//! In-memory [`CompletionService`] for tests.

use super::{CompletionService, UserContent};
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// One recorded `complete` invocation.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub system_prompt: String,
    pub content: UserContent,
    pub max_tokens: u32,
    pub json_mode: bool,
}

/// In-memory stand-in for the hosted model.
///
/// Replies are served in order and cycle once exhausted. With no replies
/// queued it answers `{}`; `with_failure` makes every call fail instead.
#[derive(Clone, Default)]
pub struct MockCompletionClient {
    responses: Arc<Mutex<Vec<String>>>,
    failure: Arc<Mutex<Option<String>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockCompletionClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(self, response: impl Into<String>) -> Self {
        self.responses.lock().unwrap().push(response.into());
        self
    }

    pub fn with_json_response(self, value: serde_json::Value) -> Self {
        self.with_response(value.to_string())
    }

    pub fn with_failure(self, message: impl Into<String>) -> Self {
        *self.failure.lock().unwrap() = Some(message.into());
        self
    }

    pub fn get_call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionService for MockCompletionClient {
    async fn complete(
        &self,
        system_prompt: &str,
        content: UserContent,
        max_tokens: u32,
        json_mode: bool,
    ) -> Result<String> {
        let index = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(RecordedCall {
                system_prompt: system_prompt.to_string(),
                content,
                max_tokens,
                json_mode,
            });
            calls.len() - 1
        };

        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(Error::AiProvider(message));
        }

        let responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok("{}".to_string())
        } else {
            Ok(responses[index % responses.len()].clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_cycles_responses() {
        let client = MockCompletionClient::new()
            .with_response("first")
            .with_response("second");

        let text = |s: &str| UserContent::Text(s.to_string());
        assert_eq!(client.complete("s", text("a"), 1, false).await.unwrap(), "first");
        assert_eq!(client.complete("s", text("b"), 1, false).await.unwrap(), "second");
        assert_eq!(client.complete("s", text("c"), 1, false).await.unwrap(), "first");
        assert_eq!(client.get_call_count(), 3);
    }

    #[tokio::test]
    async fn test_mock_records_arguments() {
        let client = MockCompletionClient::new();
        client
            .complete("system", UserContent::Text("user".to_string()), 42, true)
            .await
            .unwrap();

        let calls = client.calls();
        assert_eq!(calls[0].system_prompt, "system");
        assert_eq!(calls[0].max_tokens, 42);
        assert!(calls[0].json_mode);
    }

    #[tokio::test]
    async fn test_mock_failure() {
        let client = MockCompletionClient::new().with_failure("quota exceeded");
        let err = client
            .complete("s", UserContent::Text("u".to_string()), 1, false)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::AiProvider(_)));
        assert_eq!(client.get_call_count(), 1);
    }
}
