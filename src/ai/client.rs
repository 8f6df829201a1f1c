//! Azure OpenAI chat-completions client.

use super::types::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ChatMessageContent, ImageUrl,
    MessagePart, ResponseFormat,
};
use super::{CompletionService, ContentPart, UserContent};
use crate::config::Config;
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Azure-hosted OpenAI chat deployment.
pub struct AzureOpenAiClient {
    client: Client,
    endpoint: String,
    api_key: String,
    api_version: String,
    deployment: String,
}

impl AzureOpenAiClient {
    pub fn new(
        endpoint: String,
        api_key: String,
        api_version: String,
        deployment: String,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key,
            api_version,
            deployment,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.endpoint.clone(),
            config.api_key.clone(),
            config.api_version.clone(),
            config.model.clone(),
            config.request_timeout,
        )
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint, self.deployment, self.api_version
        )
    }

    async fn chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse> {
        let response = self
            .client
            .post(self.completions_url())
            .header("api-key", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send request to Azure OpenAI: {}", e);
                e
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            tracing::error!("Azure OpenAI API error (status {}): {}", status, error_text);
            return Err(Error::AiProvider(format!(
                "API error (status {}): {}",
                status, error_text
            )));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse completion envelope: {}\nBody: {}", e, body);
            Error::AiProvider(format!("Failed to parse completion envelope: {}", e))
        })
    }
}

fn to_wire_content(content: UserContent) -> ChatMessageContent {
    match content {
        UserContent::Text(text) => ChatMessageContent::Text(text),
        UserContent::Parts(parts) => ChatMessageContent::Parts(
            parts
                .into_iter()
                .map(|part| match part {
                    ContentPart::Text(text) => MessagePart {
                        part_type: "text".to_string(),
                        text: Some(text),
                        image_url: None,
                    },
                    ContentPart::Image { mime, base64_data } => MessagePart {
                        part_type: "image_url".to_string(),
                        text: None,
                        image_url: Some(ImageUrl {
                            url: ContentPart::data_url(&mime, &base64_data),
                        }),
                    },
                })
                .collect(),
        ),
    }
}

#[async_trait]
impl CompletionService for AzureOpenAiClient {
    async fn complete(
        &self,
        system_prompt: &str,
        content: UserContent,
        max_tokens: u32,
        json_mode: bool,
    ) -> Result<String> {
        tracing::debug!(
            "Sending chat completion to deployment {} (max_tokens={}, json_mode={})",
            self.deployment,
            max_tokens,
            json_mode
        );

        let request = ChatCompletionRequest {
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: Some(ChatMessageContent::Text(system_prompt.to_string())),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: Some(to_wire_content(content)),
                },
            ],
            max_tokens,
            response_format: json_mode.then(ResponseFormat::json_object),
        };

        let response = self.chat_completion(&request).await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| match choice.message.content {
                Some(ChatMessageContent::Text(text)) => Some(text),
                _ => None,
            })
            .ok_or_else(|| Error::AiProvider("No response from chat completion API".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_client(server: &MockServer) -> AzureOpenAiClient {
        AzureOpenAiClient::new(
            server.uri(),
            "test-key".to_string(),
            "2024-02-15-preview".to_string(),
            "gpt-4o".to_string(),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    fn reply(content: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [{
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop"
            }]
        }))
    }

    #[tokio::test]
    async fn test_complete_returns_reply_text() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/openai/deployments/gpt-4o/chat/completions"))
            .and(query_param("api-version", "2024-02-15-preview"))
            .and(header("api-key", "test-key"))
            .respond_with(reply("{\"ingredients\": {}}"))
            .expect(1)
            .mount(&server)
            .await;

        let text = make_client(&server)
            .complete("system", UserContent::Text("hello".to_string()), 100, true)
            .await
            .unwrap();
        assert_eq!(text, "{\"ingredients\": {}}");
    }

    #[tokio::test]
    async fn test_json_mode_sets_response_format() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(body_partial_json(serde_json::json!({
                "max_tokens": 4000,
                "response_format": { "type": "json_object" }
            })))
            .respond_with(reply("{}"))
            .expect(1)
            .mount(&server)
            .await;

        make_client(&server)
            .complete("system", UserContent::Text("hi".to_string()), 4000, true)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_image_parts_become_data_urls() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(body_partial_json(serde_json::json!({
                "messages": [
                    { "role": "system", "content": "sys" },
                    { "role": "user", "content": [
                        { "type": "text", "text": "look" },
                        { "type": "image_url", "image_url": { "url": "data:image/png;base64,AAAA" } }
                    ]}
                ]
            })))
            .respond_with(reply("{}"))
            .expect(1)
            .mount(&server)
            .await;

        let content = UserContent::Parts(vec![
            ContentPart::Text("look".to_string()),
            ContentPart::Image {
                mime: "image/png".to_string(),
                base64_data: "AAAA".to_string(),
            },
        ]);

        make_client(&server)
            .complete("sys", content, 2000, true)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_api_error_returns_ai_provider_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("access denied"))
            .mount(&server)
            .await;

        let err = make_client(&server)
            .complete("s", UserContent::Text("u".to_string()), 10, false)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::AiProvider(ref m) if m.contains("401")));
    }

    #[tokio::test]
    async fn test_empty_choices_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "choices": [] })),
            )
            .mount(&server)
            .await;

        let err = make_client(&server)
            .complete("s", UserContent::Text("u".to_string()), 10, false)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::AiProvider(_)));
    }

    #[test]
    fn test_trailing_slash_is_trimmed_from_endpoint() {
        let client = AzureOpenAiClient::new(
            "https://example.openai.azure.com/".to_string(),
            "k".to_string(),
            "v1".to_string(),
            "dep".to_string(),
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(
            client.completions_url(),
            "https://example.openai.azure.com/openai/deployments/dep/chat/completions?api-version=v1"
        );
    }
}
