//! Hosted chat-completion integration
//!
//! One authenticated client for a chat-completion API that accepts both text
//! and inline base64 images and can be asked to reply with a JSON object.

pub mod client;
pub mod mime;
pub mod mock;
pub mod types;

pub use client::AzureOpenAiClient;
pub use mock::MockCompletionClient;

use crate::Result;
use async_trait::async_trait;

/// User-turn content: plain text, or a mix of text and inline images.
#[derive(Debug, Clone, PartialEq)]
pub enum UserContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ContentPart {
    Text(String),
    /// Base64 payload plus the MIME type used to build the data URL.
    Image { mime: String, base64_data: String },
}

impl ContentPart {
    pub fn data_url(mime: &str, base64_data: &str) -> String {
        format!("data:{};base64,{}", mime, base64_data)
    }
}

#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Send one system prompt and one user turn, returning the raw reply text.
    ///
    /// `json_mode` asks the remote side for a single JSON object; the reply
    /// is not checked here.
    async fn complete(
        &self,
        system_prompt: &str,
        content: UserContent,
        max_tokens: u32,
        json_mode: bool,
    ) -> Result<String>;
}
