//! OpenAI backend adapter.
//!
//! Paid backend; model is configurable since pricing varies widely.

use crate::client::{ChatMessage, LlmClient};
use crate::providers::openai_compat;
use lexrag_core::AppResult;
use std::time::Duration;

const BASE_URL: &str = "https://api.openai.com/v1";
const EMBED_MODEL: &str = "text-embedding-3-small";
const CHAT_TIMEOUT: Duration = Duration::from_secs(60);
const EMBED_TIMEOUT: Duration = Duration::from_secs(30);

/// OpenAI client.
pub struct OpenAiClient {
    api_key: String,
    model: String,
    http: reqwest::Client,
}

impl OpenAiClient {
    /// Create a new OpenAI client with the given API key and chat model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait::async_trait]
impl LlmClient for OpenAiClient {
    fn provider_name(&self) -> &str {
        "openai"
    }

    async fn chat(
        &self,
        messages: &[ChatMessage],
        temperature: f32,
        max_tokens: u32,
    ) -> AppResult<String> {
        tracing::debug!(
            "Sending chat request to OpenAI model {} ({} messages)",
            self.model,
            messages.len()
        );

        openai_compat::chat_completions(
            &self.http,
            "openai",
            BASE_URL,
            &self.api_key,
            &self.model,
            messages,
            temperature,
            max_tokens,
            CHAT_TIMEOUT,
        )
        .await
    }

    async fn embed(&self, text: &str) -> AppResult<Vec<f32>> {
        openai_compat::embeddings(
            &self.http,
            "openai",
            BASE_URL,
            &self.api_key,
            EMBED_MODEL,
            text,
            EMBED_TIMEOUT,
        )
        .await
    }
}
