//! Together AI backend adapter.
//!
//! OpenAI-compatible chat and embedding endpoints over api.together.xyz.

use crate::client::{ChatMessage, LlmClient};
use crate::providers::openai_compat;
use lexrag_core::AppResult;
use std::time::Duration;

const BASE_URL: &str = "https://api.together.xyz/v1";
const MODEL: &str = "meta-llama/Llama-3.2-11B-Vision-Instruct-Turbo";
const EMBED_MODEL: &str = "togethercomputer/m2-bert-80M-8k-retrieval";
const CHAT_TIMEOUT: Duration = Duration::from_secs(60);
const EMBED_TIMEOUT: Duration = Duration::from_secs(30);

/// Together AI client.
pub struct TogetherClient {
    api_key: String,
    http: reqwest::Client,
}

impl TogetherClient {
    /// Create a new Together client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait::async_trait]
impl LlmClient for TogetherClient {
    fn provider_name(&self) -> &str {
        "together"
    }

    async fn chat(
        &self,
        messages: &[ChatMessage],
        temperature: f32,
        max_tokens: u32,
    ) -> AppResult<String> {
        tracing::debug!(
            "Sending chat request to Together ({} messages)",
            messages.len()
        );

        openai_compat::chat_completions(
            &self.http,
            "together",
            BASE_URL,
            &self.api_key,
            MODEL,
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
            "together",
            BASE_URL,
            &self.api_key,
            EMBED_MODEL,
            text,
            EMBED_TIMEOUT,
        )
        .await
    }
}
