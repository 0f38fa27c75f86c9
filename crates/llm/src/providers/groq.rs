//! Groq backend adapter.
//!
//! Groq serves Llama models over an OpenAI-compatible API with a generous
//! free tier and very low latency, which makes it the first choice during
//! backend auto-detection. Groq has no embedding endpoint; embedding calls
//! delegate to the local fallback embedder.

use crate::client::{ChatMessage, LlmClient};
use crate::embeddings;
use crate::providers::openai_compat;
use lexrag_core::AppResult;
use std::time::Duration;

const BASE_URL: &str = "https://api.groq.com/openai/v1";
const MODEL: &str = "llama-3.3-70b-versatile";
const CHAT_TIMEOUT: Duration = Duration::from_secs(60);

/// Groq LLM client.
pub struct GroqClient {
    api_key: String,
    http: reqwest::Client,
}

impl GroqClient {
    /// Create a new Groq client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait::async_trait]
impl LlmClient for GroqClient {
    fn provider_name(&self) -> &str {
        "groq"
    }

    async fn chat(
        &self,
        messages: &[ChatMessage],
        temperature: f32,
        max_tokens: u32,
    ) -> AppResult<String> {
        tracing::debug!("Sending chat request to Groq ({} messages)", messages.len());

        openai_compat::chat_completions(
            &self.http,
            "groq",
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
        // Groq has no embeddings API
        embeddings::local_embedding(text).await
    }
}
