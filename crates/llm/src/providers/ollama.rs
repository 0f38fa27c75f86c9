//! Ollama backend adapter.
//!
//! Local LLM runtime; the terminal fallback backend, usable with no
//! credentials. Local models are slow, so the chat timeout is double the
//! cloud backends'.
//! Ollama API: https://github.com/ollama/ollama/blob/main/docs/api.md

use crate::client::{ChatMessage, LlmClient};
use lexrag_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const EMBED_MODEL: &str = "nomic-embed-text";
const CHAT_TIMEOUT: Duration = Duration::from_secs(120);
const EMBED_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: OllamaMessage,
}

#[derive(Debug, Deserialize)]
struct OllamaMessage {
    content: String,
}

#[derive(Debug, Serialize)]
struct OllamaEmbedRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct OllamaEmbedResponse {
    embedding: Vec<f32>,
}

/// Ollama LLM client.
pub struct OllamaClient {
    base_url: String,
    model: String,
    http: reqwest::Client,
}

impl OllamaClient {
    /// Create a new Ollama client.
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            http: reqwest::Client::new(),
        }
    }
}

impl Default for OllamaClient {
    fn default() -> Self {
        Self::new("http://localhost:11434", "llama3.1")
    }
}

#[async_trait::async_trait]
impl LlmClient for OllamaClient {
    fn provider_name(&self) -> &str {
        "ollama"
    }

    async fn chat(
        &self,
        messages: &[ChatMessage],
        temperature: f32,
        max_tokens: u32,
    ) -> AppResult<String> {
        tracing::debug!(
            "Sending chat request to Ollama model {} ({} messages)",
            self.model,
            messages.len()
        );

        let body = OllamaChatRequest {
            model: &self.model,
            messages,
            stream: false,
            options: OllamaOptions {
                temperature,
                num_predict: max_tokens,
            },
        };

        let url = format!("{}/api/chat", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(&body)
            .timeout(CHAT_TIMEOUT)
            .send()
            .await
            .map_err(|e| AppError::Provider(format!("ollama: request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Provider(format!(
                "ollama API error ({}): {}",
                status, error_text
            )));
        }

        let parsed: OllamaChatResponse = response
            .json()
            .await
            .map_err(|e| AppError::Provider(format!("ollama: failed to parse response: {}", e)))?;

        Ok(parsed.message.content)
    }

    async fn embed(&self, text: &str) -> AppResult<Vec<f32>> {
        let body = OllamaEmbedRequest {
            model: EMBED_MODEL,
            prompt: text,
        };

        let url = format!("{}/api/embeddings", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(&body)
            .timeout(EMBED_TIMEOUT)
            .send()
            .await
            .map_err(|e| AppError::Provider(format!("ollama: request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Provider(format!(
                "ollama API error ({}): {}",
                status, error_text
            )));
        }

        let parsed: OllamaEmbedResponse = response
            .json()
            .await
            .map_err(|e| AppError::Provider(format!("ollama: failed to parse response: {}", e)))?;

        Ok(parsed.embedding)
    }
}
