//! LLM client abstraction and message types.
//!
//! This module defines the core abstraction for interacting with LLM
//! backends. Every backend adapts the same two operations: a chat
//! completion over an ordered message list, and a single-text embedding.

use lexrag_core::AppResult;
use serde::{Deserialize, Serialize};

/// Message role in a chat exchange.
///
/// Serializes lowercase so messages can be posted verbatim to
/// OpenAI-style chat APIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Trait for LLM backends.
///
/// This trait abstracts the underlying backend (Groq, Gemini, Together,
/// OpenAI, Ollama) behind a uniform chat/embed contract. Adapters must not
/// leak backend-specific fields to callers; any transport or non-2xx
/// response surfaces as `AppError::Provider`.
#[async_trait::async_trait]
pub trait LlmClient: Send + Sync {
    /// Get the backend name (e.g., "groq", "ollama").
    fn provider_name(&self) -> &str;

    /// Send a chat completion request and return the generated text.
    async fn chat(
        &self,
        messages: &[ChatMessage],
        temperature: f32,
        max_tokens: u32,
    ) -> AppResult<String>;

    /// Generate an embedding vector for a single text.
    ///
    /// Backends without a native embedding capability delegate to the
    /// local fallback embedder instead of failing.
    async fn embed(&self, text: &str) -> AppResult<Vec<f32>>;
}
