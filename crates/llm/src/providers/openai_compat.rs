//! Shared wire format for OpenAI-compatible chat and embedding APIs.
//!
//! Groq, Together, and OpenAI all accept the same request shapes; only
//! base URL, auth, and model identifiers differ per backend.

use crate::client::ChatMessage;
use lexrag_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// Reject non-2xx responses, capturing status and body in the error.
async fn check_status(provider: &str, response: reqwest::Response) -> AppResult<reqwest::Response> {
    if !response.status().is_success() {
        let status = response.status();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(AppError::Provider(format!(
            "{} API error ({}): {}",
            provider, status, error_text
        )));
    }
    Ok(response)
}

/// POST a chat completion to an OpenAI-compatible endpoint.
pub(crate) async fn chat_completions(
    http: &reqwest::Client,
    provider: &str,
    base_url: &str,
    api_key: &str,
    model: &str,
    messages: &[ChatMessage],
    temperature: f32,
    max_tokens: u32,
    timeout: Duration,
) -> AppResult<String> {
    let url = format!("{}/chat/completions", base_url);
    let body = ChatCompletionRequest {
        model,
        messages,
        temperature,
        max_tokens,
    };

    let response = http
        .post(&url)
        .bearer_auth(api_key)
        .json(&body)
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| AppError::Provider(format!("{}: request failed: {}", provider, e)))?;

    let response = check_status(provider, response).await?;

    let parsed: ChatCompletionResponse = response
        .json()
        .await
        .map_err(|e| AppError::Provider(format!("{}: failed to parse response: {}", provider, e)))?;

    parsed
        .choices
        .into_iter()
        .next()
        .map(|c| c.message.content)
        .ok_or_else(|| AppError::Provider(format!("{}: response contained no choices", provider)))
}

/// POST an embedding request to an OpenAI-compatible endpoint.
pub(crate) async fn embeddings(
    http: &reqwest::Client,
    provider: &str,
    base_url: &str,
    api_key: &str,
    model: &str,
    text: &str,
    timeout: Duration,
) -> AppResult<Vec<f32>> {
    let url = format!("{}/embeddings", base_url);
    let body = EmbeddingRequest { model, input: text };

    let response = http
        .post(&url)
        .bearer_auth(api_key)
        .json(&body)
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| AppError::Provider(format!("{}: request failed: {}", provider, e)))?;

    let response = check_status(provider, response).await?;

    let parsed: EmbeddingResponse = response
        .json()
        .await
        .map_err(|e| AppError::Provider(format!("{}: failed to parse response: {}", provider, e)))?;

    parsed
        .data
        .into_iter()
        .next()
        .map(|d| d.embedding)
        .ok_or_else(|| AppError::Provider(format!("{}: response contained no embedding", provider)))
}
