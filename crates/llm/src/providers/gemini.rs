//! Google Gemini backend adapter.
//!
//! Gemini's wire format differs from the OpenAI style: system messages
//! travel as a separate `systemInstruction`, assistant turns become role
//! "model", and the API key is a query parameter. The adapter keeps all of
//! that internal to this module.

use crate::client::{ChatMessage, LlmClient, Role};
use lexrag_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const MODEL: &str = "gemini-1.5-flash";
const EMBED_MODEL: &str = "text-embedding-004";
const CHAT_TIMEOUT: Duration = Duration::from_secs(60);
const EMBED_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Debug, Serialize)]
struct EmbedContentRequest {
    model: String,
    content: Content,
}

#[derive(Debug, Deserialize)]
struct EmbedContentResponse {
    embedding: EmbeddingValues,
}

#[derive(Debug, Deserialize)]
struct EmbeddingValues {
    values: Vec<f32>,
}

/// Google Gemini client.
pub struct GeminiClient {
    api_key: String,
    http: reqwest::Client,
}

impl GeminiClient {
    /// Create a new Gemini client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            http: reqwest::Client::new(),
        }
    }

    /// Convert an OpenAI-style message list to the Gemini request shape.
    fn to_gemini_request(
        messages: &[ChatMessage],
        temperature: f32,
        max_tokens: u32,
    ) -> GenerateContentRequest {
        let mut contents = Vec::new();
        let mut system_instruction = None;

        for msg in messages {
            match msg.role {
                Role::System => {
                    system_instruction = Some(Content {
                        role: None,
                        parts: vec![Part {
                            text: msg.content.clone(),
                        }],
                    });
                }
                Role::User | Role::Assistant => {
                    let role = if msg.role == Role::User {
                        "user"
                    } else {
                        "model"
                    };
                    contents.push(Content {
                        role: Some(role.to_string()),
                        parts: vec![Part {
                            text: msg.content.clone(),
                        }],
                    });
                }
            }
        }

        GenerateContentRequest {
            contents,
            system_instruction,
            generation_config: GenerationConfig {
                temperature,
                max_output_tokens: max_tokens,
            },
        }
    }
}

#[async_trait::async_trait]
impl LlmClient for GeminiClient {
    fn provider_name(&self) -> &str {
        "gemini"
    }

    async fn chat(
        &self,
        messages: &[ChatMessage],
        temperature: f32,
        max_tokens: u32,
    ) -> AppResult<String> {
        tracing::debug!(
            "Sending chat request to Gemini ({} messages)",
            messages.len()
        );

        let body = Self::to_gemini_request(messages, temperature, max_tokens);
        let url = format!("{}/models/{}:generateContent", BASE_URL, MODEL);

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .timeout(CHAT_TIMEOUT)
            .send()
            .await
            .map_err(|e| AppError::Provider(format!("gemini: request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Provider(format!(
                "gemini API error ({}): {}",
                status, error_text
            )));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AppError::Provider(format!("gemini: failed to parse response: {}", e)))?;

        let text = parsed
            .candidates
            .into_iter()
            .next()
            .map(|c| {
                c.content
                    .parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .ok_or_else(|| {
                AppError::Provider("gemini: response contained no candidates".to_string())
            })?;

        Ok(text)
    }

    async fn embed(&self, text: &str) -> AppResult<Vec<f32>> {
        let body = EmbedContentRequest {
            model: format!("models/{}", EMBED_MODEL),
            content: Content {
                role: None,
                parts: vec![Part {
                    text: text.to_string(),
                }],
            },
        };
        let url = format!("{}/models/{}:embedContent", BASE_URL, EMBED_MODEL);

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .timeout(EMBED_TIMEOUT)
            .send()
            .await
            .map_err(|e| AppError::Provider(format!("gemini: request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Provider(format!(
                "gemini API error ({}): {}",
                status, error_text
            )));
        }

        let parsed: EmbedContentResponse = response
            .json()
            .await
            .map_err(|e| AppError::Provider(format!("gemini: failed to parse response: {}", e)))?;

        Ok(parsed.embedding.values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gemini_request_conversion() {
        let messages = vec![
            ChatMessage::system("eres un asistente legal"),
            ChatMessage::user("hola"),
            ChatMessage::assistant("buenos días"),
            ChatMessage::user("¿qué es la CTS?"),
        ];

        let request = GeminiClient::to_gemini_request(&messages, 0.3, 1500);

        // System message moves to systemInstruction
        let system = request.system_instruction.unwrap();
        assert_eq!(system.parts[0].text, "eres un asistente legal");

        // Assistant role maps to "model"
        assert_eq!(request.contents.len(), 3);
        assert_eq!(request.contents[0].role.as_deref(), Some("user"));
        assert_eq!(request.contents[1].role.as_deref(), Some("model"));
        assert_eq!(request.contents[2].role.as_deref(), Some("user"));

        assert_eq!(request.generation_config.max_output_tokens, 1500);
    }

    #[test]
    fn test_gemini_request_no_system() {
        let messages = vec![ChatMessage::user("hola")];
        let request = GeminiClient::to_gemini_request(&messages, 0.0, 60);
        assert!(request.system_instruction.is_none());

        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("systemInstruction").is_none());
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 60);
    }

    #[test]
    fn test_gemini_response_parsing() {
        let raw = r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Según "},{"text":"la ley"}]}}]}"#;
        let parsed: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        let text: String = parsed.candidates[0]
            .content
            .parts
            .iter()
            .map(|p| p.text.as_str())
            .collect();
        assert_eq!(text, "Según la ley");
    }
}
