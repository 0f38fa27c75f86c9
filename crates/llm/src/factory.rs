//! Backend selection and client construction.
//!
//! Selection is a pure function from `Settings` to a `ProviderKind`: an
//! explicit override wins, otherwise the first backend with credentials in
//! a fixed priority order is chosen, ending at Ollama which needs none.
//! The chosen client is cached process-wide and reused for every request.

use crate::client::LlmClient;
use crate::providers::{GeminiClient, GroqClient, OllamaClient, OpenAiClient, TogetherClient};
use lexrag_core::{AppError, AppResult, Settings};
use std::sync::{Arc, OnceLock};

/// Known LLM backends, in auto-detection priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Groq,
    Gemini,
    Together,
    OpenAi,
    Ollama,
}

impl ProviderKind {
    /// Parse a backend name from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "groq" => Some(Self::Groq),
            "gemini" | "google" => Some(Self::Gemini),
            "together" => Some(Self::Together),
            "openai" => Some(Self::OpenAi),
            "ollama" => Some(Self::Ollama),
            _ => None,
        }
    }

    /// Get the canonical backend name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Groq => "groq",
            Self::Gemini => "gemini",
            Self::Together => "together",
            Self::OpenAi => "openai",
            Self::Ollama => "ollama",
        }
    }
}

/// Select the backend to use for this process.
///
/// Pure function over the settings: an explicit provider override takes
/// precedence; otherwise backends are auto-detected by credential presence
/// in priority order (groq → gemini → together → openai), falling through
/// to Ollama, which always succeeds because it needs no credentials.
///
/// # Errors
/// Returns a Config error only for an unknown explicit override; the
/// auto-detection path cannot fail.
pub fn select_provider(settings: &Settings) -> AppResult<ProviderKind> {
    if let Some(ref name) = settings.provider {
        return ProviderKind::parse(name).ok_or_else(|| {
            AppError::Config(format!(
                "Unknown provider '{}'. Supported: groq, gemini, together, openai, ollama",
                name
            ))
        });
    }

    let kind = if settings.groq_api_key.is_some() {
        ProviderKind::Groq
    } else if settings.google_api_key.is_some() {
        ProviderKind::Gemini
    } else if settings.together_api_key.is_some() {
        ProviderKind::Together
    } else if settings.openai_api_key.is_some() {
        ProviderKind::OpenAi
    } else {
        ProviderKind::Ollama
    };

    Ok(kind)
}

/// Create an LLM client for the selected backend.
///
/// # Errors
/// Returns a Config error if the override names an unknown backend or the
/// selected backend is missing its API key.
pub fn create_client(settings: &Settings) -> AppResult<Arc<dyn LlmClient>> {
    let kind = select_provider(settings)?;

    tracing::info!("Using LLM backend: {}", kind.as_str());

    let client: Arc<dyn LlmClient> = match kind {
        ProviderKind::Groq => {
            let key = require_key(&settings.groq_api_key, "groq", "GROQ_API_KEY")?;
            Arc::new(GroqClient::new(key))
        }
        ProviderKind::Gemini => {
            let key = require_key(&settings.google_api_key, "gemini", "GOOGLE_API_KEY")?;
            Arc::new(GeminiClient::new(key))
        }
        ProviderKind::Together => {
            let key = require_key(&settings.together_api_key, "together", "TOGETHER_API_KEY")?;
            Arc::new(TogetherClient::new(key))
        }
        ProviderKind::OpenAi => {
            let key = require_key(&settings.openai_api_key, "openai", "OPENAI_API_KEY")?;
            Arc::new(OpenAiClient::new(key, settings.openai_model.clone()))
        }
        ProviderKind::Ollama => Arc::new(OllamaClient::new(
            settings.ollama_url.clone(),
            settings.ollama_model.clone(),
        )),
    };

    Ok(client)
}

fn require_key(key: &Option<String>, provider: &str, env_var: &str) -> AppResult<String> {
    key.clone().ok_or_else(|| {
        AppError::Config(format!(
            "Provider '{}' requires an API key ({} is not set)",
            provider, env_var
        ))
    })
}

/// Process-wide client, selected once and reused by every request.
static GLOBAL_CLIENT: OnceLock<Arc<dyn LlmClient>> = OnceLock::new();

/// Get the process-wide LLM client, creating it on first use.
///
/// Safe under concurrent first access: racing callers may each build a
/// client, but only one is stored and handed out from then on.
pub fn global_client(settings: &Settings) -> AppResult<Arc<dyn LlmClient>> {
    if let Some(client) = GLOBAL_CLIENT.get() {
        return Ok(Arc::clone(client));
    }

    let client = create_client(settings)?;
    Ok(Arc::clone(GLOBAL_CLIENT.get_or_init(|| client)))
}
