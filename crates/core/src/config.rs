//! Configuration management for the lexrag engine.
//!
//! Settings are loaded from multiple sources, later sources winning:
//! - Built-in defaults
//! - An optional YAML config file (`LEXRAG_CONFIG`)
//! - Environment variables (backend credentials use their canonical names)
//! - Command-line flags (applied via [`Settings::with_overrides`])
//!
//! The engine itself never reads the environment; everything flows through
//! this struct so backend selection stays a pure function of `Settings`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Runtime settings for the lexrag engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Explicit backend override (e.g., "groq", "ollama"). None = auto-detect.
    pub provider: Option<String>,

    /// Groq API key (fast free cloud backend)
    pub groq_api_key: Option<String>,

    /// Google API key (Gemini)
    pub google_api_key: Option<String>,

    /// Together AI API key
    pub together_api_key: Option<String>,

    /// OpenAI API key
    pub openai_api_key: Option<String>,

    /// OpenAI chat model
    pub openai_model: String,

    /// Ollama endpoint (local backend, always available)
    pub ollama_url: String,

    /// Ollama chat model
    pub ollama_model: String,

    /// Pinecone API key for the external vector index
    pub pinecone_api_key: Option<String>,

    /// Pinecone index host (e.g., "my-index-abc123.svc.pinecone.io")
    pub pinecone_index_host: Option<String>,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// YAML config file structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigFile {
    llm: Option<LlmSection>,
    ollama: Option<OllamaSection>,
    pinecone: Option<PineconeSection>,
    logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LlmSection {
    provider: Option<String>,
    #[serde(rename = "openaiModel")]
    openai_model: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct OllamaSection {
    endpoint: Option<String>,
    model: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PineconeSection {
    #[serde(rename = "indexHost")]
    index_host: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingSection {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            provider: None,
            groq_api_key: None,
            google_api_key: None,
            together_api_key: None,
            openai_api_key: None,
            openai_model: "gpt-4o-mini".to_string(),
            ollama_url: "http://localhost:11434".to_string(),
            ollama_model: "llama3.1".to_string(),
            pinecone_api_key: None,
            pinecone_index_host: None,
            log_level: None,
            verbose: false,
            no_color: false,
        }
    }
}

impl Settings {
    /// Load settings from the optional config file and the environment.
    ///
    /// Environment variables:
    /// - `LEXRAG_PROVIDER`: explicit backend override
    /// - `LEXRAG_CONFIG`: path to a YAML config file
    /// - `GROQ_API_KEY`, `GOOGLE_API_KEY`, `TOGETHER_API_KEY`, `OPENAI_API_KEY`
    /// - `OPENAI_MODEL`, `OLLAMA_URL`, `OLLAMA_MODEL`
    /// - `PINECONE_API_KEY`, `PINECONE_INDEX_HOST`
    /// - `RUST_LOG`, `NO_COLOR`
    pub fn load() -> AppResult<Self> {
        let mut settings = Self::default();

        if let Ok(config_path) = std::env::var("LEXRAG_CONFIG") {
            let path = PathBuf::from(config_path);
            if !path.exists() {
                return Err(AppError::Config(format!(
                    "Config file does not exist: {:?}",
                    path
                )));
            }
            settings = settings.merge_yaml(&path)?;
            tracing::debug!("Merged config file {:?}", path);
        }

        // Environment variables override the config file
        if let Some(provider) = env_nonempty("LEXRAG_PROVIDER") {
            settings.provider = Some(provider);
        }

        settings.groq_api_key = env_nonempty("GROQ_API_KEY").or(settings.groq_api_key);
        settings.google_api_key = env_nonempty("GOOGLE_API_KEY").or(settings.google_api_key);
        settings.together_api_key = env_nonempty("TOGETHER_API_KEY").or(settings.together_api_key);
        settings.openai_api_key = env_nonempty("OPENAI_API_KEY").or(settings.openai_api_key);

        if let Some(model) = env_nonempty("OPENAI_MODEL") {
            settings.openai_model = model;
        }
        if let Some(url) = env_nonempty("OLLAMA_URL") {
            settings.ollama_url = url;
        }
        if let Some(model) = env_nonempty("OLLAMA_MODEL") {
            settings.ollama_model = model;
        }

        settings.pinecone_api_key = env_nonempty("PINECONE_API_KEY").or(settings.pinecone_api_key);
        settings.pinecone_index_host =
            env_nonempty("PINECONE_INDEX_HOST").or(settings.pinecone_index_host);

        settings.log_level = std::env::var("RUST_LOG").ok().or(settings.log_level);

        if std::env::var("NO_COLOR").is_ok() {
            settings.no_color = true;
        }

        Ok(settings)
    }

    /// Merge a YAML configuration file into these settings.
    pub fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(llm) = config_file.llm {
            if llm.provider.is_some() {
                result.provider = llm.provider;
            }
            if let Some(model) = llm.openai_model {
                result.openai_model = model;
            }
        }

        if let Some(ollama) = config_file.ollama {
            if let Some(endpoint) = ollama.endpoint {
                result.ollama_url = endpoint;
            }
            if let Some(model) = ollama.model {
                result.ollama_model = model;
            }
        }

        if let Some(pinecone) = config_file.pinecone {
            if pinecone.index_host.is_some() {
                result.pinecone_index_host = pinecone.index_host;
            }
        }

        if let Some(logging) = config_file.logging {
            if logging.level.is_some() {
                result.log_level = logging.level;
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        Ok(result)
    }

    /// Apply CLI overrides, giving flags precedence over everything else.
    pub fn with_overrides(
        mut self,
        provider: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(provider) = provider {
            self.provider = Some(provider);
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Whether an external vector index is configured.
    pub fn has_vector_index(&self) -> bool {
        self.pinecone_api_key.is_some() && self.pinecone_index_host.is_some()
    }
}

/// Read an environment variable, treating empty and placeholder values as absent.
fn env_nonempty(name: &str) -> Option<String> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() && !v.contains("TU_") => Some(v),
        _ => None,
    }
}
