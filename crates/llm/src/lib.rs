//! Provider gateway for the lexrag engine.
//!
//! This crate provides a backend-agnostic abstraction for chat completion
//! and embedding over multiple interchangeable LLM services, plus a local
//! deterministic embedding fallback.
//!
//! # Backends
//! - **Groq**: free cloud, very fast (first auto-detection choice)
//! - **Gemini**: free cloud with generous limits
//! - **Together**: paid-credit cloud
//! - **OpenAI**: paid
//! - **Ollama**: local runtime, terminal fallback, no credentials needed
//!
//! # Example
//! ```no_run
//! use lexrag_core::Settings;
//! use lexrag_llm::{create_client, ChatMessage};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = Settings::load()?;
//! let client = create_client(&settings)?;
//! let answer = client
//!     .chat(&[ChatMessage::user("¿Qué es la CTS?")], 0.3, 500)
//!     .await?;
//! println!("{}", answer);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod embeddings;
pub mod factory;
pub mod providers;

// Re-export main types
pub use client::{ChatMessage, LlmClient, Role};
pub use embeddings::{local_embedding, LocalEmbedder, LOCAL_EMBEDDING_DIM};
pub use factory::{create_client, global_client, select_provider, ProviderKind};
