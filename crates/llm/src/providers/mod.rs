//! Backend adapters for the provider gateway.
//!
//! One module per backend. Groq, Together, and OpenAI speak the same
//! OpenAI-style chat wire format, shared via `openai_compat`; Gemini and
//! Ollama carry their own formats.

mod openai_compat;

pub mod gemini;
pub mod groq;
pub mod ollama;
pub mod openai;
pub mod together;

pub use gemini::GeminiClient;
pub use groq::GroqClient;
pub use ollama::OllamaClient;
pub use openai::OpenAiClient;
pub use together::TogetherClient;
