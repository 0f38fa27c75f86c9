//! Retrieval-augmented answering for Peruvian legal questions.
//!
//! The pipeline runs in fixed order: intent shortcuts, keyword
//! classification, context retrieval (vector index with a curated corpus
//! fallback), grounded generation, self-verification, and document
//! template suggestion. It degrades rather than fails: missing backends
//! and mid-pipeline errors produce results with honest confidence flags.
//!
//! ```no_run
//! use lexrag_rag::{Mode, RagEngine};
//! use std::sync::Arc;
//!
//! # async fn run() -> lexrag_core::AppResult<()> {
//! let client = lexrag_llm::global_client(&lexrag_core::Settings::load()?)?;
//! let engine = RagEngine::new(client, None, Vec::new());
//! let result = engine
//!     .answer("mi jefe no me paga la CTS", &[], None, Mode::Advisor)
//!     .await;
//! println!("{}", result.answer);
//! # Ok(())
//! # }
//! ```

pub mod classify;
pub mod corpus;
pub mod generate;
pub mod intent;
pub mod prompt;
pub mod retrieve;
pub mod templates;
pub mod types;
pub mod vector;

#[cfg(test)]
mod test_support;

pub use generate::RagEngine;
pub use templates::{TemplateDescriptor, TemplateField};
pub use types::{Category, GenerationResult, LegalSource, Mode};
pub use vector::{IndexMatch, PineconeIndex, VectorIndex};
