//! Error types for the lexrag workspace.
//!
//! This module defines a unified error enum covering every error category
//! in the engine: configuration, I/O, provider transport, vector index,
//! and serialization failures.

use thiserror::Error;

/// Unified error type for the lexrag engine.
///
/// All fallible functions return `Result<T, AppError>`.
/// Errors are represented and propagated, never panicked on.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// LLM backend transport/HTTP errors
    #[error("Provider error: {0}")]
    Provider(String),

    /// Vector index errors
    #[error("Index error: {0}")]
    Index(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
