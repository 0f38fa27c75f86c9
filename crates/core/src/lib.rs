//! Lexrag Core Library
//!
//! This crate provides the foundational utilities for the lexrag engine:
//! - Error handling (`AppError`, `AppResult`)
//! - Logging infrastructure
//! - Configuration management (`Settings`)

pub mod config;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use config::Settings;
pub use error::{AppError, AppResult};
