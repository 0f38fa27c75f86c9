//! Command handlers for the Lexrag CLI.
//!
//! This module organizes all CLI commands into separate submodules.

pub mod ask;
pub mod extract;
pub mod title;

// Re-export command types for convenience
pub use ask::AskCommand;
pub use extract::ExtractCommand;
pub use title::TitleCommand;
