//! Title command handler.
//!
//! Generates a short title for a conversation from its opening message.

use clap::Args;
use lexrag_core::{AppResult, Settings};

use super::ask::build_engine;

/// Generate a short conversation title
#[derive(Args, Debug)]
pub struct TitleCommand {
    /// First message of the conversation
    pub message: String,
}

impl TitleCommand {
    /// Execute the title command.
    pub async fn execute(&self, settings: &Settings) -> AppResult<()> {
        tracing::info!("Executing title command");

        let engine = build_engine(settings, Vec::new())?;
        let title = engine.conversation_title(&self.message).await;
        println!("{}", title);

        Ok(())
    }
}
