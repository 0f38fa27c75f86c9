//! Extract command handler.
//!
//! Pulls template field values out of a saved conversation transcript.

use clap::Args;
use lexrag_core::{AppError, AppResult, Settings};
use lexrag_llm::global_client;
use lexrag_rag::templates::extract_fields;
use std::path::PathBuf;

use super::ask::{load_history, load_templates};

/// Extract document template fields from a transcript
#[derive(Args, Debug)]
pub struct ExtractCommand {
    /// Template id to extract fields for
    #[arg(short, long)]
    pub template: String,

    /// YAML file with the document template catalog
    #[arg(long)]
    pub templates: PathBuf,

    /// JSON file with the conversation transcript
    #[arg(long)]
    pub transcript: PathBuf,
}

impl ExtractCommand {
    /// Execute the extract command.
    pub async fn execute(&self, settings: &Settings) -> AppResult<()> {
        tracing::info!("Executing extract command for template {}", self.template);

        let catalog = load_templates(&self.templates)?;
        let template = catalog
            .iter()
            .find(|t| t.id == self.template)
            .ok_or_else(|| {
                AppError::Config(format!(
                    "Template '{}' not found in catalog",
                    self.template
                ))
            })?;

        let transcript = load_history(&self.transcript)?;
        let client = global_client(settings)?;

        let fields = extract_fields(client.as_ref(), template, &transcript).await;

        tracing::debug!("Extracted {} fields", fields.len());
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::Value::Object(fields))?
        );

        Ok(())
    }
}
