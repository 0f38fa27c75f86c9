//! Ask command handler.
//!
//! Runs one legal query through the full pipeline and prints the result.

use clap::Args;
use lexrag_core::{AppError, AppResult, Settings};
use lexrag_llm::{global_client, ChatMessage};
use lexrag_rag::{Mode, PineconeIndex, RagEngine, TemplateDescriptor, VectorIndex};
use std::path::PathBuf;
use std::sync::Arc;

/// Ask a legal question
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub query: String,

    /// Conversation mode (advisor, hearing)
    #[arg(short, long, default_value = "advisor")]
    pub mode: String,

    /// JSON file with prior conversation messages ([{"role","content"}])
    #[arg(long)]
    pub history: Option<PathBuf>,

    /// Text file with a user document to include as context
    #[arg(long)]
    pub context_file: Option<PathBuf>,

    /// YAML file with the document template catalog
    #[arg(long)]
    pub templates: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, settings: &Settings) -> AppResult<()> {
        tracing::info!("Executing ask command");
        tracing::debug!("Ask command options: {:?}", self);

        let mode = Mode::parse(&self.mode).ok_or_else(|| {
            AppError::Config(format!(
                "Unknown mode '{}' (expected advisor or hearing)",
                self.mode
            ))
        })?;

        let history = match &self.history {
            Some(path) => load_history(path)?,
            None => Vec::new(),
        };

        let user_context = match &self.context_file {
            Some(path) => Some(std::fs::read_to_string(path)?),
            None => None,
        };

        let templates = match &self.templates {
            Some(path) => load_templates(path)?,
            None => Vec::new(),
        };

        let engine = build_engine(settings, templates)?;
        let result = engine
            .answer(&self.query, &history, user_context.as_deref(), mode)
            .await;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            println!("{}", result.answer);

            if !result.sources.is_empty() {
                println!("\nFuentes:");
                for source in &result.sources {
                    println!("  - {} ({})", source.law, source.article);
                }
            }

            println!(
                "\nCategoría: {} | Confianza: {:.1} | Consulte un abogado: {}",
                result.category.as_str(),
                result.confidence,
                if result.needs_lawyer { "sí" } else { "no" }
            );
        }

        Ok(())
    }
}

/// Build the engine from settings: global LLM client plus the vector
/// index when Pinecone credentials are present.
pub fn build_engine(
    settings: &Settings,
    templates: Vec<TemplateDescriptor>,
) -> AppResult<RagEngine> {
    let client = global_client(settings)?;
    tracing::info!("Using provider {}", client.provider_name());

    let index = PineconeIndex::from_settings(settings)
        .map(|index| Arc::new(index) as Arc<dyn VectorIndex>);
    if index.is_none() {
        tracing::debug!("No vector index configured, using curated corpus only");
    }

    Ok(RagEngine::new(client, index, templates))
}

/// Load prior conversation messages from a JSON file.
pub fn load_history(path: &PathBuf) -> AppResult<Vec<ChatMessage>> {
    let raw = std::fs::read_to_string(path)?;
    let messages: Vec<ChatMessage> = serde_json::from_str(&raw)?;
    Ok(messages)
}

/// Load the template catalog from a YAML file.
pub fn load_templates(path: &PathBuf) -> AppResult<Vec<TemplateDescriptor>> {
    let raw = std::fs::read_to_string(path)?;
    let templates: Vec<TemplateDescriptor> = serde_yaml::from_str(&raw)?;
    Ok(templates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_history() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"role":"user","content":"hola"}},{{"role":"assistant","content":"Hola, ¿en qué ayudo?"}}]"#
        )
        .unwrap();

        let history = load_history(&file.path().to_path_buf()).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].content, "hola");
    }

    #[test]
    fn test_load_history_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(load_history(&file.path().to_path_buf()).is_err());
    }

    #[test]
    fn test_load_templates() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "- id: carta-renuncia\n  name: Carta de Renuncia\n  description: Carta formal\n  fields:\n    - name: nombre\n      label: Nombre completo\n      required: true\n"
        )
        .unwrap();

        let templates = load_templates(&file.path().to_path_buf()).unwrap();
        assert_eq!(templates.len(), 1);
        assert_eq!(templates[0].id, "carta-renuncia");
        assert!(templates[0].fields[0].required);
    }
}
