//! Lexrag CLI
//!
//! Main entry point for the lexrag command-line tool.
//! Answers Peruvian legal questions with retrieval-augmented generation.

mod commands;

use clap::{Parser, Subcommand};
use commands::{AskCommand, ExtractCommand, TitleCommand};
use lexrag_core::{logging, AppResult, Settings};

/// Lexrag CLI - legal question answering with retrieval-augmented generation
#[derive(Parser, Debug)]
#[command(name = "lexrag")]
#[command(about = "Legal question answering for Peruvian law", long_about = None)]
#[command(version)]
struct Cli {
    /// LLM provider (groq, gemini, together, openai, ollama)
    #[arg(short, long, global = true, env = "LEXRAG_PROVIDER")]
    provider: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ask a legal question
    Ask(AskCommand),

    /// Extract document template fields from a transcript
    Extract(ExtractCommand),

    /// Generate a short conversation title
    Title(TitleCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    // Load base configuration from environment, then apply CLI overrides
    let settings = Settings::load()?.with_overrides(
        cli.provider,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    logging::init_logging(settings.log_level.as_deref(), settings.no_color)?;

    tracing::info!("Lexrag CLI starting");
    tracing::debug!("Provider override: {:?}", settings.provider);
    tracing::debug!("Vector index configured: {}", settings.has_vector_index());

    let command_name = match &cli.command {
        Commands::Ask(_) => "ask",
        Commands::Extract(_) => "extract",
        Commands::Title(_) => "title",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    let result = match cli.command {
        Commands::Ask(cmd) => cmd.execute(&settings).await,
        Commands::Extract(cmd) => cmd.execute(&settings).await,
        Commands::Title(cmd) => cmd.execute(&settings).await,
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
