//! ragchat CLI
//!
//! Main entry point for the ragchat command-line tool.
//! Answers questions from a hosted knowledge base behind a content policy gate.

mod commands;
mod render;
mod runtime;

use clap::{Parser, Subcommand};
use commands::{
    AskCommand, ChatCommand, ClassifyCommand, ModelsCommand, PromptsCommand, RetrieveCommand,
};
use ragchat_core::{config::AppConfig, logging, AppResult, ConfigOverrides};
use std::path::PathBuf;

/// ragchat - knowledge base chat with a content policy gate
#[derive(Parser, Debug)]
#[command(name = "ragchat")]
#[command(about = "Knowledge base chat with a content policy gate", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to workspace directory (default: current directory)
    #[arg(short, long, global = true, env = "RAGCHAT_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true, env = "RAGCHAT_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    /// Model identifier
    #[arg(short, long, global = true, env = "RAGCHAT_MODEL")]
    model: Option<String>,

    /// Knowledge base identifier
    #[arg(short, long, global = true, env = "RAGCHAT_KNOWLEDGE_BASE_ID")]
    knowledge_base: Option<String>,

    /// Sampling temperature for answers (0.0-1.0)
    #[arg(short, long, global = true, env = "RAGCHAT_TEMPERATURE")]
    temperature: Option<f32>,

    /// Nucleus sampling for answers (0.0-1.0)
    #[arg(long, global = true, env = "RAGCHAT_TOP_P")]
    top_p: Option<f32>,

    /// AWS region hosting the model and knowledge base
    #[arg(long, global = true, env = "RAGCHAT_REGION")]
    region: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start an interactive chat session
    Chat(ChatCommand),

    /// Ask a single question
    Ask(AskCommand),

    /// Run only the content policy gate on a prompt
    Classify(ClassifyCommand),

    /// Run only knowledge base retrieval for a query
    Retrieve(RetrieveCommand),

    /// List known model identifiers
    Models(ModelsCommand),

    /// List available prompt definitions
    Prompts(PromptsCommand),
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            workspace: self.workspace.clone(),
            config_file: self.config.clone(),
            model: self.model.clone(),
            knowledge_base_id: self.knowledge_base.clone(),
            temperature: self.temperature,
            top_p: self.top_p,
            region: self.region.clone(),
            log_level: self.log_level.clone(),
            verbose: self.verbose,
            no_color: self.no_color,
        }
    }
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    // Load base configuration, then apply CLI overrides
    let config = AppConfig::load_from(cli.workspace.clone(), cli.config.clone())?
        .with_overrides(cli.overrides());

    // Initialize logging with final configuration
    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::debug!("Workspace: {:?}", config.workspace);
    tracing::debug!("Model: {}", config.model);
    tracing::debug!("Region: {}", config.service.region);

    config.validate()?;

    let command_name = match &cli.command {
        Commands::Chat(_) => "chat",
        Commands::Ask(_) => "ask",
        Commands::Classify(_) => "classify",
        Commands::Retrieve(_) => "retrieve",
        Commands::Models(_) => "models",
        Commands::Prompts(_) => "prompts",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    // Route to command handlers
    let result = match cli.command {
        Commands::Chat(cmd) => cmd.execute(&config).await,
        Commands::Ask(cmd) => cmd.execute(&config).await,
        Commands::Classify(cmd) => cmd.execute(&config).await,
        Commands::Retrieve(cmd) => cmd.execute(&config).await,
        Commands::Models(cmd) => cmd.execute(&config),
        Commands::Prompts(cmd) => cmd.execute(&config),
    };

    match &result {
        Ok(_) => tracing::debug!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
