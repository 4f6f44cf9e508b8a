//! EmbSet CLI
//!
//! Demo front end for the embset index: index some text, query it, and
//! inspect the resolved configuration.

mod commands;

use clap::{Parser, Subcommand};
use commands::{ConfigCommand, SearchCommand};
use embset_core::{config::AppConfig, logging, AppResult};
use std::path::PathBuf;

/// EmbSet CLI - in-process vector similarity search
#[derive(Parser, Debug)]
#[command(name = "embset")]
#[command(about = "In-process vector similarity search", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, env = "EMBSET_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Embedding provider (trigram, ollama)
    #[arg(short, long, global = true, env = "EMBSET_PROVIDER")]
    provider: Option<String>,

    /// Embedding model identifier
    #[arg(short, long, global = true, env = "EMBSET_MODEL")]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Index text and rank it against a query
    Search(SearchCommand),

    /// Show the resolved configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_with(cli.config)?.with_overrides(
        cli.provider,
        cli.model,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    logging::init_logging(config.log_level.as_deref(), config.no_color)?;
    config.validate()?;

    tracing::debug!("Embedding provider: {}", config.embedding.provider);
    tracing::debug!("Max size: {}", config.index.max_size);

    let command_name = match &cli.command {
        Commands::Search(_) => "search",
        Commands::Config(_) => "config",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    let result = match cli.command {
        Commands::Search(cmd) => cmd.execute(&config).await,
        Commands::Config(cmd) => cmd.execute(&config).await,
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
