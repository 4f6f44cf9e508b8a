//! Config command handler.

use clap::Args;
use embset_core::{AppConfig, AppResult};

/// Show the resolved configuration
#[derive(Args, Debug)]
pub struct ConfigCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl ConfigCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing config command");

        if self.json {
            println!("{}", serde_json::to_string_pretty(config)?);
        } else {
            println!("Index:");
            println!("  Max size: {}", config.index.max_size);
            println!("  Top k: {}", config.index.top_k);
            println!("Embedding:");
            println!("  Provider: {}", config.embedding.provider);
            println!("  Model: {}", config.embedding.model);
            println!("  Dimensions: {}", config.embedding.dimensions);
            if let Some(endpoint) = &config.embedding.endpoint {
                println!("  Endpoint: {}", endpoint);
            }
            if let Some(path) = &config.config_file {
                println!("Config file: {}", path.display());
            }
        }

        Ok(())
    }
}
