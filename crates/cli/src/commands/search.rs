//! Search command handler.
//!
//! Builds a throwaway index from text lines and ranks them against a query.

use clap::Args;
use embset::{create_provider, BruteForceBackend, EmbSet, EmbSetOptions, InputItem, SearchResult};
use embset_core::{AppConfig, AppError, AppResult};
use std::path::PathBuf;

/// Index some text and query it
#[derive(Args, Debug)]
pub struct SearchCommand {
    /// Query text
    pub query: String,

    /// File whose non-empty lines are indexed
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Text to index (repeatable)
    #[arg(short, long)]
    pub text: Vec<String>,

    /// Number of results (defaults to index.topK)
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl SearchCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing search command");

        let lines = self.collect_lines()?;
        if lines.is_empty() {
            return Err(AppError::Config(
                "Nothing to index: pass --file and/or --text".to_string(),
            ));
        }

        let provider = create_provider(&config.embedding)?;
        tracing::debug!(
            "Using provider '{}' (model: {}, dimensions: {})",
            provider.provider_name(),
            provider.model_name(),
            provider.dimensions()
        );

        let mut set: EmbSet<BruteForceBackend, String, String> = EmbSet::with_options(
            BruteForceBackend::new(),
            provider,
            EmbSetOptions::from(&config.index),
        );

        let items = lines
            .into_iter()
            .map(|line| InputItem::with_metadata(line.clone(), line))
            .collect();
        let points = set.adds(items).await?;
        tracing::info!("Indexed {} lines", points.len());

        let top_k = self.top_k.unwrap_or(set.default_top_k());
        let results = set.search(&self.query, top_k).await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&to_json(&results))?);
        } else if results.is_empty() {
            println!("No results");
        } else {
            for (rank, result) in results.iter().enumerate() {
                println!(
                    "{:>3}. [{:.4}] {}",
                    rank + 1,
                    result.score,
                    result.metadata.as_deref().unwrap_or("")
                );
            }
        }

        Ok(())
    }

    fn collect_lines(&self) -> AppResult<Vec<String>> {
        let mut lines = Vec::new();

        if let Some(path) = &self.file {
            let contents = std::fs::read_to_string(path)?;
            lines.extend(
                contents
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(str::to_string),
            );
        }

        lines.extend(self.text.iter().cloned());
        Ok(lines)
    }
}

fn to_json(results: &[SearchResult<String>]) -> serde_json::Value {
    serde_json::Value::Array(
        results
            .iter()
            .map(|r| {
                serde_json::json!({
                    "id": r.id,
                    "text": r.metadata,
                    "score": r.score,
                })
            })
            .collect(),
    )
}
