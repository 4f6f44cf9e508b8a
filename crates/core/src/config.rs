//! Configuration management for EmbSet.
//!
//! Configuration is layered, later sources winning:
//! - Built-in defaults
//! - A YAML config file (`EMBSET_CONFIG`, or `embset.yaml` in the working directory)
//! - Environment variables
//! - Command-line flags (`with_overrides`)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "embset.yaml";

/// Embedding providers known to the provider factory.
pub const KNOWN_PROVIDERS: [&str; 2] = ["trigram", "ollama"];

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,

    /// Index growth and query defaults
    pub index: IndexSettings,

    /// Embedding provider selection
    pub embedding: EmbeddingSettings,
}

/// Index settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexSettings {
    /// Live point count at which the index doubles its size hint
    #[serde(default = "default_max_size")]
    pub max_size: usize,

    /// Number of neighbors returned when a caller does not ask for a count
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

/// Embedding provider settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddingSettings {
    /// Provider name: "trigram" or "ollama"
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Model identifier (provider-specific)
    #[serde(default = "default_model")]
    pub model: String,

    /// Embedding vector dimensions
    #[serde(default = "default_dimensions")]
    pub dimensions: usize,

    /// Base URL for HTTP providers
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Attempts per request for HTTP providers
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Per-request timeout for HTTP providers
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Whether provider embeddings are scaled to unit length
    #[serde(default = "default_normalize")]
    pub normalize: bool,
}

fn default_max_size() -> usize {
    256
}

fn default_top_k() -> usize {
    10
}

fn default_provider() -> String {
    "trigram".to_string()
}

fn default_model() -> String {
    "trigram-v1".to_string()
}

fn default_dimensions() -> usize {
    384
}

fn default_max_retries() -> u32 {
    3
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_normalize() -> bool {
    true
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            max_size: default_max_size(),
            top_k: default_top_k(),
        }
    }
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            dimensions: default_dimensions(),
            endpoint: None,
            max_retries: default_max_retries(),
            timeout_secs: default_timeout_secs(),
            normalize: default_normalize(),
        }
    }
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    index: Option<IndexSettings>,
    embedding: Option<EmbeddingSettings>,
    logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingConfig {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_file: None,
            log_level: None,
            verbose: false,
            no_color: false,
            index: IndexSettings::default(),
            embedding: EmbeddingSettings::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, the config file and the environment.
    ///
    /// Environment variables:
    /// - `EMBSET_CONFIG`: Path to config file
    /// - `EMBSET_MAX_SIZE`: Auto-growth threshold
    /// - `EMBSET_TOP_K`: Default neighbor count
    /// - `EMBSET_PROVIDER`: Embedding provider
    /// - `EMBSET_MODEL`: Embedding model
    /// - `EMBSET_DIMENSIONS`: Embedding dimensions
    /// - `EMBSET_ENDPOINT`: Provider base URL
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    pub fn load() -> AppResult<Self> {
        Self::load_with(std::env::var("EMBSET_CONFIG").ok().map(PathBuf::from))
    }

    /// Like [`AppConfig::load`], with the config file chosen by the caller.
    ///
    /// An explicit file must exist; without one, `embset.yaml` is used only
    /// when present.
    pub fn load_with(config_file: Option<PathBuf>) -> AppResult<Self> {
        let mut config = Self {
            config_file,
            ..Self::default()
        };

        let config_path = config
            .config_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        } else if config.config_file.is_some() {
            return Err(AppError::Config(format!(
                "Config file does not exist: {:?}",
                config_path
            )));
        }

        config.apply_env()?;
        Ok(config)
    }

    /// Merge a YAML configuration file into this config.
    pub fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(index) = config_file.index {
            result.index = index;
        }

        if let Some(embedding) = config_file.embedding {
            result.embedding = embedding;
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        tracing::debug!("Merged config file {:?}", path);
        Ok(result)
    }

    /// Apply environment variable overrides.
    fn apply_env(&mut self) -> AppResult<()> {
        if let Some(max_size) = env_parse::<usize>("EMBSET_MAX_SIZE")? {
            self.index.max_size = max_size;
        }

        if let Some(top_k) = env_parse::<usize>("EMBSET_TOP_K")? {
            self.index.top_k = top_k;
        }

        if let Ok(provider) = std::env::var("EMBSET_PROVIDER") {
            self.embedding.provider = provider;
        }

        if let Ok(model) = std::env::var("EMBSET_MODEL") {
            self.embedding.model = model;
        }

        if let Some(dimensions) = env_parse::<usize>("EMBSET_DIMENSIONS")? {
            self.embedding.dimensions = dimensions;
        }

        if let Ok(endpoint) = std::env::var("EMBSET_ENDPOINT") {
            self.embedding.endpoint = Some(endpoint);
        }

        if let Ok(level) = std::env::var("RUST_LOG") {
            self.log_level = Some(level);
        }

        if std::env::var("NO_COLOR").is_ok() {
            self.no_color = true;
        }

        Ok(())
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// CLI flags take precedence over environment variables and the file.
    pub fn with_overrides(
        mut self,
        provider: Option<String>,
        model: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(provider) = provider {
            self.embedding.provider = provider;
        }

        if let Some(model) = model {
            self.embedding.model = model;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Validate the resolved configuration.
    pub fn validate(&self) -> AppResult<()> {
        if self.index.max_size == 0 {
            return Err(AppError::Config("index.maxSize must be at least 1".to_string()));
        }

        if self.embedding.dimensions == 0 {
            return Err(AppError::Config(
                "embedding.dimensions must be at least 1".to_string(),
            ));
        }

        let provider = self.embedding.provider.as_str();
        if !KNOWN_PROVIDERS.contains(&provider) {
            return Err(AppError::Config(format!(
                "Unknown embedding provider: {}. Supported: {}",
                provider,
                KNOWN_PROVIDERS.join(", ")
            )));
        }

        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> AppResult<Option<T>> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| AppError::Config(format!("Invalid value for {}: {:?}", key, raw))),
        Err(_) => Ok(None),
    }
}
