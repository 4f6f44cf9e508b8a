//! EmbSet Core Library
//!
//! Foundational pieces shared by the index crate and the CLI:
//! - Error handling (`AppError`, `AppResult`)
//! - Logging infrastructure
//! - Layered configuration

pub mod config;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use config::{AppConfig, EmbeddingSettings, IndexSettings};
pub use error::{AppError, AppResult};
