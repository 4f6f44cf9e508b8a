//! Command handlers for the embset CLI.

pub mod config;
pub mod search;

// Re-export command types for convenience
pub use config::ConfigCommand;
pub use search::SearchCommand;
