//! Embedding providers.
//!
//! The index treats embedding as a black box: a batch of inputs goes in,
//! one vector per input comes out. This module defines that boundary and
//! ships two text providers.

pub mod provider;
pub mod providers;

pub use provider::{create_provider, EmbeddingProvider};
pub use providers::{ollama::OllamaProvider, trigram::TrigramProvider};
