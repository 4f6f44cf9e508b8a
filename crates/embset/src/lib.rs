//! In-process vector similarity index.
//!
//! An [`EmbSet`] turns inputs into vectors through an [`EmbeddingProvider`],
//! stores them in a [`SimilarityBackend`] under stable identifiers, keeps
//! caller metadata alongside, and answers nearest-neighbor queries ranked by
//! cosine similarity.
//!
//! ```no_run
//! use embset::{BruteForceBackend, EmbSet, EmbeddingProvider, InputItem, TrigramProvider};
//! use std::sync::Arc;
//!
//! # async fn run() -> embset_core::AppResult<()> {
//! let provider: Arc<dyn EmbeddingProvider> = Arc::new(TrigramProvider::new(384));
//! let mut set: EmbSet<BruteForceBackend, String, String> =
//!     EmbSet::new(BruteForceBackend::new(), provider);
//!
//! set.adds(vec![
//!     InputItem::with_metadata("Beijing hosts a robot marathon".to_string(), "sports".to_string()),
//!     InputItem::with_metadata("Tariff talks stall again".to_string(), "economy".to_string()),
//! ])
//! .await?;
//!
//! for hit in set.search(&"marathon in Beijing".to_string(), 1).await? {
//!     println!("{} {:?} {:.3}", hit.id, hit.metadata, hit.score);
//! }
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod embeddings;
pub mod index;
pub mod observer;
pub mod similarity;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use backend::{BoundedBackend, BruteForceBackend, SimilarityBackend};
pub use embeddings::{create_provider, EmbeddingProvider, OllamaProvider, TrigramProvider};
pub use index::{EmbSet, EmbSetOptions, DEFAULT_MAX_SIZE, DEFAULT_TOP_K};
pub use observer::{IndexEvent, IndexObserver, TracingObserver};
pub use types::{InputItem, Point, PointId, SearchHit, SearchResult, Slot, Vector};
