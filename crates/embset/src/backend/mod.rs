//! Similarity backend abstraction.
//!
//! A backend owns raw vector storage and scoring. The index addresses it
//! purely by slot; identifiers and metadata never cross this boundary.

pub mod bounded;
pub mod brute_force;

pub use bounded::BoundedBackend;
pub use brute_force::BruteForceBackend;

use crate::types::{SearchHit, Slot, Vector};
use embset_core::AppResult;

/// Trait for similarity backends.
///
/// Implementations must support:
/// - Storing a vector at a caller-chosen slot (gaps allowed, overwrite silently)
/// - Tombstoning slots, ignoring ones that are out of range or already empty
/// - Ranking live vectors against a query (top-k, descending score)
/// - Reporting the slot high-water mark and live count
pub trait SimilarityBackend: Send + Sync {
    /// Store `vector` at `slot`, replacing whatever the slot held.
    fn add(&mut self, vector: Vector, slot: Slot) -> AppResult<()>;

    /// Tombstone every listed slot.
    fn remove_ids(&mut self, slots: &[Slot]) -> AppResult<()>;

    /// Return the `top_k` live vectors most similar to `query`.
    ///
    /// Results are ordered by descending score. Fewer than `top_k` hits are
    /// returned when fewer live vectors exist.
    fn search(&self, query: &[f32], top_k: usize) -> AppResult<Vec<SearchHit>>;

    /// Advisory capacity hint.
    fn resize(&mut self, hint: usize);

    /// Declared capacity ceiling, `None` when unbounded.
    fn max_capacity(&self) -> Option<usize>;

    /// Number of slots ever allocated, tombstones included.
    fn total(&self) -> usize;

    /// Number of live vectors.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
