//! Capacity-limited backend.

use crate::backend::{BruteForceBackend, SimilarityBackend};
use crate::types::{SearchHit, Slot, Vector};
use embset_core::{AppError, AppResult};

/// Brute-force storage with a hard ceiling on live vectors.
///
/// Once `capacity` vectors are live, adds into empty slots are rejected with
/// [`AppError::BackendCapacity`]. Nothing is ever evicted; removing points
/// frees room. Overwriting an occupied slot is always allowed.
#[derive(Debug, Clone)]
pub struct BoundedBackend {
    inner: BruteForceBackend,
    capacity: usize,
}

impl BoundedBackend {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: BruteForceBackend::new(),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl SimilarityBackend for BoundedBackend {
    fn add(&mut self, vector: Vector, slot: Slot) -> AppResult<()> {
        if !self.inner.is_occupied(slot) && self.inner.len() >= self.capacity {
            tracing::warn!(slot, capacity = self.capacity, "rejecting add past capacity");
            return Err(AppError::BackendCapacity {
                capacity: self.capacity,
            });
        }
        self.inner.add(vector, slot)
    }

    fn remove_ids(&mut self, slots: &[Slot]) -> AppResult<()> {
        self.inner.remove_ids(slots)
    }

    fn search(&self, query: &[f32], top_k: usize) -> AppResult<Vec<SearchHit>> {
        self.inner.search(query, top_k)
    }

    fn resize(&mut self, hint: usize) {
        let target = hint.min(self.capacity);
        let allocated = self.inner.total();
        if target > allocated {
            self.inner.reserve(target - allocated);
        }
    }

    fn max_capacity(&self) -> Option<usize> {
        Some(self.capacity)
    }

    fn total(&self) -> usize {
        self.inner.total()
    }

    fn len(&self) -> usize {
        self.inner.len()
    }
}
