//! Exact brute-force backend.

use crate::backend::SimilarityBackend;
use crate::similarity::cosine_similarity;
use crate::types::{SearchHit, Slot, Vector};
use embset_core::{AppError, AppResult};
use std::cmp::Ordering;

/// In-memory backend that scores every live vector on each query.
///
/// Vectors live in a slot-indexed table; removal leaves a tombstone so
/// slots are never compacted or reused by the backend itself. Growth is
/// unbounded and `resize` hints are ignored.
#[derive(Debug, Clone, Default)]
pub struct BruteForceBackend {
    slots: Vec<Option<Vector>>,
    live: usize,
    dimension: Option<usize>,
}

impl BruteForceBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Vector stored at `slot`, if it is live.
    pub fn get(&self, slot: Slot) -> Option<&Vector> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    pub fn is_occupied(&self, slot: Slot) -> bool {
        self.get(slot).is_some()
    }

    /// Dimensionality fixed by the first stored vector.
    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    /// Preallocate room for `additional` more slots.
    pub fn reserve(&mut self, additional: usize) {
        self.slots.reserve(additional);
    }

    fn check_dimension(&self, actual: usize) -> AppResult<()> {
        match self.dimension {
            Some(expected) if expected != actual => {
                Err(AppError::DimensionMismatch { expected, actual })
            }
            _ => Ok(()),
        }
    }
}

/// Descending score; equal scores keep slot order so ranking is deterministic.
fn rank(a: &(Slot, f32), b: &(Slot, f32)) -> Ordering {
    b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0))
}

impl SimilarityBackend for BruteForceBackend {
    fn add(&mut self, vector: Vector, slot: Slot) -> AppResult<()> {
        self.check_dimension(vector.len())?;

        if slot >= self.slots.len() {
            self.slots.resize(slot + 1, None);
        }

        if self.slots[slot].replace(vector).is_none() {
            self.live += 1;
        }

        if self.dimension.is_none() {
            self.dimension = self.slots[slot].as_ref().map(Vec::len);
        }

        Ok(())
    }

    fn remove_ids(&mut self, slots: &[Slot]) -> AppResult<()> {
        for &slot in slots {
            if let Some(entry) = self.slots.get_mut(slot) {
                if entry.take().is_some() {
                    self.live -= 1;
                }
            }
        }
        Ok(())
    }

    fn search(&self, query: &[f32], top_k: usize) -> AppResult<Vec<SearchHit>> {
        if top_k == 0 || self.live == 0 {
            return Ok(Vec::new());
        }
        self.check_dimension(query.len())?;

        let mut scored: Vec<(Slot, f32)> = self
            .slots
            .iter()
            .enumerate()
            .filter_map(|(slot, entry)| {
                entry
                    .as_ref()
                    .map(|vector| (slot, cosine_similarity(query, vector)))
            })
            .collect();

        // Partial selection keeps this O(n log k) rather than a full sort
        if scored.len() > top_k {
            scored.select_nth_unstable_by(top_k - 1, rank);
            scored.truncate(top_k);
        }
        scored.sort_by(rank);

        Ok(scored
            .into_iter()
            .filter_map(|(slot, score)| {
                self.get(slot).map(|vector| SearchHit {
                    slot,
                    vector: vector.clone(),
                    score,
                })
            })
            .collect())
    }

    fn resize(&mut self, _hint: usize) {}

    fn max_capacity(&self) -> Option<usize> {
        None
    }

    fn total(&self) -> usize {
        self.slots.len()
    }

    fn len(&self) -> usize {
        self.live
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend_with(vectors: &[Vec<f32>]) -> BruteForceBackend {
        let mut backend = BruteForceBackend::new();
        for (slot, vector) in vectors.iter().enumerate() {
            backend.add(vector.clone(), slot).unwrap();
        }
        backend
    }

    #[test]
    fn test_add_and_get() {
        let backend = backend_with(&[vec![1.0, 0.0]]);
        assert_eq!(backend.get(0), Some(&vec![1.0, 0.0]));
        assert_eq!(backend.len(), 1);
        assert_eq!(backend.total(), 1);
        assert_eq!(backend.dimension(), Some(2));
    }

    #[test]
    fn test_add_non_contiguous_slot() {
        let mut backend = BruteForceBackend::new();
        backend.add(vec![1.0, 0.0], 5).unwrap();

        assert_eq!(backend.total(), 6);
        assert_eq!(backend.len(), 1);
        assert!(!backend.is_occupied(2));
        assert!(backend.is_occupied(5));
    }

    #[test]
    fn test_add_overwrites_silently() {
        let mut backend = backend_with(&[vec![1.0, 0.0]]);
        backend.add(vec![0.0, 1.0], 0).unwrap();

        assert_eq!(backend.len(), 1);
        assert_eq!(backend.get(0), Some(&vec![0.0, 1.0]));
    }

    #[test]
    fn test_add_dimension_mismatch() {
        let mut backend = backend_with(&[vec![1.0, 0.0]]);
        let err = backend.add(vec![1.0, 0.0, 0.0], 1).unwrap_err();

        assert!(matches!(
            err,
            AppError::DimensionMismatch {
                expected: 2,
                actual: 3
            }
        ));
        assert_eq!(backend.total(), 1);
    }

    #[test]
    fn test_remove_tombstones_slot() {
        let mut backend = backend_with(&[vec![1.0, 0.0], vec![0.0, 1.0]]);
        backend.remove_ids(&[0]).unwrap();

        assert_eq!(backend.total(), 2);
        assert_eq!(backend.len(), 1);
        assert!(backend.get(0).is_none());

        let hits = backend.search(&[1.0, 0.0], 10).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].slot, 1);
    }

    #[test]
    fn test_remove_ignores_unknown_and_empty_slots() {
        let mut backend = backend_with(&[vec![1.0, 0.0]]);
        backend.remove_ids(&[0]).unwrap();
        backend.remove_ids(&[0, 99]).unwrap();

        assert_eq!(backend.len(), 0);
        assert_eq!(backend.total(), 1);
    }

    #[test]
    fn test_search_sorted_descending() {
        let backend = backend_with(&[vec![0.0, 1.0], vec![1.0, 0.0], vec![0.7, 0.3]]);
        let hits = backend.search(&[1.0, 0.0], 3).unwrap();

        let slots: Vec<Slot> = hits.iter().map(|h| h.slot).collect();
        assert_eq!(slots, vec![1, 2, 0]);
        assert!(hits[0].score >= hits[1].score);
        assert!(hits[1].score >= hits[2].score);
    }

    #[test]
    fn test_search_truncates_to_top_k() {
        let vectors: Vec<Vec<f32>> = (0..20).map(|i| vec![1.0, i as f32 / 10.0]).collect();
        let backend = backend_with(&vectors);

        let hits = backend.search(&[1.0, 0.0], 3).unwrap();
        let slots: Vec<Slot> = hits.iter().map(|h| h.slot).collect();
        assert_eq!(slots, vec![0, 1, 2]);
    }

    #[test]
    fn test_search_ties_follow_slot_order() {
        let backend = backend_with(&[vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 0.0]]);
        let hits = backend.search(&[1.0, 0.0], 2).unwrap();

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].slot, 0);
        assert_eq!(hits[1].slot, 2);
        assert!((hits[0].score - 1.0).abs() < 1e-6);
        assert!((hits[1].score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_search_returns_stored_vector() {
        let backend = backend_with(&[vec![0.25, -0.5, 2.0]]);
        let hits = backend.search(&[0.25, -0.5, 2.0], 1).unwrap();
        assert_eq!(hits[0].vector, vec![0.25, -0.5, 2.0]);
    }

    #[test]
    fn test_search_empty_and_zero_k() {
        let empty = BruteForceBackend::new();
        assert!(empty.search(&[1.0, 0.0], 10).unwrap().is_empty());

        let backend = backend_with(&[vec![1.0, 0.0]]);
        assert!(backend.search(&[1.0, 0.0], 0).unwrap().is_empty());
    }

    #[test]
    fn test_search_dimension_mismatch() {
        let backend = backend_with(&[vec![1.0, 0.0]]);
        let result = backend.search(&[1.0, 0.0, 0.0], 1);
        assert!(matches!(result, Err(AppError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_unbounded_capacity() {
        let mut backend = BruteForceBackend::new();
        backend.resize(4);
        assert_eq!(backend.max_capacity(), None);
        assert!(backend.is_empty());
    }
}
