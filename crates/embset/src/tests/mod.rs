//! Contract tests for the index and its collaborators.


use crate::backend::{BruteForceBackend, SimilarityBackend};
use crate::embeddings::EmbeddingProvider;
use crate::index::{EmbSet, EmbSetOptions};
use crate::observer::{IndexEvent, IndexObserver};
use crate::types::{SearchHit, Slot, Vector};
use embset_core::{AppError, AppResult};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Provider whose inputs already are vectors. Counts batch calls.
#[derive(Debug, Default)]
pub(crate) struct IdentityProvider {
    pub calls: AtomicUsize,
    pub fail: bool,
    pub drop_last: bool,
}

impl IdentityProvider {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn short_batches() -> Self {
        Self {
            drop_last: true,
            ..Default::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider<Vector> for IdentityProvider {
    fn provider_name(&self) -> &str {
        "identity"
    }

    fn model_name(&self) -> &str {
        "identity"
    }

    fn dimensions(&self) -> usize {
        0
    }

    async fn embed_batch(&self, inputs: &[Vector]) -> AppResult<Vec<Vector>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(AppError::Provider("model unavailable".to_string()));
        }
        let mut out = inputs.to_vec();
        if self.drop_last {
            out.pop();
        }
        Ok(out)
    }
}

/// Brute-force backend that records resize hints and can misbehave on removal.
#[derive(Debug, Default)]
pub(crate) struct RecordingBackend {
    pub inner: BruteForceBackend,
    pub resizes: Vec<usize>,
    pub remove_calls: usize,
    pub fail_remove: bool,
    pub ignore_remove: bool,
}

impl SimilarityBackend for RecordingBackend {
    fn add(&mut self, vector: Vector, slot: Slot) -> AppResult<()> {
        self.inner.add(vector, slot)
    }

    fn remove_ids(&mut self, slots: &[Slot]) -> AppResult<()> {
        self.remove_calls += 1;
        if self.fail_remove {
            return Err(AppError::Other("backend unavailable".to_string()));
        }
        if self.ignore_remove {
            return Ok(());
        }
        self.inner.remove_ids(slots)
    }

    fn search(&self, query: &[f32], top_k: usize) -> AppResult<Vec<SearchHit>> {
        self.inner.search(query, top_k)
    }

    fn resize(&mut self, hint: usize) {
        self.resizes.push(hint);
    }

    fn max_capacity(&self) -> Option<usize> {
        None
    }

    fn total(&self) -> usize {
        self.inner.total()
    }

    fn len(&self) -> usize {
        self.inner.len()
    }
}

/// Observer that keeps every event it sees.
#[derive(Default)]
pub(crate) struct CollectingObserver {
    pub events: Mutex<Vec<IndexEvent>>,
}

impl IndexObserver for CollectingObserver {
    fn on_event(&self, event: &IndexEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

pub(crate) type VectorSet<B = BruteForceBackend> = EmbSet<B, Vector, String>;

pub(crate) fn vector_set() -> (VectorSet, Arc<IdentityProvider>) {
    let provider = Arc::new(IdentityProvider::default());
    let shared: Arc<dyn EmbeddingProvider<Vector>> = provider.clone();
    (EmbSet::new(BruteForceBackend::new(), shared), provider)
}

pub(crate) fn recording_set(max_size: usize) -> VectorSet<RecordingBackend> {
    let provider: Arc<dyn EmbeddingProvider<Vector>> = Arc::new(IdentityProvider::default());
    EmbSet::with_options(
        RecordingBackend::default(),
        provider,
        EmbSetOptions {
            max_size,
            ..Default::default()
        },
    )
}
