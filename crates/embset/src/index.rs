//! The embedding set: identifiers, metadata and auto-growth on top of a
//! similarity backend and an embedding provider.

use crate::backend::{BruteForceBackend, SimilarityBackend};
use crate::embeddings::EmbeddingProvider;
use crate::observer::{IndexEvent, IndexObserver};
use crate::types::{InputItem, Point, PointId, SearchResult, Slot, Vector};
use embset_core::{AppError, AppResult, IndexSettings};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Live point count that first triggers auto-growth.
pub const DEFAULT_MAX_SIZE: usize = 256;

/// Neighbor count used by [`EmbSet::search_default`].
pub const DEFAULT_TOP_K: usize = 10;

/// Tunables for an [`EmbSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbSetOptions {
    /// Growth threshold. Reaching it doubles the value and forwards the new
    /// size to the backend as a hint. It never rejects inserts. Values below
    /// 1 are raised to 1.
    pub max_size: usize,
    pub top_k: usize,
}

impl Default for EmbSetOptions {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_SIZE,
            top_k: DEFAULT_TOP_K,
        }
    }
}

impl From<&IndexSettings> for EmbSetOptions {
    fn from(settings: &IndexSettings) -> Self {
        Self {
            max_size: settings.max_size,
            top_k: settings.top_k,
        }
    }
}

/// An in-process vector index with caller metadata.
///
/// `EmbSet` hands out identifiers from a counter that only moves forward,
/// keeps one [`Point`] per live vector, and joins backend hits back to those
/// points on search. Only embedding calls are asynchronous; everything else
/// runs synchronously against the backend.
///
/// Mutating methods take `&mut self`, so there is a single writer at a
/// time. Share an index across tasks behind a lock.
pub struct EmbSet<B = BruteForceBackend, I = String, M = serde_json::Value>
where
    I: Send + Sync,
{
    /// Keyed by slot, which follows insertion order.
    points: BTreeMap<Slot, Point<M>>,
    slots: HashMap<PointId, Slot>,
    backend: B,
    provider: Arc<dyn EmbeddingProvider<I>>,
    options: EmbSetOptions,
    cursor: u64,
    observer: Option<Arc<dyn IndexObserver>>,
}

impl<B, I, M> EmbSet<B, I, M>
where
    B: SimilarityBackend,
    I: Send + Sync,
    M: Clone,
{
    /// Create an index with default options.
    pub fn new(backend: B, provider: Arc<dyn EmbeddingProvider<I>>) -> Self {
        Self::with_options(backend, provider, EmbSetOptions::default())
    }

    pub fn with_options(
        backend: B,
        provider: Arc<dyn EmbeddingProvider<I>>,
        mut options: EmbSetOptions,
    ) -> Self {
        options.max_size = options.max_size.max(1);
        Self {
            points: BTreeMap::new(),
            slots: HashMap::new(),
            backend,
            provider,
            options,
            cursor: 0,
            observer: None,
        }
    }

    /// Attach an observer that receives an [`IndexEvent`] per state change.
    pub fn with_observer(mut self, observer: Arc<dyn IndexObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Store a precomputed vector and return the new point.
    ///
    /// The backend is written first; if it rejects the vector nothing is
    /// recorded and no identifier is consumed. Once the live point count
    /// reaches `max_size`, the threshold doubles and the backend is resized.
    pub fn add_emb(&mut self, vector: Vector, metadata: Option<M>) -> AppResult<Point<M>> {
        let slot = Slot::try_from(self.cursor)
            .map_err(|_| AppError::Other("Slot space exhausted".to_string()))?;

        self.backend.add(vector.clone(), slot)?;

        let id = PointId::from_counter(self.cursor);
        self.cursor += 1;

        let point = Point {
            id: id.clone(),
            slot,
            vector,
            metadata,
        };
        self.slots.insert(id.clone(), slot);
        self.points.insert(slot, point.clone());

        tracing::debug!(%id, slot, live = self.points.len(), "added point");
        self.emit(IndexEvent::Added { id, slot });

        if self.points.len() >= self.options.max_size {
            self.resize(self.options.max_size.saturating_mul(2));
        }

        Ok(point)
    }

    /// Embed one input and store it.
    pub async fn add(&mut self, input: &I, metadata: Option<M>) -> AppResult<Point<M>> {
        let mut vectors = self.embed_checked(std::slice::from_ref(input)).await?;
        let vector = vectors
            .pop()
            .ok_or_else(|| AppError::Provider("No embedding returned".to_string()))?;
        self.add_emb(vector, metadata)
    }

    /// Embed all inputs with a single provider call, then store them in order.
    ///
    /// Identifiers are assigned in input order. A provider failure commits
    /// nothing. A backend failure stops at the failing item; the items before
    /// it stay stored.
    pub async fn adds(&mut self, items: Vec<InputItem<I, M>>) -> AppResult<Vec<Point<M>>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let (values, metadata): (Vec<I>, Vec<Option<M>>) = items
            .into_iter()
            .map(|item| (item.value, item.metadata))
            .unzip();

        let vectors = self.embed_checked(&values).await?;

        let mut points = Vec::with_capacity(vectors.len());
        for (vector, metadata) in vectors.into_iter().zip(metadata) {
            points.push(self.add_emb(vector, metadata)?);
        }
        Ok(points)
    }

    /// Embed a query and return its `top_k` nearest points.
    pub async fn search(&self, query: &I, top_k: usize) -> AppResult<Vec<SearchResult<M>>> {
        let mut vectors = self.embed_checked(std::slice::from_ref(query)).await?;
        let vector = vectors
            .pop()
            .ok_or_else(|| AppError::Provider("No embedding returned".to_string()))?;
        self.search_embed(&vector, top_k)
    }

    /// [`search`](Self::search) with the configured default `top_k`.
    pub async fn search_default(&self, query: &I) -> AppResult<Vec<SearchResult<M>>> {
        self.search(query, self.options.top_k).await
    }

    /// Return the `top_k` nearest points to a precomputed vector.
    ///
    /// Backend hits whose slot has no live point are stale and get filtered
    /// out here, so the result can be shorter than `top_k`.
    pub fn search_embed(&self, vector: &[f32], top_k: usize) -> AppResult<Vec<SearchResult<M>>> {
        let hits = self.backend.search(vector, top_k)?;
        let hit_count = hits.len();

        let results: Vec<SearchResult<M>> = hits
            .into_iter()
            .filter_map(|hit| {
                let point = self.points.get(&hit.slot)?;
                Some(SearchResult {
                    id: point.id.clone(),
                    metadata: point.metadata.clone(),
                    vector: hit.vector,
                    score: hit.score,
                })
            })
            .collect();

        if results.len() < hit_count {
            tracing::debug!(
                stale = hit_count - results.len(),
                "dropped backend hits without a live point"
            );
        }

        self.emit(IndexEvent::Searched {
            hits: hit_count,
            returned: results.len(),
        });
        Ok(results)
    }

    /// Remove points by identifier.
    ///
    /// The backend is updated first with one call covering every slot. If it
    /// fails, no point is forgotten. Unknown identifiers are ignored; when
    /// none of the identifiers are known the backend is not called at all.
    pub fn remove_ids(&mut self, ids: &[PointId]) -> AppResult<()> {
        let targets: Vec<(PointId, Slot)> = ids
            .iter()
            .filter_map(|id| self.slots.get(id).map(|&slot| (id.clone(), slot)))
            .collect();

        if targets.is_empty() {
            return Ok(());
        }

        let slots: Vec<Slot> = targets.iter().map(|(_, slot)| *slot).collect();
        self.backend.remove_ids(&slots)?;

        let mut removed = Vec::with_capacity(targets.len());
        for (id, slot) in targets {
            if self.slots.remove(&id).is_some() {
                self.points.remove(&slot);
                removed.push(id);
            }
        }

        tracing::debug!(count = removed.len(), live = self.points.len(), "removed points");
        self.emit(IndexEvent::Removed { ids: removed });
        Ok(())
    }

    /// Set the growth threshold and pass it to the backend as a hint.
    ///
    /// The threshold is at least 1.
    pub fn resize(&mut self, max_size: usize) {
        let max_size = max_size.max(1);
        tracing::info!(from = self.options.max_size, to = max_size, "resizing index");
        self.options.max_size = max_size;
        self.backend.resize(max_size);
        self.emit(IndexEvent::Resized { max_size });
    }

    pub fn get(&self, id: &PointId) -> Option<&Point<M>> {
        self.slots.get(id).and_then(|slot| self.points.get(slot))
    }

    pub fn contains(&self, id: &PointId) -> bool {
        self.slots.contains_key(id)
    }

    /// All live points matching `predicate`, in insertion order.
    pub fn find<F>(&self, predicate: F) -> Vec<&Point<M>>
    where
        F: Fn(&Point<M>) -> bool,
    {
        self.points.values().filter(|point| predicate(point)).collect()
    }

    /// Live points in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Point<M>> {
        self.points.values()
    }

    /// Number of live points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn max_size(&self) -> usize {
        self.options.max_size
    }

    pub fn default_top_k(&self) -> usize {
        self.options.top_k
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn provider(&self) -> &Arc<dyn EmbeddingProvider<I>> {
        &self.provider
    }

    async fn embed_checked(&self, inputs: &[I]) -> AppResult<Vec<Vector>> {
        let vectors = self.provider.embed_batch(inputs).await?;
        if vectors.len() != inputs.len() {
            return Err(AppError::Provider(format!(
                "Provider '{}' returned {} embeddings for {} inputs",
                self.provider.provider_name(),
                vectors.len(),
                inputs.len()
            )));
        }
        Ok(vectors)
    }

    fn emit(&self, event: IndexEvent) {
        if let Some(observer) = &self.observer {
            observer.on_event(&event);
        }
    }
}
