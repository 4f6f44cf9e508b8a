//! Core data types for the index.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A dense embedding vector.
///
/// Dimensionality is not part of the type; every vector stored in one index
/// must have the same length.
pub type Vector = Vec<f32>;

/// Backend-internal storage position of a vector.
pub type Slot = usize;

/// Opaque, stable identifier of a point.
///
/// Identifiers are handed out by the index from a monotonically increasing
/// counter and are never reused, even after the point is removed. They order
/// by length, then text, which matches counter order for every id the index
/// generates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointId(String);

impl PointId {
    pub(crate) fn from_counter(counter: u64) -> Self {
        Self(counter.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Ord for PointId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for PointId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PointId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for PointId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for PointId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A vector tracked by the index together with its caller metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point<M> {
    pub id: PointId,
    /// Backend address the vector was stored under.
    pub slot: Slot,
    pub vector: Vector,
    pub metadata: Option<M>,
}

/// A raw neighbor produced by a backend.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub slot: Slot,
    pub vector: Vector,
    pub score: f32,
}

/// A neighbor joined with the point it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult<M> {
    pub id: PointId,
    pub metadata: Option<M>,
    pub vector: Vector,
    /// Cosine similarity to the query; higher is closer.
    pub score: f32,
}

/// One input of a batched add.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputItem<I, M> {
    pub value: I,
    #[serde(default)]
    pub metadata: Option<M>,
}

impl<I, M> InputItem<I, M> {
    pub fn new(value: I) -> Self {
        Self {
            value,
            metadata: None,
        }
    }

    pub fn with_metadata(value: I, metadata: M) -> Self {
        Self {
            value,
            metadata: Some(metadata),
        }
    }
}
