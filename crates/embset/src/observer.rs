//! Observability hook for index mutations and queries.

use crate::types::{PointId, Slot};

/// Something that happened inside an [`EmbSet`](crate::EmbSet).
#[derive(Debug, Clone, PartialEq)]
pub enum IndexEvent {
    Added { id: PointId, slot: Slot },
    Resized { max_size: usize },
    Removed { ids: Vec<PointId> },
    Searched { hits: usize, returned: usize },
}

/// Receives index events.
///
/// Observers see events after the corresponding state change has been
/// committed and cannot influence the operation.
pub trait IndexObserver: Send + Sync {
    fn on_event(&self, event: &IndexEvent);
}

/// Observer that forwards every event to `tracing` at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl IndexObserver for TracingObserver {
    fn on_event(&self, event: &IndexEvent) {
        match event {
            IndexEvent::Added { id, slot } => {
                tracing::debug!(target: "embset::events", %id, slot, "point added")
            }
            IndexEvent::Resized { max_size } => {
                tracing::debug!(target: "embset::events", max_size, "index resized")
            }
            IndexEvent::Removed { ids } => {
                tracing::debug!(target: "embset::events", count = ids.len(), "points removed")
            }
            IndexEvent::Searched { hits, returned } => {
                tracing::debug!(target: "embset::events", hits, returned, "search completed")
            }
        }
    }
}
