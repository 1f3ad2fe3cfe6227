//! An in-memory [`SnapshotStore`] implementation for tests.
//!
//! Grounded on the same `Arc<RwLock<HashMap<...>>>` idiom as
//! [`crate::in_memory_event_store::InMemoryEventStore`]; snapshots and
//! events are deliberately unsynchronized stores (`SPEC_FULL.md` §5), so
//! this type carries no reference to an event store at all.

use event_store_core::error::StoreError;
use event_store_core::ids::StreamId;
use event_store_core::snapshot_store::{Snapshot, SnapshotStore};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Fast, deterministic, in-memory [`SnapshotStore`] for tests and local
/// development. Not durable: all data is lost when the store is dropped.
#[derive(Clone)]
pub struct InMemorySnapshotStore {
    snapshots: Arc<RwLock<HashMap<String, Snapshot>>>,
}

impl InMemorySnapshotStore {
    /// Create a new, empty in-memory snapshot store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            snapshots: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Remove every stored snapshot (test isolation helper).
    pub async fn clear(&self) {
        self.snapshots.write().await.clear();
    }

    /// Number of aggregates with a stored snapshot.
    pub async fn len(&self) -> usize {
        self.snapshots.read().await.len()
    }

    /// Whether the store currently holds no snapshots.
    pub async fn is_empty(&self) -> bool {
        self.snapshots.read().await.is_empty()
    }
}

impl Default for InMemorySnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotStore for InMemorySnapshotStore {
    fn save_snapshot(
        &self,
        snapshot: Snapshot,
    ) -> Pin<Box<dyn Future<Output = Result<(), StoreError>> + Send + '_>> {
        Box::pin(async move {
            let key = snapshot.aggregate_id.as_str().to_string();
            self.snapshots.write().await.insert(key, snapshot);
            Ok(())
        })
    }

    fn get_snapshot(
        &self,
        aggregate_id: StreamId,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Snapshot>, StoreError>> + Send + '_>> {
        Box::pin(async move {
            let snapshots = self.snapshots.read().await;
            Ok(snapshots.get(aggregate_id.as_str()).cloned())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use event_store_core::ids::GameId;
    use event_store_core::stream::Version;

    #[tokio::test]
    async fn save_then_get_round_trips_the_latest_snapshot() {
        let store = InMemorySnapshotStore::new();
        let aggregate_id = StreamId::from(GameId::new("G1").expect("valid"));

        let first = Snapshot::new(aggregate_id.clone(), Version::new(3), vec![1, 2, 3], Utc::now());
        store.save_snapshot(first).await.expect("save should succeed");

        let second = Snapshot::new(aggregate_id.clone(), Version::new(7), vec![9, 9], Utc::now());
        store.save_snapshot(second.clone()).await.expect("save should succeed");

        let loaded = store
            .get_snapshot(aggregate_id)
            .await
            .expect("read should succeed")
            .expect("a snapshot should exist");
        assert_eq!(loaded.version, Version::new(7), "save_snapshot replaces, never merges");
        assert_eq!(loaded.data, second.data);
    }

    #[tokio::test]
    async fn get_snapshot_returns_none_for_unknown_aggregate() {
        let store = InMemorySnapshotStore::new();
        let aggregate_id = StreamId::from(GameId::new("unknown").expect("valid"));
        let loaded = store.get_snapshot(aggregate_id).await.expect("read should succeed");
        assert!(loaded.is_none());
    }
}
