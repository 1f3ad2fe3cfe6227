//! The snapshot store trait (C5): a keyed store of latest per-aggregate
//! state, used to bound replay cost.
//!
//! Snapshots and events share no backend transaction (§5): a snapshot
//! lagging its stream is acceptable and expected. Consumers reconstruct
//! state by loading [`SnapshotStore::get_snapshot`], then calling
//! [`crate::event_store::EventStore::get_events`] from
//! `snapshot.version.next()` onward.

use crate::error::StoreError;
use crate::ids::{AggregateType, StreamId};
use crate::stream::Version;
use chrono::{DateTime, Utc};
use std::future::Future;
use std::pin::Pin;

/// A point-in-time summary of one aggregate's state.
///
/// `data` is opaque to the store: it is owned and interpreted entirely by
/// the caller (typically the aggregate's own serialization, separate from
/// the event payload serializer in [`crate::serializer`]).
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    /// The aggregate this snapshot summarizes.
    pub aggregate_id: StreamId,
    /// The aggregate's type; must match `aggregate_id`'s variant.
    pub aggregate_type: AggregateType,
    /// The `stream_version` of the most recent event reflected in `data`.
    pub version: Version,
    /// Opaque, caller-serialized aggregate state.
    pub data: Vec<u8>,
    /// When this snapshot was taken.
    pub timestamp: DateTime<Utc>,
}

impl Snapshot {
    /// Construct a snapshot, deriving `aggregate_type` from `aggregate_id`
    /// so the two can never disagree (mirrors [`StreamId::aggregate_type`]).
    #[must_use]
    pub fn new(aggregate_id: StreamId, version: Version, data: Vec<u8>, timestamp: DateTime<Utc>) -> Self {
        let aggregate_type = aggregate_id.aggregate_type();
        Self {
            aggregate_id,
            aggregate_type,
            version,
            data,
            timestamp,
        }
    }
}

/// Keyed store of the latest snapshot per aggregate (C5).
///
/// At most one snapshot exists per `aggregate_id`; `save_snapshot` is a
/// total replacement, never a merge.
pub trait SnapshotStore: Send + Sync {
    /// Save (or replace) the snapshot for `snapshot.aggregate_id`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::BackendOperationError`] if the write fails.
    fn save_snapshot(
        &self,
        snapshot: Snapshot,
    ) -> Pin<Box<dyn Future<Output = Result<(), StoreError>> + Send + '_>>;

    /// Load the latest snapshot for `aggregate_id`, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::BackendOperationError`] if the read fails.
    fn get_snapshot(
        &self,
        aggregate_id: StreamId,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Snapshot>, StoreError>> + Send + '_>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::GameId;

    #[test]
    fn new_derives_aggregate_type_from_id() {
        let snapshot = Snapshot::new(
            StreamId::from(GameId::new("G1").expect("valid")),
            Version::new(10),
            vec![1, 2, 3],
            Utc::now(),
        );
        assert_eq!(snapshot.aggregate_type, AggregateType::Game);
    }
}
