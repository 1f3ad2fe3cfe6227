//! The event store trait (C4): an append-only, optimistically-concurrent,
//! multi-stream log with five query shapes.
//!
//! # Design
//!
//! `EventStore` is deliberately minimal: append with optimistic concurrency,
//! and read back a stream, a game's cross-aggregate events, all events, or
//! events filtered by type. It does not provide authorization, projections,
//! or subscriptions — those are explicitly out of scope (`spec.md` §1).
//!
//! # Dyn Compatibility
//!
//! Like the teacher workspace's `EventStore` trait, this trait returns
//! explicit `Pin<Box<dyn Future>>` rather than using `async fn`, so it can
//! be used as `Arc<dyn EventStore>` — required once more than one backend
//! (in-memory today, a durable backend later) needs to be swapped behind a
//! single call site.

use crate::error::StoreError;
use crate::ids::{AggregateType, GameId, StreamId};
use crate::serializer::EncodedEvent;
use crate::stream::Version;
use chrono::{DateTime, Utc};
use std::future::Future;
use std::pin::Pin;

/// An immutable, persisted projection of a domain event (C2).
///
/// Constructed only by an `EventStore` implementation during `append`;
/// `stream_version` is assigned by the store, never by the caller.
#[derive(Clone, Debug, PartialEq)]
pub struct StoredEvent {
    /// Copied from the domain event; unique store-wide.
    pub event_id: crate::event::EventId,
    /// String value of the owning aggregate identifier.
    pub stream_id: String,
    /// One of the three aggregate tags.
    pub aggregate_type: AggregateType,
    /// Copied from the domain event.
    pub event_type: String,
    /// Serialized JSON payload.
    pub event_data: String,
    /// Schema version of the payload encoding (>= 1).
    pub event_version: u32,
    /// 1-based sequence number within the stream.
    pub stream_version: Version,
    /// Emission time of the domain event.
    pub timestamp: DateTime<Utc>,
    /// Provenance and bookkeeping metadata attached at write time.
    pub metadata: EventMetadata,
}

/// Metadata attached to a [`StoredEvent`] at append time.
#[derive(Clone, Debug, PartialEq)]
pub struct EventMetadata {
    /// Name of the writing component.
    pub source: String,
    /// When the record was written; never earlier than `timestamp`'s
    /// emission, and never earlier than the store's perception of when
    /// the write occurred.
    pub created_at: DateTime<Utc>,
    /// The game identifier extracted from the payload at append time; used
    /// by `get_game_events`/`get_events_by_game_id`.
    pub game_id: Option<GameId>,
    /// Links related events across aggregates.
    pub correlation_id: Option<String>,
    /// Links a cause event to the event(s) it produced.
    pub causation_id: Option<String>,
    /// The user who triggered the event, if known.
    pub user_id: Option<String>,
}

/// Aggregate types to filter by in [`EventStore::get_events_by_game_id`].
pub type AggregateTypeFilter = Option<Vec<AggregateType>>;

/// Append-only, optimistically-concurrent multi-stream event log (C4).
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` for use across async tasks.
pub trait EventStore: Send + Sync {
    /// Append events to a stream with optimistic concurrency control.
    ///
    /// Precondition checks (rejected before any write, per `spec.md`
    /// §4.4.2): `events` must already have been encoded successfully via
    /// the serializer (C3) by the caller, which is why this trait accepts
    /// [`EncodedEvent`] rather than a generic payload.
    ///
    /// If `events` is empty and `expected_version` is `None`, this is a
    /// no-op that returns the stream's current version unchanged.
    ///
    /// # Errors
    ///
    /// - [`StoreError::ConcurrencyError`]: `expected_version` does not
    ///   match the stream's current version.
    /// - [`StoreError::BackendConnectionError`] /
    ///   [`StoreError::BackendOperationError`]: the backend could not
    ///   complete the write; no events are stored (atomicity, §4.4.2 step 9).
    fn append(
        &self,
        stream_id: StreamId,
        expected_version: Option<Version>,
        events: Vec<EncodedEvent>,
    ) -> Pin<Box<dyn Future<Output = Result<Version, StoreError>> + Send + '_>>;

    /// Load events from one stream, ordered ascending by `stream_version`.
    ///
    /// `from_version = None` or `Some(0)` means "from the beginning" (§9
    /// Open Question (b)); a `from_version` past the stream's length
    /// returns an empty sequence, never an error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::BackendOperationError`] if the backend cannot
    /// complete the read, or if a stored record is found malformed.
    fn get_events(
        &self,
        stream_id: StreamId,
        from_version: Option<u64>,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<StoredEvent>, StoreError>> + Send + '_>>;

    /// All events whose game correlator equals `game_id`, chronological.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::BackendOperationError`] if the backend cannot
    /// complete the read.
    fn get_game_events(
        &self,
        game_id: GameId,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<StoredEvent>, StoreError>> + Send + '_>>;

    /// All events with `timestamp >= from_timestamp` (default: the epoch
    /// of the store), chronological.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::BackendOperationError`] if the backend cannot
    /// complete the read.
    fn get_all_events(
        &self,
        from_timestamp: Option<DateTime<Utc>>,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<StoredEvent>, StoreError>> + Send + '_>>;

    /// Events matching `event_type` exactly (case-sensitive), chronological.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::BackendOperationError`] if the backend cannot
    /// complete the read.
    fn get_events_by_type(
        &self,
        event_type: String,
        from_timestamp: Option<DateTime<Utc>>,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<StoredEvent>, StoreError>> + Send + '_>>;

    /// Events correlated to `game_id`, optionally filtered by aggregate
    /// type and by a minimum timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::BackendOperationError`] if the backend cannot
    /// complete the read.
    fn get_events_by_game_id(
        &self,
        game_id: GameId,
        aggregate_types: AggregateTypeFilter,
        from_timestamp: Option<DateTime<Utc>>,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<StoredEvent>, StoreError>> + Send + '_>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::GameId;

    #[test]
    fn concurrency_error_display_names_stream_expected_and_actual() {
        let error = StoreError::concurrency(
            StreamId::from(GameId::new("test-stream").expect("valid")),
            Version::new(5),
            Version::new(7),
        );
        let display = format!("{error}");
        assert!(display.contains("expected version 5"));
        assert!(display.contains("found 7"));
    }
}
