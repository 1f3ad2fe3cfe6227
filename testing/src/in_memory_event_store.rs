//! An in-memory [`EventStore`] implementation for fast, deterministic tests.
//!
//! Grounded on the teacher workspace's `InMemoryProjectionStore`
//! (`Arc<RwLock<HashMap<...>>>`, `new`/`clear`/`len`/`is_empty` helpers);
//! the lock is `tokio::sync::RwLock` rather than `std::sync::RwLock`
//! because the trait's operations are held as `Pin<Box<dyn Future>>` and
//! may be awaited across suspension points by a future durable backend, so
//! the in-memory reference implementation uses the same lock type its
//! trait contract expects call sites to be compatible with.

use event_store_core::error::StoreError;
use event_store_core::event_store::{AggregateTypeFilter, EventMetadata, EventStore, StoredEvent};
use event_store_core::ids::{AggregateType, GameId, StreamId};
use event_store_core::serializer::EncodedEvent;
use event_store_core::stream::Version;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::RwLock;

/// An event entry plus the global acceptance sequence it was appended at.
///
/// Sorting cross-stream query results by `(timestamp, sequence)` satisfies
/// `spec.md` §4.4.1's "chronological" ordering: ties within one stream
/// resolve by `stream_version` (which increases with `sequence`), and ties
/// across streams resolve by acceptance order (exactly `sequence`).
#[derive(Clone, Debug)]
struct Entry {
    sequence: u64,
    event: StoredEvent,
}

#[derive(Default)]
struct State {
    next_sequence: u64,
    streams: HashMap<String, Vec<StoredEvent>>,
    all_events: Vec<Entry>,
    event_ids: HashSet<String>,
}

/// Fast, deterministic, in-memory [`EventStore`] for tests and local
/// development. Not durable: all data is lost when the store is dropped.
#[derive(Clone)]
pub struct InMemoryEventStore {
    state: Arc<RwLock<State>>,
    source: String,
}

impl InMemoryEventStore {
    /// Create a new, empty in-memory event store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(State::default())),
            source: "in-memory-event-store".to_string(),
        }
    }

    /// Create a store that tags every stored event's `metadata.source`
    /// with `source`, instead of the default identity.
    #[must_use]
    pub fn with_source(source: impl Into<String>) -> Self {
        Self {
            state: Arc::new(RwLock::new(State::default())),
            source: source.into(),
        }
    }

    /// Remove all streams and events (test isolation helper).
    pub async fn clear(&self) {
        *self.state.write().await = State::default();
    }

    /// Total number of stored events across all streams.
    pub async fn len(&self) -> usize {
        self.state.read().await.all_events.len()
    }

    /// Whether the store currently has no events.
    pub async fn is_empty(&self) -> bool {
        self.state.read().await.all_events.is_empty()
    }
}

impl Default for InMemoryEventStore {
    fn default() -> Self {
        Self::new()
    }
}

fn chronological(mut events: Vec<Entry>) -> Vec<StoredEvent> {
    events.sort_by(|a, b| {
        a.event
            .timestamp
            .cmp(&b.event.timestamp)
            .then(a.sequence.cmp(&b.sequence))
    });
    events.into_iter().map(|entry| entry.event).collect()
}

impl EventStore for InMemoryEventStore {
    fn append(
        &self,
        stream_id: StreamId,
        expected_version: Option<Version>,
        events: Vec<EncodedEvent>,
    ) -> Pin<Box<dyn Future<Output = Result<Version, StoreError>> + Send + '_>> {
        Box::pin(async move {
            if events.is_empty() && expected_version.is_none() {
                let state = self.state.read().await;
                let current = state
                    .streams
                    .get(stream_id.as_str())
                    .map_or(0, Vec::len) as u64;
                return Ok(Version::new(current));
            }

            let mut duplicate_ids = HashSet::new();
            for event in &events {
                if !duplicate_ids.insert(event.event_id.as_str().to_string()) {
                    return Err(StoreError::ParameterError(format!(
                        "duplicate event id '{}' within a single append call",
                        event.event_id
                    )));
                }
            }

            let mut state = self.state.write().await;

            let current_version = Version::new(
                state.streams.get(stream_id.as_str()).map_or(0, Vec::len) as u64,
            );

            if let Some(expected) = expected_version {
                if expected != current_version {
                    return Err(StoreError::concurrency(
                        stream_id.clone(),
                        expected,
                        current_version,
                    ));
                }
            }

            for event in &events {
                if state.event_ids.contains(event.event_id.as_str()) {
                    return Err(StoreError::ParameterError(format!(
                        "event id '{}' already exists in the store",
                        event.event_id
                    )));
                }
            }

            let mut new_version = current_version;
            let stream_events = state.streams.entry(stream_id.as_str().to_string()).or_default();

            let mut appended = Vec::with_capacity(events.len());
            for (offset, event) in events.into_iter().enumerate() {
                new_version = current_version + (offset as u64 + 1);
                let stored = StoredEvent {
                    event_id: event.event_id,
                    stream_id: stream_id.as_str().to_string(),
                    aggregate_type: stream_id.aggregate_type(),
                    event_type: event.event_type,
                    event_data: event.event_data,
                    event_version: event.event_version,
                    stream_version: new_version,
                    timestamp: event.timestamp,
                    metadata: EventMetadata {
                        source: self.source.clone(),
                        created_at: Utc::now(),
                        game_id: event.game_id,
                        correlation_id: event.provenance.correlation_id,
                        causation_id: event.provenance.causation_id,
                        user_id: event.provenance.user_id,
                    },
                };
                appended.push(stored);
            }

            for stored in &appended {
                state.event_ids.insert(stored.event_id.as_str().to_string());
            }
            stream_events.extend(appended.clone());

            for stored in appended {
                let sequence = state.next_sequence;
                state.next_sequence += 1;
                state.all_events.push(Entry {
                    sequence,
                    event: stored,
                });
            }

            Ok(new_version)
        })
    }

    fn get_events(
        &self,
        stream_id: StreamId,
        from_version: Option<u64>,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<StoredEvent>, StoreError>> + Send + '_>> {
        Box::pin(async move {
            let from = from_version.unwrap_or(1).max(1);
            let state = self.state.read().await;
            let events = state
                .streams
                .get(stream_id.as_str())
                .map(|events| {
                    events
                        .iter()
                        .filter(|event| event.stream_version.value() >= from)
                        .cloned()
                        .collect()
                })
                .unwrap_or_default();
            Ok(events)
        })
    }

    fn get_game_events(
        &self,
        game_id: GameId,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<StoredEvent>, StoreError>> + Send + '_>> {
        Box::pin(async move {
            let state = self.state.read().await;
            let matching = state
                .all_events
                .iter()
                .filter(|entry| entry.event.metadata.game_id.as_ref() == Some(&game_id))
                .cloned()
                .collect();
            Ok(chronological(matching))
        })
    }

    fn get_all_events(
        &self,
        from_timestamp: Option<DateTime<Utc>>,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<StoredEvent>, StoreError>> + Send + '_>> {
        Box::pin(async move {
            let state = self.state.read().await;
            let matching = state
                .all_events
                .iter()
                .filter(|entry| from_timestamp.is_none_or(|from| entry.event.timestamp >= from))
                .cloned()
                .collect();
            Ok(chronological(matching))
        })
    }

    fn get_events_by_type(
        &self,
        event_type: String,
        from_timestamp: Option<DateTime<Utc>>,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<StoredEvent>, StoreError>> + Send + '_>> {
        Box::pin(async move {
            let state = self.state.read().await;
            let matching = state
                .all_events
                .iter()
                .filter(|entry| entry.event.event_type == event_type)
                .filter(|entry| from_timestamp.is_none_or(|from| entry.event.timestamp >= from))
                .cloned()
                .collect();
            Ok(chronological(matching))
        })
    }

    fn get_events_by_game_id(
        &self,
        game_id: GameId,
        aggregate_types: AggregateTypeFilter,
        from_timestamp: Option<DateTime<Utc>>,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<StoredEvent>, StoreError>> + Send + '_>> {
        Box::pin(async move {
            let state = self.state.read().await;
            let matching = state
                .all_events
                .iter()
                .filter(|entry| entry.event.metadata.game_id.as_ref() == Some(&game_id))
                .filter(|entry| {
                    aggregate_types
                        .as_ref()
                        .is_none_or(|types| types.contains(&entry.event.aggregate_type))
                })
                .filter(|entry| from_timestamp.is_none_or(|from| entry.event.timestamp >= from))
                .cloned()
                .collect();
            Ok(chronological(matching))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use event_store_core::event::{DomainEvent, EventId};
    use event_store_core::serializer::{encode_event, Provenance};
    use event_store_core::ids::GameId;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct GameCreated {
        game_id: GameId,
        home_team: String,
        away_team: String,
    }

    impl event_store_core::event::DomainEventPayload for GameCreated {
        fn event_type(&self) -> &'static str {
            "GameCreated"
        }
    }

    fn encoded(event_id: &str, timestamp: DateTime<Utc>, game_id: &str) -> EncodedEvent {
        let event = DomainEvent::new(
            EventId::new(event_id).expect("valid"),
            timestamp,
            GameCreated {
                game_id: GameId::new(game_id).expect("valid"),
                home_team: "Home".to_string(),
                away_team: "Away".to_string(),
            },
        );
        encode_event(&event, Provenance::default()).expect("encode should succeed")
    }

    #[tokio::test]
    async fn append_then_get_events_returns_ordered_stream_versions() {
        let store = InMemoryEventStore::new();
        let stream = StreamId::from(GameId::new("G1").expect("valid"));
        let now = Utc::now();

        let version = store
            .append(
                stream.clone(),
                Some(Version::INITIAL),
                vec![encoded("e1", now, "G1")],
            )
            .await
            .expect("append should succeed");
        assert_eq!(version, Version::new(1));

        let events = store.get_events(stream, None).await.expect("read should succeed");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].stream_version, Version::new(1));
        assert_eq!(events[0].aggregate_type, AggregateType::Game);
    }

    #[tokio::test]
    async fn concurrency_conflict_reports_expected_and_actual() {
        let store = InMemoryEventStore::new();
        let stream = StreamId::from(GameId::new("G1").expect("valid"));
        let now = Utc::now();

        store
            .append(stream.clone(), Some(Version::INITIAL), vec![encoded("e1", now, "G1")])
            .await
            .expect("first append should succeed");

        let result = store
            .append(stream.clone(), Some(Version::INITIAL), vec![encoded("e2", now, "G1")])
            .await;

        match result {
            Err(StoreError::ConcurrencyError { expected, actual, .. }) => {
                assert_eq!(expected, Version::new(0));
                assert_eq!(actual, Version::new(1));
            }
            other => panic!("expected ConcurrencyError, got {other:?}"),
        }

        let events = store.get_events(stream, None).await.expect("read should succeed");
        assert_eq!(events.len(), 1, "failed append must not leave a partial write");
    }

    #[tokio::test]
    async fn empty_append_without_expected_version_is_a_no_op() {
        let store = InMemoryEventStore::new();
        let stream = StreamId::from(GameId::new("G1").expect("valid"));

        let version = store.append(stream.clone(), None, vec![]).await.expect("no-op append");
        assert_eq!(version, Version::INITIAL);

        let events = store.get_events(stream, None).await.expect("read should succeed");
        assert!(events.is_empty());
    }
}
