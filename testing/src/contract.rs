//! The backend-agnostic conformance suite (C6).
//!
//! A concrete [`event_store_core::event_store::EventStore`] or
//! [`event_store_core::snapshot_store::SnapshotStore`] implementation is
//! conformant if it passes [`run_event_store_contract`] and
//! [`run_snapshot_store_contract`] respectively. Both take a `make` factory
//! (the `setUp` hook) and a `teardown` hook so backends with external
//! resources — a temp file, a test database schema — can clean up between
//! scenarios; [`InMemoryEventStore::new`](crate::InMemoryEventStore::new)
//! and [`InMemorySnapshotStore::new`](crate::InMemorySnapshotStore::new)
//! pair with a no-op teardown.
//!
//! This mirrors the shape of the teacher workspace's `reducer_test.rs`
//! fluent harness in spirit (a reusable assertion suite callers drop their
//! own subject into) but as a plain async function rather than a builder,
//! since the suite runs a fixed battery rather than one caller-assembled
//! scenario.

use event_store_core::error::StoreError;
use event_store_core::event::DomainEvent;
use event_store_core::event_store::EventStore;
use event_store_core::ids::{AggregateType, GameId, InningStateId, StreamId, TeamLineupId};
use event_store_core::serializer::{decode_payload, encode_event, NonSerializable, Provenance};
use event_store_core::snapshot_store::{Snapshot, SnapshotStore};
use event_store_core::stream::Version;
use chrono::{Duration, Utc};
use std::future::Future;

use crate::fixtures::{GameEvent, InningStateEvent, TeamLineupEvent};

#[allow(clippy::expect_used)] // Harness code can use expect
fn event_id(n: usize, tag: &str) -> event_store_core::event::EventId {
    event_store_core::event::EventId::new(format!("{tag}-{n}")).expect("non-empty")
}

/// Run the full event-store conformance suite against a fresh instance of
/// `S` for each scenario.
///
/// # Panics
///
/// Panics (via `assert!`/`assert_eq!`) on the first contract violation,
/// naming the scenario in the surrounding test output.
#[allow(clippy::too_many_lines)]
#[allow(clippy::panic)] // Harness code can panic
#[allow(clippy::expect_used)] // Harness code can use expect
pub async fn run_event_store_contract<S, Make, MakeFut, Teardown, TeardownFut>(
    make: Make,
    teardown: Teardown,
) where
    S: EventStore,
    Make: Fn() -> MakeFut,
    MakeFut: Future<Output = S>,
    Teardown: Fn(S) -> TeardownFut,
    TeardownFut: Future<Output = ()>,
{
    // S1: basic append/read.
    {
        let store = make().await;
        let game = GameId::new("G1").expect("valid");
        let stream = StreamId::from(game.clone());
        let created = DomainEvent::new(
            event_id(1, "s1"),
            Utc::now(),
            GameEvent::GameCreated {
                game_id: game,
                home_team: "Home".to_string(),
                away_team: "Away".to_string(),
            },
        );
        let encoded = encode_event(&created, Provenance::default()).expect("encode should succeed");
        let version = store
            .append(stream.clone(), Some(Version::INITIAL), vec![encoded])
            .await
            .expect("append should succeed");
        assert_eq!(version, Version::new(1));

        let events = store.get_events(stream, None).await.expect("read should succeed");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].stream_version, Version::new(1));
        assert_eq!(events[0].aggregate_type, AggregateType::Game);
        assert_eq!(events[0].event_type, "GameCreated");
        assert_eq!(events[0].stream_id, "G1");
        teardown(store).await;
    }

    // S2: ordering across two append calls.
    {
        let store = make().await;
        let game = GameId::new("G2").expect("valid");
        let stream = StreamId::from(game.clone());
        append_game_created(&store, &stream, &game, "s2a").await;

        let at_bat = DomainEvent::new(
            event_id(1, "s2b"),
            Utc::now(),
            GameEvent::AtBatCompleted {
                game_id: game,
                batter: "Player One".to_string(),
                outcome: "single".to_string(),
            },
        );
        let encoded = encode_event(&at_bat, Provenance::default()).expect("encode should succeed");
        store
            .append(stream.clone(), Some(Version::new(1)), vec![encoded])
            .await
            .expect("second append should succeed");

        let events = store.get_events(stream, None).await.expect("read should succeed");
        let versions: Vec<u64> = events.iter().map(|e| e.stream_version.value()).collect();
        assert_eq!(versions, vec![1, 2], "stream order must equal acceptance order");
        teardown(store).await;
    }

    // S3: concurrency check rejects a stale expectation and leaves state
    // unchanged, then accepts the correct one.
    {
        let store = make().await;
        let game = GameId::new("G3").expect("valid");
        let stream = StreamId::from(game.clone());
        append_game_created(&store, &stream, &game, "s3a").await;
        append_at_bat(&store, &stream, &game, "s3b").await;

        let stray = DomainEvent::new(
            event_id(1, "s3c"),
            Utc::now(),
            GameEvent::AtBatCompleted {
                game_id: game.clone(),
                batter: "Player Two".to_string(),
                outcome: "strikeout".to_string(),
            },
        );
        let encoded = encode_event(&stray, Provenance::default()).expect("encode should succeed");
        let result = store
            .append(stream.clone(), Some(Version::INITIAL), vec![encoded])
            .await;
        match result {
            Err(StoreError::ConcurrencyError { expected, actual, .. }) => {
                assert_eq!(expected, Version::new(0));
                assert_eq!(actual, Version::new(2));
            }
            other => panic!("expected ConcurrencyError, got {other:?}"),
        }
        let unchanged = store.get_events(stream.clone(), None).await.expect("read should succeed");
        assert_eq!(unchanged.len(), 2, "a rejected append must not mutate the stream");

        let accepted = DomainEvent::new(
            event_id(2, "s3c"),
            Utc::now(),
            GameEvent::AtBatCompleted {
                game_id,
                batter: "Player Two".to_string(),
                outcome: "strikeout".to_string(),
            },
        );
        let encoded = encode_event(&accepted, Provenance::default()).expect("encode should succeed");
        let version = store
            .append(stream, Some(Version::new(2)), vec![encoded])
            .await
            .expect("correctly-versioned append should succeed");
        assert_eq!(version, Version::new(3));
        teardown(store).await;
    }

    // S4: cross-aggregate correlation.
    {
        let store = make().await;
        let game = GameId::new("G4").expect("valid");
        let lineup = TeamLineupId::new("T4").expect("valid");
        let inning = InningStateId::new("I4").expect("valid");

        append_game_created(&store, &StreamId::from(game.clone()), &game, "s4a").await;

        let lineup_created = DomainEvent::new(
            event_id(1, "s4b"),
            Utc::now(),
            TeamLineupEvent::TeamLineupCreated {
                team_lineup_id: lineup.clone(),
                game_id: game.clone(),
                batting_order: vec!["Alice".to_string(), "Bob".to_string()],
            },
        );
        let encoded = encode_event(&lineup_created, Provenance::default()).expect("encode should succeed");
        store
            .append(StreamId::from(lineup), Some(Version::INITIAL), vec![encoded])
            .await
            .expect("lineup append should succeed");

        let inning_created = DomainEvent::new(
            event_id(1, "s4c"),
            Utc::now(),
            InningStateEvent::InningStateCreated {
                inning_state_id: inning.clone(),
                game_id: game.clone(),
                inning_number: 1,
            },
        );
        let encoded = encode_event(&inning_created, Provenance::default()).expect("encode should succeed");
        store
            .append(StreamId::from(inning), Some(Version::INITIAL), vec![encoded])
            .await
            .expect("inning append should succeed");

        let game_events = store.get_game_events(game.clone()).await.expect("read should succeed");
        assert_eq!(game_events.len(), 3, "all three aggregates' events share the game correlator");

        let filtered = store
            .get_events_by_game_id(
                game,
                Some(vec![AggregateType::Game, AggregateType::TeamLineup]),
                None,
            )
            .await
            .expect("read should succeed");
        assert_eq!(filtered.len(), 2);
        assert!(filtered
            .iter()
            .all(|e| matches!(e.aggregate_type, AggregateType::Game | AggregateType::TeamLineup)));
        teardown(store).await;
    }

    // S5: large batch.
    {
        let store = make().await;
        let game = GameId::new("G5").expect("valid");
        let stream = StreamId::from(game.clone());
        let batch: Vec<_> = (0..100)
            .map(|i| {
                let event = DomainEvent::new(
                    event_id(i, "s5"),
                    Utc::now(),
                    GameEvent::AtBatCompleted {
                        game_id: game.clone(),
                        batter: format!("Player {i}"),
                        outcome: "groundout".to_string(),
                    },
                );
                encode_event(&event, Provenance::default()).expect("encode should succeed")
            })
            .collect();

        let version = store
            .append(stream.clone(), Some(Version::INITIAL), batch)
            .await
            .expect("large batch append should succeed");
        assert_eq!(version, Version::new(100));

        let events = store.get_events(stream, None).await.expect("read should succeed");
        assert_eq!(events.len(), 100);
        let versions: Vec<u64> = events.iter().map(|e| e.stream_version.value()).collect();
        assert_eq!(versions, (1..=100).collect::<Vec<_>>());
        let unique_ids: std::collections::HashSet<_> = events.iter().map(|e| e.event_id.as_str()).collect();
        assert_eq!(unique_ids.len(), 100, "no duplicate event ids in a large batch");
        teardown(store).await;
    }

    // S6: non-serializable payloads are rejected, naming the event, before
    // ever reaching the store — and leave the stream untouched.
    {
        let store = make().await;
        let stream = StreamId::from(GameId::new("G6").expect("valid"));
        let bad = DomainEvent::new(event_id(1, "s6"), Utc::now(), NonSerializable);
        let result = encode_event(&bad, Provenance::default());
        let Err(StoreError::SerializationError(message)) = result else {
            panic!("expected a SerializationError for a non-serializable payload");
        };
        assert!(message.contains("s6-1"));

        let events = store.get_events(stream, None).await.expect("read should succeed");
        assert!(events.is_empty());
        teardown(store).await;
    }

    // Boundary: empty append with no expected version is a no-op.
    {
        let store = make().await;
        let stream = StreamId::from(GameId::new("G7").expect("valid"));
        let version = store.append(stream.clone(), None, vec![]).await.expect("no-op append");
        assert_eq!(version, Version::INITIAL);
        let events = store.get_events(stream, None).await.expect("read should succeed");
        assert!(events.is_empty());
        teardown(store).await;
    }

    // Boundary: fromVersion = 0 is lenient and means "from the beginning".
    {
        let store = make().await;
        let game = GameId::new("G8").expect("valid");
        let stream = StreamId::from(game.clone());
        append_game_created(&store, &stream, &game, "s8a").await;
        append_at_bat(&store, &stream, &game, "s8b").await;

        let from_none = store.get_events(stream.clone(), None).await.expect("read should succeed");
        let from_zero = store.get_events(stream.clone(), Some(0)).await.expect("read should succeed");
        assert_eq!(from_none, from_zero);

        let from_beyond = store
            .get_events(stream, Some(1000))
            .await
            .expect("read should succeed");
        assert!(from_beyond.is_empty(), "fromVersion past stream length returns empty, not an error");
        teardown(store).await;
    }

    // getAllEvents with a future timestamp returns empty; getEventsByType
    // matches exactly and is case-sensitive.
    {
        let store = make().await;
        let game = GameId::new("G9").expect("valid");
        let stream = StreamId::from(game.clone());
        append_game_created(&store, &stream, &game, "s9a").await;

        let future = Utc::now() + Duration::days(365);
        let events = store.get_all_events(Some(future)).await.expect("read should succeed");
        assert!(events.is_empty());

        let matches = store
            .get_events_by_type("GameCreated".to_string(), None)
            .await
            .expect("read should succeed");
        assert_eq!(matches.len(), 1);

        let no_matches = store
            .get_events_by_type("gamecreated".to_string(), None)
            .await
            .expect("read should succeed");
        assert!(no_matches.is_empty(), "eventType matching is case-sensitive");
        teardown(store).await;
    }
}

#[allow(clippy::expect_used)] // Harness code can use expect
async fn append_game_created<S: EventStore>(store: &S, stream: &StreamId, game: &GameId, tag: &str) {
    let current = store.get_events(stream.clone(), None).await.expect("read should succeed");
    let expected = Version::new(current.len() as u64);
    let event = DomainEvent::new(
        event_id(1, tag),
        Utc::now(),
        GameEvent::GameCreated {
            game_id: game.clone(),
            home_team: "Home".to_string(),
            away_team: "Away".to_string(),
        },
    );
    let encoded = encode_event(&event, Provenance::default()).expect("encode should succeed");
    store
        .append(stream.clone(), Some(expected), vec![encoded])
        .await
        .expect("append should succeed");
}

#[allow(clippy::expect_used)] // Harness code can use expect
async fn append_at_bat<S: EventStore>(store: &S, stream: &StreamId, game: &GameId, tag: &str) {
    let current = store.get_events(stream.clone(), None).await.expect("read should succeed");
    let expected = Version::new(current.len() as u64);
    let event = DomainEvent::new(
        event_id(1, tag),
        Utc::now(),
        GameEvent::AtBatCompleted {
            game_id: game.clone(),
            batter: "Player".to_string(),
            outcome: "single".to_string(),
        },
    );
    let encoded = encode_event(&event, Provenance::default()).expect("encode should succeed");
    store
        .append(stream.clone(), Some(expected), vec![encoded])
        .await
        .expect("append should succeed");
}

/// Run the snapshot-store conformance suite against a fresh instance of `S`.
///
/// # Panics
///
/// Panics (via `assert!`/`assert_eq!`) on the first contract violation.
#[allow(clippy::panic)] // Harness code can panic
#[allow(clippy::expect_used)] // Harness code can use expect
pub async fn run_snapshot_store_contract<S, Make, MakeFut, Teardown, TeardownFut>(
    make: Make,
    teardown: Teardown,
) where
    S: SnapshotStore,
    Make: Fn() -> MakeFut,
    MakeFut: Future<Output = S>,
    Teardown: Fn(S) -> TeardownFut,
    TeardownFut: Future<Output = ()>,
{
    // Absent snapshot.
    {
        let store = make().await;
        let aggregate_id = StreamId::from(GameId::new("SS1").expect("valid"));
        let loaded = store.get_snapshot(aggregate_id).await.expect("read should succeed");
        assert!(loaded.is_none());
        teardown(store).await;
    }

    // Save derives aggregate_type; save/get round-trip.
    {
        let store = make().await;
        let aggregate_id = StreamId::from(GameId::new("SS2").expect("valid"));
        let snapshot = Snapshot::new(aggregate_id.clone(), Version::new(5), vec![1, 2, 3], Utc::now());
        store.save_snapshot(snapshot.clone()).await.expect("save should succeed");

        let loaded = store
            .get_snapshot(aggregate_id)
            .await
            .expect("read should succeed")
            .expect("snapshot should exist");
        assert_eq!(loaded.version, Version::new(5));
        assert_eq!(loaded.aggregate_type, AggregateType::Game);
        assert_eq!(loaded.data, vec![1, 2, 3]);
        teardown(store).await;
    }

    // Idempotent / replacing save: the second save wins, never a merge.
    {
        let store = make().await;
        let aggregate_id = StreamId::from(GameId::new("SS3").expect("valid"));
        let first = Snapshot::new(aggregate_id.clone(), Version::new(1), vec![0], Utc::now());
        let second = Snapshot::new(aggregate_id.clone(), Version::new(2), vec![1], Utc::now());
        store.save_snapshot(first).await.expect("save should succeed");
        store.save_snapshot(second.clone()).await.expect("save should succeed");
        store.save_snapshot(second.clone()).await.expect("repeat save should succeed");

        let loaded = store
            .get_snapshot(aggregate_id)
            .await
            .expect("read should succeed")
            .expect("snapshot should exist");
        assert_eq!(loaded.version, second.version);
        assert_eq!(loaded.data, second.data);
        teardown(store).await;
    }
}

/// Confirms `decode_payload` round-trips a payload encoded through a
/// backend's own storage path, not just through the serializer directly;
/// useful for backends that re-serialize on write (e.g. row encoding).
///
/// # Panics
///
/// Panics (via `assert!`/`assert_eq!`) if the round trip does not preserve
/// the payload.
#[allow(clippy::panic)] // Harness code can panic
#[allow(clippy::expect_used)] // Harness code can use expect
pub async fn assert_round_trips_through_store<S: EventStore>(
    store: &S,
    stream: StreamId,
    game: GameId,
) {
    let event = DomainEvent::new(
        event_id(1, "roundtrip"),
        Utc::now(),
        GameEvent::GameCreated {
            game_id: game,
            home_team: "Home".to_string(),
            away_team: "Away".to_string(),
        },
    );
    let encoded = encode_event(&event, Provenance::default()).expect("encode should succeed");
    store
        .append(stream.clone(), Some(Version::INITIAL), vec![encoded])
        .await
        .expect("append should succeed");

    let stored = store.get_events(stream, None).await.expect("read should succeed");
    let decoded: GameEvent = decode_payload(&stored[0].event_data).expect("decode should succeed");
    let GameEvent::GameCreated { home_team, .. } = decoded else {
        panic!("expected a GameCreated variant");
    };
    assert_eq!(home_team, "Home");
}
