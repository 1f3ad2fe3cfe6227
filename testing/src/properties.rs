//! Property-based tests for the in-memory `EventStore` (§8 of
//! `SPEC_FULL.md`): contiguity and identity-uniqueness must hold for every
//! sequence of appends, not just the literal scenarios in `contract.rs`.
//!
//! `proptest`'s `#[test]` functions are synchronous, so each case drives the
//! async store through a freshly built single-threaded `tokio` runtime
//! rather than `#[tokio::test]`.

use crate::InMemoryEventStore;
use chrono::Utc;
use event_store_core::event::{DomainEvent, EventId};
use event_store_core::event_store::EventStore;
use event_store_core::ids::{GameId, StreamId};
use event_store_core::serializer::{encode_event, Provenance};
use event_store_core::stream::Version;
use proptest::prelude::*;

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
struct Counted {
    game_id: GameId,
    sequence: usize,
}

impl event_store_core::event::DomainEventPayload for Counted {
    fn event_type(&self) -> &'static str {
        "Counted"
    }
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("building a current-thread runtime should not fail")
}

proptest! {
    /// §8 property 1 (contiguity): after appending `n` events one batch at
    /// a time to a fresh stream, `get_events` returns `stream_version`
    /// values `1, 2, ..., n` with no gaps or duplicates.
    #[test]
    fn contiguity_holds_for_any_batch_sequence(batch_sizes in proptest::collection::vec(1usize..6, 1..8)) {
        runtime().block_on(async move {
            let store = InMemoryEventStore::new();
            let game = GameId::new("G-contiguity").expect("valid");
            let stream = StreamId::from(game.clone());

            let mut expected_total = 0u64;
            for (batch_index, size) in batch_sizes.iter().enumerate() {
                let events: Vec<_> = (0..*size)
                    .map(|i| {
                        let event = DomainEvent::new(
                            EventId::new(format!("contiguity-{batch_index}-{i}")).expect("non-empty"),
                            Utc::now(),
                            Counted { game_id: game.clone(), sequence: i },
                        );
                        encode_event(&event, Provenance::default()).expect("encode should succeed")
                    })
                    .collect();

                let version = store
                    .append(stream.clone(), Some(Version::new(expected_total)), events)
                    .await
                    .expect("append at the correct expected version should succeed");
                expected_total += *size as u64;
                prop_assert_eq!(version, Version::new(expected_total));
            }

            let events = store.get_events(stream, None).await.expect("read should succeed");
            let versions: Vec<u64> = events.iter().map(|e| e.stream_version.value()).collect();
            let contiguous: Vec<u64> = (1..=expected_total).collect();
            prop_assert_eq!(versions, contiguous);
            Ok(())
        })?;
    }

    /// §8 property 2 (identity uniqueness): appending a batch that repeats
    /// an `eventId` already used earlier in the same stream is rejected,
    /// and the store's prior state is left exactly as it was.
    #[test]
    fn duplicate_event_id_is_rejected_and_store_is_unchanged(n in 1usize..10) {
        runtime().block_on(async move {
            let store = InMemoryEventStore::new();
            let game = GameId::new("G-uniqueness").expect("valid");
            let stream = StreamId::from(game.clone());

            let events: Vec<_> = (0..n)
                .map(|i| {
                    let event = DomainEvent::new(
                        EventId::new(format!("uniqueness-{i}")).expect("non-empty"),
                        Utc::now(),
                        Counted { game_id: game.clone(), sequence: i },
                    );
                    encode_event(&event, Provenance::default()).expect("encode should succeed")
                })
                .collect();
            store
                .append(stream.clone(), Some(Version::INITIAL), events)
                .await
                .expect("initial append should succeed");

            let before = store.get_events(stream.clone(), None).await.expect("read should succeed");

            let repeat = DomainEvent::new(
                EventId::new("uniqueness-0").expect("non-empty"),
                Utc::now(),
                Counted { game_id: game.clone(), sequence: n },
            );
            let encoded = encode_event(&repeat, Provenance::default()).expect("encode should succeed");
            let result = store
                .append(stream.clone(), Some(Version::new(n as u64)), vec![encoded])
                .await;
            prop_assert!(result.is_err(), "reusing an existing event id must be rejected");

            let after = store.get_events(stream, None).await.expect("read should succeed");
            prop_assert_eq!(before, after, "a rejected append must not change the stream");
            Ok(())
        })?;
    }
}
