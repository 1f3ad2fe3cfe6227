//! # Event Store Core
//!
//! Core types and trait contracts for the append-only event store backing
//! an event-sourced softball scoring application (see `SPEC_FULL.md` at the
//! workspace root for the full specification this crate implements).
//!
//! ## Modules
//!
//! - [`ids`]: strongly-typed aggregate identifiers (C1)
//! - [`event`]: the domain event model (C1)
//! - [`serializer`]: encode/decode and game-id extraction (C3)
//! - [`event_store`]: the `EventStore` trait and `StoredEvent` record (C2/C4)
//! - [`snapshot_store`]: the `SnapshotStore` trait (C5)
//! - [`error`]: the shared error taxonomy (§7)
//! - [`stream`]: stream version numbers
//!
//! ## Architecture
//!
//! Higher layers (command handlers, projections) are explicitly out of
//! scope for this crate — it owns only the event-store data model, append
//! protocol, and query semantics, plus the companion snapshot cache.

pub use chrono::{DateTime, Utc};

pub mod error;
pub mod event;
pub mod event_store;
pub mod ids;
pub mod serializer;
pub mod snapshot_store;
pub mod stream;

/// Re-exports of the most commonly needed names.
pub mod prelude {
    pub use crate::error::StoreError;
    pub use crate::event::{AggregateEvent, DomainEvent, DomainEventPayload, EventId};
    pub use crate::event_store::{EventMetadata, EventStore, StoredEvent};
    pub use crate::ids::{AggregateType, GameId, InningStateId, StreamId, TeamLineupId};
    pub use crate::serializer::{EncodedEvent, Provenance, encode_event, extract_game_id};
    pub use crate::snapshot_store::{Snapshot, SnapshotStore};
    pub use crate::stream::Version;
}
