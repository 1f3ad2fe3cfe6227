//! Domain event model (C1): the input side of `append`.
//!
//! A domain event pairs a store-issued identity and timestamp with a
//! payload specific to its `type`. The store is payload-agnostic: it only
//! ever needs `eventId`, `type`, `timestamp`, and (via the serializer) a
//! game identifier extracted from the payload.

use crate::ids::AggregateType;
use chrono::{DateTime, Utc};
use serde::{Serialize, de::DeserializeOwned};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Error returned when constructing an [`EventId`] from an invalid string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("event id cannot be empty")]
pub struct EventIdError;

/// An opaque, store-wide-unique identifier for one event.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EventId(String);

impl EventId {
    /// Construct an event id from an already-trusted, non-empty string.
    ///
    /// # Errors
    ///
    /// Returns [`EventIdError`] if `value` is empty.
    pub fn new(value: impl Into<String>) -> Result<Self, EventIdError> {
        let value = value.into();
        if value.is_empty() {
            return Err(EventIdError);
        }
        Ok(Self(value))
    }

    /// Generate a fresh event id (UUIDv7).
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Borrow the event id's string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for EventId {
    type Error = EventIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EventId> for String {
    fn from(id: EventId) -> Self {
        id.0
    }
}

/// A payload type that can be carried as the body of a domain event.
///
/// This mirrors the teacher workspace's `Event` trait (`event_type`
/// returning a stable, versioned string name) but serializes via JSON
/// rather than `bincode`, since the store's wire format is textual (§6
/// of `SPEC_FULL.md`).
pub trait DomainEventPayload: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// The stable, versioned name of this event kind, e.g. `"GameCreated"`.
    fn event_type(&self) -> &'static str;
}

/// A [`DomainEventPayload`] additionally pinned to one aggregate type.
///
/// Pinning the payload type to an [`AggregateType`] at compile time is what
/// lets a caller build a [`crate::ids::StreamId`] and an event payload that
/// are guaranteed to agree, without a runtime check (§9 "Identifier
/// disjointness" in `spec.md`).
pub trait AggregateEvent: DomainEventPayload {
    /// The aggregate type every instance of this payload type belongs to.
    const AGGREGATE_TYPE: AggregateType;
}

/// A domain event: store-assigned identity and timestamp, plus payload.
#[derive(Clone, Debug)]
pub struct DomainEvent<P> {
    /// Unique event id, assigned by the caller before append.
    pub event_id: EventId,
    /// The moment the event was emitted (not when it was written).
    pub timestamp: DateTime<Utc>,
    /// The event-specific payload.
    pub payload: P,
}

impl<P: DomainEventPayload> DomainEvent<P> {
    /// Construct a new domain event.
    #[must_use]
    pub const fn new(event_id: EventId, timestamp: DateTime<Utc>, payload: P) -> Self {
        Self {
            event_id,
            timestamp,
            payload,
        }
    }

    /// The event type name, delegated to the payload.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        self.payload.event_type()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
    enum TestPayload {
        Created { value: i32 },
    }

    impl DomainEventPayload for TestPayload {
        fn event_type(&self) -> &'static str {
            "TestPayload.Created"
        }
    }

    #[test]
    fn event_id_rejects_empty() {
        assert_eq!(EventId::new(""), Err(EventIdError));
    }

    #[test]
    fn domain_event_exposes_payload_event_type() {
        let event = DomainEvent::new(
            EventId::new("e1").expect("valid"),
            Utc::now(),
            TestPayload::Created { value: 1 },
        );
        assert_eq!(event.event_type(), "TestPayload.Created");
    }
}
