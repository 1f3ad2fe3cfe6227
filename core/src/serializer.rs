//! The serializer (C3): bidirectional mapping between a domain event and its
//! textual payload, plus the game-id correlator extraction used by
//! cross-aggregate queries.
//!
//! The wire format is UTF-8 JSON. Dates round-trip as ISO-8601 strings
//! because `chrono::DateTime<Utc>`'s `serde` implementation already
//! produces them; nested structures of arbitrary depth are permitted
//! because `serde_json::Value` is itself a tree. Rust's type system makes
//! "functions, symbols, and cycles" unrepresentable in anything that
//! derives `Serialize`, so the one realistic way encoding fails is a
//! hand-written `Serialize`/`Deserialize` impl that itself errs (exercised
//! in tests by [`NonSerializable`]) — `serde_path_to_error` is used so that
//! failure, like any other encode/decode failure, names the offending
//! field path rather than just "serialization failed".

use crate::event::{DomainEvent, DomainEventPayload, EventId};
use crate::ids::GameId;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::StoreError;

/// The schema version of the payload encoding this serializer produces.
///
/// `spec.md` §4.4.2 step 8 fixes this at `1` for every append; a future
/// schema change would introduce `eventVersion = 2` alongside a decode path
/// that still understands `1`.
pub const CURRENT_EVENT_VERSION: u32 = 1;

/// The encoded form of a domain event, ready to hand to [`crate::event_store::EventStore::append`].
///
/// This is the dyn-safe envelope the store trait operates on — the
/// generic encode step (this module) happens before the call, the same
/// way the teacher workspace's `SerializedEvent::from_event` produces a
/// type-erased envelope ahead of `EventStore::append_events`.
#[derive(Clone, Debug)]
pub struct EncodedEvent {
    /// Copied from the domain event; unique store-wide.
    pub event_id: EventId,
    /// Copied from the domain event.
    pub event_type: String,
    /// The serialized JSON payload.
    pub event_data: String,
    /// Schema version of the payload encoding.
    pub event_version: u32,
    /// Emission time of the domain event.
    pub timestamp: DateTime<Utc>,
    /// The game identifier extracted from the payload, if any.
    pub game_id: Option<GameId>,
    /// Optional provenance carried through to the stored event's metadata.
    pub provenance: Provenance,
}

/// Optional provenance fields carried from the caller into stored metadata.
#[derive(Clone, Debug, Default)]
pub struct Provenance {
    /// Links related events across aggregates.
    pub correlation_id: Option<String>,
    /// Links a cause event to the event(s) it produced.
    pub causation_id: Option<String>,
    /// The user who triggered the event, if known.
    pub user_id: Option<String>,
}

/// Encode a domain event into its wire form, extracting the game-id
/// correlator from the payload along the way.
///
/// # Errors
///
/// Returns [`StoreError::SerializationError`] if the payload cannot be
/// serialized, naming the offending field path when `serde_json` can
/// identify one.
pub fn encode_event<P: DomainEventPayload>(
    event: &DomainEvent<P>,
    provenance: Provenance,
) -> Result<EncodedEvent, StoreError> {
    let value = serde_path_to_error::serialize(&event.payload, serde_json::value::Serializer)
        .map_err(|err| {
            StoreError::SerializationError(format!(
                "failed to serialize event '{}' at path '{}': {}",
                event.event_id,
                err.path(),
                err.inner()
            ))
        })?;

    let game_id = extract_game_id(&value);

    let event_data = serde_json::to_string(&value).map_err(|err| {
        StoreError::SerializationError(format!(
            "failed to render event '{}' as JSON text: {err}",
            event.event_id
        ))
    })?;

    Ok(EncodedEvent {
        event_id: event.event_id.clone(),
        event_type: event.event_type().to_string(),
        event_data,
        event_version: CURRENT_EVENT_VERSION,
        timestamp: event.timestamp,
        game_id,
        provenance,
    })
}

/// Decode a stored event's JSON payload back into a concrete payload type.
///
/// # Errors
///
/// Returns [`StoreError::SerializationError`] if `event_data` is malformed
/// JSON or does not match `P`'s shape, naming the offending field path when
/// `serde_json` can identify one.
pub fn decode_payload<P: DeserializeOwned>(event_data: &str) -> Result<P, StoreError> {
    let mut deserializer = serde_json::Deserializer::from_str(event_data);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|err| {
        StoreError::SerializationError(format!(
            "failed to decode event payload at path '{}': {}",
            err.path(),
            err.inner()
        ))
    })
}

/// Extract the game-id correlator from a serialized event payload.
///
/// Search order, per `spec.md` §4.3:
///
/// 1. a top-level `gameId` field (string, or object exposing a `value` field);
/// 2. failing that, a top-level `aggregateId` field, likewise;
/// 3. failing that, any top-level field whose name contains the substring
///    `gameid` (case-insensitive), likewise.
///
/// The third step is a best-effort heuristic (§9 Open Question (a)); its
/// use is logged so callers can tell when extraction fell back to it.
#[must_use]
pub fn extract_game_id(value: &Value) -> Option<GameId> {
    let object = value.as_object()?;

    if let Some(found) = object.get("gameId").and_then(string_or_value_field) {
        return GameId::new(found).ok();
    }

    if let Some(found) = object.get("aggregateId").and_then(string_or_value_field) {
        return GameId::new(found).ok();
    }

    for (key, candidate) in object {
        if key.to_lowercase().contains("gameid") {
            if let Some(found) = string_or_value_field(candidate) {
                tracing::debug!(
                    field = %key,
                    "game id extracted via best-effort 'gameid' substring fallback"
                );
                return GameId::new(found).ok();
            }
        }
    }

    None
}

/// A field value is either a bare string, or an object exposing a `value`
/// field (the shape a typed identifier like `GameId` serializes to is a
/// plain string via `#[serde(into = "String")]`, but other systems this
/// store might interoperate with may wrap it).
fn string_or_value_field(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => map.get("value").and_then(|v| v.as_str()).map(String::from),
        _ => None,
    }
}

/// A payload whose `Serialize` implementation always fails, used to
/// exercise the "non-serializable event is rejected" contract test (§8 S6).
#[derive(Debug)]
pub struct NonSerializable;

impl serde::Serialize for NonSerializable {
    fn serialize<S>(&self, _serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        Err(serde::ser::Error::custom(
            "payload.cb contains a non-serializable function reference",
        ))
    }
}

impl<'de> serde::Deserialize<'de> for NonSerializable {
    fn deserialize<D>(_deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Err(serde::de::Error::custom("NonSerializable cannot be decoded"))
    }
}

impl DomainEventPayload for NonSerializable {
    fn event_type(&self) -> &'static str {
        "NonSerializable"
    }
}
