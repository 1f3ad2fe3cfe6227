//! Error taxonomy shared by the event store and the snapshot store (§7).

use crate::ids::StreamId;
use crate::stream::Version;
use thiserror::Error;

/// The full error taxonomy for event-store and snapshot-store operations.
///
/// Parameter and serialization errors are raised before any I/O and leave
/// store state unchanged. Concurrency errors leave store state unchanged.
/// Backend errors during a write abort the whole batch; during a read they
/// abort that read. No variant swallows its cause.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A precondition on arguments failed (§4.4.2 preconditions 1-4, §4.5
    /// invariants).
    #[error("invalid parameter: {0}")]
    ParameterError(String),

    /// Encode or decode failed, or an essential property (`eventId`,
    /// `type`) would have been lost.
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// `expectedVersion` did not match the stream's current version.
    #[error(
        "concurrency conflict on stream {stream_id}: expected version {expected}, found {actual}"
    )]
    ConcurrencyError {
        /// The stream the append was attempted against.
        stream_id: StreamId,
        /// The version the caller expected the stream to be at.
        expected: Version,
        /// The stream's actual current version.
        actual: Version,
    },

    /// The backing store could not be reached or a connection could not be
    /// acquired.
    #[error("backend connection error: {0}")]
    BackendConnectionError(String),

    /// The backend's schema could not be created or upgraded.
    #[error("backend schema error: {0}")]
    BackendSchemaError(String),

    /// Any other backend I/O failure, wrapping the original cause.
    #[error("backend operation error: {0}")]
    BackendOperationError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    /// Build a [`StoreError::ConcurrencyError`] naming both the expected and
    /// actual stream version, as required by §7's user-visible behavior.
    #[must_use]
    pub const fn concurrency(stream_id: StreamId, expected: Version, actual: Version) -> Self {
        Self::ConcurrencyError {
            stream_id,
            expected,
            actual,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::GameId;

    #[test]
    fn concurrency_error_names_stream_expected_and_actual() {
        let error = StoreError::concurrency(
            StreamId::from(GameId::new("G1").expect("valid")),
            Version::new(0),
            Version::new(2),
        );
        let message = error.to_string();
        assert!(message.contains("G1"));
        assert!(message.contains("expected version 0"));
        assert!(message.contains("found 2"));
    }
}
