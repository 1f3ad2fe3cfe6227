//! Aggregate identifiers and the closed set of aggregate-type tags.
//!
//! Three disjoint identifier kinds exist: [`GameId`], [`TeamLineupId`], and
//! [`InningStateId`]. They share an identical wire shape (a non-empty
//! string) but are kept distinct in the type system so a [`StreamId`] built
//! for one aggregate can never be mistaken for another's at a call site.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Error returned when constructing an identifier from an invalid string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("identifier cannot be empty")]
pub struct IdError;

macro_rules! aggregate_id {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Construct an identifier from an already-trusted, non-empty string.
            ///
            /// # Errors
            ///
            /// Returns [`IdError`] if `value` is empty.
            pub fn new(value: impl Into<String>) -> Result<Self, IdError> {
                let value = value.into();
                if value.is_empty() {
                    return Err(IdError);
                }
                Ok(Self(value))
            }

            /// Generate a fresh identifier using a UUIDv7 (time-ordered, negligible
            /// collision probability at application scale).
            #[must_use]
            pub fn generate() -> Self {
                Self(Uuid::now_v7().to_string())
            }

            /// Borrow the identifier's string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the identifier, returning its inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

aggregate_id!(GameId, "Identifies a single softball game's Game aggregate stream.");
aggregate_id!(
    TeamLineupId,
    "Identifies a single TeamLineup aggregate stream."
);
aggregate_id!(
    InningStateId,
    "Identifies a single InningState aggregate stream."
);

/// The closed set of aggregate kinds the store knows how to tag streams with.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum AggregateType {
    /// The Game aggregate.
    Game,
    /// The TeamLineup aggregate.
    TeamLineup,
    /// The InningState aggregate.
    InningState,
}

impl fmt::Display for AggregateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Game => "Game",
            Self::TeamLineup => "TeamLineup",
            Self::InningState => "InningState",
        };
        write!(f, "{s}")
    }
}

/// The union of the three aggregate identifier kinds.
///
/// A `StreamId` both names a stream and, via its variant, carries that
/// stream's [`AggregateType`] — there is no way to construct a `StreamId`
/// whose identifier and aggregate type disagree.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum StreamId {
    /// A Game aggregate's stream.
    Game(GameId),
    /// A TeamLineup aggregate's stream.
    TeamLineup(TeamLineupId),
    /// An InningState aggregate's stream.
    InningState(InningStateId),
}

impl StreamId {
    /// The string value of the owning aggregate identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Game(id) => id.as_str(),
            Self::TeamLineup(id) => id.as_str(),
            Self::InningState(id) => id.as_str(),
        }
    }

    /// The aggregate type this stream belongs to.
    #[must_use]
    pub const fn aggregate_type(&self) -> AggregateType {
        match self {
            Self::Game(_) => AggregateType::Game,
            Self::TeamLineup(_) => AggregateType::TeamLineup,
            Self::InningState(_) => AggregateType::InningState,
        }
    }
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<GameId> for StreamId {
    fn from(id: GameId) -> Self {
        Self::Game(id)
    }
}

impl From<TeamLineupId> for StreamId {
    fn from(id: TeamLineupId) -> Self {
        Self::TeamLineup(id)
    }
}

impl From<InningStateId> for StreamId {
    fn from(id: InningStateId) -> Self {
        Self::InningState(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_empty_string() {
        assert_eq!(GameId::new(""), Err(IdError));
    }

    #[test]
    fn new_accepts_non_empty_string() {
        let id = GameId::new("G1").expect("non-empty id should construct");
        assert_eq!(id.as_str(), "G1");
    }

    #[test]
    fn generate_produces_non_empty_distinct_ids() {
        let a = GameId::generate();
        let b = GameId::generate();
        assert_ne!(a, b);
        assert!(!a.as_str().is_empty());
    }

    #[test]
    fn stream_id_carries_aggregate_type() {
        let stream = StreamId::from(GameId::new("G1").expect("valid"));
        assert_eq!(stream.aggregate_type(), AggregateType::Game);
        assert_eq!(stream.as_str(), "G1");
    }

    #[test]
    fn display_matches_as_str() {
        let id = TeamLineupId::new("T1").expect("valid");
        assert_eq!(format!("{id}"), "T1");
    }

    #[test]
    fn parse_from_str() {
        let id: InningStateId = "I1".parse().expect("parse should succeed");
        assert_eq!(id.as_str(), "I1");
    }
}
