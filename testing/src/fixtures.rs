//! Sample domain event payloads used to drive the contract harness and as
//! examples for integrators wiring their own payload types.
//!
//! Each aggregate gets one tagged enum (`GameEvent`, `TeamLineupEvent`,
//! `InningStateEvent`) rather than one struct per event type, per the
//! "Polymorphic events" design note: the store stays payload-agnostic, but
//! a concrete integrator dispatches on the tag with a `match`, not dynamic
//! dispatch. These are deliberately small — just enough variants to drive
//! the literal scenarios S1-S6 — and are not meant as the application's
//! real domain model (that is explicitly out of scope).
//!
//! On an enum, `#[serde(rename_all = "camelCase")]` renames variants only;
//! struct-variant fields need the separate `rename_all_fields` attribute,
//! or `game_id` would serialize as `"game_id"` and `extract_game_id` would
//! never find it under its `gameId` top-level lookup.

use event_store_core::event::{AggregateEvent, DomainEventPayload};
use event_store_core::ids::{AggregateType, GameId, InningStateId, TeamLineupId};
use serde::{Deserialize, Serialize};

/// Events emitted by the Game aggregate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "eventType", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum GameEvent {
    /// A new game was created.
    GameCreated {
        /// The game this event belongs to (also the stream's own identity).
        game_id: GameId,
        /// Home team's display name.
        home_team: String,
        /// Away team's display name.
        away_team: String,
    },
    /// A completed at-bat was recorded against a game.
    AtBatCompleted {
        /// The game this at-bat belongs to.
        game_id: GameId,
        /// Name of the batter.
        batter: String,
        /// Outcome description, e.g. `"single"`, `"strikeout"`.
        outcome: String,
    },
    /// A game reached its final score.
    GameCompleted {
        /// The game this event belongs to.
        game_id: GameId,
        /// Final home-team score.
        final_home_score: u32,
        /// Final away-team score.
        final_away_score: u32,
    },
}

impl DomainEventPayload for GameEvent {
    fn event_type(&self) -> &'static str {
        match self {
            Self::GameCreated { .. } => "GameCreated",
            Self::AtBatCompleted { .. } => "AtBatCompleted",
            Self::GameCompleted { .. } => "GameCompleted",
        }
    }
}

impl AggregateEvent for GameEvent {
    const AGGREGATE_TYPE: AggregateType = AggregateType::Game;
}

/// Events emitted by the TeamLineup aggregate.
///
/// `game_id` is the cross-aggregate correlator on every variant: the
/// `TeamLineup` stream's own identity is `team_lineup_id`, but every stored
/// event on that stream still carries the owning game's id so
/// `getGameEvents`/`getEventsByGameId` can find it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "eventType", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum TeamLineupEvent {
    /// A team's lineup was created for a game.
    TeamLineupCreated {
        /// This lineup's own identity.
        team_lineup_id: TeamLineupId,
        /// The game this lineup belongs to.
        game_id: GameId,
        /// Batting order, top to bottom.
        batting_order: Vec<String>,
    },
    /// A player was added to an existing lineup.
    PlayerAddedToLineup {
        /// This lineup's own identity.
        team_lineup_id: TeamLineupId,
        /// The game this lineup belongs to.
        game_id: GameId,
        /// Name of the added player.
        player_name: String,
        /// 1-based batting-order position.
        batting_position: u32,
    },
}

impl DomainEventPayload for TeamLineupEvent {
    fn event_type(&self) -> &'static str {
        match self {
            Self::TeamLineupCreated { .. } => "TeamLineupCreated",
            Self::PlayerAddedToLineup { .. } => "PlayerAddedToLineup",
        }
    }
}

impl AggregateEvent for TeamLineupEvent {
    const AGGREGATE_TYPE: AggregateType = AggregateType::TeamLineup;
}

/// Events emitted by the InningState aggregate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "eventType", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum InningStateEvent {
    /// An inning's state tracking was created for a game.
    InningStateCreated {
        /// This inning state's own identity.
        inning_state_id: InningStateId,
        /// The game this inning belongs to.
        game_id: GameId,
        /// 1-based inning number.
        inning_number: u32,
    },
    /// An inning was closed out and play advanced to the next one.
    InningAdvanced {
        /// This inning state's own identity.
        inning_state_id: InningStateId,
        /// The game this inning belongs to.
        game_id: GameId,
        /// The inning number play advanced to.
        next_inning_number: u32,
    },
}

impl DomainEventPayload for InningStateEvent {
    fn event_type(&self) -> &'static str {
        match self {
            Self::InningStateCreated { .. } => "InningStateCreated",
            Self::InningAdvanced { .. } => "InningAdvanced",
        }
    }
}

impl AggregateEvent for InningStateEvent {
    const AGGREGATE_TYPE: AggregateType = AggregateType::InningState;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_created_is_pinned_to_the_game_aggregate() {
        assert_eq!(GameEvent::AGGREGATE_TYPE, AggregateType::Game);
    }

    #[test]
    fn team_lineup_created_is_pinned_to_the_team_lineup_aggregate() {
        assert_eq!(TeamLineupEvent::AGGREGATE_TYPE, AggregateType::TeamLineup);
    }

    #[test]
    fn inning_state_created_is_pinned_to_the_inning_state_aggregate() {
        assert_eq!(InningStateEvent::AGGREGATE_TYPE, AggregateType::InningState);
    }

    #[test]
    fn event_type_dispatches_by_variant() {
        let event = GameEvent::AtBatCompleted {
            game_id: GameId::new("G1").expect("valid"),
            batter: "Player".to_string(),
            outcome: "single".to_string(),
        };
        assert_eq!(event.event_type(), "AtBatCompleted");
    }
}
