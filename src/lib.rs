//! # lanewar
//!
//! A deterministic match engine for a lane-based tactical card game.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: A match takes one seed at construction; the same
//!    seed plus the same command sequence replays to a byte-identical
//!    event trace. All randomness flows through `MatchRng`, all scans
//!    walk fixed orders.
//!
//! 2. **Validate, Then Mutate**: Every operation checks all of its
//!    preconditions before the first mutation. A rejected command never
//!    leaves partial state behind.
//!
//! 3. **Events Narrate, Rules Decide**: Listeners on the event bus react
//!    to what happened (diplomacy shifts, resource aid) but combat math
//!    itself runs through pure transform stages whose result cannot
//!    depend on dispatch order.
//!
//! ## Modules
//!
//! - `core`: Seat/team/instance ids, the seeded RNG
//! - `catalog`: Static card data, decks, factions
//! - `board`: The three-lane battlefield
//! - `player`: Per-seat ledgers (resources, base health, zones)
//! - `combat`: Live unit state, the damage pipeline, turn-tracking flags
//! - `events`: The deterministic event bus
//! - `diplomacy`: Relations between seats and their event-driven shifts
//! - `engine`: Match setup, phase handlers, win evaluation, the facade
//! - `snapshot`: Serializable public view of a match

pub mod board;
pub mod catalog;
pub mod combat;
pub mod core;
pub mod diplomacy;
pub mod engine;
pub mod error;
pub mod events;
pub mod player;
pub mod snapshot;

// Re-export commonly used types
pub use crate::core::{InstanceId, MatchRng, MatchRngState, PlayerId, PlayerMap, TeamId};

pub use crate::board::{Battlefield, Lane, Row, UnitInstance, ROW_CAPACITY};

pub use crate::catalog::{CardCatalog, CardDef, CardId, CardType, Cost, DeckDef, Faction, Keyword, Stats};

pub use crate::combat::{DamageResult, DamageType, EntityCombatState, UnitStatus};

pub use crate::events::{DeterministicEventBus, EventListener, EventSink, EventType, GameEvent};

pub use crate::diplomacy::{DiplomacyRelation, EventReactionRegistry};

pub use crate::engine::{
    GameMode, GamePhase, MatchBuilder, MatchState, MatchStatus, VictoryReason,
};

pub use crate::error::{EngineError, Result};

pub use crate::snapshot::MatchSnapshot;
