//! Engine error types.
//!
//! Every fallible operation on a match returns `Result<_, EngineError>`.
//! Validation failures never leave partial mutations behind: handlers
//! check every precondition before touching state.

use thiserror::Error;

use crate::board::Lane;
use crate::catalog::CardId;
use crate::core::{InstanceId, PlayerId};
use crate::engine::{GamePhase, MatchStatus};

/// Convenience alias used throughout the engine.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors produced by match operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The match is not in a status that permits the operation.
    #[error("match is {actual:?}, operation requires {required:?}")]
    WrongStatus {
        required: MatchStatus,
        actual: MatchStatus,
    },

    /// The operation is not legal in the current phase.
    #[error("operation not legal in phase {actual:?}")]
    WrongPhase { actual: GamePhase },

    /// The acting player does not hold the turn.
    #[error("{player} is not the active player")]
    NotActivePlayer { player: PlayerId },

    /// The named card instance is not in the player's hand.
    #[error("unit {unit} is not in {player}'s hand")]
    NotInHand { player: PlayerId, unit: InstanceId },

    /// The card cannot be placed on the battlefield.
    #[error("card {card} is not a deployable type")]
    NotDeployable { card: CardId },

    /// The player cannot pay the cost.
    #[error("{player} needs {required} supply, has {available}")]
    InsufficientResources {
        player: PlayerId,
        required: i32,
        available: i32,
    },

    /// The target row in the target lane is full.
    #[error("no space in lane {lane:?} for {player}")]
    CapacityExceeded { player: PlayerId, lane: Lane },

    /// No unit with this instance id is on the battlefield.
    #[error("unit {unit} is not on the battlefield")]
    UnknownUnit { unit: InstanceId },

    /// Attacker and defender are not opponents.
    ///
    /// The acting seat is named `actor`: a field called `source` would
    /// be picked up by thiserror as the error's cause.
    #[error("{actor} and {target} are not opponents")]
    NotOpponent { actor: PlayerId, target: PlayerId },

    /// A diplomacy rule forbids this target.
    #[error("{actor} may not target {target}")]
    TargetProtected { actor: PlayerId, target: PlayerId },

    /// Attacker and defender must share a lane.
    #[error("attacker and defender are in different lanes")]
    SameLaneRequired,

    /// The unit has already attacked this turn.
    #[error("unit {unit} has already attacked this turn")]
    AlreadyAttacked { unit: InstanceId },

    /// The unit was deployed this turn and cannot act yet.
    #[error("unit {unit} was deployed this turn")]
    SummoningSickness { unit: InstanceId },

    /// An EMP lock prevents the unit from acting.
    #[error("unit {unit} is disabled until turn {until}")]
    AttackSuppressed { unit: InstanceId, until: u32 },

    /// A backline unit without reach tried to strike past its frontline.
    #[error("backline unit {unit} cannot attack without reach")]
    FrontlineFirst { unit: InstanceId },

    /// The unit has no attack value.
    #[error("unit {unit} has no attack value")]
    NoAttackValue { unit: InstanceId },

    /// Enemy units in the lane guard the base.
    #[error("lane {lane:?} is guarded, the base cannot be struck")]
    BaseGuarded { lane: Lane },

    /// The acting unit lacks a required keyword.
    #[error("unit {unit} lacks the required keyword")]
    MissingKeyword { unit: InstanceId },

    /// The target is not a vehicle.
    #[error("unit {unit} is not a vehicle")]
    NotVehicle { unit: InstanceId },

    /// Battery-to-supply conversion was already used this turn.
    #[error("{player} already converted battery this turn")]
    BatteryAlreadyConverted { player: PlayerId },

    /// The card id is not in the catalog.
    #[error("card {card} is not in the catalog")]
    UnknownCard { card: CardId },

    /// A battlefield unit has no combat record. Indicates an engine bug.
    #[error("unit {unit} has no combat state")]
    MissingCombatState { unit: InstanceId },

    /// Match construction was given inconsistent input.
    #[error("invalid match setup: {reason}")]
    InvalidSetup { reason: String },
}
