//! Game event types and the event record.
//!
//! Every observable thing the engine does is narrated as a `GameEvent`.
//! The set of event types is closed: listeners subscribe to exactly one
//! type, and tests assert against the dispatched trace.

use serde::{Deserialize, Serialize};

use crate::board::Lane;
use crate::core::{InstanceId, PlayerId};

/// Closed set of event types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    // Match lifecycle
    GameStarted,
    GameEnded,
    TurnStarted,
    TurnEnded,
    RoundStarted,
    RoundEnded,
    PhaseDrawRechargeStarted,
    PhaseDrawRechargeEnded,
    PhaseDeploymentStarted,
    PhaseDeploymentEnded,
    PhaseSkirmishStarted,
    PhaseSkirmishEnded,
    PhaseEndstepStarted,
    PhaseEndstepEnded,

    // Resources and zones
    CardDrawn,
    SupplyCapIncreased,
    SupplyRefilled,
    BatteryGenerated,

    // Board and combat
    UnitDeployed,
    AttackDeclared,
    DamageCalcStarted,
    DamageModified,
    ShieldDamaged,
    HullOrHealthDamaged,
    DamageDealt,
    KillOccurred,
    BaseDamaged,
    HeadshotTriggered,
    PlasmaTagApplied,
    EmpApplied,
    InfectTriggered,
    HijackExecuted,
    StatusApplied,
    StatusExpired,
    StatusRefreshed,

    // Diplomacy
    DiplomacyRelationChanged,
    BetrayerMarked,
    CovenantSchismTriggered,
    CovenantTruceProposed,
    CovenantTruceBroken,
    SurvivalProtocolStarted,
    SurvivalProtocolEnded,
    ResourceAidTransferred,
    TargetLocked,

    // Scoring
    LaneControlUpdated,
    WinConditionMet,
}

/// One narrated occurrence.
///
/// `sequence` is assigned by the bus when the event is enqueued; two
/// matches with the same seed and command history produce identical
/// sequences. The optional fields identify who and where; `values`
/// carries ordered numeric payload whose meaning depends on the type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Bus-assigned, strictly increasing within a match.
    pub sequence: u64,

    /// What happened.
    pub event_type: EventType,

    /// Global turn counter when the event fired.
    pub turn: u32,

    /// Round counter when the event fired.
    pub round: u32,

    /// The player whose turn it was.
    pub active_player: PlayerId,

    /// The player who caused the event.
    pub source_player: Option<PlayerId>,

    /// The player on the receiving end.
    pub target_player: Option<PlayerId>,

    /// The unit that caused the event.
    pub source_unit: Option<InstanceId>,

    /// The unit on the receiving end.
    pub target_unit: Option<InstanceId>,

    /// The lane the event happened in.
    pub lane: Option<Lane>,

    /// Free-form discriminator, e.g. the damage type name.
    pub tag: Option<String>,

    /// Numeric payload; meaning of each index depends on `event_type`.
    pub values: Vec<i64>,
}

impl GameEvent {
    /// Create a new event. The bus overwrites `sequence` at enqueue.
    #[must_use]
    pub fn new(event_type: EventType, turn: u32, round: u32, active_player: PlayerId) -> Self {
        Self {
            sequence: 0,
            event_type,
            turn,
            round,
            active_player,
            source_player: None,
            target_player: None,
            source_unit: None,
            target_unit: None,
            lane: None,
            tag: None,
            values: Vec::new(),
        }
    }

    /// Derive a follow-up event from this one, keeping turn context.
    #[must_use]
    pub fn follow_up(&self, event_type: EventType) -> Self {
        Self::new(event_type, self.turn, self.round, self.active_player)
    }

    /// Set the source player (builder pattern).
    #[must_use]
    pub fn with_source_player(mut self, player: PlayerId) -> Self {
        self.source_player = Some(player);
        self
    }

    /// Set the target player (builder pattern).
    #[must_use]
    pub fn with_target_player(mut self, player: PlayerId) -> Self {
        self.target_player = Some(player);
        self
    }

    /// Set the source unit (builder pattern).
    #[must_use]
    pub fn with_source_unit(mut self, unit: InstanceId) -> Self {
        self.source_unit = Some(unit);
        self
    }

    /// Set the target unit (builder pattern).
    #[must_use]
    pub fn with_target_unit(mut self, unit: InstanceId) -> Self {
        self.target_unit = Some(unit);
        self
    }

    /// Set the lane (builder pattern).
    #[must_use]
    pub fn with_lane(mut self, lane: Lane) -> Self {
        self.lane = Some(lane);
        self
    }

    /// Set the tag (builder pattern).
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Append a numeric value (builder pattern).
    #[must_use]
    pub fn with_value(mut self, value: i64) -> Self {
        self.values.push(value);
        self
    }

    /// Get a value by index, or a default.
    #[must_use]
    pub fn value(&self, index: usize, default: i64) -> i64 {
        self.values.get(index).copied().unwrap_or(default)
    }

    /// Check the tag.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tag.as_deref() == Some(tag)
    }
}
