//! The damage pipeline.
//!
//! Damage resolution runs a fixed, ordered list of pure transform
//! stages over the base damage, then applies the result to the
//! defender's shield and health pools. Stages never mutate anything:
//! each maps `(damage, context, defender) -> damage`, so the pipeline's
//! correctness cannot depend on event-dispatch order.
//!
//! Pipeline narration is published as events: CALC_STARTED, MODIFIED,
//! SHIELD_DAMAGED, HULL_OR_HEALTH_DAMAGED, DAMAGE_DEALT, and
//! KILL_OCCURRED when the hit is lethal.

use serde::{Deserialize, Serialize};

use crate::core::{InstanceId, PlayerId};
use crate::error::Result;
use crate::events::{DeterministicEventBus, EventType, GameEvent};

use super::state::{CombatStateStore, EntityCombatState};

/// How the damage is delivered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DamageType {
    Ballistic,
    Plasma,
    True,
}

impl DamageType {
    /// Stable name used as the event tag.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            DamageType::Ballistic => "BALLISTIC",
            DamageType::Plasma => "PLASMA",
            DamageType::True => "TRUE",
        }
    }
}

/// Everything one damage application needs to know.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DamageContext {
    pub attacker_unit: InstanceId,
    pub attacker_player: PlayerId,
    pub defender_unit: InstanceId,
    pub defender_player: PlayerId,
    pub base_damage: i32,
    pub damage_type: DamageType,
    /// Strike delivered from orbit; amplified against marked targets.
    pub orbital_strike: bool,
    /// Ordnance ignores cover.
    pub ordnance: bool,
    /// Late multiplier (headshots, combos). Values below 1 mean "none".
    pub final_multiplier: i32,
    /// Bypass the shield pool entirely.
    pub ignore_shield: bool,
}

impl DamageContext {
    /// Create a context with no modifiers.
    #[must_use]
    pub fn new(
        attacker_unit: InstanceId,
        attacker_player: PlayerId,
        defender_unit: InstanceId,
        defender_player: PlayerId,
        base_damage: i32,
        damage_type: DamageType,
    ) -> Self {
        Self {
            attacker_unit,
            attacker_player,
            defender_unit,
            defender_player,
            base_damage,
            damage_type,
            orbital_strike: false,
            ordnance: false,
            final_multiplier: 1,
            ignore_shield: false,
        }
    }

    /// Mark as an orbital strike (builder pattern).
    #[must_use]
    pub fn with_orbital_strike(mut self) -> Self {
        self.orbital_strike = true;
        self
    }

    /// Mark as ordnance (builder pattern).
    #[must_use]
    pub fn with_ordnance(mut self) -> Self {
        self.ordnance = true;
        self
    }

    /// Set the late multiplier (builder pattern).
    #[must_use]
    pub fn with_multiplier(mut self, multiplier: i32) -> Self {
        self.final_multiplier = multiplier;
        self
    }

    /// Bypass shields (builder pattern).
    #[must_use]
    pub fn with_ignore_shield(mut self) -> Self {
        self.ignore_shield = true;
        self
    }
}

/// Outcome of one damage application.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageResult {
    /// Damage after every transform stage.
    pub final_damage: i32,
    /// Portion soaked by shields.
    pub shield_damage: i32,
    /// Portion dealt to health.
    pub health_damage: i32,
    /// Defender's health reached zero.
    pub lethal: bool,
}

/// One pure stage of the pipeline.
pub trait DamageTransform: Send + Sync {
    /// Stage name, for logs.
    fn name(&self) -> &'static str;

    /// Map incoming damage to outgoing damage. Must not mutate anything.
    fn apply(&self, damage: i32, ctx: &DamageContext, defender: &EntityCombatState) -> i32;
}

/// Per-type floors: plasma always deals at least 1.
struct TypeFloor;

impl DamageTransform for TypeFloor {
    fn name(&self) -> &'static str {
        "type-floor"
    }

    fn apply(&self, damage: i32, ctx: &DamageContext, _: &EntityCombatState) -> i32 {
        match ctx.damage_type {
            DamageType::Plasma => damage.max(1),
            DamageType::Ballistic | DamageType::True => damage.max(0),
        }
    }
}

/// Marked targets take +1.
struct MarkBonus;

impl DamageTransform for MarkBonus {
    fn name(&self) -> &'static str {
        "mark-bonus"
    }

    fn apply(&self, damage: i32, _: &DamageContext, defender: &EntityCombatState) -> i32 {
        if defender.marked() {
            damage + 1
        } else {
            damage
        }
    }
}

/// Suppressed defenders take 1 less, floored at zero.
struct SuppressionPenalty;

impl DamageTransform for SuppressionPenalty {
    fn name(&self) -> &'static str {
        "suppression"
    }

    fn apply(&self, damage: i32, _: &DamageContext, defender: &EntityCombatState) -> i32 {
        if defender.suppressed() {
            (damage - 1).max(0)
        } else {
            damage
        }
    }
}

/// Cover soaks damage point-for-point unless the hit is ordnance.
struct CoverMitigation;

impl DamageTransform for CoverMitigation {
    fn name(&self) -> &'static str {
        "cover"
    }

    fn apply(&self, damage: i32, ctx: &DamageContext, defender: &EntityCombatState) -> i32 {
        if ctx.ordnance {
            damage
        } else {
            (damage - defender.cover_value()).max(0)
        }
    }
}

/// Orbital strikes against marked targets hit 1.5x, floored.
struct OrbitalAmplifier;

impl DamageTransform for OrbitalAmplifier {
    fn name(&self) -> &'static str {
        "orbital"
    }

    fn apply(&self, damage: i32, ctx: &DamageContext, defender: &EntityCombatState) -> i32 {
        if ctx.orbital_strike && defender.marked() {
            damage + damage / 2
        } else {
            damage
        }
    }
}

/// The late multiplier, applied last.
struct FinalMultiplier;

impl DamageTransform for FinalMultiplier {
    fn name(&self) -> &'static str {
        "multiplier"
    }

    fn apply(&self, damage: i32, ctx: &DamageContext, _: &EntityCombatState) -> i32 {
        (damage * ctx.final_multiplier.max(1)).max(0)
    }
}

/// Runs the transform stages and applies the result to the defender.
pub struct DamageResolver {
    stages: Vec<Box<dyn DamageTransform>>,
}

impl Default for DamageResolver {
    fn default() -> Self {
        Self {
            stages: vec![
                Box::new(TypeFloor),
                Box::new(MarkBonus),
                Box::new(SuppressionPenalty),
                Box::new(CoverMitigation),
                Box::new(OrbitalAmplifier),
                Box::new(FinalMultiplier),
            ],
        }
    }
}

impl DamageResolver {
    /// The standard pipeline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a custom stage after the standard ones.
    #[must_use]
    pub fn with_stage(mut self, stage: Box<dyn DamageTransform>) -> Self {
        self.stages.push(stage);
        self
    }

    /// Resolve one damage application against the defender.
    ///
    /// Publishes the pipeline narration to the bus; the caller drains
    /// the queue afterwards. Fails only when the defender has no combat
    /// record, before any mutation.
    pub fn resolve(
        &self,
        ctx: &DamageContext,
        combat: &mut CombatStateStore,
        bus: &mut DeterministicEventBus,
        turn: u32,
        round: u32,
        active: PlayerId,
    ) -> Result<DamageResult> {
        let defender_before = *combat.get(ctx.defender_unit)?;

        bus.publish(
            self.pipeline_event(ctx, turn, round, active, EventType::DamageCalcStarted)
                .with_value(i64::from(ctx.base_damage)),
        );

        let mut damage = ctx.base_damage;
        for stage in &self.stages {
            let next = stage.apply(damage, ctx, &defender_before);
            if next != damage {
                log::trace!("stage {} adjusted damage {} -> {}", stage.name(), damage, next);
            }
            damage = next;
        }
        damage = damage.max(0);

        bus.publish(
            self.pipeline_event(ctx, turn, round, active, EventType::DamageModified)
                .with_value(i64::from(damage)),
        );

        let defender = combat.get_mut(ctx.defender_unit)?;
        let (shield_damage, overflow) = if ctx.ignore_shield {
            (0, damage)
        } else {
            let before = defender.current_shield();
            let overflow = defender.apply_shield_damage(damage);
            (before - defender.current_shield(), overflow)
        };

        bus.publish(
            self.pipeline_event(ctx, turn, round, active, EventType::ShieldDamaged)
                .with_value(i64::from(shield_damage))
                .with_value(i64::from(overflow)),
        );

        let defender = combat.get_mut(ctx.defender_unit)?;
        let health_damage = defender.apply_health_damage(overflow);
        let lethal = defender.is_dead();

        bus.publish(
            self.pipeline_event(ctx, turn, round, active, EventType::HullOrHealthDamaged)
                .with_value(i64::from(health_damage))
                .with_value(i64::from(lethal)),
        );

        bus.publish(
            self.pipeline_event(ctx, turn, round, active, EventType::DamageDealt)
                .with_value(i64::from(damage)),
        );

        if lethal {
            bus.publish(self.pipeline_event(ctx, turn, round, active, EventType::KillOccurred));
        }

        Ok(DamageResult {
            final_damage: damage,
            shield_damage,
            health_damage,
            lethal,
        })
    }

    fn pipeline_event(
        &self,
        ctx: &DamageContext,
        turn: u32,
        round: u32,
        active: PlayerId,
        ty: EventType,
    ) -> GameEvent {
        GameEvent::new(ty, turn, round, active)
            .with_source_player(ctx.attacker_player)
            .with_target_player(ctx.defender_player)
            .with_source_unit(ctx.attacker_unit)
            .with_target_unit(ctx.defender_unit)
            .with_tag(ctx.damage_type.name())
    }
}
