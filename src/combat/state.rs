//! Per-unit shield, health, and battlefield modifiers.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::InstanceId;
use crate::error::{EngineError, Result};

/// Mutable combat numbers for one unit on the battlefield.
///
/// Created when the unit deploys, removed when it dies. Shields absorb
/// damage before health; overflow spills into health.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityCombatState {
    current_shield: i32,
    current_health: i32,
    cover_value: i32,
    marked: bool,
    suppressed: bool,
}

impl EntityCombatState {
    /// Create a fresh state at full shield and health.
    #[must_use]
    pub fn new(shield: i32, health: i32) -> Self {
        Self {
            current_shield: shield,
            current_health: health,
            cover_value: 0,
            marked: false,
            suppressed: false,
        }
    }

    #[must_use]
    pub fn current_shield(&self) -> i32 {
        self.current_shield
    }

    #[must_use]
    pub fn current_health(&self) -> i32 {
        self.current_health
    }

    #[must_use]
    pub fn cover_value(&self) -> i32 {
        self.cover_value
    }

    #[must_use]
    pub fn marked(&self) -> bool {
        self.marked
    }

    #[must_use]
    pub fn suppressed(&self) -> bool {
        self.suppressed
    }

    /// Set cover, clamped at zero.
    pub fn set_cover_value(&mut self, cover: i32) {
        self.cover_value = cover.max(0);
    }

    pub fn set_marked(&mut self, marked: bool) {
        self.marked = marked;
    }

    pub fn set_suppressed(&mut self, suppressed: bool) {
        self.suppressed = suppressed;
    }

    /// Soak damage with shields. Returns the overflow that reaches health.
    pub fn apply_shield_damage(&mut self, damage: i32) -> i32 {
        let effective = damage.max(0);
        let absorbed = self.current_shield.min(effective);
        self.current_shield -= absorbed;
        effective - absorbed
    }

    /// Apply damage to health, flooring at zero. Returns damage dealt.
    pub fn apply_health_damage(&mut self, damage: i32) -> i32 {
        let effective = damage.max(0);
        let before = self.current_health;
        self.current_health = (self.current_health - effective).max(0);
        before - self.current_health
    }

    /// Restore shields to the cap.
    pub fn recharge_shield_to(&mut self, shield_cap: i32) {
        self.current_shield = shield_cap.max(0);
    }

    /// Heal health up to the cap. Returns the amount actually healed.
    pub fn heal_health(&mut self, amount: i32, health_cap: i32) -> i32 {
        let effective = amount.max(0);
        let before = self.current_health;
        self.current_health = (self.current_health + effective).min(health_cap.max(0));
        self.current_health - before
    }

    /// Dead when health reaches zero.
    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.current_health <= 0
    }
}

/// Combat states for every unit on the battlefield.
///
/// A battlefield unit without a combat record is an engine bug, so the
/// accessors return `MissingCombatState` instead of panicking.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CombatStateStore {
    states: FxHashMap<InstanceId, EntityCombatState>,
}

impl CombatStateStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert (or replace) a unit's combat state.
    pub fn put(&mut self, unit: InstanceId, state: EntityCombatState) {
        self.states.insert(unit, state);
    }

    /// Look up a unit's combat state.
    pub fn get(&self, unit: InstanceId) -> Result<&EntityCombatState> {
        self.states
            .get(&unit)
            .ok_or(EngineError::MissingCombatState { unit })
    }

    /// Look up a unit's combat state mutably.
    pub fn get_mut(&mut self, unit: InstanceId) -> Result<&mut EntityCombatState> {
        self.states
            .get_mut(&unit)
            .ok_or(EngineError::MissingCombatState { unit })
    }

    /// Whether the unit has a combat record.
    #[must_use]
    pub fn contains(&self, unit: InstanceId) -> bool {
        self.states.contains_key(&unit)
    }

    /// Drop a unit's combat state.
    pub fn remove(&mut self, unit: InstanceId) -> Option<EntityCombatState> {
        self.states.remove(&unit)
    }
}
