//! Per-unit turn-tracking flags.
//!
//! Statuses remember *when* things happened to a unit (in global turn
//! indices) so the rules can ask questions like "was this unit damaged
//! by an opponent last turn?" without event replay.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::{InstanceId, PlayerId};

/// Turn-indexed flags for one unit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitStatus {
    /// Turn the unit entered the battlefield.
    pub summoned_turn: Option<u32>,
    /// Turn the unit was last hit by plasma damage.
    pub plasma_tagged_turn: Option<u32>,
    /// Turn the unit last benefited from the ballistic-after-plasma combo.
    pub noob_combo_turn: Option<u32>,
    /// Turn the unit last attacked.
    pub attacked_turn: Option<u32>,
    /// Turn the unit was last damaged.
    pub damaged_turn: Option<u32>,
    /// Who dealt that damage.
    pub damaged_by: Option<PlayerId>,
    /// EMP lock: the unit may not attack before this turn.
    pub cannot_attack_until: Option<u32>,
    /// EMP lock: the unit may not move before this turn.
    pub cannot_move_until: Option<u32>,
    /// Active camouflage for the current turn.
    pub has_camo_this_turn: bool,
}

impl UnitStatus {
    /// Record incoming damage.
    pub fn mark_damaged(&mut self, turn: u32, by: PlayerId) {
        self.damaged_turn = Some(turn);
        self.damaged_by = Some(by);
    }

    /// Whether an opponent damaged this unit on the previous turn.
    /// Suppresses the shield recharge at turn start.
    #[must_use]
    pub fn damaged_last_opponent_turn(&self, owner: PlayerId, current_turn: u32) -> bool {
        match (self.damaged_turn, self.damaged_by) {
            (Some(turn), Some(by)) => turn + 1 == current_turn && by != owner,
            _ => false,
        }
    }

    /// Whether an EMP lock forbids attacking on `turn`. The `until`
    /// turn is an inclusive upper bound.
    #[must_use]
    pub fn attack_locked_on(&self, turn: u32) -> bool {
        self.cannot_attack_until.is_some_and(|until| turn <= until)
    }
}

/// Statuses for all units, keyed by instance.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UnitStatusStore {
    statuses: FxHashMap<InstanceId, UnitStatus>,
}

impl UnitStatusStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a unit's status, creating a default record if absent.
    pub fn get_or_create(&mut self, unit: InstanceId) -> &mut UnitStatus {
        self.statuses.entry(unit).or_default()
    }

    /// Get a unit's status if it has one.
    #[must_use]
    pub fn get(&self, unit: InstanceId) -> Option<&UnitStatus> {
        self.statuses.get(&unit)
    }

    /// Drop a unit's status.
    pub fn remove(&mut self, unit: InstanceId) {
        self.statuses.remove(&unit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damaged_last_opponent_turn() {
        let owner = PlayerId::new(0);
        let enemy = PlayerId::new(1);

        let mut status = UnitStatus::default();
        status.mark_damaged(4, enemy);

        assert!(status.damaged_last_opponent_turn(owner, 5));
        assert!(!status.damaged_last_opponent_turn(owner, 6));
        // Self-damage does not suppress the recharge.
        status.mark_damaged(4, owner);
        assert!(!status.damaged_last_opponent_turn(owner, 5));
    }

    #[test]
    fn test_attack_lock_window() {
        let mut status = UnitStatus::default();
        assert!(!status.attack_locked_on(3));

        status.cannot_attack_until = Some(5);
        assert!(status.attack_locked_on(4));
        assert!(status.attack_locked_on(5));
        assert!(!status.attack_locked_on(6));
    }

    #[test]
    fn test_get_or_create() {
        let mut store = UnitStatusStore::new();
        let unit = InstanceId(1);

        assert!(store.get(unit).is_none());
        store.get_or_create(unit).summoned_turn = Some(2);
        assert_eq!(store.get(unit).unwrap().summoned_turn, Some(2));

        store.remove(unit);
        assert!(store.get(unit).is_none());
    }
}
