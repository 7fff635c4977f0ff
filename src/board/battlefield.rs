//! Battlefield state: per-lane, per-player unit placement.
//!
//! Each lane gives every seat a frontline and a backline of at most
//! [`ROW_CAPACITY`] units. All scans walk lanes in `Lane::ALL` order and
//! rows frontline-first so that identical states enumerate identically.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{InstanceId, PlayerId, PlayerMap};
use crate::error::{EngineError, Result};

use super::lane::{Lane, Row};
use super::unit::UnitInstance;

/// Maximum units per row, per player, per lane.
pub const ROW_CAPACITY: usize = 2;

/// A located unit: who owns it and where it stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitPosition {
    pub owner: PlayerId,
    pub lane: Lane,
    pub row: Row,
    pub unit: UnitInstance,
}

/// One player's half of a lane.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaneSide {
    frontline: SmallVec<[UnitInstance; ROW_CAPACITY]>,
    backline: SmallVec<[UnitInstance; ROW_CAPACITY]>,
}

impl LaneSide {
    fn row(&self, row: Row) -> &SmallVec<[UnitInstance; ROW_CAPACITY]> {
        match row {
            Row::Frontline => &self.frontline,
            Row::Backline => &self.backline,
        }
    }

    fn row_mut(&mut self, row: Row) -> &mut SmallVec<[UnitInstance; ROW_CAPACITY]> {
        match row {
            Row::Frontline => &mut self.frontline,
            Row::Backline => &mut self.backline,
        }
    }

    /// Whether the row can take another unit.
    #[must_use]
    pub fn has_space(&self, row: Row) -> bool {
        self.row(row).len() < ROW_CAPACITY
    }

    /// Units in the frontline, in deployment order.
    #[must_use]
    pub fn frontline(&self) -> &[UnitInstance] {
        &self.frontline
    }

    /// Units in the backline, in deployment order.
    #[must_use]
    pub fn backline(&self) -> &[UnitInstance] {
        &self.backline
    }

    /// All units, frontline first.
    pub fn units(&self) -> impl Iterator<Item = &UnitInstance> {
        self.frontline.iter().chain(self.backline.iter())
    }

    #[must_use]
    pub fn frontline_count(&self) -> usize {
        self.frontline.len()
    }

    #[must_use]
    pub fn total_count(&self) -> usize {
        self.frontline.len() + self.backline.len()
    }

    fn row_of(&self, unit: InstanceId) -> Option<Row> {
        if self.frontline.iter().any(|u| u.instance_id == unit) {
            Some(Row::Frontline)
        } else if self.backline.iter().any(|u| u.instance_id == unit) {
            Some(Row::Backline)
        } else {
            None
        }
    }

    fn remove(&mut self, unit: InstanceId) -> Option<UnitInstance> {
        for row in [Row::Frontline, Row::Backline] {
            let slots = self.row_mut(row);
            if let Some(idx) = slots.iter().position(|u| u.instance_id == unit) {
                return Some(slots.remove(idx));
            }
        }
        None
    }
}

/// One lane: every seat's side of it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaneState {
    sides: PlayerMap<LaneSide>,
}

impl LaneState {
    fn new(player_count: usize) -> Self {
        Self {
            sides: PlayerMap::with_default(player_count),
        }
    }

    /// A player's side of this lane.
    #[must_use]
    pub fn side(&self, player: PlayerId) -> &LaneSide {
        self.sides.get(player)
    }

    fn side_mut(&mut self, player: PlayerId) -> &mut LaneSide {
        self.sides.get_mut(player)
    }

    /// Total units a set of players has in this lane.
    #[must_use]
    pub fn total_count_for(&self, players: &[PlayerId]) -> usize {
        players.iter().map(|&p| self.side(p).total_count()).sum()
    }

    /// Frontline units a set of players has in this lane.
    #[must_use]
    pub fn frontline_count_for(&self, players: &[PlayerId]) -> usize {
        players.iter().map(|&p| self.side(p).frontline_count()).sum()
    }
}

/// The full battlefield: three lanes, one side per seat in each.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Battlefield {
    lanes: [LaneState; 3],
}

impl Battlefield {
    /// Create an empty battlefield for `player_count` seats.
    #[must_use]
    pub fn new(player_count: usize) -> Self {
        Self {
            lanes: [
                LaneState::new(player_count),
                LaneState::new(player_count),
                LaneState::new(player_count),
            ],
        }
    }

    /// Access a lane.
    #[must_use]
    pub fn lane(&self, lane: Lane) -> &LaneState {
        &self.lanes[lane.index()]
    }

    fn lane_mut(&mut self, lane: Lane) -> &mut LaneState {
        &mut self.lanes[lane.index()]
    }

    /// Whether `player` has room in the given row of the given lane.
    #[must_use]
    pub fn has_space(&self, lane: Lane, player: PlayerId, row: Row) -> bool {
        self.lane(lane).side(player).has_space(row)
    }

    /// Place a unit. Fails with `CapacityExceeded` when the row is full.
    pub fn deploy(&mut self, player: PlayerId, lane: Lane, row: Row, unit: UnitInstance) -> Result<()> {
        if !self.has_space(lane, player, row) {
            return Err(EngineError::CapacityExceeded { player, lane });
        }
        self.lane_mut(lane).side_mut(player).row_mut(row).push(unit);
        Ok(())
    }

    /// Remove a unit from wherever it stands.
    pub fn remove_unit(&mut self, unit: InstanceId) -> Option<UnitInstance> {
        for lane in Lane::ALL {
            let lane_state = self.lane_mut(lane);
            for player in lane_state.sides.player_ids().collect::<Vec<_>>() {
                if let Some(removed) = lane_state.side_mut(player).remove(unit) {
                    return Some(removed);
                }
            }
        }
        None
    }

    /// Find a unit on the battlefield.
    #[must_use]
    pub fn locate_unit(&self, unit: InstanceId) -> Option<UnitPosition> {
        for lane in Lane::ALL {
            let lane_state = self.lane(lane);
            for (player, side) in lane_state.sides.iter() {
                if let Some(row) = side.row_of(unit) {
                    let found = side.units().find(|u| u.instance_id == unit)?;
                    return Some(UnitPosition {
                        owner: player,
                        lane,
                        row,
                        unit: *found,
                    });
                }
            }
        }
        None
    }

    /// Units a player has in one lane, frontline first.
    #[must_use]
    pub fn units_of(&self, lane: Lane, player: PlayerId) -> Vec<UnitInstance> {
        self.lane(lane).side(player).units().copied().collect()
    }

    /// Every unit on the battlefield in scan order.
    pub fn all_units(&self) -> impl Iterator<Item = UnitPosition> + '_ {
        Lane::ALL.into_iter().flat_map(move |lane| {
            let lane_state = self.lane(lane);
            lane_state.sides.iter().flat_map(move |(player, side)| {
                [Row::Frontline, Row::Backline].into_iter().flat_map(move |row| {
                    side.row(row).iter().map(move |u| UnitPosition {
                        owner: player,
                        lane,
                        row,
                        unit: *u,
                    })
                })
            })
        })
    }

    /// Count every unit a player has on the battlefield.
    #[must_use]
    pub fn unit_count_of(&self, player: PlayerId) -> usize {
        Lane::ALL
            .iter()
            .map(|&lane| self.lane(lane).side(player).total_count())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CardId;

    fn unit(id: u32, owner: u8) -> UnitInstance {
        UnitInstance::new(InstanceId(id), CardId::new(100 + id), PlayerId::new(owner))
    }

    #[test]
    fn test_deploy_and_locate() {
        let mut bf = Battlefield::new(2);
        bf.deploy(PlayerId::new(0), Lane::Bravo, Row::Frontline, unit(1, 0))
            .unwrap();

        let pos = bf.locate_unit(InstanceId(1)).unwrap();
        assert_eq!(pos.lane, Lane::Bravo);
        assert_eq!(pos.row, Row::Frontline);
        assert_eq!(pos.owner, PlayerId::new(0));

        assert!(bf.locate_unit(InstanceId(9)).is_none());
    }

    #[test]
    fn test_row_capacity_enforced() {
        let mut bf = Battlefield::new(2);
        let p = PlayerId::new(0);
        bf.deploy(p, Lane::Alpha, Row::Frontline, unit(1, 0)).unwrap();
        bf.deploy(p, Lane::Alpha, Row::Frontline, unit(2, 0)).unwrap();

        let err = bf
            .deploy(p, Lane::Alpha, Row::Frontline, unit(3, 0))
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::CapacityExceeded {
                player: p,
                lane: Lane::Alpha
            }
        );

        // Backline of the same lane is unaffected.
        bf.deploy(p, Lane::Alpha, Row::Backline, unit(3, 0)).unwrap();
        assert_eq!(bf.lane(Lane::Alpha).side(p).total_count(), 3);
    }

    #[test]
    fn test_remove_unit() {
        let mut bf = Battlefield::new(2);
        bf.deploy(PlayerId::new(1), Lane::Charlie, Row::Backline, unit(4, 1))
            .unwrap();

        let removed = bf.remove_unit(InstanceId(4)).unwrap();
        assert_eq!(removed.instance_id, InstanceId(4));
        assert!(bf.locate_unit(InstanceId(4)).is_none());
        assert!(bf.remove_unit(InstanceId(4)).is_none());
    }

    #[test]
    fn test_counts_for_players() {
        let mut bf = Battlefield::new(3);
        bf.deploy(PlayerId::new(0), Lane::Alpha, Row::Frontline, unit(1, 0))
            .unwrap();
        bf.deploy(PlayerId::new(1), Lane::Alpha, Row::Frontline, unit(2, 1))
            .unwrap();
        bf.deploy(PlayerId::new(2), Lane::Alpha, Row::Backline, unit(3, 2))
            .unwrap();

        let team = [PlayerId::new(0), PlayerId::new(2)];
        assert_eq!(bf.lane(Lane::Alpha).total_count_for(&team), 2);
        assert_eq!(bf.lane(Lane::Alpha).frontline_count_for(&team), 1);
    }

    #[test]
    fn test_all_units_scan_order() {
        let mut bf = Battlefield::new(2);
        bf.deploy(PlayerId::new(1), Lane::Charlie, Row::Backline, unit(1, 1))
            .unwrap();
        bf.deploy(PlayerId::new(0), Lane::Alpha, Row::Frontline, unit(2, 0))
            .unwrap();

        let ids: Vec<_> = bf.all_units().map(|p| p.unit.instance_id).collect();
        // Alpha before Charlie regardless of deployment order.
        assert_eq!(ids, vec![InstanceId(2), InstanceId(1)]);
    }
}
