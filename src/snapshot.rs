//! Serializable public view of a match.
//!
//! A snapshot carries only what a spectator may see: the clock, each
//! seat's ledger sizes, and per-lane unit counts. Hand and library
//! contents, live combat pools, and the match seed stay hidden; with
//! the seed and the deck lists every shuffle would be reconstructible.

use serde::{Deserialize, Serialize};

use crate::board::Lane;
use crate::core::{PlayerId, TeamId};
use crate::engine::{GameMode, GamePhase, MatchState, MatchStatus, VictoryReason};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSnapshot {
    pub mode: GameMode,
    pub status: MatchStatus,
    pub phase: GamePhase,
    pub turn: u32,
    pub round: u32,
    pub active_player: PlayerId,
    pub winner_player: Option<PlayerId>,
    pub winner_team: Option<TeamId>,
    pub victory_reason: Option<VictoryReason>,
    pub players: Vec<PlayerSnapshot>,
    pub lanes: Vec<LaneSnapshot>,
    pub events_dispatched: usize,
}

/// One seat's public ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub player: PlayerId,
    pub team: TeamId,
    pub alive: bool,
    pub base_health: i32,
    pub supply: i32,
    pub supply_cap: i32,
    pub battery: i32,
    pub hand_size: usize,
    pub library_size: usize,
    pub discard_size: usize,
    pub controlled_lanes: usize,
    pub full_control_streak: u32,
}

/// One lane, every side of it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaneSnapshot {
    pub lane: Lane,
    pub sides: Vec<LaneSideSnapshot>,
}

/// One seat's half of a lane, by count only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaneSideSnapshot {
    pub player: PlayerId,
    pub unit_count: usize,
    pub frontline_count: usize,
}

impl MatchSnapshot {
    /// Capture the current public state of a match.
    #[must_use]
    pub fn capture(state: &MatchState) -> Self {
        let stores = &state.stores;
        let players = stores
            .players
            .iter()
            .map(|(player, ledger)| PlayerSnapshot {
                player,
                team: stores.team_of(player),
                alive: state.is_alive(player),
                base_health: ledger.base_health(),
                supply: ledger.current_supply(),
                supply_cap: ledger.supply_cap(),
                battery: ledger.battery(),
                hand_size: ledger.hand_size(),
                library_size: ledger.library_size(),
                discard_size: ledger.discard_size(),
                controlled_lanes: ledger.controlled_lane_count(),
                full_control_streak: ledger.full_control_streak(),
            })
            .collect();

        let lanes = Lane::ALL
            .iter()
            .map(|&lane| LaneSnapshot {
                lane,
                sides: stores
                    .players
                    .player_ids()
                    .map(|player| {
                        let side = stores.battlefield.lane(lane).side(player);
                        LaneSideSnapshot {
                            player,
                            unit_count: side.total_count(),
                            frontline_count: side.frontline_count(),
                        }
                    })
                    .collect(),
            })
            .collect();

        Self {
            mode: stores.mode,
            status: stores.clock.status,
            phase: stores.clock.phase,
            turn: stores.clock.global_turn,
            round: stores.clock.round,
            active_player: stores.active_player(),
            winner_player: stores.clock.winner_player,
            winner_team: stores.clock.winner_team,
            victory_reason: stores.clock.victory_reason,
            players,
            lanes,
            events_dispatched: stores.bus.trace().len(),
        }
    }
}
