//! Turn, phase, and match-lifecycle bookkeeping.

use serde::{Deserialize, Serialize};

use crate::core::{PlayerId, TeamId};

/// The four phases of one turn.
///
/// DRAW_RECHARGE is auto-resolved at turn start; `advance_phase` only
/// drives the remaining transitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GamePhase {
    DrawRecharge,
    Deployment,
    Skirmish,
    Endstep,
}

/// Lifecycle of one match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStatus {
    NotStarted,
    Running,
    Finished,
}

/// Seat arrangement for a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameMode {
    /// Exactly two seats, head to head.
    Duel,
    /// Three or more seats, everyone against everyone.
    FreeForAll,
    /// Four seats in two teams of two.
    Team2v2,
}

impl GameMode {
    /// Stable name used as an event tag.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            GameMode::Duel => "DUEL",
            GameMode::FreeForAll => "FREE_FOR_ALL",
            GameMode::Team2v2 => "TEAM_2V2",
        }
    }

    /// Whether seats share victory through teams.
    #[must_use]
    pub fn is_team_mode(self) -> bool {
        matches!(self, GameMode::Team2v2)
    }
}

/// Why a finished match finished.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VictoryReason {
    LastPlayerStanding,
    LastTeamStanding,
    FullControlStreak,
    TeamFullControlStreak,
    NoAlivePlayers,
}

impl VictoryReason {
    /// Stable name used as an event tag.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            VictoryReason::LastPlayerStanding => "LAST_PLAYER_STANDING",
            VictoryReason::LastTeamStanding => "LAST_TEAM_STANDING",
            VictoryReason::FullControlStreak => "FULL_CONTROL_STREAK",
            VictoryReason::TeamFullControlStreak => "TEAM_FULL_CONTROL_STREAK",
            VictoryReason::NoAlivePlayers => "NO_ALIVE_PLAYERS",
        }
    }
}

/// Where the match stands: turn and round counters, the active-seat
/// cursor, phase, status, and (once finished) the winner.
///
/// `global_turn` starts at 0 and is incremented as each turn begins, so
/// the first turn of the match is turn 1.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TurnClock {
    pub global_turn: u32,
    pub round: u32,
    pub cursor: usize,
    pub phase: GamePhase,
    pub status: MatchStatus,
    pub winner_player: Option<PlayerId>,
    pub winner_team: Option<TeamId>,
    pub victory_reason: Option<VictoryReason>,
}

impl TurnClock {
    /// A clock for a match that has not started.
    #[must_use]
    pub fn new() -> Self {
        Self {
            global_turn: 0,
            round: 1,
            cursor: 0,
            phase: GamePhase::DrawRecharge,
            status: MatchStatus::NotStarted,
            winner_player: None,
            winner_team: None,
            victory_reason: None,
        }
    }

    /// The seat currently holding the turn.
    #[must_use]
    pub fn active_player(&self) -> PlayerId {
        PlayerId::new(self.cursor as u8)
    }
}

impl Default for TurnClock {
    fn default() -> Self {
        Self::new()
    }
}
