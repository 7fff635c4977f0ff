//! Win-condition evaluation.
//!
//! Conditions are checked in fixed priority order after every
//! state-changing operation: elimination first (last player or last
//! team standing), then full lane control. Only the first satisfied
//! condition finishes the match.
//!
//! The lane-control streak counts consecutive end-steps with full
//! control; mid-turn evaluations can reset it (control was lost) but
//! never advance it.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::board::Lane;
use crate::core::{PlayerId, TeamId};
use crate::events::EventType;

use super::clock::{MatchStatus, VictoryReason};
use super::stores::MatchStores;

/// Consecutive full-control end-steps needed to win by board control.
const FULL_CONTROL_STREAK_TO_WIN: u32 = 2;

pub struct WinConditionEvaluator {
    eliminated: FxHashSet<PlayerId>,
    team_streaks: FxHashMap<TeamId, u32>,
}

impl WinConditionEvaluator {
    #[must_use]
    pub fn new() -> Self {
        Self {
            eliminated: FxHashSet::default(),
            team_streaks: FxHashMap::default(),
        }
    }

    /// Whether a seat is still in the match.
    #[must_use]
    pub fn is_alive(&self, player: PlayerId, stores: &MatchStores) -> bool {
        !self.eliminated.contains(&player) && stores.players.get(player).is_alive()
    }

    /// Evaluate every condition after an action by `current`.
    /// `end_step` marks the evaluation that closes the turn.
    pub fn evaluate(&mut self, stores: &mut MatchStores, current: PlayerId, end_step: bool) {
        self.refresh_elimination(stores);

        if stores.mode.is_team_mode() {
            self.evaluate_team_elimination(stores);
        } else {
            self.evaluate_solo_elimination(stores);
        }
        if stores.clock.status == MatchStatus::Finished {
            return;
        }

        if stores.mode.is_team_mode() {
            self.evaluate_team_control(stores, current, end_step);
        } else {
            self.evaluate_solo_control(stores, current, end_step);
        }
    }

    /// Finish the match. Idempotent: a finished match never re-finishes.
    pub fn finish(
        &mut self,
        stores: &mut MatchStores,
        winner_player: Option<PlayerId>,
        winner_team: Option<TeamId>,
        reason: VictoryReason,
    ) {
        if stores.clock.status == MatchStatus::Finished {
            return;
        }
        stores.clock.winner_player = winner_player;
        stores.clock.winner_team = winner_team;
        stores.clock.victory_reason = Some(reason);
        stores.clock.status = MatchStatus::Finished;

        let mut met = stores
            .new_event(EventType::WinConditionMet)
            .with_tag(reason.name());
        if let Some(winner) = winner_player {
            met = met.with_source_player(winner);
        }
        stores.emit(met);

        let mut ended = stores
            .new_event(EventType::GameEnded)
            .with_tag(reason.name());
        if let Some(winner) = winner_player {
            ended = ended.with_source_player(winner);
        }
        stores.emit(ended);
    }

    /// A seat whose base reached zero stays eliminated for good.
    fn refresh_elimination(&mut self, stores: &MatchStores) {
        for (player, state) in stores.players.iter() {
            if !state.is_alive() {
                self.eliminated.insert(player);
            }
        }
    }

    fn evaluate_solo_elimination(&mut self, stores: &mut MatchStores) {
        let alive: Vec<PlayerId> = stores
            .players
            .player_ids()
            .filter(|&p| self.is_alive(p, stores))
            .collect();
        if let [winner] = alive[..] {
            let team = stores.team_of(winner);
            self.finish(
                stores,
                Some(winner),
                Some(team),
                VictoryReason::LastPlayerStanding,
            );
        }
    }

    fn evaluate_team_elimination(&mut self, stores: &mut MatchStores) {
        let alive: Vec<PlayerId> = stores
            .players
            .player_ids()
            .filter(|&p| self.is_alive(p, stores))
            .collect();
        let teams: FxHashSet<TeamId> = alive.iter().map(|&p| stores.team_of(p)).collect();
        if teams.len() == 1 {
            let winner = alive.first().copied();
            let team = teams.iter().next().copied();
            self.finish(stores, winner, team, VictoryReason::LastTeamStanding);
        }
    }

    fn evaluate_solo_control(&mut self, stores: &mut MatchStores, current: PlayerId, end_step: bool) {
        let controlled = controlled_lane_count(
            stores,
            &[current],
            &stores.opponents_of(current),
        );
        stores
            .players
            .get_mut(current)
            .set_lane_control(controlled, Lane::ALL.len(), end_step);
        if !end_step {
            return;
        }
        let streak = stores.players.get(current).full_control_streak();

        let event = stores
            .new_event(EventType::LaneControlUpdated)
            .with_source_player(current)
            .with_value(controlled as i64)
            .with_value(i64::from(streak));
        stores.emit(event);

        if streak >= FULL_CONTROL_STREAK_TO_WIN {
            let team = stores.team_of(current);
            self.finish(
                stores,
                Some(current),
                Some(team),
                VictoryReason::FullControlStreak,
            );
        }
    }

    fn evaluate_team_control(&mut self, stores: &mut MatchStores, current: PlayerId, end_step: bool) {
        let team = stores.team_of(current);
        let own = stores.allies_of(current);
        let opponents = stores.opponents_of(current);
        let controlled = controlled_lane_count(stores, &own, &opponents);

        let streak = self.team_streaks.entry(team).or_insert(0);
        if controlled != Lane::ALL.len() {
            *streak = 0;
        } else if end_step {
            *streak += 1;
        }
        let streak = *streak;
        if !end_step {
            return;
        }

        let event = stores
            .new_event(EventType::LaneControlUpdated)
            .with_source_player(current)
            .with_value(controlled as i64)
            .with_value(i64::from(streak));
        stores.emit(event);

        if streak >= FULL_CONTROL_STREAK_TO_WIN {
            self.finish(
                stores,
                Some(current),
                Some(team),
                VictoryReason::TeamFullControlStreak,
            );
        }
    }
}

impl Default for WinConditionEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

/// A lane is controlled when the side outnumbers its opponents there
/// and no opposing frontline unit remains.
fn controlled_lane_count(stores: &MatchStores, own: &[PlayerId], opponents: &[PlayerId]) -> usize {
    Lane::ALL
        .iter()
        .filter(|&&lane| {
            let state = stores.battlefield.lane(lane);
            state.total_count_for(own) > state.total_count_for(opponents)
                && state.frontline_count_for(opponents) == 0
        })
        .count()
}
