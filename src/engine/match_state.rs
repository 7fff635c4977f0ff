//! The match facade.
//!
//! `MatchState` owns every store and exposes the public operations.
//! Each operation delegates to its phase handler, then re-evaluates win
//! conditions, so a finished match is observable the moment the winning
//! action resolves rather than at the next turn boundary.

use crate::board::{Battlefield, Lane, Row};
use crate::combat::{DamageResult, EntityCombatState, UnitStatus};
use crate::core::{InstanceId, PlayerId, TeamId};
use crate::diplomacy::listener::lock_registry;
use crate::diplomacy::DiplomacyRelation;
use crate::error::Result;
use crate::events::{EventType, GameEvent};
use crate::player::PlayerState;
use crate::snapshot::MatchSnapshot;

use super::clock::{GameMode, GamePhase, MatchStatus, VictoryReason};
use super::combat::CombatHandler;
use super::deploy::DeploymentHandler;
use super::stores::MatchStores;
use super::turn_flow::TurnFlowHandler;
use super::win::WinConditionEvaluator;

/// One running match. Built by [`super::setup::MatchBuilder`].
pub struct MatchState {
    pub(crate) stores: MatchStores,
    pub(crate) win: WinConditionEvaluator,
}

impl MatchState {
    pub(crate) fn new(stores: MatchStores) -> Self {
        Self {
            stores,
            win: WinConditionEvaluator::new(),
        }
    }

    // ---- operations ----

    /// Deploy a unit card from the active seat's hand.
    pub fn deploy_from_hand(
        &mut self,
        player: PlayerId,
        card: InstanceId,
        lane: Lane,
        row: Row,
    ) -> Result<()> {
        DeploymentHandler::new(&mut self.stores).deploy_from_hand(player, card, lane, row)?;
        self.win.evaluate(&mut self.stores, player, false);
        Ok(())
    }

    /// Discard a hand card for one battery charge.
    pub fn convert_to_battery(&mut self, player: PlayerId, card: InstanceId) -> Result<()> {
        DeploymentHandler::new(&mut self.stores).convert_to_battery(player, card)
    }

    /// Resolve one unit-versus-unit attack.
    pub fn declare_attack(
        &mut self,
        attacker: InstanceId,
        defender: InstanceId,
    ) -> Result<DamageResult> {
        let result = CombatHandler::new(&mut self.stores).declare_attack(attacker, defender)?;
        let actor = self.stores.active_player();
        self.win.evaluate(&mut self.stores, actor, false);
        Ok(result)
    }

    /// Strike an opponent's base with a unit.
    pub fn attack_base(&mut self, attacker: InstanceId, target: PlayerId) -> Result<()> {
        CombatHandler::new(&mut self.stores).attack_base(attacker, target)?;
        let actor = self.stores.active_player();
        self.win.evaluate(&mut self.stores, actor, false);
        Ok(())
    }

    /// Seize an opposing vehicle in the same lane.
    pub fn hijack_vehicle(&mut self, hijacker: InstanceId, target: InstanceId) -> Result<()> {
        CombatHandler::new(&mut self.stores).hijack_vehicle(hijacker, target)?;
        let actor = self.stores.active_player();
        self.win.evaluate(&mut self.stores, actor, false);
        Ok(())
    }

    /// Apply direct damage to a seat's base.
    pub fn damage_base(&mut self, target: PlayerId, amount: i32) -> Result<()> {
        CombatHandler::new(&mut self.stores).damage_base(target, amount)?;
        let actor = self.stores.active_player();
        self.win.evaluate(&mut self.stores, actor, false);
        Ok(())
    }

    /// Advance one phase. Closing the ENDSTEP ends the turn and rotates
    /// to the next living seat.
    pub fn advance_phase(&mut self) -> Result<()> {
        self.stores.ensure_running()?;
        if TurnFlowHandler::new(&mut self.stores).advance_phase()? {
            self.finish_turn_and_rotate()?;
        }
        Ok(())
    }

    /// Run every remaining phase of the current turn, then rotate.
    pub fn end_turn(&mut self) -> Result<()> {
        self.stores.ensure_running()?;
        loop {
            if TurnFlowHandler::new(&mut self.stores).advance_phase()? {
                return self.finish_turn_and_rotate();
            }
        }
    }

    /// Turn boundary: evaluate win conditions, honor bonus-turn credits,
    /// pass the turn to the next living seat, and wrap the round when
    /// the rotation returns to the front of the seat order.
    fn finish_turn_and_rotate(&mut self) -> Result<()> {
        let ending = self.stores.active_player();
        self.win.evaluate(&mut self.stores, ending, true);
        if self.stores.clock.status == MatchStatus::Finished {
            return Ok(());
        }

        let use_bonus = self.win.is_alive(ending, &self.stores)
            && lock_registry(&self.stores.diplomacy).has_bonus_turn(ending);
        if use_bonus {
            lock_registry(&self.stores.diplomacy).consume_bonus_turn(ending);
            return TurnFlowHandler::new(&mut self.stores).start_turn();
        }

        let count = self.stores.players.player_count();
        let prev = self.stores.clock.cursor;
        let next = (1..=count)
            .map(|step| (prev + step) % count)
            .find(|&c| self.win.is_alive(PlayerId::new(c as u8), &self.stores));
        let Some(next) = next else {
            self.win
                .finish(&mut self.stores, None, None, VictoryReason::NoAlivePlayers);
            return Ok(());
        };

        if next <= prev {
            let round = self.stores.clock.round;
            let ended = self
                .stores
                .new_event(EventType::RoundEnded)
                .with_value(i64::from(round));
            self.stores.emit(ended);
            self.stores.clock.round += 1;
            let started = self
                .stores
                .new_event(EventType::RoundStarted)
                .with_value(i64::from(self.stores.clock.round));
            self.stores.emit(started);
        }
        self.stores.clock.cursor = next;
        TurnFlowHandler::new(&mut self.stores).start_turn()
    }

    // ---- read access ----

    #[must_use]
    pub fn status(&self) -> MatchStatus {
        self.stores.clock.status
    }

    #[must_use]
    pub fn phase(&self) -> GamePhase {
        self.stores.clock.phase
    }

    #[must_use]
    pub fn mode(&self) -> GameMode {
        self.stores.mode
    }

    /// Global turn index; the first turn of the match is 1.
    #[must_use]
    pub fn turn(&self) -> u32 {
        self.stores.clock.global_turn
    }

    #[must_use]
    pub fn round(&self) -> u32 {
        self.stores.clock.round
    }

    #[must_use]
    pub fn active_player(&self) -> PlayerId {
        self.stores.active_player()
    }

    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        self.stores.clock.winner_player
    }

    #[must_use]
    pub fn winner_team(&self) -> Option<TeamId> {
        self.stores.clock.winner_team
    }

    #[must_use]
    pub fn victory_reason(&self) -> Option<VictoryReason> {
        self.stores.clock.victory_reason
    }

    #[must_use]
    pub fn player(&self, player: PlayerId) -> &PlayerState {
        self.stores.players.get(player)
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.stores.players.player_count()
    }

    #[must_use]
    pub fn team_of(&self, player: PlayerId) -> TeamId {
        self.stores.team_of(player)
    }

    #[must_use]
    pub fn is_alive(&self, player: PlayerId) -> bool {
        self.win.is_alive(player, &self.stores)
    }

    #[must_use]
    pub fn battlefield(&self) -> &Battlefield {
        &self.stores.battlefield
    }

    /// A unit's live shield and health pools, while it is on the board.
    #[must_use]
    pub fn unit_combat(&self, unit: InstanceId) -> Option<&EntityCombatState> {
        self.stores.combat.get(unit).ok()
    }

    #[must_use]
    pub fn unit_status(&self, unit: InstanceId) -> Option<&UnitStatus> {
        self.stores.statuses.get(unit)
    }

    /// The diplomacy relation between two seats.
    #[must_use]
    pub fn relation_of(&self, a: PlayerId, b: PlayerId) -> DiplomacyRelation {
        lock_registry(&self.stores.diplomacy).relation_of(a, b)
    }

    #[must_use]
    pub fn commendation_of(&self, player: PlayerId) -> i32 {
        lock_registry(&self.stores.diplomacy).commendation_of(player)
    }

    #[must_use]
    pub fn biomass_of(&self, player: PlayerId) -> i32 {
        lock_registry(&self.stores.diplomacy).biomass_of(player)
    }

    #[must_use]
    pub fn schism_active(&self) -> bool {
        lock_registry(&self.stores.diplomacy).schism_active()
    }

    #[must_use]
    pub fn survival_protocol_active(&self) -> bool {
        lock_registry(&self.stores.diplomacy).survival_protocol_active()
    }

    /// Every event dispatched so far, in dispatch order. Two matches
    /// built from the same seed and driven by the same actions produce
    /// identical traces.
    #[must_use]
    pub fn event_trace(&self) -> &[GameEvent] {
        self.stores.bus.trace()
    }

    /// A serializable public view of the match.
    #[must_use]
    pub fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot::capture(self)
    }
}
