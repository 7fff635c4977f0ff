//! Turn lifecycle: the auto-resolved draw/recharge step and the
//! explicit phase transitions.

use std::sync::Arc;

use crate::catalog::Keyword;
use crate::core::PlayerId;
use crate::error::{EngineError, Result};
use crate::events::EventType;

use super::clock::GamePhase;
use super::stores::MatchStores;

pub struct TurnFlowHandler<'a> {
    stores: &'a mut MatchStores,
}

impl<'a> TurnFlowHandler<'a> {
    pub fn new(stores: &'a mut MatchStores) -> Self {
        Self { stores }
    }

    /// Begin the active seat's turn: bump the counter, refresh per-turn
    /// unit state, run the resource step, auto-resolve DRAW_RECHARGE,
    /// and land in DEPLOYMENT.
    pub fn start_turn(&mut self) -> Result<()> {
        self.stores.clock.global_turn += 1;
        self.stores.attackers_used.clear();

        let active = self.stores.active_player();
        self.refresh_camo(active)?;
        self.recharge_shields(active)?;
        self.stores.players.get_mut(active).start_turn_resource_step();

        let turn = self.stores.clock.global_turn;
        let started = self
            .stores
            .new_event(EventType::TurnStarted)
            .with_source_player(active)
            .with_value(i64::from(turn))
            .with_value(i64::from(self.stores.clock.round));
        self.stores.emit(started);

        self.stores.clock.phase = GamePhase::DrawRecharge;
        let event = self
            .stores
            .new_event(EventType::PhaseDrawRechargeStarted)
            .with_source_player(active);
        self.stores.emit(event);

        // The very first turn of the match skips the draw; the opening
        // hand already covers it.
        let skip_draw = turn == 1 && self.stores.clock.cursor == 0;
        if !skip_draw {
            let drawn = self.stores.players.get_mut(active).draw(1);
            if let Some(card) = drawn.first().copied() {
                let event = self
                    .stores
                    .new_event(EventType::CardDrawn)
                    .with_source_player(active)
                    .with_source_unit(card.instance_id)
                    .with_value(i64::from(card.card_id.raw()));
                self.stores.emit(event);
            }
        }

        let cap = self.stores.players.get(active).supply_cap();
        let supply = self.stores.players.get(active).current_supply();
        let event = self
            .stores
            .new_event(EventType::SupplyCapIncreased)
            .with_source_player(active)
            .with_value(i64::from(cap));
        self.stores.emit(event);
        let event = self
            .stores
            .new_event(EventType::SupplyRefilled)
            .with_source_player(active)
            .with_value(i64::from(supply));
        self.stores.emit(event);

        let event = self
            .stores
            .new_event(EventType::PhaseDrawRechargeEnded)
            .with_source_player(active);
        self.stores.emit(event);
        self.stores.clock.phase = GamePhase::Deployment;
        let event = self
            .stores
            .new_event(EventType::PhaseDeploymentStarted)
            .with_source_player(active);
        self.stores.emit(event);
        Ok(())
    }

    /// Drive one explicit phase transition.
    ///
    /// Returns `true` when the ENDSTEP just closed: the turn is over and
    /// the caller must evaluate win conditions and rotate.
    pub fn advance_phase(&mut self) -> Result<bool> {
        let active = self.stores.active_player();
        match self.stores.clock.phase {
            // Auto-resolved at turn start; never advanced by hand.
            GamePhase::DrawRecharge => Err(EngineError::WrongPhase {
                actual: GamePhase::DrawRecharge,
            }),
            GamePhase::Deployment => {
                let event = self
                    .stores
                    .new_event(EventType::PhaseDeploymentEnded)
                    .with_source_player(active);
                self.stores.emit(event);
                self.stores.clock.phase = GamePhase::Skirmish;
                let event = self
                    .stores
                    .new_event(EventType::PhaseSkirmishStarted)
                    .with_source_player(active);
                self.stores.emit(event);
                Ok(false)
            }
            GamePhase::Skirmish => {
                let event = self
                    .stores
                    .new_event(EventType::PhaseSkirmishEnded)
                    .with_source_player(active);
                self.stores.emit(event);
                self.stores.clock.phase = GamePhase::Endstep;
                let event = self
                    .stores
                    .new_event(EventType::PhaseEndstepStarted)
                    .with_source_player(active);
                self.stores.emit(event);
                Ok(false)
            }
            GamePhase::Endstep => {
                let event = self
                    .stores
                    .new_event(EventType::PhaseEndstepEnded)
                    .with_source_player(active);
                self.stores.emit(event);
                let event = self
                    .stores
                    .new_event(EventType::StatusExpired)
                    .with_source_player(active)
                    .with_tag("TURN_END");
                self.stores.emit(event);
                let event = self
                    .stores
                    .new_event(EventType::TurnEnded)
                    .with_source_player(active)
                    .with_value(i64::from(self.stores.clock.global_turn));
                self.stores.emit(event);
                Ok(true)
            }
        }
    }

    /// Re-arm camo for every unit the active seat fields.
    fn refresh_camo(&mut self, active: PlayerId) -> Result<()> {
        let catalog = Arc::clone(&self.stores.catalog);
        let units: Vec<_> = self
            .stores
            .battlefield
            .all_units()
            .filter(|p| p.owner == active)
            .map(|p| p.unit)
            .collect();
        for unit in units {
            let camo = catalog.require(unit.card_id)?.has_keyword(Keyword::Camo);
            self.stores
                .statuses
                .get_or_create(unit.instance_id)
                .has_camo_this_turn = camo;
        }
        Ok(())
    }

    /// Recharge shields for the active seat's units, except those an
    /// opponent damaged on the immediately preceding turn.
    fn recharge_shields(&mut self, active: PlayerId) -> Result<()> {
        let catalog = Arc::clone(&self.stores.catalog);
        let turn = self.stores.clock.global_turn;
        let units: Vec<_> = self
            .stores
            .battlefield
            .all_units()
            .filter(|p| p.owner == active)
            .map(|p| p.unit)
            .collect();

        for unit in units {
            let Some(stats) = catalog.require(unit.card_id)?.stats else {
                continue;
            };
            if stats.shield_cap <= 0 {
                continue;
            }
            if self
                .stores
                .statuses
                .get_or_create(unit.instance_id)
                .damaged_last_opponent_turn(active, turn)
            {
                continue;
            }

            let state = self.stores.combat.get_mut(unit.instance_id)?;
            let before = state.current_shield();
            state.recharge_shield_to(stats.shield_cap);
            let after = state.current_shield();
            if after != before {
                let event = self
                    .stores
                    .new_event(EventType::StatusRefreshed)
                    .with_source_player(active)
                    .with_target_unit(unit.instance_id)
                    .with_tag("SHIELD_RECHARGE")
                    .with_value(i64::from(before))
                    .with_value(i64::from(after));
                self.stores.emit(event);
            }
        }
        Ok(())
    }
}
