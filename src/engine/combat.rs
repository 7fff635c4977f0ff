//! Skirmish-phase operations: attacks, base strikes, and hijacking.
//!
//! Every operation validates all of its preconditions before the first
//! mutation, so a rejection never leaves partial state behind.

use std::sync::Arc;

use crate::board::{Row, UnitInstance, UnitPosition};
use crate::catalog::{CardDef, CardType, Keyword};
use crate::combat::{DamageContext, DamageResult, DamageType, EntityCombatState};
use crate::core::{InstanceId, PlayerId};
use crate::diplomacy::listener::lock_registry;
use crate::error::{EngineError, Result};
use crate::events::EventType;

use super::clock::GamePhase;
use super::deploy::DeploymentHandler;
use super::stores::MatchStores;

/// Supply cost of seizing an enemy vehicle.
const HIJACK_SUPPLY_COST: i32 = 2;

/// Tag marking a proto-gravemind unit (see the deployment handler).
const PROTO_GRAVEMIND_TAG: &str = "PROTO_GRAVEMIND";

pub struct CombatHandler<'a> {
    stores: &'a mut MatchStores,
}

impl<'a> CombatHandler<'a> {
    pub fn new(stores: &'a mut MatchStores) -> Self {
        Self { stores }
    }

    /// Resolve one unit-versus-unit attack.
    pub fn declare_attack(
        &mut self,
        attacker: InstanceId,
        defender: InstanceId,
    ) -> Result<DamageResult> {
        self.stores.ensure_running()?;
        self.stores.ensure_phase(GamePhase::Skirmish)?;

        let attacker_pos = self.locate(attacker)?;
        let defender_pos = self.locate(defender)?;
        self.stores.ensure_active(attacker_pos.owner)?;
        self.ensure_legal_target(attacker_pos.owner, defender_pos.owner)?;
        if self.stores.attackers_used.contains(&attacker) {
            return Err(EngineError::AlreadyAttacked { unit: attacker });
        }
        if attacker_pos.lane != defender_pos.lane {
            return Err(EngineError::SameLaneRequired);
        }

        let catalog = Arc::clone(&self.stores.catalog);
        let attacker_def = catalog.require(attacker_pos.unit.card_id)?;
        self.ensure_can_attack(attacker, attacker_def)?;

        if defender_pos.row == Row::Backline && !attacker_def.has_keyword(Keyword::Ranged) {
            let frontline = self
                .stores
                .battlefield
                .lane(defender_pos.lane)
                .side(defender_pos.owner)
                .frontline_count();
            if frontline > 0 {
                return Err(EngineError::FrontlineFirst { unit: attacker });
            }
        }

        let base_damage =
            attacker_def.attack() + self.squad_bonus(&attacker_pos, attacker_def)?;
        if base_damage <= 0 {
            return Err(EngineError::NoAttackValue { unit: attacker });
        }

        let declared = self
            .stores
            .new_event(EventType::AttackDeclared)
            .with_source_player(attacker_pos.owner)
            .with_target_player(defender_pos.owner)
            .with_source_unit(attacker)
            .with_target_unit(defender)
            .with_lane(attacker_pos.lane);
        self.stores.emit(declared);
        let locked = self
            .stores
            .new_event(EventType::TargetLocked)
            .with_source_unit(attacker)
            .with_target_unit(defender);
        self.stores.emit(locked);

        let damage_type = infer_damage_type(attacker_def);
        let turn = self.stores.clock.global_turn;
        let mut multiplier = 1;

        if attacker_def.has_keyword(Keyword::Headshot)
            && self.stores.combat.get(defender)?.current_shield() <= 0
        {
            multiplier *= 2;
            let headshot = self
                .stores
                .new_event(EventType::HeadshotTriggered)
                .with_source_unit(attacker)
                .with_target_unit(defender);
            self.stores.emit(headshot);
        }

        {
            let defender_status = self.stores.statuses.get_or_create(defender);
            if damage_type == DamageType::Ballistic
                && defender_status.plasma_tagged_turn == Some(turn)
                && defender_status.noob_combo_turn != Some(turn)
            {
                multiplier *= 2;
                defender_status.noob_combo_turn = Some(turn);
            }
        }

        let mut ctx = DamageContext::new(
            attacker,
            attacker_pos.owner,
            defender,
            defender_pos.owner,
            base_damage,
            damage_type,
        )
        .with_multiplier(multiplier);
        if attacker_def.has_keyword(Keyword::Sentinel) {
            ctx = ctx.with_ignore_shield();
        }

        let result = self.stores.resolver.resolve(
            &ctx,
            &mut self.stores.combat,
            &mut self.stores.bus,
            turn,
            self.stores.clock.round,
            self.stores.clock.active_player(),
        )?;
        self.stores.drain_events();

        let attacker_status = self.stores.statuses.get_or_create(attacker);
        attacker_status.attacked_turn = Some(turn);
        attacker_status.has_camo_this_turn = false;
        self.stores.attackers_used.insert(attacker);

        if result.shield_damage > 0 || result.health_damage > 0 {
            let active = self.stores.clock.active_player();
            let defender_status = self.stores.statuses.get_or_create(defender);
            defender_status.mark_damaged(turn, active);
            if damage_type == DamageType::Plasma {
                defender_status.plasma_tagged_turn = Some(turn);
                let tagged = self
                    .stores
                    .new_event(EventType::PlasmaTagApplied)
                    .with_source_unit(attacker)
                    .with_target_unit(defender)
                    .with_value(i64::from(turn));
                self.stores.emit(tagged);
            }
            self.apply_emp_if_needed(attacker_def, &defender_pos)?;
        }

        if result.lethal {
            self.handle_unit_death(&attacker_pos, attacker_def, defender)?;
        }

        Ok(result)
    }

    /// Strike an opponent's base. Only legal once their side of the
    /// attacker's lane is empty.
    pub fn attack_base(&mut self, attacker: InstanceId, target: PlayerId) -> Result<()> {
        self.stores.ensure_running()?;
        self.stores.ensure_phase(GamePhase::Skirmish)?;

        let attacker_pos = self.locate(attacker)?;
        self.stores.ensure_active(attacker_pos.owner)?;
        self.ensure_legal_target(attacker_pos.owner, target)?;
        if self.stores.attackers_used.contains(&attacker) {
            return Err(EngineError::AlreadyAttacked { unit: attacker });
        }

        let catalog = Arc::clone(&self.stores.catalog);
        let attacker_def = catalog.require(attacker_pos.unit.card_id)?;
        self.ensure_can_attack(attacker, attacker_def)?;

        let defenders = self.stores.allies_of(target);
        let blockers = self
            .stores
            .battlefield
            .lane(attacker_pos.lane)
            .total_count_for(&defenders);
        if blockers > 0 {
            return Err(EngineError::BaseGuarded {
                lane: attacker_pos.lane,
            });
        }

        let damage = attacker_def.attack();
        if damage <= 0 {
            return Err(EngineError::NoAttackValue { unit: attacker });
        }

        let declared = self
            .stores
            .new_event(EventType::AttackDeclared)
            .with_source_player(attacker_pos.owner)
            .with_target_player(target)
            .with_source_unit(attacker)
            .with_lane(attacker_pos.lane)
            .with_tag("BASE");
        self.stores.emit(declared);

        self.damage_base(target, damage)?;

        let attacker_status = self.stores.statuses.get_or_create(attacker);
        attacker_status.attacked_turn = Some(self.stores.clock.global_turn);
        attacker_status.has_camo_this_turn = false;
        self.stores.attackers_used.insert(attacker);
        Ok(())
    }

    /// Apply direct damage to a seat's base.
    pub fn damage_base(&mut self, target: PlayerId, amount: i32) -> Result<()> {
        self.stores.ensure_running()?;

        let ledger = self.stores.players.get_mut(target);
        ledger.apply_base_damage(amount);
        let remaining = ledger.base_health();

        let event = self
            .stores
            .new_event(EventType::BaseDamaged)
            .with_target_player(target)
            .with_value(i64::from(amount))
            .with_value(i64::from(remaining));
        self.stores.emit(event);
        Ok(())
    }

    /// Seize an opposing vehicle in the same lane for 2 supply.
    pub fn hijack_vehicle(
        &mut self,
        hijacker: InstanceId,
        target_vehicle: InstanceId,
    ) -> Result<()> {
        self.stores.ensure_running()?;
        if !matches!(
            self.stores.clock.phase,
            GamePhase::Deployment | GamePhase::Skirmish
        ) {
            return Err(EngineError::WrongPhase {
                actual: self.stores.clock.phase,
            });
        }

        let hijacker_pos = self.locate(hijacker)?;
        let target_pos = self.locate(target_vehicle)?;
        self.stores.ensure_active(hijacker_pos.owner)?;
        self.ensure_legal_target(hijacker_pos.owner, target_pos.owner)?;
        if hijacker_pos.lane != target_pos.lane {
            return Err(EngineError::SameLaneRequired);
        }

        let catalog = Arc::clone(&self.stores.catalog);
        if !catalog
            .require(hijacker_pos.unit.card_id)?
            .has_keyword(Keyword::Hijack)
        {
            return Err(EngineError::MissingKeyword { unit: hijacker });
        }
        if !catalog.require(target_pos.unit.card_id)?.is_vehicle() {
            return Err(EngineError::NotVehicle {
                unit: target_vehicle,
            });
        }
        if !self
            .stores
            .battlefield
            .has_space(hijacker_pos.lane, hijacker_pos.owner, target_pos.row)
        {
            return Err(EngineError::CapacityExceeded {
                player: hijacker_pos.owner,
                lane: hijacker_pos.lane,
            });
        }
        let available = self.stores.players.get(hijacker_pos.owner).current_supply();
        if available < HIJACK_SUPPLY_COST {
            return Err(EngineError::InsufficientResources {
                player: hijacker_pos.owner,
                required: HIJACK_SUPPLY_COST,
                available,
            });
        }

        // Everything is validated; the mutation sequence cannot fail.
        self.stores
            .players
            .get_mut(hijacker_pos.owner)
            .consume_supply(HIJACK_SUPPLY_COST);
        let removed = self
            .stores
            .battlefield
            .remove_unit(target_vehicle)
            .ok_or(EngineError::UnknownUnit {
                unit: target_vehicle,
            })?;
        // Ownership flips; identity and provenance stay with the unit.
        let seized = UnitInstance {
            owner: hijacker_pos.owner,
            ..removed
        };
        self.stores
            .battlefield
            .deploy(hijacker_pos.owner, hijacker_pos.lane, target_pos.row, seized)?;

        let event = self
            .stores
            .new_event(EventType::HijackExecuted)
            .with_source_player(hijacker_pos.owner)
            .with_target_player(target_pos.owner)
            .with_source_unit(hijacker)
            .with_target_unit(target_vehicle)
            .with_lane(hijacker_pos.lane)
            .with_tag(row_label(target_pos.row));
        self.stores.emit(event);
        Ok(())
    }

    fn locate(&self, unit: InstanceId) -> Result<UnitPosition> {
        self.stores
            .battlefield
            .locate_unit(unit)
            .ok_or(EngineError::UnknownUnit { unit })
    }

    /// Opponent check plus the diplomacy gate.
    fn ensure_legal_target(&self, actor: PlayerId, target: PlayerId) -> Result<()> {
        if !self.stores.are_opponents(actor, target) {
            return Err(EngineError::NotOpponent { actor, target });
        }
        if !lock_registry(&self.stores.diplomacy).can_target(actor, target) {
            return Err(EngineError::TargetProtected { actor, target });
        }
        Ok(())
    }

    fn ensure_can_attack(&mut self, unit: InstanceId, def: &CardDef) -> Result<()> {
        let turn = self.stores.clock.global_turn;
        let status = self.stores.statuses.get_or_create(unit);
        if status.summoned_turn == Some(turn) && !def.has_keyword(Keyword::DropPod) {
            return Err(EngineError::SummoningSickness { unit });
        }
        if let Some(until) = status.cannot_attack_until {
            if status.attack_locked_on(turn) {
                return Err(EngineError::AttackSuppressed { unit, until });
            }
        }
        Ok(())
    }

    /// SQUAD bonus: +1 per other infantry ally in the lane, capped at 2.
    fn squad_bonus(&self, pos: &UnitPosition, def: &CardDef) -> Result<i32> {
        if !def.has_keyword(Keyword::Squad) || !is_infantry(def) {
            return Ok(0);
        }
        let mut others = 0;
        for ally in self.stores.battlefield.units_of(pos.lane, pos.owner) {
            if ally.instance_id == pos.unit.instance_id {
                continue;
            }
            if is_infantry(self.stores.catalog.require(ally.card_id)?) {
                others += 1;
            }
        }
        Ok(others.min(2))
    }

    fn apply_emp_if_needed(&mut self, attacker_def: &CardDef, defender_pos: &UnitPosition) -> Result<()> {
        if !attacker_def.has_keyword(Keyword::Emp) {
            return Ok(());
        }
        if !self
            .stores
            .catalog
            .require(defender_pos.unit.card_id)?
            .is_vehicle()
        {
            return Ok(());
        }

        let until = self.stores.clock.global_turn + 1;
        let defender = defender_pos.unit.instance_id;
        let status = self.stores.statuses.get_or_create(defender);
        status.cannot_attack_until = Some(until);
        status.cannot_move_until = Some(until);

        let event = self
            .stores
            .new_event(EventType::EmpApplied)
            .with_target_unit(defender)
            .with_value(i64::from(until));
        self.stores.emit(event);
        Ok(())
    }

    /// Lethal cleanup: the slot, combat state, and status record go
    /// together, then kill-triggered effects fire.
    fn handle_unit_death(
        &mut self,
        attacker_pos: &UnitPosition,
        attacker_def: &CardDef,
        defender: InstanceId,
    ) -> Result<()> {
        let dead = self
            .stores
            .battlefield
            .remove_unit(defender)
            .ok_or(EngineError::UnknownUnit { unit: defender })?;
        self.stores.combat.remove(defender);
        self.stores.statuses.remove(defender);
        self.stores.players.get_mut(dead.owner).put_to_discard(dead);

        let catalog = Arc::clone(&self.stores.catalog);
        let dead_def = catalog.require(dead.card_id)?;
        if dead_def.has_tag(PROTO_GRAVEMIND_TAG) {
            self.refresh_proto_gravemind(dead.owner)?;
        }

        if attacker_def.has_keyword(Keyword::Infect) && !dead_def.is_vehicle() {
            self.spawn_infect_token(attacker_pos, attacker_def)?;
        }
        Ok(())
    }

    /// INFECT kill trigger: spawn the attacker's token template in the
    /// backline of its lane, if there is room and a template exists.
    fn spawn_infect_token(
        &mut self,
        attacker_pos: &UnitPosition,
        attacker_def: &CardDef,
    ) -> Result<()> {
        let owner = attacker_pos.owner;
        let lane = attacker_pos.lane;
        if !self.stores.battlefield.has_space(lane, owner, Row::Backline) {
            return Ok(());
        }
        let Some(token_id) = attacker_def.token_template else {
            return Ok(());
        };
        let catalog = Arc::clone(&self.stores.catalog);
        let Some(token_def) = catalog.get(token_id) else {
            return Ok(());
        };

        let instance = self.stores.instance_ids.next_id();
        // Provenance: the kill cascade that spawned the token, and the
        // infecting card.
        let token = UnitInstance::new(instance, token_id, owner)
            .spawned_by(self.stores.bus.last_sequence(), attacker_pos.unit.card_id);
        self.stores
            .battlefield
            .deploy(owner, lane, Row::Backline, token)?;
        if let Some(stats) = token_def.stats {
            self.stores
                .combat
                .put(instance, EntityCombatState::new(stats.shield_cap, stats.health_cap));
        }
        let status = self.stores.statuses.get_or_create(instance);
        status.summoned_turn = Some(self.stores.clock.global_turn);
        status.has_camo_this_turn = token_def.has_keyword(Keyword::Camo);

        let event = self
            .stores
            .new_event(EventType::InfectTriggered)
            .with_source_player(owner)
            .with_source_unit(attacker_pos.unit.instance_id)
            .with_target_unit(instance)
            .with_lane(lane)
            .with_value(i64::from(token_id.raw()));
        self.stores.emit(event);
        Ok(())
    }

    /// Recompute whether a seat still fields a proto-gravemind.
    fn refresh_proto_gravemind(&mut self, owner: PlayerId) -> Result<()> {
        let catalog = Arc::clone(&self.stores.catalog);
        let mut present = false;
        for pos in self.stores.battlefield.all_units() {
            if pos.owner == owner && catalog.require(pos.unit.card_id)?.has_tag(PROTO_GRAVEMIND_TAG)
            {
                present = true;
                break;
            }
        }
        DeploymentHandler::new(self.stores).mark_proto_gravemind(owner, present);
        Ok(())
    }
}

fn infer_damage_type(def: &CardDef) -> DamageType {
    if def.has_keyword(Keyword::Plasma) {
        DamageType::Plasma
    } else if def.has_keyword(Keyword::Ballistic) {
        DamageType::Ballistic
    } else {
        DamageType::True
    }
}

fn is_infantry(def: &CardDef) -> bool {
    def.card_type == CardType::Unit && !def.is_vehicle()
}

fn row_label(row: Row) -> &'static str {
    match row {
        Row::Frontline => "FRONTLINE",
        Row::Backline => "BACKLINE",
    }
}
