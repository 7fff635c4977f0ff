//! Deployment-phase operations: placing units and battery conversion.

use std::sync::Arc;

use crate::board::{Lane, Row};
use crate::catalog::Keyword;
use crate::combat::EntityCombatState;
use crate::core::{InstanceId, PlayerId};
use crate::diplomacy::listener::lock_registry;
use crate::error::{EngineError, Result};
use crate::events::{EventSink, EventType};

use super::clock::GamePhase;
use super::stores::{LedgerHost, MatchStores};

/// Tag marking a unit whose presence on the board counts as a
/// proto-gravemind for the survival protocol.
const PROTO_GRAVEMIND_TAG: &str = "PROTO_GRAVEMIND";

/// How much a medic heals its most damaged lane ally on deploy.
const MEDIC_HEAL_AMOUNT: i32 = 2;

pub struct DeploymentHandler<'a> {
    stores: &'a mut MatchStores,
}

impl<'a> DeploymentHandler<'a> {
    pub fn new(stores: &'a mut MatchStores) -> Self {
        Self { stores }
    }

    /// Deploy a unit card from hand onto the battlefield.
    ///
    /// Every precondition is checked before the first mutation; a
    /// rejected deploy leaves hand, resources, and board untouched.
    pub fn deploy_from_hand(
        &mut self,
        player: PlayerId,
        card: InstanceId,
        lane: Lane,
        row: Row,
    ) -> Result<()> {
        self.stores.ensure_running()?;
        self.stores.ensure_active(player)?;
        self.stores.ensure_phase(GamePhase::Deployment)?;

        let unit = *self
            .stores
            .players
            .get(player)
            .find_hand_card(card)
            .ok_or(EngineError::NotInHand { player, unit: card })?;

        let catalog = Arc::clone(&self.stores.catalog);
        let def = catalog.require(unit.card_id)?;
        if !def.card_type.is_deployable() {
            return Err(EngineError::NotDeployable { card: unit.card_id });
        }
        if !self.stores.battlefield.has_space(lane, player, row) {
            return Err(EngineError::CapacityExceeded { player, lane });
        }

        let ledger = self.stores.players.get_mut(player);
        if !ledger.spend_resources(def.cost.supply, def.cost.battery) {
            return Err(EngineError::InsufficientResources {
                player,
                required: def.cost.supply,
                available: ledger.current_supply(),
            });
        }

        let deployed = self
            .stores
            .players
            .get_mut(player)
            .remove_from_hand(card)
            .ok_or(EngineError::NotInHand { player, unit: card })?;
        self.stores.battlefield.deploy(player, lane, row, deployed)?;

        if let Some(stats) = def.stats {
            self.stores
                .combat
                .put(card, EntityCombatState::new(stats.shield_cap, stats.health_cap));
        }
        let status = self.stores.statuses.get_or_create(card);
        status.summoned_turn = Some(self.stores.clock.global_turn);
        status.has_camo_this_turn = def.has_keyword(Keyword::Camo);

        let event = self
            .stores
            .new_event(EventType::UnitDeployed)
            .with_source_player(player)
            .with_source_unit(card)
            .with_lane(lane)
            .with_value(i64::from(unit.card_id.raw()));
        self.stores.emit(event);

        if def.has_tag(PROTO_GRAVEMIND_TAG) {
            self.mark_proto_gravemind(player, true);
        }
        if def.has_keyword(Keyword::Medic) {
            self.heal_most_damaged_ally(player, lane, card)?;
        }

        Ok(())
    }

    /// Discard a hand card for one battery charge, once per turn.
    pub fn convert_to_battery(&mut self, player: PlayerId, card: InstanceId) -> Result<()> {
        self.stores.ensure_running()?;
        self.stores.ensure_active(player)?;
        if !matches!(
            self.stores.clock.phase,
            GamePhase::Deployment | GamePhase::Skirmish
        ) {
            return Err(EngineError::WrongPhase {
                actual: self.stores.clock.phase,
            });
        }

        let ledger = self.stores.players.get_mut(player);
        if ledger.battery_converted_this_turn() {
            return Err(EngineError::BatteryAlreadyConverted { player });
        }
        ledger
            .convert_hand_card_to_battery(card)
            .ok_or(EngineError::NotInHand { player, unit: card })?;
        let battery = ledger.battery();

        let event = self
            .stores
            .new_event(EventType::BatteryGenerated)
            .with_source_player(player)
            .with_source_unit(card)
            .with_value(i64::from(battery));
        self.stores.emit(event);
        Ok(())
    }

    /// Flip the diplomacy registry's proto-gravemind flag for a seat and
    /// publish whatever the registry raises in response.
    pub(crate) fn mark_proto_gravemind(&mut self, player: PlayerId, present: bool) {
        let basis = self.stores.new_event(EventType::UnitDeployed);
        let mut sink = EventSink::default();
        {
            let mut host = LedgerHost {
                players: &mut self.stores.players,
            };
            lock_registry(&self.stores.diplomacy).mark_proto_gravemind(
                player, present, &basis, &mut sink, &mut host,
            );
        }
        for raised in sink.take_pending() {
            self.stores.bus.publish(raised);
        }
        self.stores.drain_events();
    }

    /// Medic deploy trigger: heal the most damaged ally, preferring the
    /// deploy lane, then the fixed lane scan order.
    fn heal_most_damaged_ally(
        &mut self,
        owner: PlayerId,
        preferred: Lane,
        exclude: InstanceId,
    ) -> Result<()> {
        let catalog = Arc::clone(&self.stores.catalog);

        let mut selected: Option<(InstanceId, i32)> = None;
        for lane in std::iter::once(preferred).chain(Lane::ALL) {
            let mut best_missing = 0;
            for ally in self.stores.battlefield.units_of(lane, owner) {
                if ally.instance_id == exclude {
                    continue;
                }
                let Some(stats) = catalog.require(ally.card_id)?.stats else {
                    continue;
                };
                if stats.health_cap <= 0 {
                    continue;
                }
                let state = self.stores.combat.get(ally.instance_id)?;
                let missing = stats.health_cap - state.current_health();
                if missing > best_missing {
                    best_missing = missing;
                    selected = Some((ally.instance_id, stats.health_cap));
                }
            }
            // First lane with a damaged ally wins.
            if selected.is_some() {
                break;
            }
        }

        let Some((target, health_cap)) = selected else {
            return Ok(());
        };
        let healed = self
            .stores
            .combat
            .get_mut(target)?
            .heal_health(MEDIC_HEAL_AMOUNT, health_cap);
        if healed <= 0 {
            return Ok(());
        }

        let event = self
            .stores
            .new_event(EventType::StatusApplied)
            .with_source_player(owner)
            .with_source_unit(exclude)
            .with_target_unit(target)
            .with_tag("HEAL")
            .with_value(i64::from(healed));
        self.stores.emit(event);
        Ok(())
    }
}
