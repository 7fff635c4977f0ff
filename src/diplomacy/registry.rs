//! The event-reaction registry: diplomacy state plus the transitions
//! that match events drive.
//!
//! One stateful registry reacts to five event types (TURN_STARTED,
//! TURN_ENDED, KILL_OCCURRED, INFECT_TRIGGERED, ATTACK_DECLARED) and
//! tracks per seat: commendation, faith, biomass, betrayer marks, and
//! bonus-turn credits, plus the global schism and survival-protocol
//! flags. `can_target` is the single targeting-legality gate the rest
//! of the engine consults.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::catalog::Faction;
use crate::core::PlayerId;
use crate::events::{EventSink, EventType, GameEvent, ReactionHost};

use super::matrix::{DiplomacyMatrix, DiplomacyRelation};

/// Schism fires once summed Covenant commendation exceeds this.
pub const SCHISM_COMMENDATION_THRESHOLD: i32 = 15;

/// Survival protocol fires once any Flood seat's biomass exceeds this.
pub const BIOMASS_ALERT_THRESHOLD: i32 = 15;

/// How many turns a betrayer mark lasts.
const BETRAYER_MARK_TURNS: u32 = 3;

/// Diplomacy state and its event-driven transitions.
#[derive(Debug)]
pub struct EventReactionRegistry {
    matrix: DiplomacyMatrix,
    factions: FxHashMap<PlayerId, Faction>,
    commendation: FxHashMap<PlayerId, i32>,
    faith: FxHashMap<PlayerId, i32>,
    biomass: FxHashMap<PlayerId, i32>,
    betrayer_until: FxHashMap<PlayerId, u32>,
    proto_gravemind_owners: FxHashSet<PlayerId>,
    bonus_turns: FxHashMap<PlayerId, u32>,
    schism_active: bool,
    survival_protocol_active: bool,
}

impl EventReactionRegistry {
    /// Create a registry with each seat's faction.
    #[must_use]
    pub fn new(factions: impl IntoIterator<Item = (PlayerId, Faction)>) -> Self {
        Self {
            matrix: DiplomacyMatrix::new(),
            factions: factions.into_iter().collect(),
            commendation: FxHashMap::default(),
            faith: FxHashMap::default(),
            biomass: FxHashMap::default(),
            betrayer_until: FxHashMap::default(),
            proto_gravemind_owners: FxHashSet::default(),
            bonus_turns: FxHashMap::default(),
            schism_active: false,
            survival_protocol_active: false,
        }
    }

    /// Reassign a seat's faction.
    pub fn set_player_faction(&mut self, player: PlayerId, faction: Faction) {
        self.factions.insert(player, faction);
    }

    /// The relation between two seats.
    #[must_use]
    pub fn relation_of(&self, a: PlayerId, b: PlayerId) -> DiplomacyRelation {
        self.matrix.relation_of(a, b)
    }

    /// The single targeting-legality gate: self-targeting is out, allies
    /// are out, civil war only licenses Covenant-on-Covenant strikes.
    #[must_use]
    pub fn can_target(&self, source: PlayerId, target: PlayerId) -> bool {
        if source == target {
            return false;
        }
        match self.relation_of(source, target) {
            DiplomacyRelation::Alliance => false,
            DiplomacyRelation::CivilWar => self.is_covenant(source) && self.is_covenant(target),
            DiplomacyRelation::Peace => true,
        }
    }

    #[must_use]
    pub fn is_betrayer_marked(&self, player: PlayerId, turn: u32) -> bool {
        self.betrayer_until.get(&player).is_some_and(|&until| until >= turn)
    }

    #[must_use]
    pub fn has_bonus_turn(&self, player: PlayerId) -> bool {
        self.bonus_turns.get(&player).copied().unwrap_or(0) > 0
    }

    /// Spend one bonus-turn credit if the seat has any.
    pub fn consume_bonus_turn(&mut self, player: PlayerId) {
        if let Some(credits) = self.bonus_turns.get_mut(&player) {
            *credits = credits.saturating_sub(1);
        }
    }

    #[must_use]
    pub fn commendation_of(&self, player: PlayerId) -> i32 {
        self.commendation.get(&player).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn faith_of(&self, player: PlayerId) -> i32 {
        self.faith.get(&player).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn biomass_of(&self, player: PlayerId) -> i32 {
        self.biomass.get(&player).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn schism_active(&self) -> bool {
        self.schism_active
    }

    #[must_use]
    pub fn survival_protocol_active(&self) -> bool {
        self.survival_protocol_active
    }

    /// React to one dispatched event.
    pub fn on_event(&mut self, event: &GameEvent, sink: &mut EventSink, host: &mut dyn ReactionHost) {
        match event.event_type {
            EventType::TurnStarted => {
                self.process_schism(event, sink, host);
                self.evaluate_survival_protocol(event, sink, host);
                self.cleanup_expired_betrayer_marks(event.turn);
            }
            EventType::KillOccurred => self.handle_kill(event, sink, host),
            EventType::InfectTriggered => {
                if let Some(flood_player) = event.source_player {
                    self.add_biomass(flood_player, 1, event, sink, host);
                }
            }
            EventType::TurnEnded => {
                if self.survival_protocol_active {
                    self.apply_resource_aid(event, sink, host);
                }
            }
            EventType::AttackDeclared => self.handle_betrayal_if_needed(event, sink),
            _ => {}
        }
    }

    /// Grow a Flood seat's biomass and re-check the survival protocol.
    pub fn add_biomass(
        &mut self,
        player: PlayerId,
        amount: i32,
        basis: &GameEvent,
        sink: &mut EventSink,
        host: &mut dyn ReactionHost,
    ) {
        if amount <= 0 {
            return;
        }
        *self.biomass.entry(player).or_insert(0) += amount;
        self.evaluate_survival_protocol(basis, sink, host);
    }

    /// Record whether a seat holds a proto-gravemind and re-check the
    /// survival protocol.
    pub fn mark_proto_gravemind(
        &mut self,
        player: PlayerId,
        present: bool,
        basis: &GameEvent,
        sink: &mut EventSink,
        host: &mut dyn ReactionHost,
    ) {
        if present {
            self.proto_gravemind_owners.insert(player);
        } else {
            self.proto_gravemind_owners.remove(&player);
        }
        self.evaluate_survival_protocol(basis, sink, host);
    }

    /// Covenant council truce: under an active schism, both parties pay
    /// the required tribute and the pair returns to PEACE — unless one
    /// of them smuggled in an assassin, which breaks the truce and
    /// credits the wronged party a bonus turn.
    pub fn try_council_truce(
        &mut self,
        player_a: PlayerId,
        player_b: PlayerId,
        payment_a: i32,
        payment_b: i32,
        required_payment: i32,
        assassin_deployed: bool,
        basis: &GameEvent,
        sink: &mut EventSink,
    ) -> bool {
        if !self.schism_active || payment_a < required_payment || payment_b < required_payment {
            return false;
        }

        sink.publish(
            basis
                .follow_up(EventType::CovenantTruceProposed)
                .with_source_player(player_a)
                .with_target_player(player_b)
                .with_value(i64::from(required_payment)),
        );

        if assassin_deployed {
            *self.bonus_turns.entry(player_a).or_insert(0) += 1;
            sink.publish(
                basis
                    .follow_up(EventType::CovenantTruceBroken)
                    .with_source_player(player_a)
                    .with_target_player(player_b)
                    .with_tag("ASSASSIN_DEPLOYED"),
            );
            return false;
        }

        self.set_relation_and_emit(player_a, player_b, DiplomacyRelation::Peace, basis, sink);
        true
    }

    /// During a schism, a Covenant pair stays locked in civil war only
    /// while both keep orbital presence; losing it returns them to PEACE.
    pub fn resolve_schism_target_lock_by_orbit(
        &mut self,
        player_a: PlayerId,
        player_b: PlayerId,
        orbit_count_a: i32,
        orbit_count_b: i32,
        basis: &GameEvent,
        sink: &mut EventSink,
    ) {
        if !self.schism_active {
            return;
        }
        if orbit_count_a <= 0 || orbit_count_b <= 0 {
            self.set_relation_and_emit(player_a, player_b, DiplomacyRelation::Peace, basis, sink);
        }
    }

    fn handle_kill(&mut self, event: &GameEvent, sink: &mut EventSink, host: &mut dyn ReactionHost) {
        let Some(actor) = event.source_player else {
            return;
        };
        *self.commendation.entry(actor).or_insert(0) += 1;
        if self.is_covenant(actor) {
            *self.faith.entry(actor).or_insert(0) += 2;
        }

        if self.schism_active {
            if let Some(target) = event.target_player {
                if actor != target && self.is_covenant(actor) && self.is_covenant(target) {
                    *self.faith.entry(actor).or_insert(0) += 2;
                    host.grant_supply(actor, 2);
                }
            }
        }

        self.process_schism(event, sink, host);
    }

    fn process_schism(&mut self, basis: &GameEvent, sink: &mut EventSink, host: &mut dyn ReactionHost) {
        let covenant: Vec<PlayerId> = host
            .player_ids()
            .into_iter()
            .filter(|&p| self.is_covenant(p))
            .collect();
        if covenant.len() < 2 {
            return;
        }

        let commendation_sum: i32 = covenant.iter().map(|&p| self.commendation_of(p)).sum();

        if !self.schism_active && commendation_sum > SCHISM_COMMENDATION_THRESHOLD {
            self.schism_active = true;
            for i in 0..covenant.len() {
                for j in (i + 1)..covenant.len() {
                    self.set_relation_and_emit(
                        covenant[i],
                        covenant[j],
                        DiplomacyRelation::CivilWar,
                        basis,
                        sink,
                    );
                }
            }
            sink.publish(
                basis
                    .follow_up(EventType::CovenantSchismTriggered)
                    .with_value(i64::from(commendation_sum)),
            );
        }
    }

    fn evaluate_survival_protocol(
        &mut self,
        basis: &GameEvent,
        sink: &mut EventSink,
        host: &mut dyn ReactionHost,
    ) {
        let players = host.player_ids();
        let flood: Vec<PlayerId> = players
            .iter()
            .copied()
            .filter(|&p| self.faction_of(p) == Faction::Flood)
            .collect();
        if flood.is_empty() {
            return;
        }

        let alert = flood
            .iter()
            .any(|&p| self.biomass_of(p) > BIOMASS_ALERT_THRESHOLD)
            || flood.iter().any(|p| self.proto_gravemind_owners.contains(p));

        if alert && !self.survival_protocol_active {
            self.survival_protocol_active = true;
            let candidates: Vec<PlayerId> = players
                .iter()
                .copied()
                .filter(|&p| {
                    matches!(
                        self.faction_of(p),
                        Faction::Unsc | Faction::Covenant | Faction::Forerunner
                    )
                })
                .collect();
            for i in 0..candidates.len() {
                for j in (i + 1)..candidates.len() {
                    self.set_relation_and_emit(
                        candidates[i],
                        candidates[j],
                        DiplomacyRelation::Alliance,
                        basis,
                        sink,
                    );
                }
            }
            sink.publish(
                basis
                    .follow_up(EventType::SurvivalProtocolStarted)
                    .with_tag("BIOMASS_ALERT"),
            );
        } else if !alert && self.survival_protocol_active {
            self.survival_protocol_active = false;
            for i in 0..players.len() {
                for j in (i + 1)..players.len() {
                    self.set_relation_and_emit(
                        players[i],
                        players[j],
                        DiplomacyRelation::Peace,
                        basis,
                        sink,
                    );
                }
            }
            sink.publish(basis.follow_up(EventType::SurvivalProtocolEnded));
        }
    }

    fn apply_resource_aid(&mut self, basis: &GameEvent, sink: &mut EventSink, host: &mut dyn ReactionHost) {
        let players = host.player_ids();
        for &receiver in &players {
            if host.current_supply(receiver) >= 3 {
                continue;
            }
            for &donor in &players {
                if donor == receiver {
                    continue;
                }
                if self.relation_of(receiver, donor) != DiplomacyRelation::Alliance {
                    continue;
                }
                if host.current_supply(donor) <= 3 {
                    continue;
                }

                if host.consume_supply(donor, 1) {
                    host.grant_supply(receiver, 1);
                    sink.publish(
                        basis
                            .follow_up(EventType::ResourceAidTransferred)
                            .with_source_player(donor)
                            .with_target_player(receiver)
                            .with_value(1),
                    );
                    break;
                }
            }
        }
    }

    fn handle_betrayal_if_needed(&mut self, event: &GameEvent, sink: &mut EventSink) {
        if !self.survival_protocol_active {
            return;
        }
        let (Some(source), Some(target)) = (event.source_player, event.target_player) else {
            return;
        };
        if source == target {
            return;
        }
        if self.relation_of(source, target) == DiplomacyRelation::Alliance {
            let until = event.turn + BETRAYER_MARK_TURNS;
            self.betrayer_until.insert(source, until);
            sink.publish(
                event
                    .follow_up(EventType::BetrayerMarked)
                    .with_source_player(source)
                    .with_value(i64::from(until)),
            );
        }
    }

    fn cleanup_expired_betrayer_marks(&mut self, turn: u32) {
        self.betrayer_until.retain(|_, &mut until| until >= turn);
    }

    fn faction_of(&self, player: PlayerId) -> Faction {
        self.factions.get(&player).copied().unwrap_or(Faction::Neutral)
    }

    fn is_covenant(&self, player: PlayerId) -> bool {
        self.faction_of(player) == Faction::Covenant
    }

    fn set_relation_and_emit(
        &mut self,
        a: PlayerId,
        b: PlayerId,
        relation: DiplomacyRelation,
        basis: &GameEvent,
        sink: &mut EventSink,
    ) {
        self.matrix.set_relation(a, b, relation);
        sink.publish(
            basis
                .follow_up(EventType::DiplomacyRelationChanged)
                .with_source_player(a)
                .with_target_player(b)
                .with_tag(relation.name()),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestHost {
        supply: Vec<i32>,
        cap: i32,
    }

    impl TestHost {
        fn new(supply: Vec<i32>) -> Self {
            Self { supply, cap: 10 }
        }
    }

    impl ReactionHost for TestHost {
        fn player_ids(&self) -> Vec<PlayerId> {
            (0..self.supply.len() as u8).map(PlayerId::new).collect()
        }

        fn current_supply(&self, player: PlayerId) -> i32 {
            self.supply[player.index()]
        }

        fn grant_supply(&mut self, player: PlayerId, amount: i32) {
            let slot = &mut self.supply[player.index()];
            *slot = (*slot + amount.max(0)).min(self.cap);
        }

        fn consume_supply(&mut self, player: PlayerId, amount: i32) -> bool {
            let slot = &mut self.supply[player.index()];
            if *slot < amount {
                return false;
            }
            *slot -= amount;
            true
        }
    }

    const P0: PlayerId = PlayerId(0);
    const P1: PlayerId = PlayerId(1);
    const P2: PlayerId = PlayerId(2);

    fn covenant_pair() -> EventReactionRegistry {
        EventReactionRegistry::new([
            (P0, Faction::Covenant),
            (P1, Faction::Covenant),
            (P2, Faction::Unsc),
        ])
    }

    fn kill_event(actor: PlayerId, victim: PlayerId) -> GameEvent {
        GameEvent::new(EventType::KillOccurred, 1, 1, actor)
            .with_source_player(actor)
            .with_target_player(victim)
    }

    fn dispatch(
        registry: &mut EventReactionRegistry,
        host: &mut TestHost,
        event: &GameEvent,
    ) -> Vec<GameEvent> {
        let mut sink = EventSink::default();
        registry.on_event(event, &mut sink, host);
        sink.take_pending()
    }

    #[test]
    fn test_schism_fires_exactly_once_on_threshold_edge() {
        let mut registry = covenant_pair();
        let mut host = TestHost::new(vec![5, 5, 5]);

        // 14 combined kills: no schism.
        for _ in 0..7 {
            dispatch(&mut registry, &mut host, &kill_event(P0, P2));
            dispatch(&mut registry, &mut host, &kill_event(P1, P2));
        }
        assert!(!registry.schism_active());

        // 15th does not exceed the threshold yet.
        dispatch(&mut registry, &mut host, &kill_event(P0, P2));
        assert!(!registry.schism_active());

        // 16th crosses it.
        let raised = dispatch(&mut registry, &mut host, &kill_event(P1, P2));
        assert!(registry.schism_active());
        assert_eq!(
            registry.relation_of(P0, P1),
            DiplomacyRelation::CivilWar
        );
        let schism_events = raised
            .iter()
            .filter(|e| e.event_type == EventType::CovenantSchismTriggered)
            .count();
        assert_eq!(schism_events, 1);

        // Further kills never re-fire it.
        let again = dispatch(&mut registry, &mut host, &kill_event(P0, P2));
        assert!(again
            .iter()
            .all(|e| e.event_type != EventType::CovenantSchismTriggered));
    }

    #[test]
    fn test_covenant_on_covenant_kill_under_schism_grants_spoils() {
        let mut registry = covenant_pair();
        let mut host = TestHost::new(vec![5, 5, 5]);

        for _ in 0..16 {
            dispatch(&mut registry, &mut host, &kill_event(P0, P2));
        }
        assert!(registry.schism_active());
        let faith_before = registry.faith_of(P0);

        dispatch(&mut registry, &mut host, &kill_event(P0, P1));
        // +2 base covenant faith, +2 civil-war spoils.
        assert_eq!(registry.faith_of(P0), faith_before + 4);
        assert_eq!(host.current_supply(P0), 7);
    }

    #[test]
    fn test_can_target_matrix() {
        let mut registry = covenant_pair();
        assert!(!registry.can_target(P0, P0));
        assert!(registry.can_target(P0, P2));

        registry.matrix.set_relation(P0, P2, DiplomacyRelation::Alliance);
        assert!(!registry.can_target(P0, P2));

        registry.matrix.set_relation(P0, P1, DiplomacyRelation::CivilWar);
        assert!(registry.can_target(P0, P1));

        // Civil war licenses only Covenant pairs.
        registry.matrix.set_relation(P1, P2, DiplomacyRelation::CivilWar);
        assert!(!registry.can_target(P1, P2));
    }

    #[test]
    fn test_survival_protocol_toggles_on_biomass() {
        let mut registry = EventReactionRegistry::new([
            (P0, Faction::Unsc),
            (P1, Faction::Covenant),
            (P2, Faction::Flood),
        ]);
        let mut host = TestHost::new(vec![5, 5, 5]);
        let basis = GameEvent::new(EventType::InfectTriggered, 1, 1, P2);

        let mut sink = EventSink::default();
        registry.add_biomass(P2, 15, &basis, &mut sink, &mut host);
        assert!(!registry.survival_protocol_active());

        registry.add_biomass(P2, 1, &basis, &mut sink, &mut host);
        assert!(registry.survival_protocol_active());
        assert_eq!(registry.relation_of(P0, P1), DiplomacyRelation::Alliance);
        // The Flood seat is not in the alliance.
        assert_eq!(registry.relation_of(P0, P2), DiplomacyRelation::Peace);

        let raised = sink.take_pending();
        assert!(raised
            .iter()
            .any(|e| e.event_type == EventType::SurvivalProtocolStarted));
    }

    #[test]
    fn test_proto_gravemind_triggers_and_clears_protocol() {
        let mut registry = EventReactionRegistry::new([
            (P0, Faction::Unsc),
            (P1, Faction::Covenant),
            (P2, Faction::Flood),
        ]);
        let mut host = TestHost::new(vec![5, 5, 5]);
        let basis = GameEvent::new(EventType::UnitDeployed, 2, 1, P2);
        let mut sink = EventSink::default();

        registry.mark_proto_gravemind(P2, true, &basis, &mut sink, &mut host);
        assert!(registry.survival_protocol_active());

        registry.mark_proto_gravemind(P2, false, &basis, &mut sink, &mut host);
        assert!(!registry.survival_protocol_active());
        assert_eq!(registry.relation_of(P0, P1), DiplomacyRelation::Peace);
        assert!(sink
            .take_pending()
            .iter()
            .any(|e| e.event_type == EventType::SurvivalProtocolEnded));
    }

    #[test]
    fn test_resource_aid_one_transfer_per_receiver() {
        let mut registry = EventReactionRegistry::new([
            (P0, Faction::Unsc),
            (P1, Faction::Covenant),
            (P2, Faction::Flood),
        ]);
        let mut host = TestHost::new(vec![2, 8, 5]);
        let basis = GameEvent::new(EventType::InfectTriggered, 1, 1, P2);
        let mut sink = EventSink::default();
        registry.add_biomass(P2, 16, &basis, &mut sink, &mut host);
        assert!(registry.survival_protocol_active());

        let turn_end = GameEvent::new(EventType::TurnEnded, 1, 1, P0);
        let raised = dispatch(&mut registry, &mut host, &turn_end);

        let transfers: Vec<_> = raised
            .iter()
            .filter(|e| e.event_type == EventType::ResourceAidTransferred)
            .collect();
        assert_eq!(transfers.len(), 1);
        assert_eq!(transfers[0].source_player, Some(P1));
        assert_eq!(transfers[0].target_player, Some(P0));
        assert_eq!(host.current_supply(P0), 3);
        assert_eq!(host.current_supply(P1), 7);
    }

    #[test]
    fn test_betrayal_marks_attacker_and_expires_lazily() {
        let mut registry = EventReactionRegistry::new([
            (P0, Faction::Unsc),
            (P1, Faction::Covenant),
            (P2, Faction::Flood),
        ]);
        let mut host = TestHost::new(vec![5, 5, 5]);
        let basis = GameEvent::new(EventType::InfectTriggered, 4, 1, P2);
        let mut sink = EventSink::default();
        registry.add_biomass(P2, 16, &basis, &mut sink, &mut host);

        let attack = GameEvent::new(EventType::AttackDeclared, 4, 1, P0)
            .with_source_player(P0)
            .with_target_player(P1);
        let raised = dispatch(&mut registry, &mut host, &attack);
        assert!(raised
            .iter()
            .any(|e| e.event_type == EventType::BetrayerMarked));
        assert!(registry.is_betrayer_marked(P0, 4));
        assert!(registry.is_betrayer_marked(P0, 7));

        // Mark expires when a turn past the window starts.
        let late_turn = GameEvent::new(EventType::TurnStarted, 8, 2, P1);
        dispatch(&mut registry, &mut host, &late_turn);
        assert!(!registry.is_betrayer_marked(P0, 8));
    }

    #[test]
    fn test_council_truce_requires_schism_and_tribute() {
        let mut registry = covenant_pair();
        let mut host = TestHost::new(vec![5, 5, 5]);
        let basis = GameEvent::new(EventType::TurnStarted, 5, 2, P0);
        let mut sink = EventSink::default();

        // No schism yet: refused outright.
        assert!(!registry.try_council_truce(P0, P1, 5, 5, 3, false, &basis, &mut sink));

        for _ in 0..16 {
            dispatch(&mut registry, &mut host, &kill_event(P0, P2));
        }
        assert!(registry.schism_active());

        // Short tribute: refused.
        assert!(!registry.try_council_truce(P0, P1, 2, 5, 3, false, &basis, &mut sink));

        // Honest truce restores peace.
        assert!(registry.try_council_truce(P0, P1, 5, 5, 3, false, &basis, &mut sink));
        assert_eq!(registry.relation_of(P0, P1), DiplomacyRelation::Peace);
    }

    #[test]
    fn test_council_truce_assassin_breaks_and_credits_bonus_turn() {
        let mut registry = covenant_pair();
        let mut host = TestHost::new(vec![5, 5, 5]);
        let basis = GameEvent::new(EventType::TurnStarted, 5, 2, P0);
        let mut sink = EventSink::default();

        for _ in 0..16 {
            dispatch(&mut registry, &mut host, &kill_event(P0, P2));
        }

        assert!(!registry.try_council_truce(P0, P1, 5, 5, 3, true, &basis, &mut sink));
        assert_eq!(registry.relation_of(P0, P1), DiplomacyRelation::CivilWar);
        assert!(registry.has_bonus_turn(P0));

        registry.consume_bonus_turn(P0);
        assert!(!registry.has_bonus_turn(P0));

        let raised = sink.take_pending();
        assert!(raised
            .iter()
            .any(|e| e.event_type == EventType::CovenantTruceBroken));
    }

    #[test]
    fn test_orbit_loss_unlocks_schism_pair() {
        let mut registry = covenant_pair();
        let mut host = TestHost::new(vec![5, 5, 5]);
        let basis = GameEvent::new(EventType::TurnStarted, 6, 2, P0);
        let mut sink = EventSink::default();

        for _ in 0..16 {
            dispatch(&mut registry, &mut host, &kill_event(P0, P2));
        }
        assert_eq!(registry.relation_of(P0, P1), DiplomacyRelation::CivilWar);

        // Both still in orbit: lock holds.
        registry.resolve_schism_target_lock_by_orbit(P0, P1, 1, 2, &basis, &mut sink);
        assert_eq!(registry.relation_of(P0, P1), DiplomacyRelation::CivilWar);

        registry.resolve_schism_target_lock_by_orbit(P0, P1, 0, 2, &basis, &mut sink);
        assert_eq!(registry.relation_of(P0, P1), DiplomacyRelation::Peace);
    }
}
