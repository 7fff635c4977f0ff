//! Bus adapters for the reaction registry.
//!
//! The bus dispatches each event type to listeners subscribed to that
//! exact type, so the registry is wired in through one thin adapter per
//! subscribed type, all sharing the same registry behind a mutex. The
//! engine is single-threaded per match; the mutex exists so a match can
//! be owned across threads by a caller.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::events::{EventListener, EventSink, EventType, GameEvent, ReactionHost};

use super::registry::EventReactionRegistry;

/// Shared handle to the reaction registry.
pub type SharedReactionRegistry = Arc<Mutex<EventReactionRegistry>>;

/// The event types the registry reacts to, in registration order.
const SUBSCRIBED_TYPES: [EventType; 5] = [
    EventType::TurnStarted,
    EventType::TurnEnded,
    EventType::KillOccurred,
    EventType::InfectTriggered,
    EventType::AttackDeclared,
];

/// One adapter: forwards a single event type to the shared registry.
pub struct DiplomacyListener {
    event_type: EventType,
    registry: SharedReactionRegistry,
}

impl DiplomacyListener {
    /// Create an adapter for one event type.
    #[must_use]
    pub fn new(event_type: EventType, registry: SharedReactionRegistry) -> Self {
        Self {
            event_type,
            registry,
        }
    }

    /// Adapters for every type the registry subscribes to.
    #[must_use]
    pub fn fan_out(registry: &SharedReactionRegistry) -> Vec<Box<dyn EventListener>> {
        SUBSCRIBED_TYPES
            .iter()
            .map(|&ty| Box::new(DiplomacyListener::new(ty, registry.clone())) as Box<dyn EventListener>)
            .collect()
    }
}

/// Lock the registry, recovering from a poisoned mutex. The registry
/// has no invariants that a panic mid-update could leave broken in a
/// way worse than the panic itself.
pub(crate) fn lock_registry(registry: &SharedReactionRegistry) -> MutexGuard<'_, EventReactionRegistry> {
    match registry.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

impl EventListener for DiplomacyListener {
    fn supports(&self) -> EventType {
        self.event_type
    }

    fn priority(&self) -> i32 {
        // Diplomacy reacts after any core listeners of the same type.
        100
    }

    fn on_event(&mut self, event: &GameEvent, sink: &mut EventSink, host: &mut dyn ReactionHost) {
        lock_registry(&self.registry).on_event(event, sink, host);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Faction;
    use crate::core::PlayerId;
    use crate::events::DeterministicEventBus;

    struct TestHost {
        supply: Vec<i32>,
    }

    impl ReactionHost for TestHost {
        fn player_ids(&self) -> Vec<PlayerId> {
            (0..self.supply.len() as u8).map(PlayerId::new).collect()
        }

        fn current_supply(&self, player: PlayerId) -> i32 {
            self.supply[player.index()]
        }

        fn grant_supply(&mut self, player: PlayerId, amount: i32) {
            self.supply[player.index()] += amount.max(0);
        }

        fn consume_supply(&mut self, player: PlayerId, amount: i32) -> bool {
            if self.supply[player.index()] < amount {
                return false;
            }
            self.supply[player.index()] -= amount;
            true
        }
    }

    #[test]
    fn test_fan_out_covers_subscribed_types() {
        let registry: SharedReactionRegistry = Arc::new(Mutex::new(EventReactionRegistry::new([
            (PlayerId::new(0), Faction::Covenant),
            (PlayerId::new(1), Faction::Covenant),
        ])));

        let listeners = DiplomacyListener::fan_out(&registry);
        let types: Vec<_> = listeners.iter().map(|l| l.supports()).collect();
        assert_eq!(types, SUBSCRIBED_TYPES.to_vec());
    }

    #[test]
    fn test_registry_reacts_through_the_bus() {
        let registry: SharedReactionRegistry = Arc::new(Mutex::new(EventReactionRegistry::new([
            (PlayerId::new(0), Faction::Covenant),
            (PlayerId::new(1), Faction::Covenant),
        ])));

        let mut bus = DeterministicEventBus::new();
        for listener in DiplomacyListener::fan_out(&registry) {
            bus.register(listener);
        }

        let mut host = TestHost { supply: vec![5, 5] };
        let kill = GameEvent::new(EventType::KillOccurred, 1, 1, PlayerId::new(0))
            .with_source_player(PlayerId::new(0))
            .with_target_player(PlayerId::new(1));
        bus.publish(kill);
        bus.process_queue(&mut host);

        assert_eq!(
            lock_registry(&registry).commendation_of(PlayerId::new(0)),
            1
        );
    }
}
