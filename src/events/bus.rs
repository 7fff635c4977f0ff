//! Deterministic FIFO event bus.
//!
//! `publish` appends to the queue and stamps the next sequence number;
//! `process_queue` pops the head and dispatches it to every listener
//! whose `supports()` equals the event's exact type, in ascending
//! priority order (ties broken by registration order), until the queue
//! is empty.
//!
//! The engine's `emit` helper publishes one event and immediately drains
//! the queue, so anything a listener publishes while handling event E is
//! fully processed before `emit(E)` returns to its caller. Siblings the
//! caller emits afterwards run strictly after E's whole cascade.

use std::collections::VecDeque;

use crate::core::PlayerId;

use super::event::{EventType, GameEvent};

/// Ledger access handed to listeners during dispatch.
///
/// Listeners never see the whole match; they get seat enumeration and
/// the supply operations their reactions need.
pub trait ReactionHost {
    /// All seats, in seat order.
    fn player_ids(&self) -> Vec<PlayerId>;

    /// A seat's current supply.
    fn current_supply(&self, player: PlayerId) -> i32;

    /// Grant supply up to the seat's cap.
    fn grant_supply(&mut self, player: PlayerId, amount: i32);

    /// Spend supply; false (and no mutation) when short.
    fn consume_supply(&mut self, player: PlayerId, amount: i32) -> bool;
}

/// Where listeners put the events they raise while handling another.
#[derive(Debug, Default)]
pub struct EventSink {
    pending: Vec<GameEvent>,
}

impl EventSink {
    /// Raise a follow-up event. It joins the queue after the listener
    /// pass for the current event finishes.
    pub fn publish(&mut self, event: GameEvent) {
        self.pending.push(event);
    }

    /// Take everything raised so far. The dispatcher publishes these to
    /// the queue; engine code that invokes reactions outside a dispatch
    /// does the same by hand.
    pub fn take_pending(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending)
    }
}

/// A listener subscribed to exactly one event type.
pub trait EventListener: Send {
    /// The single event type this listener handles.
    fn supports(&self) -> EventType;

    /// Dispatch order among listeners of the same type; lower fires first.
    fn priority(&self) -> i32 {
        0
    }

    /// Handle one event.
    fn on_event(&mut self, event: &GameEvent, sink: &mut EventSink, host: &mut dyn ReactionHost);
}

struct ListenerEntry {
    priority: i32,
    registration: u64,
    listener: Box<dyn EventListener>,
}

/// The bus. Sequence numbers are stamped at enqueue and strictly
/// increase over the life of a match; the dispatched-event trace is kept
/// for replay comparison and tests.
#[derive(Default)]
pub struct DeterministicEventBus {
    next_sequence: u64,
    next_registration: u64,
    queue: VecDeque<GameEvent>,
    listeners: Vec<ListenerEntry>,
    trace: Vec<GameEvent>,
}

impl DeterministicEventBus {
    /// Create an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. The listener list is re-sorted by
    /// (priority, registration order) so dispatch order is total.
    pub fn register(&mut self, listener: Box<dyn EventListener>) {
        let entry = ListenerEntry {
            priority: listener.priority(),
            registration: self.next_registration,
            listener,
        };
        self.next_registration += 1;
        self.listeners.push(entry);
        self.listeners
            .sort_by_key(|e| (e.priority, e.registration));
    }

    /// Append an event to the queue, stamping its sequence number.
    pub fn publish(&mut self, mut event: GameEvent) {
        self.next_sequence += 1;
        event.sequence = self.next_sequence;
        self.queue.push_back(event);
    }

    /// Drain the queue, dispatching each event in FIFO order. Events
    /// raised by listeners join the tail and are drained too.
    pub fn process_queue(&mut self, host: &mut dyn ReactionHost) {
        while let Some(event) = self.queue.pop_front() {
            log::trace!(
                "dispatch #{} {:?} (turn {})",
                event.sequence,
                event.event_type,
                event.turn
            );

            let mut sink = EventSink::default();
            for entry in self.listeners.iter_mut() {
                if entry.listener.supports() == event.event_type {
                    entry.listener.on_event(&event, &mut sink, host);
                }
            }
            self.trace.push(event);

            for nested in sink.take_pending() {
                self.publish(nested);
            }
        }
    }

    /// Number of events still queued.
    #[must_use]
    pub fn queued_len(&self) -> usize {
        self.queue.len()
    }

    /// Every event dispatched so far, in dispatch order.
    #[must_use]
    pub fn trace(&self) -> &[GameEvent] {
        &self.trace
    }

    /// The last stamped sequence number.
    #[must_use]
    pub fn last_sequence(&self) -> u64 {
        self.next_sequence
    }
}

impl std::fmt::Debug for DeterministicEventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeterministicEventBus")
            .field("queued", &self.queue.len())
            .field("listeners", &self.listeners.len())
            .field("dispatched", &self.trace.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Host with supply ledgers but nothing else.
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

    struct Recorder {
        supports: EventType,
        priority: i32,
        label: &'static str,
        log: std::sync::Arc<std::sync::Mutex<Vec<&'static str>>>,
    }

    impl EventListener for Recorder {
        fn supports(&self) -> EventType {
            self.supports
        }

        fn priority(&self) -> i32 {
            self.priority
        }

        fn on_event(&mut self, _: &GameEvent, _: &mut EventSink, _: &mut dyn ReactionHost) {
            self.log.lock().unwrap().push(self.label);
        }
    }

    fn event(ty: EventType) -> GameEvent {
        GameEvent::new(ty, 1, 1, PlayerId::new(0))
    }

    #[test]
    fn test_sequences_are_strictly_increasing() {
        let mut bus = DeterministicEventBus::new();
        let mut host = TestHost { supply: vec![0] };

        bus.publish(event(EventType::TurnStarted));
        bus.publish(event(EventType::CardDrawn));
        bus.process_queue(&mut host);

        let seqs: Vec<_> = bus.trace().iter().map(|e| e.sequence).collect();
        assert_eq!(seqs, vec![1, 2]);
    }

    #[test]
    fn test_priority_order_with_registration_tiebreak() {
        let log = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let mut bus = DeterministicEventBus::new();
        let mut host = TestHost { supply: vec![0] };

        for (priority, label) in [(5, "late"), (0, "first-registered"), (0, "second-registered")] {
            bus.register(Box::new(Recorder {
                supports: EventType::KillOccurred,
                priority,
                label,
                log: log.clone(),
            }));
        }

        bus.publish(event(EventType::KillOccurred));
        bus.process_queue(&mut host);

        assert_eq!(
            *log.lock().unwrap(),
            vec!["first-registered", "second-registered", "late"]
        );
    }

    #[test]
    fn test_listener_only_sees_its_type() {
        let log = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let mut bus = DeterministicEventBus::new();
        let mut host = TestHost { supply: vec![0] };

        bus.register(Box::new(Recorder {
            supports: EventType::KillOccurred,
            priority: 0,
            label: "kill",
            log: log.clone(),
        }));

        bus.publish(event(EventType::TurnStarted));
        bus.process_queue(&mut host);
        assert!(log.lock().unwrap().is_empty());
    }

    struct Cascader {
        fired: bool,
    }

    impl EventListener for Cascader {
        fn supports(&self) -> EventType {
            EventType::KillOccurred
        }

        fn on_event(&mut self, event: &GameEvent, sink: &mut EventSink, _: &mut dyn ReactionHost) {
            if !self.fired {
                self.fired = true;
                sink.publish(event.follow_up(EventType::DiplomacyRelationChanged));
            }
        }
    }

    #[test]
    fn test_nested_publish_drains_before_return() {
        let mut bus = DeterministicEventBus::new();
        let mut host = TestHost { supply: vec![0] };
        bus.register(Box::new(Cascader { fired: false }));

        bus.publish(event(EventType::KillOccurred));
        bus.process_queue(&mut host);

        let types: Vec<_> = bus.trace().iter().map(|e| e.event_type).collect();
        assert_eq!(
            types,
            vec![EventType::KillOccurred, EventType::DiplomacyRelationChanged]
        );
        assert_eq!(bus.queued_len(), 0);
    }
}
