//! The deterministic event bus and the events that flow through it.

pub mod bus;
pub mod event;

pub use bus::{DeterministicEventBus, EventListener, EventSink, ReactionHost};
pub use event::{EventType, GameEvent};
