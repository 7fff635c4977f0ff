//! Reactive diplomacy: relations between seats and the rules that
//! shift them in response to match events.

pub mod listener;
pub mod matrix;
pub mod registry;

pub use listener::{DiplomacyListener, SharedReactionRegistry};
pub use matrix::{DiplomacyMatrix, DiplomacyRelation};
pub use registry::EventReactionRegistry;
