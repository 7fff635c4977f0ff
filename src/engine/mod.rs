//! Match orchestration.
//!
//! The engine is decomposed into handlers that each own one slice of
//! the rules (deployment, combat, turn flow, win evaluation) and share
//! the leaf stores through [`MatchStores`]. [`MatchState`] is the
//! public façade; [`MatchBuilder`] wires a match together from decks
//! and a seed.

pub mod clock;
pub mod combat;
pub mod deploy;
pub mod match_state;
pub mod setup;
pub mod stores;
pub mod turn_flow;
pub mod win;

pub use clock::{GameMode, GamePhase, MatchStatus, TurnClock, VictoryReason};
pub use match_state::MatchState;
pub use setup::MatchBuilder;
pub use stores::MatchStores;
