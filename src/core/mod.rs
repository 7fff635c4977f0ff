//! Core identifiers and deterministic randomness.
//!
//! Everything above this module deals in the type-safe ids defined here.
//! Raw integers never cross a public API boundary.

pub mod ids;
pub mod rng;

pub use ids::{InstanceId, InstanceIdGen, PlayerId, PlayerMap, TeamId};
pub use rng::{MatchRng, MatchRngState};
