//! Mutable combat state and the damage pipeline.

pub mod resolver;
pub mod state;
pub mod status;

pub use resolver::{DamageContext, DamageResolver, DamageResult, DamageTransform, DamageType};
pub use state::{CombatStateStore, EntityCombatState};
pub use status::{UnitStatus, UnitStatusStore};
