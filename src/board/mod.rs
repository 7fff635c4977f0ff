//! The battlefield: three lanes, two rows per side.

pub mod battlefield;
pub mod lane;
pub mod unit;

pub use battlefield::{Battlefield, LaneSide, LaneState, UnitPosition, ROW_CAPACITY};
pub use lane::{Lane, Row};
pub use unit::UnitInstance;
