//! Static card data: definitions, the catalog, and deck lists.
//!
//! Everything here is immutable once a match starts. Mutable per-unit
//! state (damage taken, shields, locks) lives in `crate::combat`.

pub mod deck;
pub mod definition;
pub mod registry;

pub use deck::DeckDef;
pub use definition::{CardDef, CardId, CardType, Cost, Faction, Keyword, Stats};
pub use registry::CardCatalog;
