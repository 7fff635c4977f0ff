//! Card catalog for definition lookup.

use rustc_hash::FxHashMap;

use crate::error::{EngineError, Result};

use super::definition::{CardDef, CardId, CardType, Faction, Keyword};

/// Catalog of card definitions.
///
/// Stores every definition a match may reference and provides lookup.
/// Shared read-only between matches, so registration happens up front.
///
/// ## Example
///
/// ```
/// use lanewar::catalog::{CardCatalog, CardDef, CardId, CardType, Faction};
///
/// let mut catalog = CardCatalog::new();
/// catalog.register(CardDef::new(CardId::new(1), "Grunt Squad", Faction::Covenant, CardType::Unit));
///
/// assert_eq!(catalog.get(CardId::new(1)).unwrap().name, "Grunt Squad");
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardCatalog {
    cards: FxHashMap<CardId, CardDef>,
}

impl CardCatalog {
    /// Create a new empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a card definition.
    ///
    /// Panics if a card with the same ID already exists.
    pub fn register(&mut self, card: CardDef) {
        if self.cards.contains_key(&card.id) {
            panic!("Card with ID {:?} already registered", card.id);
        }
        self.cards.insert(card.id, card);
    }

    /// Get a card definition by ID.
    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&CardDef> {
        self.cards.get(&id)
    }

    /// Get a card definition by ID, or `UnknownCard`.
    pub fn require(&self, id: CardId) -> Result<&CardDef> {
        self.cards
            .get(&id)
            .ok_or(EngineError::UnknownCard { card: id })
    }

    /// Check if a card ID is registered.
    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.cards.contains_key(&id)
    }

    /// Check whether a card carries a keyword. Unknown cards have none.
    #[must_use]
    pub fn has_keyword(&self, id: CardId, keyword: Keyword) -> bool {
        self.get(id).is_some_and(|c| c.has_keyword(keyword))
    }

    /// Get the number of registered cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate over all card definitions.
    pub fn iter(&self) -> impl Iterator<Item = &CardDef> {
        self.cards.values()
    }

    /// Find cards by faction.
    pub fn find_by_faction(&self, faction: Faction) -> impl Iterator<Item = &CardDef> {
        self.cards.values().filter(move |c| c.faction == faction)
    }

    /// Find cards by type.
    pub fn find_by_type(&self, card_type: CardType) -> impl Iterator<Item = &CardDef> {
        self.cards.values().filter(move |c| c.card_type == card_type)
    }
}
