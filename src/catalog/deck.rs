//! Deck lists.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

use super::definition::CardId;
use super::registry::CardCatalog;

/// An ordered deck list. Order here is the pre-shuffle order; the match
/// shuffles with its seeded RNG at setup.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckDef {
    cards: Vec<CardId>,
}

impl DeckDef {
    /// Create an empty deck list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a deck list from card ids.
    #[must_use]
    pub fn from_cards(cards: Vec<CardId>) -> Self {
        Self { cards }
    }

    /// Add `count` copies of a card (builder pattern).
    #[must_use]
    pub fn with_copies(mut self, card: CardId, count: usize) -> Self {
        self.cards.extend(std::iter::repeat(card).take(count));
        self
    }

    /// Number of cards in the list.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// The card ids in list order.
    #[must_use]
    pub fn cards(&self) -> &[CardId] {
        &self.cards
    }

    /// Check that every listed card exists in the catalog and that only
    /// deployable or tactic cards appear (no tokens in deck lists).
    pub fn validate(&self, catalog: &CardCatalog) -> Result<()> {
        if self.cards.is_empty() {
            return Err(EngineError::InvalidSetup {
                reason: "deck list is empty".into(),
            });
        }
        for &id in &self.cards {
            let def = catalog.require(id)?;
            if def.card_type == super::definition::CardType::Token {
                return Err(EngineError::InvalidSetup {
                    reason: format!("deck list contains token card {id}"),
                });
            }
        }
        Ok(())
    }
}
