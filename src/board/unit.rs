//! Unit instances.

use serde::{Deserialize, Serialize};

use crate::catalog::CardId;
use crate::core::{InstanceId, PlayerId};

/// One concrete copy of a card, in hand or on the battlefield.
///
/// Identity lives here; mutable combat numbers live in the combat stores
/// keyed by `instance_id`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitInstance {
    /// Match-unique identity of this copy.
    pub instance_id: InstanceId,
    /// The definition this copy was printed from.
    pub card_id: CardId,
    /// Seat that owns the copy. Changes on hijack.
    pub owner: PlayerId,
    /// Sequence of the event whose resolution created this copy.
    /// Zero for copies built into a library before the match starts.
    pub source_event: u64,
    /// Card whose effect created this copy; for library copies, the
    /// card itself.
    pub source_card: CardId,
}

impl UnitInstance {
    /// Create a library copy: no creating event, sourced from itself.
    #[must_use]
    pub const fn new(instance_id: InstanceId, card_id: CardId, owner: PlayerId) -> Self {
        Self {
            instance_id,
            card_id,
            owner,
            source_event: 0,
            source_card: card_id,
        }
    }

    /// Stamp the provenance of a copy spawned mid-match by an effect.
    #[must_use]
    pub const fn spawned_by(mut self, source_event: u64, source_card: CardId) -> Self {
        self.source_event = source_event;
        self.source_card = source_card;
        self
    }
}

impl std::fmt::Display for UnitInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]", self.instance_id, self.card_id)
    }
}
