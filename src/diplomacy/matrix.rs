//! Pairwise diplomacy relations.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::PlayerId;

/// The relation between two seats. Unset pairs are at PEACE.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiplomacyRelation {
    #[default]
    Peace,
    Alliance,
    CivilWar,
}

impl DiplomacyRelation {
    /// Stable name used as an event tag.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            DiplomacyRelation::Peace => "PEACE",
            DiplomacyRelation::Alliance => "ALLIANCE",
            DiplomacyRelation::CivilWar => "CIVIL_WAR",
        }
    }
}

/// Symmetric relation matrix keyed by unordered seat pairs.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DiplomacyMatrix {
    relations: FxHashMap<(PlayerId, PlayerId), DiplomacyRelation>,
}

impl DiplomacyMatrix {
    /// Create an empty matrix (everyone at PEACE).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn key(a: PlayerId, b: PlayerId) -> (PlayerId, PlayerId) {
        if a <= b {
            (a, b)
        } else {
            (b, a)
        }
    }

    /// The relation between two seats. A seat is at PEACE with itself.
    #[must_use]
    pub fn relation_of(&self, a: PlayerId, b: PlayerId) -> DiplomacyRelation {
        self.relations
            .get(&Self::key(a, b))
            .copied()
            .unwrap_or_default()
    }

    /// Set the relation between two distinct seats. Self-pairs are ignored.
    pub fn set_relation(&mut self, a: PlayerId, b: PlayerId, relation: DiplomacyRelation) {
        if a == b {
            return;
        }
        self.relations.insert(Self::key(a, b), relation);
    }
}
