//! Card definitions - static card data.
//!
//! `CardDef` holds the immutable properties of a card type: cost, combat
//! stats, keywords, faction. Instance-specific data (shields remaining,
//! damage taken, locks) is stored separately in the combat stores.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Unique identifier for a card definition.
///
/// This identifies the "type" of card (e.g. "Marine Fireteam"), not a
/// specific unit instance in a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Broad card category. Only units and tokens can occupy lane slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardType {
    Unit,
    Token,
    Tactic,
    Vessel,
}

impl CardType {
    /// Whether cards of this type can be placed on the battlefield.
    #[must_use]
    pub fn is_deployable(self) -> bool {
        matches!(self, CardType::Unit | CardType::Token)
    }
}

/// Card faction. Drives diplomacy reactions, not card legality.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Faction {
    Unsc,
    Covenant,
    Flood,
    Forerunner,
    Neutral,
}

/// Combat keywords. Each one is a fixed rules hook; cards either have a
/// keyword or they don't.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Keyword {
    /// Backline unit may attack past its own frontline.
    Ranged,
    /// Untargetable until the unit itself attacks; refreshes each turn.
    Camo,
    /// Doubles damage against a defender whose shields are down.
    Headshot,
    /// Gains +1 attack per other allied infantry in the lane, up to +2.
    Squad,
    /// Attacks bypass the defender's shields entirely.
    Sentinel,
    /// Hitting a vehicle locks it out of acting until the next turn.
    Emp,
    /// May commandeer an enemy vehicle in the same lane.
    Hijack,
    /// Kills of non-vehicles spawn a token behind the attacker.
    Infect,
    /// No summoning sickness: may act the turn it is deployed.
    DropPod,
    /// Attacks deal plasma damage (minimum 1 after all reductions).
    Plasma,
    /// Attacks deal ballistic damage.
    Ballistic,
    /// The unit is a vehicle: hijackable, EMP-lockable, immune to infection.
    Vehicle,
    /// On deploy, heals the most damaged ally in the lane by 2.
    Medic,
}

/// Combat statistics printed on a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub attack: i32,
    pub shield_cap: i32,
    pub health_cap: i32,
}

impl Stats {
    /// Create a new stat line.
    #[must_use]
    pub const fn new(attack: i32, shield_cap: i32, health_cap: i32) -> Self {
        Self {
            attack,
            shield_cap,
            health_cap,
        }
    }
}

/// Deployment cost. Both components are non-negative; tokens cost nothing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cost {
    pub supply: i32,
    pub battery: i32,
}

impl Cost {
    /// Create a new cost.
    #[must_use]
    pub const fn new(supply: i32, battery: i32) -> Self {
        Self { supply, battery }
    }

    /// A supply-only cost.
    #[must_use]
    pub const fn supply(amount: i32) -> Self {
        Self {
            supply: amount,
            battery: 0,
        }
    }
}

/// Static card definition.
///
/// ## Example
///
/// ```
/// use lanewar::catalog::{CardDef, CardId, CardType, Cost, Faction, Keyword, Stats};
///
/// let marine = CardDef::new(CardId::new(1), "Marine Fireteam", Faction::Unsc, CardType::Unit)
///     .with_cost(Cost::supply(2))
///     .with_stats(Stats::new(2, 0, 3))
///     .with_keyword(Keyword::Ballistic)
///     .with_keyword(Keyword::Squad);
///
/// assert!(marine.has_keyword(Keyword::Squad));
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CardDef {
    /// Unique identifier for this card definition.
    pub id: CardId,

    /// Card name (for display/debugging).
    pub name: String,

    /// Owning faction.
    pub faction: Faction,

    /// Broad category.
    pub card_type: CardType,

    /// Deployment cost.
    pub cost: Cost,

    /// Combat statistics. Tactics have none.
    pub stats: Option<Stats>,

    /// Combat keywords.
    pub keywords: SmallVec<[Keyword; 4]>,

    /// Free-form tags, e.g. "INFANTRY", "AIR".
    pub tags: Vec<String>,

    /// Card spawned by this unit's kill effects, if any.
    pub token_template: Option<CardId>,
}

impl CardDef {
    /// Create a new card definition.
    #[must_use]
    pub fn new(id: CardId, name: impl Into<String>, faction: Faction, card_type: CardType) -> Self {
        Self {
            id,
            name: name.into(),
            faction,
            card_type,
            cost: Cost::default(),
            stats: None,
            keywords: SmallVec::new(),
            tags: Vec::new(),
            token_template: None,
        }
    }

    /// Set the cost (builder pattern).
    #[must_use]
    pub fn with_cost(mut self, cost: Cost) -> Self {
        self.cost = cost;
        self
    }

    /// Set the stat line (builder pattern).
    #[must_use]
    pub fn with_stats(mut self, stats: Stats) -> Self {
        self.stats = Some(stats);
        self
    }

    /// Add a keyword (builder pattern).
    #[must_use]
    pub fn with_keyword(mut self, keyword: Keyword) -> Self {
        if !self.keywords.contains(&keyword) {
            self.keywords.push(keyword);
        }
        self
    }

    /// Add a tag (builder pattern).
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Set the spawned token card (builder pattern).
    #[must_use]
    pub fn with_token_template(mut self, token: CardId) -> Self {
        self.token_template = Some(token);
        self
    }

    /// Check for a keyword.
    #[must_use]
    pub fn has_keyword(&self, keyword: Keyword) -> bool {
        self.keywords.contains(&keyword)
    }

    /// Check for a tag.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    /// Whether the unit is a vehicle.
    #[must_use]
    pub fn is_vehicle(&self) -> bool {
        self.has_keyword(Keyword::Vehicle)
    }

    /// Printed attack, 0 for cards without stats.
    #[must_use]
    pub fn attack(&self) -> i32 {
        self.stats.map_or(0, |s| s.attack)
    }
}
