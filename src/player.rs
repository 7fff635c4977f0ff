//! Per-seat ledger: resources, base health, library, hand, discard.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::board::UnitInstance;
use crate::core::InstanceId;

/// Supply cap never grows past this.
pub const MAX_SUPPLY_CAP: i32 = 10;

/// One seat's ledger.
///
/// Zone contents are `UnitInstance`s; definitions are looked up in the
/// shared catalog when needed. The library front is the next card drawn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    base_health: i32,
    supply_cap: i32,
    current_supply: i32,
    battery: i32,
    battery_converted_this_turn: bool,
    controlled_lane_count: usize,
    full_control_streak: u32,
    library: VecDeque<UnitInstance>,
    hand: Vec<UnitInstance>,
    discard: Vec<UnitInstance>,
}

impl PlayerState {
    /// Create a ledger with a full library and an empty hand.
    #[must_use]
    pub fn new(base_health: i32, library: Vec<UnitInstance>) -> Self {
        Self {
            base_health,
            supply_cap: 0,
            current_supply: 0,
            battery: 0,
            battery_converted_this_turn: false,
            controlled_lane_count: 0,
            full_control_streak: 0,
            library: library.into(),
            hand: Vec::new(),
            discard: Vec::new(),
        }
    }

    #[must_use]
    pub fn base_health(&self) -> i32 {
        self.base_health
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.base_health > 0
    }

    #[must_use]
    pub fn supply_cap(&self) -> i32 {
        self.supply_cap
    }

    #[must_use]
    pub fn current_supply(&self) -> i32 {
        self.current_supply
    }

    #[must_use]
    pub fn battery(&self) -> i32 {
        self.battery
    }

    #[must_use]
    pub fn battery_converted_this_turn(&self) -> bool {
        self.battery_converted_this_turn
    }

    #[must_use]
    pub fn hand(&self) -> &[UnitInstance] {
        &self.hand
    }

    #[must_use]
    pub fn hand_size(&self) -> usize {
        self.hand.len()
    }

    #[must_use]
    pub fn library_size(&self) -> usize {
        self.library.len()
    }

    #[must_use]
    pub fn discard_size(&self) -> usize {
        self.discard.len()
    }

    #[must_use]
    pub fn controlled_lane_count(&self) -> usize {
        self.controlled_lane_count
    }

    #[must_use]
    pub fn full_control_streak(&self) -> u32 {
        self.full_control_streak
    }

    /// Set the pre-game supply cap, clamped to `[0, MAX_SUPPLY_CAP]`.
    pub fn set_starting_supply_cap(&mut self, cap: i32) {
        self.supply_cap = cap.clamp(0, MAX_SUPPLY_CAP);
        self.current_supply = self.supply_cap;
    }

    /// Turn-start resource step: cap +1 (to the maximum), refill supply,
    /// reset the battery-conversion flag.
    pub fn start_turn_resource_step(&mut self) {
        self.supply_cap = (self.supply_cap + 1).min(MAX_SUPPLY_CAP);
        self.current_supply = self.supply_cap;
        self.battery_converted_this_turn = false;
    }

    /// Grant supply up to the cap. Non-positive amounts are ignored.
    pub fn grant_supply(&mut self, amount: i32) {
        if amount <= 0 {
            return;
        }
        self.current_supply = (self.current_supply + amount).min(self.supply_cap);
    }

    /// Spend supply if available. Returns false without mutating when the
    /// player cannot pay.
    pub fn consume_supply(&mut self, amount: i32) -> bool {
        if amount <= 0 {
            return true;
        }
        if self.current_supply < amount {
            return false;
        }
        self.current_supply -= amount;
        true
    }

    /// Pay a combined supply+battery cost atomically. Returns false
    /// without mutating when either component is short.
    pub fn spend_resources(&mut self, supply_cost: i32, battery_cost: i32) -> bool {
        if self.current_supply < supply_cost || self.battery < battery_cost {
            return false;
        }
        self.current_supply -= supply_cost;
        self.battery -= battery_cost;
        true
    }

    /// Draw up to `count` cards. Stops quietly when the library runs out.
    pub fn draw(&mut self, count: usize) -> Vec<UnitInstance> {
        let mut drawn = Vec::new();
        for _ in 0..count {
            match self.library.pop_front() {
                Some(card) => {
                    self.hand.push(card);
                    drawn.push(card);
                }
                None => break,
            }
        }
        drawn
    }

    /// Find a card in hand.
    #[must_use]
    pub fn find_hand_card(&self, instance: InstanceId) -> Option<&UnitInstance> {
        self.hand.iter().find(|c| c.instance_id == instance)
    }

    /// Remove a card from hand.
    pub fn remove_from_hand(&mut self, instance: InstanceId) -> Option<UnitInstance> {
        let idx = self.hand.iter().position(|c| c.instance_id == instance)?;
        Some(self.hand.remove(idx))
    }

    /// Discard a hand card for one battery charge. The caller checks the
    /// once-per-turn rule and hand membership first.
    pub fn convert_hand_card_to_battery(&mut self, instance: InstanceId) -> Option<UnitInstance> {
        let card = self.remove_from_hand(instance)?;
        self.discard.push(card);
        self.battery += 1;
        self.battery_converted_this_turn = true;
        Some(card)
    }

    /// Move a destroyed unit to the discard pile.
    pub fn put_to_discard(&mut self, card: UnitInstance) {
        self.discard.push(card);
    }

    /// Reduce base health, flooring at zero.
    pub fn apply_base_damage(&mut self, amount: i32) {
        self.base_health = (self.base_health - amount.max(0)).max(0);
    }

    /// Record how many lanes this seat controls. The full-control
    /// streak counts consecutive end-steps: it only advances when
    /// `end_step` is set, but losing full control resets it at any
    /// evaluation.
    pub fn set_lane_control(&mut self, lane_count: usize, lane_total: usize, end_step: bool) {
        self.controlled_lane_count = lane_count;
        if lane_count != lane_total {
            self.full_control_streak = 0;
        } else if end_step {
            self.full_control_streak += 1;
        }
    }
}
