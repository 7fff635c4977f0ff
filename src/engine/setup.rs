//! Match construction.
//!
//! `MatchBuilder` validates the seat list, instantiates and shuffles
//! each deck with the match seed, infers each seat's faction from its
//! deck, wires the diplomacy registry into the bus, and starts the
//! first turn. Everything downstream of the seed is deterministic.

use std::sync::{Arc, Mutex};

use rustc_hash::FxHashMap;

use crate::board::{Battlefield, UnitInstance};
use crate::catalog::{CardCatalog, DeckDef, Faction};
use crate::combat::{CombatStateStore, DamageResolver, UnitStatusStore};
use crate::core::{InstanceIdGen, MatchRng, PlayerId, PlayerMap, TeamId};
use crate::diplomacy::{DiplomacyListener, EventReactionRegistry, SharedReactionRegistry};
use crate::error::{EngineError, Result};
use crate::events::{DeterministicEventBus, EventType};
use crate::player::PlayerState;

use super::clock::{GameMode, MatchStatus, TurnClock};
use super::match_state::MatchState;
use super::stores::MatchStores;
use super::turn_flow::TurnFlowHandler;

/// Starting base health unless overridden.
pub const DEFAULT_BASE_HEALTH: i32 = 30;

/// Cards drawn before the first turn.
pub const OPENING_HAND_SIZE: usize = 5;

/// Tie-break order for faction inference. A deck split evenly between
/// two factions belongs to the one listed first.
const FACTION_ORDER: [Faction; 5] = [
    Faction::Unsc,
    Faction::Covenant,
    Faction::Flood,
    Faction::Forerunner,
    Faction::Neutral,
];

struct SeatConfig {
    deck: DeckDef,
    team: Option<TeamId>,
}

/// Builder for a match.
///
/// ## Example
///
/// ```no_run
/// use std::sync::Arc;
/// use lanewar::catalog::{CardCatalog, CardId, DeckDef};
/// use lanewar::engine::{GameMode, MatchBuilder};
///
/// let catalog = Arc::new(CardCatalog::new());
/// let deck = DeckDef::new().with_copies(CardId::new(1), 20);
///
/// let game = MatchBuilder::new(GameMode::Duel)
///     .seat(deck.clone())
///     .seat(deck)
///     .with_seed(42)
///     .build(catalog);
/// ```
pub struct MatchBuilder {
    mode: GameMode,
    seats: Vec<SeatConfig>,
    seed: u64,
    base_health: i32,
}

impl MatchBuilder {
    #[must_use]
    pub fn new(mode: GameMode) -> Self {
        Self {
            mode,
            seats: Vec::new(),
            seed: 0,
            base_health: DEFAULT_BASE_HEALTH,
        }
    }

    /// Add a seat on its own implicit team.
    #[must_use]
    pub fn seat(mut self, deck: DeckDef) -> Self {
        self.seats.push(SeatConfig { deck, team: None });
        self
    }

    /// Add a seat on an explicit team (team modes only).
    #[must_use]
    pub fn seat_on_team(mut self, deck: DeckDef, team: TeamId) -> Self {
        self.seats.push(SeatConfig {
            deck,
            team: Some(team),
        });
        self
    }

    /// Set the match seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Override the starting base health.
    #[must_use]
    pub fn with_base_health(mut self, base_health: i32) -> Self {
        self.base_health = base_health;
        self
    }

    /// Validate the configuration and start the match.
    pub fn build(self, catalog: Arc<CardCatalog>) -> Result<MatchState> {
        self.validate_seats()?;
        for seat in &self.seats {
            seat.deck.validate(&catalog)?;
        }

        let count = self.seats.len();
        let teams: PlayerMap<TeamId> = PlayerMap::new(count, |p| {
            self.seats[p.index()].team.unwrap_or(TeamId::new(p.0))
        });

        let mut rng = MatchRng::new(self.seed);
        let mut instance_ids = InstanceIdGen::new();

        let mut libraries = Vec::with_capacity(count);
        let mut factions = Vec::with_capacity(count);
        for (index, seat) in self.seats.iter().enumerate() {
            let owner = PlayerId::new(index as u8);
            let mut library: Vec<UnitInstance> = seat
                .deck
                .cards()
                .iter()
                .map(|&card| UnitInstance::new(instance_ids.next_id(), card, owner))
                .collect();
            rng.shuffle(&mut library);
            libraries.push(library);
            factions.push((owner, dominant_faction(&seat.deck, &catalog)?));
        }

        let players = PlayerMap::new(count, |p| {
            PlayerState::new(self.base_health, libraries[p.index()].clone())
        });

        let registry: SharedReactionRegistry =
            Arc::new(Mutex::new(EventReactionRegistry::new(factions)));
        let mut bus = DeterministicEventBus::new();
        for listener in DiplomacyListener::fan_out(&registry) {
            bus.register(listener);
        }

        let mut stores = MatchStores {
            catalog,
            mode: self.mode,
            players,
            teams,
            battlefield: Battlefield::new(count),
            combat: CombatStateStore::new(),
            statuses: UnitStatusStore::new(),
            bus,
            clock: TurnClock::new(),
            diplomacy: registry,
            resolver: DamageResolver::new(),
            attackers_used: Default::default(),
            instance_ids,
            rng,
        };

        for player in PlayerId::all(count) {
            stores.players.get_mut(player).draw(OPENING_HAND_SIZE);
        }

        stores.clock.status = MatchStatus::Running;
        let started = stores
            .new_event(EventType::GameStarted)
            .with_tag(self.mode.name())
            .with_value(count as i64);
        stores.emit(started);
        let round = stores
            .new_event(EventType::RoundStarted)
            .with_value(i64::from(stores.clock.round));
        stores.emit(round);

        let mut state = MatchState::new(stores);
        TurnFlowHandler::new(&mut state.stores).start_turn()?;
        Ok(state)
    }

    fn validate_seats(&self) -> Result<()> {
        let count = self.seats.len();
        if count < 2 {
            return Err(EngineError::InvalidSetup {
                reason: format!("a match needs at least 2 seats, got {count}"),
            });
        }
        match self.mode {
            GameMode::Duel => {
                if count != 2 {
                    return Err(EngineError::InvalidSetup {
                        reason: format!("DUEL takes exactly 2 seats, got {count}"),
                    });
                }
            }
            GameMode::FreeForAll => {}
            GameMode::Team2v2 => {
                if count != 4 {
                    return Err(EngineError::InvalidSetup {
                        reason: format!("TEAM_2V2 takes exactly 4 seats, got {count}"),
                    });
                }
                let mut sizes: FxHashMap<TeamId, usize> = FxHashMap::default();
                for (index, seat) in self.seats.iter().enumerate() {
                    let Some(team) = seat.team else {
                        return Err(EngineError::InvalidSetup {
                            reason: format!("seat {index} has no team assignment"),
                        });
                    };
                    *sizes.entry(team).or_insert(0) += 1;
                }
                if sizes.len() != 2 || sizes.values().any(|&n| n != 2) {
                    return Err(EngineError::InvalidSetup {
                        reason: "TEAM_2V2 takes 2 teams of 2 seats".into(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// The faction appearing most often in the deck list, ties broken by
/// the fixed faction order.
fn dominant_faction(deck: &DeckDef, catalog: &CardCatalog) -> Result<Faction> {
    let mut counts = [0usize; FACTION_ORDER.len()];
    for &card in deck.cards() {
        let faction = catalog.require(card)?.faction;
        if let Some(slot) = FACTION_ORDER.iter().position(|&f| f == faction) {
            counts[slot] += 1;
        }
    }
    let best = counts
        .iter()
        .enumerate()
        .max_by_key(|&(slot, &n)| (n, std::cmp::Reverse(slot)))
        .map_or(0, |(slot, _)| slot);
    Ok(FACTION_ORDER[best])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CardDef, CardId, CardType, Cost, Keyword, Stats};
    use crate::engine::clock::GamePhase;

    fn catalog() -> Arc<CardCatalog> {
        let mut catalog = CardCatalog::new();
        catalog.register(
            CardDef::new(CardId::new(1), "Marine", Faction::Unsc, CardType::Unit)
                .with_cost(Cost::supply(1))
                .with_stats(Stats::new(2, 0, 3))
                .with_keyword(Keyword::Ballistic),
        );
        catalog.register(
            CardDef::new(CardId::new(2), "Grunt", Faction::Covenant, CardType::Unit)
                .with_cost(Cost::supply(1))
                .with_stats(Stats::new(1, 0, 2))
                .with_keyword(Keyword::Plasma),
        );
        catalog.register(CardDef::new(
            CardId::new(3),
            "Spore",
            Faction::Flood,
            CardType::Token,
        ));
        Arc::new(catalog)
    }

    fn deck(card: u32) -> DeckDef {
        DeckDef::new().with_copies(CardId::new(card), 20)
    }

    #[test]
    fn test_duel_starts_running_in_deployment() {
        let game = MatchBuilder::new(GameMode::Duel)
            .seat(deck(1))
            .seat(deck(2))
            .with_seed(7)
            .build(catalog())
            .unwrap();

        assert_eq!(game.status(), MatchStatus::Running);
        assert_eq!(game.phase(), GamePhase::Deployment);
        assert_eq!(game.turn(), 1);
        assert_eq!(game.round(), 1);
        assert_eq!(game.active_player(), PlayerId::new(0));

        for player in PlayerId::all(2) {
            let state = game.player(player);
            assert_eq!(state.base_health(), DEFAULT_BASE_HEALTH);
            assert_eq!(state.hand_size(), OPENING_HAND_SIZE);
            assert_eq!(state.library_size(), 20 - OPENING_HAND_SIZE);
        }
        // Turn 1 resource step, no bonus draw for the first seat.
        assert_eq!(game.player(PlayerId::new(0)).supply_cap(), 1);
        assert_eq!(game.player(PlayerId::new(0)).hand_size(), 5);
    }

    #[test]
    fn test_trace_opens_with_game_started() {
        let game = MatchBuilder::new(GameMode::Duel)
            .seat(deck(1))
            .seat(deck(2))
            .build(catalog())
            .unwrap();

        let types: Vec<_> = game.event_trace().iter().map(|e| e.event_type).collect();
        assert_eq!(types[0], EventType::GameStarted);
        assert_eq!(types[1], EventType::RoundStarted);
        assert!(types.contains(&EventType::TurnStarted));
        assert_eq!(game.event_trace()[0].tag.as_deref(), Some("DUEL"));
    }

    #[test]
    fn test_same_seed_deals_identical_hands() {
        let build = || {
            MatchBuilder::new(GameMode::Duel)
                .seat(deck(1))
                .seat(deck(2))
                .with_seed(99)
                .build(catalog())
                .unwrap()
        };
        let a = build();
        let b = build();

        for player in PlayerId::all(2) {
            assert_eq!(a.player(player).hand(), b.player(player).hand());
        }
        assert_eq!(a.event_trace(), b.event_trace());
    }

    #[test]
    fn test_seat_count_validation() {
        let one = MatchBuilder::new(GameMode::FreeForAll)
            .seat(deck(1))
            .build(catalog());
        assert!(matches!(one, Err(EngineError::InvalidSetup { .. })));

        let three = MatchBuilder::new(GameMode::Duel)
            .seat(deck(1))
            .seat(deck(1))
            .seat(deck(2))
            .build(catalog());
        assert!(matches!(three, Err(EngineError::InvalidSetup { .. })));
    }

    #[test]
    fn test_team_mode_needs_two_teams_of_two() {
        let lopsided = MatchBuilder::new(GameMode::Team2v2)
            .seat_on_team(deck(1), TeamId::new(0))
            .seat_on_team(deck(1), TeamId::new(0))
            .seat_on_team(deck(1), TeamId::new(0))
            .seat_on_team(deck(2), TeamId::new(1))
            .build(catalog());
        assert!(matches!(lopsided, Err(EngineError::InvalidSetup { .. })));

        let ok = MatchBuilder::new(GameMode::Team2v2)
            .seat_on_team(deck(1), TeamId::new(0))
            .seat_on_team(deck(1), TeamId::new(0))
            .seat_on_team(deck(2), TeamId::new(1))
            .seat_on_team(deck(2), TeamId::new(1))
            .build(catalog())
            .unwrap();
        assert_eq!(ok.team_of(PlayerId::new(2)), TeamId::new(1));
        assert!(ok.is_alive(PlayerId::new(0)));
    }

    #[test]
    fn test_token_decks_are_rejected() {
        let result = MatchBuilder::new(GameMode::Duel)
            .seat(deck(3))
            .seat(deck(1))
            .build(catalog());
        assert!(matches!(result, Err(EngineError::InvalidSetup { .. })));
    }

    #[test]
    fn test_dominant_faction_tie_breaks_in_order() {
        let catalog = catalog();
        let mixed = DeckDef::new()
            .with_copies(CardId::new(1), 5)
            .with_copies(CardId::new(2), 5);
        assert_eq!(dominant_faction(&mixed, &catalog).unwrap(), Faction::Unsc);

        let covenant_heavy = DeckDef::new()
            .with_copies(CardId::new(1), 2)
            .with_copies(CardId::new(2), 5);
        assert_eq!(
            dominant_faction(&covenant_heavy, &catalog).unwrap(),
            Faction::Covenant
        );
    }
}
