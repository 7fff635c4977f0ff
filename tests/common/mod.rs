//! Shared fixtures for the integration tests: a small card pool and
//! helpers that drive a match to a known position.

#![allow(dead_code)]

use std::sync::Arc;

use lanewar::catalog::{
    CardCatalog, CardDef, CardId, CardType, Cost, DeckDef, Faction, Keyword, Stats,
};
use lanewar::engine::{GameMode, GamePhase, MatchBuilder, MatchState};
use lanewar::{InstanceId, Lane, PlayerId, Row};

pub const P0: PlayerId = PlayerId::new(0);
pub const P1: PlayerId = PlayerId::new(1);
pub const P2: PlayerId = PlayerId::new(2);
pub const P3: PlayerId = PlayerId::new(3);

pub const MARINE: CardId = CardId::new(1);
pub const GRUNT: CardId = CardId::new(2);
pub const SPARTAN: CardId = CardId::new(3);
pub const WARTHOG: CardId = CardId::new(4);
pub const ELITE: CardId = CardId::new(5);
pub const SNIPER: CardId = CardId::new(6);
pub const BOARDING_PARTY: CardId = CardId::new(7);
pub const INFECTION_FORM: CardId = CardId::new(8);
pub const SPORE_TOKEN: CardId = CardId::new(9);
pub const ENFORCER: CardId = CardId::new(10);
pub const ODST: CardId = CardId::new(11);
pub const SHOCK_TROOPER: CardId = CardId::new(12);
pub const CORPSMAN: CardId = CardId::new(13);
pub const SCORPION: CardId = CardId::new(14);
pub const FIRE_TEAM: CardId = CardId::new(15);
pub const PROTO_GRAVEMIND: CardId = CardId::new(16);
pub const STALKER: CardId = CardId::new(17);

/// The test card pool. Stats are chosen so single attacks leave
/// observable intermediate states (shields stripped, survivors at 1).
pub fn catalog() -> Arc<CardCatalog> {
    let mut catalog = CardCatalog::new();
    catalog.register(
        CardDef::new(MARINE, "Marine", Faction::Unsc, CardType::Unit)
            .with_cost(Cost::supply(1))
            .with_stats(Stats::new(2, 0, 3))
            .with_keyword(Keyword::Ballistic),
    );
    catalog.register(
        CardDef::new(GRUNT, "Grunt", Faction::Covenant, CardType::Unit)
            .with_cost(Cost::supply(1))
            .with_stats(Stats::new(1, 0, 2))
            .with_keyword(Keyword::Plasma),
    );
    catalog.register(
        CardDef::new(SPARTAN, "Spartan", Faction::Unsc, CardType::Unit)
            .with_cost(Cost::supply(2))
            .with_stats(Stats::new(3, 3, 4))
            .with_keyword(Keyword::Ballistic)
            .with_keyword(Keyword::Headshot),
    );
    catalog.register(
        CardDef::new(WARTHOG, "Warthog", Faction::Unsc, CardType::Unit)
            .with_cost(Cost::supply(3))
            .with_stats(Stats::new(3, 2, 4))
            .with_keyword(Keyword::Ballistic)
            .with_keyword(Keyword::Vehicle),
    );
    catalog.register(
        CardDef::new(ELITE, "Elite", Faction::Covenant, CardType::Unit)
            .with_cost(Cost::supply(2))
            .with_stats(Stats::new(2, 2, 3))
            .with_keyword(Keyword::Plasma),
    );
    catalog.register(
        CardDef::new(SNIPER, "Sniper", Faction::Unsc, CardType::Unit)
            .with_cost(Cost::supply(2))
            .with_stats(Stats::new(3, 0, 2))
            .with_keyword(Keyword::Ballistic)
            .with_keyword(Keyword::Ranged),
    );
    catalog.register(
        CardDef::new(BOARDING_PARTY, "Boarding Party", Faction::Covenant, CardType::Unit)
            .with_cost(Cost::supply(1))
            .with_stats(Stats::new(1, 0, 2))
            .with_keyword(Keyword::Plasma)
            .with_keyword(Keyword::Hijack),
    );
    catalog.register(
        CardDef::new(INFECTION_FORM, "Infection Form", Faction::Flood, CardType::Unit)
            .with_cost(Cost::supply(1))
            .with_stats(Stats::new(2, 0, 1))
            .with_keyword(Keyword::Infect)
            .with_token_template(SPORE_TOKEN),
    );
    catalog.register(
        CardDef::new(SPORE_TOKEN, "Spore", Faction::Flood, CardType::Token)
            .with_stats(Stats::new(1, 0, 1)),
    );
    catalog.register(
        CardDef::new(ENFORCER, "Enforcer", Faction::Forerunner, CardType::Unit)
            .with_cost(Cost::supply(2))
            .with_stats(Stats::new(2, 1, 2))
            .with_keyword(Keyword::Sentinel),
    );
    catalog.register(
        CardDef::new(ODST, "ODST", Faction::Unsc, CardType::Unit)
            .with_cost(Cost::supply(2))
            .with_stats(Stats::new(2, 0, 3))
            .with_keyword(Keyword::Ballistic)
            .with_keyword(Keyword::DropPod),
    );
    catalog.register(
        CardDef::new(SHOCK_TROOPER, "Shock Trooper", Faction::Unsc, CardType::Unit)
            .with_cost(Cost::supply(2))
            .with_stats(Stats::new(1, 0, 2))
            .with_keyword(Keyword::Ballistic)
            .with_keyword(Keyword::Emp),
    );
    catalog.register(
        CardDef::new(CORPSMAN, "Corpsman", Faction::Unsc, CardType::Unit)
            .with_cost(Cost::supply(1))
            .with_stats(Stats::new(1, 0, 2))
            .with_keyword(Keyword::Medic),
    );
    catalog.register(
        CardDef::new(SCORPION, "Scorpion", Faction::Unsc, CardType::Unit)
            .with_cost(Cost::supply(4))
            .with_stats(Stats::new(5, 2, 6))
            .with_keyword(Keyword::Ballistic)
            .with_keyword(Keyword::Vehicle),
    );
    catalog.register(
        CardDef::new(FIRE_TEAM, "Fire Team", Faction::Unsc, CardType::Unit)
            .with_cost(Cost::supply(1))
            .with_stats(Stats::new(1, 0, 2))
            .with_keyword(Keyword::Ballistic)
            .with_keyword(Keyword::Squad),
    );
    catalog.register(
        CardDef::new(PROTO_GRAVEMIND, "Proto-Gravemind", Faction::Flood, CardType::Unit)
            .with_cost(Cost::supply(3))
            .with_stats(Stats::new(0, 0, 5))
            .with_tag("PROTO_GRAVEMIND"),
    );
    catalog.register(
        CardDef::new(STALKER, "Stalker", Faction::Covenant, CardType::Unit)
            .with_cost(Cost::supply(1))
            .with_stats(Stats::new(1, 0, 2))
            .with_keyword(Keyword::Plasma)
            .with_keyword(Keyword::Camo),
    );
    Arc::new(catalog)
}

pub fn mono_deck(card: CardId) -> DeckDef {
    DeckDef::new().with_copies(card, 20)
}

pub fn mixed_deck(cards: &[(CardId, usize)]) -> DeckDef {
    cards
        .iter()
        .fold(DeckDef::new(), |deck, &(card, count)| deck.with_copies(card, count))
}

pub fn duel(deck0: DeckDef, deck1: DeckDef) -> MatchState {
    MatchBuilder::new(GameMode::Duel)
        .seat(deck0)
        .seat(deck1)
        .with_seed(42)
        .build(catalog())
        .unwrap()
}

pub fn free_for_all(decks: Vec<DeckDef>) -> MatchState {
    let mut builder = MatchBuilder::new(GameMode::FreeForAll).with_seed(42);
    for deck in decks {
        builder = builder.seat(deck);
    }
    builder.build(catalog()).unwrap()
}

/// Find a copy of `card` in a player's hand.
pub fn hand_card(game: &MatchState, player: PlayerId, card: CardId) -> Option<InstanceId> {
    game.player(player)
        .hand()
        .iter()
        .find(|c| c.card_id == card)
        .map(|c| c.instance_id)
}

/// Pass turns until `player` holds `card` with the supply to pay for
/// it, then deploy it. Supply grows every turn, so any affordable card
/// becomes deployable within a bounded number of turns.
pub fn deploy_when_ready(
    game: &mut MatchState,
    player: PlayerId,
    card: CardId,
    lane: Lane,
    row: Row,
) -> InstanceId {
    for _ in 0..80 {
        if game.active_player() == player && game.phase() == GamePhase::Deployment {
            if let Some(instance) = hand_card(game, player, card) {
                if game.deploy_from_hand(player, instance, lane, row).is_ok() {
                    return instance;
                }
            }
        }
        game.end_turn().unwrap();
    }
    panic!("{card} never became deployable for {player}");
}

/// Pass turns until it is `player`'s SKIRMISH phase.
pub fn enter_skirmish(game: &mut MatchState, player: PlayerId) {
    for _ in 0..80 {
        if game.active_player() == player {
            if game.phase() == GamePhase::Deployment {
                game.advance_phase().unwrap();
            }
            if game.phase() == GamePhase::Skirmish {
                return;
            }
        }
        game.end_turn().unwrap();
    }
    panic!("never reached {player}'s skirmish phase");
}
