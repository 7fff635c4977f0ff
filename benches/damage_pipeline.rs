use std::hint::black_box;
use std::sync::Arc;

use criterion::{criterion_group, criterion_main, Criterion};

use lanewar::catalog::{CardCatalog, CardDef, CardId, CardType, Cost, DeckDef, Faction, Keyword, Stats};
use lanewar::combat::{CombatStateStore, DamageContext, DamageResolver, DamageType, EntityCombatState};
use lanewar::engine::{GameMode, MatchBuilder};
use lanewar::{DeterministicEventBus, InstanceId, PlayerId};

fn bench_resolve_single_hit(c: &mut Criterion) {
    let resolver = DamageResolver::new();
    let attacker = InstanceId(1);
    let defender = InstanceId(2);

    c.bench_function("resolve_single_hit", |b| {
        b.iter(|| {
            let mut combat = CombatStateStore::new();
            combat.put(defender, EntityCombatState::new(3, 12));
            let mut bus = DeterministicEventBus::new();
            let ctx = DamageContext::new(
                attacker,
                PlayerId::new(0),
                defender,
                PlayerId::new(1),
                black_box(6),
                DamageType::Ballistic,
            )
            .with_multiplier(2);
            resolver
                .resolve(&ctx, &mut combat, &mut bus, 1, 1, PlayerId::new(0))
                .unwrap()
        });
    });
}

fn bench_match_turn_loop(c: &mut Criterion) {
    let marine = CardId::new(1);
    let grunt = CardId::new(2);
    let mut catalog = CardCatalog::new();
    catalog.register(
        CardDef::new(marine, "Marine", Faction::Unsc, CardType::Unit)
            .with_cost(Cost::supply(1))
            .with_stats(Stats::new(2, 0, 3))
            .with_keyword(Keyword::Ballistic),
    );
    catalog.register(
        CardDef::new(grunt, "Grunt", Faction::Covenant, CardType::Unit)
            .with_cost(Cost::supply(1))
            .with_stats(Stats::new(1, 0, 2))
            .with_keyword(Keyword::Plasma),
    );
    let catalog = Arc::new(catalog);

    c.bench_function("duel_twenty_turns", |b| {
        b.iter(|| {
            let mut game = MatchBuilder::new(GameMode::Duel)
                .seat(DeckDef::new().with_copies(marine, 20))
                .seat(DeckDef::new().with_copies(grunt, 20))
                .with_seed(black_box(42))
                .build(Arc::clone(&catalog))
                .unwrap();
            for _ in 0..20 {
                game.end_turn().unwrap();
            }
            game.event_trace().len()
        });
    });
}

criterion_group!(benches, bench_resolve_single_hit, bench_match_turn_loop);
criterion_main!(benches);
