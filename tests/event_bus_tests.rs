//! Event-trace guarantees: determinism, dispatch order, and the
//! combat narration sequence.

mod common;

use common::*;
use lanewar::{EventType, Lane, MatchState, Row};

/// A fixed script: both seats deploy into Alpha, then the marine kills
/// the grunt.
fn scripted_duel() -> MatchState {
    let mut game = duel(mono_deck(MARINE), mono_deck(GRUNT));

    let marine = game.player(P0).hand()[0].instance_id;
    game.deploy_from_hand(P0, marine, Lane::Alpha, Row::Frontline)
        .unwrap();
    game.end_turn().unwrap();

    let grunt = game.player(P1).hand()[0].instance_id;
    game.deploy_from_hand(P1, grunt, Lane::Alpha, Row::Frontline)
        .unwrap();
    game.end_turn().unwrap();

    game.advance_phase().unwrap();
    game.declare_attack(marine, grunt).unwrap();
    game.end_turn().unwrap();
    game
}

#[test]
fn test_same_seed_same_script_same_trace() {
    let a = scripted_duel();
    let b = scripted_duel();
    assert_eq!(a.event_trace(), b.event_trace());
}

#[test]
fn test_sequence_numbers_are_strictly_increasing() {
    let game = scripted_duel();
    let trace = game.event_trace();
    assert!(!trace.is_empty());
    assert!(trace.windows(2).all(|w| w[0].sequence < w[1].sequence));
}

#[test]
fn test_attack_narration_arrives_in_pipeline_order() {
    let game = scripted_duel();
    let types: Vec<EventType> = game.event_trace().iter().map(|e| e.event_type).collect();

    let expected = [
        EventType::AttackDeclared,
        EventType::TargetLocked,
        EventType::DamageCalcStarted,
        EventType::DamageModified,
        EventType::ShieldDamaged,
        EventType::HullOrHealthDamaged,
        EventType::DamageDealt,
        EventType::KillOccurred,
    ];

    // Every narration event appears, in this order, as a subsequence.
    let mut cursor = 0;
    for step in expected {
        let offset = types[cursor..]
            .iter()
            .position(|&t| t == step)
            .unwrap_or_else(|| panic!("{step:?} missing after index {cursor}"));
        cursor += offset + 1;
    }
}

#[test]
fn test_events_carry_the_clock_and_participants() {
    let game = scripted_duel();
    let kill = game
        .event_trace()
        .iter()
        .find(|e| e.event_type == EventType::KillOccurred)
        .unwrap();

    assert_eq!(kill.turn, 3);
    assert_eq!(kill.active_player, P0);
    assert_eq!(kill.source_player, Some(P0));
    assert_eq!(kill.target_player, Some(P1));
    assert!(kill.source_unit.is_some());
    assert!(kill.target_unit.is_some());
}

#[test]
fn test_trace_opens_and_stays_consistent_across_turns() {
    let game = scripted_duel();
    let trace = game.event_trace();

    assert_eq!(trace[0].event_type, EventType::GameStarted);
    assert_eq!(trace[1].event_type, EventType::RoundStarted);

    // Three turns played plus the rotation into the fourth.
    let turns = trace
        .iter()
        .filter(|e| e.event_type == EventType::TurnStarted)
        .count();
    assert_eq!(turns, 4);
}
