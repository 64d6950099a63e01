//! Integration tests for full rounds through the built-in physics
//!
//! These tests verify that:
//! - A shot fired across the arena lands on the opponent
//! - Elimination resolves the round and an upgrade starts the next one
//! - Invariants hold tick by tick during a long scripted fight

use std::collections::BTreeMap;

use neon_rivals::consts::SIM_DT;
use neon_rivals::sim::{
    ArenaPhysics, CombatantId, ControlInput, GameEvent, MatchState, RetireReason, RoundPhase, TickInput, tick,
};

/// Start a match and let both players drop onto the floor
fn settled_match(seed: u64) -> (MatchState, ArenaPhysics) {
    let mut state = MatchState::new(seed);
    let mut physics = ArenaPhysics::default();
    state.start_match().unwrap();
    for _ in 0..240 {
        tick(&mut state, &TickInput::default(), &mut physics, SIM_DT);
    }
    state.drain_events();
    (state, physics)
}

/// Walk-in range: a level shot from here reaches player 2 before it drops
/// onto the floor
fn close_in(state: &mut MatchState) {
    state.combatant_mut(CombatantId::One).pos.x = 2.0;
}

fn fire(one: bool, two: bool) -> TickInput {
    TickInput::new(
        ControlInput {
            fire: one,
            ..Default::default()
        },
        ControlInput {
            fire: two,
            ..Default::default()
        },
    )
}

#[test]
fn test_shot_across_arena_hits_opponent() {
    let (mut state, mut physics) = settled_match(5);
    close_in(&mut state);

    tick(&mut state, &fire(true, false), &mut physics, SIM_DT);
    for _ in 0..90 {
        tick(&mut state, &TickInput::default(), &mut physics, SIM_DT);
    }

    let events = state.drain_events();
    assert!(events.contains(&GameEvent::PlayerHit {
        target: CombatantId::Two,
        damage: 10.0
    }));
    assert!(
        events
            .iter()
            .any(|e| matches!(e, GameEvent::ProjectileRetired { reason: RetireReason::Hit, .. }))
    );
    assert_eq!(state.combatant(CombatantId::Two).stats.hp, 90.0);
    assert_eq!(state.combatant(CombatantId::One).stats.hp, 100.0);
    assert!(state.projectiles.is_empty());
}

#[test]
fn test_long_shot_hops_out_before_reaching_opponent() {
    let (mut state, mut physics) = settled_match(5);

    tick(&mut state, &fire(true, false), &mut physics, SIM_DT);
    for _ in 0..120 {
        tick(&mut state, &TickInput::default(), &mut physics, SIM_DT);
    }

    let events = state.drain_events();
    assert!(
        events
            .iter()
            .any(|e| matches!(e, GameEvent::ProjectileRetired { reason: RetireReason::Exhausted, .. }))
    );
    assert!(!events.iter().any(|e| matches!(e, GameEvent::PlayerHit { .. })));
    assert_eq!(state.combatant(CombatantId::Two).stats.hp, 100.0);
}

#[test]
fn test_elimination_then_upgrade_starts_round_two() {
    let (mut state, mut physics) = settled_match(8);
    state.combatant_mut(CombatantId::Two).stats.hp = 10.0;
    close_in(&mut state);

    tick(&mut state, &fire(true, false), &mut physics, SIM_DT);
    for _ in 0..90 {
        tick(&mut state, &TickInput::default(), &mut physics, SIM_DT);
    }

    assert_eq!(state.phase(), RoundPhase::Resolved);
    assert_eq!(state.round.last_loser, Some(CombatantId::Two));
    assert_eq!(state.combatant(CombatantId::One).stats.wins, 1);
    assert!(state.drain_events().contains(&GameEvent::RoundResolved {
        loser: CombatantId::Two
    }));

    let pick = state.upgrade_offer()[1];
    state.apply_upgrade(pick).unwrap();
    assert_eq!(state.phase(), RoundPhase::Active);
    assert_eq!(state.round.round, 2);

    let two = state.combatant(CombatantId::Two);
    assert_eq!(two.stats.hp, two.stats.max_hp);
    assert_eq!(two.pos, CombatantId::Two.spawn_point());
    assert_eq!(
        state.drain_events().first(),
        Some(&GameEvent::UpgradeApplied {
            target: CombatantId::Two,
            upgrade: pick
        })
    );
}

#[test]
fn test_invariants_hold_during_long_fight() {
    let (mut state, mut physics) = settled_match(21);
    let mut bounces: BTreeMap<_, u32> = BTreeMap::new();

    let moves = [
        ControlInput {
            up: true,
            fire: true,
            ..Default::default()
        },
        ControlInput {
            left: true,
            fire: true,
            jump: true,
            ..Default::default()
        },
        ControlInput {
            down: true,
            right: true,
            fire: true,
            ..Default::default()
        },
        ControlInput {
            fire: true,
            ..Default::default()
        },
    ];

    for i in 0..6000usize {
        let one = moves[(i / 50) % moves.len()];
        let two = moves[(i / 70 + 1) % moves.len()];
        tick(&mut state, &TickInput::new(one, two), &mut physics, SIM_DT);

        let snap = state.snapshot();
        for c in &snap.combatants {
            assert!(c.hp >= 0.0 && c.hp <= c.max_hp);
        }
        for p in &snap.projectiles {
            if let Some(prev) = bounces.insert(p.id, p.bounces_left) {
                assert!(p.bounces_left <= prev, "bounce counter increased for {:?}", p.id);
            }
        }

        if state.phase() == RoundPhase::Resolved {
            let losers = state
                .events()
                .iter()
                .filter(|e| matches!(e, GameEvent::RoundResolved { .. }))
                .count();
            assert_eq!(losers, 1);
            let pick = state.upgrade_offer()[0];
            state.apply_upgrade(pick).unwrap();
        }
        state.drain_events();
    }
}
