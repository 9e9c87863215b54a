//! Integration tests for Slice 2
//!
//! Tests round resolution: validation → cost → combat → charge → outcome

use pretty_assertions::assert_eq;
use qiduel::core::ResolutionEngine;
use qiduel::types::{Move, RoundNote, RoundState, Side, SideResult, Winner};

const QI_LEVELS: [f64; 6] = [0.0, 0.5, 1.0, 1.5, 2.0, 3.0];

#[test]
fn test_misfire_leaves_qi_untouched() {
    let outcome = ResolutionEngine::new().evaluate(Move::Attack2, Move::Luck, 0.0, 0.0);

    assert_eq!(
        outcome.player,
        SideResult {
            requested: Move::Attack2,
            played: Move::None,
            qi_before: 0.0,
            qi_after: 0.0,
            hit: false,
        }
    );
    assert!(outcome
        .notes
        .contains(&RoundNote::Misfire { side: Side::Player, requested: Move::Attack2 }));
    assert!(!outcome.terminal);
}

#[test]
fn test_heavy_shot_breaks_downgraded_guard() {
    let outcome = ResolutionEngine::new().evaluate(Move::Attack2, Move::Defense2, 1.0, 0.4);

    assert_eq!(outcome.player.played, Move::Attack2);
    assert_eq!(outcome.player.qi_after, 0.0);
    assert_eq!(outcome.ai.played, Move::Defense1);
    assert_eq!(outcome.ai.qi_after, 0.4);
    assert!(outcome.ai.hit);
    assert!(!outcome.player.hit);
    assert_eq!(outcome.winner, Winner::Player);
    assert!(outcome.terminal);
    assert!(outcome.notes.contains(&RoundNote::Downgraded {
        side: Side::Ai,
        from: Move::Defense2,
        to: Move::Defense1,
    }));
    assert!(outcome.notes.contains(&RoundNote::BrokeGuard { side: Side::Player }));
}

#[test]
fn test_double_charge() {
    let outcome = ResolutionEngine::new().evaluate(Move::Luck, Move::Luck, 0.0, 0.0);
    assert_eq!(outcome.player.qi_after, 1.0);
    assert_eq!(outcome.ai.qi_after, 1.0);
    assert_eq!(outcome.winner, Winner::None);
    assert!(!outcome.terminal);
    assert_eq!(outcome.message.matches("Luck").count(), 2, "{}", outcome.message);
}

#[test]
fn test_qi_never_negative() {
    let engine = ResolutionEngine::new();
    for &p in &Move::ALL {
        for &a in &Move::ALL {
            for &pq in &QI_LEVELS {
                for &aq in &QI_LEVELS {
                    let o = engine.evaluate(p, a, pq, aq);
                    assert!(o.player.qi_after >= 0.0, "{} vs {} at {}/{}", p, a, pq, aq);
                    assert!(o.ai.qi_after >= 0.0, "{} vs {} at {}/{}", p, a, pq, aq);
                }
            }
        }
    }
}

#[test]
fn test_no_op_round_is_idempotent() {
    let engine = ResolutionEngine::new();
    for &pq in &QI_LEVELS {
        for &aq in &QI_LEVELS {
            let o = engine.evaluate(Move::None, Move::None, pq, aq);
            assert_eq!(o.player.qi_after, pq);
            assert_eq!(o.ai.qi_after, aq);
            assert!(!o.terminal);
        }
    }
    // Misfires on both sides behave the same way
    let o = engine.evaluate(Move::Attack1, Move::Attack2, 0.0, 0.0);
    assert_eq!((o.player.played, o.ai.played), (Move::None, Move::None));
    assert_eq!((o.player.qi_after, o.ai.qi_after), (0.0, 0.0));
    assert!(!o.terminal);
}

#[test]
fn test_tier_break_property() {
    let engine = ResolutionEngine::new();
    for &qi in &[1.0, 1.5, 2.0, 3.0] {
        for &defender_qi in &QI_LEVELS {
            let heavy = engine.evaluate(Move::Attack2, Move::Defense1, qi, defender_qi);
            assert!(heavy.ai.hit, "heavy shot at qi {} must break the light guard", qi);
        }
    }
    for &qi in &[0.5, 1.0, 1.5, 2.0] {
        for &defender_qi in &QI_LEVELS {
            let light = engine.evaluate(Move::Attack1, Move::Defense1, qi, defender_qi);
            assert!(!light.ai.hit);
            assert!(!light.terminal);
        }
    }
}

#[test]
fn test_mutual_light_shots_cancel() {
    let o = ResolutionEngine::new().evaluate(Move::Attack1, Move::Attack1, 1.0, 0.5);
    assert!(!o.player.hit && !o.ai.hit);
    assert_eq!(o.player.qi_after, 0.5);
    assert_eq!(o.ai.qi_after, 0.0);
    assert!(o.notes.contains(&RoundNote::Equalized));
}

#[test]
fn test_heavy_guard_stops_heavy_shot() {
    let o = ResolutionEngine::new().evaluate(Move::Defense2, Move::Attack2, 0.5, 1.0);
    assert!(!o.player.hit);
    assert_eq!(o.player.qi_after, 0.0);
    assert_eq!(o.ai.qi_after, 0.0);
    assert!(o.notes.contains(&RoundNote::Blocked { side: Side::Ai }));
}

#[test]
fn test_shot_hits_charging_opponent_and_charge_still_lands() {
    let o = ResolutionEngine::new().evaluate(Move::Luck, Move::Attack1, 0.0, 0.5);
    assert!(o.player.hit);
    assert_eq!(o.winner, Winner::Ai);
    assert!(o.terminal);
    // Charge is applied after combat
    assert_eq!(o.player.qi_after, 1.0);
    assert!(o.message.starts_with("You lose!"), "{}", o.message);
}

#[test]
fn test_single_tier_rules() {
    let engine = ResolutionEngine::with_tiers(false);

    // A requested heavy shot is read as a light shot and stopped by a guard
    let o = engine.evaluate(Move::Attack2, Move::Defense1, 2.0, 0.0);
    assert_eq!(o.player.played, Move::Attack1);
    assert_eq!(o.player.qi_after, 1.5);
    assert!(!o.ai.hit);

    // A shot connects against both a charging and an idle opponent
    assert!(engine.evaluate(Move::Attack1, Move::Luck, 0.5, 0.0).ai.hit);
    assert!(engine.evaluate(Move::Attack1, Move::None, 0.5, 0.0).ai.hit);
}

#[test]
fn test_round_state_tracks_outcomes() {
    let engine = ResolutionEngine::new();
    let mut state = RoundState::default();

    let first = engine.evaluate(Move::Luck, Move::Defense1, state.player_qi, state.ai_qi);
    state.apply(&first);
    assert_eq!(state.round, 1);
    assert_eq!(state.player_qi, 1.0);
    assert_eq!(state.player_move, Some(Move::Luck));

    let second = engine.evaluate(Move::Attack2, Move::Luck, state.player_qi, state.ai_qi);
    state.apply(&second);
    assert_eq!(state.round, 2);
    assert!(state.terminal);
    assert_eq!(state.winner, Winner::Player);
    assert_eq!(state.message, second.message);
}
