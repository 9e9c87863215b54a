//! Integration tests for Slice 4
//!
//! Tests whole matches: simulated camera → Duel → AI → resolution → snapshot

use pretty_assertions::assert_eq;
use rand::rngs::mock::StepRng;
use qiduel::core::{AiPolicy, Duel, Pose, Simulator};
use qiduel::types::{Move, RhythmState, Winner};
use qiduel::{DuelError, MatchConfig, TempoMode};

fn pose(words: &str) -> Pose {
    words.parse().unwrap()
}

/// An opponent whose every draw is 0.0: it always takes the first
/// affordable option, which at low qi is the light guard
fn guarding_ai() -> AiPolicy<StepRng> {
    AiPolicy::with_rng(StepRng::new(0, 0))
}

#[test]
fn test_charge_then_break_guard() {
    let mut duel = Duel::with_ai(MatchConfig::default(), guarding_ai());
    let mut sim = Simulator::new(0, 650);
    duel.start_match(sim.now());

    let first = sim.play_round(&mut duel, &pose("fist fist")).unwrap();
    assert_eq!(first.player.played, Move::Luck);
    assert_eq!(first.ai.played, Move::Defense1);
    assert_eq!(duel.state().player_qi, 1.0);

    sim.play_round(&mut duel, &pose("fist fist")).unwrap();
    assert_eq!(duel.state().player_qi, 2.0);
    assert_eq!(duel.rhythm_state(), RhythmState::Waiting);

    let last = sim.play_round(&mut duel, &pose("gun gun")).unwrap();
    assert_eq!(last.player.played, Move::Attack2);
    assert!(last.ai.hit);
    assert_eq!(last.winner, Winner::Player);

    let snapshot = duel.snapshot();
    assert!(snapshot.terminal);
    assert_eq!(snapshot.round, 3);
    assert_eq!(snapshot.player_qi, 1.0);
    assert_eq!(snapshot.winner, Winner::Player);
    // Clock halts on the action beat, so the AI's move stays on screen
    assert_eq!(snapshot.rhythm_state, RhythmState::Action);
    assert_eq!(snapshot.ai_icon(), Move::Defense1.cue().icon);

    // Nothing more to play until restart
    assert!(sim.play_round(&mut duel, &pose("fist fist")).is_none());
    assert_eq!(duel.state().round, 3);
}

#[test]
fn test_single_tier_match_cannot_break_guard() {
    let config = MatchConfig { tiered: false, ..MatchConfig::default() };
    let mut duel = Duel::with_ai(config, guarding_ai());
    let mut sim = Simulator::new(0, 650);
    duel.start_match(sim.now());

    sim.play_round(&mut duel, &pose("fist fist"));
    sim.play_round(&mut duel, &pose("fist fist"));
    let shot = sim.play_round(&mut duel, &pose("gun gun")).unwrap();

    assert_eq!(shot.player.played, Move::Attack1);
    assert!(!shot.ai.hit);
    assert!(!duel.is_terminal());
    assert_eq!(duel.state().player_qi, 1.5);
}

#[test]
fn test_clap_restarts_finished_match() {
    let mut duel = Duel::with_ai(MatchConfig::default(), guarding_ai());
    let mut sim = Simulator::new(0, 650);
    duel.start_match(sim.now());
    sim.play_round(&mut duel, &pose("fist fist"));
    sim.play_round(&mut duel, &pose("gun"));
    // A light shot into a light guard is blocked; charge and go heavy
    sim.play_round(&mut duel, &pose("fist fist"));
    sim.play_round(&mut duel, &pose("gun gun"));
    assert!(duel.is_terminal());

    // A command restart is fine once the match is over
    assert!(duel.restart_after_terminal(sim.now()).is_ok());
    sim.play_round(&mut duel, &pose("fist fist"));
    assert!(!duel.is_terminal());
    assert!(matches!(
        duel.restart_after_terminal(sim.now()),
        Err(DuelError::RestartRejected { round: 1 })
    ));
}

#[test]
fn test_clap_gesture_restart() {
    let mut duel = Duel::with_ai(MatchConfig::default(), guarding_ai());
    let mut sim = Simulator::new(0, 650);
    duel.start_match(sim.now());
    sim.play_round(&mut duel, &pose("fist fist"));
    sim.play_round(&mut duel, &pose("fist fist"));
    sim.play_round(&mut duel, &pose("gun gun"));
    assert!(duel.is_terminal());

    sim.clap(&mut duel);
    let snapshot = duel.snapshot();
    assert!(!snapshot.terminal);
    assert_eq!(snapshot.round, 0);
    assert_eq!(snapshot.player_qi, 0.0);
    assert_eq!(snapshot.ai_qi, 0.0);
    assert_eq!(snapshot.winner, Winner::None);
    assert_eq!(snapshot.rhythm_state, RhythmState::Waiting);
    assert_eq!(duel.clock().t1(), None);

    // The restart clap is spent; a fresh lead-in plays the next round
    let outcome = sim.play_round(&mut duel, &pose("fist fist")).unwrap();
    assert_eq!(outcome.player.played, Move::Luck);
    assert_eq!(duel.state().round, 1);
    assert_eq!(duel.state().player_qi, 1.0);
}

#[test]
fn test_seeded_matches_replay_identically() {
    let script = [
        "fist fist", "open open", "gun", "fist fist", "gun gun", "open", "fist fist", "gun gun",
    ];

    let play = |seed: u64| {
        let config = MatchConfig { ai_seed: Some(seed), ..MatchConfig::default() };
        let mut duel = Duel::new(config);
        let mut sim = Simulator::new(0, 700);
        duel.start_match(sim.now());
        let mut history = Vec::new();
        for words in script.iter().cycle().take(40) {
            match sim.play_round(&mut duel, &pose(words)) {
                Some(outcome) => history.push(outcome),
                None => break,
            }
        }
        (history, duel.state().clone())
    };

    let (a_history, a_state) = play(2024);
    let (b_history, b_state) = play(2024);
    assert_eq!(a_history, b_history);
    assert_eq!(a_state, b_state);

    // Whatever happened, the economy stayed sound
    for outcome in &a_history {
        assert!(outcome.player.qi_after >= 0.0);
        assert!(outcome.ai.qi_after >= 0.0);
    }
    let terminal_rounds = a_history.iter().filter(|o| o.terminal).count();
    assert!(terminal_rounds <= 1);
    assert_eq!(a_state.terminal, terminal_rounds == 1);
}

#[test]
fn test_fixed_tempo_match_uses_configured_interval() {
    let config = MatchConfig {
        tempo: TempoMode::Fixed { interval_ms: 800, auto_continue: false },
        ..MatchConfig::default()
    };
    let mut duel = Duel::with_ai(config, guarding_ai());
    let mut sim = Simulator::new(0, 300);
    duel.start_match(sim.now());

    let outcome = sim.play_round(&mut duel, &pose("open")).unwrap();
    assert_eq!(outcome.player.played, Move::Defense1);
    assert_eq!(duel.clock().interval_ms(), 800);
    assert_eq!(duel.clock().cooldown_ms(), 1600);
}

#[test]
fn test_config_from_json() {
    let config = MatchConfig::from_json(
        r#"{"tempo": {"mode": "fixed", "interval_ms": 500}, "tiered": false, "ai_seed": 7}"#,
    )
    .unwrap();
    assert_eq!(config.tempo, TempoMode::Fixed { interval_ms: 500, auto_continue: false });
    assert!(!config.tiered);
    assert_eq!(config.ai_seed, Some(7));

    let err = MatchConfig::from_json(r#"{"tempo": {"mode": "fixed", "interval_ms": 1300}}"#)
        .unwrap_err();
    assert!(matches!(err, DuelError::BeatIntervalOutOfRange { got: 1300, .. }));

    assert!(matches!(
        MatchConfig::from_json("{not json"),
        Err(DuelError::Json(_))
    ));
}
