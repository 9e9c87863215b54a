//! Match controller
//!
//! Owns all match state and drives one cooperative tick per perception
//! frame: clap detection → rhythm clock → (on ACTION) classifier + AI →
//! resolution → state update. Round evaluation completes inside a single
//! tick, so no observer ever sees a half-applied round.

use rand::rngs::StdRng;
use rand::Rng;
use tracing::{info, warn};

use crate::config::MatchConfig;
use crate::core::ai::AiPolicy;
use crate::core::classifier::GestureClassifier;
use crate::core::resolution::ResolutionEngine;
use crate::core::rhythm::{ClapDetector, ClockEvent, RhythmClock};
use crate::error::{DuelError, Result};
use crate::types::{
    BeatCue, HandObservation, MatchSnapshot, Move, RhythmState, RoundOutcome, RoundState, CLAP_CUE,
};

/// What a single tick produced
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// A clap rising edge was seen this frame
    pub clapped: bool,
    pub event: ClockEvent,
    /// Present on the tick that entered ACTION
    pub outcome: Option<RoundOutcome>,
    /// A clap on a finished match restarted it
    pub restarted: bool,
}

impl TickReport {
    fn idle(clapped: bool) -> Self {
        Self { clapped, event: ClockEvent::Idle, outcome: None, restarted: false }
    }

    /// Whether anything observable changed
    pub fn changed(&self) -> bool {
        self.clapped || self.restarted || self.event != ClockEvent::Idle
    }

    /// Sounds for this frame, clap first
    pub fn cues(&self) -> Vec<BeatCue> {
        let mut cues = Vec::new();
        if self.clapped {
            cues.push(CLAP_CUE);
        }
        cues.extend(self.event.cue());
        cues
    }
}

/// One human-vs-computer match
#[derive(Debug)]
pub struct Duel<R: Rng = StdRng> {
    config: MatchConfig,
    state: RoundState,
    started: bool,
    clock: RhythmClock,
    clap: ClapDetector,
    classifier: GestureClassifier,
    engine: ResolutionEngine,
    ai: AiPolicy<R>,
    /// Player's reading from the latest frame
    live_move: Option<Move>,
}

impl Duel<StdRng> {
    /// Build from config; the AI is seeded from `config.ai_seed` when set
    pub fn new(config: MatchConfig) -> Self {
        let ai = AiPolicy::from_seed_option(config.ai_seed);
        Self::with_ai(config, ai)
    }
}

impl<R: Rng> Duel<R> {
    pub fn with_ai(config: MatchConfig, mut ai: AiPolicy<R>) -> Self {
        ai.set_tiered(config.tiered);
        Self {
            clock: RhythmClock::new(config.tempo),
            clap: ClapDetector::new(config.clap_threshold, config.clap_hysteresis),
            classifier: GestureClassifier::with_policy(
                config.classifier,
                config.extension_margin,
                config.tiered,
            ),
            engine: ResolutionEngine::with_tiers(config.tiered),
            ai,
            state: RoundState::default(),
            started: false,
            live_move: None,
            config,
        }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn rhythm_state(&self) -> RhythmState {
        self.clock.state()
    }

    pub fn clock(&self) -> &RhythmClock {
        &self.clock
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_terminal(&self) -> bool {
        self.state.terminal
    }

    /// Begin (or begin again) with zero qi, the clock WAITING and the clap
    /// latch armed
    pub fn start_match(&mut self, now_ms: u64) {
        self.reset_match(now_ms);
        self.clap.reset();
        info!("match started");
    }

    /// Zero the match and the clock; the clap latch is left as it is
    fn reset_match(&mut self, now_ms: u64) {
        self.state = RoundState {
            message: "Clap to start the round".to_string(),
            ..RoundState::default()
        };
        self.clock.reset(now_ms);
        self.started = true;
    }

    /// Restart a finished (or never started) match
    pub fn restart_after_terminal(&mut self, now_ms: u64) -> Result<()> {
        if self.started && !self.state.terminal {
            warn!(round = self.state.round, "restart rejected: match in progress");
            return Err(DuelError::RestartRejected { round: self.state.round });
        }
        self.start_match(now_ms);
        Ok(())
    }

    /// Process one perception frame at `now_ms`
    pub fn tick(&mut self, now_ms: u64, hands: &[HandObservation]) -> TickReport {
        if !self.started {
            return TickReport::idle(false);
        }

        let clapped = self.clap.observe(hands);
        self.live_move = Some(self.classifier.classify_player(hands));

        if clapped && self.state.terminal {
            // The latch stays COOLING until the hands part, so this clap
            // cannot also open the next lead-in
            self.reset_match(now_ms);
            info!("match restarted by clap");
            return TickReport { restarted: true, ..TickReport::idle(true) };
        }

        let event = self.clock.tick(now_ms, clapped, self.state.terminal);
        let outcome = match event {
            ClockEvent::Action => Some(self.evaluate_round(hands)),
            _ => None,
        };

        TickReport { clapped, event, outcome, restarted: false }
    }

    fn evaluate_round(&mut self, hands: &[HandObservation]) -> RoundOutcome {
        let player_move = self.classifier.classify_player(hands);
        let ai_move = self.ai.decide(self.state.ai_qi, self.state.player_qi);
        let outcome =
            self.engine.evaluate(player_move, ai_move, self.state.player_qi, self.state.ai_qi);
        self.state.apply(&outcome);

        info!(
            round = self.state.round,
            player = %outcome.player.played,
            ai = %outcome.ai.played,
            player_qi = outcome.player.qi_after,
            ai_qi = outcome.ai.qi_after,
            "{}",
            outcome.message
        );
        if outcome.terminal {
            info!(winner = %outcome.winner, "match over");
        }
        outcome
    }

    /// Current read-only view for presentation
    pub fn snapshot(&self) -> MatchSnapshot {
        let rhythm = self.clock.state();
        let predicted = match rhythm {
            RhythmState::Waiting if self.started && !self.state.terminal => self.live_move,
            _ => None,
        };
        MatchSnapshot::new(&self.state, self.started, rhythm, self.clock.interval_ms(), predicted)
    }
}

// =============================================================================
// TESTS
// =============================================================================
