//! Simulated camera: synthesizes landmark frames for a scripted player
//!
//! Stands in for the perception model when there is no camera, e.g. the
//! interactive CLI and tests. Frames are produced on a virtual clock, so a
//! whole round runs instantly and deterministically.

use std::str::FromStr;

use rand::Rng;

use crate::config::TempoMode;
use crate::core::duel::{Duel, TickReport};
use crate::error::DuelError;
use crate::types::{HandObservation, HandState, Point2, RhythmState, RoundOutcome};

/// Frame period of the virtual camera (~60 fps)
pub const FRAME_MS: u64 = 16;

/// How long the hands stay together during a clap
const CLAP_HOLD_MS: u64 = 48;

/// Hard stop for a round that never resolves
const MAX_ROUND_FRAMES: usize = 2_000;

const LEFT_WRIST: Point2 = Point2::new(170.0, 380.0);
const RIGHT_WRIST: Point2 = Point2::new(470.0, 380.0);
const CLAP_LEFT: Point2 = Point2::new(310.0, 300.0);
const CLAP_RIGHT: Point2 = Point2::new(330.0, 300.0);

/// The hand shapes a scripted player shows for the decision beat
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pose {
    hands: Vec<HandState>,
}

impl Pose {
    pub fn new(hands: Vec<HandState>) -> Self {
        Self { hands }
    }

    /// Nobody in frame
    pub fn absent() -> Self {
        Self { hands: Vec::new() }
    }

    pub fn hands(&self) -> &[HandState] {
        &self.hands
    }

    /// Landmarks for this pose, hands held well apart
    pub fn frame(&self) -> Vec<HandObservation> {
        self.hands
            .iter()
            .zip([LEFT_WRIST, RIGHT_WRIST])
            .map(|(&state, wrist)| HandObservation::posed(state, wrist))
            .collect()
    }
}

impl FromStr for Pose {
    type Err = DuelError;

    /// Whitespace-separated hand words: `gun`, `fist`, `open`; `none` for no hands
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut hands = Vec::new();
        for word in s.split_whitespace() {
            let state = match word.to_ascii_lowercase().as_str() {
                "gun" | "g" => HandState::Gun,
                "fist" | "f" => HandState::Fist,
                "open" | "o" => HandState::Open,
                "none" | "-" => continue,
                _ => return Err(DuelError::UnknownGesture(word.to_string())),
            };
            hands.push(state);
        }
        if hands.len() > crate::MAX_HANDS {
            return Err(DuelError::TooManyHands { max: crate::MAX_HANDS, got: hands.len() });
        }
        Ok(Self { hands })
    }
}

/// Open hands apart (arms the clap latch)
pub fn hands_apart() -> Vec<HandObservation> {
    vec![
        HandObservation::posed(HandState::Open, LEFT_WRIST),
        HandObservation::posed(HandState::Open, RIGHT_WRIST),
    ]
}

/// Open hands touching (fires a clap)
pub fn hands_together() -> Vec<HandObservation> {
    vec![
        HandObservation::posed(HandState::Open, CLAP_LEFT),
        HandObservation::posed(HandState::Open, CLAP_RIGHT),
    ]
}

/// Virtual camera + clock driving a [`Duel`]
#[derive(Debug, Clone)]
pub struct Simulator {
    now_ms: u64,
    /// Gap between the player's two lead-in claps
    clap_gap_ms: u64,
}

impl Simulator {
    pub fn new(start_ms: u64, clap_gap_ms: u64) -> Self {
        Self { now_ms: start_ms, clap_gap_ms }
    }

    pub fn now(&self) -> u64 {
        self.now_ms
    }

    /// Feed one frame and advance the virtual clock
    pub fn step<R: Rng>(&mut self, duel: &mut Duel<R>, hands: &[HandObservation]) -> TickReport {
        let report = duel.tick(self.now_ms, hands);
        self.now_ms += FRAME_MS;
        report
    }

    /// A single clap: apart, together, apart
    pub fn clap<R: Rng>(&mut self, duel: &mut Duel<R>) -> bool {
        self.step(duel, &hands_apart());
        let mut clapped = false;
        let until = self.now_ms + CLAP_HOLD_MS;
        while self.now_ms < until {
            clapped |= self.step(duel, &hands_together()).clapped;
        }
        self.step(duel, &hands_apart());
        clapped
    }

    /// Clap the lead-in, hold `pose` through the decision beat, then wait
    /// out the cooldown. Returns the round's outcome, or None if the match
    /// was not in a state to play a round.
    pub fn play_round<R: Rng>(&mut self, duel: &mut Duel<R>, pose: &Pose) -> Option<RoundOutcome> {
        if !duel.is_started() || duel.is_terminal() {
            return None;
        }

        let claps = match duel.config().tempo {
            TempoMode::Adaptive { .. } => 2,
            TempoMode::Fixed { .. } => 1,
        };

        if duel.rhythm_state() == RhythmState::Waiting {
            let lead_in_start = self.now_ms;
            self.clap(duel);
            for _ in 1..claps {
                let target = lead_in_start + self.clap_gap_ms;
                while self.now_ms + FRAME_MS < target {
                    self.step(duel, &hands_apart());
                }
                self.clap(duel);
            }
        }

        let frame = pose.frame();
        let mut outcome = None;
        for _ in 0..MAX_ROUND_FRAMES {
            let report = self.step(duel, &frame);
            if report.outcome.is_some() {
                outcome = report.outcome;
            }
            if outcome.is_some()
                && (duel.is_terminal() || duel.rhythm_state() == RhythmState::Waiting)
            {
                break;
            }
        }
        outcome
    }
}
