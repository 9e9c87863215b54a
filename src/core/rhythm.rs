//! Rhythm clock: clap-gated beat state machine
//!
//! State transitions (forward only):
//! - WAITING → BEAT1: clap (or automatically, fixed tempo with auto_continue)
//! - BEAT1 → BEAT2: second clap (adaptive) / interval elapsed (fixed)
//! - BEAT2 → ACTION: interval elapsed; the round is evaluated on entry
//! - ACTION → WAITING: cooldown elapsed, unless the match is terminal
//!
//! Cooperative: `tick` never blocks, reads the caller's clock, and advances
//! at most one phase per call.

use tracing::debug;

use crate::config::TempoMode;
use crate::types::{
    wrist_distance, BeatCue, ClapLatch, HandObservation, RhythmState, ACTION_CUE, LEAD_IN_CUE,
};
use crate::{
    ADAPTIVE_COOLDOWN_FACTOR, CLAP_HYSTERESIS, CLAP_THRESHOLD, DEFAULT_BEAT_INTERVAL_MS,
    FIXED_COOLDOWN_FACTOR,
};

// =============================================================================
// CLAP DETECTION
// =============================================================================

/// Edge-triggered clap detector over two-hand wrist distance.
///
/// ARMED → COOLING when the wrists come within `threshold` (a clap fires);
/// COOLING → ARMED once they separate beyond `threshold + hysteresis`.
#[derive(Debug, Clone)]
pub struct ClapDetector {
    latch: ClapLatch,
    threshold: f64,
    hysteresis: f64,
}

impl Default for ClapDetector {
    fn default() -> Self {
        Self::new(CLAP_THRESHOLD, CLAP_HYSTERESIS)
    }
}

impl ClapDetector {
    pub fn new(threshold: f64, hysteresis: f64) -> Self {
        Self {
            latch: ClapLatch::Armed,
            threshold,
            hysteresis,
        }
    }

    pub fn latch(&self) -> ClapLatch {
        self.latch
    }

    /// Feed one frame; true only on the frame a clap starts.
    /// Frames without exactly two hands leave the latch alone.
    pub fn observe(&mut self, hands: &[HandObservation]) -> bool {
        match hands {
            [a, b] => self.observe_distance(wrist_distance(a, b)),
            _ => false,
        }
    }

    pub fn observe_distance(&mut self, distance: f64) -> bool {
        match self.latch {
            ClapLatch::Armed if distance < self.threshold => {
                self.latch = ClapLatch::Cooling;
                debug!("clap detected at wrist distance {:.1}", distance);
                true
            }
            ClapLatch::Cooling if distance > self.threshold + self.hysteresis => {
                self.latch = ClapLatch::Armed;
                false
            }
            _ => false,
        }
    }

    pub fn reset(&mut self) {
        self.latch = ClapLatch::Armed;
    }
}

// =============================================================================
// CLOCK
// =============================================================================

/// What a tick did to the clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockEvent {
    /// Nothing changed
    Idle,
    /// Entered a lead-in beat (BEAT1 or BEAT2)
    Beat(RhythmState),
    /// Entered ACTION: evaluate the round now
    Action,
    /// Cooldown over, back to WAITING
    Ready,
}

impl ClockEvent {
    /// Sound the presentation layer should play for this event
    pub fn cue(&self) -> Option<BeatCue> {
        match self {
            ClockEvent::Beat(_) => Some(LEAD_IN_CUE),
            ClockEvent::Action => Some(ACTION_CUE),
            ClockEvent::Idle | ClockEvent::Ready => None,
        }
    }
}

/// Interval learned from two lead-in claps
pub fn adaptive_interval(t1: u64, t2: u64, min_ms: u64, max_ms: u64) -> u64 {
    t2.saturating_sub(t1).clamp(min_ms, max_ms)
}

/// The match's beat clock
#[derive(Debug, Clone)]
pub struct RhythmClock {
    tempo: TempoMode,
    state: RhythmState,
    /// When the current phase was entered (ms)
    entered_at: u64,
    t1: Option<u64>,
    t2: Option<u64>,
    interval_ms: u64,
    /// Fixed tempo only: a round has finished, so the next lead-in may start unprompted
    continue_pending: bool,
}

impl RhythmClock {
    pub fn new(tempo: TempoMode) -> Self {
        Self {
            tempo,
            state: RhythmState::Waiting,
            entered_at: 0,
            t1: None,
            t2: None,
            interval_ms: initial_interval(tempo),
            continue_pending: false,
        }
    }

    pub fn state(&self) -> RhythmState {
        self.state
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    pub fn t1(&self) -> Option<u64> {
        self.t1
    }

    pub fn t2(&self) -> Option<u64> {
        self.t2
    }

    /// How long ACTION lingers before the next WAITING
    pub fn cooldown_ms(&self) -> u64 {
        let factor = match self.tempo {
            TempoMode::Adaptive { .. } => ADAPTIVE_COOLDOWN_FACTOR,
            TempoMode::Fixed { .. } => FIXED_COOLDOWN_FACTOR,
        };
        (self.interval_ms as f64 * factor).round() as u64
    }

    /// Advance by one cooperative step.
    ///
    /// `clap` is this frame's rising edge from the [`ClapDetector`];
    /// `terminal` halts the clock in ACTION until [`RhythmClock::reset`].
    pub fn tick(&mut self, now_ms: u64, clap: bool, terminal: bool) -> ClockEvent {
        let elapsed = now_ms.saturating_sub(self.entered_at);

        match self.state {
            RhythmState::Waiting => {
                if terminal {
                    return ClockEvent::Idle;
                }
                let auto = self.continue_pending
                    && matches!(self.tempo, TempoMode::Fixed { auto_continue: true, .. });
                if clap || auto {
                    self.continue_pending = false;
                    self.t1 = Some(now_ms);
                    self.t2 = None;
                    self.enter(RhythmState::Beat1, now_ms);
                    return ClockEvent::Beat(RhythmState::Beat1);
                }
                ClockEvent::Idle
            }

            RhythmState::Beat1 => match self.tempo {
                TempoMode::Adaptive { min_ms, max_ms } => {
                    if !clap {
                        return ClockEvent::Idle;
                    }
                    let t1 = self.t1.unwrap_or(self.entered_at);
                    self.t2 = Some(now_ms);
                    self.interval_ms = adaptive_interval(t1, now_ms, min_ms, max_ms);
                    debug!(
                        "tempo learned: {}ms (claps {}ms apart)",
                        self.interval_ms,
                        now_ms.saturating_sub(t1)
                    );
                    self.enter(RhythmState::Beat2, now_ms);
                    ClockEvent::Beat(RhythmState::Beat2)
                }
                TempoMode::Fixed { .. } => {
                    if elapsed < self.interval_ms {
                        return ClockEvent::Idle;
                    }
                    self.t2 = Some(now_ms);
                    self.enter(RhythmState::Beat2, now_ms);
                    ClockEvent::Beat(RhythmState::Beat2)
                }
            },

            RhythmState::Beat2 => {
                if elapsed < self.interval_ms {
                    return ClockEvent::Idle;
                }
                self.enter(RhythmState::Action, now_ms);
                ClockEvent::Action
            }

            RhythmState::Action => {
                if terminal || elapsed < self.cooldown_ms() {
                    return ClockEvent::Idle;
                }
                self.continue_pending = true;
                self.enter(RhythmState::Waiting, now_ms);
                ClockEvent::Ready
            }
        }
    }

    /// Back to WAITING with the configured interval, from any phase
    pub fn reset(&mut self, now_ms: u64) {
        *self = Self::new(self.tempo);
        self.entered_at = now_ms;
    }

    fn enter(&mut self, next: RhythmState, now_ms: u64) {
        debug_assert_eq!(self.state.next(), next);
        debug!("rhythm {} → {} at {}ms", self.state, next, now_ms);
        self.state = next;
        self.entered_at = now_ms;
    }
}

fn initial_interval(tempo: TempoMode) -> u64 {
    match tempo {
        TempoMode::Fixed { interval_ms, .. } => interval_ms,
        TempoMode::Adaptive { min_ms, max_ms } => DEFAULT_BEAT_INTERVAL_MS.clamp(min_ms, max_ms),
    }
}

// =============================================================================
// TESTS
// =============================================================================
