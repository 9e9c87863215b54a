//! Rhythm clock phase definitions

use serde::{Deserialize, Serialize};

/// The four phases of a round's rhythm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RhythmState {
    /// Idle, waiting for a clap
    Waiting,
    /// First lead-in beat ("dong")
    Beat1,
    /// Second lead-in beat ("dong")
    Beat2,
    /// Decision beat ("da"), round is evaluated on entry
    Action,
}

impl RhythmState {
    /// The only legal successor of each phase
    pub fn next(&self) -> RhythmState {
        match self {
            RhythmState::Waiting => RhythmState::Beat1,
            RhythmState::Beat1 => RhythmState::Beat2,
            RhythmState::Beat2 => RhythmState::Action,
            RhythmState::Action => RhythmState::Waiting,
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            RhythmState::Waiting => "⏳",
            RhythmState::Beat1 => "🥁",
            RhythmState::Beat2 => "🥁",
            RhythmState::Action => "💥",
        }
    }
}

impl std::fmt::Display for RhythmState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RhythmState::Waiting => "WAITING",
            RhythmState::Beat1 => "BEAT1",
            RhythmState::Beat2 => "BEAT2",
            RhythmState::Action => "ACTION",
        };
        write!(f, "{}", name)
    }
}

/// Debounce latch for clap detection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClapLatch {
    /// Next close approach fires a clap
    Armed,
    /// A clap fired; hands must separate past the hysteresis band to re-arm
    Cooling,
}
