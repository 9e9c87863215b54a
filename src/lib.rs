//! qiduel: clap-timed hand-gesture duel against a computer opponent
//!
//! Per round: clap lead-in → RhythmClock → GestureClassifier + AiPolicy → ResolutionEngine

pub mod config;
pub mod core;
pub mod error;
pub mod types;

pub use config::{ClassifierPolicy, MatchConfig, TempoMode};
pub use error::{DuelError, Result};

// =============================================================================
// CLASSIFIER
// =============================================================================

/// Fingertip must be this many times farther from the wrist than its mid-joint
pub const EXTENSION_MARGIN: f64 = 1.2;

/// Keypoints per hand observation
pub const LANDMARK_COUNT: usize = 21;

/// Hands the perception input may carry per frame
pub const MAX_HANDS: usize = 2;

// =============================================================================
// CLAP DETECTION
// =============================================================================

/// Wrist-to-wrist distance (pixels) below which two hands count as a clap
pub const CLAP_THRESHOLD: f64 = 100.0;

/// Extra separation beyond the threshold required to re-arm the latch
pub const CLAP_HYSTERESIS: f64 = 50.0;

// =============================================================================
// TEMPO [ms]
// =============================================================================

/// Lower clamp for the clap-derived interval
pub const ADAPTIVE_INTERVAL_MIN_MS: u64 = 400;

/// Upper clamp for the clap-derived interval
pub const ADAPTIVE_INTERVAL_MAX_MS: u64 = 1500;

/// Default fixed beat interval
pub const DEFAULT_BEAT_INTERVAL_MS: u64 = 400;

/// Bounds for the external beat-interval knob
pub const BEAT_INTERVAL_KNOB_MIN_MS: u64 = 300;
pub const BEAT_INTERVAL_KNOB_MAX_MS: u64 = 1200;

/// Post-action cooldown as a multiple of the interval
pub const ADAPTIVE_COOLDOWN_FACTOR: f64 = 1.5;
pub const FIXED_COOLDOWN_FACTOR: f64 = 2.0;

// =============================================================================
// QI ECONOMY
// =============================================================================

/// Cost of a light shot or a heavy guard
pub const QI_LIGHT: f64 = 0.5;

/// Cost of a heavy shot
pub const QI_HEAVY: f64 = 1.0;

/// Qi gained by charging (LUCK)
pub const QI_CHARGE: f64 = 1.0;

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = "1.0.0";
