//! Match configuration
//!
//! Every field has a default, so a config file only needs the keys it
//! changes. CLI flags are applied on top of whatever the file produced.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DuelError, Result};
use crate::{
    ADAPTIVE_INTERVAL_MAX_MS, ADAPTIVE_INTERVAL_MIN_MS, BEAT_INTERVAL_KNOB_MAX_MS,
    BEAT_INTERVAL_KNOB_MIN_MS, CLAP_HYSTERESIS, CLAP_THRESHOLD, DEFAULT_BEAT_INTERVAL_MS,
    EXTENSION_MARGIN,
};

/// How the rhythm clock obtains its interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum TempoMode {
    /// Interval learned from the gap between the two lead-in claps
    Adaptive { min_ms: u64, max_ms: u64 },
    /// Configured interval; one clap starts the round, beats follow on their own
    Fixed {
        interval_ms: u64,
        /// Start the next lead-in without waiting for a clap
        #[serde(default)]
        auto_continue: bool,
    },
}

impl Default for TempoMode {
    fn default() -> Self {
        TempoMode::Adaptive {
            min_ms: ADAPTIVE_INTERVAL_MIN_MS,
            max_ms: ADAPTIVE_INTERVAL_MAX_MS,
        }
    }
}

/// Per-hand classification policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierPolicy {
    /// Tolerates one stray finger; never reports UNKNOWN
    #[default]
    Fuzzy,
    /// Exact finger patterns only; anything else is UNKNOWN
    Strict,
}

/// Full match configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub tempo: TempoMode,
    pub classifier: ClassifierPolicy,
    /// Tier-2 moves enabled; false collapses to the single-tier game
    pub tiered: bool,
    pub extension_margin: f64,
    pub clap_threshold: f64,
    pub clap_hysteresis: f64,
    /// Seed for the AI's random source; None draws from entropy
    pub ai_seed: Option<u64>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            tempo: TempoMode::default(),
            classifier: ClassifierPolicy::default(),
            tiered: true,
            extension_margin: EXTENSION_MARGIN,
            clap_threshold: CLAP_THRESHOLD,
            clap_hysteresis: CLAP_HYSTERESIS,
            ai_seed: None,
        }
    }
}

impl MatchConfig {
    /// Load from a JSON file and validate
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Parse from a JSON string and validate
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: MatchConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Switch to a fixed tempo driven by the beat-interval knob
    pub fn with_beat_interval(mut self, interval_ms: u64) -> Self {
        let auto_continue = matches!(
            self.tempo,
            TempoMode::Fixed { auto_continue: true, .. }
        );
        self.tempo = TempoMode::Fixed { interval_ms, auto_continue };
        self
    }

    /// Fixed tempo at the default interval
    pub fn fixed_default() -> Self {
        Self::default().with_beat_interval(DEFAULT_BEAT_INTERVAL_MS)
    }

    pub fn validate(&self) -> Result<()> {
        match self.tempo {
            TempoMode::Fixed { interval_ms, .. } => {
                if !(BEAT_INTERVAL_KNOB_MIN_MS..=BEAT_INTERVAL_KNOB_MAX_MS).contains(&interval_ms) {
                    return Err(DuelError::BeatIntervalOutOfRange {
                        got: interval_ms,
                        min: BEAT_INTERVAL_KNOB_MIN_MS,
                        max: BEAT_INTERVAL_KNOB_MAX_MS,
                    });
                }
            }
            TempoMode::Adaptive { min_ms, max_ms } => {
                if min_ms == 0 || min_ms > max_ms {
                    return Err(DuelError::InvalidConfig(format!(
                        "adaptive bounds must satisfy 0 < min <= max, got [{}, {}]",
                        min_ms, max_ms
                    )));
                }
            }
        }

        if !(self.clap_threshold > 0.0) {
            return Err(DuelError::InvalidConfig(format!(
                "clap_threshold must be positive, got {}",
                self.clap_threshold
            )));
        }
        if !(self.clap_hysteresis >= 0.0) {
            return Err(DuelError::InvalidConfig(format!(
                "clap_hysteresis must be non-negative, got {}",
                self.clap_hysteresis
            )));
        }
        if !(self.extension_margin > 1.0) {
            return Err(DuelError::InvalidConfig(format!(
                "extension_margin must exceed 1.0, got {}",
                self.extension_margin
            )));
        }
        Ok(())
    }
}
