//! Error types for qiduel boundaries
//!
//! The round rules themselves never fail: unaffordable moves downgrade,
//! missing hands fall back to defense. Errors only arise where outside data
//! enters the crate (config files, landmark frames) or a command arrives at
//! the wrong time.

use std::io;
use thiserror::Error;

/// Result type alias for qiduel operations.
pub type Result<T> = std::result::Result<T, DuelError>;

/// Errors that can occur at the crate's boundaries.
#[derive(Debug, Error)]
pub enum DuelError {
    /// A hand observation did not carry the expected number of keypoints.
    #[error("Landmark count mismatch: expected {expected}, got {got}")]
    LandmarkCount {
        /// Keypoints per hand.
        expected: usize,
        /// Keypoints supplied.
        got: usize,
    },

    /// More hands than the perception contract allows.
    #[error("Too many hands: maximum is {max}, got {got}")]
    TooManyHands { max: usize, got: usize },

    /// Beat interval knob outside its bounds.
    #[error("Beat interval {got}ms outside [{min}, {max}]ms")]
    BeatIntervalOutOfRange { got: u64, min: u64, max: u64 },

    /// Any other configuration inconsistency.
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Restart requested while a match is still being played.
    #[error("Restart rejected: match in progress (round {round})")]
    RestartRejected { round: u32 },

    /// Unrecognized gesture word in a scripted round.
    #[error("Unknown gesture '{0}' (expected gun, fist, open or none)")]
    UnknownGesture(String),

    /// I/O error while reading a config file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed JSON config.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
