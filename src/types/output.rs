//! Round-outcome output for the presentation layer

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

use crate::types::{Move, RhythmState, RoundState, Winner};

/// Read-only view of the match, produced after every tick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchSnapshot {
    /// Timestamp
    pub timestamp: DateTime<Utc>,
    pub started: bool,
    pub rhythm_state: RhythmState,
    /// Current beat interval (ms)
    pub interval_ms: u64,
    pub round: u32,
    pub player_qi: f64,
    pub ai_qi: f64,
    pub player_move: Option<Move>,
    pub ai_move: Option<Move>,
    /// Live classifier reading while waiting for the clap
    #[serde(skip_serializing_if = "Option::is_none")]
    pub predicted_move: Option<Move>,
    pub message: String,
    pub winner: Winner,
    pub terminal: bool,
}

impl MatchSnapshot {
    pub fn new(
        state: &RoundState,
        started: bool,
        rhythm_state: RhythmState,
        interval_ms: u64,
        predicted_move: Option<Move>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            started,
            rhythm_state,
            interval_ms,
            round: state.round,
            player_qi: state.player_qi,
            ai_qi: state.ai_qi,
            player_move: state.player_move,
            ai_move: state.ai_move,
            predicted_move,
            message: state.message.clone(),
            winner: state.winner,
            terminal: state.terminal,
        }
    }

    /// Icon the opponent portrait should show: the AI's move only while the
    /// action beat is on screen
    pub fn ai_icon(&self) -> &'static str {
        match (self.rhythm_state, self.ai_move) {
            (RhythmState::Action, Some(m)) => m.cue().icon,
            _ => Move::None.cue().icon,
        }
    }

    /// Format for parseable output (no colors)
    pub fn to_parseable_string(&self) -> String {
        format!(
            "round={} | state={} | player={} qi={:.1} | ai={} qi={:.1} | winner={} | terminal={}",
            self.round,
            self.rhythm_state,
            self.player_move.map(|m| m.name()).unwrap_or("-"),
            self.player_qi,
            self.ai_move.map(|m| m.name()).unwrap_or("-"),
            self.ai_qi,
            self.winner,
            self.terminal
        )
    }
}

/// Qi gauge fill, 20% per qi unit, clamped to [0, 100]
pub fn qi_bar_percent(qi: f64) -> f64 {
    (qi * 20.0).clamp(0.0, 100.0)
}
