//! Round state and round outcome

use serde::{Deserialize, Serialize};

use crate::types::{Move, RoundNote};

/// Who won once the match is terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Winner {
    #[default]
    None,
    Player,
    Ai,
    Both,
}

impl Winner {
    /// Winner implied by which sides were hit
    pub fn from_hits(player_hit: bool, ai_hit: bool) -> Winner {
        match (player_hit, ai_hit) {
            (true, true) => Winner::Both,
            (true, false) => Winner::Ai,
            (false, true) => Winner::Player,
            (false, false) => Winner::None,
        }
    }

    pub fn headline(&self) -> &'static str {
        match self {
            Winner::None => "Round continues",
            Winner::Player => "🏆 You win!",
            Winner::Ai => "💀 AI wins!",
            Winner::Both => "🤝 Mutual destruction!",
        }
    }
}

impl std::fmt::Display for Winner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Winner::None => "NONE",
            Winner::Player => "PLAYER",
            Winner::Ai => "AI",
            Winner::Both => "BOTH",
        };
        write!(f, "{}", name)
    }
}

/// One side's view of a resolved round
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SideResult {
    /// Move as chosen (classifier or AI draw)
    pub requested: Move,
    /// Move after affordability checks
    pub played: Move,
    pub qi_before: f64,
    pub qi_after: f64,
    pub hit: bool,
}

/// Result of one round evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundOutcome {
    pub player: SideResult,
    pub ai: SideResult,
    pub winner: Winner,
    pub terminal: bool,
    pub message: String,
    pub notes: Vec<RoundNote>,
}

/// Persistent match state, mutated only by applying a round outcome
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RoundState {
    pub player_qi: f64,
    pub ai_qi: f64,
    pub player_move: Option<Move>,
    pub ai_move: Option<Move>,
    pub message: String,
    pub winner: Winner,
    pub terminal: bool,
    /// Rounds resolved since the match started
    pub round: u32,
}

impl RoundState {
    /// Fold a resolved round into the match.
    ///
    /// `terminal` only ever goes from false to true here; clearing it
    /// takes a match restart.
    pub fn apply(&mut self, outcome: &RoundOutcome) {
        self.player_qi = outcome.player.qi_after;
        self.ai_qi = outcome.ai.qi_after;
        self.player_move = Some(outcome.player.played);
        self.ai_move = Some(outcome.ai.played);
        self.message = outcome.message.clone();
        self.round += 1;
        if outcome.terminal && !self.terminal {
            self.terminal = true;
            self.winner = outcome.winner;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_winner_from_hits() {
        assert_eq!(Winner::from_hits(true, true), Winner::Both);
        assert_eq!(Winner::from_hits(true, false), Winner::Ai);
        assert_eq!(Winner::from_hits(false, true), Winner::Player);
        assert_eq!(Winner::from_hits(false, false), Winner::None);
    }

    #[test]
    fn test_default_round_state_is_zeroed() {
        let state = RoundState::default();
        assert_eq!(state.player_qi, 0.0);
        assert_eq!(state.ai_qi, 0.0);
        assert!(!state.terminal);
        assert_eq!(state.winner, Winner::None);
    }
}
