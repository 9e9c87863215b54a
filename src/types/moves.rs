//! Moves, their qi economy, and the presentation cues attached to them

use serde::{Deserialize, Serialize};

use crate::{QI_CHARGE, QI_HEAVY, QI_LIGHT};

/// The discrete action a side commits to for one round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Move {
    /// Charge: +1 qi after combat
    Luck,
    /// Light shot (0.5 qi)
    #[serde(rename = "ATTACK_1")]
    Attack1,
    /// Heavy shot (1.0 qi), breaks a light guard
    #[serde(rename = "ATTACK_2")]
    Attack2,
    /// Light guard, free
    #[serde(rename = "DEFENSE_1")]
    Defense1,
    /// Heavy guard (0.5 qi), stops a heavy shot
    #[serde(rename = "DEFENSE_2")]
    Defense2,
    /// Nothing, or a misfired attack
    None,
}

impl Move {
    pub const ALL: [Move; 6] = [
        Move::Luck,
        Move::Attack1,
        Move::Attack2,
        Move::Defense1,
        Move::Defense2,
        Move::None,
    ];

    /// Qi spent when this move is played
    pub fn cost(&self) -> f64 {
        match self {
            Move::Attack1 | Move::Defense2 => QI_LIGHT,
            Move::Attack2 => QI_HEAVY,
            Move::Luck | Move::Defense1 | Move::None => 0.0,
        }
    }

    /// Qi gained after combat
    pub fn charge(&self) -> f64 {
        match self {
            Move::Luck => QI_CHARGE,
            _ => 0.0,
        }
    }

    pub fn is_attack(&self) -> bool {
        matches!(self, Move::Attack1 | Move::Attack2)
    }

    pub fn is_defense(&self) -> bool {
        matches!(self, Move::Defense1 | Move::Defense2)
    }

    /// 1 or 2 for attacks and guards, 0 otherwise
    pub fn tier(&self) -> u8 {
        match self {
            Move::Attack1 | Move::Defense1 => 1,
            Move::Attack2 | Move::Defense2 => 2,
            _ => 0,
        }
    }

    /// The single-tier game's equivalent of this move
    pub fn collapse_to_single_tier(self) -> Move {
        match self {
            Move::Attack2 => Move::Attack1,
            Move::Defense2 => Move::Defense1,
            other => other,
        }
    }

    /// Presentation cue for this move
    pub fn cue(&self) -> &'static MoveCue {
        match self {
            Move::Luck => &MOVE_CUES[0],
            Move::Attack1 => &MOVE_CUES[1],
            Move::Attack2 => &MOVE_CUES[2],
            Move::Defense1 => &MOVE_CUES[3],
            Move::Defense2 => &MOVE_CUES[4],
            Move::None => &MOVE_CUES[5],
        }
    }

    pub fn label(&self) -> &'static str {
        self.cue().label
    }

    /// Wire name, e.g. `ATTACK_2`
    pub fn name(&self) -> &'static str {
        match self {
            Move::Luck => "LUCK",
            Move::Attack1 => "ATTACK_1",
            Move::Attack2 => "ATTACK_2",
            Move::Defense1 => "DEFENSE_1",
            Move::Defense2 => "DEFENSE_2",
            Move::None => "NONE",
        }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// What the presentation layer shows and plays for a move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MoveCue {
    pub label: &'static str,
    /// Opponent portrait asset
    pub icon: &'static str,
    /// Sound effect key
    pub sound: &'static str,
}

const MOVE_CUES: [MoveCue; 6] = [
    MoveCue { label: "Charge (Luck)", icon: "image/LUCK.png", sound: "charge" },
    MoveCue { label: "Shot", icon: "image/ATTACK.png", sound: "shot" },
    MoveCue { label: "Double Shot", icon: "image/ATTACK.png", sound: "heavy_shot" },
    MoveCue { label: "Guard", icon: "image/DEFENSE.png", sound: "guard" },
    MoveCue { label: "Iron Guard", icon: "image/DEFENSE.png", sound: "heavy_guard" },
    MoveCue { label: "Ready (no move)", icon: "image/NORMAL.png", sound: "idle" },
];

/// Oscillator shape for a beat tone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Waveform {
    Triangle,
    Square,
    BrownNoise,
}

/// A short synthesized sound the presentation layer plays on a beat
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BeatCue {
    pub freq_hz: f64,
    pub duration_s: f64,
    pub waveform: Waveform,
}

/// Lead-in beat ("dong")
pub const LEAD_IN_CUE: BeatCue =
    BeatCue { freq_hz: 300.0, duration_s: 0.1, waveform: Waveform::Triangle };

/// Action beat ("da")
pub const ACTION_CUE: BeatCue =
    BeatCue { freq_hz: 600.0, duration_s: 0.2, waveform: Waveform::Square };

/// Detected clap
pub const CLAP_CUE: BeatCue =
    BeatCue { freq_hz: 0.0, duration_s: 0.15, waveform: Waveform::BrownNoise };

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_costs() {
        assert_eq!(Move::Attack1.cost(), 0.5);
        assert_eq!(Move::Defense2.cost(), 0.5);
        assert_eq!(Move::Attack2.cost(), 1.0);
        for m in [Move::Luck, Move::Defense1, Move::None] {
            assert_eq!(m.cost(), 0.0);
        }
    }

    #[test]
    fn test_only_luck_charges() {
        for m in Move::ALL {
            let expected = if m == Move::Luck { 1.0 } else { 0.0 };
            assert_eq!(m.charge(), expected, "{}", m);
        }
    }

    #[test]
    fn test_collapse() {
        assert_eq!(Move::Attack2.collapse_to_single_tier(), Move::Attack1);
        assert_eq!(Move::Defense2.collapse_to_single_tier(), Move::Defense1);
        assert_eq!(Move::Luck.collapse_to_single_tier(), Move::Luck);
    }

    #[test]
    fn test_cue_table_matches_move() {
        assert_eq!(Move::Luck.cue().icon, "image/LUCK.png");
        assert_eq!(Move::Attack2.cue().sound, "heavy_shot");
        assert_eq!(Move::Defense1.cue().icon, "image/DEFENSE.png");
        assert_eq!(Move::None.cue().icon, "image/NORMAL.png");
    }

    #[test]
    fn test_serde_names() {
        for m in Move::ALL {
            assert_eq!(serde_json::to_string(&m).unwrap(), format!("\"{}\"", m.name()));
        }
    }
}
