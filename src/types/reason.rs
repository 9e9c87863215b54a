//! Notes explaining what happened during a round's resolution

use serde::{Deserialize, Serialize};

use crate::types::Move;

/// One of the two duelists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Side {
    Player,
    Ai,
}

impl Side {
    pub fn name(&self) -> &'static str {
        match self {
            Side::Player => "Player",
            Side::Ai => "AI",
        }
    }
}

/// A notable interaction during resolution, in the order it was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RoundNote {
    /// Requested attack had no qi behind it and became NONE
    Misfire { side: Side, requested: Move },
    /// Requested move was replaced by a cheaper tier
    Downgraded { side: Side, from: Move, to: Move },
    /// Both sides shot and the shots cancelled
    Equalized,
    /// `side`'s shot was stopped by a guard
    Blocked { side: Side },
    /// `side`'s heavy shot went through a light guard
    BrokeGuard { side: Side },
    /// `side`'s heavy shot went through a light shot
    Overpowered { side: Side },
}

impl RoundNote {
    /// Get the code string (for logging)
    pub fn code(&self) -> &'static str {
        match self {
            Self::Misfire { .. } => "MISFIRE",
            Self::Downgraded { .. } => "DOWNGRADED",
            Self::Equalized => "EQUALIZED",
            Self::Blocked { .. } => "BLOCKED",
            Self::BrokeGuard { .. } => "BROKE_GUARD",
            Self::Overpowered { .. } => "OVERPOWERED",
        }
    }

    /// Get human-readable description
    pub fn description(&self) -> String {
        match self {
            Self::Misfire { side, requested } => {
                format!("{} misfired {} (not enough qi)", side.name(), requested.label())
            }
            Self::Downgraded { side, from, to } => {
                format!(
                    "{} could only afford {} instead of {}",
                    side.name(),
                    to.label(),
                    from.label()
                )
            }
            Self::Equalized => "shots cancelled out".to_string(),
            Self::Blocked { side } => format!("{}'s shot was blocked", side.name()),
            Self::BrokeGuard { side } => format!("{}'s double shot broke the guard", side.name()),
            Self::Overpowered { side } => {
                format!("{}'s double shot overpowered a single shot", side.name())
            }
        }
    }

    /// Tier-breaking interactions annotate the round message
    pub fn is_tier_break(&self) -> bool {
        matches!(self, Self::BrokeGuard { .. } | Self::Overpowered { .. })
    }
}

impl std::fmt::Display for RoundNote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code(), self.description())
    }
}
