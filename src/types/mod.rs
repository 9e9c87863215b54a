//! Core types for qiduel

mod hand;
mod moves;
mod output;
mod reason;
mod round;
mod state;

pub use hand::{wrist_distance, HandObservation, HandState, Point2, FINGERS};
pub use hand::{
    INDEX_DIP, INDEX_MCP, INDEX_PIP, INDEX_TIP, MIDDLE_DIP, MIDDLE_MCP, MIDDLE_PIP, MIDDLE_TIP,
    PINKY_DIP, PINKY_MCP, PINKY_PIP, PINKY_TIP, RING_DIP, RING_MCP, RING_PIP, RING_TIP,
    THUMB_CMC, THUMB_IP, THUMB_MCP, THUMB_TIP, WRIST,
};
pub use moves::{BeatCue, Move, MoveCue, Waveform, ACTION_CUE, CLAP_CUE, LEAD_IN_CUE};
pub use output::{qi_bar_percent, MatchSnapshot};
pub use reason::{RoundNote, Side};
pub use round::{RoundOutcome, RoundState, SideResult, Winner};
pub use state::{ClapLatch, RhythmState};
