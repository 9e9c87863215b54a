//! Core modules for qiduel

pub mod classifier;
pub mod rhythm;
pub mod resolution;
pub mod ai;
pub mod duel;
pub mod sim;
pub mod api;

pub use classifier::{move_from_states, GestureClassifier};
pub use rhythm::{adaptive_interval, ClapDetector, ClockEvent, RhythmClock};
pub use resolution::{adjudicate, validate, AttackResult, ResolutionEngine};
pub use ai::{AiPolicy, QiBand};
pub use duel::{Duel, TickReport};
pub use sim::{Pose, Simulator};
pub use api::{create_router, run_server};
