//! Gesture classifier: hand landmarks → HandState → player Move
//!
//! A finger counts as extended when its tip is farther from the wrist than
//! `margin` times its mid-joint. Only the four non-thumb fingers are read.
//!
//! Player move priority over all observed hands:
//! 1. no hands → DEFENSE_1 (sensor dropout)
//! 2. two guns → ATTACK_2, one gun → ATTACK_1
//! 3. more fists than open hands → LUCK
//! 4. two open hands → DEFENSE_2, else DEFENSE_1

use crate::config::ClassifierPolicy;
use crate::types::{HandObservation, HandState, Move, FINGERS};
use crate::EXTENSION_MARGIN;

/// Stateless classifier; same landmarks always give the same answer
#[derive(Debug, Clone, Copy)]
pub struct GestureClassifier {
    policy: ClassifierPolicy,
    margin: f64,
    tiered: bool,
}

impl Default for GestureClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl GestureClassifier {
    /// Fuzzy policy, default margin, both tiers
    pub fn new() -> Self {
        Self {
            policy: ClassifierPolicy::Fuzzy,
            margin: EXTENSION_MARGIN,
            tiered: true,
        }
    }

    pub fn with_policy(policy: ClassifierPolicy, margin: f64, tiered: bool) -> Self {
        Self { policy, margin, tiered }
    }

    /// Extension flags for index, middle, ring, pinky
    pub fn extended_fingers(&self, hand: &HandObservation) -> [bool; 4] {
        FINGERS.map(|(tip, joint)| hand.reach(tip) > hand.reach(joint) * self.margin)
    }

    /// Classify a single hand
    pub fn per_hand(&self, hand: &HandObservation) -> HandState {
        let extended = self.extended_fingers(hand);
        match self.policy {
            ClassifierPolicy::Fuzzy => classify_fuzzy(extended),
            ClassifierPolicy::Strict => classify_strict(extended),
        }
    }

    /// Classify the player's move from every hand currently in view
    pub fn classify_player(&self, hands: &[HandObservation]) -> Move {
        let states: Vec<HandState> = hands.iter().map(|h| self.per_hand(h)).collect();
        let chosen = move_from_states(&states);
        if self.tiered {
            chosen
        } else {
            chosen.collapse_to_single_tier()
        }
    }
}

fn classify_fuzzy(extended: [bool; 4]) -> HandState {
    let index = extended[0];
    let count = extended.iter().filter(|&&e| e).count();

    if index {
        // One stray finger next to the index still reads as a gun
        if count <= 2 {
            HandState::Gun
        } else {
            HandState::Open
        }
    } else if count <= 1 {
        HandState::Fist
    } else {
        HandState::Open
    }
}

fn classify_strict(extended: [bool; 4]) -> HandState {
    match extended {
        [true, true, true, true] => HandState::Open,
        [false, false, false, false] => HandState::Fist,
        [true, false, false, false] => HandState::Gun,
        _ => HandState::Unknown,
    }
}

/// Priority hierarchy over per-hand states
pub fn move_from_states(states: &[HandState]) -> Move {
    if states.is_empty() {
        return Move::Defense1;
    }

    let count = |target: HandState| states.iter().filter(|&&s| s == target).count();
    let guns = count(HandState::Gun);
    let fists = count(HandState::Fist);
    let opens = count(HandState::Open);

    if guns >= 2 {
        Move::Attack2
    } else if guns == 1 {
        Move::Attack1
    } else if fists > opens {
        Move::Luck
    } else if opens >= 2 {
        Move::Defense2
    } else {
        Move::Defense1
    }
}
