//! Hand landmark geometry
//!
//! A hand is 21 keypoints in pixel space following the usual anatomical
//! indexing: 0 = wrist, then four points per digit from thumb to pinky.

use serde::{Deserialize, Serialize};

use crate::error::{DuelError, Result};
use crate::LANDMARK_COUNT;

pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

/// The four non-thumb fingers as (tip, mid-joint) pairs, index first
pub const FINGERS: [(usize, usize); 4] = [
    (INDEX_TIP, INDEX_PIP),
    (MIDDLE_TIP, MIDDLE_PIP),
    (RING_TIP, RING_PIP),
    (PINKY_TIP, PINKY_PIP),
];

/// A 2D keypoint
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point2) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// One detected hand for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct HandObservation {
    points: [Point2; LANDMARK_COUNT],
}

impl HandObservation {
    /// Build from a keypoint list; anything but 21 points is rejected
    pub fn new(points: Vec<Point2>) -> Result<Self> {
        let got = points.len();
        let points: [Point2; LANDMARK_COUNT] = points
            .try_into()
            .map_err(|_| DuelError::LandmarkCount { expected: LANDMARK_COUNT, got })?;
        Ok(Self { points })
    }

    pub fn from_array(points: [Point2; LANDMARK_COUNT]) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point2; LANDMARK_COUNT] {
        &self.points
    }

    pub fn wrist(&self) -> Point2 {
        self.points[WRIST]
    }

    /// Distance of a keypoint from the wrist
    pub fn reach(&self, index: usize) -> f64 {
        self.points[index].distance(&self.points[WRIST])
    }

    /// Synthesize an upright hand at `wrist` showing the given pose.
    ///
    /// GUN extends the index finger only, OPEN all four fingers, FIST and
    /// UNKNOWN none. Mid-joints sit 60px from the wrist; extended tips
    /// at 110px, curled tips at 40px.
    pub fn posed(pose: HandState, wrist: Point2) -> Self {
        let extended: [bool; 4] = match pose {
            HandState::Gun => [true, false, false, false],
            HandState::Open => [true, true, true, true],
            HandState::Fist | HandState::Unknown => [false; 4],
        };
        Self::with_fingers(extended, wrist)
    }

    /// Synthesize an upright hand with an explicit extension pattern
    /// (index, middle, ring, pinky).
    pub fn with_fingers(extended: [bool; 4], wrist: Point2) -> Self {
        let mut points = [wrist; LANDMARK_COUNT];

        // Thumb tucked to the side
        let thumb = [(-25.0, -15.0), (-40.0, -30.0), (-45.0, -45.0), (-45.0, -55.0)];
        for (i, (dx, dy)) in thumb.iter().enumerate() {
            points[THUMB_CMC + i] = Point2::new(wrist.x + dx, wrist.y + dy);
        }

        let spread = [-30.0, -10.0, 10.0, 30.0];
        for (finger, &dx) in spread.iter().enumerate() {
            let base = INDEX_MCP + finger * 4;
            let (dip, tip) = if extended[finger] { (85.0, 110.0) } else { (50.0, 40.0) };
            let lengths = [40.0, 60.0, dip, tip];
            for (j, len) in lengths.iter().enumerate() {
                points[base + j] = Point2::new(wrist.x + dx, wrist.y - len);
            }
        }

        Self { points }
    }
}

impl<'de> Deserialize<'de> for HandObservation {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let points = Vec::<Point2>::deserialize(deserializer)?;
        HandObservation::new(points).map_err(serde::de::Error::custom)
    }
}

/// Distance between the wrists of two hands
pub fn wrist_distance(a: &HandObservation, b: &HandObservation) -> f64 {
    a.wrist().distance(&b.wrist())
}

/// Discrete shape of one hand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HandState {
    Fist,
    Open,
    Gun,
    Unknown,
}

impl std::fmt::Display for HandState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            HandState::Fist => "FIST",
            HandState::Open => "OPEN",
            HandState::Gun => "GUN",
            HandState::Unknown => "UNKNOWN",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_wrong_point_count() {
        let err = HandObservation::new(vec![Point2::default(); 20]).unwrap_err();
        assert!(matches!(err, DuelError::LandmarkCount { expected: 21, got: 20 }));
    }

    #[test]
    fn test_accepts_21_points() {
        let hand = HandObservation::new(vec![Point2::new(1.0, 2.0); 21]).unwrap();
        assert_eq!(hand.wrist(), Point2::new(1.0, 2.0));
    }

    #[test]
    fn test_deserialize_validates_length() {
        let short = serde_json::to_string(&vec![Point2::default(); 5]).unwrap();
        assert!(serde_json::from_str::<HandObservation>(&short).is_err());

        let hand = HandObservation::posed(HandState::Open, Point2::new(100.0, 300.0));
        let json = serde_json::to_string(&hand).unwrap();
        let back: HandObservation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, hand);
    }

    #[test]
    fn test_posed_geometry() {
        let hand = HandObservation::posed(HandState::Gun, Point2::new(0.0, 0.0));
        assert!(hand.reach(INDEX_TIP) > hand.reach(INDEX_PIP) * 1.2);
        assert!(hand.reach(MIDDLE_TIP) < hand.reach(MIDDLE_PIP));
    }

    #[test]
    fn test_wrist_distance() {
        let a = HandObservation::posed(HandState::Fist, Point2::new(0.0, 0.0));
        let b = HandObservation::posed(HandState::Fist, Point2::new(30.0, 40.0));
        assert!((wrist_distance(&a, &b) - 50.0).abs() < 1e-9);
    }
}
