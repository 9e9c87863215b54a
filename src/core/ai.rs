//! Computer opponent: banded weight table + one uniform draw
//!
//! Bands: own qi (LOW < 0.5, HALF < 1.0, FULL) × opponent threat
//! (NONE < 0.5, LIGHT < 1.0, HEAVY). Each cell is a categorical
//! distribution over ATTACK_1, ATTACK_2, DEFENSE_1, DEFENSE_2, LUCK.
//!
//! Table shape: attack weight grows with own qi and with opponent weakness;
//! when own qi is low, defense weight grows with opponent threat; charging
//! dominates only when both sides are low. Unaffordable moves carry zero
//! weight so the AI never misfires on purpose.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::types::Move;
use crate::{QI_HEAVY, QI_LIGHT};

/// Draw order for each weight row
pub const CHOICES: [Move; 5] = [
    Move::Attack1,
    Move::Attack2,
    Move::Defense1,
    Move::Defense2,
    Move::Luck,
];

/// Coarse qi band
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QiBand {
    Low,
    Half,
    Full,
}

impl QiBand {
    pub fn of(qi: f64) -> QiBand {
        if qi >= QI_HEAVY {
            QiBand::Full
        } else if qi >= QI_LIGHT {
            QiBand::Half
        } else {
            QiBand::Low
        }
    }

    fn index(&self) -> usize {
        match self {
            QiBand::Low => 0,
            QiBand::Half => 1,
            QiBand::Full => 2,
        }
    }
}

/// Weights indexed by [own band][opponent band], columns in `CHOICES` order
pub const POLICY_TABLE: [[[f64; 5]; 3]; 3] = [
    // Own LOW: only guard or charge
    [
        [0.00, 0.00, 0.10, 0.00, 0.90], // opponent NONE: both weak, charge
        [0.00, 0.00, 0.85, 0.00, 0.15], // opponent LIGHT: survive
        [0.00, 0.00, 0.95, 0.00, 0.05], // opponent HEAVY: survive harder
    ],
    // Own HALF: light shot and heavy guard available
    [
        [0.80, 0.00, 0.00, 0.00, 0.20], // press the advantage
        [0.50, 0.00, 0.20, 0.25, 0.05], // standoff
        [0.35, 0.00, 0.05, 0.55, 0.05], // heavy guard against the heavy shot
    ],
    // Own FULL: everything available
    [
        [0.30, 0.60, 0.00, 0.00, 0.10],
        [0.30, 0.30, 0.10, 0.25, 0.05],
        [0.15, 0.30, 0.00, 0.50, 0.05],
    ],
];

/// Weight row for the given resource levels
pub fn weights(ai_qi: f64, player_qi: f64) -> &'static [f64; 5] {
    &POLICY_TABLE[QiBand::of(ai_qi).index()][QiBand::of(player_qi).index()]
}

/// Pick a move from a uniform draw in [0, 1) against cumulative weights
pub fn pick(weights: &[f64; 5], draw: f64) -> Move {
    let mut cumulative = 0.0;
    for (choice, &weight) in CHOICES.iter().zip(weights.iter()) {
        cumulative += weight;
        if weight > 0.0 && draw < cumulative {
            return *choice;
        }
    }
    // Rounding left the draw above the last threshold: take the last
    // non-zero option
    CHOICES
        .iter()
        .zip(weights.iter())
        .rev()
        .find(|(_, &w)| w > 0.0)
        .map(|(c, _)| *c)
        .unwrap_or(Move::Luck)
}

/// The computer opponent. Stateless between rounds apart from its RNG.
#[derive(Debug, Clone)]
pub struct AiPolicy<R: Rng = StdRng> {
    rng: R,
    tiered: bool,
}

impl AiPolicy<StdRng> {
    /// Deterministic opponent for replays and tests
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }
}

impl<R: Rng> AiPolicy<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng, tiered: true }
    }

    /// Restrict to tier-1 moves
    pub fn single_tier(mut self) -> Self {
        self.tiered = false;
        self
    }

    pub fn set_tiered(&mut self, tiered: bool) {
        self.tiered = tiered;
    }

    /// Choose this round's move
    pub fn decide(&mut self, ai_qi: f64, player_qi: f64) -> Move {
        let draw: f64 = self.rng.gen();
        let chosen = self.decide_with_draw(ai_qi, player_qi, draw);
        debug!(ai_qi, player_qi, draw, "ai chose {}", chosen);
        chosen
    }

    /// Same as [`AiPolicy::decide`] with the random draw supplied
    pub fn decide_with_draw(&self, ai_qi: f64, player_qi: f64, draw: f64) -> Move {
        let chosen = pick(weights(ai_qi, player_qi), draw);
        if self.tiered {
            chosen
        } else {
            chosen.collapse_to_single_tier()
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::resolution::validate;

    fn attack_weight(row: &[f64; 5]) -> f64 {
        row[0] + row[1]
    }

    fn defense_weight(row: &[f64; 5]) -> f64 {
        row[2] + row[3]
    }

    #[test]
    fn test_rows_sum_to_one() {
        for own in &POLICY_TABLE {
            for row in own {
                let sum: f64 = row.iter().sum();
                assert!((sum - 1.0).abs() < 1e-9, "{:?}", row);
            }
        }
    }

    #[test]
    fn test_attack_weight_grows_with_own_qi() {
        for opp in 0..3 {
            for own in 0..2 {
                assert!(
                    attack_weight(&POLICY_TABLE[own][opp])
                        < attack_weight(&POLICY_TABLE[own + 1][opp]),
                    "own {} opp {}",
                    own,
                    opp
                );
            }
        }
    }

    #[test]
    fn test_attack_weight_grows_with_opponent_weakness() {
        for own in 1..3 {
            for opp in 0..2 {
                assert!(
                    attack_weight(&POLICY_TABLE[own][opp])
                        > attack_weight(&POLICY_TABLE[own][opp + 1])
                );
            }
        }
    }

    #[test]
    fn test_defense_grows_with_threat_when_low() {
        let low = &POLICY_TABLE[0];
        assert!(defense_weight(&low[0]) < defense_weight(&low[1]));
        assert!(defense_weight(&low[1]) < defense_weight(&low[2]));
    }

    #[test]
    fn test_charge_favored_only_when_both_weak() {
        let both_weak = POLICY_TABLE[0][0][4];
        for (own, rows) in POLICY_TABLE.iter().enumerate() {
            for (opp, row) in rows.iter().enumerate() {
                if (own, opp) != (0, 0) {
                    assert!(row[4] < both_weak);
                    assert!(row[4] < 0.5);
                }
            }
        }
        assert!(both_weak > 0.5);
    }

    #[test]
    fn test_never_chooses_unaffordable() {
        let ai = AiPolicy::seeded(1);
        for &qi in &[0.0, 0.5, 1.0, 2.0] {
            for &opp in &[0.0, 0.5, 1.0] {
                for i in 0..100 {
                    let draw = i as f64 / 100.0;
                    let chosen = ai.decide_with_draw(qi, opp, draw);
                    assert_eq!(validate(chosen, qi), chosen, "qi={} draw={}", qi, draw);
                }
            }
        }
    }

    #[test]
    fn test_pick_thresholds() {
        let row = [0.80, 0.00, 0.00, 0.00, 0.20];
        assert_eq!(pick(&row, 0.0), Move::Attack1);
        assert_eq!(pick(&row, 0.79), Move::Attack1);
        assert_eq!(pick(&row, 0.80), Move::Luck);
        assert_eq!(pick(&row, 0.9999999), Move::Luck);
    }

    #[test]
    fn test_pick_skips_zero_weights_at_boundary() {
        let row = [0.0, 0.0, 0.10, 0.0, 0.90];
        assert_eq!(pick(&row, 0.0), Move::Defense1);
        assert_eq!(pick(&row, 0.1), Move::Luck);
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let mut a = AiPolicy::seeded(42);
        let mut b = AiPolicy::seeded(42);
        for _ in 0..50 {
            assert_eq!(a.decide(1.0, 0.5), b.decide(1.0, 0.5));
        }
    }

    #[test]
    fn test_single_tier_never_emits_tier_two() {
        let mut ai = AiPolicy::seeded(9).single_tier();
        for _ in 0..200 {
            let m = ai.decide(2.0, 2.0);
            assert!(m.tier() <= 1, "{}", m);
        }
    }
}
