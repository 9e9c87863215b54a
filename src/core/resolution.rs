//! Resolution engine: two committed moves → round outcome
//!
//! 1. Validate each move against its own side's qi (downgrade / misfire)
//! 2. Deduct the validated cost
//! 3. Adjudicate each attack independently
//! 4. LUCK charges +1 qi
//! 5. Hits decide the winner; no hit means the match continues
//!
//! Pure and infallible; any qi ≥ 0 in gives qi ≥ 0 out.

use crate::types::{Move, RoundNote, RoundOutcome, Side, SideResult, Winner};
use crate::{QI_HEAVY, QI_LIGHT};

/// How an attack fared against the defender's validated move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackResult {
    /// Defender is hit
    Hit,
    /// Defender's guard held
    Blocked,
    /// Defender shot back with an equal or stronger shot
    Equalized,
}

/// Round evaluator
#[derive(Debug, Clone, Copy)]
pub struct ResolutionEngine {
    tiered: bool,
}

impl Default for ResolutionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolutionEngine {
    /// Engine with both tiers enabled
    pub fn new() -> Self {
        Self { tiered: true }
    }

    /// `tiered = false` plays the single-tier game: requested tier-2 moves
    /// are read as their tier-1 counterparts before validation
    pub fn with_tiers(tiered: bool) -> Self {
        Self { tiered }
    }

    pub fn evaluate(
        &self,
        player_move: Move,
        ai_move: Move,
        player_qi: f64,
        ai_qi: f64,
    ) -> RoundOutcome {
        let mut notes = Vec::new();

        let player_requested = self.normalize(player_move);
        let ai_requested = self.normalize(ai_move);

        // Step 1: validation
        let player_played = validate(player_requested, player_qi);
        let ai_played = validate(ai_requested, ai_qi);
        note_validation(&mut notes, Side::Player, player_requested, player_played);
        note_validation(&mut notes, Side::Ai, ai_requested, ai_played);

        // Step 2: cost
        let mut player_after = player_qi - player_played.cost();
        let mut ai_after = ai_qi - ai_played.cost();

        // Step 3: combat
        let ai_hit = self.resolve_attack(Side::Player, player_played, ai_played, &mut notes);
        let player_hit = self.resolve_attack(Side::Ai, ai_played, player_played, &mut notes);
        if player_played.is_attack() && ai_played.is_attack() && !player_hit && !ai_hit {
            notes.push(RoundNote::Equalized);
        }

        // Step 4: charge
        player_after += player_played.charge();
        ai_after += ai_played.charge();

        // Step 5: outcome
        let winner = Winner::from_hits(player_hit, ai_hit);
        let terminal = winner != Winner::None;
        let message = compose_message(winner, player_played, ai_played, &notes);

        RoundOutcome {
            player: SideResult {
                requested: player_move,
                played: player_played,
                qi_before: player_qi,
                qi_after: player_after,
                hit: player_hit,
            },
            ai: SideResult {
                requested: ai_move,
                played: ai_played,
                qi_before: ai_qi,
                qi_after: ai_after,
                hit: ai_hit,
            },
            winner,
            terminal,
            message,
            notes,
        }
    }

    fn normalize(&self, requested: Move) -> Move {
        if self.tiered {
            requested
        } else {
            requested.collapse_to_single_tier()
        }
    }

    /// Returns true if the defender is hit
    fn resolve_attack(
        &self,
        attacker: Side,
        attack: Move,
        defense: Move,
        notes: &mut Vec<RoundNote>,
    ) -> bool {
        match adjudicate(attack, defense) {
            Some(AttackResult::Hit) => {
                match (attack, defense) {
                    (Move::Attack2, Move::Defense1) => {
                        notes.push(RoundNote::BrokeGuard { side: attacker })
                    }
                    (Move::Attack2, Move::Attack1) => {
                        notes.push(RoundNote::Overpowered { side: attacker })
                    }
                    _ => {}
                }
                true
            }
            Some(AttackResult::Blocked) => {
                notes.push(RoundNote::Blocked { side: attacker });
                false
            }
            Some(AttackResult::Equalized) | None => false,
        }
    }
}

/// Affordability check. Heavy shots fall back to light shots, then misfire;
/// heavy guards fall back to the free light guard.
pub fn validate(requested: Move, qi: f64) -> Move {
    match requested {
        Move::Attack2 if qi >= QI_HEAVY => Move::Attack2,
        Move::Attack2 | Move::Attack1 if qi >= QI_LIGHT => Move::Attack1,
        Move::Attack2 | Move::Attack1 => Move::None,
        Move::Defense2 if qi >= QI_LIGHT => Move::Defense2,
        Move::Defense2 => Move::Defense1,
        other => other,
    }
}

/// Combat rule for one attacker against the defender's validated move.
/// None when `attack` is not an attack.
pub fn adjudicate(attack: Move, defense: Move) -> Option<AttackResult> {
    let result = match attack {
        Move::Attack1 => match defense {
            Move::Defense1 | Move::Defense2 => AttackResult::Blocked,
            Move::Attack1 | Move::Attack2 => AttackResult::Equalized,
            _ => AttackResult::Hit,
        },
        Move::Attack2 => match defense {
            Move::Defense2 => AttackResult::Blocked,
            Move::Attack2 => AttackResult::Equalized,
            _ => AttackResult::Hit,
        },
        _ => return None,
    };
    Some(result)
}

fn note_validation(notes: &mut Vec<RoundNote>, side: Side, requested: Move, played: Move) {
    if requested == played {
        return;
    }
    if played == Move::None {
        notes.push(RoundNote::Misfire { side, requested });
    } else {
        notes.push(RoundNote::Downgraded { side, from: requested, to: played });
    }
}

fn compose_message(winner: Winner, player: Move, ai: Move, notes: &[RoundNote]) -> String {
    let tier_break = notes
        .iter()
        .find(|n| n.is_tier_break())
        .map(|n| format!(" ({})", n.description()))
        .unwrap_or_default();

    match winner {
        Winner::Both => "Both sides were hit at once!".to_string(),
        Winner::Ai => format!("You lose! Hit while playing {}{}", player.label(), tier_break),
        Winner::Player => format!("You win! AI hit while playing {}{}", ai.label(), tier_break),
        Winner::None => {
            let mut message = format!("{} vs {}", player.label(), ai.label());
            let annotations: Vec<String> = notes
                .iter()
                .filter(|n| !matches!(n, RoundNote::Blocked { .. }))
                .map(|n| n.description())
                .collect();
            if !annotations.is_empty() {
                message.push_str(" (");
                message.push_str(&annotations.join("; "));
                message.push(')');
            }
            message
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
