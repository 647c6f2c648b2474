//! Damage calculation.
//!
//! ```text
//! base  = max(0, attacker.attack - defender.defense)
//! final = round_half_up(base * multiplier)
//! ```
//!
//! The multiplier is applied in integer percent so rounding is exact:
//! `(base * percent + 50) / 100`. A base of 10 gives 13 when strong and
//! 8 when weak.

use serde::{Deserialize, Serialize};

use super::advantage::{advantage, Advantage};
use crate::cards::Card;

/// Damage dealt by one card to another.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Damage {
    pub base: i32,
    pub advantage: Advantage,
    #[serde(rename = "final")]
    pub final_damage: i32,
}

/// Raw damage before elemental scaling. Never negative.
#[must_use]
pub fn base_damage(attacker: &Card, defender: &Card) -> i32 {
    attacker
        .stats
        .attack
        .saturating_sub(defender.stats.defense)
        .max(0)
}

/// Scale `base` by an advantage, rounding half up.
#[must_use]
pub fn scale(base: i32, advantage: Advantage) -> i32 {
    let scaled = (i64::from(base.max(0)) * i64::from(advantage.multiplier_percent()) + 50) / 100;
    i32::try_from(scaled).unwrap_or(i32::MAX)
}

/// Full damage computation for `attacker` hitting `defender`.
///
/// Both cards are expected to be already effect-modified.
#[must_use]
pub fn calculate(attacker: &Card, defender: &Card) -> Damage {
    let adv = advantage(attacker.element, defender.element);
    calculate_with(attacker, defender, adv)
}

/// Damage computation with an explicit advantage classification.
#[must_use]
pub fn calculate_with(attacker: &Card, defender: &Card, advantage: Advantage) -> Damage {
    let base = base_damage(attacker, defender);
    Damage {
        base,
        advantage,
        final_damage: scale(base, advantage),
    }
}
