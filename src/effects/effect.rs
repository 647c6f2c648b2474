//! Active effect definitions.
//!
//! An `ActiveEffect` is a temporary modifier living in the game state's
//! effect list. Each `EffectKind` variant carries exactly the data its
//! kind needs; consumers match on it exhaustively.
//!
//! ## Lifetime
//!
//! `rounds_remaining` counts the resolved rounds the effect still applies
//! to. After every resolved round each effect is decremented, and effects
//! reaching zero are dropped before the next round begins.

use im::OrdMap;
use serde::{Deserialize, Serialize};

use super::ability::AbilityId;
use super::targeting::{TargetSide, TargetStat};
use crate::battle::RoundWinner;
use crate::cards::Element;

/// Coarse classification of an effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectCategory {
    Buff,
    Debuff,
    Seal,
    /// Non-numeric effects (element shifts, forced outcomes, forecasts).
    Special,
}

/// What an effect does.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    /// Raise a stat by `amount`.
    Buff { stat: TargetStat, amount: i32 },

    /// Lower a stat by `amount`.
    Debuff { stat: TargetStat, amount: i32 },

    /// Block one ability, or every ability of the side when `None`.
    Seal { ability: Option<AbilityId> },

    /// The fielded card fights as `element`.
    ElementShift { element: Element },

    /// Elemental multipliers of the targeted side count as neutral.
    Neutralize,

    /// The next resolved round ends with `winner`, whatever the damage.
    ForcedOutcome { winner: RoundWinner },

    /// Forecast of round winners keyed by round index.
    Prediction { outcomes: OrdMap<usize, RoundWinner> },
}

/// A live effect in the registry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveEffect {
    pub kind: EffectKind,
    pub target_side: TargetSide,
    pub rounds_remaining: u32,
    /// Ability that produced this effect.
    pub source: AbilityId,
}

impl ActiveEffect {
    #[must_use]
    pub fn new(kind: EffectKind, target_side: TargetSide, rounds: u32, source: AbilityId) -> Self {
        Self {
            kind,
            target_side,
            rounds_remaining: rounds,
            source,
        }
    }

    /// Stat increase on one side.
    #[must_use]
    pub fn buff(
        target_side: TargetSide,
        stat: TargetStat,
        amount: i32,
        rounds: u32,
        source: AbilityId,
    ) -> Self {
        Self::new(
            EffectKind::Buff {
                stat,
                amount: amount.saturating_abs(),
            },
            target_side,
            rounds,
            source,
        )
    }

    /// Stat decrease on one side. `amount` is the size of the decrease.
    #[must_use]
    pub fn debuff(
        target_side: TargetSide,
        stat: TargetStat,
        amount: i32,
        rounds: u32,
        source: AbilityId,
    ) -> Self {
        Self::new(
            EffectKind::Debuff {
                stat,
                amount: amount.saturating_abs(),
            },
            target_side,
            rounds,
            source,
        )
    }

    /// Seal a single ability, or all of them with `None`.
    #[must_use]
    pub fn seal(
        target_side: TargetSide,
        ability: Option<AbilityId>,
        rounds: u32,
        source: AbilityId,
    ) -> Self {
        Self::new(EffectKind::Seal { ability }, target_side, rounds, source)
    }

    #[must_use]
    pub fn category(&self) -> EffectCategory {
        match self.kind {
            EffectKind::Buff { .. } => EffectCategory::Buff,
            EffectKind::Debuff { .. } => EffectCategory::Debuff,
            EffectKind::Seal { .. } => EffectCategory::Seal,
            EffectKind::ElementShift { .. }
            | EffectKind::Neutralize
            | EffectKind::ForcedOutcome { .. }
            | EffectKind::Prediction { .. } => EffectCategory::Special,
        }
    }

    /// The stat this effect targets, if it targets one.
    #[must_use]
    pub fn target_stat(&self) -> Option<TargetStat> {
        match self.kind {
            EffectKind::Buff { stat, .. } | EffectKind::Debuff { stat, .. } => Some(stat),
            EffectKind::Seal { .. } => Some(TargetStat::Ability),
            _ => None,
        }
    }

    /// Signed stat delta: positive for buffs, negative for debuffs, zero otherwise.
    ///
    /// The sign comes from the kind; a negative `amount` counts by its
    /// absolute value.
    #[must_use]
    pub fn magnitude(&self) -> i32 {
        let size = |amount: i32| i32::try_from(amount.unsigned_abs()).unwrap_or(i32::MAX);
        match self.kind {
            EffectKind::Buff { amount, .. } => size(amount),
            EffectKind::Debuff { amount, .. } => -size(amount),
            _ => 0,
        }
    }

    #[must_use]
    pub fn is_buff(&self) -> bool {
        self.category() == EffectCategory::Buff
    }

    #[must_use]
    pub fn is_debuff(&self) -> bool {
        self.category() == EffectCategory::Debuff
    }

    /// Check if this effect blocks `ability` for `side`.
    #[must_use]
    pub fn seals(&self, side: crate::core::Side, ability: AbilityId) -> bool {
        match self.kind {
            EffectKind::Seal { ability: sealed } => {
                self.rounds_remaining > 0
                    && self.target_side.matches(side)
                    && sealed.map_or(true, |a| a == ability)
            }
            _ => false,
        }
    }
}
