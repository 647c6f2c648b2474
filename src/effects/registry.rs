//! Active effect registry.
//!
//! `EffectRegistry` is the list of live effects held by the game state.
//! It is backed by `im::Vector`, so every operation returns a new
//! registry sharing structure with the old one; the reducer never
//! mutates a registry that a previous state still references.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::ability::AbilityId;
use super::effect::{ActiveEffect, EffectKind};
use super::targeting::TargetStat;
use crate::battle::RoundWinner;
use crate::cards::Card;
use crate::core::Side;

/// Ordered list of live effects.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EffectRegistry {
    effects: Vector<ActiveEffect>,
}

impl EffectRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.effects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActiveEffect> {
        self.effects.iter()
    }

    /// Effects reaching `side` (including `All`-side effects).
    pub fn for_side(&self, side: Side) -> impl Iterator<Item = &ActiveEffect> {
        self.effects
            .iter()
            .filter(move |e| e.rounds_remaining > 0 && e.target_side.matches(side))
    }

    /// Registry with `effect` appended.
    ///
    /// Effects with no rounds remaining are discarded immediately.
    #[must_use]
    pub fn with(&self, effect: ActiveEffect) -> Self {
        let mut effects = self.effects.clone();
        if effect.rounds_remaining > 0 {
            effects.push_back(effect);
        }
        Self { effects }
    }

    /// Registry with all `effects` appended.
    #[must_use]
    pub fn with_all(&self, effects: impl IntoIterator<Item = ActiveEffect>) -> Self {
        effects.into_iter().fold(self.clone(), |reg, e| reg.with(e))
    }

    /// Registry keeping only effects matching `keep`.
    #[must_use]
    pub fn retain(&self, keep: impl Fn(&ActiveEffect) -> bool) -> Self {
        Self {
            effects: self.effects.iter().filter(|e| keep(e)).cloned().collect(),
        }
    }

    /// Registry with every effect passed through `f`.
    #[must_use]
    pub fn map(&self, f: impl Fn(&ActiveEffect) -> ActiveEffect) -> Self {
        Self {
            effects: self.effects.iter().map(f).collect(),
        }
    }

    /// Age every effect by one round, dropping those that expire.
    #[must_use]
    pub fn aged(&self) -> Self {
        Self {
            effects: self
                .effects
                .iter()
                .filter(|e| e.rounds_remaining > 1)
                .map(|e| ActiveEffect {
                    rounds_remaining: e.rounds_remaining - 1,
                    ..e.clone()
                })
                .collect(),
        }
    }

    /// Net modifier on `stat` for `side`.
    ///
    /// `stat` must be numeric; `All`-stat effects contribute to each.
    #[must_use]
    pub fn stat_delta(&self, side: Side, stat: TargetStat) -> i32 {
        self.for_side(side)
            .filter(|e| e.target_stat().is_some_and(|s| s.covers(stat)))
            .map(ActiveEffect::magnitude)
            .fold(0, i32::saturating_add)
    }

    /// Derived copy of `card` as fielded by `side`.
    ///
    /// Attack, defense and hp are the catalog value plus the stacked
    /// modifiers, clamped at zero. The most recent element shift, if
    /// any, replaces the card's element. The input card is untouched.
    #[must_use]
    pub fn apply(&self, card: &Card, side: Side) -> Card {
        let mut fielded = card.clone();
        let adjusted = |base: i32, stat: TargetStat| {
            base.saturating_add(self.stat_delta(side, stat)).max(0)
        };
        fielded.stats.attack = adjusted(card.stats.attack, TargetStat::Attack);
        fielded.stats.defense = adjusted(card.stats.defense, TargetStat::Defense);
        fielded.stats.hp = adjusted(card.stats.hp, TargetStat::Hp);

        if let Some(element) = self.element_shift(side) {
            fielded.element = element;
        }
        fielded
    }

    /// Latest element shift reaching `side`.
    #[must_use]
    pub fn element_shift(&self, side: Side) -> Option<crate::cards::Element> {
        self.for_side(side)
            .filter_map(|e| match e.kind {
                EffectKind::ElementShift { element } => Some(element),
                _ => None,
            })
            .last()
    }

    /// Check whether `side`'s elemental multiplier is suppressed.
    #[must_use]
    pub fn is_neutralized(&self, side: Side) -> bool {
        self.for_side(side)
            .any(|e| matches!(e.kind, EffectKind::Neutralize))
    }

    /// Check whether `ability` is sealed for `side`.
    #[must_use]
    pub fn is_sealed(&self, side: Side, ability: AbilityId) -> bool {
        self.effects.iter().any(|e| e.seals(side, ability))
    }

    /// Outcome forced on the next round, if any. The latest one wins.
    #[must_use]
    pub fn forced_outcome(&self) -> Option<RoundWinner> {
        self.effects
            .iter()
            .filter(|e| e.rounds_remaining > 0)
            .filter_map(|e| match e.kind {
                EffectKind::ForcedOutcome { winner } => Some(winner),
                _ => None,
            })
            .last()
    }
}

impl FromIterator<ActiveEffect> for EffectRegistry {
    fn from_iter<I: IntoIterator<Item = ActiveEffect>>(iter: I) -> Self {
        EffectRegistry::new().with_all(iter)
    }
}
