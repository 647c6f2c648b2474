//! Ability interpreter.
//!
//! `invoke` turns an ability into concrete effects and one-shot state
//! changes. Each ability is an explicit match arm; there is no formula
//! relating an identifier to its behavior.
//!
//! ## Rejections
//!
//! An invocation is refused, leaving the state untouched, when:
//! - no round is pending (no battle, or the game is over)
//! - the side does not own the ability
//! - the side already used it this game
//! - a live seal blocks it
//!
//! Rejections are expected (duplicated or replayed remote messages), so
//! they are values, not errors.

use smallvec::{smallvec, SmallVec};
use tracing::debug;

use super::ability::AbilityId;
use super::effect::{ActiveEffect, EffectKind};
use super::targeting::{TargetSide, TargetStat};
use crate::battle::{advantage, counter_of, resolve_matchup, Advantage, RoundWinner};
use crate::cards::{Card, CardClass, Element, Race};
use crate::core::{GameRng, GameState, Side, UsedAbility};

/// Why an invocation was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    /// No round is pending.
    NoBattle,
    NotOwned,
    AlreadyUsed,
    Sealed,
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejection::NoBattle => f.write_str("no round pending"),
            Rejection::NotOwned => f.write_str("ability not owned"),
            Rejection::AlreadyUsed => f.write_str("ability already used"),
            Rejection::Sealed => f.write_str("ability sealed"),
        }
    }
}

/// Rounds a Foresight forecast covers.
pub const FORESIGHT_ROUNDS: usize = 3;

/// Per-invocation view of the battle.
struct Context<'a> {
    state: &'a GameState,
    ability: AbilityId,
    side: Side,
    own: TargetSide,
    opp: TargetSide,
    own_card: &'a Card,
    opp_card: &'a Card,
}

impl Context<'_> {
    fn effect(&self, target: TargetSide, kind: EffectKind, rounds: u32) -> ActiveEffect {
        ActiveEffect::new(kind, target, rounds, self.ability)
    }

    fn buff(&self, target: TargetSide, stat: TargetStat, amount: i32, rounds: u32) -> ActiveEffect {
        ActiveEffect::buff(target, stat, amount, rounds, self.ability)
    }

    fn debuff(&self, target: TargetSide, stat: TargetStat, amount: i32, rounds: u32) -> ActiveEffect {
        ActiveEffect::debuff(target, stat, amount, rounds, self.ability)
    }

    fn shift(&self, element: Element) -> ActiveEffect {
        self.effect(self.own, EffectKind::ElementShift { element }, 1)
    }

    /// Element a side's card currently fights as.
    fn effective_element(&self, side: Side, card: &Card) -> Element {
        self.state
            .active_effects
            .element_shift(side)
            .unwrap_or(card.element)
    }
}

/// Invoke `ability` for `side`, returning the next state.
pub fn invoke(state: &GameState, side: Side, ability: AbilityId) -> Result<GameState, Rejection> {
    let cards = state.current_cards().ok_or(Rejection::NoBattle)?;
    if !state.owns(side, ability) {
        return Err(Rejection::NotOwned);
    }
    if state.has_used(side, ability) {
        return Err(Rejection::AlreadyUsed);
    }
    if state.is_sealed(side, ability) {
        return Err(Rejection::Sealed);
    }

    let ctx = Context {
        state,
        ability,
        side,
        own: TargetSide::only(side),
        opp: TargetSide::only(side.opponent()),
        own_card: cards[side],
        opp_card: cards[side.opponent()],
    };

    let mut next = state.clone();
    mark_used(&mut next, side, ability);
    apply(&ctx, &mut next);

    debug!(%side, %ability, effects = next.active_effects.len(), "ability invoked");
    Ok(next)
}

fn mark_used(next: &mut GameState, side: Side, ability: AbilityId) {
    let abilities = match side {
        Side::Player => &mut next.player_abilities,
        Side::Bot => &mut next.bot_abilities,
    };
    for state in abilities.iter_mut() {
        if state.ability == ability {
            state.used = true;
        }
    }
    next.used_abilities.push_back(UsedAbility { side, ability });
}

fn apply(ctx: &Context<'_>, next: &mut GameState) {
    use AbilityId as A;
    use TargetStat::{All, Attack, Defense, Hp};

    let own = ctx.own;
    let opp = ctx.opp;
    let side = ctx.side;

    let added: SmallVec<[ActiveEffect; 2]> = match ctx.ability {
        // === Self buffs ===
        A::Rally => smallvec![ctx.buff(own, Attack, 3, 2)],
        A::IronSkin => smallvec![ctx.buff(own, Defense, 4, 2)],
        A::Fortify => smallvec![ctx.buff(own, Defense, 6, 1)],
        A::BattleCry => smallvec![ctx.buff(own, Attack, 5, 1)],
        A::Berserk => smallvec![ctx.buff(own, Attack, 8, 1), ctx.debuff(own, Defense, 4, 1)],
        A::Bulwark => smallvec![ctx.buff(own, Defense, 10, 1), ctx.debuff(own, Attack, 5, 1)],
        A::Vitality => smallvec![ctx.buff(own, Hp, 10, 3)],
        A::Empower => smallvec![ctx.buff(own, All, 2, 3)],
        A::Focus => smallvec![ctx.buff(own, Attack, 3, 1), ctx.buff(own, Defense, 3, 1)],
        A::Heroism => smallvec![ctx.buff(own, All, 4, 1)],
        A::SecondWind => {
            next.active_effects = next.active_effects.retain(|e| {
                !(e.is_debuff() && e.target_side.is_exactly(side) && e.target_stat() == Some(Hp))
            });
            smallvec![ctx.buff(own, Defense, 3, 2)]
        }

        // === Opponent debuffs ===
        A::Weaken => smallvec![ctx.debuff(opp, Attack, 3, 2)],
        A::Sunder => smallvec![ctx.debuff(opp, Defense, 4, 2)],
        A::Shatter => smallvec![ctx.debuff(opp, Defense, 8, 1)],
        A::Intimidate => smallvec![ctx.debuff(opp, Attack, 5, 1)],
        A::Curse => smallvec![ctx.debuff(opp, All, 2, 3)],
        A::Hex => smallvec![ctx.debuff(opp, All, 4, 1)],
        A::Poison => smallvec![ctx.debuff(opp, Hp, 5, 3)],
        A::Exhaust => smallvec![ctx.debuff(opp, Attack, 2, 2), ctx.debuff(opp, Defense, 2, 2)],
        A::Blind => smallvec![ctx.debuff(opp, Attack, 6, 1)],

        // === Seals ===
        A::Silence => smallvec![ActiveEffect::seal(opp, None, 2, ctx.ability)],
        A::Nullify => match ctx.opp_card.ability {
            Some(target) => smallvec![ActiveEffect::seal(opp, Some(target), 3, ctx.ability)],
            None => SmallVec::new(),
        },
        A::Lockdown => smallvec![ActiveEffect::seal(TargetSide::All, None, 1, ctx.ability)],

        // === Both sides ===
        A::Sandstorm => smallvec![ctx.debuff(TargetSide::All, Attack, 3, 2)],
        A::Blizzard => smallvec![ctx.debuff(TargetSide::All, Defense, 3, 2)],
        A::Eclipse => smallvec![ctx.debuff(TargetSide::All, All, 2, 1)],
        A::Sanctuary => smallvec![ctx.buff(TargetSide::All, Defense, 5, 2)],
        A::WarDrums => smallvec![ctx.buff(TargetSide::All, Attack, 3, 2)],

        // === Elements ===
        A::Ignite => smallvec![ctx.shift(Element::Fire)],
        A::FrostForm => smallvec![ctx.shift(Element::Ice)],
        A::StoneForm => smallvec![ctx.shift(Element::Earth)],
        A::Attune => {
            let theirs = ctx.effective_element(side.opponent(), ctx.opp_card);
            match counter_of(theirs) {
                Some(element) => smallvec![ctx.shift(element)],
                None => SmallVec::new(),
            }
        }
        A::Neutralize => smallvec![ctx.effect(TargetSide::All, EffectKind::Neutralize, 2)],
        A::Amplify => {
            let ours = ctx.effective_element(side, ctx.own_card);
            let theirs = ctx.effective_element(side.opponent(), ctx.opp_card);
            let amount = if advantage(ours, theirs) == Advantage::Strong { 4 } else { 1 };
            smallvec![ctx.buff(own, Attack, amount, 1)]
        }

        // === Conditional ===
        A::DragonFury => {
            let amount = if ctx.own_card.race == Race::Dragon { 8 } else { 3 };
            smallvec![ctx.buff(own, Attack, amount, 1)]
        }
        A::TidalSurge => {
            let amount = if ctx.own_card.element == Element::Water { 6 } else { 2 };
            smallvec![ctx.buff(own, Attack, amount, 1)]
        }
        A::PackTactics => {
            let beasts = ctx
                .state
                .deck(side)
                .iter()
                .skip(ctx.state.current_round)
                .filter(|c| c.race == Race::Beast)
                .count() as i32;
            let amount = (beasts * 2).min(8);
            if amount > 0 {
                smallvec![ctx.buff(own, Attack, amount, 1)]
            } else {
                SmallVec::new()
            }
        }
        A::HolyLight => {
            if ctx.own_card.class.is_holy() {
                next.active_effects = next
                    .active_effects
                    .retain(|e| !(e.is_debuff() && e.target_side.is_exactly(side)));
                smallvec![ctx.buff(own, Defense, 5, 2)]
            } else {
                smallvec![ctx.buff(own, Defense, 2, 2)]
            }
        }
        A::ShadowStep => {
            let amount = if ctx.own_card.class == CardClass::Rogue { 6 } else { 3 };
            smallvec![ctx.debuff(opp, Defense, amount, 1)]
        }
        A::ArcaneSurge => {
            let amount = if ctx.own_card.class == CardClass::Mage { 7 } else { 3 };
            smallvec![ctx.buff(own, Attack, amount, 1)]
        }

        // === Effect manipulation ===
        A::Cleanse => {
            next.active_effects = next
                .active_effects
                .retain(|e| !(e.is_debuff() && e.target_side.is_exactly(side)));
            SmallVec::new()
        }
        A::Dispel => {
            let foe = side.opponent();
            next.active_effects = next
                .active_effects
                .retain(|e| !(e.is_buff() && e.target_side.is_exactly(foe)));
            SmallVec::new()
        }
        A::Purge => {
            next.active_effects = next.active_effects.retain(|_| false);
            SmallVec::new()
        }
        A::Prolong => {
            next.active_effects = next.active_effects.map(|e| {
                if e.is_buff() && e.target_side.is_exactly(side) {
                    ActiveEffect {
                        rounds_remaining: e.rounds_remaining.saturating_add(1),
                        ..e.clone()
                    }
                } else {
                    e.clone()
                }
            });
            SmallVec::new()
        }
        A::Steal => {
            let foe = side.opponent();
            next.active_effects = next.active_effects.map(|e| {
                if e.is_buff() && e.target_side.is_exactly(foe) {
                    ActiveEffect {
                        target_side: own,
                        ..e.clone()
                    }
                } else {
                    e.clone()
                }
            });
            SmallVec::new()
        }
        A::Mirror => {
            let foe = side.opponent();
            let copies: Vec<ActiveEffect> = ctx
                .state
                .active_effects
                .iter()
                .filter(|e| e.is_buff() && e.target_side.is_exactly(foe))
                .map(|e| ActiveEffect {
                    target_side: own,
                    source: ctx.ability,
                    ..e.clone()
                })
                .collect();
            next.active_effects = next.active_effects.with_all(copies);
            SmallVec::new()
        }
        A::Reversal => {
            let foe = side.opponent();
            next.active_effects = next.active_effects.map(|e| match e.kind {
                EffectKind::Buff { stat, amount } if e.target_side.is_exactly(foe) => ActiveEffect {
                    kind: EffectKind::Debuff { stat, amount },
                    ..e.clone()
                },
                _ => e.clone(),
            });
            SmallVec::new()
        }

        // === One-shot state changes ===
        A::Switcheroo => {
            swap_with_next(next, side);
            SmallVec::new()
        }
        A::Destiny => smallvec![ctx.effect(
            own,
            EffectKind::ForcedOutcome {
                winner: RoundWinner::side(side)
            },
            1
        )],
        A::Stalemate => smallvec![ctx.effect(
            TargetSide::All,
            EffectKind::ForcedOutcome {
                winner: RoundWinner::Draw
            },
            1
        )],
        A::Foresight => {
            let state = ctx.state;
            let end = (state.current_round + FORESIGHT_ROUNDS).min(state.total_rounds);
            let outcomes = (state.current_round..end)
                .filter_map(|round| {
                    let player = state.player_deck.get(round)?;
                    let bot = state.bot_deck.get(round)?;
                    Some((round, resolve_matchup(round, player, bot, &state.active_effects).winner))
                })
                .collect();
            smallvec![ctx.effect(
                own,
                EffectKind::Prediction { outcomes },
                FORESIGHT_ROUNDS as u32
            )]
        }
        A::Gamble => {
            let mut rng = GameRng::from_state(&next.rng);
            let effect = if rng.gen_bool(0.5) {
                ctx.buff(own, Attack, 10, 1)
            } else {
                ctx.debuff(own, Attack, 5, 1)
            };
            next.rng = rng.state();
            smallvec![effect]
        }
        A::Chaos => {
            let mut rng = GameRng::from_state(&next.rng);
            let stat = *rng.choose(&[Attack, Defense]).unwrap_or(&Attack);
            let amount = rng.gen_range(1..7);
            next.rng = rng.state();
            smallvec![ctx.buff(own, stat, amount, 1), ctx.debuff(opp, stat, amount, 1)]
        }
    };

    next.active_effects = next.active_effects.with_all(added);
}

/// Swap `side`'s current card with the following one, if there is one.
fn swap_with_next(next: &mut GameState, side: Side) {
    let round = next.current_round;
    let deck = match side {
        Side::Player => &mut next.player_deck,
        Side::Bot => &mut next.bot_deck,
    };
    if round + 1 < deck.len() {
        deck.swap(round, round + 1);
    }
}
