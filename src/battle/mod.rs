//! Battle resolution: elemental advantage, damage, and rounds.
//!
//! Everything here is pure and synchronous. The reducer in `rules`
//! calls `resolve_round` and folds the result into the game state.

pub mod advantage;
pub mod damage;
pub mod round;

pub use advantage::{advantage, counter_of, dominates, Advantage};
pub use damage::{base_damage, calculate, calculate_with, scale, Damage};
pub use round::{compare, resolve_matchup, resolve_round, RoundPhase, RoundResult, RoundWinner};
