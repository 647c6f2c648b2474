//! Core game types: sides, RNG, state, actions, and the store.
//!
//! The state is a plain value built from persistent collections.
//! `GameAction` is the only way to change it, through `rules::reduce`,
//! and `GameStore` keeps the current snapshot plus the action log.

pub mod action;
pub mod rng;
pub mod side;
pub mod state;
pub mod store;

pub use action::{ActionOrigin, ActionRecord, GameAction};
pub use rng::{GameRng, GameRngState};
pub use side::{Side, SidePair};
pub use state::{abilities_of, BattleSummary, Difficulty, GameState, UsedAbility};
pub use store::GameStore;
