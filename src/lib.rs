//! # elemental-clash
//!
//! Battle engine for an elemental card duel between a player and a bot.
//!
//! ## Design Principles
//!
//! 1. **One Reducer**: Every change to `GameState` is a `GameAction`
//!    folded through `rules::reduce`. The reducer is pure and total, so
//!    any action sequence can be replayed on another peer.
//!
//! 2. **Values, Not Faults**: Stale ability invocations, rounds past the
//!    end and unknown actions are no-ops. Only genuine I/O and parsing
//!    failures are errors.
//!
//! 3. **Closed Content Sets**: Elements, abilities and effect kinds are
//!    enums matched exhaustively.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: `im` vectors and maps make each new
//!   state share structure with the previous one.
//!
//! - **Deterministic Randomness**: the RNG position lives in the state, so
//!   randomized abilities replay identically.
//!
//! ## Modules
//!
//! - `cards`: Card definitions, attributes, and the catalog
//! - `battle`: Elemental advantage, damage, and round resolution
//! - `effects`: Active effects, the effect registry, and the ability interpreter
//! - `core`: Sides, RNG, state, actions, and the store
//! - `rules`: The reducer
//! - `net`: Reconnecting message channel and peer synchronization

pub mod battle;
pub mod cards;
pub mod core;
pub mod effects;
pub mod net;
pub mod rules;

// Re-export commonly used types
pub use crate::core::{
    abilities_of, ActionOrigin, ActionRecord, BattleSummary, Difficulty, GameAction, GameRng,
    GameRngState, GameState, GameStore, Side, SidePair, UsedAbility,
};

pub use crate::cards::{Card, CardCatalog, CardClass, CardId, CatalogError, Element, Race, Stats};

pub use crate::battle::{
    advantage, calculate, resolve_matchup, resolve_round, Advantage, Damage, RoundPhase,
    RoundResult, RoundWinner,
};

pub use crate::effects::{
    AbilityId, AbilityState, ActiveEffect, EffectCategory, EffectKind, EffectRegistry, Rejection,
    TargetSide, TargetStat,
};

pub use crate::rules::{reduce, replay};

pub use crate::net::{
    ChannelConfig, ChannelError, ChannelStatus, Delivery, GameMessage, Link, MemoryHub,
    ReconnectingChannel, SyncError, SyncSession, Transport, TransportError,
};
