//! Active effects and abilities.
//!
//! - `ActiveEffect`: a temporary, expiring modifier as a tagged union
//! - `TargetSide` / `TargetStat`: who and what an effect reaches
//! - `EffectRegistry`: the list of live effects, applied to cards on demand
//! - `AbilityId`: the closed set of one-time abilities
//! - `invoke`: the ability interpreter
//!
//! Effects age at the end of each resolved round. An effect added with
//! `n` rounds remaining applies to exactly the next `n` resolved rounds.

mod ability;
mod effect;
mod interpreter;
mod registry;
mod targeting;

pub use ability::{AbilityId, AbilityState};
pub use effect::{ActiveEffect, EffectCategory, EffectKind};
pub use interpreter::{invoke, Rejection, FORESIGHT_ROUNDS};
pub use registry::EffectRegistry;
pub use targeting::{TargetSide, TargetStat};
