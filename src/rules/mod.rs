//! Game rules: the single reducer every state transition flows through.

mod reducer;

pub use reducer::{reduce, replay};
