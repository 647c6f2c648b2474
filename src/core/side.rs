//! Battle sides and per-side data storage.
//!
//! ## Side
//!
//! A battle always has exactly two sides: the local `Player` and the
//! opposing `Bot` (which may be a remote peer).
//!
//! ## SidePair
//!
//! Fixed two-slot storage indexed by `Side`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One of the two sides of a battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Player,
    Bot,
}

impl Side {
    /// Both sides, player first.
    pub const BOTH: [Side; 2] = [Side::Player, Side::Bot];

    /// The other side.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Side::Player => Side::Bot,
            Side::Bot => Side::Player,
        }
    }

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Side::Player => 0,
            Side::Bot => 1,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Player => f.write_str("player"),
            Side::Bot => f.write_str("bot"),
        }
    }
}

/// Per-side data storage.
///
/// ## Example
///
/// ```
/// use elemental_clash::core::{Side, SidePair};
///
/// let mut score: SidePair<u32> = SidePair::default();
/// score[Side::Bot] += 1;
///
/// assert_eq!(score[Side::Player], 0);
/// assert_eq!(score[Side::Bot], 1);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SidePair<T> {
    pub player: T,
    pub bot: T,
}

impl<T> SidePair<T> {
    #[must_use]
    pub const fn new(player: T, bot: T) -> Self {
        Self { player, bot }
    }

    /// Build both entries from a factory.
    pub fn from_fn(mut factory: impl FnMut(Side) -> T) -> Self {
        Self {
            player: factory(Side::Player),
            bot: factory(Side::Bot),
        }
    }

    /// Map both entries.
    pub fn map<U>(self, mut f: impl FnMut(Side, T) -> U) -> SidePair<U> {
        SidePair {
            player: f(Side::Player, self.player),
            bot: f(Side::Bot, self.bot),
        }
    }

    /// Iterate `(side, value)` pairs, player first.
    pub fn iter(&self) -> impl Iterator<Item = (Side, &T)> {
        [(Side::Player, &self.player), (Side::Bot, &self.bot)].into_iter()
    }
}

impl<T> Index<Side> for SidePair<T> {
    type Output = T;

    fn index(&self, side: Side) -> &T {
        match side {
            Side::Player => &self.player,
            Side::Bot => &self.bot,
        }
    }
}

impl<T> IndexMut<Side> for SidePair<T> {
    fn index_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::Player => &mut self.player,
            Side::Bot => &mut self.bot,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opponent() {
        assert_eq!(Side::Player.opponent(), Side::Bot);
        assert_eq!(Side::Bot.opponent(), Side::Player);
        assert_eq!(Side::Player.opponent().opponent(), Side::Player);
    }

    #[test]
    fn test_side_pair_index() {
        let mut pair = SidePair::new(1, 2);
        pair[Side::Player] += 10;

        assert_eq!(pair[Side::Player], 11);
        assert_eq!(pair[Side::Bot], 2);
    }

    #[test]
    fn test_side_pair_from_fn_and_map() {
        let pair = SidePair::from_fn(|side| side.index() * 10);
        let doubled = pair.map(|_, v| v * 2);

        assert_eq!(doubled, SidePair::new(0, 20));
        let collected: Vec<_> = doubled.iter().map(|(s, v)| (s, *v)).collect();
        assert_eq!(collected, vec![(Side::Player, 0), (Side::Bot, 20)]);
    }

    #[test]
    fn test_side_serialization() {
        assert_eq!(serde_json::to_string(&Side::Bot).unwrap(), "\"bot\"");
    }
}
