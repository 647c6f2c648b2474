//! Effect targeting.
//!
//! Effects select *what* they touch along two axes:
//! - `TargetSide`: which side's fielded card (or both)
//! - `TargetStat`: which stat, or the side's abilities

use serde::{Deserialize, Serialize};

use crate::core::Side;

/// The side(s) an effect applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetSide {
    Player,
    Bot,
    /// Both sides.
    All,
}

impl TargetSide {
    /// Target exactly one side.
    #[must_use]
    pub const fn only(side: Side) -> Self {
        match side {
            Side::Player => TargetSide::Player,
            Side::Bot => TargetSide::Bot,
        }
    }

    /// Check whether an effect with this target reaches `side`.
    #[must_use]
    pub const fn matches(self, side: Side) -> bool {
        matches!(
            (self, side),
            (TargetSide::All, _) | (TargetSide::Player, Side::Player) | (TargetSide::Bot, Side::Bot)
        )
    }

    /// Check whether this target is exactly `side` (not `All`).
    #[must_use]
    pub const fn is_exactly(self, side: Side) -> bool {
        matches!(
            (self, side),
            (TargetSide::Player, Side::Player) | (TargetSide::Bot, Side::Bot)
        )
    }
}

/// The stat an effect modifies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetStat {
    Attack,
    Defense,
    Hp,
    /// Attack, defense and hp at once.
    All,
    /// Not numeric: the side's abilities (seals).
    Ability,
}

impl TargetStat {
    /// Check whether a modifier on this stat reaches `stat`.
    ///
    /// `stat` must be one of the numeric stats.
    #[must_use]
    pub const fn covers(self, stat: TargetStat) -> bool {
        match self {
            TargetStat::All => !matches!(stat, TargetStat::Ability),
            TargetStat::Attack => matches!(stat, TargetStat::Attack),
            TargetStat::Defense => matches!(stat, TargetStat::Defense),
            TargetStat::Hp => matches!(stat, TargetStat::Hp),
            TargetStat::Ability => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_side_matches() {
        assert!(TargetSide::Player.matches(Side::Player));
        assert!(!TargetSide::Player.matches(Side::Bot));
        assert!(TargetSide::All.matches(Side::Player));
        assert!(TargetSide::All.matches(Side::Bot));
        assert_eq!(TargetSide::only(Side::Bot), TargetSide::Bot);
    }

    #[test]
    fn test_is_exactly_excludes_all() {
        assert!(TargetSide::Bot.is_exactly(Side::Bot));
        assert!(!TargetSide::All.is_exactly(Side::Bot));
    }

    #[test]
    fn test_stat_coverage() {
        assert!(TargetStat::All.covers(TargetStat::Attack));
        assert!(TargetStat::All.covers(TargetStat::Hp));
        assert!(!TargetStat::All.covers(TargetStat::Ability));
        assert!(TargetStat::Defense.covers(TargetStat::Defense));
        assert!(!TargetStat::Defense.covers(TargetStat::Attack));
        assert!(!TargetStat::Ability.covers(TargetStat::Ability));
    }
}
