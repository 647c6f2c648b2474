//! Ability identifiers and per-side usage state.
//!
//! Abilities are hand-authored game content. `AbilityId` is a closed
//! enumeration; the interpreter matches it exhaustively, so adding a
//! variant without defining its behavior fails to compile.

use serde::{Deserialize, Serialize};

/// Every ability a card can grant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbilityId {
    // === Self buffs ===
    Rally,
    IronSkin,
    Fortify,
    BattleCry,
    Berserk,
    Bulwark,
    Vitality,
    Empower,
    Focus,
    Heroism,
    SecondWind,

    // === Opponent debuffs ===
    Weaken,
    Sunder,
    Shatter,
    Intimidate,
    Curse,
    Hex,
    Poison,
    Exhaust,
    Blind,

    // === Seals ===
    Silence,
    Nullify,
    Lockdown,

    // === Both sides ===
    Sandstorm,
    Blizzard,
    Eclipse,
    Sanctuary,
    WarDrums,

    // === Elements ===
    Ignite,
    FrostForm,
    StoneForm,
    Attune,
    Neutralize,
    Amplify,

    // === Conditional ===
    DragonFury,
    TidalSurge,
    PackTactics,
    HolyLight,
    ShadowStep,
    ArcaneSurge,

    // === Effect manipulation ===
    Cleanse,
    Dispel,
    Purge,
    Prolong,
    Steal,
    Mirror,
    Reversal,

    // === One-shot state changes ===
    Switcheroo,
    Destiny,
    Stalemate,
    Foresight,
    Gamble,
    Chaos,
}

impl AbilityId {
    /// All abilities, in declaration order.
    pub const ALL: [AbilityId; 53] = [
        AbilityId::Rally,
        AbilityId::IronSkin,
        AbilityId::Fortify,
        AbilityId::BattleCry,
        AbilityId::Berserk,
        AbilityId::Bulwark,
        AbilityId::Vitality,
        AbilityId::Empower,
        AbilityId::Focus,
        AbilityId::Heroism,
        AbilityId::SecondWind,
        AbilityId::Weaken,
        AbilityId::Sunder,
        AbilityId::Shatter,
        AbilityId::Intimidate,
        AbilityId::Curse,
        AbilityId::Hex,
        AbilityId::Poison,
        AbilityId::Exhaust,
        AbilityId::Blind,
        AbilityId::Silence,
        AbilityId::Nullify,
        AbilityId::Lockdown,
        AbilityId::Sandstorm,
        AbilityId::Blizzard,
        AbilityId::Eclipse,
        AbilityId::Sanctuary,
        AbilityId::WarDrums,
        AbilityId::Ignite,
        AbilityId::FrostForm,
        AbilityId::StoneForm,
        AbilityId::Attune,
        AbilityId::Neutralize,
        AbilityId::Amplify,
        AbilityId::DragonFury,
        AbilityId::TidalSurge,
        AbilityId::PackTactics,
        AbilityId::HolyLight,
        AbilityId::ShadowStep,
        AbilityId::ArcaneSurge,
        AbilityId::Cleanse,
        AbilityId::Dispel,
        AbilityId::Purge,
        AbilityId::Prolong,
        AbilityId::Steal,
        AbilityId::Mirror,
        AbilityId::Reversal,
        AbilityId::Switcheroo,
        AbilityId::Destiny,
        AbilityId::Stalemate,
        AbilityId::Foresight,
        AbilityId::Gamble,
        AbilityId::Chaos,
    ];

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            AbilityId::Rally => "Rally",
            AbilityId::IronSkin => "Iron Skin",
            AbilityId::Fortify => "Fortify",
            AbilityId::BattleCry => "Battle Cry",
            AbilityId::Berserk => "Berserk",
            AbilityId::Bulwark => "Bulwark",
            AbilityId::Vitality => "Vitality",
            AbilityId::Empower => "Empower",
            AbilityId::Focus => "Focus",
            AbilityId::Heroism => "Heroism",
            AbilityId::SecondWind => "Second Wind",
            AbilityId::Weaken => "Weaken",
            AbilityId::Sunder => "Sunder",
            AbilityId::Shatter => "Shatter",
            AbilityId::Intimidate => "Intimidate",
            AbilityId::Curse => "Curse",
            AbilityId::Hex => "Hex",
            AbilityId::Poison => "Poison",
            AbilityId::Exhaust => "Exhaust",
            AbilityId::Blind => "Blind",
            AbilityId::Silence => "Silence",
            AbilityId::Nullify => "Nullify",
            AbilityId::Lockdown => "Lockdown",
            AbilityId::Sandstorm => "Sandstorm",
            AbilityId::Blizzard => "Blizzard",
            AbilityId::Eclipse => "Eclipse",
            AbilityId::Sanctuary => "Sanctuary",
            AbilityId::WarDrums => "War Drums",
            AbilityId::Ignite => "Ignite",
            AbilityId::FrostForm => "Frost Form",
            AbilityId::StoneForm => "Stone Form",
            AbilityId::Attune => "Attune",
            AbilityId::Neutralize => "Neutralize",
            AbilityId::Amplify => "Amplify",
            AbilityId::DragonFury => "Dragon Fury",
            AbilityId::TidalSurge => "Tidal Surge",
            AbilityId::PackTactics => "Pack Tactics",
            AbilityId::HolyLight => "Holy Light",
            AbilityId::ShadowStep => "Shadow Step",
            AbilityId::ArcaneSurge => "Arcane Surge",
            AbilityId::Cleanse => "Cleanse",
            AbilityId::Dispel => "Dispel",
            AbilityId::Purge => "Purge",
            AbilityId::Prolong => "Prolong",
            AbilityId::Steal => "Steal",
            AbilityId::Mirror => "Mirror",
            AbilityId::Reversal => "Reversal",
            AbilityId::Switcheroo => "Switcheroo",
            AbilityId::Destiny => "Destiny",
            AbilityId::Stalemate => "Stalemate",
            AbilityId::Foresight => "Foresight",
            AbilityId::Gamble => "Gamble",
            AbilityId::Chaos => "Chaos",
        }
    }
}

impl std::fmt::Display for AbilityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// An ability owned by a side, and whether it has been spent this game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AbilityState {
    pub ability: AbilityId,
    pub used: bool,
}

impl AbilityState {
    #[must_use]
    pub const fn new(ability: AbilityId) -> Self {
        Self {
            ability,
            used: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;

    #[test]
    fn test_all_is_distinct() {
        let unique: FxHashSet<_> = AbilityId::ALL.iter().collect();
        assert_eq!(unique.len(), AbilityId::ALL.len());
    }

    #[test]
    fn test_names_are_distinct() {
        let names: FxHashSet<_> = AbilityId::ALL.iter().map(|a| a.name()).collect();
        assert_eq!(names.len(), AbilityId::ALL.len());
    }

    #[test]
    fn test_serialized_form() {
        assert_eq!(
            serde_json::to_string(&AbilityId::WarDrums).unwrap(),
            "\"war_drums\""
        );
        let parsed: AbilityId = serde_json::from_str("\"second_wind\"").unwrap();
        assert_eq!(parsed, AbilityId::SecondWind);
    }

    #[test]
    fn test_ability_state_starts_unused() {
        assert!(!AbilityState::new(AbilityId::Hex).used);
    }
}
