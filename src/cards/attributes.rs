//! Categorical card attributes.
//!
//! Every card carries one `Element`, one `Race` and one `CardClass`.
//! Elements drive the advantage cycle; race and class are consulted by
//! a handful of conditional abilities.

use serde::{Deserialize, Serialize};

/// Elemental affinity of a card.
///
/// Only `Fire`, `Ice` and `Earth` take part in the dominance cycle.
/// The remaining elements are neutral against everything.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Fire,
    Ice,
    Earth,
    Water,
    Lightning,
    Wind,
}

impl Element {
    /// All elements, in declaration order.
    pub const ALL: [Element; 6] = [
        Element::Fire,
        Element::Ice,
        Element::Earth,
        Element::Water,
        Element::Lightning,
        Element::Wind,
    ];

    /// Lowercase name, matching the serialized form.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Element::Fire => "fire",
            Element::Ice => "ice",
            Element::Earth => "earth",
            Element::Water => "water",
            Element::Lightning => "lightning",
            Element::Wind => "wind",
        }
    }
}

impl std::fmt::Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Race of a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Race {
    Human,
    Elf,
    Dwarf,
    Orc,
    Undead,
    Dragon,
    Beast,
    Elemental,
    Demon,
    Angel,
}

/// Class of a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardClass {
    Warrior,
    Mage,
    Rogue,
    Cleric,
    Ranger,
    Paladin,
    Necromancer,
    Druid,
}

impl CardClass {
    /// Classes that channel holy power.
    #[must_use]
    pub const fn is_holy(self) -> bool {
        matches!(self, CardClass::Cleric | CardClass::Paladin)
    }
}
