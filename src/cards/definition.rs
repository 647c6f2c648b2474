//! Card definitions - immutable card data.
//!
//! A `Card` is drawn from the catalog and never mutated in place.
//! Effects produce a *derived copy* with adjusted stats (see
//! `EffectRegistry::apply`), so the catalog value is always available
//! for the next round.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::attributes::{CardClass, Element, Race};
use crate::effects::AbilityId;

/// Unique identifier for a card in the catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Numeric card stats.
///
/// Signed so that effect arithmetic can go below zero before clamping.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stats {
    pub hp: i32,
    pub attack: i32,
    pub defense: i32,
    pub speed: i32,
}

impl Stats {
    #[must_use]
    pub const fn new(hp: i32, attack: i32, defense: i32, speed: i32) -> Self {
        Self {
            hp,
            attack,
            defense,
            speed,
        }
    }
}

/// A card as defined in the catalog.
///
/// ## Example
///
/// ```
/// use elemental_clash::cards::{Card, CardClass, CardId, Element, Race};
///
/// let card = Card::new(CardId::new(1), "Ember Knight", Element::Fire)
///     .with_attack(28)
///     .with_defense(18)
///     .with_race(Race::Human)
///     .with_class(CardClass::Warrior);
///
/// assert_eq!(card.stats.attack, 28);
/// assert_eq!(card.element, Element::Fire);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub stats: Stats,
    pub race: Race,
    pub class: CardClass,
    pub element: Element,
    #[serde(default)]
    pub tags: SmallVec<[String; 4]>,
    /// Ability granted to the side fielding this card's deck.
    #[serde(default)]
    pub ability: Option<AbilityId>,
}

impl Card {
    /// Create a card with zeroed stats, `Human` race and `Warrior` class.
    #[must_use]
    pub fn new(id: CardId, name: impl Into<String>, element: Element) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            stats: Stats::default(),
            race: Race::Human,
            class: CardClass::Warrior,
            element,
            tags: SmallVec::new(),
            ability: None,
        }
    }

    #[must_use]
    pub fn with_stats(mut self, stats: Stats) -> Self {
        self.stats = stats;
        self
    }

    #[must_use]
    pub fn with_hp(mut self, hp: i32) -> Self {
        self.stats.hp = hp;
        self
    }

    #[must_use]
    pub fn with_attack(mut self, attack: i32) -> Self {
        self.stats.attack = attack;
        self
    }

    #[must_use]
    pub fn with_defense(mut self, defense: i32) -> Self {
        self.stats.defense = defense;
        self
    }

    #[must_use]
    pub fn with_speed(mut self, speed: i32) -> Self {
        self.stats.speed = speed;
        self
    }

    #[must_use]
    pub fn with_race(mut self, race: Race) -> Self {
        self.race = race;
        self
    }

    #[must_use]
    pub fn with_class(mut self, class: CardClass) -> Self {
        self.class = class;
        self
    }

    #[must_use]
    pub fn with_element(mut self, element: Element) -> Self {
        self.element = element;
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    #[must_use]
    pub fn with_ability(mut self, ability: AbilityId) -> Self {
        self.ability = Some(ability);
        self
    }

    /// Check if the card carries a tag.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}
