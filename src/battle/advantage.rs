//! Elemental advantage.
//!
//! Fire, ice and earth form a dominance cycle:
//!
//! ```text
//! fire -> ice -> earth -> fire
//! ```
//!
//! Water, lightning and wind sit outside the cycle and are neutral
//! against everything, including each other.

use serde::{Deserialize, Serialize};

use crate::cards::Element;

/// Classification of an attack's elemental matchup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Advantage {
    Strong,
    Weak,
    Neutral,
}

impl Advantage {
    /// Damage multiplier in percent.
    #[must_use]
    pub const fn multiplier_percent(self) -> i32 {
        match self {
            Advantage::Strong => 125,
            Advantage::Weak => 75,
            Advantage::Neutral => 100,
        }
    }

    /// Damage multiplier as a factor (1.25, 0.75 or 1.0).
    #[must_use]
    pub fn multiplier(self) -> f64 {
        f64::from(self.multiplier_percent()) / 100.0
    }
}

/// Check if `attacker` dominates `defender` in the cycle.
#[must_use]
pub const fn dominates(attacker: Element, defender: Element) -> bool {
    matches!(
        (attacker, defender),
        (Element::Fire, Element::Ice) | (Element::Ice, Element::Earth) | (Element::Earth, Element::Fire)
    )
}

/// The element that dominates `element`, if it is in the cycle.
#[must_use]
pub const fn counter_of(element: Element) -> Option<Element> {
    match element {
        Element::Ice => Some(Element::Fire),
        Element::Earth => Some(Element::Ice),
        Element::Fire => Some(Element::Earth),
        Element::Water | Element::Lightning | Element::Wind => None,
    }
}

/// Classify an attack from `attacker` against `defender`.
#[must_use]
pub const fn advantage(attacker: Element, defender: Element) -> Advantage {
    if dominates(attacker, defender) {
        Advantage::Strong
    } else if dominates(defender, attacker) {
        Advantage::Weak
    } else {
        Advantage::Neutral
    }
}
