//! Card catalog for definition lookup.
//!
//! The `CardCatalog` holds every card available to deck selection.
//! It is read-only once built: the engine only ever copies cards out.

use rustc_hash::FxHashMap;
use thiserror::Error;

use super::attributes::Element;
use super::definition::{Card, CardId};

/// Errors raised while building or querying the catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("card {0} already registered")]
    DuplicateCard(CardId),

    #[error("card {0} not found in catalog")]
    UnknownCard(CardId),

    #[error("invalid catalog data: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Catalog of card definitions.
///
/// ## Example
///
/// ```
/// use elemental_clash::cards::{Card, CardCatalog, CardId, Element};
///
/// let mut catalog = CardCatalog::new();
/// catalog.register(Card::new(CardId::new(1), "Ember Knight", Element::Fire)).unwrap();
///
/// let found = catalog.get(CardId::new(1)).unwrap();
/// assert_eq!(found.name, "Ember Knight");
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardCatalog {
    cards: FxHashMap<CardId, Card>,
}

impl CardCatalog {
    /// Create a new empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from a JSON array of cards.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let cards: Vec<Card> = serde_json::from_str(json)?;
        let mut catalog = Self::new();
        for card in cards {
            catalog.register(card)?;
        }
        Ok(catalog)
    }

    /// Register a card definition.
    pub fn register(&mut self, card: Card) -> Result<(), CatalogError> {
        if self.cards.contains_key(&card.id) {
            return Err(CatalogError::DuplicateCard(card.id));
        }
        self.cards.insert(card.id, card);
        Ok(())
    }

    /// Get a card by ID.
    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&Card> {
        self.cards.get(&id)
    }

    /// Get a card by ID, failing if it is not registered.
    pub fn require(&self, id: CardId) -> Result<&Card, CatalogError> {
        self.get(id).ok_or(CatalogError::UnknownCard(id))
    }

    /// Resolve an ordered list of IDs into a deck of card copies.
    pub fn deck(&self, ids: &[CardId]) -> Result<Vec<Card>, CatalogError> {
        ids.iter().map(|&id| self.require(id).cloned()).collect()
    }

    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.cards.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate over all cards (unordered).
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.values()
    }

    /// Find cards of an element.
    pub fn by_element(&self, element: Element) -> impl Iterator<Item = &Card> {
        self.cards.values().filter(move |c| c.element == element)
    }

    /// Find cards matching a predicate.
    pub fn find<F>(&self, predicate: F) -> impl Iterator<Item = &Card>
    where
        F: Fn(&Card) -> bool,
    {
        self.cards.values().filter(move |c| predicate(c))
    }
}
