//! Card system: definitions, categorical attributes, and the catalog.
//!
//! ## Key Types
//!
//! - `Card`: Immutable card data (stats, race, class, element, tags)
//! - `Element`: Elemental affinity used by the advantage cycle
//! - `CardCatalog`: Card lookup and deck resolution

pub mod attributes;
pub mod definition;
pub mod registry;

pub use attributes::{CardClass, Element, Race};
pub use definition::{Card, CardId, Stats};
pub use registry::{CardCatalog, CatalogError};
