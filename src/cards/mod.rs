//! Card system: definitions, instances, attributes and registry.
//!
//! ## Key Types
//!
//! - `CardDefinition`: Static card data (type, cost, stats, programs)
//! - `CardInstance`: A physical card with its current cost
//! - `CardRegistry`: Definition lookup by ID and name
//! - `Attribute` / `Stats`: The numeric attributes effects read and modify

pub mod attributes;
pub mod definition;
pub mod instance;
pub mod registry;

pub use attributes::{Attribute, AttributeSelector, Stats};
pub use definition::{CardDefinition, CardId, CardType};
pub use instance::CardInstance;
pub use registry::CardRegistry;
