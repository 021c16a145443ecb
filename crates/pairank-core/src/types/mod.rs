//! Identifier and collection types shared across the workspace.

pub mod collections;
pub mod identifiers;

pub use collections::{BTreeMap, FxHashMap};
pub use identifiers::{EntityId, UserId};
