//! Numeric ID newtypes for type-safe row identifiers.
//!
//! Each ID wraps the storage-layer integer key so a `UserId` cannot be
//! accidentally passed where an `EntityId` is expected. Both are `Copy` and
//! carry no storage handle, so they cross the worker boundary freely.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Wrap a raw storage key.
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// Get the raw storage key.
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// Contributor identifier.
    UserId
);

define_id!(
    /// Ranked entity identifier (numeric key, not the public uid).
    EntityId
);
