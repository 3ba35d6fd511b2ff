//! Type-safe identifier wrappers around [`Uuid`].
//!
//! Agents are keyed by a stable [`AgentId`] that outlives any single tick
//! and doubles as the key of the agent's persisted memory record. Every
//! other world object (hostile units, structures, allied units) is addressed
//! through an [`ObjectId`], which is only ever used as a weak reference and
//! re-resolved against the current tick's snapshot.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Stable identity of an agent controlled by this engine.
    ///
    /// Also the key of the agent's record in the memory store, and the value
    /// written into a partner's `partner` field.
    AgentId
}

define_id! {
    /// Identity of any world object (unit or structure) as seen in a tick
    /// snapshot. Only ever held as a weak reference.
    ObjectId
}
