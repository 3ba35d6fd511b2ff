//! Role dispatch: persisted role tags mapped to behavior families.
//!
//! An agent's memory carries its role as an opaque string tag. The tag set is
//! closed ([`Role`]) but the lookup table is not: [`RoleTable::register`]
//! adds new tags (aliases, renamed roles from older memory) that dispatch to
//! an existing variant. Unknown tags resolve to `None`, never to an error
//! the tick has to handle.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::AgentError;

/// Every role an agent can be spawned as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    /// Claims controllers in new rooms.
    Claimer,
    /// Defends a room against invaders.
    Guard,
    /// Moves energy between containers and storage.
    Hauler,
    /// Follows and heals a partnered attacker.
    Healer,
    /// Runs the core logistics of a base.
    Manager,
    /// Harvests a source.
    Miner,
    /// Feeds minerals to labs and terminals.
    MineralSupplier,
    /// Fills spawns and extensions.
    Queen,
    /// Keeps remote controllers reserved.
    Reserver,
    /// Scouts rooms for intel.
    Scout,
    /// Supplies towers and links.
    Supplier,
    /// Upgrades a room controller.
    Upgrader,
    /// Builds, repairs, and fortifies.
    Worker,
    /// Tears down hostile structures and units.
    Destroyer,
}

/// What an overlord can expect an agent of a given role to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Duty {
    /// Fights hostiles and structures.
    Combat,
    /// Heals allies.
    Medic,
    /// Repairs and fortifies structures.
    Maintenance,
    /// Economy and support roles not driven by this engine.
    Support,
}

impl Role {
    /// All built-in roles, in tag order.
    pub const ALL: [Self; 14] = [
        Self::Claimer,
        Self::Guard,
        Self::Hauler,
        Self::Healer,
        Self::Manager,
        Self::Miner,
        Self::MineralSupplier,
        Self::Queen,
        Self::Reserver,
        Self::Scout,
        Self::Supplier,
        Self::Upgrader,
        Self::Worker,
        Self::Destroyer,
    ];

    /// The persisted tag for this role.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Claimer => "claimer",
            Self::Guard => "guard",
            Self::Hauler => "hauler",
            Self::Healer => "healer",
            Self::Manager => "manager",
            Self::Miner => "miner",
            Self::MineralSupplier => "mineral_supplier",
            Self::Queen => "queen",
            Self::Reserver => "reserver",
            Self::Scout => "scout",
            Self::Supplier => "supplier",
            Self::Upgrader => "upgrader",
            Self::Worker => "worker",
            Self::Destroyer => "destroyer",
        }
    }

    /// The behavior family this role belongs to.
    pub const fn duty(self) -> Duty {
        match self {
            Self::Guard | Self::Destroyer => Duty::Combat,
            Self::Healer => Duty::Medic,
            Self::Worker => Duty::Maintenance,
            Self::Claimer
            | Self::Hauler
            | Self::Manager
            | Self::Miner
            | Self::MineralSupplier
            | Self::Queen
            | Self::Reserver
            | Self::Scout
            | Self::Supplier
            | Self::Upgrader => Duty::Support,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Role {
    type Err = AgentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.tag() == s)
            .ok_or_else(|| AgentError::UnknownRole(s.to_owned()))
    }
}

/// Tag-to-role lookup consulted once per agent per tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleTable {
    entries: BTreeMap<String, Role>,
}

impl Default for RoleTable {
    fn default() -> Self {
        Self {
            entries: Role::ALL
                .into_iter()
                .map(|role| (role.tag().to_owned(), role))
                .collect(),
        }
    }
}

impl RoleTable {
    /// A table holding only the built-in tags.
    pub fn new() -> Self {
        Self::default()
    }

    /// Map an additional tag to `role`, replacing any previous mapping.
    pub fn register(&mut self, tag: impl Into<String>, role: Role) {
        self.entries.insert(tag.into(), role);
    }

    /// The role for `tag`, if any.
    pub fn resolve(&self, tag: &str) -> Option<Role> {
        self.entries.get(tag).copied()
    }

    /// Number of known tags.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no tags at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
