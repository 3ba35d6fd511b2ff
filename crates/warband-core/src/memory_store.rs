//! Durable memory: the only state that survives from one tick to the next.
//!
//! The store holds one [`AgentMemory`] per agent and one [`OverlordMemory`]
//! per overlord, serialised together as a single JSON document. Records
//! written by older versions are migrated on load. Records of agents that no
//! longer exist are pruned; any partner reference still naming them is left
//! for the partner matcher to heal on its next use.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;
use warband_types::{AgentId, AgentMemory, MEMORY_VERSION, OverlordMemory};

/// Errors that can occur while loading or saving the memory store.
#[derive(Debug, thiserror::Error)]
pub enum MemoryError {
    /// Reading or writing the backing file failed.
    #[error("memory store I/O failed: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// The document is not valid memory JSON.
    #[error("memory store JSON is invalid: {source}")]
    Json {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },

    /// The document was written by a newer engine.
    #[error("memory store version {found} is newer than supported version {supported}")]
    UnsupportedVersion {
        /// Version found in the document.
        found: u32,
        /// Newest version this build understands.
        supported: u32,
    },
}

/// Per-agent and per-overlord memory records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryStore {
    #[serde(default)]
    version: u32,
    #[serde(default)]
    agents: BTreeMap<AgentId, AgentMemory>,
    #[serde(default)]
    overlords: BTreeMap<String, OverlordMemory>,
}

impl MemoryStore {
    /// An empty store at the current version.
    pub const fn new() -> Self {
        Self {
            version: MEMORY_VERSION,
            agents: BTreeMap::new(),
            overlords: BTreeMap::new(),
        }
    }

    /// Parse a store from JSON and migrate it to the current version.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::Json`] for malformed documents and
    /// [`MemoryError::UnsupportedVersion`] for documents from a newer engine.
    pub fn from_json(json: &str) -> Result<Self, MemoryError> {
        let mut store: Self = serde_json::from_str(json)?;
        if store.version > MEMORY_VERSION {
            return Err(MemoryError::UnsupportedVersion {
                found: store.version,
                supported: MEMORY_VERSION,
            });
        }
        let migrated = store.migrate();
        if migrated > 0 {
            debug!(migrated, "memory records migrated");
        }
        Ok(store)
    }

    /// Serialise the store to JSON.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::Json`] if serialisation fails.
    pub fn to_json(&self) -> Result<String, MemoryError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a store from `path`. A missing file yields an empty store.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::Io`] if the file exists but cannot be read, or
    /// the errors of [`MemoryStore::from_json`].
    pub fn load(path: &Path) -> Result<Self, MemoryError> {
        match std::fs::read_to_string(path) {
            Ok(json) => Self::from_json(&json),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::new()),
            Err(err) => Err(err.into()),
        }
    }

    /// Write the store to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError`] if serialisation or the write fails.
    pub fn save(&self, path: &Path) -> Result<(), MemoryError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Bring every record up to [`MEMORY_VERSION`]. Returns how many records
    /// changed.
    ///
    /// Version 0 records predate the version field. They are stamped, and a
    /// partner reference naming the agent itself (never valid) is dropped.
    pub fn migrate(&mut self) -> usize {
        let mut migrated: usize = 0;
        for (id, memory) in &mut self.agents {
            if memory.version < MEMORY_VERSION {
                if memory.partner == Some(*id) {
                    memory.partner = None;
                }
                memory.version = MEMORY_VERSION;
                migrated = migrated.saturating_add(1);
            }
        }
        for memory in self.overlords.values_mut() {
            if memory.version < MEMORY_VERSION {
                memory.version = MEMORY_VERSION;
                migrated = migrated.saturating_add(1);
            }
        }
        self.version = MEMORY_VERSION;
        migrated
    }

    /// Remove the records of agents not in `live`. Returns the number removed.
    pub fn prune(&mut self, live: &BTreeSet<AgentId>) -> usize {
        let before = self.agents.len();
        self.agents.retain(|id, _| live.contains(id));
        let removed = before.saturating_sub(self.agents.len());
        if removed > 0 {
            debug!(removed, "pruned memory of departed agents");
        }
        removed
    }

    /// An agent's record.
    pub fn agent(&self, id: AgentId) -> Option<&AgentMemory> {
        self.agents.get(&id)
    }

    /// Store an agent's record, replacing the previous one.
    pub fn set_agent(&mut self, id: AgentId, memory: AgentMemory) {
        self.agents.insert(id, memory);
    }

    /// An overlord's record.
    pub fn overlord(&self, name: &str) -> Option<&OverlordMemory> {
        self.overlords.get(name)
    }

    /// Store an overlord's record, replacing the previous one.
    pub fn set_overlord(&mut self, name: impl Into<String>, memory: OverlordMemory) {
        self.overlords.insert(name.into(), memory);
    }

    /// Number of agent records.
    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }
}
