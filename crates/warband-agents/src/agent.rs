//! The agent: this tick's unit snapshot plus its persisted memory.

use warband_types::{AgentId, AgentMemory, Position, RoomName};
use warband_world::Unit;

/// An autonomous unit controlled by this engine.
///
/// The [`Unit`] half is owned by the host and rebuilt every tick; the
/// [`AgentMemory`] half is the durable record, loaded from and written back
/// to the memory store around each tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Agent {
    /// Stable identity, also the memory-store key.
    pub id: AgentId,
    /// Display name.
    pub name: String,
    /// This tick's unit state.
    pub unit: Unit,
    /// Persisted memory record.
    pub memory: AgentMemory,
}

impl Agent {
    /// Bind a unit snapshot to its identity and memory.
    pub fn new(id: AgentId, name: impl Into<String>, unit: Unit, memory: AgentMemory) -> Self {
        Self {
            id,
            name: name.into(),
            unit,
            memory,
        }
    }

    /// Current tile.
    pub const fn pos(&self) -> Position {
        self.unit.pos
    }

    /// Current room.
    pub const fn room(&self) -> RoomName {
        self.unit.pos.room
    }

    /// Movement fatigue; the agent can only move when this is 0.
    pub const fn fatigue(&self) -> u32 {
        self.unit.fatigue
    }

    /// Remaining lifetime, absent while spawning.
    pub const fn ticks_to_live(&self) -> Option<u32> {
        self.unit.ticks_to_live
    }

    /// Whether the agent is still being spawned.
    pub const fn is_spawning(&self) -> bool {
        self.unit.spawning
    }

    /// Whether the agent is below full hit points.
    pub const fn is_hurt(&self) -> bool {
        self.unit.is_hurt()
    }

    /// Range from this agent to `pos`.
    pub fn range_to(&self, pos: &Position) -> u32 {
        self.unit.pos.range_to(pos)
    }

    /// Whether this agent shares a room with `other`.
    pub fn same_room_as(&self, other: &Self) -> bool {
        self.room() == other.room()
    }
}
