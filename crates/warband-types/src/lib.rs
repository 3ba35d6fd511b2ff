//! Shared type definitions for the Warband combat coordination engine.
//!
//! Every crate in the workspace speaks in these types. The persisted memory
//! records flow downstream to `TypeScript` via `ts-rs` so that memory dumps
//! can be inspected by external tooling.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for agents and world objects
//! - [`enums`] -- Priority levels, structure types, task kinds, directions,
//!   action results
//! - [`geometry`] -- Room names and tile positions with range helpers
//! - [`memory`] -- Persisted agent and overlord memory records, travel options

pub mod enums;
pub mod geometry;
pub mod ids;
pub mod memory;

pub use enums::{ActionResult, Direction, ExitSide, Priority, StructureType, TaskKind};
pub use geometry::{Position, ROOM_MAX_COORD, ROOM_SIZE, RoomName, RoomNameError};
pub use ids::{AgentId, ObjectId};
pub use memory::{
    AgentMemory, MEMORY_VERSION, OverlordMemory, TargetRef, TaskRecord, TaskSettings,
    TravelOptions,
};
