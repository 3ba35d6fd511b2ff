//! World snapshot, reachability oracle, and room grid for the Warband engine.
//!
//! This crate models what the host engine hands over each tick: the visible
//! rooms with their units and structures. It also defines the two external
//! collaborators the decision layer consults without owning them, the
//! [`Reachability`] oracle and the [`RoomCoordinates`] translator, plus the
//! immutable structure-priority tables.
//!
//! # Modules
//!
//! - [`error`] -- Error types for snapshot assembly.
//! - [`grid`] -- Room-to-room coordinate translation ([`WorldGrid`]).
//! - [`priorities`] -- Build and attack structure-priority tables.
//! - [`reachability`] -- The reachability oracle and simple terrains.
//! - [`room`] -- [`RoomView`], [`Unit`], [`Structure`], and the [`World`]
//!   snapshot with weak-reference resolution.

pub mod error;
pub mod grid;
pub mod priorities;
pub mod reachability;
pub mod room;

pub use error::WorldError;
pub use grid::{RoomCoordinates, WorldGrid};
pub use priorities::{ATTACK_STRUCTURE_PRIORITIES, BUILD_PRIORITIES, rank_in};
pub use reachability::{OpenTerrain, Reachability, SealedTiles};
pub use room::{
    Body, HasPosition, RoomView, Structure, Target, Unit, World, closest_by_range, percent,
};
