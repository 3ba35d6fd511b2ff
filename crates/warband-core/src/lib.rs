//! Overlords, durable memory, configuration, and the tick cycle for the
//! Warband engine.
//!
//! This crate owns the per-tick orchestration: it ranks overlords through a
//! [`PriorityQueue`], hands each its roster of agents, persists memory
//! across ticks through the [`MemoryStore`], and reports a [`TickSummary`].
//!
//! # Modules
//!
//! - [`config`] -- YAML configuration ([`SimulationConfig`])
//! - [`directive`] -- Mission anchors ([`Directive`])
//! - [`memory_store`] -- Versioned JSON memory ([`MemoryStore`])
//! - [`overlord`] -- The [`Overlord`] trait, the [`CombatOverlord`] toolkit,
//!   and the duo, guard, and fortify overlords
//! - [`priority`] -- Six-level bucket queue ([`PriorityQueue`])
//! - [`runner`] -- Bounded multi-tick runner ([`run_bounded`])
//! - [`tick`] -- The single-tick cycle ([`run_tick`])

pub mod config;
pub mod directive;
pub mod memory_store;
pub mod overlord;
pub mod priority;
pub mod runner;
pub mod tick;

pub use config::{ConfigError, SimulationConfig};
pub use directive::Directive;
pub use memory_store::{MemoryError, MemoryStore};
pub use overlord::{
    CombatOverlord, DuoOverlord, FortifyConfig, FortifyOverlord, GuardOverlord, Overlord,
    OverlordReport, TickContext, fallback_position,
};
pub use priority::PriorityQueue;
pub use runner::{NoOpCallback, RunResult, TickCallback, run_bounded};
pub use tick::{SimulationState, TickError, TickSummary, run_tick};
