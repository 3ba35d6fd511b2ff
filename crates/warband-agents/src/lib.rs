//! Agents and the per-agent decision layer of the Warband engine.
//!
//! This crate holds everything that decides what a single agent (or a pair
//! of agents) does this tick, without owning the tick loop itself. It sits
//! between `warband-world` (the read-only snapshot) and `warband-core`
//! (overlords, memory persistence, and the tick cycle).
//!
//! # Modules
//!
//! - [`actions`] -- The [`Actuator`] intent seam and the recording [`IntentLog`]
//! - [`agent`] -- [`Agent`]: unit snapshot plus persisted memory
//! - [`config`] -- Combat tunables ([`CombatConfig`])
//! - [`error`] -- Error types ([`AgentError`])
//! - [`format`] -- Padding and percentage helpers for status output
//! - [`movement`] -- Leader/follower paired movement ([`pairwise_move`])
//! - [`partner`] -- Persistent 1:1 partner matching ([`find_partner`])
//! - [`roles`] -- Role tags and the dispatch table ([`RoleTable`])
//! - [`targeting`] -- Hostile, structure, and hurt-ally acquisition
//! - [`tasks`] -- The Task contract and the fortify, repair, and heal tasks

pub mod actions;
pub mod agent;
pub mod config;
pub mod error;
pub mod format;
pub mod movement;
pub mod partner;
pub mod roles;
pub mod targeting;
pub mod tasks;

pub use actions::{Actuator, Intent, IntentLog, Pipeline, RANGED_HEAL_RANGE, REPAIR_RANGE};
pub use agent::Agent;
pub use config::CombatConfig;
pub use error::AgentError;
pub use format::{pad_left, pad_right, to_percent};
pub use movement::pairwise_move;
pub use partner::find_partner;
pub use roles::{Duty, Role, RoleTable};
pub use targeting::{
    closest_hostile, closest_hurt_friendly, closest_prioritized_structure, closest_reachable,
};
pub use tasks::{
    Task, TaskFortify, TaskHeal, TaskOutcome, TaskRepair, assign, has_valid_task, instantiate,
    run_task,
};
