//! Persisted per-agent and per-overlord memory records.
//!
//! These records are the only state that crosses tick boundaries. They are
//! plain data: every cross-reference they hold (a partner, a task target) is
//! an identifier that may have gone stale since it was written, and readers
//! are expected to re-resolve and validate it on every tick.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::TaskKind;
use crate::geometry::Position;
use crate::ids::{AgentId, ObjectId};

/// Current schema version of [`AgentMemory`] and [`OverlordMemory`].
pub const MEMORY_VERSION: u32 = 1;

/// Weak reference to a task target: identity plus last known position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TargetRef {
    /// Identity to re-resolve against the current tick's snapshot.
    pub id: ObjectId,
    /// Where the target was when the reference was written.
    pub pos: Position,
}

/// Small per-task configuration record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TaskSettings {
    /// Colour of the path drawn while travelling to the target.
    pub move_color: String,
    /// Range at which `work` can be performed.
    pub target_range: u32,
    /// Hit points at which a repair-style task considers its target done,
    /// capped by the target's maximum.
    #[serde(default)]
    pub hits_target: Option<u32>,
}

impl Default for TaskSettings {
    fn default() -> Self {
        Self {
            move_color: String::from("yellow"),
            target_range: 1,
            hits_target: None,
        }
    }
}

/// The persisted form of a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TaskRecord {
    /// Which task to re-instantiate.
    pub kind: TaskKind,
    /// What the task acts on.
    pub target_ref: TargetRef,
    /// Task configuration.
    #[serde(default)]
    pub settings: TaskSettings,
}

/// Persisted memory of a single agent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct AgentMemory {
    /// Schema version the record was written with; 0 for legacy records.
    #[serde(default)]
    pub version: u32,
    /// Opaque role tag, resolved by the role table.
    #[serde(default)]
    pub role: String,
    /// Name of the overlord this agent is assigned to.
    #[serde(default)]
    pub overlord: Option<String>,
    /// Agent this one is paired with, if any.
    #[serde(default)]
    pub partner: Option<AgentId>,
    /// Current task, if any.
    #[serde(default)]
    pub task: Option<TaskRecord>,
}

impl AgentMemory {
    /// Fresh record for an agent with the given role and overlord.
    pub fn new(role: impl Into<String>, overlord: impl Into<String>) -> Self {
        Self {
            version: MEMORY_VERSION,
            role: role.into(),
            overlord: Some(overlord.into()),
            partner: None,
            task: None,
        }
    }
}

/// Persisted memory of an overlord.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct OverlordMemory {
    /// Schema version the record was written with.
    #[serde(default)]
    pub version: u32,
    /// Cached retreat position.
    #[serde(default)]
    pub fallback: Option<Position>,
    /// Directive anchor the cached fallback was computed from.
    #[serde(default)]
    pub fallback_anchor: Option<Position>,
}

/// Options accepted by the travel primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TravelOptions {
    /// Permit pathing through source-keeper rooms.
    pub allow_sk: bool,
    /// Permit pathing through hostile rooms.
    pub allow_hostile: bool,
    /// Force path recomputation.
    pub ensure_path: bool,
    /// Bias pathing toward where a moving target is heading.
    pub moving_target: bool,
    /// Ticks without progress tolerated before rerouting.
    pub stuck_value: Option<u32>,
}

impl TravelOptions {
    /// Options used by combat overlords: any room, always fresh paths.
    pub const fn combat() -> Self {
        Self {
            allow_sk: true,
            allow_hostile: true,
            ensure_path: true,
            moving_target: false,
            stuck_value: None,
        }
    }

    /// The same options, anticipating a moving target.
    #[must_use]
    pub const fn with_moving_target(mut self) -> Self {
        self.moving_target = true;
        self
    }

    /// The same options with a custom stuck tolerance.
    #[must_use]
    pub const fn with_stuck_value(mut self, ticks: u32) -> Self {
        self.stuck_value = Some(ticks);
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::RoomName;

    #[test]
    fn legacy_record_deserializes_with_defaults() {
        let memory: AgentMemory = serde_json::from_str(r#"{"role":"guard"}"#).unwrap();
        assert_eq!(memory.version, 0);
        assert_eq!(memory.role, "guard");
        assert!(memory.partner.is_none());
        assert!(memory.task.is_none());
    }

    #[test]
    fn task_record_survives_serialization() {
        let record = TaskRecord {
            kind: TaskKind::Fortify,
            target_ref: TargetRef {
                id: ObjectId::new(),
                pos: Position::new(4, 5, RoomName::from_coords(0, 0)),
            },
            settings: TaskSettings::default(),
        };
        let mut memory = AgentMemory::new("worker", "fortify:home");
        memory.task = Some(record.clone());

        let json = serde_json::to_string(&memory).unwrap();
        let restored: AgentMemory = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.task, Some(record));
        assert_eq!(restored.version, MEMORY_VERSION);
    }

    #[test]
    fn travel_option_builders() {
        let opts = TravelOptions::combat().with_moving_target();
        assert!(opts.allow_sk && opts.allow_hostile && opts.ensure_path && opts.moving_target);
        let catch_up = TravelOptions::default().with_stuck_value(1);
        assert_eq!(catch_up.stuck_value, Some(1));
        assert!(!catch_up.ensure_path);
    }
}
