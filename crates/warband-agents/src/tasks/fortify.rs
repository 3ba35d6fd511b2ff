//! Fortify: repair a wall or rampart.

use warband_types::{ActionResult, TargetRef, TaskKind, TaskRecord, TaskSettings};
use warband_world::{Structure, Target};

use crate::actions::{Actuator, REPAIR_RANGE};
use crate::agent::Agent;

/// Repair a barrier up to a hits target.
///
/// The target stays valid until its hits reach `min(hits_target, hits_max)`.
/// Walls and ramparts can hold far more than any useful target, so repair
/// deliberately stops at the cap rather than at full hits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFortify {
    target_ref: TargetRef,
    settings: TaskSettings,
}

impl TaskFortify {
    /// Fortify `target` until it reaches `hits_target` (or its maximum).
    pub fn new(target: &Structure, hits_target: u32) -> Self {
        Self {
            target_ref: TargetRef {
                id: target.id,
                pos: target.pos,
            },
            settings: TaskSettings {
                move_color: String::from("green"),
                target_range: REPAIR_RANGE,
                hits_target: Some(hits_target),
            },
        }
    }

    /// Rebuild from a persisted record.
    pub fn from_record(record: TaskRecord) -> Self {
        Self {
            target_ref: record.target_ref,
            settings: record.settings,
        }
    }
}

impl super::Task for TaskFortify {
    fn kind(&self) -> TaskKind {
        TaskKind::Fortify
    }

    fn target_ref(&self) -> &TargetRef {
        &self.target_ref
    }

    fn settings(&self) -> &TaskSettings {
        &self.settings
    }

    fn is_valid_task(&self, agent: &Agent) -> bool {
        agent.unit.energy > 0
    }

    fn is_valid_target(&self, target: &Target<'_>) -> bool {
        let Target::Structure(structure) = target else {
            return false;
        };
        // Keep going until the goal is reached, not merely until the barrier
        // stops being urgent.
        let goal = self
            .settings
            .hits_target
            .map_or(structure.hits_max, |t| t.min(structure.hits_max));
        structure.structure_type.is_barrier() && structure.hits < goal
    }

    fn work(
        &self,
        agent: &Agent,
        target: &Target<'_>,
        actuator: &mut dyn Actuator,
    ) -> ActionResult {
        actuator.repair(agent, target)
    }
}
