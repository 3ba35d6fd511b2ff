//! Repair: restore an owned structure to full hits.

use warband_types::{ActionResult, TargetRef, TaskKind, TaskRecord, TaskSettings};
use warband_world::{Structure, Target};

use crate::actions::{Actuator, REPAIR_RANGE};
use crate::agent::Agent;

/// Repair a non-barrier structure until it is at full hits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRepair {
    target_ref: TargetRef,
    settings: TaskSettings,
}

impl TaskRepair {
    /// Repair `target`.
    pub fn new(target: &Structure) -> Self {
        Self {
            target_ref: TargetRef {
                id: target.id,
                pos: target.pos,
            },
            settings: TaskSettings {
                move_color: String::from("green"),
                target_range: REPAIR_RANGE,
                hits_target: None,
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

impl super::Task for TaskRepair {
    fn kind(&self) -> TaskKind {
        TaskKind::Repair
    }

    fn target_ref(&self) -> &TargetRef {
        &self.target_ref
    }

    fn settings(&self) -> &TaskSettings {
        &self.settings
    }

    fn is_valid_task(&self, agent: &Agent) -> bool {
        agent.unit.energy > 0 && agent.unit.body.work > 0
    }

    fn is_valid_target(&self, target: &Target<'_>) -> bool {
        matches!(target, Target::Structure(s) if !s.structure_type.is_barrier() && s.is_damaged())
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

#[cfg(test)]
mod tests {
    use warband_types::StructureType;

    use super::super::Task;
    use super::*;
    use crate::actions::test_support::*;

    #[test]
    fn valid_until_full_hits() {
        let mut tower = Structure::new(StructureType::Tower, at(5, 5), 2_999, 3_000);
        let task = TaskRepair::new(&tower);
        assert!(task.is_valid_target(&Target::Structure(&tower)));
        tower.hits = 3_000;
        assert!(!task.is_valid_target(&Target::Structure(&tower)));
    }

    #[test]
    fn barriers_belong_to_fortify() {
        let wall = Structure::new(StructureType::Wall, at(5, 5), 1, 3_000);
        assert!(!TaskRepair::new(&wall).is_valid_target(&Target::Structure(&wall)));
    }
}
