//! Heal: bring an allied unit back to full hits.

use warband_types::{ActionResult, TargetRef, TaskKind, TaskRecord, TaskSettings};
use warband_world::{Target, Unit};

use crate::actions::{Actuator, RANGED_HEAL_RANGE};
use crate::agent::Agent;

/// Heal an ally until it is at full hits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskHeal {
    target_ref: TargetRef,
    settings: TaskSettings,
}

impl TaskHeal {
    /// Heal `target`.
    pub fn new(target: &Unit) -> Self {
        Self {
            target_ref: TargetRef {
                id: target.id,
                pos: target.pos,
            },
            settings: TaskSettings {
                move_color: String::from("cyan"),
                target_range: RANGED_HEAL_RANGE,
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

impl super::Task for TaskHeal {
    fn kind(&self) -> TaskKind {
        TaskKind::Heal
    }

    fn target_ref(&self) -> &TargetRef {
        &self.target_ref
    }

    fn settings(&self) -> &TaskSettings {
        &self.settings
    }

    fn is_valid_task(&self, agent: &Agent) -> bool {
        agent.unit.body.heal > 0
    }

    fn is_valid_target(&self, target: &Target<'_>) -> bool {
        matches!(target, Target::Unit(u) if u.is_hurt())
    }

    fn work(
        &self,
        agent: &Agent,
        target: &Target<'_>,
        actuator: &mut dyn Actuator,
    ) -> ActionResult {
        if agent.pos().is_near_to(&target.pos()) {
            actuator.heal(agent, target)
        } else {
            actuator.ranged_heal(agent, target)
        }
    }
}

#[cfg(test)]
mod tests {
    use warband_types::ActionResult;
    use warband_world::Body;

    use super::super::Task;
    use super::*;
    use crate::actions::test_support::*;
    use crate::actions::{Intent, IntentLog};

    #[test]
    fn adjacent_targets_get_a_full_heal() {
        let mut patient = Unit::new(at(11, 10), 500, 1000, Body::default());
        patient.hits = 100;
        let medic = agent_at(at(10, 10), "healer");
        let task = TaskHeal::new(&patient);
        let mut log = IntentLog::new();

        assert!(task.is_valid_target(&Target::Unit(&patient)));
        assert_eq!(task.work(&medic, &Target::Unit(&patient), &mut log), ActionResult::Ok);
        assert!(matches!(log.intents(), [Intent::Heal { .. }]));
    }

    #[test]
    fn distant_targets_get_a_ranged_heal() {
        let mut patient = Unit::new(at(13, 10), 500, 1000, Body::default());
        patient.hits = 100;
        let medic = agent_at(at(10, 10), "healer");
        let mut log = IntentLog::new();

        TaskHeal::new(&patient).work(&medic, &Target::Unit(&patient), &mut log);
        assert!(matches!(log.intents(), [Intent::RangedHeal { .. }]));
    }

    #[test]
    fn healthy_targets_are_done() {
        let patient = Unit::new(at(13, 10), 500, 1000, Body::default());
        assert!(!TaskHeal::new(&patient).is_valid_target(&Target::Unit(&patient)));
    }
}
