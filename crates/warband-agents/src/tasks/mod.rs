//! The task contract: a persisted unit of work binding an agent to a target.
//!
//! A task is stored in the agent's memory as a [`TaskRecord`] (kind, weak
//! target reference, settings) and re-instantiated every tick through
//! [`instantiate`]. Each tick [`run_task`] then:
//!
//! 1. checks [`Task::is_valid_task`] (cheap, agent-only preconditions),
//! 2. re-resolves the target by identity against this tick's [`World`],
//! 3. checks [`Task::is_valid_target`],
//! 4. travels into range, or calls [`Task::work`] once in range.
//!
//! If any check fails the record is cleared and the caller assigns a new task
//! on a later tick. Nothing here is ever aborted mid-tick.

mod fortify;
mod heal;
mod repair;

use tracing::debug;
use warband_types::{ActionResult, TargetRef, TaskKind, TaskRecord, TaskSettings, TravelOptions};
use warband_world::{Target, World};

use crate::actions::Actuator;
use crate::agent::Agent;

pub use fortify::TaskFortify;
pub use heal::TaskHeal;
pub use repair::TaskRepair;

/// A unit of work an agent performs against a target.
pub trait Task {
    /// Persisted tag of this task.
    fn kind(&self) -> TaskKind;

    /// Weak reference to the target.
    fn target_ref(&self) -> &TargetRef;

    /// Task configuration.
    fn settings(&self) -> &TaskSettings;

    /// Preconditions on the agent alone (carrying energy, having the right
    /// parts). Must not query room contents.
    fn is_valid_task(&self, agent: &Agent) -> bool;

    /// Whether the resolved target still warrants this task.
    ///
    /// Thresholds should overshoot "just barely needed" so an agent finishes
    /// the job instead of bouncing between targets.
    fn is_valid_target(&self, target: &Target<'_>) -> bool;

    /// The single state-changing action for this tick.
    fn work(&self, agent: &Agent, target: &Target<'_>, actuator: &mut dyn Actuator)
    -> ActionResult;

    /// The persisted form of this task.
    fn to_record(&self) -> TaskRecord {
        TaskRecord {
            kind: self.kind(),
            target_ref: *self.target_ref(),
            settings: self.settings().clone(),
        }
    }
}

/// Rebuild a task from its persisted record.
pub fn instantiate(record: TaskRecord) -> Box<dyn Task> {
    match record.kind {
        TaskKind::Fortify => Box::new(TaskFortify::from_record(record)),
        TaskKind::Repair => Box::new(TaskRepair::from_record(record)),
        TaskKind::Heal => Box::new(TaskHeal::from_record(record)),
    }
}

/// Store `task` in the agent's memory, replacing any previous task.
pub fn assign(agent: &mut Agent, task: &dyn Task) {
    debug!(agent = %agent.name, task = %task.kind(), "task assigned");
    agent.memory.task = Some(task.to_record());
}

/// Whether the agent's stored task is still worth keeping this tick.
pub fn has_valid_task(agent: &Agent, world: &World) -> bool {
    let Some(record) = agent.memory.task.clone() else {
        return false;
    };
    let task = instantiate(record);
    task.is_valid_task(agent)
        && world
            .resolve(task.target_ref())
            .is_some_and(|target| task.is_valid_target(&target))
}

/// What happened when an agent ran its task this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    /// The agent has no task.
    Idle,
    /// The task failed a validity check and was cleared.
    Dropped(TaskKind),
    /// The agent moved toward its target.
    Approaching(ActionResult),
    /// The agent worked on its target.
    Worked(ActionResult),
}

/// Run the agent's stored task for this tick.
pub fn run_task(agent: &mut Agent, world: &World, actuator: &mut dyn Actuator) -> TaskOutcome {
    let Some(record) = agent.memory.task.clone() else {
        return TaskOutcome::Idle;
    };
    let task = instantiate(record);
    let kind = task.kind();

    if !task.is_valid_task(agent) {
        debug!(agent = %agent.name, task = %kind, "task invalid, dropping");
        agent.memory.task = None;
        return TaskOutcome::Dropped(kind);
    }

    let Some(target) = world.resolve(task.target_ref()) else {
        debug!(agent = %agent.name, task = %kind, "task target vanished, dropping");
        agent.memory.task = None;
        return TaskOutcome::Dropped(kind);
    };

    if !task.is_valid_target(&target) {
        debug!(agent = %agent.name, task = %kind, "task target no longer valid, dropping");
        agent.memory.task = None;
        return TaskOutcome::Dropped(kind);
    }

    // Keep the last known position fresh for the next tick's lookup.
    if let Some(stored) = agent.memory.task.as_mut() {
        stored.target_ref = target.to_ref();
    }

    if agent.range_to(&target.pos()) > task.settings().target_range {
        let result = actuator.travel_to(agent, &target.pos(), &TravelOptions::default());
        return TaskOutcome::Approaching(result);
    }

    TaskOutcome::Worked(task.work(agent, &target, actuator))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use warband_types::StructureType;
    use warband_world::{RoomView, Structure};

    use super::*;
    use crate::actions::IntentLog;
    use crate::actions::test_support::*;

    fn world_with(structures: Vec<Structure>) -> World {
        let mut room = RoomView::new(home());
        room.structures = structures;
        let mut world = World::new();
        world.insert_room(room).unwrap();
        world
    }

    fn worker_at(x: u8, y: u8) -> Agent {
        let mut worker = agent_at(at(x, y), "worker");
        worker.unit.body.work = 3;
        worker.unit.energy = 50;
        worker
    }

    #[test]
    fn idle_without_task() {
        let mut worker = worker_at(10, 10);
        let world = world_with(Vec::new());
        let mut log = IntentLog::new();
        assert_eq!(run_task(&mut worker, &world, &mut log), TaskOutcome::Idle);
    }

    #[test]
    fn works_when_in_range_and_travels_otherwise() {
        let wall = Structure::new(StructureType::Wall, at(12, 10), 100, 10_000);
        let world = world_with(vec![wall.clone()]);
        let mut log = IntentLog::new();

        let mut near = worker_at(10, 10);
        assign(&mut near, &TaskFortify::new(&wall, 5_000));
        assert_eq!(
            run_task(&mut near, &world, &mut log),
            TaskOutcome::Worked(ActionResult::Ok)
        );

        let mut far = worker_at(30, 30);
        assign(&mut far, &TaskFortify::new(&wall, 5_000));
        assert_eq!(
            run_task(&mut far, &world, &mut log),
            TaskOutcome::Approaching(ActionResult::Ok)
        );
        assert!(far.memory.task.is_some());
    }

    #[test]
    fn vanished_target_drops_the_task() {
        let wall = Structure::new(StructureType::Wall, at(12, 10), 100, 10_000);
        let world = world_with(Vec::new());
        let mut worker = worker_at(10, 10);
        assign(&mut worker, &TaskFortify::new(&wall, 5_000));

        let mut log = IntentLog::new();
        assert_eq!(
            run_task(&mut worker, &world, &mut log),
            TaskOutcome::Dropped(TaskKind::Fortify)
        );
        assert!(worker.memory.task.is_none());
        assert!(log.is_empty());
    }

    #[test]
    fn invalid_task_is_dropped_before_resolving() {
        let wall = Structure::new(StructureType::Wall, at(12, 10), 100, 10_000);
        let world = world_with(vec![wall.clone()]);
        let mut worker = worker_at(10, 10);
        assign(&mut worker, &TaskFortify::new(&wall, 5_000));
        worker.unit.energy = 0;

        let mut log = IntentLog::new();
        assert_eq!(
            run_task(&mut worker, &world, &mut log),
            TaskOutcome::Dropped(TaskKind::Fortify)
        );
        assert!(!has_valid_task(&worker, &world));
    }

    #[test]
    fn stale_position_is_refreshed() {
        let wall = Structure::new(StructureType::Rampart, at(12, 10), 100, 10_000);
        let world = world_with(vec![wall.clone()]);
        let mut worker = worker_at(10, 10);
        let mut task = TaskFortify::new(&wall, 5_000).to_record();
        task.target_ref.pos = at(40, 40);
        worker.memory.task = Some(task);

        let mut log = IntentLog::new();
        run_task(&mut worker, &world, &mut log);
        assert_eq!(worker.memory.task.map(|t| t.target_ref.pos), Some(wall.pos));
    }

    #[test]
    fn records_round_trip_through_instantiate() {
        let wall = Structure::new(StructureType::Wall, at(12, 10), 100, 10_000);
        let record = TaskFortify::new(&wall, 5_000).to_record();
        let rebuilt = instantiate(record.clone());
        assert_eq!(rebuilt.to_record(), record);
        assert_eq!(rebuilt.kind(), TaskKind::Fortify);
    }
}
