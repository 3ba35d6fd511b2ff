//! Barrier upkeep: workers fortify walls and ramparts and patch up damaged
//! structures in a directive's room.

use std::collections::BTreeSet;

use serde::Deserialize;
use tracing::debug;
use warband_agents::{
    Agent, Duty, TaskFortify, TaskOutcome, TaskRepair, assign, has_valid_task, run_task,
};
use warband_types::{ObjectId, OverlordMemory, Priority, TravelOptions};
use warband_world::{BUILD_PRIORITIES, RoomView, Structure, percent, rank_in};

use super::{Overlord, OverlordReport, TickContext};
use crate::directive::Directive;
use crate::priority::PriorityQueue;

/// Mirrors the `fortify` section of `warband-config.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FortifyConfig {
    /// Hit points walls and ramparts are fortified up to, capped by their
    /// maximum (default: 100 000).
    #[serde(default = "default_hits_target")]
    pub hits_target: u32,

    /// Most jobs planned per tick (default: 25).
    #[serde(default = "default_max_queue")]
    pub max_queue: usize,
}

impl Default for FortifyConfig {
    fn default() -> Self {
        Self {
            hits_target: default_hits_target(),
            max_queue: default_max_queue(),
        }
    }
}

const fn default_hits_target() -> u32 {
    100_000
}

const fn default_max_queue() -> usize {
    25
}

/// A planned piece of maintenance work.
#[derive(Debug, Clone, Copy)]
enum Job<'a> {
    Fortify(&'a Structure),
    Repair(&'a Structure),
}

impl Job<'_> {
    const fn target_id(&self) -> ObjectId {
        match self {
            Self::Fortify(s) | Self::Repair(s) => s.id,
        }
    }
}

/// Priority of a barrier by how far it is from its goal.
const fn barrier_priority(pct_of_goal: u32) -> Priority {
    match pct_of_goal {
        0..10 => Priority::Critical,
        10..30 => Priority::High,
        30..50 => Priority::NormalHigh,
        50..70 => Priority::Normal,
        70..90 => Priority::NormalLow,
        _ => Priority::Low,
    }
}

/// Keeps a room's barriers and structures in repair.
#[derive(Debug, Clone)]
pub struct FortifyOverlord {
    name: String,
    priority: Priority,
    directive: Directive,
    config: FortifyConfig,
    memory: OverlordMemory,
}

impl FortifyOverlord {
    /// A fortify overlord for `directive`, named `<directive>/fortify`.
    pub fn new(directive: Directive, config: FortifyConfig) -> Self {
        Self {
            name: format!("{}/fortify", directive.name),
            priority: Priority::Normal,
            directive,
            config,
            memory: OverlordMemory::default(),
        }
    }

    /// Override the default rank.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Rank this tick's work in `room`, skipping targets already claimed.
    fn plan<'a>(&self, room: &'a RoomView, claimed: &BTreeSet<ObjectId>) -> Vec<Job<'a>> {
        let mut queue = PriorityQueue::blank();

        let mut damaged: Vec<&Structure> = room
            .structures
            .iter()
            .filter(|s| !s.structure_type.is_barrier() && s.is_damaged())
            .collect();
        damaged.sort_by_key(|s| rank_in(BUILD_PRIORITIES, s.structure_type).unwrap_or(usize::MAX));
        for structure in damaged {
            let priority = if percent(structure.hits, structure.hits_max) < 50 {
                Priority::High
            } else {
                Priority::Normal
            };
            queue.enqueue(priority, Job::Repair(structure));
        }

        let mut barriers: Vec<(&Structure, u32)> = room
            .structures
            .iter()
            .filter(|s| s.structure_type.is_barrier())
            .filter_map(|s| {
                let goal = self.config.hits_target.min(s.hits_max);
                (s.hits < goal).then(|| (s, percent(s.hits, goal)))
            })
            .collect();
        barriers.sort_by_key(|(s, _)| s.hits);
        for (barrier, pct) in barriers {
            queue.enqueue(barrier_priority(pct), Job::Fortify(barrier));
        }

        queue
            .into_ordered()
            .filter(|job| !claimed.contains(&job.target_id()))
            .take(self.config.max_queue)
            .collect()
    }

    fn assign_job(&self, worker: &mut Agent, job: Job<'_>) {
        match job {
            Job::Fortify(barrier) => {
                assign(worker, &TaskFortify::new(barrier, self.config.hits_target));
            }
            Job::Repair(structure) => assign(worker, &TaskRepair::new(structure)),
        }
    }
}

impl Overlord for FortifyOverlord {
    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> Priority {
        self.priority
    }

    fn memory(&self) -> &OverlordMemory {
        &self.memory
    }

    fn restore(&mut self, memory: OverlordMemory) {
        self.memory = memory;
    }

    fn run(&mut self, ctx: &mut TickContext<'_>, roster: &mut Vec<Agent>) -> OverlordReport {
        let mut report = OverlordReport::default();
        let world = ctx.world;

        let Some(room) = world.room(self.directive.room()) else {
            for worker in roster.iter().filter(|w| !w.is_spawning()) {
                ctx.actuator
                    .travel_to(worker, &self.directive.pos, &TravelOptions::default());
                report.agents = report.agents.saturating_add(1);
            }
            return report;
        };

        let claimed: BTreeSet<ObjectId> = roster
            .iter()
            .filter(|worker| has_valid_task(worker, world))
            .filter_map(|worker| worker.memory.task.as_ref().map(|t| t.target_ref.id))
            .collect();
        let mut jobs = self.plan(room, &claimed).into_iter();
        debug!(overlord = %self.name, jobs = jobs.len(), "maintenance planned");

        for worker in roster.iter_mut() {
            if worker.is_spawning() || ctx.duty_of(worker) != Some(Duty::Maintenance) {
                continue;
            }
            report.agents = report.agents.saturating_add(1);

            if worker.memory.task.is_some() {
                match run_task(worker, world, ctx.actuator) {
                    TaskOutcome::Dropped(kind) => {
                        debug!(worker = %worker.name, task = %kind, "reassigning after drop");
                        report.tasks_dropped = report.tasks_dropped.saturating_add(1);
                    }
                    _ => continue,
                }
            }

            let next = if worker.unit.energy > 0 { jobs.next() } else { None };
            let Some(job) = next else {
                ctx.actuator.park(worker);
                continue;
            };
            self.assign_job(worker, job);
            run_task(worker, world, ctx.actuator);
        }
        report
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use warband_types::{Position, RoomName, StructureType};

    use super::*;

    fn home() -> RoomName {
        RoomName::from_coords(0, 0)
    }

    fn at(x: u8, y: u8) -> Position {
        Position::new(x, y, home())
    }

    fn overlord(hits_target: u32, max_queue: usize) -> FortifyOverlord {
        FortifyOverlord::new(
            Directive::new("base", at(25, 25)),
            FortifyConfig {
                hits_target,
                max_queue,
            },
        )
    }

    #[test]
    fn barrier_buckets_follow_the_fraction_of_goal() {
        assert_eq!(barrier_priority(0), Priority::Critical);
        assert_eq!(barrier_priority(9), Priority::Critical);
        assert_eq!(barrier_priority(10), Priority::High);
        assert_eq!(barrier_priority(49), Priority::NormalHigh);
        assert_eq!(barrier_priority(69), Priority::Normal);
        assert_eq!(barrier_priority(89), Priority::NormalLow);
        assert_eq!(barrier_priority(90), Priority::Low);
    }

    #[test]
    fn plan_ranks_urgent_work_first_and_respects_the_cap() {
        let fortify = overlord(10_000, 3);
        let mut room = RoomView::new(home());
        let healthy_wall = Structure::new(StructureType::Wall, at(1, 1), 9_500, 300_000);
        let done_wall = Structure::new(StructureType::Wall, at(2, 1), 10_000, 300_000);
        let crumbling = Structure::new(StructureType::Rampart, at(3, 1), 500, 300_000);
        let broken_tower = Structure::new(StructureType::Tower, at(4, 1), 1_000, 3_000);
        let scratched_road = Structure::new(StructureType::Road, at(5, 1), 4_000, 5_000);
        room.structures = vec![
            healthy_wall,
            done_wall,
            crumbling.clone(),
            broken_tower.clone(),
            scratched_road.clone(),
        ];

        // Critical rampart, then the half-dead tower, then the road; the
        // nearly finished wall falls past the cap.
        let jobs = fortify.plan(&room, &BTreeSet::new());
        let ids: Vec<ObjectId> = jobs.iter().map(Job::target_id).collect();
        assert_eq!(ids, vec![crumbling.id, broken_tower.id, scratched_road.id]);
    }

    #[test]
    fn claimed_targets_are_not_planned_twice() {
        let fortify = overlord(10_000, 25);
        let mut room = RoomView::new(home());
        let wall = Structure::new(StructureType::Wall, at(1, 1), 100, 300_000);
        room.structures = vec![wall.clone()];

        let claimed: BTreeSet<ObjectId> = [wall.id].into_iter().collect();
        assert!(fortify.plan(&room, &claimed).is_empty());
        assert_eq!(fortify.plan(&room, &BTreeSet::new()).len(), 1);
    }
}
