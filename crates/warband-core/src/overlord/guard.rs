//! Room defence: guards hunt hostiles around a directive.

use warband_agents::{
    Agent, CombatConfig, Duty, TaskHeal, TaskOutcome, assign, closest_hurt_friendly, run_task,
};
use warband_types::{OverlordMemory, Priority};
use warband_world::Target;

use super::{CombatOverlord, Overlord, OverlordReport, TickContext};
use crate::directive::Directive;

/// Range from the directive within which an idle guard parks.
const POST_RANGE: u32 = 2;

/// Keeps a directive's room clear of hostiles.
///
/// Fighters attack and chase the closest hostile, healing themselves when
/// the attack left the heal pipeline free, and otherwise hold their post at
/// the directive. Medics on the roster run heal tasks on hurt allies.
#[derive(Debug, Clone)]
pub struct GuardOverlord {
    name: String,
    priority: Priority,
    combat: CombatOverlord,
}

impl GuardOverlord {
    /// A guard overlord for `directive`, named `<directive>/guard`.
    pub fn new(directive: Directive, config: CombatConfig) -> Self {
        Self {
            name: format!("{}/guard", directive.name),
            priority: Priority::High,
            combat: CombatOverlord::new(directive, config),
        }
    }

    /// Override the default rank.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    fn fight(&self, ctx: &mut TickContext<'_>, guard: &Agent) {
        let world = ctx.world;
        let hostile = world
            .room(guard.room())
            .and_then(|room| self.combat.find_closest_hostile(guard, room, ctx.reachability));

        if let Some(hostile) = hostile {
            self.combat.attack_and_chase(guard, &Target::Unit(hostile), ctx.actuator);
        } else {
            let post = self.combat.directive.pos;
            if guard.range_to(&post) > POST_RANGE {
                ctx.actuator
                    .travel_to(guard, &post, &self.combat.config.move_options);
            } else {
                ctx.actuator.park(guard);
            }
        }
        self.combat.heal_self_if_possible(guard, ctx.actuator);
    }

    /// Run the medic's heal task, picking a new patient when there is none
    /// or the last one no longer needs it. Returns whether a task was
    /// dropped.
    fn tend(ctx: &mut TickContext<'_>, medic: &mut Agent) -> bool {
        let world = ctx.world;
        let mut dropped = false;
        if medic.memory.task.is_some() {
            match run_task(medic, world, ctx.actuator) {
                TaskOutcome::Dropped(_) => dropped = true,
                _ => return false,
            }
        }

        let patient = world
            .room(medic.room())
            .and_then(|room| closest_hurt_friendly(medic, room));
        if let Some(patient) = patient {
            assign(medic, &TaskHeal::new(patient));
            run_task(medic, world, ctx.actuator);
        } else {
            ctx.actuator.park(medic);
        }
        dropped
    }
}

impl Overlord for GuardOverlord {
    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> Priority {
        self.priority
    }

    fn memory(&self) -> &OverlordMemory {
        &self.combat.memory
    }

    fn restore(&mut self, memory: OverlordMemory) {
        self.combat.memory = memory;
    }

    fn run(&mut self, ctx: &mut TickContext<'_>, roster: &mut Vec<Agent>) -> OverlordReport {
        let mut report = OverlordReport::default();
        for member in roster.iter_mut() {
            if member.is_spawning() {
                continue;
            }
            if ctx.duty_of(member) == Some(Duty::Medic) {
                if Self::tend(ctx, member) {
                    report.tasks_dropped = report.tasks_dropped.saturating_add(1);
                }
            } else {
                self.fight(ctx, member);
            }
            report.agents = report.agents.saturating_add(1);
        }
        report
    }
}
