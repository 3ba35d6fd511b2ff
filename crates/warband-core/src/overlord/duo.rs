//! Attacker/healer pairs pushing into a directive's room.

use tracing::{debug, warn};
use warband_agents::{Agent, CombatConfig, Duty};
use warband_types::{OverlordMemory, Position, Priority};
use warband_world::Target;

use super::{CombatOverlord, Overlord, OverlordReport, TickContext, count};
use crate::directive::Directive;

/// Runs attacker/healer duos against a directive.
///
/// Attackers pick a healer partner. Unpaired attackers and healers wait at
/// the fallback. A paired attacker leads its healer to the directive room,
/// attacks the most important structure there (or the closest hostile when
/// no structure is left), and pulls back to the fallback once its hits drop
/// below the retreat threshold. Healers heal whoever is hurt nearby.
#[derive(Debug, Clone)]
pub struct DuoOverlord {
    name: String,
    priority: Priority,
    combat: CombatOverlord,
}

impl DuoOverlord {
    /// A duo overlord for `directive`, named `<directive>/duo`.
    pub fn new(directive: Directive, config: CombatConfig) -> Self {
        Self {
            name: format!("{}/duo", directive.name),
            priority: Priority::NormalHigh,
            combat: CombatOverlord::new(directive, config),
        }
    }

    /// Override the default rank.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// The shared combat toolkit.
    pub const fn combat(&self) -> &CombatOverlord {
        &self.combat
    }

    fn lead(
        &self,
        ctx: &mut TickContext<'_>,
        attacker: &Agent,
        healer: &Agent,
        fallback: Position,
    ) {
        let retreat_below = self.combat.config.retreat_hits_pct;
        if attacker.unit.hits_pct() < retreat_below {
            debug!(attacker = %attacker.name, "retreating to fallback");
            self.combat.pairwise_move(attacker, healer, &fallback, ctx.actuator);
            return;
        }

        let directive_pos = self.combat.directive.pos;
        if attacker.room() != directive_pos.room {
            self.combat.pairwise_move(attacker, healer, &directive_pos, ctx.actuator);
            return;
        }

        let world = ctx.world;
        let Some(room) = world.room(attacker.room()) else {
            self.combat.pairwise_move(attacker, healer, &directive_pos, ctx.actuator);
            return;
        };

        let target = self
            .combat
            .find_closest_prioritized_structure(attacker, room, ctx.reachability)
            .map(Target::Structure)
            .or_else(|| {
                self.combat
                    .find_closest_hostile(attacker, room, ctx.reachability)
                    .map(Target::Unit)
            });

        match target {
            Some(target) if attacker.pos().is_near_to(&target.pos()) => {
                self.combat.attack_and_chase(attacker, &target, ctx.actuator);
            }
            Some(target) => {
                self.combat.pairwise_move(attacker, healer, &target.pos(), ctx.actuator);
            }
            None => {
                self.combat.pairwise_move(attacker, healer, &directive_pos, ctx.actuator);
            }
        }
    }
}

/// Clear healer links naming an attacker that is no longer on the roster,
/// so the healer waits at the fallback and can be paired again.
fn release_orphans(healers: &mut [Agent], attackers: &[Agent]) {
    for healer in healers {
        let Some(partner) = healer.memory.partner else {
            continue;
        };
        if !attackers.iter().any(|attacker| attacker.id == partner) {
            warn!(healer = %healer.name, %partner, "partner gone, clearing stale link");
            healer.memory.partner = None;
        }
    }
}

impl Overlord for DuoOverlord {
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
        let fallback = self.combat.fallback(ctx.rooms);
        let move_options = self.combat.config.move_options;

        let members = std::mem::take(roster);
        let (mut attackers, rest): (Vec<Agent>, Vec<Agent>) = members
            .into_iter()
            .partition(|agent| ctx.duty_of(agent) == Some(Duty::Combat));
        let (mut healers, others): (Vec<Agent>, Vec<Agent>) = rest
            .into_iter()
            .partition(|agent| ctx.duty_of(agent) == Some(Duty::Medic));
        release_orphans(&mut healers, &attackers);

        for attacker in &mut attackers {
            if attacker.is_spawning() {
                continue;
            }
            match self.combat.find_partner(attacker, &mut healers) {
                Some(healer) => self.lead(ctx, attacker, healer, fallback),
                None => {
                    ctx.actuator.travel_to(attacker, &fallback, &move_options);
                }
            }
        }

        let world = ctx.world;
        for healer in &healers {
            if healer.is_spawning() {
                continue;
            }
            if healer.memory.partner.is_none() {
                ctx.actuator.travel_to(healer, &fallback, &move_options);
                continue;
            }
            if let Some(room) = world.room(healer.room()) {
                self.combat.medic_actions(healer, room, ctx.actuator);
            }
        }

        let agents = count(attackers.len().saturating_add(healers.len()));
        roster.extend(attackers);
        roster.extend(healers);
        roster.extend(others);

        OverlordReport {
            agents,
            tasks_dropped: 0,
        }
    }
}
