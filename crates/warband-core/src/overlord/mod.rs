//! Overlords: per-directive controllers that drive a roster of agents.
//!
//! An overlord is attached to one [`Directive`](crate::Directive) and runs
//! once per tick over the agents whose memory names it. Overlords are ranked
//! by [`Priority`] through the tick's [`PriorityQueue`](crate::PriorityQueue),
//! so more urgent missions issue their intents first and win any contested
//! action pipelines.
//!
//! [`CombatOverlord`] is not an overlord itself but the shared combat toolkit
//! (partner matching, targeting, paired movement, fallback) that the combat
//! overlords are composed from.

mod combat;
mod duo;
mod fortify;
mod guard;

use warband_agents::{Actuator, Agent, Duty, RoleTable};
use warband_types::{OverlordMemory, Priority};
use warband_world::{Reachability, RoomCoordinates, RoomView, World};

pub use combat::{CombatOverlord, fallback_position};
pub use duo::DuoOverlord;
pub use fortify::{FortifyConfig, FortifyOverlord};
pub use guard::GuardOverlord;

/// Everything an overlord may consult or drive during a tick.
pub struct TickContext<'a> {
    /// Current tick number.
    pub tick: u64,
    /// This tick's read-only snapshot.
    pub world: &'a World,
    /// Where intents are issued.
    pub actuator: &'a mut dyn Actuator,
    /// Path reachability oracle.
    pub reachability: &'a dyn Reachability,
    /// Room-to-room coordinate translator.
    pub rooms: &'a dyn RoomCoordinates,
    /// Role tag lookup.
    pub roles: &'a RoleTable,
}

impl TickContext<'_> {
    /// The duty of an agent's role, if its tag is known.
    pub fn duty_of(&self, agent: &Agent) -> Option<Duty> {
        self.roles.resolve(&agent.memory.role).map(|role| role.duty())
    }

    /// The snapshot of the agent's room, if it is visible this tick.
    pub fn room_of(&self, agent: &Agent) -> Option<&RoomView> {
        self.world.room(agent.room())
    }
}

/// What an overlord did during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverlordReport {
    /// Roster agents that were given a decision.
    pub agents: u32,
    /// Tasks dropped because they failed a validity check.
    pub tasks_dropped: u32,
}

/// A controller driving a roster of agents toward one directive.
pub trait Overlord {
    /// Unique name; agents join the roster by naming it in memory.
    fn name(&self) -> &str;

    /// Rank of this overlord within a tick.
    fn priority(&self) -> Priority;

    /// Persisted memory to write back after the tick.
    fn memory(&self) -> &OverlordMemory;

    /// Replace in-process memory with the persisted record.
    fn restore(&mut self, memory: OverlordMemory);

    /// Issue this tick's intents for every agent on the roster.
    ///
    /// Roster order may be changed; membership may not.
    fn run(&mut self, ctx: &mut TickContext<'_>, roster: &mut Vec<Agent>) -> OverlordReport;
}

/// Count conversion used by reports.
pub(crate) fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
