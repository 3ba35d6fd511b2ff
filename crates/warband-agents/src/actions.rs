//! The seam between decisions and the world: issuing intents.
//!
//! Every state-changing primitive goes through an [`Actuator`]. The decision
//! layer never mutates the world directly; it issues intents and receives an
//! [`ActionResult`] that it is free to ignore.
//!
//! [`IntentLog`] is the standard actuator. It validates each intent against
//! this tick's snapshot the way the host engine would (range, body parts,
//! fatigue, carried energy), enforces one action per pipeline per agent per
//! tick, and records every accepted intent in order so the host can apply
//! them after the decision pass.

use std::collections::BTreeSet;

use tracing::trace;
use warband_types::{ActionResult, AgentId, Direction, ObjectId, Position, TravelOptions};
use warband_world::Target;

use crate::agent::Agent;

/// Range of a ranged heal.
pub const RANGED_HEAL_RANGE: u32 = 3;

/// Range of a repair.
pub const REPAIR_RANGE: u32 = 3;

/// Action pipelines; an agent can use each at most once per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Pipeline {
    /// Any movement.
    Movement,
    /// Melee attack, heal, repair.
    Melee,
    /// Ranged heal.
    Ranged,
}

/// A state-changing intent issued for an agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Path toward a destination.
    Travel {
        /// Acting agent.
        agent: AgentId,
        /// Where to go.
        destination: Position,
        /// Path options.
        options: TravelOptions,
    },
    /// Single step in a direction.
    Move {
        /// Acting agent.
        agent: AgentId,
        /// Step direction.
        direction: Direction,
    },
    /// Step off an exit tile toward a position.
    MoveOffExit {
        /// Acting agent.
        agent: AgentId,
        /// Position to step toward.
        toward: Position,
    },
    /// Melee attack.
    Attack {
        /// Acting agent.
        agent: AgentId,
        /// Attacked object.
        target: ObjectId,
    },
    /// Adjacent heal.
    Heal {
        /// Acting agent.
        agent: AgentId,
        /// Healed unit.
        target: ObjectId,
    },
    /// Heal at range.
    RangedHeal {
        /// Acting agent.
        agent: AgentId,
        /// Healed unit.
        target: ObjectId,
    },
    /// Repair a structure.
    Repair {
        /// Acting agent.
        agent: AgentId,
        /// Repaired structure.
        target: ObjectId,
    },
    /// Hold position out of the way.
    Park {
        /// Acting agent.
        agent: AgentId,
    },
}

impl Intent {
    /// The agent that issued this intent.
    pub const fn agent(&self) -> AgentId {
        match self {
            Self::Travel { agent, .. }
            | Self::Move { agent, .. }
            | Self::MoveOffExit { agent, .. }
            | Self::Attack { agent, .. }
            | Self::Heal { agent, .. }
            | Self::RangedHeal { agent, .. }
            | Self::Repair { agent, .. }
            | Self::Park { agent } => *agent,
        }
    }

    /// The pipeline this intent occupies.
    pub const fn pipeline(&self) -> Pipeline {
        match self {
            Self::Travel { .. } | Self::Move { .. } | Self::MoveOffExit { .. } | Self::Park { .. } => {
                Pipeline::Movement
            }
            Self::Attack { .. } | Self::Heal { .. } | Self::Repair { .. } => Pipeline::Melee,
            Self::RangedHeal { .. } => Pipeline::Ranged,
        }
    }

    /// Whether this intent moves (or deliberately holds) the agent.
    pub const fn is_movement(&self) -> bool {
        matches!(self.pipeline(), Pipeline::Movement)
    }
}

/// Issues world-mutating primitives on behalf of agents.
pub trait Actuator {
    /// Path toward `destination`.
    fn travel_to(
        &mut self,
        agent: &Agent,
        destination: &Position,
        options: &TravelOptions,
    ) -> ActionResult;

    /// Take a single step in `direction`.
    fn move_dir(&mut self, agent: &Agent, direction: Direction) -> ActionResult;

    /// Step off the exit tile the agent stands on, toward `toward`.
    fn move_off_exit_toward(&mut self, agent: &Agent, toward: &Position) -> ActionResult;

    /// Melee-attack `target`.
    fn attack(&mut self, agent: &Agent, target: &Target<'_>) -> ActionResult;

    /// Heal an adjacent unit.
    fn heal(&mut self, agent: &Agent, target: &Target<'_>) -> ActionResult;

    /// Heal a unit within three tiles.
    fn ranged_heal(&mut self, agent: &Agent, target: &Target<'_>) -> ActionResult;

    /// Repair a structure within three tiles.
    fn repair(&mut self, agent: &Agent, target: &Target<'_>) -> ActionResult;

    /// Hold position out of everyone's way.
    fn park(&mut self, agent: &Agent) -> ActionResult;

    /// Whether `agent` can still use `pipeline` this tick.
    fn can_execute(&self, agent: AgentId, pipeline: Pipeline) -> bool;
}

/// Records intents in issue order and validates them like the host would.
#[derive(Debug, Clone, Default)]
pub struct IntentLog {
    intents: Vec<Intent>,
    used: BTreeSet<(AgentId, Pipeline)>,
}

impl IntentLog {
    /// An empty log.
    pub const fn new() -> Self {
        Self {
            intents: Vec::new(),
            used: BTreeSet::new(),
        }
    }

    /// All accepted intents, in issue order.
    pub fn intents(&self) -> &[Intent] {
        &self.intents
    }

    /// Accepted intents issued by `agent`.
    pub fn for_agent(&self, agent: AgentId) -> impl Iterator<Item = &Intent> {
        self.intents.iter().filter(move |i| i.agent() == agent)
    }

    /// The movement intent issued by `agent`, if any.
    pub fn movement_of(&self, agent: AgentId) -> Option<&Intent> {
        self.for_agent(agent).find(|i| i.is_movement())
    }

    /// Number of accepted intents.
    pub fn len(&self) -> usize {
        self.intents.len()
    }

    /// Whether no intent was accepted.
    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }

    /// Take all accepted intents, resetting the log for the next tick.
    pub fn drain(&mut self) -> Vec<Intent> {
        self.used.clear();
        std::mem::take(&mut self.intents)
    }

    fn record(&mut self, intent: Intent) -> ActionResult {
        let key = (intent.agent(), intent.pipeline());
        if self.used.contains(&key) {
            trace!(agent = %key.0, pipeline = ?key.1, "pipeline already used this tick");
            return ActionResult::Busy;
        }
        self.used.insert(key);
        self.intents.push(intent);
        ActionResult::Ok
    }

    fn check_movement(agent: &Agent) -> Result<(), ActionResult> {
        if agent.is_spawning() {
            return Err(ActionResult::Busy);
        }
        if agent.unit.body.moves == 0 {
            return Err(ActionResult::NoBodypart);
        }
        if agent.fatigue() > 0 {
            return Err(ActionResult::Tired);
        }
        Ok(())
    }
}

impl Actuator for IntentLog {
    fn travel_to(
        &mut self,
        agent: &Agent,
        destination: &Position,
        options: &TravelOptions,
    ) -> ActionResult {
        if let Err(result) = Self::check_movement(agent) {
            return result;
        }
        if agent.pos() == *destination {
            return ActionResult::Ok;
        }
        self.record(Intent::Travel {
            agent: agent.id,
            destination: *destination,
            options: *options,
        })
    }

    fn move_dir(&mut self, agent: &Agent, direction: Direction) -> ActionResult {
        if let Err(result) = Self::check_movement(agent) {
            return result;
        }
        self.record(Intent::Move {
            agent: agent.id,
            direction,
        })
    }

    fn move_off_exit_toward(&mut self, agent: &Agent, toward: &Position) -> ActionResult {
        if let Err(result) = Self::check_movement(agent) {
            return result;
        }
        if !agent.pos().is_edge() {
            return ActionResult::InvalidArgs;
        }
        self.record(Intent::MoveOffExit {
            agent: agent.id,
            toward: *toward,
        })
    }

    fn attack(&mut self, agent: &Agent, target: &Target<'_>) -> ActionResult {
        if agent.unit.body.attack == 0 {
            return ActionResult::NoBodypart;
        }
        if !agent.pos().is_near_to(&target.pos()) {
            return ActionResult::NotInRange;
        }
        self.record(Intent::Attack {
            agent: agent.id,
            target: target.id(),
        })
    }

    fn heal(&mut self, agent: &Agent, target: &Target<'_>) -> ActionResult {
        if agent.unit.body.heal == 0 {
            return ActionResult::NoBodypart;
        }
        if !matches!(target, Target::Unit(_)) {
            return ActionResult::InvalidTarget;
        }
        if !agent.pos().is_near_to(&target.pos()) {
            return ActionResult::NotInRange;
        }
        self.record(Intent::Heal {
            agent: agent.id,
            target: target.id(),
        })
    }

    fn ranged_heal(&mut self, agent: &Agent, target: &Target<'_>) -> ActionResult {
        if agent.unit.body.heal == 0 {
            return ActionResult::NoBodypart;
        }
        if !matches!(target, Target::Unit(_)) {
            return ActionResult::InvalidTarget;
        }
        if agent.range_to(&target.pos()) > RANGED_HEAL_RANGE {
            return ActionResult::NotInRange;
        }
        self.record(Intent::RangedHeal {
            agent: agent.id,
            target: target.id(),
        })
    }

    fn repair(&mut self, agent: &Agent, target: &Target<'_>) -> ActionResult {
        if agent.unit.body.work == 0 {
            return ActionResult::NoBodypart;
        }
        if agent.unit.energy == 0 {
            return ActionResult::NotEnoughResources;
        }
        if !matches!(target, Target::Structure(_)) {
            return ActionResult::InvalidTarget;
        }
        if agent.range_to(&target.pos()) > REPAIR_RANGE {
            return ActionResult::NotInRange;
        }
        self.record(Intent::Repair {
            agent: agent.id,
            target: target.id(),
        })
    }

    fn park(&mut self, agent: &Agent) -> ActionResult {
        self.record(Intent::Park { agent: agent.id })
    }

    fn can_execute(&self, agent: AgentId, pipeline: Pipeline) -> bool {
        !self.used.contains(&(agent, pipeline))
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Builders shared by this crate's unit tests.

    use warband_types::{AgentMemory, RoomName};
    use warband_world::{Body, Unit};

    use super::*;

    pub fn home() -> RoomName {
        RoomName::from_coords(0, 0)
    }

    pub fn at(x: u8, y: u8) -> Position {
        Position::new(x, y, home())
    }

    pub fn fighter() -> Body {
        Body {
            attack: 5,
            heal: 2,
            moves: 5,
            tough: 2,
            ..Body::default()
        }
    }

    pub fn agent_at(pos: Position, role: &str) -> Agent {
        let unit = Unit::new(pos, 1000, 1500, fighter());
        Agent::new(AgentId::new(), role, unit, AgentMemory::new(role, "test"))
    }

    pub fn agent_with_ttl(role: &str, ticks_to_live: u32) -> Agent {
        let mut agent = agent_at(at(25, 25), role);
        agent.unit.ticks_to_live = Some(ticks_to_live);
        agent
    }

    /// Records every primitive call, accepted or not, and always succeeds.
    #[derive(Debug, Default)]
    pub struct Spy {
        pub calls: Vec<(AgentId, &'static str, Option<Position>)>,
    }

    impl Spy {
        pub fn calls_for(&self, agent: AgentId) -> Vec<&'static str> {
            self.calls
                .iter()
                .filter(|(id, _, _)| *id == agent)
                .map(|(_, name, _)| *name)
                .collect()
        }

        pub fn destination_of(&self, agent: AgentId) -> Option<Position> {
            self.calls
                .iter()
                .find(|(id, _, _)| *id == agent)
                .and_then(|(_, _, pos)| *pos)
        }

        fn push(&mut self, agent: &Agent, name: &'static str, pos: Option<Position>) -> ActionResult {
            self.calls.push((agent.id, name, pos));
            ActionResult::Ok
        }
    }

    impl Actuator for Spy {
        fn travel_to(&mut self, agent: &Agent, destination: &Position, _: &TravelOptions) -> ActionResult {
            self.push(agent, "travel_to", Some(*destination))
        }
        fn move_dir(&mut self, agent: &Agent, _: Direction) -> ActionResult {
            self.push(agent, "move_dir", None)
        }
        fn move_off_exit_toward(&mut self, agent: &Agent, toward: &Position) -> ActionResult {
            self.push(agent, "move_off_exit_toward", Some(*toward))
        }
        fn attack(&mut self, agent: &Agent, target: &Target<'_>) -> ActionResult {
            self.push(agent, "attack", Some(target.pos()))
        }
        fn heal(&mut self, agent: &Agent, target: &Target<'_>) -> ActionResult {
            self.push(agent, "heal", Some(target.pos()))
        }
        fn ranged_heal(&mut self, agent: &Agent, target: &Target<'_>) -> ActionResult {
            self.push(agent, "ranged_heal", Some(target.pos()))
        }
        fn repair(&mut self, agent: &Agent, target: &Target<'_>) -> ActionResult {
            self.push(agent, "repair", Some(target.pos()))
        }
        fn park(&mut self, agent: &Agent) -> ActionResult {
            self.push(agent, "park", None)
        }
        fn can_execute(&self, _: AgentId, _: Pipeline) -> bool {
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use warband_world::{Body, Structure, Unit};
    use warband_types::StructureType;

    use super::test_support::*;
    use super::*;

    #[test]
    fn one_action_per_pipeline_per_tick() {
        let mut log = IntentLog::new();
        let agent = agent_at(at(10, 10), "guard");
        let dest = at(20, 20);

        assert_eq!(log.travel_to(&agent, &dest, &TravelOptions::default()), ActionResult::Ok);
        assert_eq!(log.move_dir(&agent, Direction::Top), ActionResult::Busy);
        assert!(!log.can_execute(agent.id, Pipeline::Movement));
        assert!(log.can_execute(agent.id, Pipeline::Melee));
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn fatigued_agents_cannot_move() {
        let mut log = IntentLog::new();
        let mut agent = agent_at(at(10, 10), "guard");
        agent.unit.fatigue = 2;
        assert_eq!(log.move_dir(&agent, Direction::Left), ActionResult::Tired);
        assert!(log.is_empty());
    }

    #[test]
    fn melee_actions_check_range_and_parts() {
        let mut log = IntentLog::new();
        let agent = agent_at(at(10, 10), "guard");
        let far = Unit::new(at(13, 10), 100, 100, Body::default());
        let near = Unit::new(at(11, 11), 100, 100, Body::default());

        assert_eq!(log.attack(&agent, &Target::Unit(&far)), ActionResult::NotInRange);
        assert_eq!(log.attack(&agent, &Target::Unit(&near)), ActionResult::Ok);
        assert_eq!(log.heal(&agent, &Target::Unit(&near)), ActionResult::Busy);
        assert_eq!(log.ranged_heal(&agent, &Target::Unit(&far)), ActionResult::Ok);

        let mut pacifist = agent_at(at(10, 10), "scout");
        pacifist.unit.body = Body::default();
        assert_eq!(log.attack(&pacifist, &Target::Unit(&near)), ActionResult::NoBodypart);
    }

    #[test]
    fn repair_needs_energy() {
        let mut log = IntentLog::new();
        let mut worker = agent_at(at(10, 10), "worker");
        worker.unit.body.work = 2;
        let wall = Structure::new(StructureType::Wall, at(12, 12), 10, 1000);

        assert_eq!(
            log.repair(&worker, &Target::Structure(&wall)),
            ActionResult::NotEnoughResources
        );
        worker.unit.energy = 50;
        assert_eq!(log.repair(&worker, &Target::Structure(&wall)), ActionResult::Ok);
    }

    #[test]
    fn drain_resets_pipelines() {
        let mut log = IntentLog::new();
        let agent = agent_at(at(10, 10), "guard");
        log.park(&agent);
        assert_eq!(log.drain().len(), 1);
        assert!(log.can_execute(agent.id, Pipeline::Movement));
        assert!(log.movement_of(agent.id).is_none());
    }
}
