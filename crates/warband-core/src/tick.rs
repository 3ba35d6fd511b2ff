//! Tick cycle: one synchronous decision pass over every agent.
//!
//! Each tick runs through these phases:
//!
//! 1. **Load** -- advance the tick counter and overlay each agent's persisted
//!    memory from the [`MemoryStore`]; agents new to the store keep the
//!    memory they were created with.
//! 2. **Rank** -- enqueue every overlord into a [`PriorityQueue`] by its
//!    [`Priority`](warband_types::Priority).
//! 3. **Decide** -- drain the queue; each overlord restores its own memory,
//!    takes the agents whose memory names it as its roster, and issues
//!    intents through the actuator.
//! 4. **Persist** -- write agent and overlord memory back to the store,
//!    prune records of agents that are gone, and save the store to disk
//!    when a path is configured.
//!
//! Nothing in the decide phase can fail: missing targets, partners, and
//! rooms are ordinary outcomes. Only persistence returns errors.

use std::collections::BTreeSet;
use std::path::PathBuf;

use tracing::{debug, info, warn};
use warband_agents::{Actuator, Agent, Pipeline, RoleTable};
use warband_types::{ActionResult, AgentId, Direction, Position, TravelOptions};
use warband_world::{OpenTerrain, Reachability, RoomCoordinates, Target, World, WorldGrid};

use crate::memory_store::{MemoryError, MemoryStore};
use crate::overlord::{Overlord, TickContext};
use crate::priority::PriorityQueue;

/// Errors that can occur during tick execution.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// The tick counter cannot advance any further.
    #[error("tick counter overflow")]
    TickOverflow,

    /// Persisting memory failed.
    #[error("memory persistence failed: {source}")]
    Memory {
        /// The underlying memory store error.
        #[from]
        source: MemoryError,
    },
}

/// Summary of a single tick's execution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickSummary {
    /// The tick number that was executed.
    pub tick: u64,
    /// Overlords that ran.
    pub overlords_run: u32,
    /// Agents given a decision by some overlord.
    pub agents_processed: u32,
    /// Agents whose memory names no known overlord.
    pub agents_unassigned: u32,
    /// Intents accepted by the actuator.
    pub intents_issued: u32,
    /// Tasks dropped because they failed a validity check.
    pub tasks_dropped: u32,
}

/// The mutable state carried from tick to tick.
pub struct SimulationState {
    /// Last completed tick; 0 before the first.
    pub tick: u64,
    /// This tick's snapshot, refreshed by the host between ticks.
    pub world: World,
    /// Every agent, in processing order.
    pub agents: Vec<Agent>,
    /// Every overlord.
    pub overlords: Vec<Box<dyn Overlord>>,
    /// Durable memory.
    pub memory: MemoryStore,
    /// Role tag lookup.
    pub roles: RoleTable,
    /// Path reachability oracle.
    pub reachability: Box<dyn Reachability>,
    /// Room-to-room coordinate translator.
    pub rooms: Box<dyn RoomCoordinates>,
    /// Where to save memory after each tick, if anywhere.
    pub memory_path: Option<PathBuf>,
}

impl SimulationState {
    /// State over open terrain on an unbounded room grid, with in-process
    /// memory and the built-in roles.
    pub fn new(world: World, agents: Vec<Agent>) -> Self {
        Self {
            tick: 0,
            world,
            agents,
            overlords: Vec::new(),
            memory: MemoryStore::new(),
            roles: RoleTable::new(),
            reachability: Box::new(OpenTerrain),
            rooms: Box::new(WorldGrid::unbounded()),
            memory_path: None,
        }
    }

    /// Attach an overlord.
    pub fn add_overlord(&mut self, overlord: impl Overlord + 'static) {
        self.overlords.push(Box::new(overlord));
    }

    /// Look up an agent by identity.
    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.iter().find(|agent| agent.id == id)
    }
}

/// Execute one complete tick.
///
/// # Errors
///
/// Returns [`TickError::TickOverflow`] if the tick counter is exhausted, or
/// [`TickError::Memory`] if saving memory to disk fails. Decisions made
/// before a save failure have already been issued.
pub fn run_tick(
    state: &mut SimulationState,
    actuator: &mut dyn Actuator,
) -> Result<TickSummary, TickError> {
    // --- Phase 1: Load ---
    let tick = state.tick.checked_add(1).ok_or(TickError::TickOverflow)?;
    state.tick = tick;
    for agent in &mut state.agents {
        if let Some(memory) = state.memory.agent(agent.id) {
            agent.memory.clone_from(memory);
        }
        if state.roles.resolve(&agent.memory.role).is_none() {
            warn!(tick, agent = %agent.name, role = %agent.memory.role, "unknown role tag");
        }
    }

    // --- Phase 2: Rank ---
    let queue: PriorityQueue<usize> = state
        .overlords
        .iter()
        .enumerate()
        .map(|(index, overlord)| (overlord.priority(), index))
        .collect();

    // --- Phase 3: Decide ---
    let mut counter = CountingActuator::new(actuator);
    let mut summary = TickSummary {
        tick,
        ..TickSummary::default()
    };
    let mut remaining = std::mem::take(&mut state.agents);
    let mut processed: Vec<Agent> = Vec::with_capacity(remaining.len());

    for index in queue.into_ordered() {
        let Some(overlord) = state.overlords.get_mut(index) else {
            continue;
        };
        if let Some(memory) = state.memory.overlord(overlord.name()) {
            overlord.restore(memory.clone());
        }

        let (mut roster, rest): (Vec<Agent>, Vec<Agent>) = remaining
            .into_iter()
            .partition(|agent| agent.memory.overlord.as_deref() == Some(overlord.name()));
        remaining = rest;

        let mut ctx = TickContext {
            tick,
            world: &state.world,
            actuator: &mut counter,
            reachability: state.reachability.as_ref(),
            rooms: state.rooms.as_ref(),
            roles: &state.roles,
        };
        let report = overlord.run(&mut ctx, &mut roster);
        debug!(
            tick,
            overlord = overlord.name(),
            agents = report.agents,
            tasks_dropped = report.tasks_dropped,
            "overlord ran"
        );

        summary.overlords_run = summary.overlords_run.saturating_add(1);
        summary.agents_processed = summary.agents_processed.saturating_add(report.agents);
        summary.tasks_dropped = summary.tasks_dropped.saturating_add(report.tasks_dropped);
        state
            .memory
            .set_overlord(overlord.name(), overlord.memory().clone());
        processed.append(&mut roster);
    }

    summary.agents_unassigned = u32::try_from(remaining.len()).unwrap_or(u32::MAX);
    summary.intents_issued = counter.issued;
    processed.append(&mut remaining);
    state.agents = processed;

    // --- Phase 4: Persist ---
    let live: BTreeSet<AgentId> = state.agents.iter().map(|agent| agent.id).collect();
    for agent in &state.agents {
        state.memory.set_agent(agent.id, agent.memory.clone());
    }
    state.memory.prune(&live);
    if let Some(path) = &state.memory_path {
        state.memory.save(path)?;
    }

    info!(
        tick,
        overlords = summary.overlords_run,
        agents = summary.agents_processed,
        unassigned = summary.agents_unassigned,
        intents = summary.intents_issued,
        tasks_dropped = summary.tasks_dropped,
        "Tick completed"
    );
    Ok(summary)
}

/// Passes every call through and counts the ones that succeed.
struct CountingActuator<'a> {
    inner: &'a mut dyn Actuator,
    issued: u32,
}

impl<'a> CountingActuator<'a> {
    fn new(inner: &'a mut dyn Actuator) -> Self {
        Self { inner, issued: 0 }
    }

    fn tally(&mut self, result: ActionResult) -> ActionResult {
        if result.is_ok() {
            self.issued = self.issued.saturating_add(1);
        }
        result
    }
}

impl Actuator for CountingActuator<'_> {
    fn travel_to(&mut self, agent: &Agent, destination: &Position, options: &TravelOptions) -> ActionResult {
        let result = self.inner.travel_to(agent, destination, options);
        self.tally(result)
    }

    fn move_dir(&mut self, agent: &Agent, direction: Direction) -> ActionResult {
        let result = self.inner.move_dir(agent, direction);
        self.tally(result)
    }

    fn move_off_exit_toward(&mut self, agent: &Agent, toward: &Position) -> ActionResult {
        let result = self.inner.move_off_exit_toward(agent, toward);
        self.tally(result)
    }

    fn attack(&mut self, agent: &Agent, target: &Target<'_>) -> ActionResult {
        let result = self.inner.attack(agent, target);
        self.tally(result)
    }

    fn heal(&mut self, agent: &Agent, target: &Target<'_>) -> ActionResult {
        let result = self.inner.heal(agent, target);
        self.tally(result)
    }

    fn ranged_heal(&mut self, agent: &Agent, target: &Target<'_>) -> ActionResult {
        let result = self.inner.ranged_heal(agent, target);
        self.tally(result)
    }

    fn repair(&mut self, agent: &Agent, target: &Target<'_>) -> ActionResult {
        let result = self.inner.repair(agent, target);
        self.tally(result)
    }

    fn park(&mut self, agent: &Agent) -> ActionResult {
        let result = self.inner.park(agent);
        self.tally(result)
    }

    fn can_execute(&self, agent: AgentId, pipeline: Pipeline) -> bool {
        self.inner.can_execute(agent, pipeline)
    }
}
