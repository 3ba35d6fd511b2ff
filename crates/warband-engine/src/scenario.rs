//! Seeded skirmish scenario.
//!
//! Two rooms side by side. The home room holds our damaged walls and
//! ramparts, workers to fortify them, a guard post with its medic, and one
//! raider that slipped in. The target room to the east holds a hostile
//! tower, a spawn, and a couple of defenders. Attacker/healer duos start at
//! home and push east.
//!
//! Every identifier is drawn from the seeded generator, so two runs with the
//! same seed produce the same agents and a persisted memory store from one
//! run still matches the next.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::info;
use uuid::Uuid;
use warband_agents::{Agent, pad_left};
use warband_core::{
    Directive, DuoOverlord, FortifyOverlord, GuardOverlord, MemoryStore, SimulationConfig,
    SimulationState,
};
use warband_types::{AgentId, AgentMemory, ObjectId, Position, RoomName, StructureType};
use warband_world::{Body, RoomView, Structure, Unit, World};

use crate::error::EngineError;

/// Our room.
pub const HOME: RoomName = RoomName::from_coords(0, 0);

/// The room under siege.
pub const TARGET: RoomName = RoomName::from_coords(1, 0);

/// Attacker/healer pairs seeded at home.
const DUO_COUNT: u8 = 2;

/// Workers assigned to fortification.
const WORKER_COUNT: u8 = 3;

/// Hit points per body part.
const HITS_PER_PART: u32 = 100;

/// Energy a single carry part holds.
pub const CARRY_CAPACITY: u32 = 50;

/// Maximum hits of walls and ramparts in the scenario.
const BARRIER_HITS_MAX: u32 = 300_000;

/// Build the scenario's state with its overlords attached.
///
/// Loads the memory store from `config.memory.path` when one is set.
///
/// # Errors
///
/// Returns [`EngineError::World`] if the world snapshot cannot be assembled,
/// or [`EngineError::Memory`] if an existing memory file cannot be read.
pub fn build(config: &SimulationConfig) -> Result<SimulationState, EngineError> {
    let mut rng = SmallRng::seed_from_u64(config.simulation.seed);

    let mut home = RoomView::new(HOME);
    let mut target = RoomView::new(TARGET);
    let mut agents = Vec::new();

    fortifications(&mut rng, &mut home);
    home.hostiles.push(unit(
        &mut rng,
        Position::new(38, 36, HOME),
        1500,
        Body {
            attack: 3,
            moves: 3,
            tough: 6,
            ..Body::default()
        },
    ));

    target.hostile_structures.push(structure(
        &mut rng,
        StructureType::Tower,
        Position::new(30, 25, TARGET),
        3000,
        3000,
    ));
    target.hostile_structures.push(structure(
        &mut rng,
        StructureType::Spawn,
        Position::new(35, 30, TARGET),
        5000,
        5000,
    ));
    for _ in 0..2 {
        let pos = Position::new(rng.random_range(24..36), rng.random_range(20..32), TARGET);
        let defender = unit(
            &mut rng,
            pos,
            1500,
            Body {
                attack: 4,
                moves: 4,
                tough: 7,
                ..Body::default()
            },
        );
        target.hostiles.push(defender);
    }

    for n in 1..=WORKER_COUNT {
        let pos = Position::new(rng.random_range(18..28), rng.random_range(13..17), HOME);
        let body = Body {
            work: 4,
            carry: 2,
            moves: 3,
            ..Body::default()
        };
        let mut worker = agent(&mut rng, "Mason", n, "worker", "base/fortify", pos, body);
        worker.unit.energy = u32::from(body.carry).saturating_mul(CARRY_CAPACITY);
        agents.push(worker);
    }

    agents.push(agent(
        &mut rng,
        "Warden",
        1,
        "guard",
        "base/guard",
        Position::new(30, 30, HOME),
        fighter(),
    ));
    agents.push(agent(
        &mut rng,
        "Mender",
        1,
        "healer",
        "base/guard",
        Position::new(29, 31, HOME),
        medic(),
    ));

    for n in 1..=DUO_COUNT {
        let y = 18_u8.saturating_add(n.saturating_mul(4));
        agents.push(agent(
            &mut rng,
            "Breaker",
            n,
            "destroyer",
            "siege/duo",
            Position::new(40, y, HOME),
            fighter(),
        ));
        agents.push(agent(
            &mut rng,
            "Medic",
            n,
            "healer",
            "siege/duo",
            Position::new(39, y, HOME),
            medic(),
        ));
    }

    home.allies.extend(
        agents
            .iter()
            .filter(|agent| agent.room() == HOME)
            .map(|agent| agent.unit.clone()),
    );

    let mut world = World::new();
    world.insert_room(home)?;
    world.insert_room(target)?;

    info!(
        seed = config.simulation.seed,
        agents = agents.len(),
        rooms = world.rooms().count(),
        "Scenario seeded"
    );

    let mut state = SimulationState::new(world, agents);
    if let Some(path) = &config.memory.path {
        state.memory = MemoryStore::load(path)?;
        state.memory_path = Some(path.clone());
        info!(path = %path.display(), records = state.memory.agent_count(), "Memory store loaded");
    }

    let siege = Directive::new("siege", Position::new(10, 25, TARGET));
    let base = Directive::new("base", Position::new(25, 25, HOME));
    state.add_overlord(DuoOverlord::new(siege, config.combat.clone()));
    state.add_overlord(GuardOverlord::new(base.clone(), config.combat.clone()));
    state.add_overlord(FortifyOverlord::new(base, config.fortify.clone()));
    Ok(state)
}

/// Damaged walls and ramparts across the home room's northern approach,
/// plus a worn road and our own tower.
fn fortifications(rng: &mut SmallRng, room: &mut RoomView) {
    for x in 18..24_u8 {
        let hits = rng.random_range(5_000..150_000);
        let rampart = structure(
            rng,
            StructureType::Rampart,
            Position::new(x, 10, HOME),
            hits,
            BARRIER_HITS_MAX,
        );
        room.structures.push(rampart);
    }
    for x in 19..23_u8 {
        let hits = rng.random_range(1_000..80_000);
        let wall = structure(
            rng,
            StructureType::Wall,
            Position::new(x, 8, HOME),
            hits,
            BARRIER_HITS_MAX,
        );
        room.structures.push(wall);
    }
    let road = structure(rng, StructureType::Road, Position::new(15, 15, HOME), 2000, 5000);
    let tower = structure(rng, StructureType::Tower, Position::new(25, 20, HOME), 1500, 3000);
    room.structures.push(road);
    room.structures.push(tower);
}

fn fighter() -> Body {
    Body {
        attack: 10,
        tough: 5,
        moves: 10,
        ..Body::default()
    }
}

fn medic() -> Body {
    Body {
        heal: 8,
        moves: 8,
        ..Body::default()
    }
}

fn next_uuid(rng: &mut SmallRng) -> Uuid {
    uuid::Builder::from_random_bytes(rng.random()).into_uuid()
}

fn body_hits(body: &Body) -> u32 {
    let parts = [
        body.attack,
        body.ranged_attack,
        body.heal,
        body.work,
        body.carry,
        body.moves,
        body.tough,
    ]
    .into_iter()
    .fold(0_u32, |sum, n| sum.saturating_add(u32::from(n)));
    parts.saturating_mul(HITS_PER_PART)
}

fn unit(rng: &mut SmallRng, pos: Position, ticks_to_live: u32, body: Body) -> Unit {
    let mut unit = Unit::new(pos, body_hits(&body), ticks_to_live, body);
    unit.id = ObjectId(next_uuid(rng));
    unit
}

fn structure(
    rng: &mut SmallRng,
    structure_type: StructureType,
    pos: Position,
    hits: u32,
    hits_max: u32,
) -> Structure {
    let mut structure = Structure::new(structure_type, pos, hits, hits_max);
    structure.id = ObjectId(next_uuid(rng));
    structure
}

fn agent(
    rng: &mut SmallRng,
    prefix: &str,
    n: u8,
    role: &str,
    overlord: &str,
    pos: Position,
    body: Body,
) -> Agent {
    let id = AgentId(next_uuid(rng));
    let name = format!("{prefix}{}", pad_left(&n.to_string(), 2, '0'));
    let ticks_to_live = rng.random_range(1200..1500);
    Agent::new(
        id,
        name,
        unit(rng, pos, ticks_to_live, body),
        AgentMemory::new(role, overlord),
    )
}
