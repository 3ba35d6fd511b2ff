//! Stand-in game server.
//!
//! [`SkirmishHost`] is the [`TickCallback`] that closes the loop between
//! ticks: it applies the intents the overlords issued to the world snapshot,
//! lets hostile towers and defenders fire back, ages every allied unit,
//! clears out the dead, and refreshes each agent's unit from the world so
//! the next tick decides against the new state.
//!
//! The rules are a small subset of the real game: one tile per movement
//! intent onto a tile no other unit stands on, and flat per-part damage,
//! healing, and repair. There is no fatigue and no terrain.

use std::collections::BTreeMap;

use tracing::{debug, info};
use warband_agents::{Intent, pad_left, pad_right, to_percent};
use warband_core::{SimulationState, TickCallback, TickSummary};
use warband_types::{AgentId, Direction, ObjectId, Position, ROOM_SIZE, RoomName, StructureType};
use warband_world::{Unit, World, closest_by_range};

use crate::scenario::CARRY_CAPACITY;

/// Damage per attack part.
pub const ATTACK_POWER: u32 = 30;

/// Hits restored per heal part on an adjacent target.
pub const HEAL_POWER: u32 = 12;

/// Hits restored per heal part at range.
pub const RANGED_HEAL_POWER: u32 = 4;

/// Hits restored per work part. Each part spends one energy.
pub const REPAIR_POWER: u32 = 100;

/// Damage a hostile tower deals to the closest ally in its room.
pub const TOWER_POWER: u32 = 150;

/// What the host applied over one tick, or accumulated over a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Effects {
    /// Tiles stepped.
    pub steps: u32,
    /// Damage dealt by our agents.
    pub damage_dealt: u32,
    /// Damage taken from hostiles.
    pub damage_taken: u32,
    /// Hits restored to allies.
    pub healed: u32,
    /// Hits restored to structures.
    pub repaired: u32,
    /// Hostile units and structures destroyed.
    pub destroyed: u32,
    /// Agents lost to damage or old age.
    pub casualties: u32,
}

impl Effects {
    /// Fold another tick's effects into this total.
    pub const fn accumulate(&mut self, other: &Self) {
        self.steps = self.steps.saturating_add(other.steps);
        self.damage_dealt = self.damage_dealt.saturating_add(other.damage_dealt);
        self.damage_taken = self.damage_taken.saturating_add(other.damage_taken);
        self.healed = self.healed.saturating_add(other.healed);
        self.repaired = self.repaired.saturating_add(other.repaired);
        self.destroyed = self.destroyed.saturating_add(other.destroyed);
        self.casualties = self.casualties.saturating_add(other.casualties);
    }
}

/// Applies each tick's intents and logs one status line per tick.
#[derive(Debug, Clone, Default)]
pub struct SkirmishHost {
    totals: Effects,
}

impl SkirmishHost {
    /// A host with nothing applied yet.
    pub const fn new() -> Self {
        Self {
            totals: Effects {
                steps: 0,
                damage_dealt: 0,
                damage_taken: 0,
                healed: 0,
                repaired: 0,
                destroyed: 0,
                casualties: 0,
            },
        }
    }

    /// Everything applied so far.
    pub const fn totals(&self) -> Effects {
        self.totals
    }
}

impl TickCallback for SkirmishHost {
    fn on_tick(&mut self, summary: &TickSummary, state: &mut SimulationState, intents: &[Intent]) {
        let effects = apply_tick(state, intents);
        self.totals.accumulate(&effects);

        info!(
            status = %status_line(summary, state),
            steps = effects.steps,
            damage_dealt = effects.damage_dealt,
            damage_taken = effects.damage_taken,
            healed = effects.healed,
            repaired = effects.repaired,
            destroyed = effects.destroyed,
            casualties = effects.casualties,
            "Tick applied"
        );
    }
}

/// Apply one tick's intents, in issue order, then run the world's response.
pub fn apply_tick(state: &mut SimulationState, intents: &[Intent]) -> Effects {
    let units: BTreeMap<AgentId, ObjectId> = state
        .agents
        .iter()
        .map(|agent| (agent.id, agent.unit.id))
        .collect();

    let mut effects = Effects::default();
    for intent in intents {
        if let Some(&unit) = units.get(&intent.agent()) {
            apply_intent(&mut state.world, unit, intent, &mut effects);
        }
    }

    effects.damage_taken = hostile_fire(&mut state.world);
    effects.destroyed = clear_destroyed(&mut state.world);
    age_allies(&mut state.world);

    let world = &state.world;
    state.agents.retain_mut(|agent| match world.unit(agent.unit.id) {
        Some(unit) => {
            agent.unit.clone_from(unit);
            true
        }
        None => {
            info!(agent = %agent.name, "Agent lost");
            effects.casualties = effects.casualties.saturating_add(1);
            false
        }
    });
    effects
}

/// The tile one step from `pos` in `direction`, crossing into the
/// neighbouring room at an edge.
pub fn step(pos: Position, direction: Direction) -> Option<Position> {
    let (dx, dy) = direction.delta();
    let x = pos.world_x().checked_add(i64::from(dx))?;
    let y = pos.world_y().checked_add(i64::from(dy))?;
    let room = RoomName::from_coords(
        i32::try_from(x.checked_div_euclid(ROOM_SIZE)?).ok()?,
        i32::try_from(y.checked_div_euclid(ROOM_SIZE)?).ok()?,
    );
    Some(Position::new(
        u8::try_from(x.checked_rem_euclid(ROOM_SIZE)?).ok()?,
        u8::try_from(y.checked_rem_euclid(ROOM_SIZE)?).ok()?,
        room,
    ))
}

fn apply_intent(world: &mut World, unit: ObjectId, intent: &Intent, effects: &mut Effects) {
    let Some(actor) = world.unit(unit).cloned() else {
        return;
    };

    match intent {
        Intent::Travel { destination, .. } => {
            if let Some(direction) = actor.pos.direction_to(destination) {
                move_unit(world, unit, direction, effects);
            }
        }
        Intent::MoveOffExit { toward, .. } => {
            if let Some(direction) = actor.pos.direction_to(toward) {
                move_unit(world, unit, direction, effects);
            }
        }
        Intent::Move { direction, .. } => move_unit(world, unit, *direction, effects),
        Intent::Attack { target, .. } => {
            let damage = u32::from(actor.body.attack).saturating_mul(ATTACK_POWER);
            let dealt = damage_object(world, *target, damage);
            effects.damage_dealt = effects.damage_dealt.saturating_add(dealt);
        }
        Intent::Heal { target, .. } => {
            let amount = u32::from(actor.body.heal).saturating_mul(HEAL_POWER);
            effects.healed = effects.healed.saturating_add(heal_ally(world, *target, amount));
        }
        Intent::RangedHeal { target, .. } => {
            let amount = u32::from(actor.body.heal).saturating_mul(RANGED_HEAL_POWER);
            effects.healed = effects.healed.saturating_add(heal_ally(world, *target, amount));
        }
        Intent::Repair { target, .. } => {
            let parts = u32::from(actor.body.work).min(actor.energy);
            let restored = repair_structure(world, *target, parts.saturating_mul(REPAIR_POWER));
            if let Some(ally) = ally_mut(world, unit) {
                ally.energy = ally.energy.saturating_sub(parts);
            }
            effects.repaired = effects.repaired.saturating_add(restored);
        }
        Intent::Park { .. } => {}
    }
}

fn ally_mut(world: &mut World, id: ObjectId) -> Option<&mut Unit> {
    world
        .rooms_mut()
        .find_map(|room| room.allies.iter_mut().find(|unit| unit.id == id))
}

fn occupied(world: &World, pos: Position) -> bool {
    world.room(pos.room).is_some_and(|room| {
        room.allies
            .iter()
            .chain(room.hostiles.iter())
            .any(|unit| unit.pos == pos)
    })
}

fn move_unit(world: &mut World, id: ObjectId, direction: Direction, effects: &mut Effects) {
    let Some(next) = world.unit(id).and_then(|unit| step(unit.pos, direction)) else {
        return;
    };
    if occupied(world, next) {
        debug!(unit = %id, to = %next, "step blocked");
        return;
    }
    let Some(unit) = ally_mut(world, id) else {
        return;
    };
    let from = unit.pos.room;
    unit.pos = next;
    effects.steps = effects.steps.saturating_add(1);

    if next.room != from {
        let moved = world.room_mut(from).ok().and_then(|room| {
            let index = room.allies.iter().position(|unit| unit.id == id)?;
            Some(room.allies.remove(index))
        });
        if let Some(unit) = moved {
            debug!(unit = %unit.id, from = %from, to = %next.room, "unit changed rooms");
            world.room_or_insert(next.room).allies.push(unit);
        }
    }
}

/// Subtract up to `amount` hits from any unit or structure. Returns the
/// damage actually dealt.
fn damage_object(world: &mut World, id: ObjectId, amount: u32) -> u32 {
    for room in world.rooms_mut() {
        if let Some(unit) = room
            .hostiles
            .iter_mut()
            .chain(room.allies.iter_mut())
            .find(|unit| unit.id == id)
        {
            let dealt = amount.min(unit.hits);
            unit.hits = unit.hits.saturating_sub(dealt);
            return dealt;
        }
        if let Some(structure) = room
            .hostile_structures
            .iter_mut()
            .chain(room.structures.iter_mut())
            .find(|structure| structure.id == id)
        {
            let dealt = amount.min(structure.hits);
            structure.hits = structure.hits.saturating_sub(dealt);
            return dealt;
        }
    }
    0
}

fn heal_ally(world: &mut World, id: ObjectId, amount: u32) -> u32 {
    let Some(ally) = ally_mut(world, id) else {
        return 0;
    };
    let restored = amount.min(ally.hits_max.saturating_sub(ally.hits));
    ally.hits = ally.hits.saturating_add(restored);
    restored
}

fn repair_structure(world: &mut World, id: ObjectId, amount: u32) -> u32 {
    let Some(structure) = world
        .rooms_mut()
        .find_map(|room| room.structures.iter_mut().find(|s| s.id == id))
    else {
        return 0;
    };
    let restored = amount.min(structure.hits_max.saturating_sub(structure.hits));
    structure.hits = structure.hits.saturating_add(restored);
    restored
}

/// Hostile towers hit the closest ally in their room; hostile units hit an
/// adjacent ally. Returns the total damage taken.
fn hostile_fire(world: &mut World) -> u32 {
    let mut taken: u32 = 0;
    for room in world.rooms_mut() {
        let mut hits: Vec<(ObjectId, u32)> = Vec::new();
        for tower in room
            .hostile_structures
            .iter()
            .filter(|s| s.structure_type == StructureType::Tower)
        {
            if let Some(ally) = closest_by_range(&tower.pos, &room.allies) {
                hits.push((ally.id, TOWER_POWER));
            }
        }
        for hostile in &room.hostiles {
            let power = u32::from(hostile.body.attack).saturating_mul(ATTACK_POWER);
            let adjacent = closest_by_range(&hostile.pos, &room.allies)
                .filter(|ally| ally.pos.is_near_to(&hostile.pos));
            if let (Some(ally), true) = (adjacent, power > 0) {
                hits.push((ally.id, power));
            }
        }

        for (id, amount) in hits {
            if let Some(ally) = room.allies.iter_mut().find(|unit| unit.id == id) {
                let dealt = amount.min(ally.hits);
                ally.hits = ally.hits.saturating_sub(dealt);
                taken = taken.saturating_add(dealt);
            }
        }
    }
    taken
}

/// Remove everything at zero hits. Returns the number of hostile units and
/// structures destroyed.
fn clear_destroyed(world: &mut World) -> u32 {
    let mut destroyed: usize = 0;
    for room in world.rooms_mut() {
        let before = room.hostiles.len().saturating_add(room.hostile_structures.len());
        room.hostiles.retain(|unit| unit.hits > 0);
        room.hostile_structures.retain(|s| s.hits > 0);
        let after = room.hostiles.len().saturating_add(room.hostile_structures.len());
        destroyed = destroyed.saturating_add(before.saturating_sub(after));

        room.allies.retain(|unit| unit.hits > 0);
        room.structures.retain(|s| s.hits > 0);
    }
    u32::try_from(destroyed).unwrap_or(u32::MAX)
}

/// Count down every ally's lifetime and remove the expired. Empty carriers
/// are refilled, standing in for the hauling this engine does not model.
fn age_allies(world: &mut World) {
    for room in world.rooms_mut() {
        for unit in &mut room.allies {
            unit.ticks_to_live = unit.ticks_to_live.map(|ttl| ttl.saturating_sub(1));
            if unit.energy == 0 && unit.body.carry > 0 {
                unit.energy = u32::from(unit.body.carry).saturating_mul(CARRY_CAPACITY);
            }
        }
        room.allies.retain(|unit| unit.ticks_to_live != Some(0));
    }
}

#[allow(clippy::cast_precision_loss)]
fn status_line(summary: &TickSummary, state: &SimulationState) -> String {
    let (hits, hits_max) = state
        .agents
        .iter()
        .fold((0_u64, 0_u64), |(hits, max), agent| {
            (
                hits.saturating_add(u64::from(agent.unit.hits)),
                max.saturating_add(u64::from(agent.unit.hits_max)),
            )
        });
    let health = if hits_max == 0 {
        0.0
    } else {
        hits as f64 / hits_max as f64
    };
    let hostiles: usize = state
        .world
        .rooms()
        .map(|room| room.hostiles.len().saturating_add(room.hostile_structures.len()))
        .sum();

    format!(
        "{} agents {} health {} hostiles {}",
        pad_right(&format!("tick {}", summary.tick), 9, ' '),
        pad_left(&state.agents.len().to_string(), 3, ' '),
        pad_left(&to_percent(health, 1), 6, ' '),
        pad_left(&hostiles.to_string(), 3, ' '),
    )
}
