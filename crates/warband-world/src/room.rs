//! Read-only snapshot of room contents for a single tick.
//!
//! The snapshot is rebuilt every tick by the host. Nothing in it is ever
//! cached across ticks: persisted references (task targets, partners) are
//! re-resolved against the current [`World`] and may simply fail to resolve.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use warband_types::{ObjectId, Position, RoomName, StructureType, TargetRef};

use crate::error::WorldError;

/// Active body part counts of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Body {
    /// Melee attack parts.
    pub attack: u8,
    /// Ranged attack parts.
    pub ranged_attack: u8,
    /// Heal parts.
    pub heal: u8,
    /// Work parts (repair, build).
    pub work: u8,
    /// Carry parts.
    pub carry: u8,
    /// Move parts.
    pub moves: u8,
    /// Tough parts.
    pub tough: u8,
}

/// A unit (creep) visible this tick, friendly or hostile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    /// Object identity.
    pub id: ObjectId,
    /// Current tile.
    pub pos: Position,
    /// Current hit points.
    pub hits: u32,
    /// Maximum hit points.
    pub hits_max: u32,
    /// Movement fatigue; the unit can only move when this is 0.
    #[serde(default)]
    pub fatigue: u32,
    /// Remaining lifetime, absent while spawning.
    #[serde(default)]
    pub ticks_to_live: Option<u32>,
    /// Whether the unit is still being spawned.
    #[serde(default)]
    pub spawning: bool,
    /// Active body parts.
    #[serde(default)]
    pub body: Body,
    /// Energy currently carried.
    #[serde(default)]
    pub energy: u32,
}

impl Unit {
    /// A full-health, fully-grown unit at `pos` with the given body.
    pub fn new(pos: Position, hits_max: u32, ticks_to_live: u32, body: Body) -> Self {
        Self {
            id: ObjectId::new(),
            pos,
            hits: hits_max,
            hits_max,
            fatigue: 0,
            ticks_to_live: Some(ticks_to_live),
            spawning: false,
            body,
            energy: 0,
        }
    }

    /// Whether the unit is below maximum hit points.
    pub const fn is_hurt(&self) -> bool {
        self.hits < self.hits_max
    }

    /// Hit points as a percentage of the maximum, 0 when `hits_max` is 0.
    pub fn hits_pct(&self) -> u32 {
        percent(self.hits, self.hits_max)
    }
}

/// A structure visible this tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Structure {
    /// Object identity.
    pub id: ObjectId,
    /// Kind of structure.
    pub structure_type: StructureType,
    /// Tile it occupies.
    pub pos: Position,
    /// Current hit points.
    pub hits: u32,
    /// Maximum hit points.
    pub hits_max: u32,
}

impl Structure {
    /// A structure of `structure_type` at `pos` with the given hits.
    pub fn new(structure_type: StructureType, pos: Position, hits: u32, hits_max: u32) -> Self {
        Self {
            id: ObjectId::new(),
            structure_type,
            pos,
            hits,
            hits_max,
        }
    }

    /// Whether the structure is below maximum hit points.
    pub const fn is_damaged(&self) -> bool {
        self.hits < self.hits_max
    }
}

/// Anything with a position, for nearest-by-range queries.
pub trait HasPosition {
    /// Current tile.
    fn pos(&self) -> Position;
}

impl HasPosition for Unit {
    fn pos(&self) -> Position {
        self.pos
    }
}

impl HasPosition for Structure {
    fn pos(&self) -> Position {
        self.pos
    }
}

impl HasPosition for Position {
    fn pos(&self) -> Position {
        *self
    }
}

/// The candidate closest to `from` by raw range; ties go to the earliest.
pub fn closest_by_range<'a, T, I>(from: &Position, candidates: I) -> Option<&'a T>
where
    T: HasPosition + 'a,
    I: IntoIterator<Item = &'a T>,
{
    candidates
        .into_iter()
        .min_by_key(|candidate| from.range_to(&candidate.pos()))
}

/// A resolved task target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target<'a> {
    /// A unit.
    Unit(&'a Unit),
    /// A structure.
    Structure(&'a Structure),
}

impl Target<'_> {
    /// Object identity.
    pub const fn id(&self) -> ObjectId {
        match self {
            Self::Unit(u) => u.id,
            Self::Structure(s) => s.id,
        }
    }

    /// Current tile.
    pub const fn pos(&self) -> Position {
        match self {
            Self::Unit(u) => u.pos,
            Self::Structure(s) => s.pos,
        }
    }

    /// Current and maximum hit points.
    pub const fn hits(&self) -> (u32, u32) {
        match self {
            Self::Unit(u) => (u.hits, u.hits_max),
            Self::Structure(s) => (s.hits, s.hits_max),
        }
    }

    /// Fresh weak reference to this target.
    pub const fn to_ref(&self) -> TargetRef {
        TargetRef {
            id: self.id(),
            pos: self.pos(),
        }
    }
}

/// Contents of one room this tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomView {
    /// Room name.
    pub name: RoomName,
    /// Hostile units.
    #[serde(default)]
    pub hostiles: Vec<Unit>,
    /// Hostile-owned structures.
    #[serde(default)]
    pub hostile_structures: Vec<Structure>,
    /// Our own units, including every agent standing in this room.
    #[serde(default)]
    pub allies: Vec<Unit>,
    /// Our own and neutral structures (walls, roads, containers).
    #[serde(default)]
    pub structures: Vec<Structure>,
}

impl RoomView {
    /// An empty room.
    pub const fn new(name: RoomName) -> Self {
        Self {
            name,
            hostiles: Vec::new(),
            hostile_structures: Vec::new(),
            allies: Vec::new(),
            structures: Vec::new(),
        }
    }

    /// Look up any unit in the room by identity.
    pub fn unit(&self, id: ObjectId) -> Option<&Unit> {
        self.allies
            .iter()
            .chain(self.hostiles.iter())
            .find(|u| u.id == id)
    }

    /// Look up any structure in the room by identity.
    pub fn structure(&self, id: ObjectId) -> Option<&Structure> {
        self.structures
            .iter()
            .chain(self.hostile_structures.iter())
            .find(|s| s.id == id)
    }

    /// Look up any object in the room by identity.
    pub fn resolve(&self, id: ObjectId) -> Option<Target<'_>> {
        self.unit(id)
            .map(Target::Unit)
            .or_else(|| self.structure(id).map(Target::Structure))
    }
}

/// Every room visible this tick.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct World {
    rooms: BTreeMap<RoomName, RoomView>,
}

impl World {
    /// An empty world.
    pub const fn new() -> Self {
        Self {
            rooms: BTreeMap::new(),
        }
    }

    /// Add a room to the snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::DuplicateRoom`] if the room is already present.
    pub fn insert_room(&mut self, room: RoomView) -> Result<(), WorldError> {
        if self.rooms.contains_key(&room.name) {
            return Err(WorldError::DuplicateRoom(room.name));
        }
        self.rooms.insert(room.name, room);
        Ok(())
    }

    /// A room by name.
    pub fn room(&self, name: RoomName) -> Option<&RoomView> {
        self.rooms.get(&name)
    }

    /// A room by name, mutably.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::RoomNotFound`] if the room is not visible.
    pub fn room_mut(&mut self, name: RoomName) -> Result<&mut RoomView, WorldError> {
        self.rooms
            .get_mut(&name)
            .ok_or(WorldError::RoomNotFound(name))
    }

    /// Iterate over all rooms.
    pub fn rooms(&self) -> impl Iterator<Item = &RoomView> {
        self.rooms.values()
    }

    /// Iterate over all rooms, mutably.
    pub fn rooms_mut(&mut self) -> impl Iterator<Item = &mut RoomView> {
        self.rooms.values_mut()
    }

    /// A room by name, adding it empty if it was not yet visible.
    pub fn room_or_insert(&mut self, name: RoomName) -> &mut RoomView {
        self.rooms
            .entry(name)
            .or_insert_with(|| RoomView::new(name))
    }

    /// Resolve a weak reference, looking in its last known room first.
    ///
    /// Returns `None` when the object no longer exists anywhere.
    pub fn resolve(&self, target: &TargetRef) -> Option<Target<'_>> {
        self.room(target.pos.room)
            .and_then(|room| room.resolve(target.id))
            .or_else(|| {
                self.rooms
                    .values()
                    .filter(|room| room.name != target.pos.room)
                    .find_map(|room| room.resolve(target.id))
            })
    }

    /// Find a unit anywhere by identity.
    pub fn unit(&self, id: ObjectId) -> Option<&Unit> {
        self.rooms.values().find_map(|room| room.unit(id))
    }
}

/// `part` as a whole percentage of `whole`, 0 when `whole` is 0.
pub fn percent(part: u32, whole: u32) -> u32 {
    if whole == 0 {
        return 0;
    }
    let pct = u64::from(part)
        .saturating_mul(100)
        .checked_div(u64::from(whole))
        .unwrap_or(0);
    u32::try_from(pct).unwrap_or(u32::MAX)
}
