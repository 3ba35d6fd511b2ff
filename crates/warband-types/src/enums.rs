//! Enumeration types shared across the Warband crates.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Priority levels
// ---------------------------------------------------------------------------

/// Urgency of a unit of work, from `Critical` (0) to `Low` (5).
///
/// Lower numbers are drained first by the priority queue. Overlords carry a
/// priority too, which decides the order they run in within a tick.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[ts(export, export_to = "bindings/")]
pub enum Priority {
    /// Emergencies that disrupt normal operation (bootstrapping, crash recovery).
    Critical = 0,
    /// Urgent work.
    High = 1,
    /// Above-normal work.
    NormalHigh = 2,
    /// Most operations run at this level.
    #[default]
    Normal = 3,
    /// Below-normal work.
    NormalLow = 4,
    /// Unimportant operations.
    Low = 5,
}

impl Priority {
    /// Number of distinct priority levels.
    pub const COUNT: usize = 6;

    /// Every level in drain order (most urgent first).
    pub const ALL: [Self; Self::COUNT] = [
        Self::Critical,
        Self::High,
        Self::NormalHigh,
        Self::Normal,
        Self::NormalLow,
        Self::Low,
    ];

    /// The numeric level, 0 (most urgent) through 5.
    pub const fn level(self) -> u8 {
        self as u8
    }

    /// Map a numeric level back to its variant.
    pub const fn from_level(level: u8) -> Option<Self> {
        match level {
            0 => Some(Self::Critical),
            1 => Some(Self::High),
            2 => Some(Self::NormalHigh),
            3 => Some(Self::Normal),
            4 => Some(Self::NormalLow),
            5 => Some(Self::Low),
            _ => None,
        }
    }

    /// Bucket index used by the priority queue.
    pub const fn index(self) -> usize {
        self as usize
    }
}

// ---------------------------------------------------------------------------
// Structure types
// ---------------------------------------------------------------------------

/// Kind of a structure present in a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "camelCase")]
pub enum StructureType {
    /// Produces new units.
    Spawn,
    /// Extra energy capacity for spawning.
    Extension,
    /// Reduces movement fatigue.
    Road,
    /// Constructed wall.
    Wall,
    /// Protective shell over a tile.
    Rampart,
    /// Room controller.
    Controller,
    /// Remote energy transfer.
    Link,
    /// Bulk resource storage.
    Storage,
    /// Defensive turret.
    Tower,
    /// Long-range room visibility.
    Observer,
    /// Processes power.
    PowerSpawn,
    /// Harvests minerals.
    Extractor,
    /// Runs reactions.
    Lab,
    /// Inter-room market transfers.
    Terminal,
    /// Small roadside storage.
    Container,
    /// Strategic weapon.
    Nuker,
}

impl StructureType {
    /// Whether this structure type is a defensive barrier that gets fortified.
    pub const fn is_barrier(self) -> bool {
        matches!(self, Self::Wall | Self::Rampart)
    }
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

/// Persisted tag of a task, used to re-instantiate it each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "camelCase")]
pub enum TaskKind {
    /// Repair a wall or rampart, overshooting to limit return trips.
    Fortify,
    /// Repair an owned structure back to full hits.
    Repair,
    /// Heal an allied unit back to full hits.
    Heal,
}

impl TaskKind {
    /// Lowercase tag of the task kind.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Fortify => "fortify",
            Self::Repair => "repair",
            Self::Heal => "heal",
        }
    }
}

impl core::fmt::Display for TaskKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Movement
// ---------------------------------------------------------------------------

/// One of the eight directions a unit can step in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Direction {
    /// Toward smaller y.
    Top = 1,
    /// Toward larger x, smaller y.
    TopRight = 2,
    /// Toward larger x.
    Right = 3,
    /// Toward larger x, larger y.
    BottomRight = 4,
    /// Toward larger y.
    Bottom = 5,
    /// Toward smaller x, larger y.
    BottomLeft = 6,
    /// Toward smaller x.
    Left = 7,
    /// Toward smaller x, smaller y.
    TopLeft = 8,
}

impl Direction {
    /// Direction of a step with the given coordinate signs, or `None` for
    /// a zero step.
    pub const fn from_delta(dx: i64, dy: i64) -> Option<Self> {
        match (dx.signum(), dy.signum()) {
            (0, -1) => Some(Self::Top),
            (1, -1) => Some(Self::TopRight),
            (1, 0) => Some(Self::Right),
            (1, 1) => Some(Self::BottomRight),
            (0, 1) => Some(Self::Bottom),
            (-1, 1) => Some(Self::BottomLeft),
            (-1, 0) => Some(Self::Left),
            (-1, -1) => Some(Self::TopLeft),
            _ => None,
        }
    }

    /// Unit offset `(dx, dy)` of a single step in this direction.
    pub const fn delta(self) -> (i8, i8) {
        match self {
            Self::Top => (0, -1),
            Self::TopRight => (1, -1),
            Self::Right => (1, 0),
            Self::BottomRight => (1, 1),
            Self::Bottom => (0, 1),
            Self::BottomLeft => (-1, 1),
            Self::Left => (-1, 0),
            Self::TopLeft => (-1, -1),
        }
    }
}

/// The four sides through which a unit can leave a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ExitSide {
    /// x = 0.
    Left,
    /// x = 49.
    Right,
    /// y = 0.
    Top,
    /// y = 49.
    Bottom,
}

impl ExitSide {
    /// Tie-break order when two sides are equally close.
    pub const ALL: [Self; 4] = [Self::Left, Self::Right, Self::Top, Self::Bottom];

    /// Room-grid offset of the neighbouring room across this side.
    pub const fn room_offset(self) -> (i32, i32) {
        match self {
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
            Self::Top => (0, -1),
            Self::Bottom => (0, 1),
        }
    }
}

// ---------------------------------------------------------------------------
// Action results
// ---------------------------------------------------------------------------

/// Outcome of a single world-mutating action.
///
/// Failures here are ordinary outcomes (out of range, nothing to spend),
/// never faults: callers inspect the code and carry on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum ActionResult {
    /// The action was scheduled.
    Ok,
    /// The acting unit is not owned by us.
    NotOwner,
    /// No path to the destination.
    NoPath,
    /// The unit already used this action pipeline this tick.
    Busy,
    /// The referenced object does not exist.
    NotFound,
    /// Not carrying the resource the action consumes.
    NotEnoughResources,
    /// The target cannot receive this action.
    InvalidTarget,
    /// The target is too far away.
    NotInRange,
    /// Malformed arguments.
    InvalidArgs,
    /// Fatigue prevents moving this tick.
    Tired,
    /// The unit lacks the body part the action needs.
    NoBodypart,
}

impl ActionResult {
    /// Numeric return code as reported by the game engine.
    pub const fn code(self) -> i8 {
        match self {
            Self::Ok => 0,
            Self::NotOwner => -1,
            Self::NoPath => -2,
            Self::Busy => -4,
            Self::NotFound => -5,
            Self::NotEnoughResources => -6,
            Self::InvalidTarget => -7,
            Self::NotInRange => -9,
            Self::InvalidArgs => -10,
            Self::Tired => -11,
            Self::NoBodypart => -12,
        }
    }

    /// Whether the action was accepted.
    pub const fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }
}
