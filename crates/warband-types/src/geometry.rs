//! Room names and tile positions.
//!
//! Rooms form an unbounded grid split into four quadrants by name:
//! `E0S0` is the room at grid `(0, 0)`, `W0N0` is at `(-1, -1)`. Each room is
//! a 50x50 tile square with coordinates `0..=49`; the outermost ring of tiles
//! (range 0 to the edge) are exit tiles leading into the neighbouring room.
//!
//! Ranges are Chebyshev distances computed in world coordinates, so they stay
//! meaningful for positions in different rooms.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{Direction, ExitSide};

/// Largest tile coordinate inside a room.
pub const ROOM_MAX_COORD: u8 = 49;

/// Tiles along one side of a room.
pub const ROOM_SIZE: i64 = 50;

/// Failure to parse a room name such as `W12N3`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid room name: {0:?}")]
pub struct RoomNameError(pub String);

/// A room on the world grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RoomName {
    /// Grid column; negative values are western rooms.
    pub x: i32,
    /// Grid row; negative values are northern rooms.
    pub y: i32,
}

impl RoomName {
    /// Room at the given grid coordinates.
    pub const fn from_coords(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The room `dx` columns and `dy` rows away, or `None` on overflow.
    pub const fn offset(self, dx: i32, dy: i32) -> Option<Self> {
        match (self.x.checked_add(dx), self.y.checked_add(dy)) {
            (Some(x), Some(y)) => Some(Self { x, y }),
            _ => None,
        }
    }
}

impl core::fmt::Display for RoomName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        // W0 is grid column -1, N0 is grid row -1.
        if self.x >= 0 {
            write!(f, "E{}", self.x)?;
        } else {
            write!(f, "W{}", self.x.saturating_add(1).saturating_neg())?;
        }
        if self.y >= 0 {
            write!(f, "S{}", self.y)
        } else {
            write!(f, "N{}", self.y.saturating_add(1).saturating_neg())
        }
    }
}

impl FromStr for RoomName {
    type Err = RoomNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || RoomNameError(s.to_owned());
        let mut chars = s.chars();
        let horizontal = chars.next().ok_or_else(err)?;
        let rest = chars.as_str();
        let split = rest.find(['N', 'S', 'n', 's']).ok_or_else(err)?;
        let (col, row_part) = rest.split_at(split);
        let mut row_chars = row_part.chars();
        let vertical = row_chars.next().ok_or_else(err)?;
        let row = row_chars.as_str();

        let col: i32 = col.parse().map_err(|_e| err())?;
        let row: i32 = row.parse().map_err(|_e| err())?;
        if col < 0 || row < 0 {
            return Err(err());
        }

        let x = match horizontal.to_ascii_uppercase() {
            'E' => col,
            'W' => col.saturating_add(1).saturating_neg(),
            _ => return Err(err()),
        };
        let y = match vertical.to_ascii_uppercase() {
            'S' => row,
            'N' => row.saturating_add(1).saturating_neg(),
            _ => return Err(err()),
        };
        Ok(Self { x, y })
    }
}

/// A tile inside a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Position {
    /// Column inside the room, `0..=49`.
    pub x: u8,
    /// Row inside the room, `0..=49`.
    pub y: u8,
    /// The room this tile belongs to.
    pub room: RoomName,
}

impl Position {
    /// Position at `(x, y)` in `room`, clamping coordinates into the room.
    pub const fn new(x: u8, y: u8, room: RoomName) -> Self {
        let x = if x > ROOM_MAX_COORD { ROOM_MAX_COORD } else { x };
        let y = if y > ROOM_MAX_COORD { ROOM_MAX_COORD } else { y };
        Self { x, y, room }
    }

    /// Column in world coordinates.
    pub fn world_x(&self) -> i64 {
        i64::from(self.room.x)
            .saturating_mul(ROOM_SIZE)
            .saturating_add(i64::from(self.x))
    }

    /// Row in world coordinates.
    pub fn world_y(&self) -> i64 {
        i64::from(self.room.y)
            .saturating_mul(ROOM_SIZE)
            .saturating_add(i64::from(self.y))
    }

    /// Chebyshev distance to `other`, across rooms if necessary.
    pub fn range_to(&self, other: &Self) -> u32 {
        let dx = self.world_x().abs_diff(other.world_x());
        let dy = self.world_y().abs_diff(other.world_y());
        u32::try_from(dx.max(dy)).unwrap_or(u32::MAX)
    }

    /// Whether `other` is on this tile or one of its eight neighbours.
    pub fn is_near_to(&self, other: &Self) -> bool {
        self.range_to(other) <= 1
    }

    /// Distance to the closest room edge; 0 means this is an exit tile.
    pub const fn range_to_edge(&self) -> u8 {
        let mut min = self.x;
        if self.y < min {
            min = self.y;
        }
        let right = ROOM_MAX_COORD.saturating_sub(self.x);
        if right < min {
            min = right;
        }
        let bottom = ROOM_MAX_COORD.saturating_sub(self.y);
        if bottom < min {
            min = bottom;
        }
        min
    }

    /// Whether this is an exit tile.
    pub const fn is_edge(&self) -> bool {
        self.range_to_edge() == 0
    }

    /// Whether both positions are in the same room.
    pub fn in_same_room(&self, other: &Self) -> bool {
        self.room == other.room
    }

    /// Direction of the first step from here toward `other`.
    pub fn direction_to(&self, other: &Self) -> Option<Direction> {
        let dx = other.world_x().saturating_sub(self.world_x());
        let dy = other.world_y().saturating_sub(self.world_y());
        Direction::from_delta(dx, dy)
    }

    /// Distance from this tile to the given side of its room.
    pub const fn range_to_side(&self, side: ExitSide) -> u8 {
        match side {
            ExitSide::Left => self.x,
            ExitSide::Right => ROOM_MAX_COORD.saturating_sub(self.x),
            ExitSide::Top => self.y,
            ExitSide::Bottom => ROOM_MAX_COORD.saturating_sub(self.y),
        }
    }
}

impl core::fmt::Display for Position {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "[{} {},{}]", self.room, self.x, self.y)
    }
}
