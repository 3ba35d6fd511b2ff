//! Room-to-room coordinate translation.

use tracing::debug;
use warband_types::RoomName;

/// Translates a room name by a number of rooms along each axis.
pub trait RoomCoordinates {
    /// The room `dx` columns and `dy` rows away from `room`, or `None` if it
    /// does not exist.
    fn relative_room_name(&self, room: RoomName, dx: i32, dy: i32) -> Option<RoomName>;
}

/// The standard room grid, optionally bounded to a rectangle of rooms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorldGrid {
    bounds: Option<(RoomName, RoomName)>,
}

impl WorldGrid {
    /// An infinite grid.
    pub const fn unbounded() -> Self {
        Self { bounds: None }
    }

    /// A grid containing only rooms between `min` and `max` inclusive.
    pub const fn bounded(min: RoomName, max: RoomName) -> Self {
        Self {
            bounds: Some((min, max)),
        }
    }

    /// Whether `room` lies on this grid.
    pub const fn contains(&self, room: RoomName) -> bool {
        match self.bounds {
            None => true,
            Some((min, max)) => {
                room.x >= min.x && room.x <= max.x && room.y >= min.y && room.y <= max.y
            }
        }
    }
}

impl RoomCoordinates for WorldGrid {
    fn relative_room_name(&self, room: RoomName, dx: i32, dy: i32) -> Option<RoomName> {
        let target = room.offset(dx, dy)?;
        if self.contains(target) {
            Some(target)
        } else {
            debug!(%room, dx, dy, "relative room is off the map");
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn unbounded_grid_translates_names() {
        let grid = WorldGrid::unbounded();
        let room: RoomName = "E0N1".parse().unwrap();
        assert_eq!(
            grid.relative_room_name(room, -1, 0).map(|r| r.to_string()),
            Some(String::from("W0N1"))
        );
        assert_eq!(
            grid.relative_room_name(room, 0, 1).map(|r| r.to_string()),
            Some(String::from("E0N0"))
        );
    }

    #[test]
    fn bounded_grid_refuses_rooms_off_the_map() {
        let min = RoomName::from_coords(0, 0);
        let max = RoomName::from_coords(2, 2);
        let grid = WorldGrid::bounded(min, max);
        assert!(grid.relative_room_name(min, -1, 0).is_none());
        assert_eq!(grid.relative_room_name(min, 1, 1), Some(RoomName::from_coords(1, 1)));
    }
}
