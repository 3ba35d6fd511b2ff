//! The reachability oracle consulted before committing to a target.
//!
//! Path search itself lives outside this engine; the oracle only answers
//! whether a path exists. Answers are assumed stable within a tick.

use std::collections::BTreeSet;

use warband_types::Position;

/// Answers whether `to` can be reached on foot from `from`.
pub trait Reachability {
    /// Whether a path from `from` to `to` exists.
    fn is_reachable(&self, from: &Position, to: &Position) -> bool;
}

impl<F> Reachability for F
where
    F: Fn(&Position, &Position) -> bool,
{
    fn is_reachable(&self, from: &Position, to: &Position) -> bool {
        self(from, to)
    }
}

/// Terrain with no obstacles: everything is reachable.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenTerrain;

impl Reachability for OpenTerrain {
    fn is_reachable(&self, _from: &Position, _to: &Position) -> bool {
        true
    }
}

/// Terrain where a fixed set of tiles is sealed off (walled-in, enclosed by
/// ramparts). Targets standing on a sealed tile are unreachable.
#[derive(Debug, Clone, Default)]
pub struct SealedTiles {
    sealed: BTreeSet<Position>,
}

impl SealedTiles {
    /// No sealed tiles.
    pub const fn new() -> Self {
        Self {
            sealed: BTreeSet::new(),
        }
    }

    /// Mark a tile as sealed.
    pub fn seal(&mut self, pos: Position) {
        self.sealed.insert(pos);
    }
}

impl FromIterator<Position> for SealedTiles {
    fn from_iter<I: IntoIterator<Item = Position>>(iter: I) -> Self {
        Self {
            sealed: iter.into_iter().collect(),
        }
    }
}

impl Reachability for SealedTiles {
    fn is_reachable(&self, from: &Position, to: &Position) -> bool {
        from == to || !self.sealed.contains(to)
    }
}

#[cfg(test)]
mod tests {
    use warband_types::RoomName;

    use super::*;

    #[test]
    fn closures_are_oracles() {
        let room = RoomName::from_coords(0, 0);
        let only_left = |_from: &Position, to: &Position| to.x < 25;
        assert!(only_left.is_reachable(&Position::new(30, 30, room), &Position::new(3, 3, room)));
        assert!(!only_left.is_reachable(&Position::new(3, 3, room), &Position::new(30, 3, room)));
    }

    #[test]
    fn sealed_tiles_block_targets() {
        let room = RoomName::from_coords(0, 0);
        let inside = Position::new(20, 20, room);
        let tiles: SealedTiles = [inside].into_iter().collect();
        assert!(!tiles.is_reachable(&Position::new(1, 1, room), &inside));
        assert!(tiles.is_reachable(&Position::new(1, 1, room), &Position::new(2, 2, room)));
        assert!(OpenTerrain.is_reachable(&inside, &Position::new(40, 40, room)));
    }
}
