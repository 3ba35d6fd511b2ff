//! Directives: fixed mission anchors that overlords are attached to.

use std::fmt;

use warband_types::{Position, RoomName};

/// A mission anchored at a position, read-only to the overlords serving it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    /// Unique name, also used to name the overlords attached to it.
    pub name: String,
    /// Anchor position.
    pub pos: Position,
}

impl Directive {
    /// Place a directive at `pos`.
    pub fn new(name: impl Into<String>, pos: Position) -> Self {
        Self {
            name: name.into(),
            pos,
        }
    }

    /// Room the directive is anchored in.
    pub const fn room(&self) -> RoomName {
        self.pos.room
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.pos)
    }
}
