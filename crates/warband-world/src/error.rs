//! Error types for the `warband-world` crate.

use warband_types::{RoomName, RoomNameError};

/// Errors that can occur while assembling a world snapshot.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// A room was not present in the snapshot.
    #[error("room not found: {0}")]
    RoomNotFound(RoomName),

    /// A room with the same name was inserted twice.
    #[error("duplicate room: {0}")]
    DuplicateRoom(RoomName),

    /// A room name could not be parsed.
    #[error("{source}")]
    InvalidRoomName {
        /// The underlying parse error.
        #[from]
        source: RoomNameError,
    },
}
