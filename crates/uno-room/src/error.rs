//! Error types for the room layer.

use uno_engine::{PlayerId, Rejection, RoomCode};

/// Errors that can occur during room operations.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// No live room has this code. Carries the code as the client typed
    /// it, normalized to uppercase.
    #[error("room {0} not found")]
    NotFound(String),

    /// The player is not a member of any room.
    #[error("player {0} is not in any room")]
    NotInRoom(PlayerId),

    /// The room refused the request.
    #[error(transparent)]
    Rejected(#[from] Rejection),

    /// The room's actor has stopped.
    #[error("room {0} is unavailable")]
    Unavailable(RoomCode),
}
