//! Error types for the room layer.

use parlor_protocol::{RoomId, UserId};
use parlor_rules::GameType;

/// Errors that can occur during room operations.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The room does not exist.
    #[error("room {0} not found")]
    NotFound(RoomId),

    /// The room has no free seats.
    #[error("room {0} is full")]
    RoomFull(RoomId),

    /// The room already started (or finished); new players cannot join.
    #[error("room {0} is no longer accepting players")]
    NotWaiting(RoomId),

    /// The user is not seated in any room.
    #[error("user {0} is not in a room")]
    NotInRoom(UserId),

    /// No ruleset exists for the requested game type.
    #[error("game type {0} is not supported")]
    UnsupportedGame(GameType),

    /// The room's command channel is closed or its reply never arrived.
    #[error("room {0} is unavailable")]
    Unavailable(RoomId),
}
