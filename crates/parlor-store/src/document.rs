//! The persisted shape of a room.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use parlor_protocol::{RoomId, RoomStatus, UserId};
use parlor_rules::{GameState, GameType};

/// One occupied seat, as persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatRecord {
    pub user_id: UserId,
    pub display_name: String,
    pub seat_index: usize,
    #[serde(default)]
    pub is_bot: bool,
}

/// The full persisted state of one room. This is what a room actor
/// writes after every accepted mutation and what startup restoration
/// reads back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomDocument {
    pub room_id: RoomId,
    pub game_type: GameType,
    pub status: RoomStatus,
    pub max_players: usize,
    pub owner_user_id: UserId,
    pub seats: Vec<SeatRecord>,
    /// Present once the game has started.
    pub game_state: Option<GameState>,
    /// Unix epoch seconds.
    pub created_at: u64,
    pub updated_at: u64,
}

impl RoomDocument {
    /// Refreshes `updated_at`; called before every save.
    pub fn touch(&mut self) {
        self.updated_at = now_epoch_secs();
    }
}

/// Current time as unix epoch seconds.
pub fn now_epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
