//! Core protocol types for Parlor's wire format.
//!
//! Every type here gets serialized to bytes, sent over the network, and
//! deserialized on the other side. The JSON shapes are part of the
//! client contract, so the tests below pin them down.

use std::fmt;

use serde::{Deserialize, Serialize};

use parlor_rules::{Action, Card, CardColor, GameState, GameType};

/// A stable user identifier, assigned by the identity verifier.
///
/// Newtype over `String`: a user id is whatever the verifier says it is
/// (an auth provider uid in production, a test id in development).
/// `#[serde(transparent)]` keeps it a plain JSON string on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A unique identifier for a room, allocated by the room registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub u64);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R-{}", self.0)
    }
}

/// Lifecycle state of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    /// Open for matchmaking; seats may join or leave freely.
    Waiting,
    /// Game in progress; seats are fixed.
    Playing,
    /// Terminal; the room is torn down shortly after.
    Finished,
}

/// The display color assigned to a seat, by seat index.
pub fn seat_color(seat: usize) -> &'static str {
    const COLORS: [&str; 4] = ["red", "blue", "green", "yellow"];
    COLORS[seat % COLORS.len()]
}

/// Client → server messages.
///
/// `#[serde(tag = "type", content = "payload")]` produces adjacently
/// tagged JSON: `{ "type": "play_card", "payload": { ... } }`. Variants
/// without fields omit the payload entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Must be the first message on every connection.
    Authenticate { token: String },

    /// Ask matchmaking for a seat in a room of `game`. With `vs_bot`
    /// set, a fresh room is created and a server-side bot fills the
    /// remaining seat.
    JoinGame {
        game: GameType,
        #[serde(default)]
        vs_bot: bool,
    },

    /// Leave the current room.
    LeaveGame,

    /// Game actions. These mirror [`parlor_rules::Action`] variant for
    /// variant; see [`ClientMessage::into_action`].
    PlayCard { hand_index: usize, card: Card },
    DrawCard,
    SelectWildColor { color: CardColor },
    DeclareUno { target_seat: usize },
    EndTurn,

    /// Chat line, relayed to everyone in the room.
    ChatMessage { text: String },

    /// Liveness probe; answered with [`ServerMessage::Pong`].
    Ping,
}

impl ClientMessage {
    /// Converts a game-action message into a ruleset [`Action`].
    /// Returns `None` for lobby, chat, and liveness messages.
    pub fn into_action(self) -> Option<Action> {
        match self {
            Self::PlayCard { hand_index, card } => Some(Action::PlayCard { hand_index, card }),
            Self::DrawCard => Some(Action::DrawCard),
            Self::SelectWildColor { color } => Some(Action::SelectWildColor { color }),
            Self::DeclareUno { target_seat } => Some(Action::DeclareUno { target_seat }),
            Self::EndTurn => Some(Action::EndTurn),
            _ => None,
        }
    }
}

/// Server → client messages.
///
/// Internally tagged: `{ "type": "game_start", "starting_seat": 0, ... }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Authentication succeeded; the connection now has an identity.
    Authenticated {
        user_id: UserId,
        display_name: String,
    },

    /// You were seated in a room.
    PlayerAssigned { seat: usize, color: String },

    /// The room is still filling up.
    WaitingForOpponent { message: String },

    /// All seats are filled; the game begins.
    GameStart {
        starting_seat: usize,
        state: GameState,
    },

    /// A committed action: the complete successor state plus a
    /// description of what just happened.
    GameStateUpdate {
        state: GameState,
        event_description: String,
        current_seat: usize,
        status: RoomStatus,
    },

    /// A relayed chat line. `sender` is "System" for server-originated
    /// lines (joins, leaves, game results).
    ChatMessage { sender: String, text: String },

    /// An opponent's connection dropped mid-game.
    OpponentLeft { seat: usize, message: String },

    /// A rejected message or action, sent only to the offender.
    Error { message: String },

    /// Answer to [`ClientMessage::Ping`].
    Pong,
}
