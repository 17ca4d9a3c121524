//! Game rulesets for Parlor.
//!
//! A [`Ruleset`] is the pluggable validate+apply logic for one game type.
//! Rulesets are pure: `apply` computes a successor state from a borrowed
//! current state and never touches I/O, so the same call both drives live
//! games (room commits the result) and bot simulation (caller discards it).
//!
//! # Key types
//!
//! - [`Ruleset`] — the capability interface (`initial_state`, `validate`,
//!   `apply`, `bot_decide`), one implementation per game type
//! - [`Action`] — everything a seated player can ask a ruleset to do
//! - [`ActionError`] — specific rejection reasons, fail-fast before mutation
//! - [`GameState`] — the authoritative state of one running game
//! - [`card`] — the card-game ruleset, the complete implementation

mod action;
pub mod card;
mod error;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use action::Action;
pub use card::{Card, CardColor, CardFace, CardRules, CardState, TurnPhase};
pub use error::ActionError;

/// The game a room plays. Selects the [`Ruleset`] at room-creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameType {
    Card,
    Chess,
    Ludo,
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Card => write!(f, "card"),
            Self::Chess => write!(f, "chess"),
            Self::Ludo => write!(f, "ludo"),
        }
    }
}

/// Authoritative state of one running game, tagged by game type.
///
/// Rooms own exactly one of these and mutate it only by committing the
/// output of [`Ruleset::apply`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "game", rename_all = "snake_case")]
pub enum GameState {
    Card(CardState),
}

impl GameState {
    /// The seat whose turn it currently is.
    pub fn current_seat(&self) -> usize {
        match self {
            Self::Card(s) => s.current_seat,
        }
    }

    /// The winning seat, once the game has reached a terminal state.
    pub fn winner(&self) -> Option<usize> {
        match self {
            Self::Card(s) => s.winner,
        }
    }

    /// `true` once no further game actions will be accepted.
    pub fn is_over(&self) -> bool {
        self.winner().is_some()
    }
}

/// The output of a successful [`Ruleset::apply`]: the complete successor
/// state plus a human-readable description of what happened, phrased as a
/// predicate ("played Red 5") so callers can prefix the actor's name.
#[derive(Debug, Clone)]
pub struct Applied {
    pub state: GameState,
    pub event: String,
}

/// The validate+apply capability interface for one game type.
///
/// Implementations must be stateless values; the per-game state lives in
/// [`GameState`] and is threaded through every call.
pub trait Ruleset: Send + Sync {
    /// Which game this ruleset implements.
    fn game_type(&self) -> GameType;

    /// Allowed seat-count range for a room of this game.
    fn min_seats(&self) -> usize;
    fn max_seats(&self) -> usize;

    /// Seat count used by matchmaking when the caller expresses no preference.
    fn default_seats(&self) -> usize;

    /// Builds the starting state for a freshly filled room.
    ///
    /// `seed` pins the shuffle for deterministic tests; `None` draws a
    /// random seed.
    fn initial_state(&self, seats: usize, seed: Option<u64>) -> GameState;

    /// Checks an action against the current state without applying it.
    ///
    /// A passing validation guarantees the matching [`apply`](Self::apply)
    /// cannot fail.
    fn validate(
        &self,
        state: &GameState,
        seat: usize,
        action: &Action,
    ) -> Result<(), ActionError>;

    /// Computes the successor state for a validated action.
    ///
    /// Pure: `state` is never mutated. Callers commit (or discard, for
    /// simulation) the returned draft.
    fn apply(
        &self,
        state: &GameState,
        seat: usize,
        action: &Action,
    ) -> Result<Applied, ActionError>;

    /// Picks the next action for a bot occupying `seat`, or `None` if no
    /// action is available (terminal state, not the bot's move).
    fn bot_decide(&self, state: &GameState, seat: usize) -> Option<Action>;
}

/// Looks up the ruleset for a game type.
///
/// Returns `None` for game types whose engines are not implemented yet.
pub fn ruleset_for(game: GameType) -> Option<&'static dyn Ruleset> {
    match game {
        GameType::Card => Some(&CardRules),
        GameType::Chess | GameType::Ludo => None,
    }
}
