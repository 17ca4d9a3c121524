//! Rejection reasons produced by ruleset validators.

/// Why an action was rejected. Validation fails fast: no state mutation
/// has happened by the time one of these is returned, and the reason is
/// reported only to the player who attempted the action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    /// The acting seat is not the current seat.
    #[error("it's not your turn")]
    NotYourTurn,

    /// The referenced card does not exist, does not match the claim, or
    /// cannot legally be played on the current discard.
    #[error("that card cannot be played")]
    InvalidCard,

    /// A forced draw is outstanding; the player must draw or stack.
    #[error("you must draw or stack on the pending draw")]
    MustResolvePendingDraw,

    /// `select_wild_color` sent while no wild color choice is pending.
    #[error("no wild color selection is pending")]
    NotInColorSelectState,

    /// A wild was just played; nothing else is accepted until a color
    /// is chosen.
    #[error("a wild color must be selected first")]
    MustSelectColor,

    /// The chosen color is not one of the four playable colors.
    #[error("that is not a valid color choice")]
    InvalidColor,

    /// Neither the declarer nor the accused seat qualifies for the
    /// declaration.
    #[error("no one is eligible for that declaration")]
    NoDeclareEligibility,

    /// The player already drew this turn and must play or pass.
    #[error("you already drew this turn; play the drawn card or end your turn")]
    AlreadyDrew,

    /// `end_turn` sent outside of draw resolution.
    #[error("there is no drawn card to pass on")]
    NothingToEnd,

    /// The game has reached a terminal state; only room teardown remains.
    #[error("the game is already over")]
    GameOver,
}
