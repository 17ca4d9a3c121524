//! Actions a seated player can submit to a ruleset.

use serde::{Deserialize, Serialize};

use crate::card::{Card, CardColor};

/// A game action, already resolved to a seat by the room layer.
///
/// Every variant maps 1:1 to a wire message; the rules engine rejects
/// variants that do not apply to the current phase or game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Action {
    /// Play `card` from hand position `hand_index`. The card is the
    /// client's claim and is checked against the authoritative hand.
    PlayCard { hand_index: usize, card: Card },

    /// Draw from the pile: one card normally, or the full pending amount
    /// when a forced draw is outstanding.
    DrawCard,

    /// Choose the active color after playing a wild.
    SelectWildColor { color: CardColor },

    /// Declare "last card" for yourself, or accuse `target_seat` of
    /// having forgotten to. Accepted out of turn.
    DeclareUno { target_seat: usize },

    /// Pass after drawing without playing the drawn card.
    EndTurn,
}
