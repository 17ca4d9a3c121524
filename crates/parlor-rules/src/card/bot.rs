//! A simple bot policy for the card game.
//!
//! The bot never reaches into the engine's internals: it proposes
//! candidate actions and keeps the first one `validate` accepts, so it
//! can never submit a move a human would be rejected for.

use crate::action::Action;

use super::deck::CardColor;
use super::engine;
use super::state::{CardState, TurnPhase};

/// Picks the bot's next action, or `None` when it has nothing to do
/// (not its turn, game over).
pub fn decide(state: &CardState, seat: usize) -> Option<Action> {
    if state.phase == TurnPhase::GameOver || state.current_seat != seat {
        return None;
    }

    if state.phase == TurnPhase::AwaitingColorSelect {
        return Some(Action::SelectWildColor {
            color: favorite_color(state, seat),
        });
    }

    // Declare before playing down to one card.
    let declare = Action::DeclareUno { target_seat: seat };
    if engine::validate(state, seat, &declare).is_ok() {
        return Some(declare);
    }

    for (i, card) in state.hands[seat].iter().enumerate() {
        let action = Action::PlayCard {
            hand_index: i,
            card: *card,
        };
        if engine::validate(state, seat, &action).is_ok() {
            return Some(action);
        }
    }

    if state.phase == TurnPhase::AwaitingDrawResolution {
        Some(Action::EndTurn)
    } else {
        Some(Action::DrawCard)
    }
}

/// The playable color the bot holds the most of, defaulting to red for
/// an all-wild hand.
fn favorite_color(state: &CardState, seat: usize) -> CardColor {
    CardColor::PLAYABLE
        .into_iter()
        .max_by_key(|color| {
            state.hands[seat]
                .iter()
                .filter(|c| c.color == *color)
                .count()
        })
        .unwrap_or(CardColor::Red)
}
