//! The card-game ruleset: deck, state, engine, and bot policy.

mod bot;
mod deck;
mod engine;
mod state;

use rand::Rng;

use crate::{Action, ActionError, Applied, GameState, GameType, Ruleset};

pub use deck::{standard_deck, Card, CardColor, CardFace, DECK_SIZE};
pub use state::{CardState, TurnPhase, HAND_SIZE};

/// [`Ruleset`] implementation for the card game.
pub struct CardRules;

impl CardRules {
    fn card_state<'a>(&self, state: &'a GameState) -> &'a CardState {
        match state {
            GameState::Card(s) => s,
        }
    }
}

impl Ruleset for CardRules {
    fn game_type(&self) -> GameType {
        GameType::Card
    }

    fn min_seats(&self) -> usize {
        2
    }

    fn max_seats(&self) -> usize {
        4
    }

    fn default_seats(&self) -> usize {
        2
    }

    fn initial_state(&self, seats: usize, seed: Option<u64>) -> GameState {
        let seed = seed.unwrap_or_else(|| rand::rng().random());
        GameState::Card(CardState::new(seats, seed))
    }

    fn validate(
        &self,
        state: &GameState,
        seat: usize,
        action: &Action,
    ) -> Result<(), ActionError> {
        engine::validate(self.card_state(state), seat, action)
    }

    fn apply(
        &self,
        state: &GameState,
        seat: usize,
        action: &Action,
    ) -> Result<Applied, ActionError> {
        let (next, event) = engine::apply(self.card_state(state), seat, action)?;
        Ok(Applied {
            state: GameState::Card(next),
            event,
        })
    }

    fn bot_decide(&self, state: &GameState, seat: usize) -> Option<Action> {
        bot::decide(self.card_state(state), seat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_respects_seed() {
        let a = CardRules.initial_state(2, Some(11));
        let b = CardRules.initial_state(2, Some(11));
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_apply_is_pure() {
        let state = CardRules.initial_state(2, Some(1));
        let before = serde_json::to_string(&state).unwrap();
        let seat = state.current_seat();
        let _ = CardRules.apply(&state, seat, &Action::DrawCard).unwrap();
        assert_eq!(serde_json::to_string(&state).unwrap(), before);
    }

    #[test]
    fn test_bot_decide_routes_through_the_shared_validator() {
        let state = CardRules.initial_state(2, Some(1));
        let seat = state.current_seat();
        let action = CardRules.bot_decide(&state, seat).expect("bot has a move");
        assert!(CardRules.validate(&state, seat, &action).is_ok());
    }
}
