//! Validation and application of card-game actions.
//!
//! `validate` checks an action against a borrowed state and never
//! mutates; `apply` clones the state, replays the validation, and
//! mutates the clone. A state is only ever replaced wholesale by a
//! successfully applied draft, so a rejected action leaves no trace.

use crate::action::Action;
use crate::error::ActionError;

use super::deck::{Card, CardColor, CardFace};
use super::state::{CardState, TurnPhase};

/// Cards drawn as the penalty for a caught missed declaration.
const DECLARE_PENALTY: usize = 2;

pub fn validate(state: &CardState, seat: usize, action: &Action) -> Result<(), ActionError> {
    if state.phase == TurnPhase::GameOver {
        return Err(ActionError::GameOver);
    }

    // Declarations are the one out-of-turn action.
    if let Action::DeclareUno { target_seat } = action {
        return validate_declare(state, seat, *target_seat);
    }

    if seat != state.current_seat {
        return Err(ActionError::NotYourTurn);
    }

    match action {
        Action::PlayCard { hand_index, card } => validate_play(state, seat, *hand_index, card),
        Action::DrawCard => match state.phase {
            TurnPhase::AwaitingAction => Ok(()),
            TurnPhase::AwaitingColorSelect => Err(ActionError::MustSelectColor),
            TurnPhase::AwaitingDrawResolution => Err(ActionError::AlreadyDrew),
            TurnPhase::GameOver => Err(ActionError::GameOver),
        },
        Action::SelectWildColor { color } => {
            if state.phase != TurnPhase::AwaitingColorSelect {
                return Err(ActionError::NotInColorSelectState);
            }
            if !CardColor::PLAYABLE.contains(color) {
                return Err(ActionError::InvalidColor);
            }
            Ok(())
        }
        Action::EndTurn => {
            if state.phase != TurnPhase::AwaitingDrawResolution {
                return Err(ActionError::NothingToEnd);
            }
            Ok(())
        }
        Action::DeclareUno { .. } => unreachable!("handled above"),
    }
}

fn validate_play(
    state: &CardState,
    seat: usize,
    hand_index: usize,
    claimed: &Card,
) -> Result<(), ActionError> {
    match state.phase {
        TurnPhase::AwaitingAction => {}
        TurnPhase::AwaitingDrawResolution => {
            // Only the cards drawn this turn may be played now.
            let from = state.drawn_from.unwrap_or(usize::MAX);
            if hand_index < from {
                return Err(ActionError::InvalidCard);
            }
        }
        TurnPhase::AwaitingColorSelect => return Err(ActionError::MustSelectColor),
        TurnPhase::GameOver => return Err(ActionError::GameOver),
    }

    let held = state.hands[seat]
        .get(hand_index)
        .ok_or(ActionError::InvalidCard)?;
    if !held.same_kind(claimed) {
        return Err(ActionError::InvalidCard);
    }

    // An outstanding forced draw only accepts a stacking card.
    if state.pending_draw > 0
        && !matches!(held.face, CardFace::DrawTwo | CardFace::WildDrawFour)
    {
        return Err(ActionError::MustResolvePendingDraw);
    }

    if held.is_wild() {
        return Ok(());
    }
    let top = state.top_discard();
    if held.color == state.active_color() || held.face == top.face {
        Ok(())
    } else {
        Err(ActionError::InvalidCard)
    }
}

fn validate_declare(state: &CardState, seat: usize, target: usize) -> Result<(), ActionError> {
    if target >= state.seat_count() {
        return Err(ActionError::NoDeclareEligibility);
    }
    let hand_len = state.hands[target].len();
    if target == seat {
        // Self-declaration: at one card, or at two about to become one.
        if (1..=2).contains(&hand_len) && !state.declared[target] {
            Ok(())
        } else {
            Err(ActionError::NoDeclareEligibility)
        }
    } else if hand_len == 1 && !state.declared[target] {
        Ok(())
    } else {
        Err(ActionError::NoDeclareEligibility)
    }
}

/// Applies a validated action to a clone of `state` and returns the
/// draft plus an event description phrased as a predicate of the actor.
pub fn apply(
    state: &CardState,
    seat: usize,
    action: &Action,
) -> Result<(CardState, String), ActionError> {
    validate(state, seat, action)?;
    let mut next = state.clone();

    let event = match action {
        Action::PlayCard { hand_index, card: _ } => play_card(&mut next, seat, *hand_index),
        Action::DrawCard => draw_card(&mut next, seat),
        Action::SelectWildColor { color } => select_color(&mut next, *color),
        Action::DeclareUno { target_seat } => declare(&mut next, seat, *target_seat),
        Action::EndTurn => {
            next.advance(false);
            "ended their turn".to_string()
        }
    };

    Ok((next, event))
}

fn play_card(state: &mut CardState, seat: usize, hand_index: usize) -> String {
    let mut card = state.hands[seat].remove(hand_index);
    card.active_color = None;
    let description = card.to_string();
    state.discard_pile.push(card);
    state.last_to_play = Some(seat);

    if state.hands[seat].is_empty() {
        state.winner = Some(seat);
        state.phase = TurnPhase::GameOver;
        return format!("played {description} and won the game");
    }

    // Playing down to a single card without declaring costs the penalty
    // on the spot, before the turn moves on.
    let penalized = state.hands[seat].len() == 1 && !state.declared[seat];
    if penalized {
        state.draw_into_hand(seat, DECLARE_PENALTY);
    }

    match card.face {
        CardFace::Wild => {
            state.phase = TurnPhase::AwaitingColorSelect;
            state.drawn_from = None;
        }
        CardFace::WildDrawFour => {
            state.pending_draw += 4;
            state.phase = TurnPhase::AwaitingColorSelect;
            state.drawn_from = None;
        }
        CardFace::DrawTwo => {
            state.pending_draw += 2;
            state.advance(false);
        }
        CardFace::Skip => state.advance(true),
        CardFace::Reverse => {
            state.direction = -state.direction;
            // With two seats a reverse plays as a skip.
            state.advance(state.seat_count() == 2);
        }
        CardFace::Number(_) => state.advance(false),
    }

    if penalized {
        format!("played {description} and drew {DECLARE_PENALTY} for an undeclared last card")
    } else {
        format!("played {description}")
    }
}

fn draw_card(state: &mut CardState, seat: usize) -> String {
    let forced = state.pending_draw > 0;
    let want = if forced { state.pending_draw as usize } else { 1 };
    state.pending_draw = 0;

    let before = state.hands[seat].len();
    let drawn = state.draw_into_hand(seat, want);
    if drawn == 0 {
        // Both piles exhausted; the turn passes.
        state.advance(false);
        return "could not draw and passed".to_string();
    }

    // The turn only pauses when one of the pickups could be played.
    let active = state.active_color();
    let top_face = state.top_discard().face;
    let playable = state.hands[seat][before..]
        .iter()
        .any(|c| c.is_wild() || c.color == active || c.face == top_face);
    if playable {
        state.drawn_from = Some(before);
        state.phase = TurnPhase::AwaitingDrawResolution;
    } else {
        state.advance(false);
    }

    if forced {
        format!("drew {drawn} cards")
    } else {
        "drew a card".to_string()
    }
}

fn select_color(state: &mut CardState, color: CardColor) -> String {
    if let Some(top) = state.discard_pile.last_mut() {
        top.active_color = Some(color);
    }
    if state.pending_draw > 0 {
        // A Wild Draw Four resolves on the spot: the next seat draws the
        // full accumulated amount and loses their turn.
        let victim = state.seat_after(state.current_seat, 1);
        let owed = state.pending_draw as usize;
        let drawn = state.draw_into_hand(victim, owed);
        state.pending_draw = 0;
        state.advance(true);
        return format!("chose {color}; the next player draws {drawn} and is skipped");
    }
    state.advance(false);
    format!("chose {color}")
}

fn declare(state: &mut CardState, seat: usize, target: usize) -> String {
    if target == seat {
        state.declared[seat] = true;
        "declared last card".to_string()
    } else {
        state.draw_into_hand(target, DECLARE_PENALTY);
        format!("caught an undeclared last card; the offender draws {DECLARE_PENALTY}")
    }
}

#[cfg(test)]
mod tests {
    use super::super::deck::DECK_SIZE;
    use super::super::state::HAND_SIZE;
    use super::*;

    fn fixed_state(seats: usize) -> CardState {
        CardState::new(seats, 42)
    }

    /// Forces a known hand/discard layout so tests do not depend on the
    /// shuffle.
    fn rigged_state() -> CardState {
        let mut state = fixed_state(2);
        state.discard_pile = vec![Card::new(CardColor::Red, CardFace::Number(5))];
        state.hands[0] = vec![
            Card::new(CardColor::Red, CardFace::Number(7)),
            Card::new(CardColor::Blue, CardFace::Number(3)),
            Card::new(CardColor::Red, CardFace::DrawTwo),
            Card::new(CardColor::Wild, CardFace::Wild),
            Card::new(CardColor::Wild, CardFace::WildDrawFour),
            Card::new(CardColor::Red, CardFace::Skip),
            Card::new(CardColor::Red, CardFace::Reverse),
        ];
        state.hands[1] = vec![
            Card::new(CardColor::Blue, CardFace::Number(5)),
            Card::new(CardColor::Green, CardFace::Number(1)),
            Card::new(CardColor::Blue, CardFace::DrawTwo),
            Card::new(CardColor::Green, CardFace::Number(2)),
            Card::new(CardColor::Green, CardFace::Number(3)),
            Card::new(CardColor::Green, CardFace::Number(4)),
            Card::new(CardColor::Green, CardFace::Number(6)),
        ];
        state
    }

    fn play(index: usize, card: Card) -> Action {
        Action::PlayCard {
            hand_index: index,
            card,
        }
    }

    #[test]
    fn test_out_of_turn_play_is_rejected() {
        let state = rigged_state();
        let action = play(0, Card::new(CardColor::Blue, CardFace::Number(5)));
        assert_eq!(
            validate(&state, 1, &action),
            Err(ActionError::NotYourTurn)
        );
    }

    #[test]
    fn test_card_claim_must_match_authoritative_hand() {
        let state = rigged_state();
        // Seat 0's slot 1 holds Blue 3, not Red 3.
        let action = play(1, Card::new(CardColor::Red, CardFace::Number(3)));
        assert_eq!(validate(&state, 0, &action), Err(ActionError::InvalidCard));
    }

    #[test]
    fn test_color_or_face_match_is_required() {
        let state = rigged_state();
        // Blue 3 on Red 5: neither color nor face matches.
        let action = play(1, Card::new(CardColor::Blue, CardFace::Number(3)));
        assert_eq!(validate(&state, 0, &action), Err(ActionError::InvalidCard));
        // Red 7 matches by color.
        let action = play(0, Card::new(CardColor::Red, CardFace::Number(7)));
        assert!(validate(&state, 0, &action).is_ok());
    }

    #[test]
    fn test_number_play_advances_turn_and_conserves_cards() {
        let state = rigged_state();
        let action = play(0, Card::new(CardColor::Red, CardFace::Number(7)));
        let (next, event) = apply(&state, 0, &action).unwrap();
        assert_eq!(next.current_seat, 1);
        assert_eq!(next.hands[0].len(), HAND_SIZE - 1);
        assert_eq!(next.total_cards(), state.total_cards());
        assert_eq!(event, "played Red 7");
        // The original state is untouched.
        assert_eq!(state.hands[0].len(), HAND_SIZE);
    }

    #[test]
    fn test_skip_and_two_seat_reverse_keep_the_turn() {
        let state = rigged_state();
        let (next, _) = apply(&state, 0, &play(5, Card::new(CardColor::Red, CardFace::Skip)))
            .unwrap();
        assert_eq!(next.current_seat, 0);

        let (next, _) = apply(
            &state,
            0,
            &play(6, Card::new(CardColor::Red, CardFace::Reverse)),
        )
        .unwrap();
        assert_eq!(next.current_seat, 0);
        assert_eq!(next.direction, -1);
    }

    #[test]
    fn test_reverse_with_three_seats_flips_direction() {
        let mut state = fixed_state(3);
        state.discard_pile = vec![Card::new(CardColor::Red, CardFace::Number(5))];
        state.hands[0][0] = Card::new(CardColor::Red, CardFace::Reverse);
        let (next, _) = apply(
            &state,
            0,
            &play(0, Card::new(CardColor::Red, CardFace::Reverse)),
        )
        .unwrap();
        assert_eq!(next.direction, -1);
        assert_eq!(next.current_seat, 2);
    }

    #[test]
    fn test_draw_two_sets_pending_and_draw_resolves_it() {
        let mut state = rigged_state();
        // Rig seat 1's forced pickups so neither is playable afterwards.
        let n = state.draw_pile.len();
        state.draw_pile[n - 1] = Card::new(CardColor::Blue, CardFace::Number(9));
        state.draw_pile[n - 2] = Card::new(CardColor::Green, CardFace::Number(9));
        let (next, _) = apply(
            &state,
            0,
            &play(2, Card::new(CardColor::Red, CardFace::DrawTwo)),
        )
        .unwrap();
        assert_eq!(next.pending_draw, 2);
        assert_eq!(next.current_seat, 1);

        // Seat 1 may not play a non-stacking card.
        let blocked = play(0, Card::new(CardColor::Blue, CardFace::Number(5)));
        assert_eq!(
            validate(&next, 1, &blocked),
            Err(ActionError::MustResolvePendingDraw)
        );

        let (after, event) = apply(&next, 1, &Action::DrawCard).unwrap();
        assert_eq!(after.pending_draw, 0);
        assert_eq!(after.hands[1].len(), HAND_SIZE + 2);
        assert_eq!(after.current_seat, 0);
        assert_eq!(event, "drew 2 cards");
        assert_eq!(after.total_cards(), DECK_SIZE);
    }

    #[test]
    fn test_draw_two_stack_accumulates() {
        let state = rigged_state();
        let (next, _) = apply(
            &state,
            0,
            &play(2, Card::new(CardColor::Red, CardFace::DrawTwo)),
        )
        .unwrap();
        // Seat 1 stacks their own Draw Two (face match on top).
        let (stacked, _) = apply(
            &next,
            1,
            &play(2, Card::new(CardColor::Blue, CardFace::DrawTwo)),
        )
        .unwrap();
        assert_eq!(stacked.pending_draw, 4);
        assert_eq!(stacked.current_seat, 0);

        let (after, _) = apply(&stacked, 0, &Action::DrawCard).unwrap();
        assert_eq!(after.hands[0].len(), HAND_SIZE - 1 + 4);
        assert_eq!(after.pending_draw, 0);
    }

    #[test]
    fn test_wild_requires_color_selection_before_anything_else() {
        let state = rigged_state();
        let (next, _) = apply(&state, 0, &play(3, Card::new(CardColor::Wild, CardFace::Wild)))
            .unwrap();
        assert_eq!(next.phase, TurnPhase::AwaitingColorSelect);
        assert_eq!(next.current_seat, 0);
        assert_eq!(
            validate(&next, 0, &Action::DrawCard),
            Err(ActionError::MustSelectColor)
        );

        let (after, event) = apply(
            &next,
            0,
            &Action::SelectWildColor {
                color: CardColor::Green,
            },
        )
        .unwrap();
        assert_eq!(after.active_color(), CardColor::Green);
        assert_eq!(after.current_seat, 1);
        assert_eq!(event, "chose Green");
    }

    #[test]
    fn test_select_wild_color_rejects_wild_as_a_choice() {
        let state = rigged_state();
        let (next, _) = apply(&state, 0, &play(3, Card::new(CardColor::Wild, CardFace::Wild)))
            .unwrap();
        assert_eq!(
            validate(
                &next,
                0,
                &Action::SelectWildColor {
                    color: CardColor::Wild
                }
            ),
            Err(ActionError::InvalidColor)
        );
    }

    #[test]
    fn test_wild_draw_four_resolves_at_color_select() {
        let state = rigged_state();
        let (next, _) = apply(
            &state,
            0,
            &play(4, Card::new(CardColor::Wild, CardFace::WildDrawFour)),
        )
        .unwrap();
        assert_eq!(next.pending_draw, 4);

        let (after, _) = apply(
            &next,
            0,
            &Action::SelectWildColor {
                color: CardColor::Blue,
            },
        )
        .unwrap();
        assert_eq!(after.pending_draw, 0);
        assert_eq!(after.hands[1].len(), HAND_SIZE + 4);
        // Two seats: the skipped opponent means seat 0 acts again.
        assert_eq!(after.current_seat, 0);
        assert_eq!(after.total_cards(), DECK_SIZE);
    }

    #[test]
    fn test_draw_enters_resolution_and_restricts_playable_cards() {
        let mut state = rigged_state();
        // Make the next drawn card known and playable.
        state
            .draw_pile
            .push(Card::new(CardColor::Red, CardFace::Number(9)));

        let (next, _) = apply(&state, 0, &Action::DrawCard).unwrap();
        assert_eq!(next.phase, TurnPhase::AwaitingDrawResolution);
        assert_eq!(next.drawn_from, Some(HAND_SIZE));
        assert_eq!(
            validate(&next, 0, &Action::DrawCard),
            Err(ActionError::AlreadyDrew)
        );
        // A pre-draw card is off limits now.
        assert_eq!(
            validate(&next, 0, &play(0, Card::new(CardColor::Red, CardFace::Number(7)))),
            Err(ActionError::InvalidCard)
        );
        // The drawn card itself is playable.
        let (after, _) = apply(
            &next,
            0,
            &play(HAND_SIZE, Card::new(CardColor::Red, CardFace::Number(9))),
        )
        .unwrap();
        assert_eq!(after.current_seat, 1);
    }

    #[test]
    fn test_unplayable_draw_passes_the_turn() {
        let mut state = rigged_state();
        // Green 7 matches neither the color nor the face of Red 5.
        let n = state.draw_pile.len();
        state.draw_pile[n - 1] = Card::new(CardColor::Green, CardFace::Number(7));
        let (next, event) = apply(&state, 0, &Action::DrawCard).unwrap();
        assert_eq!(next.phase, TurnPhase::AwaitingAction);
        assert_eq!(next.current_seat, 1);
        assert_eq!(next.drawn_from, None);
        assert_eq!(next.hands[0].len(), HAND_SIZE + 1);
        assert_eq!(event, "drew a card");
    }

    #[test]
    fn test_forced_draw_with_a_playable_pickup_enters_resolution() {
        let mut state = rigged_state();
        // Seat 1 will be forced to pick up Blue 9 then Red 9; the Red 9
        // matches the Red Draw Two by color.
        let n = state.draw_pile.len();
        state.draw_pile[n - 1] = Card::new(CardColor::Blue, CardFace::Number(9));
        state.draw_pile[n - 2] = Card::new(CardColor::Red, CardFace::Number(9));
        let (next, _) = apply(
            &state,
            0,
            &play(2, Card::new(CardColor::Red, CardFace::DrawTwo)),
        )
        .unwrap();
        let (after, _) = apply(&next, 1, &Action::DrawCard).unwrap();
        assert_eq!(after.phase, TurnPhase::AwaitingDrawResolution);
        assert_eq!(after.drawn_from, Some(HAND_SIZE));
        assert_eq!(after.current_seat, 1);
        // Pre-draw cards stay off limits.
        assert_eq!(
            validate(&after, 1, &play(0, Card::new(CardColor::Blue, CardFace::Number(5)))),
            Err(ActionError::InvalidCard)
        );
    }

    #[test]
    fn test_end_turn_only_after_drawing() {
        let mut state = rigged_state();
        // A playable pickup keeps the turn parked in draw resolution.
        let n = state.draw_pile.len();
        state.draw_pile[n - 1] = Card::new(CardColor::Red, CardFace::Number(9));
        assert_eq!(
            validate(&state, 0, &Action::EndTurn),
            Err(ActionError::NothingToEnd)
        );
        let (next, _) = apply(&state, 0, &Action::DrawCard).unwrap();
        let (after, _) = apply(&next, 0, &Action::EndTurn).unwrap();
        assert_eq!(after.current_seat, 1);
        assert_eq!(after.phase, TurnPhase::AwaitingAction);
    }

    #[test]
    fn test_winning_play_sets_winner_and_blocks_further_actions() {
        let mut state = rigged_state();
        state.hands[0] = vec![Card::new(CardColor::Red, CardFace::Number(7))];
        state.declared[0] = true;
        let (next, event) = apply(
            &state,
            0,
            &play(0, Card::new(CardColor::Red, CardFace::Number(7))),
        )
        .unwrap();
        assert_eq!(next.winner, Some(0));
        assert_eq!(next.phase, TurnPhase::GameOver);
        assert_eq!(event, "played Red 7 and won the game");
        assert_eq!(
            validate(&next, 1, &Action::DrawCard),
            Err(ActionError::GameOver)
        );
    }

    #[test]
    fn test_self_declaration_at_two_cards_survives_the_play() {
        let mut state = rigged_state();
        state.hands[0] = vec![
            Card::new(CardColor::Red, CardFace::Number(7)),
            Card::new(CardColor::Blue, CardFace::Number(9)),
        ];
        let (next, _) = apply(&state, 0, &Action::DeclareUno { target_seat: 0 }).unwrap();
        assert!(next.declared[0]);
        let (after, _) = apply(
            &next,
            0,
            &play(0, Card::new(CardColor::Red, CardFace::Number(7))),
        )
        .unwrap();
        assert!(after.declared[0]);
        assert_eq!(after.hands[0].len(), 1);
    }

    #[test]
    fn test_playing_down_to_one_undeclared_draws_the_penalty() {
        let mut state = rigged_state();
        state.hands[0] = vec![
            Card::new(CardColor::Red, CardFace::Number(7)),
            Card::new(CardColor::Blue, CardFace::Number(9)),
        ];
        let (next, event) = apply(
            &state,
            0,
            &play(0, Card::new(CardColor::Red, CardFace::Number(7))),
        )
        .unwrap();
        assert_eq!(next.hands[0].len(), 3);
        assert!(!next.declared[0]);
        assert_eq!(next.current_seat, 1);
        assert_eq!(next.total_cards(), state.total_cards());
        assert_eq!(event, "played Red 7 and drew 2 for an undeclared last card");
    }

    #[test]
    fn test_accusation_penalizes_undeclared_single_card() {
        let mut state = rigged_state();
        state.hands[1] = vec![Card::new(CardColor::Blue, CardFace::Number(5))];
        // Out of turn: seat 1 is not current, seat 0 accuses.
        let (next, _) = apply(&state, 0, &Action::DeclareUno { target_seat: 1 }).unwrap();
        assert_eq!(next.hands[1].len(), 1 + DECLARE_PENALTY);
        assert!(!next.declared[1]);
        assert_eq!(next.total_cards(), state.total_cards());
    }

    #[test]
    fn test_accusation_fails_once_declared_or_with_larger_hand() {
        let mut state = rigged_state();
        state.hands[1] = vec![Card::new(CardColor::Blue, CardFace::Number(5))];
        state.declared[1] = true;
        assert_eq!(
            validate(&state, 0, &Action::DeclareUno { target_seat: 1 }),
            Err(ActionError::NoDeclareEligibility)
        );
        state.declared[1] = false;
        state
            .hands[1]
            .push(Card::new(CardColor::Green, CardFace::Number(1)));
        assert_eq!(
            validate(&state, 0, &Action::DeclareUno { target_seat: 1 }),
            Err(ActionError::NoDeclareEligibility)
        );
    }

    #[test]
    fn test_declaration_clears_when_hand_grows() {
        let mut state = rigged_state();
        state.hands[0] = vec![Card::new(CardColor::Green, CardFace::Number(1))];
        let (next, _) = apply(&state, 0, &Action::DeclareUno { target_seat: 0 }).unwrap();
        assert!(next.declared[0]);
        let (after, _) = apply(&next, 0, &Action::DrawCard).unwrap();
        assert!(!after.declared[0]);
    }

    #[test]
    fn test_validated_actions_never_fail_to_apply() {
        // Random-walk a few seeded games and check that every action which
        // validates also applies, and that card count is conserved.
        for seed in 0..5u64 {
            let mut state = CardState::new(2, seed);
            let mut steps = 0;
            while state.phase != TurnPhase::GameOver && steps < 500 {
                let seat = state.current_seat;
                let action = next_legal_action(&state, seat);
                let (next, _) = apply(&state, seat, &action)
                    .unwrap_or_else(|e| panic!("validated action failed: {e}"));
                assert_eq!(next.total_cards(), DECK_SIZE, "seed {seed} step {steps}");
                state = next;
                steps += 1;
            }
        }
    }

    fn next_legal_action(state: &CardState, seat: usize) -> Action {
        if state.phase == TurnPhase::AwaitingColorSelect {
            return Action::SelectWildColor {
                color: CardColor::Red,
            };
        }
        if state.hands[seat].len() <= 2 && !state.declared[seat] {
            return Action::DeclareUno { target_seat: seat };
        }
        for (i, card) in state.hands[seat].iter().enumerate() {
            let action = Action::PlayCard {
                hand_index: i,
                card: *card,
            };
            if validate(state, seat, &action).is_ok() {
                return action;
            }
        }
        if state.phase == TurnPhase::AwaitingDrawResolution {
            Action::EndTurn
        } else {
            Action::DrawCard
        }
    }
}
