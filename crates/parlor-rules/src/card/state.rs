//! Authoritative card-game state and its low-level mutations.
//!
//! Everything here is deterministic: reshuffles draw their randomness
//! from `shuffle_seed`, which is itself re-derived from the previous
//! shuffle, so replaying the same actions from the same seed always
//! produces the same piles.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::deck::{self, Card};

/// Cards dealt to each seat at game start.
pub const HAND_SIZE: usize = 7;

/// Sub-state of the current turn, distinct from whose turn it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnPhase {
    /// Normal play: the current seat may play or draw.
    AwaitingAction,
    /// A wild was just played; its color is pending.
    AwaitingColorSelect,
    /// The current seat drew and may play a drawn card or pass.
    AwaitingDrawResolution,
    /// Terminal. No further action is accepted except room teardown.
    GameOver,
}

/// The full card-game state for one room.
///
/// Piles are stacks with the top at the end of the `Vec`. The invariant
/// `|draw_pile| + |discard_pile| + Σ|hands| == 108` holds for every
/// reachable state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardState {
    pub hands: Vec<Vec<Card>>,
    pub draw_pile: Vec<Card>,
    pub discard_pile: Vec<Card>,
    /// +1 or -1; flipped by Reverse.
    pub direction: i8,
    pub current_seat: usize,
    pub phase: TurnPhase,
    /// Unresolved forced-draw amount owed by the next actor.
    pub pending_draw: u8,
    /// Per-seat "last card" declarations. Cleared whenever a hand grows.
    pub declared: Vec<bool>,
    /// While resolving a draw: index of the first just-drawn card in the
    /// current seat's hand. Only cards at or past this index may be played.
    pub drawn_from: Option<usize>,
    pub last_to_play: Option<usize>,
    pub winner: Option<usize>,
    /// Seed for the next reshuffle; re-derived after every shuffle.
    pub shuffle_seed: u64,
}

impl CardState {
    /// Deals a fresh game: shuffled deck, `HAND_SIZE` cards per seat,
    /// and one non-action starting discard. Action and wild cards drawn
    /// as the starter are rotated to the bottom of the pile.
    pub fn new(seats: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut draw_pile = deck::standard_deck();
        deck::shuffle(&mut draw_pile, &mut rng);

        let mut hands = vec![Vec::with_capacity(HAND_SIZE); seats];
        for _ in 0..HAND_SIZE {
            for hand in hands.iter_mut() {
                hand.push(draw_pile.pop().expect("fresh deck covers the deal"));
            }
        }

        let mut discard_pile = Vec::new();
        loop {
            let card = draw_pile.pop().expect("deck always holds a number card");
            if card.is_action() {
                draw_pile.insert(0, card);
            } else {
                discard_pile.push(card);
                break;
            }
        }

        Self {
            hands,
            draw_pile,
            discard_pile,
            direction: 1,
            current_seat: 0,
            phase: TurnPhase::AwaitingAction,
            pending_draw: 0,
            declared: vec![false; seats],
            drawn_from: None,
            last_to_play: None,
            winner: None,
            shuffle_seed: rng.random(),
        }
    }

    pub fn seat_count(&self) -> usize {
        self.hands.len()
    }

    /// The card showing on the discard pile. Never empty after dealing.
    pub fn top_discard(&self) -> &Card {
        self.discard_pile.last().expect("discard pile never empty")
    }

    /// The color a play must match: the chosen color for a wild on top,
    /// otherwise the top card's printed color.
    pub fn active_color(&self) -> super::deck::CardColor {
        let top = self.top_discard();
        top.active_color.unwrap_or(top.color)
    }

    /// The seat `steps` positions after `seat` in the current direction.
    pub fn seat_after(&self, seat: usize, steps: usize) -> usize {
        let n = self.seat_count() as i64;
        let mut s = seat as i64;
        s += self.direction as i64 * steps as i64;
        s.rem_euclid(n) as usize
    }

    /// Moves `current_seat` one position (two if `skip`) in the current
    /// direction and resets the turn phase to awaiting action.
    pub fn advance(&mut self, skip: bool) {
        let steps = if skip { 2 } else { 1 };
        self.current_seat = self.seat_after(self.current_seat, steps);
        self.phase = TurnPhase::AwaitingAction;
        self.drawn_from = None;
    }

    /// Total cards across piles and hands; 108 for every reachable state.
    pub fn total_cards(&self) -> usize {
        self.draw_pile.len()
            + self.discard_pile.len()
            + self.hands.iter().map(Vec::len).sum::<usize>()
    }

    /// Pops the top of the draw pile, rebuilding it from the discard pile
    /// (minus its top card) when exhausted. Returns `None` only when both
    /// piles are empty — every other card is in a hand.
    pub fn draw_one(&mut self) -> Option<Card> {
        if self.draw_pile.is_empty() {
            self.reshuffle();
        }
        self.draw_pile.pop()
    }

    /// Draws up to `n` cards into `seat`'s hand and returns how many were
    /// actually drawn. Drawing clears the seat's declaration.
    pub fn draw_into_hand(&mut self, seat: usize, n: usize) -> usize {
        let mut drawn = 0;
        for _ in 0..n {
            match self.draw_one() {
                Some(card) => {
                    self.hands[seat].push(card);
                    drawn += 1;
                }
                None => break,
            }
        }
        if drawn > 0 {
            self.declared[seat] = false;
        }
        drawn
    }

    /// Rebuilds the draw pile from the discard pile, keeping the top
    /// discard in place. Requires at least 2 discard cards; otherwise a
    /// no-op. Chosen wild colors are erased on cards returning to the pile.
    fn reshuffle(&mut self) {
        if self.discard_pile.len() < 2 {
            return;
        }
        let top = self.discard_pile.pop().expect("checked non-empty");
        let mut recovered: Vec<Card> = self
            .discard_pile
            .drain(..)
            .map(|mut c| {
                c.active_color = None;
                c
            })
            .collect();
        self.discard_pile.push(top);

        let mut rng = StdRng::seed_from_u64(self.shuffle_seed);
        deck::shuffle(&mut recovered, &mut rng);
        self.shuffle_seed = rng.random();
        self.draw_pile = recovered;
    }
}
