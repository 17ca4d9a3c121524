//! Cards and the 108-card deck.

use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Total cards in a fresh deck. Card-count conservation against this
/// constant is the canonical reshuffle-correctness check.
pub const DECK_SIZE: usize = 108;

/// A card color. `Wild` is the printed color of wild cards only; it is
/// never a legal choice for `select_wild_color`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardColor {
    Red,
    Blue,
    Green,
    Yellow,
    Wild,
}

impl CardColor {
    /// The four colors a wild may name.
    pub const PLAYABLE: [CardColor; 4] = [
        CardColor::Red,
        CardColor::Blue,
        CardColor::Green,
        CardColor::Yellow,
    ];
}

impl fmt::Display for CardColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Red => write!(f, "Red"),
            Self::Blue => write!(f, "Blue"),
            Self::Green => write!(f, "Green"),
            Self::Yellow => write!(f, "Yellow"),
            Self::Wild => write!(f, "Wild"),
        }
    }
}

/// A card face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardFace {
    Number(u8),
    Skip,
    Reverse,
    DrawTwo,
    Wild,
    WildDrawFour,
}

impl fmt::Display for CardFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Skip => write!(f, "Skip"),
            Self::Reverse => write!(f, "Reverse"),
            Self::DrawTwo => write!(f, "Draw Two"),
            Self::Wild => write!(f, "Wild"),
            Self::WildDrawFour => write!(f, "Wild Draw Four"),
        }
    }
}

/// One physical card. `active_color` is set only while a wild card sits
/// on top of the discard pile with a chosen color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub color: CardColor,
    pub face: CardFace,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_color: Option<CardColor>,
}

impl Card {
    pub fn new(color: CardColor, face: CardFace) -> Self {
        Self {
            color,
            face,
            active_color: None,
        }
    }

    /// `true` for Wild and Wild Draw Four.
    pub fn is_wild(&self) -> bool {
        matches!(self.face, CardFace::Wild | CardFace::WildDrawFour)
    }

    /// `true` for every face other than a plain number.
    pub fn is_action(&self) -> bool {
        !matches!(self.face, CardFace::Number(_))
    }

    /// Printed color and face match, ignoring any chosen wild color.
    /// Used to check a client's card claim against the authoritative hand.
    pub fn same_kind(&self, other: &Card) -> bool {
        self.color == other.color && self.face == other.face
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_wild() {
            match self.active_color {
                Some(c) => write!(f, "{} ({c})", self.face),
                None => write!(f, "{}", self.face),
            }
        } else {
            write!(f, "{} {}", self.color, self.face)
        }
    }
}

/// Builds an unshuffled standard deck: per color one 0, two each of 1–9,
/// two each of Skip/Reverse/Draw Two, plus four Wild and four Wild Draw
/// Four — 108 cards total.
pub fn standard_deck() -> Vec<Card> {
    let mut deck = Vec::with_capacity(DECK_SIZE);
    for color in CardColor::PLAYABLE {
        deck.push(Card::new(color, CardFace::Number(0)));
        for n in 1..=9 {
            deck.push(Card::new(color, CardFace::Number(n)));
            deck.push(Card::new(color, CardFace::Number(n)));
        }
        for face in [CardFace::Skip, CardFace::Reverse, CardFace::DrawTwo] {
            deck.push(Card::new(color, face));
            deck.push(Card::new(color, face));
        }
    }
    for _ in 0..4 {
        deck.push(Card::new(CardColor::Wild, CardFace::Wild));
        deck.push(Card::new(CardColor::Wild, CardFace::WildDrawFour));
    }
    deck
}

/// Shuffles `cards` in place with the given RNG.
pub fn shuffle(cards: &mut [Card], rng: &mut impl Rng) {
    cards.shuffle(rng);
}
