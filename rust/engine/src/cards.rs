use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::GameError;

/// One of the four suits of a standard 52-card deck.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Suit {
    /// Clubs (♣)
    Clubs,
    /// Diamonds (♦)
    Diamonds,
    /// Hearts (♥)
    Hearts,
    /// Spades (♠)
    Spades,
}

impl Suit {
    pub fn glyph(self) -> char {
        match self {
            Suit::Spades => '♠',
            Suit::Hearts => '♥',
            Suit::Diamonds => '♦',
            Suit::Clubs => '♣',
        }
    }

    fn parse(s: &str) -> Option<Suit> {
        match s {
            "♠" | "s" | "S" => Some(Suit::Spades),
            "♥" | "h" | "H" => Some(Suit::Hearts),
            "♦" | "d" | "D" => Some(Suit::Diamonds),
            "♣" | "c" | "C" => Some(Suit::Clubs),
            _ => None,
        }
    }
}

/// Face value of a card. Discriminants are the numeric rank used by the evaluator
/// (Two = 2 through Ace = 14).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Rank {
    Two = 2,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Rank {
    /// Rank for a numeric value (2 through 14, ace high), `None` outside it.
    pub fn from_u8(v: u8) -> Option<Rank> {
        Some(match v {
            2 => Rank::Two,
            3 => Rank::Three,
            4 => Rank::Four,
            5 => Rank::Five,
            6 => Rank::Six,
            7 => Rank::Seven,
            8 => Rank::Eight,
            9 => Rank::Nine,
            10 => Rank::Ten,
            11 => Rank::Jack,
            12 => Rank::Queen,
            13 => Rank::King,
            14 => Rank::Ace,
            _ => return None,
        })
    }

    pub fn value(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Ace => "A",
        }
    }

    fn parse(s: &str) -> Option<Rank> {
        let r = match s.to_ascii_uppercase().as_str() {
            "2" => Rank::Two,
            "3" => Rank::Three,
            "4" => Rank::Four,
            "5" => Rank::Five,
            "6" => Rank::Six,
            "7" => Rank::Seven,
            "8" => Rank::Eight,
            "9" => Rank::Nine,
            "10" | "T" => Rank::Ten,
            "J" => Rank::Jack,
            "Q" => Rank::Queen,
            "K" => Rank::King,
            "A" => Rank::Ace,
            _ => return None,
        };
        Some(r)
    }
}

/// A single playing card. Immutable value type; 52 distinct (rank, suit) pairs exist.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Card {
    pub suit: Suit,
    pub rank: Rank,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Self { suit, rank }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank.label(), self.suit.glyph())
    }
}

/// Parses `A♠`, `As`, `10d`, `Td` and friends.
impl FromStr for Card {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let split = s
            .char_indices()
            .last()
            .map(|(i, _)| i)
            .ok_or_else(|| GameError::InvalidCard(s.to_string()))?;
        let (rank, suit) = s.split_at(split);
        match (Rank::parse(rank), Suit::parse(suit)) {
            (Some(rank), Some(suit)) => Ok(Card { suit, rank }),
            _ => Err(GameError::InvalidCard(s.to_string())),
        }
    }
}

/// Suits in deck-construction order: ♠, ♥, ♦, ♣.
pub fn all_suits() -> [Suit; 4] {
    [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs]
}

pub fn all_ranks() -> [Rank; 13] {
    [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ]
}

/// All 52 cards, suit-major and rank-minor.
pub fn full_deck() -> Vec<Card> {
    let mut v = Vec::with_capacity(52);
    for &s in &all_suits() {
        for &r in &all_ranks() {
            v.push(Card { suit: s, rank: r });
        }
    }
    v
}

/// Parses a whitespace or comma separated list of cards.
pub fn parse_cards(input: &str) -> Result<Vec<Card>, GameError> {
    input
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .map(str::parse)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deck_order_is_suit_major() {
        let deck = full_deck();
        assert_eq!(deck[0], Card::new(Rank::Two, Suit::Spades));
        assert_eq!(deck[12], Card::new(Rank::Ace, Suit::Spades));
        assert_eq!(deck[13], Card::new(Rank::Two, Suit::Hearts));
        assert_eq!(deck[51], Card::new(Rank::Ace, Suit::Clubs));
    }

    #[test]
    fn display_and_parse_agree() {
        let card = Card::new(Rank::Ten, Suit::Diamonds);
        assert_eq!(card.to_string(), "10♦");
        assert_eq!("10♦".parse::<Card>().unwrap(), card);
        assert_eq!("Td".parse::<Card>().unwrap(), card);
        assert_eq!("as".parse::<Card>().unwrap(), Card::new(Rank::Ace, Suit::Spades));
    }

    #[test]
    fn numeric_ranks_round_trip() {
        for rank in all_ranks() {
            assert_eq!(Rank::from_u8(rank.value()), Some(rank));
        }
        assert_eq!(Rank::from_u8(1), None);
        assert_eq!(Rank::from_u8(15), None);
    }

    #[test]
    fn rejects_garbage() {
        assert!("1x".parse::<Card>().is_err());
        assert!("".parse::<Card>().is_err());
        assert!(parse_cards("As Kd Zz").is_err());
    }
}
