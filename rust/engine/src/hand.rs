use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::errors::GameError;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum Category {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
    RoyalFlush = 9,
}

impl Category {
    pub fn value(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Category::HighCard => "High Card",
            Category::OnePair => "One Pair",
            Category::TwoPair => "Two Pair",
            Category::ThreeOfAKind => "Three of a Kind",
            Category::Straight => "Straight",
            Category::Flush => "Flush",
            Category::FullHouse => "Full House",
            Category::FourOfAKind => "Four of a Kind",
            Category::StraightFlush => "Straight Flush",
            Category::RoyalFlush => "Royal Flush",
        }
    }
}

/// Evaluated best five-card hand.
///
/// `tiebreak` holds rank values (2..=14) high to low: grouped ranks ordered by
/// group size then rank for paired categories, plain descending ranks otherwise,
/// and only the top rank for straights (5 for the wheel).
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct HandRank {
    pub category: Category,
    pub tiebreak: Vec<u8>,
}

impl Ord for HandRank {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_hands(self, other)
    }
}

impl PartialOrd for HandRank {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for HandRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.category.name())
    }
}

/// Category first, then tiebreak values element-wise. `Equal` means a split pot.
pub fn compare_hands(a: &HandRank, b: &HandRank) -> Ordering {
    match a.category.cmp(&b.category) {
        Ordering::Equal => a.tiebreak.cmp(&b.tiebreak),
        ord => ord,
    }
}

/// Best five-card hand among 5 to 7 cards.
///
/// Six and seven card inputs are solved by scoring every five-card subset
/// (21 of them for seven cards) and keeping the maximum.
///
/// # Errors
///
/// [`GameError::InvalidCardCount`] for fewer than 5 or more than 7 cards.
///
/// # Examples
///
/// ```
/// use pokerroom_engine::cards::parse_cards;
/// use pokerroom_engine::hand::{best_hand, Category};
///
/// let cards = parse_cards("As Ks Qs Js Ts 2c 3d").unwrap();
/// assert_eq!(best_hand(&cards).unwrap().category, Category::RoyalFlush);
/// ```
pub fn best_hand(cards: &[Card]) -> Result<HandRank, GameError> {
    let n = cards.len();
    if !(5..=7).contains(&n) {
        return Err(GameError::InvalidCardCount(n));
    }
    if n == 5 {
        return Ok(evaluate_five(cards));
    }

    let mut best: Option<HandRank> = None;
    let mut five = Vec::with_capacity(5);
    for mask in 0u32..(1 << n) {
        if mask.count_ones() != 5 {
            continue;
        }
        five.clear();
        five.extend((0..n).filter(|i| mask & (1 << i) != 0).map(|i| cards[i]));
        let rank = evaluate_five(&five);
        if best.as_ref().is_none_or(|b| rank > *b) {
            best = Some(rank);
        }
    }
    best.ok_or(GameError::InvalidCardCount(n))
}

fn evaluate_five(cards: &[Card]) -> HandRank {
    let mut rank_counts = [0u8; 15]; // 2..14 used
    for c in cards {
        rank_counts[c.rank.value() as usize] += 1;
    }
    let flush = cards.iter().all(|c| c.suit == cards[0].suit);

    // (count, rank) high to low
    let mut groups: Vec<(u8, u8)> = (2..=14u8)
        .filter(|&r| rank_counts[r as usize] > 0)
        .map(|r| (rank_counts[r as usize], r))
        .collect();
    groups.sort_unstable_by(|a, b| b.cmp(a));
    let grouped: Vec<u8> = groups.iter().map(|&(_, r)| r).collect();

    let straight_high = if groups.len() == 5 {
        detect_straight_high(&grouped)
    } else {
        None
    };

    let shape: Vec<u8> = groups.iter().map(|&(n, _)| n).collect();
    let (category, tiebreak) = match (straight_high, flush, shape.as_slice()) {
        (Some(14), true, _) => (Category::RoyalFlush, vec![14]),
        (Some(high), true, _) => (Category::StraightFlush, vec![high]),
        (_, _, [4, 1]) => (Category::FourOfAKind, grouped),
        (_, _, [3, 2]) => (Category::FullHouse, grouped),
        (_, true, _) => (Category::Flush, grouped),
        (Some(high), false, _) => (Category::Straight, vec![high]),
        (_, _, [3, 1, 1]) => (Category::ThreeOfAKind, grouped),
        (_, _, [2, 2, 1]) => (Category::TwoPair, grouped),
        (_, _, [2, 1, 1, 1]) => (Category::OnePair, grouped),
        _ => (Category::HighCard, grouped),
    };
    HandRank { category, tiebreak }
}

/// Top rank of a straight given five distinct ranks sorted high to low.
/// The wheel (A-5-4-3-2) plays the Ace low and tops out at 5.
fn detect_straight_high(desc_unique: &[u8]) -> Option<u8> {
    match desc_unique {
        [14, 5, 4, 3, 2] => Some(5),
        [high, .., low] if high - low == 4 => Some(*high),
        _ => None,
    }
}
