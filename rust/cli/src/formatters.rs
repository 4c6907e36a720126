//! Terminal rendering of cards, boards, hands and action menus.
//!
//! Suits print as ♠ ♥ ♦ ♣ where the terminal is known to cope, otherwise as
//! the letters s h d c.

use pokerroom_engine::cards::{Card, Rank, Suit};
use pokerroom_engine::hand::HandRank;
use pokerroom_engine::round::LegalActions;

/// `true` on Unix; on Windows only inside terminals known to render Unicode.
pub fn supports_unicode() -> bool {
    if cfg!(windows) {
        std::env::var("WT_SESSION").is_ok()
            || std::env::var("TERM_PROGRAM").is_ok()
            || std::env::var("VSCODE_INJECTION").is_ok()
    } else {
        true
    }
}

pub fn format_suit(suit: Suit) -> String {
    if supports_unicode() {
        suit.glyph().to_string()
    } else {
        match suit {
            Suit::Hearts => "h",
            Suit::Diamonds => "d",
            Suit::Clubs => "c",
            Suit::Spades => "s",
        }
        .to_string()
    }
}

/// Single character, with `T` for ten so columns line up.
pub fn format_rank(rank: Rank) -> &'static str {
    match rank {
        Rank::Ten => "T",
        other => other.label(),
    }
}

/// ```rust
/// use pokerroom_engine::cards::{Card, Rank, Suit};
/// # use pokerroom_cli::formatters::format_card;
///
/// let card = Card::new(Rank::Ace, Suit::Spades);
/// assert!(format_card(&card) == "A♠" || format_card(&card) == "As");
/// ```
pub fn format_card(card: &Card) -> String {
    format!("{}{}", format_rank(card.rank), format_suit(card.suit))
}

/// Cards in brackets, `[]` when empty.
pub fn format_board(cards: &[Card]) -> String {
    let formatted: Vec<String> = cards.iter().map(format_card).collect();
    format!("[{}]", formatted.join(" "))
}

/// Category name followed by the deciding ranks, e.g. `Full House (K 9)`.
pub fn format_hand_rank(rank: &HandRank) -> String {
    let ranks: Vec<&str> = rank
        .tiebreak
        .iter()
        .filter_map(|&v| Rank::from_u8(v).map(format_rank))
        .collect();
    if ranks.is_empty() {
        rank.category.name().to_string()
    } else {
        format!("{} ({})", rank.category.name(), ranks.join(" "))
    }
}

/// The action menu shown at the prompt.
pub fn format_legal_actions(legal: &LegalActions) -> String {
    let mut options = vec!["fold".to_string()];
    if legal.can_check {
        options.push("check".to_string());
    }
    if let Some(amount) = legal.call_amount {
        options.push(format!("call {}", amount));
    }
    match (legal.min_raise_to, legal.max_raise_to) {
        (Some(min), Some(max)) if min < max => options.push(format!("raise {}-{}", min, max)),
        (_, Some(max)) => options.push(format!("raise {}", max)),
        _ => {}
    }
    options.join(", ")
}
