//! Parsing and validation of user input for interactive and one-shot commands.

use pokerroom_engine::cards::{Card, parse_cards};
use pokerroom_engine::player::PlayerAction;
use pokerroom_engine::round::LegalActions;
use std::collections::HashSet;

/// Outcome of parsing one line typed at the action prompt.
#[derive(Debug, PartialEq)]
pub enum ParseResult {
    Action(PlayerAction),
    /// Everything in; resolved against the legal actions of the moment
    AllIn,
    Quit,
    Invalid(String),
}

/// Parses a typed action (case-insensitive).
///
/// Accepts `fold`/`f`, `check`/`k`, `call`/`c`, `raise N`/`r N` (raise *to*
/// N), `allin`/`all-in`/`a`, and `q`/`quit`.
///
/// ```rust
/// # use pokerroom_cli::validation::{parse_player_action, ParseResult};
/// use pokerroom_engine::player::PlayerAction;
///
/// assert_eq!(parse_player_action("fold"), ParseResult::Action(PlayerAction::Fold));
/// assert_eq!(parse_player_action("raise 60"), ParseResult::Action(PlayerAction::Raise(60)));
/// assert_eq!(parse_player_action("q"), ParseResult::Quit);
/// ```
pub fn parse_player_action(input: &str) -> ParseResult {
    let input = input.trim().to_lowercase();
    let parts: Vec<&str> = input.split_whitespace().collect();

    let Some(&verb) = parts.first() else {
        return ParseResult::Invalid("Empty input".to_string());
    };

    match verb {
        "q" | "quit" => ParseResult::Quit,
        "fold" | "f" => ParseResult::Action(PlayerAction::Fold),
        "check" | "k" => ParseResult::Action(PlayerAction::Check),
        "call" | "c" => ParseResult::Action(PlayerAction::Call),
        "allin" | "all-in" | "a" => ParseResult::AllIn,
        "raise" | "r" => match parts.get(1).map(|s| s.parse::<u32>()) {
            None => ParseResult::Invalid("Raise requires an amount (e.g., 'raise 60')".to_string()),
            Some(Ok(amount)) if amount > 0 => ParseResult::Action(PlayerAction::Raise(amount)),
            Some(Ok(_)) => ParseResult::Invalid("Raise amount must be positive".to_string()),
            Some(Err(_)) => ParseResult::Invalid("Invalid raise amount".to_string()),
        },
        other => ParseResult::Invalid(format!(
            "Unrecognized action '{}'. Valid actions: fold, check, call, raise <amount>, allin, q",
            other
        )),
    }
}

/// Turns an all-in request into a concrete action: a raise to the whole
/// stack if that beats the current bet, otherwise a call.
pub fn resolve_all_in(legal: &LegalActions) -> Option<PlayerAction> {
    match (legal.max_raise_to, legal.call_amount) {
        (Some(to), _) => Some(PlayerAction::Raise(to)),
        (None, Some(_)) => Some(PlayerAction::Call),
        (None, None) => None,
    }
}

/// Parses 5 to 7 distinct cards for hand evaluation.
pub fn parse_hand_cards(input: &str) -> Result<Vec<Card>, String> {
    let cards = parse_cards(input).map_err(|e| e.to_string())?;
    if !(5..=7).contains(&cards.len()) {
        return Err(format!("expected 5 to 7 cards, got {}", cards.len()));
    }
    let mut seen = HashSet::new();
    if let Some(dup) = cards.iter().find(|c| !seen.insert(**c)) {
        return Err(format!("duplicate card {}", dup));
    }
    Ok(cards)
}

pub fn validate_hands(hands: u32) -> Result<(), String> {
    if hands == 0 {
        return Err("hands must be >= 1".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_action_form() {
        assert_eq!(parse_player_action("F"), ParseResult::Action(PlayerAction::Fold));
        assert_eq!(parse_player_action("k"), ParseResult::Action(PlayerAction::Check));
        assert_eq!(parse_player_action(" call "), ParseResult::Action(PlayerAction::Call));
        assert_eq!(parse_player_action("r 45"), ParseResult::Action(PlayerAction::Raise(45)));
        assert_eq!(parse_player_action("all-in"), ParseResult::AllIn);
        assert_eq!(parse_player_action("QUIT"), ParseResult::Quit);
    }

    #[test]
    fn rejects_malformed_input() {
        for input in ["", "raise", "raise 0", "raise x", "bet 10"] {
            assert!(
                matches!(parse_player_action(input), ParseResult::Invalid(_)),
                "{:?} should be invalid",
                input
            );
        }
    }

    #[test]
    fn all_in_prefers_a_raise() {
        let legal = LegalActions {
            can_check: false,
            call_amount: Some(20),
            min_raise_to: Some(21),
            max_raise_to: Some(500),
        };
        assert_eq!(resolve_all_in(&legal), Some(PlayerAction::Raise(500)));

        let short = LegalActions {
            min_raise_to: None,
            max_raise_to: None,
            ..legal
        };
        assert_eq!(resolve_all_in(&short), Some(PlayerAction::Call));
    }

    #[test]
    fn hand_cards_are_counted_and_deduplicated() {
        assert_eq!(parse_hand_cards("As Ks Qs Js Ts").unwrap().len(), 5);
        assert!(parse_hand_cards("As Ks Qs Js").unwrap_err().contains("got 4"));
        assert!(parse_hand_cards("As As Qs Js Ts").unwrap_err().contains("duplicate"));
        assert!(parse_hand_cards("As Ks Qs Js Zz").is_err());
    }

    #[test]
    fn zero_hands_is_rejected() {
        assert!(validate_hands(0).is_err());
        assert!(validate_hands(1).is_ok());
    }
}
