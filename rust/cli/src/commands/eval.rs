//! `eval`: names the best five-card hand among the given cards.

use crate::error::CliError;
use crate::formatters::{format_board, format_hand_rank};
use crate::io_utils::strip_utf8_bom;
use crate::ui;
use crate::validation::parse_hand_cards;
use pokerroom_engine::hand::best_hand;
use std::io::{BufRead, Write};

/// Evaluates `cards`, or one line from `stdin` when `cards` is empty.
///
/// Prints the cards, the category and its value (0 = high card through
/// 9 = royal flush).
pub fn handle_eval_command(
    cards: &[String],
    stdin: &mut dyn BufRead,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let mut input = if cards.is_empty() {
        let mut line = String::new();
        stdin.read_line(&mut line)?;
        line
    } else {
        cards.join(" ")
    };
    strip_utf8_bom(&mut input);

    let cards = match parse_hand_cards(&input) {
        Ok(cards) => cards,
        Err(msg) => {
            ui::write_error(err, &msg)?;
            return Err(CliError::InvalidInput(msg));
        }
    };
    let rank = best_hand(&cards)?;

    writeln!(out, "Cards: {}", format_board(&cards))?;
    writeln!(out, "Hand: {}", format_hand_rank(&rank))?;
    writeln!(out, "Category: {}", rank.category.value())?;
    Ok(())
}
