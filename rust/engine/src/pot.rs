use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::hand::{compare_hands, HandRank};
use crate::player::PlayerId;

/// A contester's hand as revealed at showdown.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ShownHand {
    pub player_id: PlayerId,
    pub hole: [Card; 2],
    pub rank: HandRank,
}

/// Outcome of a settled hand, handed to leaderboard and UI collaborators.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    pub winners: Vec<PlayerId>,
    /// Everything swept at showdown: pot plus any outstanding commitments
    pub pot: u32,
    /// Chips credited to each winner
    pub share: u32,
    /// `pot % winners`, discarded rather than carried forward
    pub lost_remainder: u32,
    /// True when every other seat folded and no hands were compared
    pub uncontested: bool,
    #[serde(default)]
    pub shown: Vec<ShownHand>,
    /// Final stack minus hand-start chips, per seated player
    pub deltas: BTreeMap<PlayerId, i64>,
}

/// Floor share per winner and the chips lost to rounding.
///
/// A single pooled pot is split; unequal all-in amounts do not create side pots.
pub fn split_pot(total: u32, winners: usize) -> (u32, u32) {
    if winners == 0 {
        return (0, total);
    }
    let n = winners as u32;
    (total / n, total % n)
}

/// Every shown hand that ties the best one, in seat order.
pub fn showdown_winners(shown: &[ShownHand]) -> Vec<PlayerId> {
    let Some(best) = shown.iter().map(|s| &s.rank).max_by(|a, b| compare_hands(a, b)) else {
        return Vec::new();
    };
    shown
        .iter()
        .filter(|s| compare_hands(&s.rank, best).is_eq())
        .map(|s| s.player_id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_cards;
    use crate::hand::best_hand;

    fn shown(id: &str, hole: &str, board: &str) -> ShownHand {
        let hole_cards = parse_cards(hole).unwrap();
        let mut all = hole_cards.clone();
        all.extend(parse_cards(board).unwrap());
        ShownHand {
            player_id: id.to_string(),
            hole: [hole_cards[0], hole_cards[1]],
            rank: best_hand(&all).unwrap(),
        }
    }

    #[test]
    fn split_drops_remainder() {
        assert_eq!(split_pot(61, 2), (30, 1));
        assert_eq!(split_pot(60, 3), (20, 0));
        assert_eq!(split_pot(100, 3), (33, 1));
        assert_eq!(split_pot(5, 0), (0, 5));
    }

    #[test]
    fn ties_produce_multiple_winners() {
        let board = "Qh Qd 7c 7s 2d";
        let hands = vec![
            shown("a", "3c 4h", board),
            shown("b", "3d 4s", board),
            shown("c", "2c 5h", board),
        ];
        // Queens and sevens all round; the 5 kicker beats the 4s
        assert_eq!(showdown_winners(&hands), vec!["c".to_string()]);

        let hands = vec![shown("a", "3c 4h", board), shown("b", "3d 4s", board)];
        assert_eq!(showdown_winners(&hands), vec!["a".to_string(), "b".to_string()]);
    }
}
