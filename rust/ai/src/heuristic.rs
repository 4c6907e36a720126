//! Strength-threshold policy for computer seats.
//!
//! Each decision scores the seat's hand in `[0, 1]` and maps the score to an
//! action band. The few random draws (bluff calls, optional raises, raise
//! increments) are independent; nothing is remembered between decisions.

use std::sync::Mutex;

use pokerroom_engine::cards::Card;
use pokerroom_engine::hand::best_hand;
use pokerroom_engine::player::PlayerAction;
use pokerroom_engine::round::RoundState;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::AIOpponent;

const FOLD_BELOW: f64 = 0.2;
const CALL_BELOW: f64 = 0.5;
const STRONG_FROM: f64 = 0.75;

/// Chance of calling a cheap bet with a weak hand.
const LOOSE_CALL_CHANCE: f64 = 0.1;
/// A bet is cheap when it costs at most this share of the stack.
const LOOSE_CALL_STACK_SHARE: f64 = 0.1;
/// Medium hands call while the bet costs at most this share of the stack.
const CALL_STACK_SHARE: f64 = 0.4;
const MEDIUM_RAISE_CHANCE: f64 = 0.3;

/// What a seat can see when it decides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecisionContext<'a> {
    pub hole: [Card; 2],
    pub community: &'a [Card],
    pub current_bet: u32,
    pub committed: u32,
    pub stack: u32,
}

impl<'a> DecisionContext<'a> {
    /// Builds the context for `player_id` from a live round, or `None` if the
    /// player holds no cards in it.
    pub fn from_round(round: &'a RoundState, player_id: &str) -> Option<Self> {
        Some(Self {
            hole: round.hole_cards(player_id)?,
            community: round.visible_community(),
            current_bet: round.current_bet(),
            committed: round.committed_of(player_id),
            stack: round.stack_of(player_id),
        })
    }

    pub fn owed(&self) -> u32 {
        self.current_bet.saturating_sub(self.committed)
    }

    /// A raise to `to` is legal and affordable.
    fn can_raise_to(&self, to: u32) -> bool {
        to > self.current_bet && to.saturating_sub(self.committed) <= self.stack
    }

    fn check_or_call(&self) -> PlayerAction {
        if self.owed() == 0 {
            PlayerAction::Check
        } else {
            PlayerAction::Call
        }
    }
}

/// Hand strength estimate in `[0, 1]`.
///
/// With at least five cards known, 70% comes from the made-hand category and
/// 30% from the highest hole card. Preflop only the hole cards count: the
/// highest rank, plus 0.3 for a pocket pair and 0.1 when suited.
pub fn hand_strength(hole: [Card; 2], community: &[Card]) -> f64 {
    let high = f64::from(hole[0].rank.value().max(hole[1].rank.value()));
    if community.len() + 2 >= 5 {
        let mut cards = hole.to_vec();
        cards.extend_from_slice(community);
        if let Ok(rank) = best_hand(&cards) {
            let category = f64::from(rank.category.value());
            return (0.7 * category / 9.0 + 0.3 * high / 56.0).min(1.0);
        }
    }
    let mut strength = high / 28.0;
    if hole[0].rank == hole[1].rank {
        strength += 0.3;
    }
    if hole[0].suit == hole[1].suit {
        strength += 0.1;
    }
    strength.min(1.0)
}

/// Maps a decision context to an action.
///
/// Never returns [`PlayerAction::Call`] when nothing is owed, and only returns
/// raises the seat can afford.
pub fn decide<R: Rng + ?Sized>(ctx: &DecisionContext<'_>, rng: &mut R) -> PlayerAction {
    let strength = hand_strength(ctx.hole, ctx.community);
    let owed = ctx.owed();
    let stack = f64::from(ctx.stack);

    if strength < FOLD_BELOW {
        return if owed == 0 {
            PlayerAction::Check
        } else if f64::from(owed) <= stack * LOOSE_CALL_STACK_SHARE
            && rng.random_bool(LOOSE_CALL_CHANCE)
        {
            PlayerAction::Call
        } else {
            PlayerAction::Fold
        };
    }

    if strength < CALL_BELOW {
        return if owed == 0 {
            PlayerAction::Check
        } else if f64::from(owed) <= stack * CALL_STACK_SHARE {
            PlayerAction::Call
        } else {
            PlayerAction::Fold
        };
    }

    if strength < STRONG_FROM {
        if rng.random_bool(MEDIUM_RAISE_CHANCE) {
            let half_again = u32::try_from(u64::from(ctx.current_bet) * 3 / 2).unwrap_or(u32::MAX);
            let to = half_again.saturating_add(rng.random_range(10..=50));
            if ctx.can_raise_to(to) {
                return PlayerAction::Raise(to);
            }
        }
        return ctx.check_or_call();
    }

    let to = ctx
        .current_bet
        .saturating_mul(2)
        .saturating_add(rng.random_range(20..=100));
    if ctx.can_raise_to(to) {
        PlayerAction::Raise(to)
    } else {
        ctx.check_or_call()
    }
}

/// [`decide`] behind the [`AIOpponent`] interface.
///
/// Uses the thread RNG unless built with [`HeuristicAI::with_seed`], in which
/// case decisions are reproducible.
#[derive(Debug, Default)]
pub struct HeuristicAI {
    seeded: Option<Mutex<ChaCha20Rng>>,
}

impl HeuristicAI {
    pub fn new() -> Self {
        Self { seeded: None }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            seeded: Some(Mutex::new(ChaCha20Rng::seed_from_u64(seed))),
        }
    }
}

impl AIOpponent for HeuristicAI {
    fn get_action(&self, round: &RoundState, player_id: &str) -> PlayerAction {
        let Some(ctx) = DecisionContext::from_round(round, player_id) else {
            return PlayerAction::Fold;
        };
        match &self.seeded {
            Some(rng) => {
                let mut rng = rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                decide(&ctx, &mut *rng)
            }
            None => decide(&ctx, &mut rand::rng()),
        }
    }

    fn name(&self) -> &str {
        "HeuristicAI"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pokerroom_engine::cards::parse_cards;

    fn hole(s: &str) -> [Card; 2] {
        let cards = parse_cards(s).unwrap();
        [cards[0], cards[1]]
    }

    fn ctx<'a>(
        h: &str,
        board: &'a [Card],
        current_bet: u32,
        committed: u32,
        stack: u32,
    ) -> DecisionContext<'a> {
        DecisionContext {
            hole: hole(h),
            community: board,
            current_bet,
            committed,
            stack,
        }
    }

    #[test]
    fn preflop_strength_formula() {
        // ace high alone: 14/28
        assert!((hand_strength(hole("As 7d"), &[]) - 0.5).abs() < 1e-9);
        // pocket sevens: 7/28 + 0.3
        assert!((hand_strength(hole("7s 7d"), &[]) - 0.55).abs() < 1e-9);
        // suited: 9/28 + 0.1
        assert!((hand_strength(hole("9h 4h"), &[]) - (9.0 / 28.0 + 0.1)).abs() < 1e-9);
        // pocket aces
        assert!((hand_strength(hole("Ah Ad"), &[]) - 0.8).abs() < 1e-9);
    }

    #[test]
    fn postflop_strength_blends_category_and_high_card() {
        let board = parse_cards("Ah Kh Qh").unwrap();
        let royal = hand_strength(hole("Jh Th"), &board);
        assert!((royal - (0.7 + 0.3 * 11.0 / 56.0)).abs() < 1e-9);
        let nothing = hand_strength(hole("2c 7d"), &parse_cards("9s Jh 3d").unwrap());
        assert!((nothing - 0.3 * 7.0 / 56.0).abs() < 1e-9);
    }

    #[test]
    fn weak_hand_checks_when_free_and_folds_to_big_bets() {
        let board = parse_cards("9s Jh 3d").unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        for _ in 0..50 {
            assert_eq!(decide(&ctx("2c 7d", &board, 0, 0, 1000), &mut rng), PlayerAction::Check);
            assert_eq!(decide(&ctx("2c 7d", &board, 300, 0, 1000), &mut rng), PlayerAction::Fold);
        }
    }

    #[test]
    fn weak_hand_sometimes_calls_cheap_bets() {
        let board = parse_cards("9s Jh 3d").unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let calls = (0..1000)
            .filter(|_| decide(&ctx("2c 7d", &board, 20, 0, 1000), &mut rng) == PlayerAction::Call)
            .count();
        assert!((40..=170).contains(&calls), "calls: {}", calls);
    }

    #[test]
    fn medium_hand_calls_within_stack_share() {
        let mut rng = ChaCha20Rng::seed_from_u64(2);
        // 9-high offsuit preflop: 9/28 ~ 0.32
        assert_eq!(decide(&ctx("9c 4d", &[], 20, 0, 1000), &mut rng), PlayerAction::Call);
        assert_eq!(decide(&ctx("9c 4d", &[], 500, 0, 1000), &mut rng), PlayerAction::Fold);
        assert_eq!(decide(&ctx("9c 4d", &[], 20, 20, 1000), &mut rng), PlayerAction::Check);
    }

    #[test]
    fn good_hand_calls_or_raises_in_range() {
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let mut raises = 0;
        for _ in 0..500 {
            match decide(&ctx("As 7d", &[], 20, 0, 1000), &mut rng) {
                PlayerAction::Call => {}
                PlayerAction::Raise(to) => {
                    assert!((40..=80).contains(&to), "raise to {}", to);
                    raises += 1;
                }
                other => panic!("unexpected {:?}", other),
            }
        }
        assert!((100..=200).contains(&raises), "raises: {}", raises);
    }

    #[test]
    fn strong_hand_raises_and_falls_back_when_short() {
        let mut rng = ChaCha20Rng::seed_from_u64(4);
        match decide(&ctx("Ah Ad", &[], 20, 0, 1000), &mut rng) {
            PlayerAction::Raise(to) => assert!((60..=140).contains(&to)),
            other => panic!("expected raise, got {:?}", other),
        }
        // cannot afford 2x the bet: call instead
        assert_eq!(decide(&ctx("Ah Ad", &[], 400, 0, 500), &mut rng), PlayerAction::Call);
        // nothing owed and nothing left: check, never call
        assert_eq!(decide(&ctx("Ah Ad", &[], 20, 20, 0), &mut rng), PlayerAction::Check);
    }

    #[test]
    fn never_calls_when_nothing_is_owed() {
        let mut rng = ChaCha20Rng::seed_from_u64(5);
        let board = parse_cards("Kd 8s 2h 5c").unwrap();
        for h in ["2c 7d", "9c 4d", "As 7d", "Ah Ad", "Kc Ks"] {
            for _ in 0..100 {
                let action = decide(&ctx(h, &board, 0, 0, 0), &mut rng);
                assert_ne!(action, PlayerAction::Call, "{}", h);
            }
        }
    }

    #[test]
    fn huge_bets_do_not_overflow_raise_sizing() {
        let mut rng = ChaCha20Rng::seed_from_u64(6);
        for h in ["Ah Ad", "As 7d", "Kc Qc", "2c 7d"] {
            for _ in 0..50 {
                let action = decide(&ctx(h, &[], u32::MAX - 10, 0, 5), &mut rng);
                assert!(!matches!(action, PlayerAction::Raise(_)), "{}: {:?}", h, action);
            }
        }
    }

    #[test]
    fn seeded_ai_is_reproducible() {
        let players = vec![
            pokerroom_engine::player::Player::bot("a", "Alex", 1000),
            pokerroom_engine::player::Player::bot("b", "Jordan", 1000),
        ];
        let round = RoundState::start_round(
            &players,
            0,
            &Default::default(),
            &mut pokerroom_engine::deck::Deck::new_with_seed(9),
        )
        .unwrap();
        let actor = round.acting_player().unwrap().id.clone();
        let a = HeuristicAI::with_seed(11);
        let b = HeuristicAI::with_seed(11);
        let first: Vec<PlayerAction> = (0..20).map(|_| a.get_action(&round, &actor)).collect();
        let second: Vec<PlayerAction> = (0..20).map(|_| b.get_action(&round, &actor)).collect();
        assert_eq!(first, second);
        assert_eq!(HeuristicAI::new().get_action(&round, "nobody"), PlayerAction::Fold);
    }
}
