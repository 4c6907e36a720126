use std::collections::HashSet;

use pokerroom_engine::cards::{full_deck, Card};
use pokerroom_engine::deck::{shuffle, Deck};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

#[test]
fn deck_reset_has_52_unique_cards() {
    let mut deck = Deck::new_with_seed(42);
    deck.reset();
    let mut set = HashSet::new();
    for i in 0..52 {
        let c = deck.deal_card().expect("should have 52 cards");
        assert!(set.insert(c), "card {:?} duplicated at position {}", c, i);
    }
    assert!(
        deck.deal_card().is_none(),
        "after 52 cards, deck should be empty"
    );
}

#[test]
fn shuffled_deck_is_a_permutation() {
    let mut deck = Deck::new_with_seed(9);
    deck.shuffle();
    let dealt: HashSet<Card> = deck.deal_n(52).into_iter().collect();
    let expected: HashSet<Card> = full_deck().into_iter().collect();
    assert_eq!(dealt, expected);
    assert_eq!(deck.remaining(), 0);
}

#[test]
fn shuffle_is_deterministic_with_same_seed() {
    let mut d1 = Deck::new_with_seed(12345);
    let mut d2 = Deck::new_with_seed(12345);
    d1.shuffle();
    d2.shuffle();
    assert_eq!(d1.deal_n(10), d2.deal_n(10), "same seed must yield identical order");
}

#[test]
fn shuffle_differs_with_different_seed() {
    let mut d1 = Deck::new_with_seed(1);
    let mut d2 = Deck::new_with_seed(2);
    d1.shuffle();
    d2.shuffle();
    assert_ne!(
        d1.deal_n(10),
        d2.deal_n(10),
        "different seeds should produce different orders (high probability)"
    );
}

#[test]
fn every_card_reaches_the_top_slot() {
    // 52 cards, 20k shuffles: each card should land on top roughly 385 times
    let mut rng = ChaCha20Rng::seed_from_u64(2024);
    let reference = full_deck();
    let mut top_counts = vec![0u32; 52];
    for _ in 0..20_000 {
        let mut cards = reference.clone();
        shuffle(&mut cards, &mut rng);
        let idx = reference.iter().position(|c| *c == cards[0]).unwrap();
        top_counts[idx] += 1;
    }
    assert!(top_counts.iter().all(|&n| (250..=550).contains(&n)), "{:?}", top_counts);
}

#[test]
fn shuffle_of_tiny_slices_is_safe() {
    let mut rng = ChaCha20Rng::seed_from_u64(1);
    let mut empty: Vec<Card> = Vec::new();
    shuffle(&mut empty, &mut rng);
    let mut one = vec![full_deck()[0]];
    shuffle(&mut one, &mut rng);
    assert_eq!(one, vec![full_deck()[0]]);
}
