use std::cmp::Ordering;

use pokerroom_engine::cards::{parse_cards, Card, Rank as R, Suit as S};
use pokerroom_engine::hand::{best_hand, compare_hands, Category, HandRank};

fn c(s: S, r: R) -> Card {
    Card { suit: s, rank: r }
}

fn eval(s: &str) -> HandRank {
    best_hand(&parse_cards(s).expect("cards")).expect("5..7 cards")
}

#[test]
fn detects_royal_flush() {
    let cards = [
        c(S::Hearts, R::Ten),
        c(S::Hearts, R::Jack),
        c(S::Hearts, R::Queen),
        c(S::Hearts, R::King),
        c(S::Hearts, R::Ace),
        c(S::Clubs, R::Two),
        c(S::Diamonds, R::Three),
    ];
    let hs = best_hand(&cards).unwrap();
    assert_eq!(hs.category, Category::RoyalFlush);
    assert_eq!(hs.category.value(), 9);
}

#[test]
fn royal_flush_is_distinct_from_king_high_straight_flush() {
    let royal = eval("Ts Js Qs Ks As 2c 2d");
    let king_high = eval("9s Ts Js Qs Ks 2c 2d");
    assert_eq!(king_high.category, Category::StraightFlush);
    assert_eq!(compare_hands(&royal, &king_high), Ordering::Greater);
}

#[test]
fn wheel_and_broadway_are_straights() {
    let wheel = eval("Ac 2d 3h 4s 5c Kd 9h");
    assert_eq!(wheel.category, Category::Straight);
    assert_eq!(wheel.tiebreak, vec![5]);
    let broadway = eval("Tc Jd Qh Ks Ac 2d 3h");
    assert_eq!(broadway.category, Category::Straight);
    assert_eq!(broadway.tiebreak, vec![14]);
}

#[test]
fn ace_does_not_wrap_around() {
    let hand = eval("Qc Kd Ah 2s 3c");
    assert_eq!(hand.category, Category::HighCard);
}

#[test]
fn higher_category_always_wins() {
    // weakest possible holding of each category against the strongest of the one below
    let ladder = [
        eval("7c 5d 4h 3s 2c"),  // high card
        eval("2c 2d 3h 4s 6d"),  // one pair
        eval("3c 3d 2h 2s 4c"),  // two pair
        eval("2c 2d 2h 3s 4c"),  // trips
        eval("Ac 2d 3h 4s 5c"),  // wheel
        eval("2h 3h 4h 5h 7h"),  // flush
        eval("2c 2d 2h 3s 3c"),  // full house
        eval("2c 2d 2h 2s 3c"),  // quads
        eval("Ah 2h 3h 4h 5h"),  // steel wheel
        eval("Ah Kh Qh Jh Th"),  // royal
    ];
    let strongest_below = [
        eval("Ac Kd Qh Js 9c"),
        eval("Ac Ad Kh Qs Jc"),
        eval("Ac Ad Kh Ks Qc"),
        eval("Ac Ad Ah Ks Qc"),
        eval("Tc Jd Qh Ks Ac"),
        eval("Ah Kh Qh Jh 9h"),
        eval("Ac Ad Ah Ks Kc"),
        eval("Ac Ad Ah As Kc"),
        eval("9h Kh Qh Jh Th"),
    ];
    for (i, weak) in ladder.iter().enumerate().skip(1) {
        assert_eq!(weak.category.value() as usize, i, "ladder rung {}", i);
        let strong = &strongest_below[i - 1];
        assert_eq!(
            compare_hands(weak, strong),
            Ordering::Greater,
            "{:?} should beat {:?}",
            weak,
            strong
        );
    }
}

#[test]
fn kickers_break_ties_and_equal_hands_tie() {
    let a = eval("Ac Ad Kh 9s 4c");
    let b = eval("As Ah Kd 9c 3c");
    assert_eq!(compare_hands(&a, &b), Ordering::Greater);
    let c = eval("Ah As Kc 9d 4h");
    assert_eq!(compare_hands(&a, &c), Ordering::Equal);
}

#[test]
fn full_house_orders_trips_before_pair() {
    let hand = eval("Kc Kd Kh 2s 2c Qd Qh");
    assert_eq!(hand.category, Category::FullHouse);
    assert_eq!(hand.tiebreak, vec![13, 12]);

    // low trips still lead the tiebreak over a higher pair
    let hand = eval("Kc Kd 2h 2s 2c Qd Jh");
    assert_eq!(hand.category, Category::FullHouse);
    assert_eq!(hand.tiebreak, vec![2, 13]);
}

#[test]
fn scenario_aces_beat_kings() {
    let board = "2c 7d 9s Jh 3d";
    let a = eval(&format!("As Ad {}", board));
    let b = eval(&format!("Kh Kc {}", board));
    assert_eq!(a.category, Category::OnePair);
    assert_eq!(b.category, Category::OnePair);
    assert_eq!(compare_hands(&a, &b), Ordering::Greater);
    assert_eq!(compare_hands(&b, &a), Ordering::Less);
}

#[test]
fn six_cards_are_supported() {
    let hand = eval("9c 9d 9h 4s 4c 2d");
    assert_eq!(hand.category, Category::FullHouse);
    assert_eq!(hand.tiebreak, vec![9, 4]);
}
