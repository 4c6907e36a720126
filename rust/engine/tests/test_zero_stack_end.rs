use pokerroom_engine::cards::parse_cards;
use pokerroom_engine::deck::Deck;
use pokerroom_engine::errors::{ErrorKind, GameError};
use pokerroom_engine::game::Table;
use pokerroom_engine::player::{Player, PlayerAction};
use pokerroom_engine::round::{RoundConfig, RoundState};

#[test]
fn round_needs_two_funded_players() {
    let players = vec![Player::new("a", "A", 0), Player::new("b", "B", 100)];
    let err = RoundState::start_round(&players, 0, &RoundConfig::default(), &mut Deck::new_with_seed(1))
        .unwrap_err();
    assert_eq!(err, GameError::InsufficientPlayers(1));
    assert_eq!(err.kind(), ErrorKind::InsufficientPlayers);
}

#[test]
fn rosters_beyond_u32_chips_are_rejected() {
    let players = vec![
        Player::new("a", "A", 3_000_000_000),
        Player::new("b", "B", 3_000_000_000),
    ];
    let err = RoundState::start_round(&players, 0, &RoundConfig::default(), &mut Deck::new_with_seed(1))
        .unwrap_err();
    assert_eq!(err, GameError::ChipOverflow);
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    let table = Table::new(players, RoundConfig::default());
    assert_eq!(table.total_chips(), u32::MAX);
    assert_eq!(
        table.start_round(&mut Deck::new_with_seed(1)).unwrap_err(),
        GameError::ChipOverflow
    );
}

#[test]
fn zero_stack_players_are_not_dealt_in() {
    let players = vec![
        Player::new("a", "A", 100),
        Player::new("b", "B", 0),
        Player::new("c", "C", 100),
    ];
    let s = RoundState::start_round(&players, 0, &RoundConfig::default(), &mut Deck::new_with_seed(2))
        .unwrap();
    assert_eq!(s.players().len(), 2);
    assert!(s.player("b").is_none());
    assert!(s.hole_cards("b").is_none());
}

#[test]
fn busted_player_leaves_and_game_ends() {
    let mut table = Table::new(
        vec![Player::new("a", "A", 100), Player::new("b", "B", 100)],
        RoundConfig::default(),
    );
    // a holds aces, b kings; heads-up the dealer posts the big blind
    let cards = parse_cards("As Ad Kh Kc 2c 7d 9s Jh 3d").unwrap();
    let mut s =
        RoundState::with_deck_order(table.players(), table.dealer_index(), table.config(), &cards)
            .unwrap();
    s.apply_action("b", PlayerAction::Raise(100)).unwrap();
    s.apply_action("a", PlayerAction::Call).unwrap();
    assert!(s.is_complete());

    let busted = table.finish_round(&s).unwrap();
    assert_eq!(busted, vec!["b".to_string()]);
    assert_eq!(table.players().len(), 1);
    assert_eq!(table.eliminated()[0].id, "b");
    assert!(table.is_game_over());
    assert_eq!(table.total_chips(), 200);
    assert!(matches!(
        table.start_round(&mut Deck::new_with_seed(3)),
        Err(GameError::InsufficientPlayers(1))
    ));
}

#[test]
fn dealer_moves_to_next_surviving_seat() {
    let mut table = Table::new(
        vec![
            Player::new("a", "A", 1000),
            Player::new("b", "B", 1000),
            Player::new("c", "C", 1000),
        ],
        RoundConfig::default(),
    );
    let mut deck = Deck::new_with_seed(11);
    let mut s = table.start_round(&mut deck).unwrap();
    s.apply_action("a", PlayerAction::Fold).unwrap();
    s.apply_action("b", PlayerAction::Fold).unwrap();
    table.finish_round(&s).unwrap();
    assert_eq!(table.dealer().map(|p| p.id.as_str()), Some("b"));
    assert_eq!(table.hands_played(), 1);

    let s = table.start_round(&mut deck).unwrap();
    assert_eq!(s.dealer_index(), 1);
    assert_eq!(s.small_blind_index(), 2);
}

#[test]
fn dealer_skips_a_player_who_busted_next_to_the_button() {
    // b is short and busts; the button passes from a straight to c
    let mut table = Table::new(
        vec![
            Player::new("a", "A", 1000),
            Player::new("b", "B", 10),
            Player::new("c", "C", 1000),
        ],
        RoundConfig::default(),
    );
    // hole cards: a 2c 7d, b 3s 8h, c As Ad
    let cards = parse_cards("2c 7d 3s 8h As Ad Kc Qd 9s 5h 4c").unwrap();
    let mut s =
        RoundState::with_deck_order(table.players(), 0, table.config(), &cards).unwrap();
    assert!(s.is_all_in("b"));
    s.apply_action("a", PlayerAction::Fold).unwrap();
    // only c can still bet and has matched, so the board runs out
    assert!(s.is_complete());
    assert_eq!(s.settlement().unwrap().winners, vec!["c".to_string()]);

    let busted = table.finish_round(&s).unwrap();
    assert_eq!(busted, vec!["b".to_string()]);
    assert_eq!(table.dealer().map(|p| p.id.as_str()), Some("c"));
}
