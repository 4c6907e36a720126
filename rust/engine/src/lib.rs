//! # pokerroom-engine: Hold'em Round Engine
//!
//! Multi-seat Texas Hold'em for a casual card table: deck shuffling, hand
//! evaluation, the betting round state machine and showdown settlement.
//!
//! ## Core Modules
//!
//! - [`cards`] - Card representation (Suit, Rank, Card), parsing and deck order
//! - [`deck`] - Fisher-Yates shuffling with seedable ChaCha20 RNG
//! - [`hand`] - Best five-card hand evaluation and comparison
//! - [`round`] - The per-hand state document and betting state machine
//! - [`pot`] - Showdown settlement and pot splitting
//! - [`rules`] - Action validation and blinds
//! - [`game`] - Table roster, busting and dealer rotation between hands
//! - [`player`] - Players and actions
//! - [`logger`] - Phases and the capped event log
//! - [`errors`] - Error types for game operations
//!
//! ## Quick Start
//!
//! ```rust
//! use pokerroom_engine::deck::Deck;
//! use pokerroom_engine::player::{Player, PlayerAction};
//! use pokerroom_engine::round::{RoundConfig, RoundState};
//!
//! let players = vec![
//!     Player::new("a", "Ana", 1000),
//!     Player::new("b", "Ben", 1000),
//!     Player::new("c", "Cy", 1000),
//! ];
//! let mut deck = Deck::new_with_seed(42);
//! let mut round = RoundState::start_round(&players, 0, &RoundConfig::default(), &mut deck).unwrap();
//!
//! // Everyone folds to the big blind
//! round.apply_action("a", PlayerAction::Fold).unwrap();
//! round.apply_action("b", PlayerAction::Fold).unwrap();
//! assert!(round.is_complete());
//! assert_eq!(round.settlement().unwrap().winners, vec!["c".to_string()]);
//! ```

pub mod cards;
pub mod deck;
pub mod errors;
pub mod game;
pub mod hand;
pub mod logger;
pub mod player;
pub mod pot;
pub mod round;
pub mod rules;
