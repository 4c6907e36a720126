//! # pokerroom-ai: Computer Opponents
//!
//! Decision policies for the computer-controlled seats of a practice table.
//!
//! ## Core Components
//!
//! - [`AIOpponent`] - Trait defining the interface for AI decision-making
//! - [`heuristic`] - Stateless strength-threshold policy with light randomization
//! - [`create_ai`] - Factory function for creating AI opponents
//!
//! ## Quick Start
//!
//! ```rust
//! use pokerroom_ai::{create_ai, AIOpponent};
//! use pokerroom_engine::deck::Deck;
//! use pokerroom_engine::player::Player;
//! use pokerroom_engine::round::{RoundConfig, RoundState};
//!
//! let ai = create_ai("heuristic").expect("known AI type");
//!
//! let players = vec![Player::bot("a", "Alex", 1000), Player::bot("b", "Jordan", 1000)];
//! let round = RoundState::start_round(&players, 0, &RoundConfig::default(), &mut Deck::new_with_seed(42))
//!     .expect("two funded players");
//!
//! let actor = round.acting_player().expect("hand in progress").id.clone();
//! let action = ai.get_action(&round, &actor);
//! println!("AI chose action: {}", action);
//! ```

use pokerroom_engine::player::PlayerAction;
use pokerroom_engine::round::RoundState;

pub mod heuristic;

/// Interface for computer opponents.
///
/// Implementors only read the round; the host applies the returned action
/// through [`RoundState::apply_action`].
///
/// # Example Implementation
///
/// ```rust
/// use pokerroom_ai::AIOpponent;
/// use pokerroom_engine::player::PlayerAction;
/// use pokerroom_engine::round::RoundState;
///
/// struct CheckOrFold;
///
/// impl AIOpponent for CheckOrFold {
///     fn get_action(&self, round: &RoundState, player_id: &str) -> PlayerAction {
///         if round.to_call(player_id) == 0 {
///             PlayerAction::Check
///         } else {
///             PlayerAction::Fold
///         }
///     }
///
///     fn name(&self) -> &str {
///         "CheckOrFold"
///     }
/// }
/// ```
pub trait AIOpponent: Send + Sync {
    /// Chooses the next action for `player_id`, normally the acting seat.
    fn get_action(&self, round: &RoundState, player_id: &str) -> PlayerAction;

    /// Identifier of this AI implementation.
    fn name(&self) -> &str;
}

/// Creates an AI opponent by type string, or `None` for an unknown type.
///
/// Supported types: `"heuristic"`.
///
/// ```rust
/// use pokerroom_ai::create_ai;
///
/// assert_eq!(create_ai("heuristic").map(|ai| ai.name().to_string()), Some("HeuristicAI".into()));
/// assert!(create_ai("oracle").is_none());
/// ```
pub fn create_ai(ai_type: &str) -> Option<Box<dyn AIOpponent>> {
    match ai_type {
        "heuristic" => Some(Box::new(heuristic::HeuristicAI::new())),
        _ => None,
    }
}
