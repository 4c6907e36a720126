use serde::{Deserialize, Serialize};

use crate::errors::GameError;
use crate::player::PlayerAction as A;

pub const SMALL_BLIND: u32 = 10;
pub const BIG_BLIND: u32 = 20;

/// Forced bets posted by the two seats after the dealer.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct Blinds {
    pub small: u32,
    pub big: u32,
}

impl Default for Blinds {
    fn default() -> Self {
        Self {
            small: SMALL_BLIND,
            big: BIG_BLIND,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidatedAction {
    Fold,
    Check,
    /// Chips moved from stack into the phase commitment.
    Call(u32),
    /// New current bet and the chips moved to reach it.
    Raise { to: u32, delta: u32 },
}

impl ValidatedAction {
    pub fn chips(&self) -> u32 {
        match *self {
            ValidatedAction::Fold | ValidatedAction::Check => 0,
            ValidatedAction::Call(c) => c,
            ValidatedAction::Raise { delta, .. } => delta,
        }
    }
}

/// Validates an action against the seat's betting context.
///
/// * `committed` - chips the seat has already put in this phase
/// * `current_bet` - highest commitment any seat must match this phase
/// * `stack` - chips the seat has not yet wagered
///
/// A call is capped at the stack (the seat goes all-in); a raise is never
/// converted and must be both above `current_bet` and affordable.
///
/// # Errors
///
/// - [`GameError::CannotCheck`] when checking while chips are owed
/// - [`GameError::NothingToCall`] when calling with nothing owed
/// - [`GameError::RaiseTooSmall`] when the raise does not exceed `current_bet`
/// - [`GameError::InsufficientChips`] when the raise costs more than the stack
///
/// # Examples
///
/// ```
/// use pokerroom_engine::rules::{validate_action, ValidatedAction};
/// use pokerroom_engine::player::PlayerAction;
/// use pokerroom_engine::errors::GameError;
///
/// assert_eq!(validate_action(10, 20, 500, PlayerAction::Call), Ok(ValidatedAction::Call(10)));
/// assert_eq!(validate_action(0, 20, 5, PlayerAction::Call), Ok(ValidatedAction::Call(5)));
/// assert!(matches!(
///     validate_action(0, 20, 500, PlayerAction::Raise(20)),
///     Err(GameError::RaiseTooSmall { .. })
/// ));
/// ```
pub fn validate_action(
    committed: u32,
    current_bet: u32,
    stack: u32,
    action: A,
) -> Result<ValidatedAction, GameError> {
    let owed = current_bet.saturating_sub(committed);
    match action {
        A::Fold => Ok(ValidatedAction::Fold),
        A::Check => {
            if owed == 0 {
                Ok(ValidatedAction::Check)
            } else {
                Err(GameError::CannotCheck { owed })
            }
        }
        A::Call => {
            if owed == 0 {
                Err(GameError::NothingToCall)
            } else {
                Ok(ValidatedAction::Call(owed.min(stack)))
            }
        }
        A::Raise(amount) => {
            if amount <= current_bet {
                return Err(GameError::RaiseTooSmall {
                    amount,
                    current_bet,
                });
            }
            let delta = amount.saturating_sub(committed);
            if delta > stack {
                Err(GameError::InsufficientChips {
                    needed: delta,
                    available: stack,
                })
            } else {
                Ok(ValidatedAction::Raise { to: amount, delta })
            }
        }
    }
}
