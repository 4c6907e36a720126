use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::deck::Deck;
use crate::errors::GameError;
use crate::player::{random_id, Player, PlayerId};
use crate::round::{RoundConfig, RoundState};

pub const BOT_NAMES: [&str; 6] = ["Alex", "Jordan", "Sam", "Riley", "Morgan", "Casey"];
pub const BOT_AVATARS: [&str; 6] = ["🤖", "👾", "🎮", "🃏", "🎲", "♟️"];

/// Players that persist across hands, plus the dealer button.
///
/// Busted players are dropped after each hand; the button moves to the next
/// surviving seat clockwise from the previous dealer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    players: Vec<Player>,
    eliminated: Vec<Player>,
    dealer_index: usize,
    hands_played: u32,
    config: RoundConfig,
}

impl Table {
    pub fn new(players: Vec<Player>, config: RoundConfig) -> Self {
        let (players, eliminated): (Vec<Player>, Vec<Player>) =
            players.into_iter().partition(|p| p.chips > 0);
        Self {
            players,
            eliminated,
            dealer_index: 0,
            hands_played: 0,
            config,
        }
    }

    /// A single-player practice table: the human in seat 0 followed by
    /// `bot_count` computer players (at most six).
    pub fn practice<R: Rng + ?Sized>(
        human: Player,
        bot_count: usize,
        chips: u32,
        config: RoundConfig,
        rng: &mut R,
    ) -> Self {
        let mut players = vec![human];
        for i in 0..bot_count.min(BOT_NAMES.len()) {
            let bot = Player::bot(random_id(rng), BOT_NAMES[i], chips).with_avatar(BOT_AVATARS[i]);
            players.push(bot);
        }
        Self::new(players, config)
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn eliminated(&self) -> &[Player] {
        &self.eliminated
    }

    pub fn dealer_index(&self) -> usize {
        self.dealer_index
    }

    pub fn dealer(&self) -> Option<&Player> {
        self.players.get(self.dealer_index)
    }

    pub fn hands_played(&self) -> u32 {
        self.hands_played
    }

    pub fn config(&self) -> &RoundConfig {
        &self.config
    }

    /// Sum of all chips still at the table.
    pub fn total_chips(&self) -> u32 {
        self.players
            .iter()
            .fold(0u32, |acc, p| acc.saturating_add(p.chips))
    }

    pub fn is_game_over(&self) -> bool {
        self.players.len() < 2
    }

    pub fn start_round(&self, deck: &mut Deck) -> Result<RoundState, GameError> {
        RoundState::start_round(&self.players, self.dealer_index, &self.config, deck)
    }

    /// Copies settled stacks back onto the roster, drops busted players and
    /// rotates the button.
    ///
    /// # Errors
    ///
    /// [`GameError::CorruptState`] if the round has not been settled.
    pub fn finish_round(&mut self, round: &RoundState) -> Result<Vec<PlayerId>, GameError> {
        if round.settlement().is_none() {
            return Err(GameError::CorruptState("round is not settled".into()));
        }
        for seated in round.players() {
            if let Some(p) = self.players.iter_mut().find(|p| p.id == seated.id) {
                p.chips = seated.chips;
            }
        }

        let n = self.players.len();
        let next_dealer_id = (1..=n)
            .map(|k| &self.players[(self.dealer_index + k) % n])
            .find(|p| p.chips > 0)
            .map(|p| p.id.clone());

        let (remaining, busted): (Vec<Player>, Vec<Player>) =
            self.players.drain(..).partition(|p| p.chips > 0);
        self.players = remaining;
        let busted_ids: Vec<PlayerId> = busted.iter().map(|p| p.id.clone()).collect();
        self.eliminated.extend(busted);

        self.dealer_index = next_dealer_id
            .and_then(|id| self.players.iter().position(|p| p.id == id))
            .unwrap_or(0);
        self.hands_played += 1;
        Ok(busted_ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn practice_table_seats_human_first() {
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let table = Table::practice(
            Player::new("me", "Me", 1000),
            3,
            1000,
            RoundConfig::default(),
            &mut rng,
        );
        let names: Vec<&str> = table.players().iter().map(|p| p.display_name.as_str()).collect();
        assert_eq!(names, vec!["Me", "Alex", "Jordan", "Sam"]);
        assert!(table.players()[1..].iter().all(|p| p.is_bot));
        assert_eq!(table.players()[2].avatar, "👾");
    }

    #[test]
    fn unsettled_round_cannot_finish() {
        let mut table = Table::new(
            vec![Player::new("a", "A", 100), Player::new("b", "B", 100)],
            RoundConfig::default(),
        );
        let round = table.start_round(&mut Deck::new_with_seed(1)).unwrap();
        assert!(table.finish_round(&round).is_err());
    }
}
