use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::deck::Deck;
use crate::errors::GameError;
use crate::hand::best_hand;
use crate::logger::{EventLog, Phase, DEFAULT_LOG_CAPACITY};
use crate::player::{random_id, Player, PlayerAction, PlayerId};
use crate::pot::{self, Settlement, ShownHand};
use crate::rules::{validate_action, Blinds, ValidatedAction};

/// Per-hand parameters.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct RoundConfig {
    pub blinds: Blinds,
    pub log_capacity: usize,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            blinds: Blinds::default(),
            log_capacity: DEFAULT_LOG_CAPACITY,
        }
    }
}

/// What the acting seat may legally do right now.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct LegalActions {
    pub can_check: bool,
    /// Chips a call would move (already capped at the stack)
    pub call_amount: Option<u32>,
    /// Smallest legal raise target, if any raise is affordable
    pub min_raise_to: Option<u32>,
    /// Largest raise target (all chips in)
    pub max_raise_to: Option<u32>,
}

/// The state document for one hand of Hold'em.
///
/// Created by [`RoundState::start_round`], mutated only through
/// [`RoundState::apply_action`], and finished once the phase reaches
/// [`Phase::Showdown`] and a [`Settlement`] is attached. The document is the
/// unit exchanged with other participants, see [`RoundState::to_json`].
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct RoundState {
    round_id: String,
    phase: Phase,
    dealer_index: usize,
    small_blind_index: usize,
    big_blind_index: usize,
    blinds: Blinds,
    players: Vec<Player>,
    hole_cards: BTreeMap<PlayerId, [Card; 2]>,
    community: Vec<Card>,
    revealed: usize,
    committed: BTreeMap<PlayerId, u32>,
    stacks: BTreeMap<PlayerId, u32>,
    pot: u32,
    current_bet: u32,
    acting_index: usize,
    actions_this_phase: usize,
    folded: BTreeSet<PlayerId>,
    all_in: BTreeSet<PlayerId>,
    starting_total: u32,
    log: EventLog,
    #[serde(default)]
    settlement: Option<Settlement>,
}

impl RoundState {
    /// Shuffles `deck` and deals a new hand.
    ///
    /// Only players holding chips are seated; `dealer_index` is taken modulo
    /// the seated count.
    ///
    /// # Errors
    ///
    /// [`GameError::InsufficientPlayers`] when fewer than two players hold chips.
    pub fn start_round(
        players: &[Player],
        dealer_index: usize,
        config: &RoundConfig,
        deck: &mut Deck,
    ) -> Result<Self, GameError> {
        deck.shuffle();
        Self::deal(players, dealer_index, config, || deck.deal_card())
    }

    /// Deals a hand from a fixed card order: two hole cards per seat in seat
    /// order, then the five community cards.
    pub fn with_deck_order(
        players: &[Player],
        dealer_index: usize,
        config: &RoundConfig,
        order: &[Card],
    ) -> Result<Self, GameError> {
        let mut cards = order.iter().copied();
        Self::deal(players, dealer_index, config, || cards.next())
    }

    fn deal(
        players: &[Player],
        dealer_index: usize,
        config: &RoundConfig,
        mut draw: impl FnMut() -> Option<Card>,
    ) -> Result<Self, GameError> {
        let seated: Vec<Player> = players.iter().filter(|p| p.chips > 0).cloned().collect();
        if seated.len() < 2 {
            return Err(GameError::InsufficientPlayers(seated.len()));
        }
        let mut ids = HashSet::new();
        if let Some(dup) = seated.iter().find(|p| !ids.insert(p.id.as_str())) {
            return Err(GameError::CorruptState(format!(
                "duplicate player id {}",
                dup.id
            )));
        }

        let starting_total = seated
            .iter()
            .try_fold(0u32, |acc, p| acc.checked_add(p.chips))
            .ok_or(GameError::ChipOverflow)?;

        let mut next_card = || {
            draw().ok_or_else(|| GameError::CorruptState("deck exhausted while dealing".into()))
        };
        let mut hole_cards = BTreeMap::new();
        for p in &seated {
            let first = next_card()?;
            let second = next_card()?;
            hole_cards.insert(p.id.clone(), [first, second]);
        }
        let community = (0..5).map(|_| next_card()).collect::<Result<Vec<_>, _>>()?;

        let n = seated.len();
        let dealer_index = dealer_index % n;
        let small_blind_index = (dealer_index + 1) % n;
        let big_blind_index = (dealer_index + 2) % n;

        let mut state = Self {
            round_id: random_id(&mut rand::rng()),
            phase: Phase::Preflop,
            dealer_index,
            small_blind_index,
            big_blind_index,
            blinds: config.blinds,
            stacks: seated.iter().map(|p| (p.id.clone(), p.chips)).collect(),
            committed: seated.iter().map(|p| (p.id.clone(), 0)).collect(),
            starting_total,
            players: seated,
            hole_cards,
            community,
            revealed: 0,
            pot: 0,
            current_bet: config.blinds.big,
            acting_index: big_blind_index,
            actions_this_phase: 0,
            folded: BTreeSet::new(),
            all_in: BTreeSet::new(),
            log: EventLog::with_capacity(config.log_capacity),
            settlement: None,
        };

        let dealer = state.players[dealer_index].display_name.clone();
        state
            .log
            .push(Phase::Preflop, format!("New hand, {} deals", dealer));
        state.post_blind(small_blind_index, config.blinds.small, "small blind");
        state.post_blind(big_blind_index, config.blinds.big, "big blind");

        if let Some(first) = state.next_eligible_from(big_blind_index + 1) {
            state.acting_index = first;
        }
        if state.betting_complete() {
            state.next_phase();
        }
        Ok(state)
    }

    fn post_blind(&mut self, seat: usize, amount: u32, label: &str) {
        let id = self.players[seat].id.clone();
        let posted = self.move_chips(&id, amount);
        let name = &self.players[seat].display_name;
        let message = if self.all_in.contains(&id) {
            format!("{} posts {} {} and is all-in", name, label, posted)
        } else {
            format!("{} posts {} {}", name, label, posted)
        };
        self.log.push(Phase::Preflop, message);
    }

    /// Moves up to `amount` from the seat's stack into its phase commitment,
    /// marking the seat all-in when the stack runs dry. Returns chips moved.
    fn move_chips(&mut self, id: &str, amount: u32) -> u32 {
        let stack = self.stacks.entry(id.to_string()).or_insert(0);
        let moved = amount.min(*stack);
        *stack -= moved;
        let empty = *stack == 0;
        *self.committed.entry(id.to_string()).or_insert(0) += moved;
        if empty && moved > 0 {
            self.all_in.insert(id.to_string());
        }
        moved
    }

    /// Validates and applies one action from the acting seat, then advances
    /// the turn (and phase, and settlement, as far as the action allows).
    ///
    /// Rejections leave the document untouched and log nothing.
    ///
    /// # Errors
    ///
    /// Turn errors ([`GameError::NotPlayersTurn`], [`GameError::PlayerAlreadyFolded`],
    /// [`GameError::PlayerAllIn`], [`GameError::HandAlreadyComplete`]), the
    /// betting errors from [`validate_action`], or [`GameError::CorruptState`]
    /// for an inconsistent document.
    pub fn apply_action(&mut self, actor_id: &str, action: PlayerAction) -> Result<(), GameError> {
        if self.phase == Phase::Showdown {
            return Err(GameError::HandAlreadyComplete);
        }
        self.validate()?;
        let acting = &self.players[self.acting_index];
        if acting.id != actor_id {
            return Err(GameError::NotPlayersTurn {
                expected: acting.id.clone(),
                actual: actor_id.to_string(),
            });
        }
        if self.folded.contains(actor_id) {
            return Err(GameError::PlayerAlreadyFolded(actor_id.to_string()));
        }
        if self.all_in.contains(actor_id) {
            return Err(GameError::PlayerAllIn(actor_id.to_string()));
        }

        let validated = validate_action(
            self.committed_of(actor_id),
            self.current_bet,
            self.stack_of(actor_id),
            action,
        )?;

        let name = acting.display_name.clone();
        let message = match validated {
            ValidatedAction::Fold => {
                self.folded.insert(actor_id.to_string());
                format!("{} folds", name)
            }
            ValidatedAction::Check => format!("{} checks", name),
            ValidatedAction::Call(chips) => {
                self.move_chips(actor_id, chips);
                format!("{} calls {}", name, chips)
            }
            ValidatedAction::Raise { to, delta } => {
                self.move_chips(actor_id, delta);
                self.current_bet = to;
                format!("{} raises to {}", name, to)
            }
        };
        let message = if validated != ValidatedAction::Fold && self.all_in.contains(actor_id) {
            format!("{} (all-in)", message)
        } else {
            message
        };
        self.log.push(self.phase, message);
        self.actions_this_phase += 1;

        self.advance_turn();
        Ok(())
    }

    /// Hands the turn to the next eligible seat, or closes the phase.
    fn advance_turn(&mut self) {
        if self.contesters().count() == 1 {
            self.phase = Phase::Showdown;
            self.settle();
            return;
        }
        if self.betting_complete() {
            self.next_phase();
            return;
        }
        if let Some(next) = self.next_eligible_from(self.acting_index + 1) {
            self.acting_index = next;
        }
    }

    /// Every eligible seat has matched the current bet and either everyone
    /// still in the hand has acted this phase or at most one seat can still bet.
    fn betting_complete(&self) -> bool {
        let eligible: Vec<&Player> = self.players.iter().filter(|p| self.is_eligible(&p.id)).collect();
        let matched = eligible
            .iter()
            .all(|p| self.committed_of(&p.id) == self.current_bet);
        matched && (eligible.len() <= 1 || self.actions_this_phase >= self.contesters().count())
    }

    /// Sweeps bets and moves to the next phase. Keeps advancing while no
    /// betting is possible (all contesters all-in, or a single seat left who
    /// can bet), running the board out to showdown.
    fn next_phase(&mut self) {
        loop {
            self.sweep_bets();
            self.phase = self.phase.next();
            self.revealed = self.phase.revealed_cards();
            self.actions_this_phase = 0;
            if self.phase == Phase::Showdown {
                self.settle();
                return;
            }
            if let Some(first) = self.next_eligible_from(self.dealer_index + 1) {
                self.acting_index = first;
            }
            let board: Vec<String> = self.visible_community().iter().map(Card::to_string).collect();
            self.log.push(
                self.phase,
                format!("{} dealt: {}", capitalize(self.phase.as_str()), board.join(" ")),
            );
            if !self.betting_complete() {
                return;
            }
        }
    }

    fn sweep_bets(&mut self) {
        self.pot += self.committed.values().sum::<u32>();
        for bet in self.committed.values_mut() {
            *bet = 0;
        }
        self.current_bet = 0;
    }

    fn settle(&mut self) {
        self.sweep_bets();
        let total = self.pot;
        let contesters: Vec<PlayerId> = self.contesters().map(|p| p.id.clone()).collect();

        let (winners, shown, uncontested) = if contesters.len() == 1 {
            (contesters, Vec::new(), true)
        } else {
            let shown: Vec<ShownHand> = contesters
                .iter()
                .filter_map(|id| {
                    let hole = *self.hole_cards.get(id)?;
                    let mut cards = hole.to_vec();
                    cards.extend_from_slice(&self.community);
                    let rank = best_hand(&cards).ok()?;
                    Some(ShownHand {
                        player_id: id.clone(),
                        hole,
                        rank,
                    })
                })
                .collect();
            (pot::showdown_winners(&shown), shown, false)
        };

        let (share, lost_remainder) = pot::split_pot(total, winners.len());
        for w in &winners {
            let stack = self.stacks.entry(w.clone()).or_insert(0);
            *stack = stack.saturating_add(share);
        }
        self.pot = 0;

        let mut deltas = BTreeMap::new();
        for p in &mut self.players {
            let final_stack = self.stacks.get(&p.id).copied().unwrap_or(0);
            deltas.insert(p.id.clone(), i64::from(final_stack) - i64::from(p.chips));
            p.chips = final_stack;
        }

        let names: Vec<String> = winners
            .iter()
            .filter_map(|id| self.player(id).map(|p| p.display_name.clone()))
            .collect();
        let message = if uncontested {
            format!("{} wins {} uncontested", names.join(", "), total)
        } else {
            let hand = shown
                .iter()
                .find(|s| winners.contains(&s.player_id))
                .map(|s| s.rank.to_string())
                .unwrap_or_default();
            if winners.len() > 1 {
                format!("{} split {} with {} ({} each)", names.join(", "), total, hand, share)
            } else {
                format!("{} wins {} with {}", names.join(", "), total, hand)
            }
        };
        self.log.push(Phase::Showdown, message);

        self.settlement = Some(Settlement {
            winners,
            pot: total,
            share,
            lost_remainder,
            uncontested,
            shown,
            deltas,
        });
    }

    /// Checks that the document is internally consistent.
    ///
    /// # Errors
    ///
    /// [`GameError::CorruptState`] describing the first inconsistency found.
    pub fn validate(&self) -> Result<(), GameError> {
        let corrupt = |msg: String| Err(GameError::CorruptState(msg));
        let n = self.players.len();
        if n < 2 {
            return corrupt(format!("{} seated players", n));
        }
        if self.community.len() != 5 {
            return corrupt(format!("{} community cards", self.community.len()));
        }
        if self.revealed > 5 {
            return corrupt(format!("{} cards revealed", self.revealed));
        }
        for idx in [
            self.dealer_index,
            self.small_blind_index,
            self.big_blind_index,
            self.acting_index,
        ] {
            if idx >= n {
                return corrupt(format!("seat index {} out of range", idx));
            }
        }
        for p in &self.players {
            if !self.hole_cards.contains_key(&p.id) {
                return corrupt(format!("no hole cards for {}", p.id));
            }
            if !self.stacks.contains_key(&p.id) || !self.committed.contains_key(&p.id) {
                return corrupt(format!("no chip entries for {}", p.id));
            }
        }
        if self.settlement.is_none() {
            if self.total_chips() != self.starting_total {
                return corrupt(format!(
                    "chip total {} differs from {} at hand start",
                    self.total_chips(),
                    self.starting_total
                ));
            }
            if self.phase != Phase::Showdown && !self.is_eligible(&self.players[self.acting_index].id) {
                return corrupt("acting seat cannot act".to_string());
            }
        }
        Ok(())
    }

    /// Serializes the document for the synchronization collaborator.
    pub fn to_json(&self) -> Result<String, GameError> {
        serde_json::to_string(self).map_err(|e| GameError::CorruptState(e.to_string()))
    }

    /// Parses and validates a document received from the synchronization
    /// collaborator.
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        let state: Self =
            serde_json::from_str(json).map_err(|e| GameError::CorruptState(e.to_string()))?;
        state.validate()?;
        Ok(state)
    }

    fn is_eligible(&self, id: &str) -> bool {
        !self.folded.contains(id) && !self.all_in.contains(id)
    }

    fn next_eligible_from(&self, start: usize) -> Option<usize> {
        let n = self.players.len();
        (0..n)
            .map(|k| (start + k) % n)
            .find(|&i| self.is_eligible(&self.players[i].id))
    }

    /// Seats still in the hand (not folded), all-in or not.
    pub fn contesters(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| !self.folded.contains(&p.id))
    }

    pub fn round_id(&self) -> &str {
        &self.round_id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Showdown
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn dealer_index(&self) -> usize {
        self.dealer_index
    }

    pub fn small_blind_index(&self) -> usize {
        self.small_blind_index
    }

    pub fn big_blind_index(&self) -> usize {
        self.big_blind_index
    }

    pub fn blinds(&self) -> Blinds {
        self.blinds
    }

    pub fn acting_index(&self) -> usize {
        self.acting_index
    }

    /// The seat whose turn it is, or `None` once the hand is complete.
    pub fn acting_player(&self) -> Option<&Player> {
        if self.is_complete() {
            None
        } else {
            self.players.get(self.acting_index)
        }
    }

    pub fn hole_cards(&self, id: &str) -> Option<[Card; 2]> {
        self.hole_cards.get(id).copied()
    }

    pub fn visible_community(&self) -> &[Card] {
        &self.community[..self.revealed.min(self.community.len())]
    }

    pub fn pot(&self) -> u32 {
        self.pot
    }

    pub fn current_bet(&self) -> u32 {
        self.current_bet
    }

    pub fn committed_of(&self, id: &str) -> u32 {
        self.committed.get(id).copied().unwrap_or(0)
    }

    pub fn stack_of(&self, id: &str) -> u32 {
        self.stacks.get(id).copied().unwrap_or(0)
    }

    pub fn to_call(&self, id: &str) -> u32 {
        self.current_bet
            .saturating_sub(self.committed_of(id))
            .min(self.stack_of(id))
    }

    pub fn actions_this_phase(&self) -> usize {
        self.actions_this_phase
    }

    pub fn is_folded(&self, id: &str) -> bool {
        self.folded.contains(id)
    }

    pub fn is_all_in(&self, id: &str) -> bool {
        self.all_in.contains(id)
    }

    /// `Σ stacks + Σ committed + pot`, saturating at `u32::MAX` for documents
    /// that were never dealt by [`RoundState::start_round`].
    pub fn total_chips(&self) -> u32 {
        self.stacks
            .values()
            .chain(self.committed.values())
            .fold(self.pot, |acc, &c| acc.saturating_add(c))
    }

    pub fn starting_total(&self) -> u32 {
        self.starting_total
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    pub fn settlement(&self) -> Option<&Settlement> {
        self.settlement.as_ref()
    }

    pub fn legal_actions(&self, id: &str) -> Option<LegalActions> {
        let acting = self.acting_player()?;
        if acting.id != id || !self.is_eligible(id) {
            return None;
        }
        let committed = self.committed_of(id);
        let stack = self.stack_of(id);
        let owed = self.current_bet.saturating_sub(committed);
        let max_raise_to = committed + stack;
        let raisable = max_raise_to > self.current_bet;
        Some(LegalActions {
            can_check: owed == 0,
            call_amount: (owed > 0).then(|| owed.min(stack)),
            min_raise_to: raisable.then_some(self.current_bet + 1),
            max_raise_to: raisable.then_some(max_raise_to),
        })
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
