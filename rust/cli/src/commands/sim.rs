//! `sim`: computer opponents play each other with no delays.
//!
//! Hands are played until the requested count or until one player holds
//! every chip. The summary ends with a chip conservation check: seated
//! stacks plus split remainders must equal the chips the table started with.

use crate::config::Config;
use crate::error::CliError;
use crate::ui;
use crate::validation::validate_hands;
use pokerroom_ai::AIOpponent;
use pokerroom_ai::heuristic::HeuristicAI;
use pokerroom_engine::deck::Deck;
use pokerroom_engine::errors::GameError;
use pokerroom_engine::game::{BOT_AVATARS, BOT_NAMES, Table};
use pokerroom_engine::player::{Player, PlayerAction, random_id};
use pokerroom_engine::round::RoundState;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use std::collections::HashMap;
use std::io::Write;

/// Totals gathered over a simulation run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SimSummary {
    pub hands_played: u32,
    pub showdowns: u32,
    pub uncontested: u32,
    pub lost_remainder: u32,
    /// Pots won (or shared) per player id
    pub wins: HashMap<String, u32>,
}

pub fn handle_sim_command(
    hands: u32,
    players: usize,
    seed: Option<u64>,
    config: &Config,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    if let Err(msg) = validate_hands(hands) {
        ui::write_error(err, &msg)?;
        return Err(CliError::InvalidInput(msg));
    }
    config.table_settings().validate()?;
    let players = players.clamp(2, BOT_NAMES.len());
    let seed = seed.or(config.seed).unwrap_or_else(rand::random);
    writeln!(out, "sim: players={} hands={} seed={}", players, hands, seed)?;

    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let roster: Vec<Player> = BOT_NAMES
        .iter()
        .zip(BOT_AVATARS)
        .take(players)
        .map(|(name, avatar)| {
            Player::bot(random_id(&mut rng), *name, config.starting_chips).with_avatar(avatar)
        })
        .collect();
    let starting_total: u32 = roster.iter().map(|p| p.chips).sum();
    let mut table = Table::new(roster, config.table_settings().round_config());
    let mut deck = Deck::new_with_seed(seed);
    let ai = HeuristicAI::with_seed(seed);

    let summary = run_hands(&mut table, &mut deck, &ai, hands)?;
    tracing::info!(
        seed,
        hands = summary.hands_played,
        showdowns = summary.showdowns,
        lost_remainder = summary.lost_remainder,
        "simulation finished"
    );

    writeln!(out, "Hands played: {}", summary.hands_played)?;
    writeln!(
        out,
        "Showdowns: {}  Uncontested: {}",
        summary.showdowns, summary.uncontested
    )?;
    writeln!(out, "Chips lost to split remainders: {}", summary.lost_remainder)?;
    if table.is_game_over() {
        writeln!(out, "Game over: one player holds every chip")?;
    }
    writeln!(out, "Standings:")?;
    let mut standings: Vec<&Player> = table.players().iter().chain(table.eliminated()).collect();
    standings.sort_by(|a, b| b.chips.cmp(&a.chips).then_with(|| a.display_name.cmp(&b.display_name)));
    for p in standings {
        let wins = summary.wins.get(&p.id).copied().unwrap_or(0);
        let status = if p.is_busted() { "  busted" } else { "" };
        writeln!(
            out,
            "  {} {:<8} {:>6}  wins {}{}",
            p.avatar, p.display_name, p.chips, wins, status
        )?;
    }

    let seated = table.total_chips();
    if seated + summary.lost_remainder != starting_total {
        let msg = format!(
            "chip conservation violated: {} seated + {} lost != {} at start",
            seated, summary.lost_remainder, starting_total
        );
        ui::write_error(err, &msg)?;
        return Err(GameError::CorruptState(msg).into());
    }
    writeln!(out, "Chip conservation: ok ({} + {} lost)", seated, summary.lost_remainder)?;
    Ok(())
}

/// Plays up to `hands` hands, stopping early once the table is decided.
pub fn run_hands(
    table: &mut Table,
    deck: &mut Deck,
    ai: &dyn AIOpponent,
    hands: u32,
) -> Result<SimSummary, GameError> {
    let mut summary = SimSummary::default();
    while summary.hands_played < hands && !table.is_game_over() {
        let mut round = table.start_round(deck)?;
        while let Some(actor) = round.acting_player().map(|p| p.id.clone()) {
            play_turn(&mut round, ai, &actor)?;
        }

        let settlement = round
            .settlement()
            .ok_or_else(|| GameError::CorruptState("round ended without settlement".into()))?;
        if settlement.uncontested {
            summary.uncontested += 1;
        } else {
            summary.showdowns += 1;
        }
        summary.lost_remainder += settlement.lost_remainder;
        for winner in &settlement.winners {
            *summary.wins.entry(winner.clone()).or_default() += 1;
        }

        let busted = table.finish_round(&round)?;
        for id in busted {
            tracing::debug!(player_id = %id, hand = summary.hands_played + 1, "player busted");
        }
        summary.hands_played += 1;
    }
    Ok(summary)
}

fn play_turn(round: &mut RoundState, ai: &dyn AIOpponent, actor: &str) -> Result<(), GameError> {
    let action = ai.get_action(round, actor);
    match round.apply_action(actor, action) {
        Ok(()) => Ok(()),
        Err(e) => {
            tracing::warn!(player_id = %actor, action = %action, error = %e, "bot action rejected, falling back");
            let fallback = if round.to_call(actor) == 0 {
                PlayerAction::Check
            } else {
                PlayerAction::Fold
            };
            round.apply_action(actor, fallback)
        }
    }
}
