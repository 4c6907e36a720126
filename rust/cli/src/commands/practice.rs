//! `practice`: one human against computer opponents in the terminal.
//!
//! The table runs on a single-threaded tokio runtime so computer turns keep
//! their pacing delay. The loop re-reads the session snapshot after every
//! change: the human is prompted on their turn, otherwise the loop waits for
//! the next table event. Typing `q` (or closing stdin) leaves the table.

use crate::config::Config;
use crate::error::CliError;
use crate::formatters::{format_board, format_card, format_hand_rank, format_legal_actions};
use crate::io_utils::read_stdin_line;
use crate::ui;
use crate::validation::{ParseResult, parse_player_action, resolve_all_in};
use pokerroom_engine::player::PlayerId;
use pokerroom_engine::round::{LegalActions, RoundState};
use pokerroom_table::{
    EventBus, EventSubscription, GameEvent, Leaderboard, SessionConfig, SessionError, SessionId,
    SessionManager, SessionSnapshot, SettingsStore,
};
use std::collections::HashMap;
use std::io::{BufRead, Write};
use std::sync::Arc;
use std::time::Duration;

// Extra wait beyond the bot delay before the table counts as stalled
const BOT_TURN_GRACE: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Default)]
pub struct PracticeOptions {
    pub name: String,
    pub avatar: Option<String>,
    pub bots: Option<usize>,
    pub seed: Option<u64>,
    pub hands: Option<u32>,
    pub bot_delay_ms: Option<u64>,
}

pub fn handle_practice_command(
    opts: PracticeOptions,
    config: &Config,
    stdin: &mut dyn BufRead,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    if opts.hands == Some(0) {
        ui::write_error(err, "hands must be >= 1")?;
        return Err(CliError::InvalidInput("hands must be >= 1".to_string()));
    }

    let mut settings = config.table_settings();
    if let Some(bots) = opts.bots {
        settings.bot_count = bots;
    }
    if let Some(delay) = opts.bot_delay_ms {
        settings.bot_delay_ms = delay;
    }
    let delay = settings.bot_delay();
    let manager = SessionManager::new(
        Arc::new(EventBus::new()),
        Arc::new(Leaderboard::new()),
        Arc::new(SettingsStore::with_settings(settings)?),
    );
    let session_config = SessionConfig {
        player_name: opts.name,
        avatar: opts.avatar,
        seed: opts.seed.or(config.seed),
        settings: None,
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    runtime.block_on(async {
        let id = manager.create_session(session_config)?;
        let mut events = manager.event_bus().subscribe(id.clone());
        let mut table = TableView::new(&manager, id.clone(), delay)?;

        let played = table.run(&mut events, opts.hands, stdin, out, err).await;
        let left = manager.leave(&id);
        played?;
        left?;
        write_farewell(&manager, out)
    })
}

fn write_farewell(manager: &SessionManager, out: &mut dyn Write) -> Result<(), CliError> {
    let best = manager
        .leaderboard()
        .top(5)
        .map_err(SessionError::from)?;
    writeln!(out)?;
    ui::section(out, "Personal bests")?;
    for entry in best {
        writeln!(out, "  {} {} {}", entry.avatar, entry.name, entry.best_chips)?;
    }
    Ok(())
}

/// Terminal state for one session: names, which log lines were shown, and
/// which hands were already summarized.
struct TableView<'a> {
    manager: &'a SessionManager,
    id: SessionId,
    delay: Duration,
    names: HashMap<PlayerId, String>,
    shown_round: String,
    next_seq: u64,
    settled_round: String,
    hands_done: u32,
}

impl<'a> TableView<'a> {
    fn new(manager: &'a SessionManager, id: SessionId, delay: Duration) -> Result<Self, CliError> {
        let snapshot = manager.snapshot(&id)?;
        let names = snapshot
            .players
            .iter()
            .map(|p| (p.id.clone(), p.display_name.clone()))
            .collect();
        Ok(Self {
            manager,
            id,
            delay,
            names,
            shown_round: String::new(),
            next_seq: 0,
            settled_round: String::new(),
            hands_done: 0,
        })
    }

    async fn run(
        &mut self,
        events: &mut EventSubscription,
        hands_limit: Option<u32>,
        stdin: &mut dyn BufRead,
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> Result<(), CliError> {
        loop {
            let snapshot = self.manager.snapshot(&self.id)?;
            if snapshot.round.round_id() != self.shown_round {
                self.announce_hand(&snapshot, out)?;
            }
            self.write_new_log_lines(&snapshot.round, out)?;
            while let Ok(event) = events.receiver.try_recv() {
                self.write_event(&event, out, err)?;
            }

            if snapshot.round.is_complete() && snapshot.round.round_id() != self.settled_round {
                self.settled_round = snapshot.round.round_id().to_string();
                self.hands_done += 1;
                self.write_showdown(&snapshot, out)?;
            }
            if snapshot.game_over {
                writeln!(out, "Game over.")?;
                return Ok(());
            }

            if snapshot.round.is_complete() {
                if hands_limit.is_some_and(|limit| self.hands_done >= limit) {
                    return Ok(());
                }
                ui::prompt(out, "Press Enter for the next hand (q to quit): ")?;
                match read_stdin_line(stdin) {
                    None => return Ok(()),
                    Some(line) if matches!(line.to_lowercase().as_str(), "q" | "quit") => {
                        return Ok(());
                    }
                    Some(_) => {}
                }
                match self.manager.start_next_round(&self.id, snapshot.version) {
                    Ok(_) | Err(SessionError::StaleVersion { .. }) => continue,
                    Err(e) => return Err(e.into()),
                }
            }

            if let Some(legal) = snapshot.legal_actions {
                if !self.human_turn(&snapshot, &legal, stdin, out, err)? {
                    return Ok(());
                }
                continue;
            }

            let wait = self.delay + BOT_TURN_GRACE;
            match tokio::time::timeout(wait, events.receiver.recv()).await {
                Ok(Some(event)) => self.write_event(&event, out, err)?,
                Ok(None) => return Ok(()),
                Err(_) => {
                    return Err(CliError::Stalled(format!(
                        "no computer action within {} ms",
                        wait.as_millis()
                    )));
                }
            }
        }
    }

    /// Prompts once and submits the action. Returns `false` when the player quits.
    fn human_turn(
        &mut self,
        snapshot: &SessionSnapshot,
        legal: &LegalActions,
        stdin: &mut dyn BufRead,
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> Result<bool, CliError> {
        let round = &snapshot.round;
        let human = &snapshot.human_id;
        writeln!(
            out,
            "Board: {}  Pot: {}  Stack: {}  To call: {}",
            format_board(round.visible_community()),
            round.pot() + round.players().iter().map(|p| round.committed_of(&p.id)).sum::<u32>(),
            round.stack_of(human),
            round.to_call(human)
        )?;
        writeln!(out, "Options: {}", format_legal_actions(legal))?;
        ui::prompt(out, "Your action: ")?;

        let Some(line) = read_stdin_line(stdin) else {
            return Ok(false);
        };
        let action = match parse_player_action(&line) {
            ParseResult::Action(action) => action,
            ParseResult::AllIn => match resolve_all_in(legal) {
                Some(action) => action,
                None => {
                    ui::write_error(err, "Nothing to go all-in with, check instead")?;
                    return Ok(true);
                }
            },
            ParseResult::Quit => return Ok(false),
            ParseResult::Invalid(msg) => {
                ui::write_error(err, &msg)?;
                return Ok(true);
            }
        };

        match self
            .manager
            .submit_action(&self.id, snapshot.version, human, action)
        {
            Ok(_) | Err(SessionError::StaleVersion { .. }) => {}
            Err(SessionError::Engine(e)) => {
                ui::write_error(err, &format!("Invalid action: {}", e))?;
            }
            Err(e) => return Err(e.into()),
        }
        Ok(true)
    }

    fn announce_hand(&mut self, snapshot: &SessionSnapshot, out: &mut dyn Write) -> Result<(), CliError> {
        self.shown_round = snapshot.round.round_id().to_string();
        self.next_seq = 0;

        writeln!(out)?;
        ui::section(out, &format!("Hand {}", snapshot.hands_played + 1))?;
        for p in &snapshot.players {
            let marker = if p.id == snapshot.human_id { " (you)" } else { "" };
            writeln!(out, "  {} {:<8} {:>6}{}", p.avatar, p.display_name, p.chips, marker)?;
        }
        if let Some([a, b]) = snapshot.round.hole_cards(&snapshot.human_id) {
            writeln!(out, "Your cards: {} {}", format_card(&a), format_card(&b))?;
        }
        Ok(())
    }

    fn write_new_log_lines(&mut self, round: &RoundState, out: &mut dyn Write) -> Result<(), CliError> {
        let from = self.next_seq;
        for entry in round.log().entries().filter(|e| e.seq >= from) {
            writeln!(out, "  {}", entry.message)?;
            self.next_seq = entry.seq + 1;
        }
        Ok(())
    }

    fn write_showdown(&self, snapshot: &SessionSnapshot, out: &mut dyn Write) -> Result<(), CliError> {
        let Some(settlement) = snapshot.round.settlement() else {
            return Ok(());
        };
        for shown in &settlement.shown {
            writeln!(
                out,
                "  {} shows {} {}: {}",
                self.name(&shown.player_id),
                format_card(&shown.hole[0]),
                format_card(&shown.hole[1]),
                format_hand_rank(&shown.rank)
            )?;
        }
        if settlement.lost_remainder > 0 {
            writeln!(out, "  {} odd chip(s) lost in the split", settlement.lost_remainder)?;
        }
        Ok(())
    }

    fn write_event(&self, event: &GameEvent, out: &mut dyn Write, err: &mut dyn Write) -> Result<(), CliError> {
        match event {
            GameEvent::PlayerBusted { player_id, .. } => {
                writeln!(out, "  {} is out of chips", self.name(player_id))?;
            }
            GameEvent::GameEnded { winner: Some(winner), .. } => {
                writeln!(out, "  {} wins the table!", self.name(winner))?;
            }
            GameEvent::Error { message, .. } => ui::write_error(err, message)?,
            _ => {}
        }
        Ok(())
    }

    fn name<'n>(&'n self, id: &'n str) -> &'n str {
        self.names.get(id).map(String::as_str).unwrap_or(id)
    }
}
