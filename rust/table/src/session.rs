//! Practice sessions and single-writer arbitration of the round document.
//!
//! Every session owns one [`RoundState`] behind a mutex together with a
//! version counter. Writers name the version they acted on; a mismatch is
//! rejected with [`SessionError::StaleVersion`] instead of overwriting a newer
//! document. Computer seats act through the [`BotScheduler`] after the
//! configured delay, and a fired turn re-checks round id and version before
//! touching the document.

use crate::errors::{ErrorSeverity, IntoErrorResponse};
use crate::events::{EventBus, GameEvent, PlayerInfo};
use crate::leaderboard::{Leaderboard, LeaderboardError};
use crate::scheduler::{BotScheduler, SchedulerError};
use crate::settings::{SettingsError, SettingsStore, TableSettings};
use pokerroom_ai::heuristic::HeuristicAI;
use pokerroom_ai::AIOpponent;
use pokerroom_engine::deck::Deck;
use pokerroom_engine::errors::GameError;
use pokerroom_engine::game::Table;
use pokerroom_engine::player::{random_id, Player, PlayerAction, PlayerId};
use pokerroom_engine::round::{LegalActions, RoundState};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, RwLock, Weak};
use std::time::Instant;
use thiserror::Error;
use uuid::Uuid;

pub type SessionId = String;

/// Parameters for a new practice session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    pub player_name: String,
    #[serde(default)]
    pub avatar: Option<String>,
    /// Fixes seat ids, shuffles and bot decisions
    #[serde(default)]
    pub seed: Option<u64>,
    /// Overrides the manager's current settings
    #[serde(default)]
    pub settings: Option<TableSettings>,
}

impl SessionConfig {
    pub fn new(player_name: impl Into<String>) -> Self {
        Self {
            player_name: player_name.into(),
            ..Default::default()
        }
    }
}

/// Read-only view of a session handed to UI collaborators.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub session_id: SessionId,
    pub version: u64,
    pub human_id: PlayerId,
    pub players: Vec<PlayerInfo>,
    pub eliminated: Vec<PlayerInfo>,
    pub hands_played: u32,
    pub game_over: bool,
    pub round: RoundState,
    /// Present only while it is the human's turn
    pub legal_actions: Option<LegalActions>,
}

impl SessionSnapshot {
    pub fn is_human_turn(&self) -> bool {
        self.legal_actions.is_some()
    }

    pub fn acting_player_id(&self) -> Option<&str> {
        self.round.acting_player().map(|p| p.id.as_str())
    }
}

/// Owner of all practice sessions and their shared collaborators.
///
/// Cloning is cheap; clones share the same sessions.
#[derive(Debug, Clone)]
pub struct SessionManager {
    inner: Arc<ManagerInner>,
}

#[derive(Debug)]
struct ManagerInner {
    sessions: RwLock<HashMap<SessionId, Arc<TableSession>>>,
    event_bus: Arc<EventBus>,
    leaderboard: Arc<Leaderboard>,
    settings: Arc<SettingsStore>,
    scheduler: BotScheduler,
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new(
            Arc::new(EventBus::new()),
            Arc::new(Leaderboard::new()),
            Arc::new(SettingsStore::new()),
        )
    }
}

impl SessionManager {
    pub fn new(
        event_bus: Arc<EventBus>,
        leaderboard: Arc<Leaderboard>,
        settings: Arc<SettingsStore>,
    ) -> Self {
        Self {
            inner: Arc::new(ManagerInner {
                sessions: RwLock::new(HashMap::new()),
                event_bus,
                leaderboard,
                settings,
                scheduler: BotScheduler::new(),
            }),
        }
    }

    pub fn event_bus(&self) -> Arc<EventBus> {
        Arc::clone(&self.inner.event_bus)
    }

    pub fn leaderboard(&self) -> Arc<Leaderboard> {
        Arc::clone(&self.inner.leaderboard)
    }

    pub fn settings(&self) -> Arc<SettingsStore> {
        Arc::clone(&self.inner.settings)
    }

    /// Seats the human with computer opponents and deals the first round.
    ///
    /// Must be called inside a tokio runtime when a computer seat acts first.
    pub fn create_session(&self, config: SessionConfig) -> Result<SessionId, SessionError> {
        let settings = match config.settings {
            Some(settings) => settings,
            None => self.inner.settings.get()?,
        };
        settings.validate()?;
        let name = config.player_name.trim();
        if name.is_empty() {
            return Err(SessionError::InvalidConfig(
                "player name cannot be empty".to_string(),
            ));
        }

        let mut rng = match config.seed {
            Some(seed) => ChaCha20Rng::seed_from_u64(seed),
            None => ChaCha20Rng::from_os_rng(),
        };
        let mut human = Player::new(random_id(&mut rng), name, settings.starting_chips);
        if let Some(avatar) = config.avatar {
            human = human.with_avatar(avatar);
        }
        let human_id = human.id.clone();
        let table = Table::practice(
            human,
            settings.bot_count,
            settings.starting_chips,
            settings.round_config(),
            &mut rng,
        );
        let (mut deck, ai) = match config.seed {
            Some(seed) => (Deck::new_with_seed(seed), HeuristicAI::with_seed(seed)),
            None => (Deck::new(), HeuristicAI::new()),
        };
        let round = table.start_round(&mut deck)?;

        let id = Uuid::new_v4().to_string();
        tracing::info!(
            session_id = %id,
            player_id = %human_id,
            bots = settings.bot_count,
            "creating practice session"
        );

        let players: Vec<PlayerInfo> = table.players().iter().map(PlayerInfo::from).collect();
        let started = GameEvent::RoundStarted {
            session_id: id.clone(),
            round_id: round.round_id().to_string(),
            dealer: dealer_id(&round),
            version: 1,
        };
        let session = Arc::new(TableSession {
            id: id.clone(),
            human_id,
            settings,
            ai: Box::new(ai),
            created_at: Instant::now(),
            state: Mutex::new(SessionState {
                table,
                deck,
                round,
                version: 1,
                game_over: false,
            }),
        });

        {
            let mut guard = self
                .inner
                .sessions
                .write()
                .map_err(|_| SessionError::StoragePoisoned)?;
            guard.insert(id.clone(), Arc::clone(&session));
        }

        let scheduled = session
            .lock_state()
            .and_then(|state| self.schedule_bot_turn(&session, &state));
        if let Err(err) = scheduled {
            if let Err(cleanup_err) = self.remove_session(&id) {
                tracing::error!(
                    session_id = %id,
                    error = %cleanup_err,
                    "failed to roll back session after scheduling failure"
                );
            }
            return Err(err);
        }

        self.inner.event_bus.broadcast(
            &id,
            GameEvent::GameStarted {
                session_id: id.clone(),
                players,
            },
        );
        self.inner.event_bus.broadcast(&id, started);
        Ok(id)
    }

    pub fn get_session(&self, id: &SessionId) -> Result<Arc<TableSession>, SessionError> {
        let guard = self
            .inner
            .sessions
            .read()
            .map_err(|_| SessionError::StoragePoisoned)?;
        guard
            .get(id)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(id.clone()))
    }

    pub fn snapshot(&self, session_id: &SessionId) -> Result<SessionSnapshot, SessionError> {
        let session = self.get_session(session_id)?;
        let state = session.lock_state()?;
        Ok(session.snapshot(&state))
    }

    /// Applies the human's action if `expected_version` is still current.
    ///
    /// Returns the new version.
    pub fn submit_action(
        &self,
        session_id: &SessionId,
        expected_version: u64,
        actor_id: &str,
        action: PlayerAction,
    ) -> Result<u64, SessionError> {
        let session = self.get_session(session_id)?;
        let (version, events) = {
            let mut state = session.lock_state()?;
            session.check_writable(&state, expected_version)?;
            if actor_id != session.human_id {
                return Err(SessionError::NotHumanSeat(actor_id.to_string()));
            }

            tracing::debug!(
                session_id = %session_id,
                player_id = %actor_id,
                action = %action,
                version = expected_version,
                "processing player action"
            );
            let events = self.apply_locked(&session, &mut state, actor_id, action)?;
            self.schedule_bot_turn(&session, &state)?;
            (state.version, events)
        };
        self.broadcast_all(session_id, events);
        Ok(version)
    }

    /// Deals the next round once the current one is settled.
    pub fn start_next_round(
        &self,
        session_id: &SessionId,
        expected_version: u64,
    ) -> Result<u64, SessionError> {
        let session = self.get_session(session_id)?;
        let (version, event) = {
            let mut state = session.lock_state()?;
            session.check_writable(&state, expected_version)?;
            if !state.round.is_complete() {
                return Err(SessionError::RoundInProgress);
            }
            self.inner.scheduler.cancel(session_id);

            let SessionState { table, deck, .. } = &mut *state;
            let round = table.start_round(deck)?;
            state.round = round;
            state.version += 1;
            tracing::debug!(
                session_id = %session_id,
                round_id = %state.round.round_id(),
                hand = state.table.hands_played() + 1,
                "round started"
            );
            self.schedule_bot_turn(&session, &state)?;
            let event = GameEvent::RoundStarted {
                session_id: session_id.clone(),
                round_id: state.round.round_id().to_string(),
                dealer: dealer_id(&state.round),
                version: state.version,
            };
            (state.version, event)
        };
        self.inner.event_bus.broadcast(session_id, event);
        Ok(version)
    }

    /// Removes the session, cancelling any pending computer turn.
    pub fn leave(&self, session_id: &SessionId) -> Result<(), SessionError> {
        let session = self
            .remove_session(session_id)?
            .ok_or_else(|| SessionError::NotFound(session_id.clone()))?;

        if let Ok(state) = session.lock_state() {
            if let Some(human) = state.table.player(&session.human_id) {
                self.inner
                    .leaderboard
                    .record(&human.display_name, &human.avatar, human.chips)?;
            }
        }
        tracing::info!(
            session_id = %session_id,
            age_secs = session.created_at.elapsed().as_secs(),
            "player left the table"
        );
        self.inner.event_bus.broadcast(
            session_id,
            GameEvent::GameEnded {
                session_id: session_id.clone(),
                winner: None,
                reason: "player_left".into(),
            },
        );
        self.inner.event_bus.drop_session(session_id);
        Ok(())
    }

    pub fn active_sessions(&self) -> Vec<SessionId> {
        match self.inner.sessions.read() {
            Ok(guard) => guard.keys().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Whether a computer turn is waiting on its timer.
    pub fn bot_turn_pending(&self, session_id: &SessionId) -> bool {
        self.inner.scheduler.is_pending(session_id)
    }

    fn remove_session(
        &self,
        session_id: &SessionId,
    ) -> Result<Option<Arc<TableSession>>, SessionError> {
        let removed = match self.inner.sessions.write() {
            Ok(mut guard) => guard.remove(session_id),
            Err(_) => return Err(SessionError::StoragePoisoned),
        };
        self.inner.scheduler.cancel(session_id);
        Ok(removed)
    }

    /// Applies one action and, if it ends the round, settles the table.
    fn apply_locked(
        &self,
        session: &TableSession,
        state: &mut SessionState,
        actor_id: &str,
        action: PlayerAction,
    ) -> Result<Vec<GameEvent>, SessionError> {
        let phase_before = state.round.phase();
        state.round.apply_action(actor_id, action)?;
        state.version += 1;

        let round_id = state.round.round_id().to_string();
        let mut events = vec![GameEvent::ActionApplied {
            session_id: session.id.clone(),
            round_id: round_id.clone(),
            player_id: actor_id.to_string(),
            action,
            version: state.version,
        }];
        if state.round.phase() != phase_before {
            events.push(GameEvent::PhaseChanged {
                session_id: session.id.clone(),
                round_id: round_id.clone(),
                phase: state.round.phase(),
                community: state.round.visible_community().to_vec(),
            });
        }
        if state.round.is_complete() {
            events.extend(self.settle_locked(session, state)?);
        }
        Ok(events)
    }

    fn settle_locked(
        &self,
        session: &TableSession,
        state: &mut SessionState,
    ) -> Result<Vec<GameEvent>, SessionError> {
        let mut events = Vec::new();
        if let Some(settlement) = state.round.settlement() {
            tracing::info!(
                session_id = %session.id,
                round_id = %state.round.round_id(),
                winners = ?settlement.winners,
                pot = settlement.pot,
                lost_remainder = settlement.lost_remainder,
                "round settled"
            );
            events.push(GameEvent::RoundSettled {
                session_id: session.id.clone(),
                round_id: state.round.round_id().to_string(),
                settlement: settlement.clone(),
            });
        }

        let busted = state.table.finish_round(&state.round)?;
        for player_id in busted {
            events.push(GameEvent::PlayerBusted {
                session_id: session.id.clone(),
                player_id,
            });
        }

        let human = state.table.player(&session.human_id);
        if let Some(human) = human {
            self.inner
                .leaderboard
                .record(&human.display_name, &human.avatar, human.chips)?;
        }

        let human_busted = human.is_none();
        if human_busted || state.table.is_game_over() {
            state.game_over = true;
            let winner = match state.table.players() {
                [last] => Some(last.id.clone()),
                _ => None,
            };
            let reason = if human_busted {
                "player_busted"
            } else {
                "table_won"
            };
            tracing::info!(session_id = %session.id, reason, "game over");
            events.push(GameEvent::GameEnded {
                session_id: session.id.clone(),
                winner,
                reason: reason.into(),
            });
        }
        Ok(events)
    }

    /// Arms the timer when a computer seat is to act next.
    fn schedule_bot_turn(
        &self,
        session: &TableSession,
        state: &SessionState,
    ) -> Result<(), SessionError> {
        if state.game_over {
            return Ok(());
        }
        let Some(actor) = state.round.acting_player() else {
            return Ok(());
        };
        if !actor.is_bot {
            return Ok(());
        }

        let manager: Weak<ManagerInner> = Arc::downgrade(&self.inner);
        let session_id = session.id.clone();
        let round_id = state.round.round_id().to_string();
        let version = state.version;
        let (sid, rid) = (session_id.clone(), round_id.clone());
        self.inner.scheduler.schedule(
            &session_id,
            &round_id,
            session.settings.bot_delay(),
            move || {
                if let Some(inner) = manager.upgrade() {
                    SessionManager { inner }.play_bot_turn(&sid, &rid, version);
                }
            },
        )?;
        Ok(())
    }

    /// Timer callback: acts for the computer seat unless the document moved on.
    fn play_bot_turn(&self, session_id: &SessionId, round_id: &str, version: u64) {
        let Ok(session) = self.get_session(session_id) else {
            tracing::debug!(session_id = %session_id, "bot turn for a closed session ignored");
            return;
        };

        let events = {
            let mut state = match session.lock_state() {
                Ok(state) => state,
                Err(err) => {
                    err.report();
                    return;
                }
            };
            if state.version != version || state.round.round_id() != round_id {
                tracing::debug!(
                    session_id = %session_id,
                    round_id = %round_id,
                    scheduled_version = version,
                    current_version = state.version,
                    "stale bot turn ignored"
                );
                return;
            }
            let Some(actor_id) = state
                .round
                .acting_player()
                .filter(|p| p.is_bot)
                .map(|p| p.id.clone())
            else {
                return;
            };

            let action = session.ai.get_action(&state.round, &actor_id);
            let mut events = match self.apply_locked(&session, &mut state, &actor_id, action) {
                Ok(events) => events,
                Err(err) => {
                    tracing::warn!(
                        session_id = %session_id,
                        player_id = %actor_id,
                        action = %action,
                        error = %err,
                        "bot action rejected, falling back"
                    );
                    let fallback = if state.round.to_call(&actor_id) == 0 {
                        PlayerAction::Check
                    } else {
                        PlayerAction::Fold
                    };
                    match self.apply_locked(&session, &mut state, &actor_id, fallback) {
                        Ok(events) => events,
                        Err(err) => {
                            let response = err.report();
                            vec![GameEvent::Error {
                                session_id: session_id.clone(),
                                message: response.message,
                            }]
                        }
                    }
                }
            };
            if let Err(err) = self.schedule_bot_turn(&session, &state) {
                let response = err.report();
                events.push(GameEvent::Error {
                    session_id: session_id.clone(),
                    message: response.message,
                });
            }
            events
        };
        self.broadcast_all(session_id, events);
    }

    fn broadcast_all(&self, session_id: &SessionId, events: Vec<GameEvent>) {
        for event in events {
            self.inner.event_bus.broadcast(session_id, event);
        }
    }
}

fn dealer_id(round: &RoundState) -> PlayerId {
    round
        .players()
        .get(round.dealer_index())
        .map(|p| p.id.clone())
        .unwrap_or_default()
}

/// One human against computer seats, with its own deck and decision policy.
pub struct TableSession {
    id: SessionId,
    human_id: PlayerId,
    settings: TableSettings,
    ai: Box<dyn AIOpponent>,
    created_at: Instant,
    state: Mutex<SessionState>,
}

#[derive(Debug)]
struct SessionState {
    table: Table,
    deck: Deck,
    round: RoundState,
    version: u64,
    game_over: bool,
}

impl std::fmt::Debug for TableSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableSession")
            .field("id", &self.id)
            .field("human_id", &self.human_id)
            .field("settings", &self.settings)
            .field("ai", &self.ai.name())
            .field("created_at", &self.created_at)
            .finish()
    }
}

impl TableSession {
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn human_id(&self) -> &str {
        &self.human_id
    }

    pub fn settings(&self) -> &TableSettings {
        &self.settings
    }

    fn lock_state(&self) -> Result<MutexGuard<'_, SessionState>, SessionError> {
        self.state.lock().map_err(|_| SessionError::StoragePoisoned)
    }

    fn check_writable(&self, state: &SessionState, expected: u64) -> Result<(), SessionError> {
        if state.game_over {
            return Err(SessionError::GameOver(self.id.clone()));
        }
        if state.version != expected {
            tracing::debug!(
                session_id = %self.id,
                expected,
                actual = state.version,
                "stale write rejected"
            );
            return Err(SessionError::StaleVersion {
                expected,
                actual: state.version,
            });
        }
        Ok(())
    }

    fn snapshot(&self, state: &SessionState) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.id.clone(),
            version: state.version,
            human_id: self.human_id.clone(),
            players: state.table.players().iter().map(PlayerInfo::from).collect(),
            eliminated: state.table.eliminated().iter().map(PlayerInfo::from).collect(),
            hands_played: state.table.hands_played(),
            game_over: state.game_over,
            round: state.round.clone(),
            legal_actions: if state.game_over {
                None
            } else {
                state.round.legal_actions(&self.human_id)
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session not found: {0}")]
    NotFound(SessionId),
    #[error("Stale version {expected}, the table is at version {actual}")]
    StaleVersion { expected: u64, actual: u64 },
    #[error("Game over in session {0}")]
    GameOver(SessionId),
    #[error("The current round is still in progress")]
    RoundInProgress,
    #[error("Seat {0} is not controlled by the player")]
    NotHumanSeat(PlayerId),
    #[error("Invalid session config: {0}")]
    InvalidConfig(String),
    #[error("Game engine error: {0}")]
    Engine(#[from] GameError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Leaderboard(#[from] LeaderboardError),
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
    #[error("Session storage poisoned")]
    StoragePoisoned,
}

impl IntoErrorResponse for SessionError {
    fn error_code(&self) -> &'static str {
        match self {
            SessionError::NotFound(_) => "session_not_found",
            SessionError::StaleVersion { .. } => "stale_version",
            SessionError::GameOver(_) => "game_over",
            SessionError::RoundInProgress => "round_in_progress",
            SessionError::NotHumanSeat(_) => "not_human_seat",
            SessionError::InvalidConfig(_) => "invalid_config",
            SessionError::Engine(_) => "illegal_action",
            SessionError::Settings(_) => "invalid_settings",
            SessionError::Leaderboard(_) | SessionError::StoragePoisoned => {
                "session_storage_error"
            }
            SessionError::Scheduler(_) => "scheduler_error",
        }
    }

    fn error_message(&self) -> String {
        self.to_string()
    }

    fn error_details(&self) -> Option<serde_json::Value> {
        match self {
            SessionError::NotFound(id) | SessionError::GameOver(id) => Some(serde_json::json!({
                "session_id": id
            })),
            SessionError::StaleVersion { expected, actual } => Some(serde_json::json!({
                "expected": expected,
                "actual": actual
            })),
            SessionError::Engine(err) => Some(serde_json::json!({
                "kind": format!("{:?}", err.kind())
            })),
            _ => None,
        }
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            SessionError::StoragePoisoned | SessionError::Leaderboard(_) => ErrorSeverity::Critical,
            SessionError::Engine(err)
                if err.kind() == pokerroom_engine::errors::ErrorKind::CorruptState =>
            {
                ErrorSeverity::Critical
            }
            SessionError::Scheduler(_) => ErrorSeverity::Server,
            _ => ErrorSeverity::Client,
        }
    }
}
