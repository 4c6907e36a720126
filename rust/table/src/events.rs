use crate::session::SessionId;
use pokerroom_engine::cards::Card;
use pokerroom_engine::logger::Phase;
use pokerroom_engine::player::{Player, PlayerAction, PlayerId};
use pokerroom_engine::pot::Settlement;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::mpsc;

// Slow subscribers lose events instead of growing the queue
const EVENT_CHANNEL_BUFFER: usize = 1000;

pub type EventSender = mpsc::Sender<GameEvent>;
pub type EventReceiver = mpsc::Receiver<GameEvent>;

pub struct EventSubscription {
    bus: EventBus,
    session_id: SessionId,
    subscriber_id: usize,
    pub receiver: EventReceiver,
}

impl EventSubscription {
    pub fn receiver(&mut self) -> &mut EventReceiver {
        &mut self.receiver
    }
}

impl Drop for EventSubscription {
    fn drop(&mut self) {
        self.bus.unsubscribe(&self.session_id, self.subscriber_id);
    }
}

/// Per-session fan-out of [`GameEvent`]s to UI collaborators.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    inner: Arc<EventBusInner>,
}

#[derive(Debug, Default)]
struct EventBusInner {
    subscribers: RwLock<HashMap<SessionId, Vec<(usize, EventSender)>>>,
    next_id: AtomicUsize,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, session_id: SessionId) -> EventSubscription {
        let (subscriber_id, receiver) = self.subscribe_raw(session_id.clone());
        EventSubscription {
            bus: self.clone(),
            session_id,
            subscriber_id,
            receiver,
        }
    }

    fn subscribe_raw(&self, session_id: SessionId) -> (usize, EventReceiver) {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_BUFFER);
        let id = self.inner.next_id.fetch_add(1, Ordering::AcqRel);
        let mut guard = self
            .inner
            .subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        guard.entry(session_id.clone()).or_default().push((id, tx));

        tracing::info!(
            session_id = %session_id,
            subscriber_id = id,
            "client subscribed to game events"
        );

        (id, rx)
    }

    pub fn broadcast(&self, session_id: &SessionId, event: GameEvent) {
        tracing::debug!(
            session_id = %session_id,
            event_type = event.kind(),
            "broadcasting game event"
        );

        let subscribers = {
            let guard = self
                .inner
                .subscribers
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            guard.get(session_id).cloned()
        };

        let Some(list) = subscribers else {
            tracing::trace!(session_id = %session_id, "no subscribers for session");
            return;
        };

        let mut failed = Vec::new();
        for (id, sender) in list {
            if let Err(e) = sender.try_send(event.clone()) {
                tracing::warn!(
                    session_id = %session_id,
                    subscriber_id = id,
                    error = ?e,
                    "failed to send event to subscriber"
                );
                failed.push(id);
            }
        }
        if !failed.is_empty() {
            self.remove_subscribers(session_id, &failed);
        }
    }

    pub fn unsubscribe(&self, session_id: &SessionId, subscriber_id: usize) {
        self.remove_subscribers(session_id, &[subscriber_id]);
    }

    pub fn drop_session(&self, session_id: &SessionId) {
        let mut guard = self
            .inner
            .subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        guard.remove(session_id);
    }

    pub fn subscriber_count(&self) -> usize {
        let guard = self
            .inner
            .subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        guard.values().map(|list| list.len()).sum()
    }

    fn remove_subscribers(&self, session_id: &SessionId, ids: &[usize]) {
        let mut guard = self
            .inner
            .subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(list) = guard.get_mut(session_id) {
            list.retain(|(id, _)| !ids.contains(id));
            if list.is_empty() {
                guard.remove(session_id);
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    GameStarted {
        session_id: SessionId,
        players: Vec<PlayerInfo>,
    },
    RoundStarted {
        session_id: SessionId,
        round_id: String,
        dealer: PlayerId,
        version: u64,
    },
    ActionApplied {
        session_id: SessionId,
        round_id: String,
        player_id: PlayerId,
        action: PlayerAction,
        version: u64,
    },
    PhaseChanged {
        session_id: SessionId,
        round_id: String,
        phase: Phase,
        community: Vec<Card>,
    },
    RoundSettled {
        session_id: SessionId,
        round_id: String,
        settlement: Settlement,
    },
    PlayerBusted {
        session_id: SessionId,
        player_id: PlayerId,
    },
    GameEnded {
        session_id: SessionId,
        winner: Option<PlayerId>,
        reason: String,
    },
    Error {
        session_id: SessionId,
        message: String,
    },
}

impl GameEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            GameEvent::GameStarted { .. } => "game_started",
            GameEvent::RoundStarted { .. } => "round_started",
            GameEvent::ActionApplied { .. } => "action_applied",
            GameEvent::PhaseChanged { .. } => "phase_changed",
            GameEvent::RoundSettled { .. } => "round_settled",
            GameEvent::PlayerBusted { .. } => "player_busted",
            GameEvent::GameEnded { .. } => "game_ended",
            GameEvent::Error { .. } => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub id: PlayerId,
    pub display_name: String,
    pub avatar: String,
    pub chips: u32,
    pub is_bot: bool,
}

impl From<&Player> for PlayerInfo {
    fn from(player: &Player) -> Self {
        Self {
            id: player.id.clone(),
            display_name: player.display_name.clone(),
            avatar: player.avatar.clone(),
            chips: player.chips,
            is_bot: player.is_bot,
        }
    }
}
