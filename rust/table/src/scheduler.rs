//! Delayed computer turns.
//!
//! At most one turn is pending per session. Scheduling a new turn, starting a
//! new round, or leaving the table aborts the pending one; dropping the
//! scheduler aborts everything.

use crate::session::SessionId;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

#[derive(Debug)]
struct PendingTurn {
    round_id: String,
    handle: JoinHandle<()>,
}

#[derive(Debug, Default)]
pub struct BotScheduler {
    pending: Mutex<HashMap<SessionId, PendingTurn>>,
}

impl BotScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `turn` after `delay` on the current tokio runtime, replacing any
    /// turn already pending for the session.
    ///
    /// `turn` must itself check that the round it was scheduled for is still
    /// current; a timer that already fired cannot be aborted.
    pub fn schedule<F>(
        &self,
        session_id: &SessionId,
        round_id: &str,
        delay: Duration,
        turn: F,
    ) -> Result<(), SchedulerError>
    where
        F: FnOnce() + Send + 'static,
    {
        let runtime = Handle::try_current().map_err(|_| SchedulerError::NoRuntime)?;
        let handle = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            turn();
        });

        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = pending.insert(
            session_id.clone(),
            PendingTurn {
                round_id: round_id.to_string(),
                handle,
            },
        ) {
            previous.handle.abort();
        }
        tracing::trace!(
            session_id = %session_id,
            round_id = %round_id,
            delay_ms = delay.as_millis() as u64,
            "bot turn scheduled"
        );
        Ok(())
    }

    /// Aborts the session's pending turn. Returns whether one was pending.
    pub fn cancel(&self, session_id: &SessionId) -> bool {
        let removed = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(session_id);
        match removed {
            Some(turn) => {
                let was_pending = !turn.handle.is_finished();
                turn.handle.abort();
                if was_pending {
                    tracing::debug!(
                        session_id = %session_id,
                        round_id = %turn.round_id,
                        "pending bot turn cancelled"
                    );
                }
                was_pending
            }
            None => false,
        }
    }

    /// Round id of the session's unfinished turn, if any.
    pub fn pending_round(&self, session_id: &SessionId) -> Option<String> {
        let pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        pending
            .get(session_id)
            .filter(|turn| !turn.handle.is_finished())
            .map(|turn| turn.round_id.clone())
    }

    pub fn is_pending(&self, session_id: &SessionId) -> bool {
        self.pending_round(session_id).is_some()
    }

    pub fn cancel_all(&self) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        for (_, turn) in pending.drain() {
            turn.handle.abort();
        }
    }
}

impl Drop for BotScheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("No async runtime available to schedule bot turns")]
    NoRuntime,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    const DELAY: Duration = Duration::from_millis(1200);

    fn counter_turn(count: &Arc<AtomicUsize>) -> impl FnOnce() + Send + 'static {
        let count = Arc::clone(count);
        move || {
            count.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn turn_fires_after_delay() {
        let scheduler = BotScheduler::new();
        let fired = Arc::new(AtomicUsize::new(0));
        let session = "s".to_string();
        scheduler
            .schedule(&session, "r1", DELAY, counter_turn(&fired))
            .unwrap();
        assert_eq!(scheduler.pending_round(&session).as_deref(), Some("r1"));

        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(!scheduler.is_pending(&session));
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_turn_never_fires() {
        let scheduler = BotScheduler::new();
        let fired = Arc::new(AtomicUsize::new(0));
        let session = "s".to_string();
        scheduler
            .schedule(&session, "r1", DELAY, counter_turn(&fired))
            .unwrap();
        assert!(scheduler.cancel(&session));
        assert!(!scheduler.cancel(&session));

        tokio::time::sleep(DELAY * 2).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn rescheduling_replaces_the_pending_turn() {
        let scheduler = BotScheduler::new();
        let old = Arc::new(AtomicUsize::new(0));
        let new = Arc::new(AtomicUsize::new(0));
        let session = "s".to_string();
        scheduler
            .schedule(&session, "r1", DELAY, counter_turn(&old))
            .unwrap();
        scheduler
            .schedule(&session, "r2", DELAY, counter_turn(&new))
            .unwrap();
        assert_eq!(scheduler.pending_round(&session).as_deref(), Some("r2"));

        tokio::time::sleep(DELAY * 2).await;
        assert_eq!(old.load(Ordering::SeqCst), 0);
        assert_eq!(new.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_scheduler_aborts_turns() {
        let fired = Arc::new(AtomicUsize::new(0));
        {
            let scheduler = BotScheduler::new();
            scheduler
                .schedule(&"s".to_string(), "r1", DELAY, counter_turn(&fired))
                .unwrap();
        }
        tokio::time::sleep(DELAY * 2).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn scheduling_requires_a_runtime() {
        let scheduler = BotScheduler::new();
        let err = scheduler
            .schedule(&"s".to_string(), "r1", DELAY, || {})
            .unwrap_err();
        assert!(matches!(err, SchedulerError::NoRuntime));
    }
}
