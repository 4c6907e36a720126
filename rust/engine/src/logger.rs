use std::collections::VecDeque;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Most recent entries kept in a round's event log.
pub const DEFAULT_LOG_CAPACITY: usize = 50;

/// Betting phase of a hand.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Hole cards dealt, no community cards visible
    Preflop,
    /// Three community cards visible
    Flop,
    /// Fourth community card visible
    Turn,
    /// Fifth community card visible
    River,
    /// Hands compared, pot awarded
    Showdown,
}

impl Phase {
    pub fn next(self) -> Phase {
        match self {
            Phase::Preflop => Phase::Flop,
            Phase::Flop => Phase::Turn,
            Phase::Turn => Phase::River,
            Phase::River | Phase::Showdown => Phase::Showdown,
        }
    }

    /// Community cards visible once this phase has been dealt normally.
    pub fn revealed_cards(self) -> usize {
        match self {
            Phase::Preflop => 0,
            Phase::Flop => 3,
            Phase::Turn => 4,
            Phase::River | Phase::Showdown => 5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Preflop => "preflop",
            Phase::Flop => "flop",
            Phase::Turn => "turn",
            Phase::River => "river",
            Phase::Showdown => "showdown",
        }
    }
}

/// One human-readable event. Observational only; never replayed into state.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Monotonic sequence number within the round
    pub seq: u64,
    /// RFC3339 timestamp
    pub ts: String,
    pub phase: Phase,
    pub message: String,
}

/// Append-only log that keeps only the most recent `capacity` entries.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct EventLog {
    capacity: usize,
    next_seq: u64,
    entries: VecDeque<LogEntry>,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_LOG_CAPACITY)
    }
}

impl EventLog {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            next_seq: 0,
            entries: VecDeque::with_capacity(capacity.max(1)),
        }
    }

    pub fn push(&mut self, phase: Phase, message: impl Into<String>) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.next_seq += 1;
        self.entries.push_back(LogEntry {
            seq: self.next_seq,
            ts: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            phase,
            message: message.into(),
        });
    }

    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total entries ever pushed, including evicted ones.
    pub fn total_pushed(&self) -> u64 {
        self.next_seq
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_oldest_past_capacity() {
        let mut log = EventLog::with_capacity(3);
        for i in 0..5 {
            log.push(Phase::Preflop, format!("event {}", i));
        }
        let messages: Vec<&str> = log.entries().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["event 2", "event 3", "event 4"]);
        assert_eq!(log.total_pushed(), 5);
        assert_eq!(log.last().map(|e| e.seq), Some(5));
    }

    #[test]
    fn phase_sequence_ends_at_showdown() {
        let mut p = Phase::Preflop;
        let mut seen = vec![p];
        while p != Phase::Showdown {
            p = p.next();
            seen.push(p);
        }
        assert_eq!(seen.len(), 5);
        assert!(seen.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(Phase::Showdown.next(), Phase::Showdown);
    }
}
