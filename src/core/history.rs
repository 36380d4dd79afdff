//! Bounded record of fired transitions.
//!
//! The machine records every state change here so a host can inspect how an
//! entity got into its current state. Only the most recent entries are kept.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Default number of entries a history keeps.
pub const DEFAULT_HISTORY_CAPACITY: usize = 64;

/// How the machine moved between two states.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionKind {
    /// Entry into the first state on `start` or `resume`
    Start,
    /// A transition's conditions were satisfied during `update`
    Fired,
    /// The host forced the machine out of a state
    Interrupted,
}

/// Record of a single state change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// State left, `None` on start
    pub from: Option<String>,
    /// State entered
    pub to: String,
    pub kind: TransitionKind,
    /// Tick counter of the machine when the change happened
    pub tick: u64,
    pub timestamp: DateTime<Utc>,
}

/// Ordered, capacity-bounded history of transitions.
///
/// # Example
///
/// ```rust
/// use commandable_fsm::core::{TransitionHistory, TransitionKind, TransitionRecord};
/// use chrono::Utc;
///
/// let mut history = TransitionHistory::with_capacity(2);
/// for (from, to) in [(None, "Idle"), (Some("Idle"), "Moving"), (Some("Moving"), "Idle")] {
///     history.record(TransitionRecord {
///         from: from.map(str::to_string),
///         to: to.to_string(),
///         kind: TransitionKind::Fired,
///         tick: 0,
///         timestamp: Utc::now(),
///     });
/// }
///
/// // Oldest entry evicted
/// assert_eq!(history.get_path(), vec!["Idle", "Moving", "Idle"]);
/// assert_eq!(history.len(), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionHistory {
    capacity: usize,
    records: VecDeque<TransitionRecord>,
}

impl Default for TransitionHistory {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}

impl TransitionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// A capacity of zero disables recording.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            records: VecDeque::with_capacity(capacity.min(DEFAULT_HISTORY_CAPACITY)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append a record, evicting the oldest once full.
    pub fn record(&mut self, record: TransitionRecord) {
        if self.capacity == 0 {
            return;
        }
        while self.records.len() >= self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    /// Names of the states traversed, oldest first.
    ///
    /// Starts with the `from` state of the oldest retained record when there is one.
    pub fn get_path(&self) -> Vec<&str> {
        let mut path = Vec::new();
        if let Some(from) = self.records.front().and_then(|r| r.from.as_deref()) {
            path.push(from);
        }
        path.extend(self.records.iter().map(|r| r.to.as_str()));
        path
    }

    /// Wall-clock time between the oldest and newest retained records.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.records.front()?, self.records.back()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    pub fn last(&self) -> Option<&TransitionRecord> {
        self.records.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TransitionRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(from: Option<&str>, to: &str, tick: u64) -> TransitionRecord {
        TransitionRecord {
            from: from.map(str::to_string),
            to: to.to_string(),
            kind: if from.is_some() {
                TransitionKind::Fired
            } else {
                TransitionKind::Start
            },
            tick,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn new_history_is_empty() {
        let history = TransitionHistory::new();
        assert!(history.is_empty());
        assert!(history.get_path().is_empty());
        assert!(history.duration().is_none());
        assert_eq!(history.capacity(), DEFAULT_HISTORY_CAPACITY);
    }

    #[test]
    fn path_starts_at_entry_state() {
        let mut history = TransitionHistory::new();
        history.record(record(None, "Idle", 0));
        history.record(record(Some("Idle"), "Moving", 3));
        history.record(record(Some("Moving"), "Idle", 9));

        assert_eq!(history.get_path(), vec!["Idle", "Moving", "Idle"]);
        assert_eq!(history.last().map(|r| r.tick), Some(9));
    }

    #[test]
    fn capacity_evicts_oldest() {
        let mut history = TransitionHistory::with_capacity(2);
        history.record(record(None, "A", 0));
        history.record(record(Some("A"), "B", 1));
        history.record(record(Some("B"), "C", 2));

        assert_eq!(history.len(), 2);
        assert_eq!(history.get_path(), vec!["A", "B", "C"]);
        assert_eq!(history.iter().next().map(|r| r.tick), Some(1));
    }

    #[test]
    fn zero_capacity_records_nothing() {
        let mut history = TransitionHistory::with_capacity(0);
        history.record(record(None, "Idle", 0));
        assert!(history.is_empty());
    }

    #[test]
    fn history_serializes_correctly() {
        let mut history = TransitionHistory::new();
        history.record(record(None, "Idle", 0));

        let json = serde_json::to_string(&history).unwrap();
        let deserialized: TransitionHistory = serde_json::from_str(&json).unwrap();

        assert_eq!(history, deserialized);
    }
}
