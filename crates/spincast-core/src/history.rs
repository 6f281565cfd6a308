// History log: append-to-front record of past picks.

use std::collections::VecDeque;

use chrono::{DateTime, Local};

/// One recorded pick.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub label: String,
    /// 1-based spin number the pick came from.
    pub ordinal: u64,
    pub picked_at: DateTime<Local>,
}

/// Most-recent-first record of picks for the session.
///
/// Growth is unbounded; only an explicit `clear` discards entries.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        History::default()
    }

    pub fn prepend(&mut self, label: impl Into<String>, ordinal: u64) {
        self.entries.push_front(HistoryEntry {
            label: label.into(),
            ordinal,
            picked_at: Local::now(),
        });
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.front()
    }

    /// Up to `limit` entries, most recent first.
    pub fn recent(&self, limit: usize) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter().take(limit)
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_is_none_when_empty() {
        let history = History::new();
        assert!(history.latest().is_none());
        assert!(history.is_empty());
    }

    #[test]
    fn prepend_puts_newest_first() {
        let mut history = History::new();
        history.prepend("B7", 1);
        history.prepend("N40", 2);
        history.prepend("O66", 3);

        assert_eq!(history.latest().unwrap().label, "O66");
        let labels: Vec<_> = history.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["O66", "N40", "B7"]);
        let ordinals: Vec<_> = history.iter().map(|e| e.ordinal).collect();
        assert_eq!(ordinals, vec![3, 2, 1]);
    }

    #[test]
    fn recent_bounds_the_prefix() {
        let mut history = History::new();
        for i in 1..=20u64 {
            history.prepend(format!("item {i}"), i);
        }
        let recent: Vec<_> = history.recent(5).map(|e| e.ordinal).collect();
        assert_eq!(recent, vec![20, 19, 18, 17, 16]);
        // Nothing is evicted by reading a prefix.
        assert_eq!(history.len(), 20);
    }

    #[test]
    fn clear_empties_the_log() {
        let mut history = History::new();
        history.prepend("A", 1);
        history.clear();
        assert!(history.latest().is_none());
        assert_eq!(history.len(), 0);
    }
}
