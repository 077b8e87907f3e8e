//! Bounded player-facing event log
//!
//! Unlike the diagnostic `log` output, these lines are shown to the player.
//! The log keeps the most recent entries and drops the oldest first.

use std::collections::VecDeque;

/// Maximum number of entries retained.
pub const LOG_CAPACITY: usize = 15;

#[derive(Debug, Clone, PartialEq)]
pub struct EventLog {
    entries: VecDeque<String>,
    capacity: usize,
}

impl EventLog {
    pub fn new() -> Self {
        Self::with_capacity(LOG_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Append an entry, evicting the oldest once over capacity.
    pub fn push(&mut self, text: impl Into<String>) {
        self.entries.push_back(text.into());
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// Entries oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn latest(&self) -> Option<&str> {
        self.entries.back().map(String::as_str)
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

    /// Owned copy for read snapshots.
    pub fn to_vec(&self) -> Vec<String> {
        self.entries.iter().cloned().collect()
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_never_exceeds_capacity() {
        let mut log = EventLog::new();
        for i in 0..40 {
            log.push(format!("entry {}", i));
            assert!(log.len() <= LOG_CAPACITY);
        }
        assert_eq!(log.len(), LOG_CAPACITY);
    }

    #[test]
    fn test_evicts_oldest_first() {
        let mut log = EventLog::new();
        for i in 0..(LOG_CAPACITY + 3) {
            log.push(format!("entry {}", i));
        }
        assert_eq!(log.iter().next(), Some("entry 3"));
        assert_eq!(log.latest(), Some("entry 17"));
    }

    #[test]
    fn test_clear() {
        let mut log = EventLog::with_capacity(2);
        log.push("a");
        log.push("b");
        log.push("c");
        assert_eq!(log.to_vec(), vec!["b".to_string(), "c".to_string()]);
        log.clear();
        assert!(log.is_empty());
    }
}
