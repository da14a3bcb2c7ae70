//! Bounded most-recent-first list of selected identifiers.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

pub const DEFAULT_HISTORY_CAPACITY: usize = 25;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryList {
    entries: VecDeque<String>,
    capacity: usize,
}

impl HistoryList {
    /// A zero capacity is raised to one so a recorded use is never lost.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Rebuilds a list from a saved most-recent-first sequence, dropping
    /// repeats and anything past `capacity`.
    pub fn from_entries(capacity: usize, entries: impl IntoIterator<Item = String>) -> Self {
        let mut history = Self::new(capacity);
        for entry in entries {
            if history.entries.len() == history.capacity {
                break;
            }
            if !history.contains(&entry) {
                history.entries.push_back(entry);
            }
        }
        history
    }

    pub fn record_use(&mut self, identifier: impl Into<String>) {
        let identifier = identifier.into();
        if let Some(index) = self.entries.iter().position(|entry| *entry == identifier) {
            self.entries.remove(index);
        }
        self.entries.push_front(identifier);
        self.entries.truncate(self.capacity);
    }

    pub fn as_sequence(&self) -> Vec<String> {
        self.entries.iter().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.entries.iter().any(|entry| entry == identifier)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for HistoryList {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
