//! Bounded battle log
//!
//! A fixed-size ring of messages. Writing past capacity overwrites the
//! oldest slot, so a long fight never grows the session.

use serde::{Deserialize, Serialize};

/// Ring buffer of the most recent battle messages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleLog {
    /// Ring storage; `None` marks a slot never written
    slots: Vec<Option<String>>,
    /// Next write position
    head: usize,
    /// Number of occupied slots
    count: usize,
    /// Total messages ever pushed
    written: u64,
}

impl BattleLog {
    /// Create a log keeping at most `capacity` messages
    ///
    /// A capacity of 0 is treated as 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: vec![None; capacity],
            head: 0,
            count: 0,
            written: 0,
        }
    }

    /// Append a message, evicting the oldest when full
    pub fn push(&mut self, message: impl Into<String>) {
        let capacity = self.slots.len();
        self.slots[self.head] = Some(message.into());
        self.head = (self.head + 1) % capacity;
        self.count = (self.count + 1).min(capacity);
        self.written += 1;
    }

    /// Messages from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let capacity = self.slots.len();
        let start = (self.head + capacity - self.count) % capacity;
        (0..self.count).filter_map(move |i| self.slots[(start + i) % capacity].as_deref())
    }

    /// Most recent message
    pub fn last(&self) -> Option<&str> {
        if self.count == 0 {
            return None;
        }
        let capacity = self.slots.len();
        self.slots[(self.head + capacity - 1) % capacity].as_deref()
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Messages pushed over the log's lifetime, including evicted ones
    pub fn total_written(&self) -> u64 {
        self.written
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.iter().map(str::to_string).collect()
    }
}
