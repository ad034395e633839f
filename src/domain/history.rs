//! Bounded reading history with FIFO eviction.

use std::collections::VecDeque;

use super::Reading;

/// Ordered ring of the most recent readings.
///
/// Never holds more than `capacity` entries; pushing onto a full buffer
/// evicts the oldest reading.
#[derive(Debug)]
pub struct HistoryBuffer {
    readings: VecDeque<Reading>,
    capacity: usize,
}

impl HistoryBuffer {
    /// Creates an empty buffer. A zero capacity is raised to one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            readings: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends a reading, evicting from the front while over capacity.
    pub fn push(&mut self, reading: Reading) {
        self.readings.push_back(reading);
        while self.readings.len() > self.capacity {
            self.readings.pop_front();
        }
    }

    /// All readings, oldest first.
    #[must_use]
    pub fn all(&self) -> Vec<Reading> {
        self.readings.iter().cloned().collect()
    }

    /// Readings with `timestamp >= since_ms`, oldest first.
    #[must_use]
    pub fn since(&self, since_ms: i64) -> Vec<Reading> {
        self.readings
            .iter()
            .filter(|r| r.timestamp >= since_ms)
            .cloned()
            .collect()
    }

    /// Number of stored readings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    /// Returns `true` if no reading is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Maximum number of stored readings.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}
