//! Bounded, insertion-ordered scan history.
//!
//! The store is a plain single-owner value. [`crate::ScanRelay`] wraps it in
//! a mutex and is the only writer; everybody else sees [`Snapshot`]s.

use std::collections::VecDeque;

use crate::error::RelayError;
use crate::event::{ScanEvent, Snapshot};

/// Number of events retained when no capacity is configured.
pub const DEFAULT_CAPACITY: usize = 10;

/// Fixed-capacity FIFO of [`ScanEvent`]s.
///
/// `len() <= capacity()` holds after every operation. Appending to a full
/// store evicts exactly one event, the oldest.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    capacity: usize,
    events: VecDeque<ScanEvent>,
}

impl HistoryStore {
    /// Creates an empty store holding at most `capacity` events.
    ///
    /// # Errors
    ///
    /// Returns `RelayError::InvalidCapacity` if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, RelayError> {
        if capacity == 0 {
            return Err(RelayError::InvalidCapacity(capacity));
        }
        Ok(Self {
            capacity,
            events: VecDeque::with_capacity(capacity),
        })
    }

    /// Appends `event` at the newest end, returning the evicted event if the
    /// store was full.
    pub fn append(&mut self, event: ScanEvent) -> Option<ScanEvent> {
        self.events.push_back(event);
        if self.events.len() > self.capacity {
            self.events.pop_front()
        } else {
            None
        }
    }

    /// Copies the current contents, oldest first.
    pub fn snapshot(&self) -> Snapshot {
        self.events.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            events: VecDeque::with_capacity(DEFAULT_CAPACITY),
        }
    }
}
