//! Scan event, status, and snapshot types.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Name under which history snapshots are pushed to viewers.
pub const BROADCAST_EVENT_NAME: &str = "rfid-list";

/// Classification assigned to a scan by the validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScanStatus {
    /// The tag is not on the denylist.
    #[serde(rename = "GOOD")]
    Good,
    /// The tag is on the denylist.
    #[serde(rename = "BAD")]
    Bad,
}

impl ScanStatus {
    /// Returns the canonical string label for this status.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Good => "GOOD",
            Self::Bad => "BAD",
        }
    }
}

impl std::fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One validated tag scan.
///
/// Created once by [`crate::Denylist::validate`] and never modified; it
/// leaves the history only through eviction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanEvent {
    /// Identifier supplied by the submitter (typically the reader station).
    pub id: String,
    /// Tag code read from the physical device.
    pub rfid: String,
    /// Classification assigned at ingestion time.
    pub status: ScanStatus,
}

/// Immutable, point-in-time copy of the history, oldest event first.
///
/// Clones share the same backing allocation, so one snapshot can be handed
/// to any number of observers.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot(Arc<[ScanEvent]>);

impl Snapshot {
    /// Returns the events in insertion order.
    pub fn events(&self) -> &[ScanEvent] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the identifiers in order. Handy for assertions and logging.
    pub fn ids(&self) -> Vec<&str> {
        self.0.iter().map(|e| e.id.as_str()).collect()
    }
}

impl From<Vec<ScanEvent>> for Snapshot {
    fn from(events: Vec<ScanEvent>) -> Self {
        Self(events.into())
    }
}

impl FromIterator<ScanEvent> for Snapshot {
    fn from_iter<I: IntoIterator<Item = ScanEvent>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
