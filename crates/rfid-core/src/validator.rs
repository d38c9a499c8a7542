//! Denylist-based scan validation.

use std::collections::HashSet;

use crate::event::{ScanEvent, ScanStatus};

/// Tag code denylisted by the reference deployment.
pub const DEFAULT_DENYLISTED_TAG: &str = "84DBBD5A";

/// Set of tag codes that are always classified [`ScanStatus::Bad`].
///
/// Built once from configuration at startup. Matching is exact and
/// case-sensitive; tag codes are opaque to the relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Denylist {
    tags: HashSet<String>,
}

impl Denylist {
    /// Creates a denylist from the given tag codes.
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, rfid: &str) -> bool {
        self.tags.contains(rfid)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Classifies a scan and builds the resulting event.
    ///
    /// Total: every input yields an event. The status is `BAD` iff `rfid`
    /// is denylisted.
    pub fn validate(&self, id: &str, rfid: &str) -> ScanEvent {
        let status = if self.contains(rfid) {
            ScanStatus::Bad
        } else {
            ScanStatus::Good
        };

        ScanEvent {
            id: id.to_string(),
            rfid: rfid.to_string(),
            status,
        }
    }
}

impl Default for Denylist {
    fn default() -> Self {
        Self::new([DEFAULT_DENYLISTED_TAG])
    }
}

impl<S: Into<String>> FromIterator<S> for Denylist {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}
