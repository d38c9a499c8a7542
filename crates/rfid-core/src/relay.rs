//! Scan ingestion: validate, record, broadcast.
//!
//! [`ScanRelay`] is the single writer of the history. Every [`submit`]
//! holds the store lock across append, snapshot, and broadcast, so observers
//! only ever see whole, monotonically extending histories. [`subscribe`]
//! takes the same lock, which rules out a mutation landing between the
//! join snapshot and the observer's registration.
//!
//! Lock order is always store, then hub.
//!
//! [`submit`]: ScanRelay::submit
//! [`subscribe`]: ScanRelay::subscribe

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::watch;

use crate::error::RelayError;
use crate::event::{ScanStatus, Snapshot};
use crate::hub::{BroadcastHub, ObserverId};
use crate::store::HistoryStore;
use crate::validator::Denylist;

/// Reply token sent back to the reader for an accepted scan.
const ACCEPTED_TOKEN: &str = "GOOD*";
/// Reply token for a denylisted tag or a malformed request.
const REJECTED_TOKEN: &str = "BAD*";

/// Result of a submission, as reported to the submitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted,
    Rejected,
}

impl SubmitOutcome {
    /// Wire token for the reader. The trailing `*` terminates the reply.
    pub fn token(self) -> &'static str {
        match self {
            Self::Accepted => ACCEPTED_TOKEN,
            Self::Rejected => REJECTED_TOKEN,
        }
    }
}

impl From<ScanStatus> for SubmitOutcome {
    fn from(status: ScanStatus) -> Self {
        match status {
            ScanStatus::Good => Self::Accepted,
            ScanStatus::Bad => Self::Rejected,
        }
    }
}

impl std::fmt::Display for SubmitOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

/// Ingestion core owning the history, the denylist, and the hub.
#[derive(Debug)]
pub struct ScanRelay {
    store: Mutex<HistoryStore>,
    denylist: Denylist,
    hub: Arc<BroadcastHub>,
}

impl ScanRelay {
    /// Creates a relay retaining at most `capacity` scans.
    ///
    /// # Errors
    ///
    /// Returns `RelayError::InvalidCapacity` if `capacity` is zero.
    pub fn new(capacity: usize, denylist: Denylist) -> Result<Self, RelayError> {
        Ok(Self {
            store: Mutex::new(HistoryStore::new(capacity)?),
            denylist,
            hub: Arc::new(BroadcastHub::new()),
        })
    }

    fn store(&self) -> MutexGuard<'_, HistoryStore> {
        self.store.lock().unwrap_or_else(|poisoned| {
            tracing::error!("history store lock poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Ingests one raw scan.
    ///
    /// A request missing either field is rejected without touching the
    /// history. Otherwise the scan is classified, recorded whatever its
    /// status, and the new history is broadcast before this returns.
    pub fn submit(&self, id: Option<&str>, rfid: Option<&str>) -> SubmitOutcome {
        let (Some(id), Some(rfid)) = (id, rfid) else {
            tracing::debug!(
                has_id = id.is_some(),
                has_rfid = rfid.is_some(),
                "rejecting malformed scan request"
            );
            return SubmitOutcome::Rejected;
        };

        let event = self.denylist.validate(id, rfid);
        let status = event.status;

        let (len, evicted, delivered) = {
            let mut store = self.store();
            let evicted = store.append(event);
            let snapshot = store.snapshot();
            let delivered = self.hub.broadcast(&snapshot);
            (snapshot.len(), evicted, delivered)
        };

        tracing::info!(
            id,
            rfid,
            status = status.as_str(),
            history_len = len,
            evicted = evicted.as_ref().map(|e| e.id.as_str()),
            delivered,
            "recorded scan"
        );

        SubmitOutcome::from(status)
    }

    /// Joins the hub and returns a handle yielding the current history first.
    pub fn subscribe(&self) -> Subscription {
        let store = self.store();
        let (id, rx) = self.hub.join(store.snapshot());
        drop(store);

        Subscription {
            id,
            rx,
            hub: Arc::clone(&self.hub),
        }
    }

    /// Copies the current history.
    pub fn snapshot(&self) -> Snapshot {
        self.store().snapshot()
    }

    pub fn capacity(&self) -> usize {
        self.store().capacity()
    }

    pub fn denylist(&self) -> &Denylist {
        &self.denylist
    }

    pub fn hub(&self) -> &BroadcastHub {
        &self.hub
    }
}

/// A joined observer.
///
/// Dropping the subscription leaves the hub, so a transport task that ends
/// for any reason cleans up after itself.
#[derive(Debug)]
pub struct Subscription {
    id: ObserverId,
    rx: watch::Receiver<Snapshot>,
    hub: Arc<BroadcastHub>,
}

impl Subscription {
    pub fn id(&self) -> ObserverId {
        self.id
    }

    /// Waits for the next snapshot to deliver.
    ///
    /// The first call returns the history as of join time without waiting.
    /// Later calls return the newest snapshot published since the previous
    /// one; intermediate snapshots are skipped. Returns `None` once the
    /// observer has been removed from the hub.
    pub async fn next(&mut self) -> Option<Snapshot> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// Returns the most recent snapshot without waiting or marking it seen.
    pub fn latest(&self) -> Snapshot {
        self.rx.borrow().clone()
    }

    /// Leaves the hub. Equivalent to dropping the subscription.
    pub fn leave(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.hub.leave(self.id);
    }
}
