//! Observer registry and snapshot fan-out.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use tokio::sync::watch;
use uuid::Uuid;

use crate::event::Snapshot;

/// Identifies one connected observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(Uuid);

impl ObserverId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for ObserverId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Tracks connected observers and pushes history snapshots to them.
///
/// Each observer owns a latest-value slot rather than a queue: a send
/// overwrites whatever the observer has not read yet. A slow observer
/// therefore skips intermediate states but always ends on the newest
/// snapshot, and nothing it does can hold up the sender.
#[derive(Debug, Default)]
pub struct BroadcastHub {
    observers: Mutex<HashMap<ObserverId, watch::Sender<Snapshot>>>,
}

impl BroadcastHub {
    pub fn new() -> Self {
        Self::default()
    }

    fn observers(&self) -> MutexGuard<'_, HashMap<ObserverId, watch::Sender<Snapshot>>> {
        self.observers.lock().unwrap_or_else(|poisoned| {
            tracing::error!("observer registry lock poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Registers a new observer seeded with `current`.
    ///
    /// The returned receiver reports `current` as unseen, so the observer's
    /// transport delivers it on its first `changed()` without waiting for
    /// the next broadcast.
    pub fn join(&self, current: Snapshot) -> (ObserverId, watch::Receiver<Snapshot>) {
        let id = ObserverId::new();
        let (tx, mut rx) = watch::channel(current);
        rx.mark_changed();

        let count = {
            let mut observers = self.observers();
            observers.insert(id, tx);
            observers.len()
        };
        tracing::debug!(observer = %id, observers = count, "observer joined");

        (id, rx)
    }

    /// Removes an observer. Returns `false` if it was already gone.
    ///
    /// Dropping the observer's sender ends its receiver stream.
    pub fn leave(&self, id: ObserverId) -> bool {
        let removed = self.observers().remove(&id).is_some();
        if removed {
            tracing::debug!(observer = %id, "observer left");
        }
        removed
    }

    /// Pushes `snapshot` to every registered observer.
    ///
    /// Returns the number of observers that received it. Observers whose
    /// receiving end has been dropped are pruned; that is never reported as
    /// an error to the caller.
    pub fn broadcast(&self, snapshot: &Snapshot) -> usize {
        let mut delivered = 0;
        self.observers().retain(|id, tx| match tx.send(snapshot.clone()) {
            Ok(()) => {
                delivered += 1;
                true
            }
            Err(_) => {
                tracing::debug!(observer = %id, "pruning observer with closed receiver");
                false
            }
        });
        delivered
    }

    pub fn observer_count(&self) -> usize {
        self.observers().len()
    }

    pub fn contains(&self, id: ObserverId) -> bool {
        self.observers().contains_key(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{ScanEvent, ScanStatus};

    fn snapshot_of(ids: &[&str]) -> Snapshot {
        ids.iter()
            .map(|id| ScanEvent {
                id: id.to_string(),
                rfid: "AAAA".to_string(),
                status: ScanStatus::Good,
            })
            .collect()
    }

    #[tokio::test]
    async fn join_delivers_seed_immediately() {
        let hub = BroadcastHub::new();
        let (_id, mut rx) = hub.join(snapshot_of(&["1", "2"]));

        rx.changed().await.expect("seed should be pending");
        assert_eq!(rx.borrow_and_update().ids(), vec!["1", "2"]);
    }

    #[test]
    fn leave_is_idempotent() {
        let hub = BroadcastHub::new();
        let (id, _rx) = hub.join(Snapshot::default());
        let (other, _rx2) = hub.join(Snapshot::default());

        assert!(hub.leave(id));
        assert!(!hub.leave(id));
        assert_eq!(hub.observer_count(), 1);
        assert!(hub.contains(other));
        assert!(!hub.contains(id));
    }

    #[tokio::test]
    async fn leave_closes_the_observer_stream() {
        let hub = BroadcastHub::new();
        let (id, mut rx) = hub.join(Snapshot::default());
        drop(rx.borrow_and_update());

        hub.leave(id);
        assert!(rx.changed().await.is_err());
    }

    #[test]
    fn broadcast_prunes_dropped_receivers() {
        let hub = BroadcastHub::new();
        let (_kept, _rx) = hub.join(Snapshot::default());
        let (_gone, rx_gone) = hub.join(Snapshot::default());
        drop(rx_gone);

        let delivered = hub.broadcast(&snapshot_of(&["1"]));
        assert_eq!(delivered, 1);
        assert_eq!(hub.observer_count(), 1);
    }

    #[test]
    fn broadcast_with_no_observers_is_a_no_op() {
        let hub = BroadcastHub::new();
        assert_eq!(hub.broadcast(&snapshot_of(&["1"])), 0);
    }
}
