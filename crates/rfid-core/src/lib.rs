//! Ingestion, bounded retention, and fan-out core for RFID tag scans.
//!
//! Every scan submitted by the reader is classified against a denylist,
//! appended to a fixed-capacity history, and the full history is pushed to
//! every connected viewer.
//!
//! | Component | Type | Role |
//! |-----------|------|------|
//! | Validator | [`Denylist`] | Classifies a tag code as `GOOD` or `BAD` |
//! | Store | [`HistoryStore`] | Bounded FIFO of [`ScanEvent`]s |
//! | Hub | [`BroadcastHub`] | Observer registry and snapshot fan-out |
//! | Ingestion | [`ScanRelay`] | Validates, records, and broadcasts in one serialized step |
//!
//! # Usage
//!
//! ```rust,ignore
//! use rfid_core::{Denylist, ScanRelay, SubmitOutcome};
//!
//! let relay = ScanRelay::new(10, Denylist::default())?;
//! let mut viewer = relay.subscribe();
//!
//! let outcome = relay.submit(Some("1"), Some("AAAA"));
//! assert_eq!(outcome, SubmitOutcome::Accepted);
//! assert_eq!(outcome.token(), "GOOD*");
//!
//! let joined = viewer.next().await.expect("viewer is joined");
//! assert!(joined.is_empty());
//!
//! let pushed = viewer.next().await.expect("viewer is joined");
//! assert_eq!(pushed.len(), 1);
//! assert_eq!(viewer.latest(), pushed);
//! ```

mod error;
mod event;
mod hub;
mod relay;
mod store;
mod validator;

pub use error::RelayError;
pub use event::{ScanEvent, ScanStatus, Snapshot, BROADCAST_EVENT_NAME};
pub use hub::{BroadcastHub, ObserverId};
pub use relay::{ScanRelay, SubmitOutcome, Subscription};
pub use store::{HistoryStore, DEFAULT_CAPACITY};
pub use validator::{Denylist, DEFAULT_DENYLISTED_TAG};
