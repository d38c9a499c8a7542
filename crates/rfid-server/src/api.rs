//! HTTP handlers for scan ingestion and history retrieval.

use crate::AppState;
use axum::{
    extract::{rejection::QueryRejection, Extension, Query},
    Json,
};
use rfid_core::{Snapshot, SubmitOutcome};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Query parameters sent by the reader for one scan.
///
/// Both fields are optional at the extractor level so that a request
/// missing either one is answered with `BAD*` rather than a 400.
#[derive(Debug, Default, Deserialize)]
pub struct ScanQuery {
    /// Identifier of the submitting station.
    pub id: Option<String>,
    /// Tag code read from the card.
    pub rfid: Option<String>,
}

/// Handler for `GET /?id=..&rfid=..`.
///
/// Always answers `200` with a plain-text token: `GOOD*` for an accepted
/// scan, `BAD*` for a denylisted tag or a malformed request. The reader
/// parses the token up to the `*`.
pub async fn submit_scan_handler(
    Extension(state): Extension<Arc<AppState>>,
    query: Result<Query<ScanQuery>, QueryRejection>,
) -> &'static str {
    let Query(params) = match query {
        Ok(query) => query,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "unparseable scan query");
            return SubmitOutcome::Rejected.token();
        }
    };

    state
        .relay
        .submit(params.id.as_deref(), params.rfid.as_deref())
        .token()
}

/// Response body for `GET /api/history`.
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    /// Maximum number of scans retained.
    pub capacity: usize,
    /// Number of scans currently retained.
    pub count: usize,
    /// Retained scans, oldest first.
    pub events: Snapshot,
}

/// Handler for `GET /api/history`.
pub async fn get_history_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Json<HistoryResponse> {
    let events = state.relay.snapshot();
    Json(HistoryResponse {
        capacity: state.relay.capacity(),
        count: events.len(),
        events,
    })
}
