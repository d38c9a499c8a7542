//! Integration tests for the ingestion endpoint and history query.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use rfid_core::{Denylist, ScanRelay};
use rfid_server::{app, AppState};
use serde_json::Value;
use tower::ServiceExt; // for oneshot

fn make_state(capacity: usize) -> AppState {
    AppState::with_relay(ScanRelay::new(capacity, Denylist::default()).unwrap())
}

async fn get_text(app: &Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

async fn history(app: &Router) -> Value {
    let (status, body) = get_text(app, "/api/history").await;
    assert_eq!(status, StatusCode::OK);
    serde_json::from_str(&body).unwrap()
}

#[tokio::test]
async fn good_tag_is_accepted_and_recorded() {
    let app = app(make_state(10));

    let (status, body) = get_text(&app, "/?id=1&rfid=AAAA").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "GOOD*");

    let history = history(&app).await;
    assert_eq!(history["capacity"], 10);
    assert_eq!(history["count"], 1);
    assert_eq!(
        history["events"][0],
        serde_json::json!({ "id": "1", "rfid": "AAAA", "status": "GOOD" })
    );
}

#[tokio::test]
async fn denylisted_tag_is_rejected_but_recorded() {
    let app = app(make_state(10));

    let (status, body) = get_text(&app, "/?id=2&rfid=84DBBD5A").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "BAD*");

    let history = history(&app).await;
    assert_eq!(history["count"], 1);
    assert_eq!(history["events"][0]["status"], "BAD");
}

#[tokio::test]
async fn missing_fields_are_rejected_without_recording() {
    let app = app(make_state(10));

    for uri in ["/", "/?id=1", "/?rfid=AAAA", "/?ID=1&RFID=AAAA"] {
        let (status, body) = get_text(&app, uri).await;
        assert_eq!(status, StatusCode::OK, "uri {uri}");
        assert_eq!(body, "BAD*", "uri {uri}");
    }

    assert_eq!(history(&app).await["count"], 0);
}

#[tokio::test]
async fn unparseable_query_is_rejected() {
    let app = app(make_state(10));

    let (status, body) = get_text(&app, "/?id=1&id=2&rfid=AAAA").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "BAD*");
    assert_eq!(history(&app).await["count"], 0);
}

#[tokio::test]
async fn history_is_bounded_and_oldest_first() {
    let app = app(make_state(2));

    assert_eq!(get_text(&app, "/?id=1&rfid=AAAA").await.1, "GOOD*");
    assert_eq!(get_text(&app, "/?id=2&rfid=84DBBD5A").await.1, "BAD*");
    assert_eq!(get_text(&app, "/?id=3&rfid=CCCC").await.1, "GOOD*");

    let history = history(&app).await;
    assert_eq!(history["count"], 2);
    assert_eq!(
        history["events"],
        serde_json::json!([
            { "id": "2", "rfid": "84DBBD5A", "status": "BAD" },
            { "id": "3", "rfid": "CCCC", "status": "GOOD" },
        ])
    );
}

#[tokio::test]
async fn url_encoded_values_are_decoded() {
    let app = app(make_state(10));

    assert_eq!(get_text(&app, "/?id=door%201&rfid=AB%20CD").await.1, "GOOD*");

    let history = history(&app).await;
    assert_eq!(history["events"][0]["id"], "door 1");
    assert_eq!(history["events"][0]["rfid"], "AB CD");
}
