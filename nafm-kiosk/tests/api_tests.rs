//! Integration tests for nafm-kiosk HTTP endpoints
//!
//! Tests cover:
//! - Page controllers (rendering, invalid URLs, content failures)
//! - Local interactions and their redirects
//! - Hub status, tag resolution and simulation endpoints
//! - Page event streams

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use nafm_common::events::EventBus;
use nafm_common::RfidTable;
use nafm_kiosk::exhibit::ExhibitHub;
use nafm_kiosk::{build_router, AppState};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt; // for `oneshot` method

const SAMPLE_CONTENT: &str = include_str!("../content/data.json");

/// Test helper: app serving `content`; `None` leaves the document missing
fn setup_app(content: Option<&str>) -> (Router, Arc<ExhibitHub>, TempDir) {
    let dir = TempDir::new().unwrap();
    let path: PathBuf = dir.path().join("data.json");
    if let Some(content) = content {
        std::fs::write(&path, content).unwrap();
    }
    let hub = Arc::new(ExhibitHub::new(
        EventBus::new(16),
        Arc::new(RfidTable::canonical()),
    ));
    let state = AppState::new(hub.clone(), path, None);
    (build_router(state), hub, dir)
}

fn test_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn json_request(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

async fn extract_text(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    String::from_utf8(bytes.to_vec()).expect("Should be UTF-8")
}

/// Status and Location of a request expected to redirect
async fn redirect(app: &Router, uri: &str) -> (StatusCode, String) {
    let response = app.clone().oneshot(test_request("GET", uri)).await.unwrap();
    let location = response
        .headers()
        .get(header::LOCATION)
        .map(|v| v.to_str().unwrap().to_string())
        .unwrap_or_default();
    (response.status(), location)
}

async fn get_page(app: &Router, uri: &str) -> (StatusCode, String) {
    let response = app.clone().oneshot(test_request("GET", uri)).await.unwrap();
    let status = response.status();
    (status, extract_text(response.into_body()).await)
}

// =============================================================================
// Ops Endpoints
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _hub, _dir) = setup_app(Some(SAMPLE_CONTENT));

    let response = app.oneshot(test_request("GET", "/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "nafm-kiosk");
    assert!(body["version"].is_string());
    assert_eq!(body["open_pages"], 0);
}

#[tokio::test]
async fn test_buildinfo_endpoint() {
    let (app, _hub, _dir) = setup_app(Some(SAMPLE_CONTENT));

    let response = app
        .oneshot(test_request("GET", "/api/buildinfo"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["module"], "nafm-kiosk");
    assert!(body["git_hash"].is_string());
    assert!(body["build_profile"].is_string());
}

#[tokio::test]
async fn test_client_assets_served() {
    let (app, _hub, _dir) = setup_app(Some(SAMPLE_CONTENT));

    let response = app
        .clone()
        .oneshot(test_request("GET", "/static/kiosk.js"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/javascript"
    );
    let script = extract_text(response.into_body()).await;
    assert!(script.contains("EventSource"));

    let response = app
        .oneshot(test_request("GET", "/static/kiosk.css"))
        .await
        .unwrap();
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/css"
    );
}

// =============================================================================
// Page Controllers
// =============================================================================

#[tokio::test]
async fn test_landing_page() {
    let (app, _hub, _dir) = setup_app(Some(SAMPLE_CONTENT));

    let (status, html) = get_page(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains(r#"data-events="/events?page=landing""#));
    assert_eq!(html.matches("class=\"object-item\"").count(), 3);
}

#[tokio::test]
async fn test_section_page_renders_content() {
    let (app, _hub, _dir) = setup_app(Some(SAMPLE_CONTENT));

    let (status, html) = get_page(&app, "/section?section=naf-history&object=naf").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Nigerian Air Force History"));
    assert!(html.contains("1962-1971"));
    assert!(html.contains("/events?page=section&amp;section=naf-history&amp;object=naf"));
}

#[tokio::test]
async fn test_invalid_page_state_returns_to_landing() {
    let (app, _hub, _dir) = setup_app(Some(SAMPLE_CONTENT));

    // Object and section disagree
    let (status, location) = redirect(&app, "/section?section=naf-history&object=evol").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location, "/");

    // Section pages need a section
    let (status, location) = redirect(&app, "/year-list").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location, "/");

    // Year outside the carried range
    let (status, location) = redirect(
        &app,
        "/year-detail?section=naf-history&object=naf&range=1962-1971&year=1990",
    )
    .await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location, "/");
}

#[tokio::test]
async fn test_ranges_outside_tag_table_return_to_landing() {
    let (app, _hub, _dir) = setup_app(Some(SAMPLE_CONTENT));

    let (status, location) = redirect(&app, "/year-list?section=naf-history&range=1-2000000").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location, "/");

    let (status, location) = redirect(
        &app,
        "/year-detail?section=naf-history&range=2147483640-2147483647&year=2147483647",
    )
    .await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location, "/");

    let response = app
        .oneshot(test_request(
            "GET",
            "/events?page=year-list&section=naf-history&range=1-2000000",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_content_shows_error_page() {
    let (app, _hub, dir) = setup_app(None);

    let (status, html) = get_page(&app, "/section?object=naf").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(html.contains("Error Loading Data"));
    assert!(html.contains("Retry"));

    // Restoring the document fixes the next load
    std::fs::write(dir.path().join("data.json"), SAMPLE_CONTENT).unwrap();
    let (status, _) = get_page(&app, "/section?object=naf").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_section_missing_from_content() {
    let (app, _hub, _dir) =
        setup_app(Some(r#"{"sections": [{"id": "naf-history", "title": "NAF"}]}"#));

    let (status, html) = get_page(&app, "/section?object=evol").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(html.contains("Section Not Found"));
}

#[tokio::test]
async fn test_year_list_waits_for_range() {
    let (app, _hub, _dir) = setup_app(Some(SAMPLE_CONTENT));

    let (status, html) = get_page(&app, "/year-list?section=naf-history&object=naf").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Waiting for Year Range Detection"));
    assert!(!html.contains("year-card"));
}

#[tokio::test]
async fn test_year_list_cards_for_range() {
    let (app, _hub, _dir) = setup_app(Some(SAMPLE_CONTENT));

    let (status, html) = get_page(
        &app,
        "/year-list?section=naf-history&object=naf&range=1962-1971",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(html.matches("class=\"year-card").count(), 10);
    assert_eq!(html.matches("class=\"year-card detailed\"").count(), 2);
    assert!(html.contains("Establishment of the Nigerian Air Force"));
}

#[tokio::test]
async fn test_year_list_accepts_range_in_year_param() {
    let (app, _hub, _dir) = setup_app(Some(SAMPLE_CONTENT));

    let (status, html) = get_page(&app, "/year-list?object=naf&year=1972-1981").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Years 1972-1981"));
    assert!(html.contains("Introduction of the C-130 Hercules"));
}

#[tokio::test]
async fn test_year_detail_authored_and_generic() {
    let (app, _hub, _dir) = setup_app(Some(SAMPLE_CONTENT));

    let (status, html) = get_page(
        &app,
        "/year-detail?section=naf-history&object=naf&range=1962-1971&year=1964",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Establishment of the Nigerian Air Force"));
    assert!(html.contains("/interact/previous-year?page=year-detail"));
    assert!(html.contains("/interact/next-year?page=year-detail"));

    let (status, html) = get_page(
        &app,
        "/year-detail?section=naf-history&object=naf&range=1962-1971&year=1962",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Year 1962"));
    assert!(!html.contains("/interact/previous-year"));
}

#[tokio::test]
async fn test_year_detail_without_range_uses_tag_table() {
    let (app, _hub, _dir) = setup_app(Some(SAMPLE_CONTENT));

    let (status, html) = get_page(&app, "/year-detail?object=naf&year=1976").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Years 1972-1981"));
    assert!(html.contains("Introduction of the C-130 Hercules"));
}

// =============================================================================
// Local Interactions
// =============================================================================

#[tokio::test]
async fn test_pick_from_landing() {
    let (app, _hub, _dir) = setup_app(Some(SAMPLE_CONTENT));

    let (status, location) = redirect(&app, "/interact/pick?page=landing&object=nafsfa").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location, "/section?section=nafsfa-history&object=nafsfa");

    let (_, location) = redirect(&app, "/interact/pick?page=landing&object=glider").await;
    assert_eq!(location, "/");
}

#[tokio::test]
async fn test_select_year_inside_range() {
    let (app, _hub, _dir) = setup_app(Some(SAMPLE_CONTENT));

    let (status, location) = redirect(
        &app,
        "/interact/select-year?page=year-list&section=naf-history&object=naf&range=1962-1971&year=1965",
    )
    .await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(
        location,
        "/year-detail?section=naf-history&object=naf&range=1962-1971&year=1965"
    );
}

#[tokio::test]
async fn test_select_year_refused_with_hint() {
    let (app, _hub, _dir) = setup_app(Some(SAMPLE_CONTENT));

    let (_, location) = redirect(
        &app,
        "/interact/select-year?page=year-list&section=naf-history&object=naf&year=1965",
    )
    .await;
    assert_eq!(
        location,
        "/year-list?section=naf-history&object=naf&hint=awaiting-range"
    );

    let (_, location) = redirect(
        &app,
        "/interact/select-year?page=year-list&section=naf-history&object=naf&range=1962-1971&year=1990",
    )
    .await;
    assert_eq!(
        location,
        "/year-list?section=naf-history&object=naf&range=1962-1971&hint=out-of-range"
    );
}

#[tokio::test]
async fn test_neighbour_years_bounded_by_range() {
    let (app, _hub, _dir) = setup_app(Some(SAMPLE_CONTENT));

    let (_, location) = redirect(
        &app,
        "/interact/next-year?page=year-detail&section=naf-history&object=naf&range=1962-1971&year=1970",
    )
    .await;
    assert_eq!(
        location,
        "/year-detail?section=naf-history&object=naf&range=1962-1971&year=1971"
    );

    // Already on the last year: stay put
    let (_, location) = redirect(
        &app,
        "/interact/next-year?page=year-detail&section=naf-history&object=naf&range=1962-1971&year=1971",
    )
    .await;
    assert_eq!(
        location,
        "/year-detail?section=naf-history&object=naf&range=1962-1971&year=1971"
    );
}

#[tokio::test]
async fn test_unknown_action_returns_to_landing() {
    let (app, _hub, _dir) = setup_app(Some(SAMPLE_CONTENT));

    let (status, location) = redirect(&app, "/interact/teleport?page=landing").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location, "/");
}

// =============================================================================
// Hub Status and Simulation
// =============================================================================

#[tokio::test]
async fn test_simulated_visit_updates_status() {
    let (app, _hub, _dir) = setup_app(Some(SAMPLE_CONTENT));

    let response = app
        .clone()
        .oneshot(json_request(
            "/api/simulate/object-picked",
            json!({"object": "NAF"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Simulated object pick: naf");

    let response = app
        .clone()
        .oneshot(json_request(
            "/api/simulate/year-detected",
            json!({"year_range": "1972-1981"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(test_request("GET", "/api/status"))
        .await
        .unwrap();
    let status = extract_json(response.into_body()).await;
    assert_eq!(status["picked_object"], "naf");
    assert_eq!(status["dropped_year"], "1972-1981");
    assert_eq!(status["current_state"], "year-list");
    assert_eq!(status["available_objects"].as_array().unwrap().len(), 3);
    assert_eq!(status["available_years"].as_array().unwrap().len(), 7);

    let response = app
        .clone()
        .oneshot(test_request("POST", "/api/simulate/system-reset"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(test_request("GET", "/api/status"))
        .await
        .unwrap();
    let status = extract_json(response.into_body()).await;
    assert!(status["picked_object"].is_null());
    assert_eq!(status["current_state"], "main");
}

#[tokio::test]
async fn test_simulation_refusals() {
    let (app, _hub, _dir) = setup_app(Some(SAMPLE_CONTENT));

    let response = app
        .clone()
        .oneshot(json_request(
            "/api/simulate/year-detected",
            json!({"year_range": "1962-1971"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "No object picked - pick an object first");

    let response = app
        .clone()
        .oneshot(test_request("POST", "/api/simulate/object-removed"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["message"], "No object to remove");

    let response = app
        .clone()
        .oneshot(json_request(
            "/api/simulate/object-picked",
            json!({"object": "glider"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["message"], "Invalid object: glider");
}

#[tokio::test]
async fn test_unknown_rfid_default_uid() {
    let (app, hub, _dir) = setup_app(Some(SAMPLE_CONTENT));
    let mut rx = hub.subscribe();

    let response = app
        .oneshot(test_request("POST", "/api/simulate/unknown-rfid"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["message"], "Simulated unknown RFID: TEST-UID-123");

    let signal = rx.try_recv().unwrap();
    assert_eq!(signal.name(), "unknown_rfid");
}

#[tokio::test]
async fn test_resolve_tag() {
    let (app, hub, _dir) = setup_app(Some(SAMPLE_CONTENT));
    hub.object_picked("naf").await.unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "/api/resolve",
            json!({"uid": "d3 2f 29 14", "year_range": "1962-1971", "object": "naf"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        hub.status().await.dropped_year.map(|r| r.to_string()),
        Some("1962-1971".to_string())
    );

    let response = app
        .oneshot(json_request(
            "/api/resolve",
            json!({"uid": "00 00 00 00", "year_range": "1962-1971", "object": "naf"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_rfid_table_endpoint() {
    let (app, _hub, _dir) = setup_app(Some(SAMPLE_CONTENT));

    let response = app.oneshot(test_request("GET", "/api/rfid")).await.unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["count"], 7);
    assert!(body["uids"]
        .as_array()
        .unwrap()
        .iter()
        .any(|uid| uid == "D3 2F 29 14"));
}

// =============================================================================
// Page Event Streams
// =============================================================================

#[tokio::test]
async fn test_events_rejects_invalid_page_state() {
    let (app, _hub, _dir) = setup_app(Some(SAMPLE_CONTENT));

    let response = app
        .oneshot(test_request("GET", "/events?page=year-list"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_events_catch_up_with_hub_on_connect() {
    let (app, hub, _dir) = setup_app(Some(SAMPLE_CONTENT));
    hub.object_picked("evol").await.unwrap();

    // The landing session pulls status, navigates and closes the stream
    let response = app
        .oneshot(test_request("GET", "/events?page=landing"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let text = extract_text(response.into_body()).await;
    assert!(text.contains("event: connection"));
    assert!(text.contains("event: navigate"));
    assert!(text.contains("/section?section=finance-evolution&object=evol"));
}

#[tokio::test]
async fn test_click_held_while_stream_down_replays_on_reconnect() {
    let (app, _hub, _dir) = setup_app(Some(SAMPLE_CONTENT));
    let session = uuid::Uuid::new_v4();
    let events = format!(
        "/events?page=year-list&section=naf-history&object=naf&range=1962-1971&session={}",
        session
    );

    // Page subscribes, then loses its stream without navigating
    let response = app
        .clone()
        .oneshot(test_request("GET", &events))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    drop(response);

    // The click is kept for the session instead of deciding from the URL
    let response = app
        .clone()
        .oneshot(test_request(
            "GET",
            &format!(
                "/interact/select-year?page=year-list&section=naf-history&object=naf&range=1962-1971&year=1965&session={}",
                session
            ),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.oneshot(test_request("GET", &events)).await.unwrap();
    let text = extract_text(response.into_body()).await;
    assert!(text.contains("event: session"));
    assert!(text.contains("event: navigate"));
    assert!(text.contains("/year-detail?section=naf-history&object=naf&range=1962-1971&year=1965"));
}

#[tokio::test]
async fn test_unknown_session_falls_back_to_redirect() {
    let (app, _hub, _dir) = setup_app(Some(SAMPLE_CONTENT));

    let (status, location) = redirect(
        &app,
        &format!(
            "/interact/select-year?page=year-list&section=naf-history&object=naf&range=1962-1971&year=1965&session={}",
            uuid::Uuid::new_v4()
        ),
    )
    .await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(
        location,
        "/year-detail?section=naf-history&object=naf&range=1962-1971&year=1965"
    );
}
