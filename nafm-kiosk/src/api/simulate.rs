//! Simulated exhibit input
//!
//! Drives the hub the same way the hardware bridge does, for demos and
//! testing without the physical exhibit.

use super::status::StatusResponse;
use crate::AppState;
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::Deserialize;
use tracing::info;

/// UID used when a simulated unknown tag names none
pub const DEFAULT_TEST_UID: &str = "TEST-UID-123";

type SimulationResult = Result<Json<StatusResponse>, (StatusCode, Json<StatusResponse>)>;

fn refused(message: impl Into<String>) -> (StatusCode, Json<StatusResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(StatusResponse::failed(message)),
    )
}

#[derive(Debug, Deserialize)]
pub struct ObjectRequest {
    pub object: String,
}

#[derive(Debug, Deserialize)]
pub struct YearRequest {
    pub year_range: String,
    #[serde(default)]
    pub object: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RfidRequest {
    pub uid: String,
    pub object: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UnknownRfidRequest {
    #[serde(default)]
    pub uid: Option<String>,
}

/// POST /api/simulate/object-picked
pub async fn object_picked(
    State(state): State<AppState>,
    Json(req): Json<ObjectRequest>,
) -> SimulationResult {
    info!("Simulating object pick: {}", req.object);
    match state.hub.object_picked(&req.object).await {
        Ok(object) => Ok(Json(StatusResponse::ok(format!(
            "Simulated object pick: {}",
            object
        )))),
        Err(_) => Err(refused(format!("Invalid object: {}", req.object))),
    }
}

/// POST /api/simulate/object-removed
pub async fn object_removed(State(state): State<AppState>) -> SimulationResult {
    if state.hub.status().await.picked_object.is_none() {
        return Err(refused("No object to remove"));
    }
    match state.hub.object_removed().await {
        Some(object) => Ok(Json(StatusResponse::ok(format!(
            "Simulated object removal: {}",
            object
        )))),
        None => Err(refused("No object to remove")),
    }
}

/// POST /api/simulate/year-detected
pub async fn year_detected(
    State(state): State<AppState>,
    Json(req): Json<YearRequest>,
) -> SimulationResult {
    let Some(picked) = state.hub.status().await.picked_object else {
        return Err(refused("No object picked - pick an object first"));
    };
    let object = req.object.as_deref().unwrap_or(picked.as_str());
    match state.hub.year_detected(&req.year_range, Some(object)).await {
        Ok(range) => Ok(Json(StatusResponse::ok(format!(
            "Simulated year detection: {} for {}",
            range, picked
        )))),
        Err(_) => Err(refused(format!("Invalid year range: {}", req.year_range))),
    }
}

/// POST /api/simulate/rfid-detected
pub async fn rfid_detected(
    State(state): State<AppState>,
    Json(req): Json<RfidRequest>,
) -> SimulationResult {
    state.hub.rfid_detected(&req.uid, &req.object).await;
    Ok(Json(StatusResponse::ok(format!(
        "Simulated RFID detection: {} for {}",
        req.uid, req.object
    ))))
}

/// POST /api/simulate/unknown-rfid
pub async fn unknown_rfid(
    State(state): State<AppState>,
    req: Option<Json<UnknownRfidRequest>>,
) -> SimulationResult {
    let uid = req
        .and_then(|Json(req)| req.uid)
        .filter(|uid| !uid.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_TEST_UID.to_string());
    state.hub.unknown_rfid(&uid).await;
    Ok(Json(StatusResponse::ok(format!(
        "Simulated unknown RFID: {}",
        uid
    ))))
}

/// POST /api/simulate/system-reset
pub async fn system_reset(State(state): State<AppState>) -> SimulationResult {
    state.hub.system_reset().await;
    Ok(Json(StatusResponse::ok("Simulated system reset")))
}

pub fn simulate_routes() -> Router<AppState> {
    Router::new()
        .route("/api/simulate/object-picked", post(object_picked))
        .route("/api/simulate/object-removed", post(object_removed))
        .route("/api/simulate/year-detected", post(year_detected))
        .route("/api/simulate/rfid-detected", post(rfid_detected))
        .route("/api/simulate/unknown-rfid", post(unknown_rfid))
        .route("/api/simulate/system-reset", post(system_reset))
}
