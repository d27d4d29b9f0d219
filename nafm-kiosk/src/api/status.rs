//! Exhibit hub status and page-to-hub messages

use crate::AppState;
use axum::{extract::State, http::StatusCode, Json};
use nafm_common::events::StatusSnapshot;
use nafm_common::rfid::RfidTableInfo;
use nafm_common::YearRange;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Outcome of a hub request
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub success: bool,
    pub message: String,
}

impl StatusResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// GET /api/status - the `simulation_status` payload
pub async fn get_status(State(state): State<AppState>) -> Json<StatusSnapshot> {
    Json(state.hub.status().await)
}

/// GET /api/rfid - the active tag table
pub async fn get_rfid_table(State(state): State<AppState>) -> Json<RfidTableInfo> {
    Json(state.rfid.info())
}

#[derive(Debug, Deserialize)]
pub struct ResolveRequest {
    pub uid: String,
    pub year_range: String,
    pub object: String,
}

/// POST /api/resolve - a page resolved a tag to a year range
pub async fn resolve_year(
    State(state): State<AppState>,
    Json(req): Json<ResolveRequest>,
) -> Result<Json<StatusResponse>, (StatusCode, Json<StatusResponse>)> {
    let year_range = req.year_range.parse::<YearRange>().map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(StatusResponse::failed(e.to_string())),
        )
    })?;

    match state.hub.resolve_year(&req.uid, year_range, &req.object).await {
        Ok(range) => Ok(Json(StatusResponse::ok(format!(
            "Tag {} resolved to {}",
            req.uid, range
        )))),
        Err(e) => {
            warn!("Resolve request for tag {} refused: {}", req.uid, e);
            Err((
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(StatusResponse::failed(e.to_string())),
            ))
        }
    }
}
