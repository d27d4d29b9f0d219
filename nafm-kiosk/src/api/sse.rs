//! Server-Sent Events for open pages
//!
//! Each page subscribes with its own URL state. The stream opens with the
//! page's `session` id, then carries the session's instructions
//! (`navigate`, `render`, `feedback`, `connection`) and ends after the first
//! navigation. A page reconnecting with its id resumes its mailbox.

use super::PageStateQuery;
use crate::session::PageSession;
use crate::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
};
use futures::stream::StreamExt;
use std::convert::Infallible;
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

/// GET /events - page event stream
pub async fn page_events(
    State(state): State<AppState>,
    Query(query): Query<PageStateQuery>,
) -> Response {
    let id = query.session.unwrap_or_else(Uuid::new_v4);
    let url = match query
        .into_parts()
        .and_then(|(kind, query)| query.page_url(kind, &state.rfid))
    {
        Ok(url) => url,
        Err(e) => {
            warn!("Rejected event subscription: {}", e);
            return (StatusCode::BAD_REQUEST, e.to_string()).into_response();
        }
    };

    // Subscribe before the session pulls status so no signal falls between
    let rx = state.hub.subscribe();
    let session = PageSession::with_id(id, &url, state.hub.clone(), state.rfid.clone());
    debug!("Page {} subscribed as session {}", url, session.id());

    let stream = session
        .into_stream(rx, state.sessions.clone())
        .filter_map(|event| async move {
            match serde_json::to_string(&event) {
                Ok(json) => Some(Ok::<_, Infallible>(
                    Event::default().event(event.name()).data(json),
                )),
                Err(e) => {
                    warn!("Failed to serialize session event: {}", e);
                    None
                }
            }
        });

    Sse::new(stream)
        .keep_alive(
            KeepAlive::new()
                .interval(Duration::from_secs(15))
                .text("keep-alive"),
        )
        .into_response()
}
