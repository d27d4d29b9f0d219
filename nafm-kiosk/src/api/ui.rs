//! Browser client assets
//!
//! The client only follows server instructions: it opens the page's event
//! stream, follows `navigate`/`render` URLs and shows feedback and the
//! connection indicator.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

const KIOSK_JS: &str = include_str!("../ui/kiosk.js");
const KIOSK_CSS: &str = include_str!("../ui/kiosk.css");

/// GET /static/kiosk.js
pub async fn serve_kiosk_js() -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/javascript")],
        KIOSK_JS,
    )
        .into_response()
}

/// GET /static/kiosk.css
pub async fn serve_kiosk_css() -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/css")],
        KIOSK_CSS,
    )
        .into_response()
}
