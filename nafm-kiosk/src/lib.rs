//! nafm-kiosk library - NAF Museum exhibit kiosk
//!
//! Serves the four exhibit pages, the per-page event streams that move them
//! as exhibit hardware reports objects and year ranges, and the hub that
//! turns hardware (or simulated) input into channel signals.

use axum::Router;
use nafm_common::content::ContentStore;
use nafm_common::RfidTable;
use std::path::PathBuf;
use std::sync::Arc;

pub mod api;
pub mod exhibit;
pub mod hardware;
pub mod pages;
pub mod registry;
pub mod session;

use exhibit::ExhibitHub;
use registry::SessionRegistry;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub hub: Arc<ExhibitHub>,
    /// Tag table; the hub holds the same table
    pub rfid: Arc<RfidTable>,
    /// Mailboxes of pages that route touch input through their session
    pub sessions: Arc<SessionRegistry>,
    /// Content document, read on every page load
    pub content_path: Arc<PathBuf>,
    /// Directory served under `/assets`
    pub assets_dir: Option<PathBuf>,
}

impl AppState {
    pub fn new(hub: Arc<ExhibitHub>, content_path: PathBuf, assets_dir: Option<PathBuf>) -> Self {
        let rfid = hub.rfid().clone();
        Self {
            hub,
            rfid,
            sessions: Arc::new(SessionRegistry::new()),
            content_path: Arc::new(content_path),
            assets_dir,
        }
    }

    /// Read the content document
    ///
    /// Loaded per request so an edited or restored document is picked up by
    /// the next page load.
    pub async fn load_content(&self) -> nafm_common::Result<ContentStore> {
        ContentStore::load(&self.content_path).await
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};
    use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

    let pages = Router::new()
        .route("/", get(pages::landing_page))
        .route("/section", get(pages::section_page))
        .route("/year-list", get(pages::year_list_page))
        .route("/year-detail", get(pages::year_detail_page))
        .route("/interact/:action", get(api::interact))
        .route("/events", get(api::page_events))
        .route("/static/kiosk.js", get(api::serve_kiosk_js))
        .route("/static/kiosk.css", get(api::serve_kiosk_css));

    let api = Router::new()
        .route("/api/status", get(api::get_status))
        .route("/api/resolve", post(api::resolve_year))
        .route("/api/rfid", get(api::get_rfid_table))
        .route("/api/buildinfo", get(api::get_build_info))
        .merge(api::simulate_routes())
        .merge(api::health_routes());

    let mut router = Router::new().merge(pages).merge(api);
    if let Some(dir) = &state.assets_dir {
        router = router.nest_service("/assets", ServeDir::new(dir));
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
