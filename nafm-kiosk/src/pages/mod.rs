//! Page controllers
//!
//! Each controller rebuilds the selection from its URL, loads the content
//! document, renders the page and wires it to its event stream. Invalid URL
//! state sends the visitor back to the landing page; unreadable content and
//! unknown sections produce a readable error page instead of a blank screen.

pub mod landing;
pub mod render;
pub mod section;
pub mod year_detail;
pub mod year_list;

use crate::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use nafm_common::content::{ContentStore, Section};
use nafm_common::navigation::{PageKind, PageQuery, PageUrl};
use nafm_common::{Error, SectionId};
use tracing::{error, warn};

/// GET /
pub async fn landing_page() -> Html<String> {
    let url = PageUrl::landing();
    Html(render::document(
        "Welcome",
        PageKind::Landing,
        Some(&url),
        &landing::render(),
    ))
}

/// GET /section
pub async fn section_page(State(state): State<AppState>, Query(query): Query<PageQuery>) -> Response {
    let (url, id, store) = match prepare(&state, PageKind::Section, &query).await {
        Ok(prepared) => prepared,
        Err(response) => return response,
    };
    with_section(&store, id, &url, |section| {
        let view = section::SectionView::build(id, section);
        render::document(&view.title, url.kind, Some(&url), &section::render(&view))
    })
}

/// GET /year-list
pub async fn year_list_page(State(state): State<AppState>, Query(query): Query<PageQuery>) -> Response {
    let (url, id, store) = match prepare(&state, PageKind::YearList, &query).await {
        Ok(prepared) => prepared,
        Err(response) => return response,
    };
    with_section(&store, id, &url, |section| {
        let view = year_list::YearListView::build(id, section, &url);
        let title = match view.range {
            Some(range) => format!("Years {} - {}", range, view.section_name),
            None => view.section_name.clone(),
        };
        render::document(&title, url.kind, Some(&url), &year_list::render(&view))
    })
}

/// GET /year-detail
pub async fn year_detail_page(State(state): State<AppState>, Query(query): Query<PageQuery>) -> Response {
    let (url, id, store) = match prepare(&state, PageKind::YearDetail, &query).await {
        Ok(prepared) => prepared,
        Err(response) => return response,
    };
    let (Some(range), Some(year)) = (url.context.year_range, url.context.year) else {
        return Redirect::to("/").into_response();
    };
    with_section(&store, id, &url, |section| {
        let view = year_detail::YearDetailView::build(section, &url, range, year);
        let title = format!("{} - {}", view.entry.year_label, view.section_title);
        render::document(&title, url.kind, Some(&url), &year_detail::render(&view))
    })
}

/// Validate the URL and load content for a section page
async fn prepare(
    state: &AppState,
    kind: PageKind,
    query: &PageQuery,
) -> Result<(PageUrl, SectionId, ContentStore), Response> {
    let url = match query.page_url(kind, &state.rfid) {
        Ok(url) => url,
        Err(e) => {
            warn!("Invalid {} URL ({}), returning to landing", kind, e);
            return Err(Redirect::to("/").into_response());
        }
    };
    // page_url always sets a section for non-landing pages
    let Some(id) = url.context.section_id else {
        return Err(Redirect::to("/").into_response());
    };
    match state.load_content().await {
        Ok(store) => Ok((url, id, store)),
        Err(e) => Err(error_page(&e, kind, &url.to_string())),
    }
}

fn with_section<F>(store: &ContentStore, id: SectionId, url: &PageUrl, render_page: F) -> Response
where
    F: FnOnce(&Section) -> String,
{
    match store.section(id) {
        Ok(section) => Html(render_page(section)).into_response(),
        Err(e) => error_page(&e, url.kind, &url.to_string()),
    }
}

/// Error page for the errors a visitor is allowed to see
///
/// Anything else is logged and the visitor goes back to the landing page.
pub fn error_page(err: &Error, kind: PageKind, retry: &str) -> Response {
    if !err.is_visitor_facing() {
        warn!("{} page failed ({}), returning to landing", kind, err);
        return Redirect::to("/").into_response();
    }
    let (status, heading, message) = match err {
        Error::SectionNotFound(_) => (
            StatusCode::NOT_FOUND,
            "Section Not Found",
            "This part of the exhibit is not available.",
        ),
        _ => (
            StatusCode::SERVICE_UNAVAILABLE,
            "Error Loading Data",
            "The exhibit content could not be loaded right now.",
        ),
    };
    error!("{} page failed: {}", kind, err);
    let body = render::error_body(heading, message, Some(retry));
    (status, Html(render::document(heading, kind, None, &body))).into_response()
}
