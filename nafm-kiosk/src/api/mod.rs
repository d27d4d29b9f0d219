//! HTTP handlers for nafm-kiosk

pub mod buildinfo;
pub mod health;
pub mod interact;
pub mod simulate;
pub mod sse;
pub mod status;
pub mod ui;

pub use buildinfo::get_build_info;
pub use health::health_routes;
pub use interact::interact;
pub use simulate::simulate_routes;
pub use sse::page_events;
pub use status::{get_rfid_table, get_status, resolve_year};
pub use ui::{serve_kiosk_css, serve_kiosk_js};

use nafm_common::navigation::{PageKind, PageQuery};
use serde::Deserialize;
use uuid::Uuid;

/// Page name plus the page's URL state, as sent by links and the event
/// subscription
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageStateQuery {
    #[serde(default)]
    pub page: Option<String>,
    #[serde(default)]
    pub section: Option<String>,
    #[serde(default)]
    pub object: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub range: Option<String>,
    #[serde(default)]
    pub hint: Option<String>,
    /// Page session; routes touch input through the page's event stream
    #[serde(default)]
    pub session: Option<Uuid>,
}

impl PageStateQuery {
    /// Page kind (landing when absent) and the remaining URL state
    pub fn into_parts(self) -> nafm_common::Result<(PageKind, PageQuery)> {
        let kind = self.page.as_deref().unwrap_or_default().parse::<PageKind>()?;
        Ok((
            kind,
            PageQuery {
                section: self.section,
                object: self.object,
                year: self.year,
                range: self.range,
                hint: self.hint,
            },
        ))
    }
}
