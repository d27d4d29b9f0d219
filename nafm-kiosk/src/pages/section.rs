//! Section overview

use super::render::{asset_src, escape};
use nafm_common::content::{Section, SectionStats};
use nafm_common::SectionId;

/// What the section overview shows
#[derive(Debug, Clone, PartialEq)]
pub struct SectionView {
    pub title: String,
    pub icon: String,
    pub description: String,
    pub logo: Option<String>,
    pub stats: SectionStats,
    pub drop_instruction: String,
}

impl SectionView {
    pub fn build(id: SectionId, section: &Section) -> Self {
        let drop_instruction = match section.range_keys().first() {
            Some(example) => format!(
                "Please drop a year range object (e.g., {}) in the year area to explore the historical timeline of {}",
                example, section.title
            ),
            None => format!(
                "No year ranges are currently available for {}. Please check back later or explore other sections.",
                section.title
            ),
        };
        Self {
            title: section.title.clone(),
            icon: section
                .icon
                .clone()
                .unwrap_or_else(|| id.default_icon().to_string()),
            description: section
                .description
                .clone()
                .unwrap_or_else(|| id.default_description().to_string()),
            logo: section.logo.clone(),
            stats: section.stats(),
            drop_instruction,
        }
    }
}

pub fn render(view: &SectionView) -> String {
    let logo = view
        .logo
        .as_deref()
        .map(|src| {
            format!(
                r#"<img id="section-logo" class="section-logo" src="{}" alt="">"#,
                escape(&asset_src(src))
            )
        })
        .unwrap_or_default();
    format!(
        r#"<section class="section-overview">
{logo}
<div class="section-icon" id="section-icon">{icon}</div>
<h1 id="section-title">{title}</h1>
<p id="section-description">{description}</p>
<dl class="section-stats">
<dt>Years recorded</dt><dd id="total-years">{years}</dd>
<dt>Events</dt><dd id="total-events">{events}</dd>
</dl>
<div class="drop-zone">
<p id="drop-zone-instruction">{instruction}</p>
</div>
</section>"#,
        logo = logo,
        icon = escape(&view.icon),
        title = escape(&view.title),
        description = escape(&view.description),
        years = view.stats.total_years,
        events = view.stats.total_events,
        instruction = escape(&view.drop_instruction),
    )
}
