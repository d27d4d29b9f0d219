//! Year list: one card per year of the detected range

use super::render::{escape, interact_url};
use nafm_common::content::Section;
use nafm_common::navigation::{Hint, PageUrl};
use nafm_common::{SectionId, YearRange};

const SUMMARY_LIMIT: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearCard {
    pub year: i32,
    pub title: String,
    pub summary: String,
    /// Authored content rather than a generic placeholder
    pub detailed: bool,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearListView {
    pub section_name: String,
    pub range: Option<YearRange>,
    pub cards: Vec<YearCard>,
    pub hint: Option<Hint>,
}

impl YearListView {
    pub fn build(id: SectionId, section: &Section, url: &PageUrl) -> Self {
        let range = url.context.year_range;
        let cards = range
            .map(|range| {
                range
                    .years()
                    .map(|year| {
                        let entry = section.entry_or_generic(Some(&range), year);
                        YearCard {
                            year,
                            title: entry.title.clone(),
                            summary: truncate(&entry.summary, SUMMARY_LIMIT),
                            detailed: !entry.generic,
                            href: interact_url("select-year", url, &[("year", year.to_string())]),
                        }
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            section_name: id.object().display_name().to_string(),
            range,
            cards,
            hint: url.hint,
        }
    }
}

fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let cut: String = text.chars().take(limit).collect();
    format!("{}...", cut)
}

pub fn render(view: &YearListView) -> String {
    let hint = view
        .hint
        .map(|h| format!(r#"<p class="hint">{}</p>"#, escape(h.message())))
        .unwrap_or_default();

    let Some(range) = view.range else {
        return format!(
            r#"<section class="year-list waiting">
<h1 id="year-range-title">{name}</h1>
{hint}
<div id="no-interaction-overlay" class="overlay">
<h3>Waiting for Year Range Detection</h3>
<p>Please drop a year range object to view the years of {name}</p>
</div>
</section>"#,
            name = escape(&view.section_name),
            hint = hint,
        );
    };

    let cards: String = view
        .cards
        .iter()
        .map(|card| {
            format!(
                r#"<a class="year-card{class}" data-year="{year}" href="{href}">
<span class="year-number">{year}</span>
<h3 class="year-description">{title}</h3>
<p>{summary}</p>
<span class="year-indicator">{indicator}</span>
</a>"#,
                class = if card.detailed { " detailed" } else { "" },
                year = card.year,
                href = escape(&card.href),
                title = escape(&card.title),
                summary = escape(&card.summary),
                indicator = if card.detailed {
                    "Detailed Records"
                } else {
                    "General Period"
                },
            )
        })
        .collect();

    format!(
        r#"<section class="year-list">
<h1 id="year-range-title">Years {range}</h1>
<p id="section-info">{name} - Select a specific year to explore</p>
{hint}
<div class="years-grid" id="years-grid">
{cards}
</div>
</section>"#,
        range = range,
        name = escape(&view.section_name),
        hint = hint,
        cards = cards,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use nafm_common::content::ContentStore;
    use nafm_common::navigation::{PageKind, SelectionContext};
    use nafm_common::ObjectId;

    fn store() -> ContentStore {
        ContentStore::from_json_str(
            r#"{"sections": [{"id": "naf-history", "title": "NAF History",
                "year-ranges": [{"1962-1971": [{"year": "1964", "title": "Founding",
                  "summary": "The Nigerian Air Force was formally established by an Act of Parliament in April 1964, with technical assistance from West Germany."}]}]}]}"#,
        )
        .unwrap()
    }

    fn url(range: Option<&str>) -> PageUrl {
        PageUrl::new(
            PageKind::YearList,
            SelectionContext {
                year_range: range.map(|r| r.parse().unwrap()),
                ..SelectionContext::for_object(ObjectId::Naf)
            },
        )
    }

    #[test]
    fn test_cards_cover_range() {
        let store = store();
        let section = store.section(SectionId::NafHistory).unwrap();
        let view = YearListView::build(SectionId::NafHistory, section, &url(Some("1962-1971")));

        assert_eq!(view.cards.len(), 10);
        let founding = &view.cards[2];
        assert!(founding.detailed);
        assert!(founding.summary.ends_with("..."));
        assert_eq!(founding.summary.chars().count(), SUMMARY_LIMIT + 3);
        assert_eq!(
            view.cards[0].summary,
            "Historical period within the 1962-1971 era"
        );
        assert!(view.cards[0]
            .href
            .ends_with("range=1962-1971&year=1962"));
    }

    #[test]
    fn test_waiting_without_range() {
        let store = store();
        let section = store.section(SectionId::NafHistory).unwrap();
        let view = YearListView::build(SectionId::NafHistory, section, &url(None));
        assert!(view.cards.is_empty());
        let html = render(&view);
        assert!(html.contains("Waiting for Year Range Detection"));
        assert!(!html.contains("year-card"));
    }
}
