//! Year detail with previous/next inside the active range

use super::render::{asset_src, escape, interact_url};
use nafm_common::content::{Section, YearEntry};
use nafm_common::navigation::{PageKind, PageUrl};
use nafm_common::YearRange;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Neighbour {
    pub year: i32,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct YearDetailView {
    pub section_title: String,
    pub range: YearRange,
    pub entry: YearEntry,
    pub previous: Option<Neighbour>,
    pub next: Option<Neighbour>,
    /// Back to the year list for the same range
    pub back: String,
}

impl YearDetailView {
    /// `url` must be a year-detail URL; its range and year are always set
    pub fn build(section: &Section, url: &PageUrl, range: YearRange, year: i32) -> Self {
        let entry = section.entry_or_generic(Some(&range), year).into_owned();
        let previous = range.previous(year).map(|y| Neighbour {
            year: y,
            href: interact_url("previous-year", url, &[]),
        });
        let next = range.next(year).map(|y| Neighbour {
            year: y,
            href: interact_url("next-year", url, &[]),
        });
        Self {
            section_title: section.title.clone(),
            range,
            entry,
            previous,
            next,
            back: PageUrl::new(PageKind::YearList, url.context).to_string(),
        }
    }
}

pub fn render(view: &YearDetailView) -> String {
    let entry = &view.entry;

    let highlights: String = entry
        .highlights
        .iter()
        .map(|h| {
            let image = h
                .image
                .as_deref()
                .map(|src| format!(r#"<img src="{}" alt="">"#, escape(&asset_src(src))))
                .unwrap_or_default();
            format!(
                r#"<li class="highlight">{}<h4>{}</h4><p>{}</p></li>"#,
                image,
                escape(&h.title),
                escape(&h.description)
            )
        })
        .collect();

    let activities: String = entry
        .activities
        .iter()
        .map(|a| format!("<li>{}</li>", escape(a)))
        .collect();

    let images: String = entry
        .images
        .iter()
        .map(|src| {
            format!(
                r#"<figure class="gallery-item"><img src="{}" alt="{}"></figure>"#,
                escape(&asset_src(src)),
                escape(&entry.title)
            )
        })
        .collect();

    let neighbour = |n: &Option<Neighbour>, class: &str, label: &str| match n {
        Some(n) => format!(
            r#"<a class="year-nav {}" href="{}">{} {}</a>"#,
            class,
            escape(&n.href),
            label,
            n.year
        ),
        None => String::new(),
    };

    let optional_list = |heading: &str, class: &str, items: &str, tag: &str| {
        if items.is_empty() {
            String::new()
        } else {
            format!(
                r#"<section class="{class}"><h3>{heading}</h3><{tag}>{items}</{tag}></section>"#,
                class = class,
                heading = heading,
                items = items,
                tag = tag
            )
        }
    };

    format!(
        r#"<article class="year-detail{generic}">
<p class="breadcrumb"><a href="{back}">{section} - Years {range}</a></p>
<span class="year-number" id="year-number">{label}</span>
<h1 id="year-title">{title}</h1>
<p class="year-summary" id="year-summary">{summary}</p>
<div class="year-content" id="year-content">{content}</div>
{highlights}
{activities}
{images}
<nav class="year-navigation">
{previous}
{next}
</nav>
</article>"#,
        generic = if entry.generic { " generic" } else { "" },
        back = escape(&view.back),
        section = escape(&view.section_title),
        range = view.range,
        label = escape(&entry.year_label),
        title = escape(&entry.title),
        summary = escape(&entry.summary),
        content = escape(&entry.content),
        highlights = optional_list("Highlights", "highlights", &highlights, "ul"),
        activities = optional_list("Key Activities", "activities", &activities, "ul"),
        images = optional_list("Gallery", "gallery", &images, "div"),
        previous = neighbour(&view.previous, "previous", "&larr;"),
        next = neighbour(&view.next, "next", "&rarr;"),
    )
}
