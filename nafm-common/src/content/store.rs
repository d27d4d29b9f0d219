//! Normalised content model and lookups

use super::document::{RawDocument, RawHighlight, RawSection, RawYearEntry};
use crate::year_range::parse_leading_year;
use crate::{Error, Result, SectionId, YearRange};
use serde::Serialize;
use std::borrow::Cow;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info, warn};

/// Whole content document, read-only once loaded
#[derive(Debug, Clone, Default, Serialize)]
pub struct ContentStore {
    sections: Vec<Section>,
}

/// Section with both authored shapes folded into partitions
#[derive(Debug, Clone, Serialize)]
pub struct Section {
    pub id: String,
    pub title: String,
    pub logo: Option<String>,
    pub icon: Option<String>,
    pub description: Option<String>,
    /// `true` when the section was authored with `year-ranges`
    pub partitioned: bool,
    pub partitions: Vec<Partition>,
}

/// Entries registered under one range key (or the flat list)
#[derive(Debug, Clone, Serialize)]
pub struct Partition {
    /// Range key as authored; empty for the flat list
    pub key: String,
    /// Parsed key; `None` for the flat list or an unparsable key
    pub range: Option<YearRange>,
    pub entries: Vec<YearEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearEntry {
    /// Year as authored (`"1975"` or a sub-range such as `"1975-1977"`)
    pub year_label: String,
    /// Leading year of the label
    pub year: Option<i32>,
    pub title: String,
    pub summary: String,
    pub content: String,
    pub highlights: Vec<Highlight>,
    pub activities: Vec<String>,
    pub images: Vec<String>,
    /// Synthesised placeholder rather than authored content
    pub generic: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Highlight {
    pub title: String,
    pub description: String,
    pub image: Option<String>,
}

/// Aggregates shown on the section overview
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SectionStats {
    pub total_years: usize,
    /// Highlights plus activities across all entries
    pub total_events: usize,
}

impl ContentStore {
    /// Read and parse the content document from disk
    ///
    /// Any read or parse failure is `ContentUnavailable`; callers show it and
    /// stop rendering rather than retrying.
    pub async fn load(path: &Path) -> Result<Self> {
        let text = tokio::fs::read_to_string(path).await.map_err(|e| {
            Error::ContentUnavailable(format!("{}: {}", path.display(), e))
        })?;
        let store = Self::from_json_str(&text)?;
        info!(
            "Loaded content document {} ({} sections)",
            path.display(),
            store.sections.len()
        );
        Ok(store)
    }

    /// Parse a content document already in memory
    pub fn from_json_str(text: &str) -> Result<Self> {
        let raw: RawDocument = serde_json::from_str(text)
            .map_err(|e| Error::ContentUnavailable(format!("invalid content document: {}", e)))?;
        Ok(Self::from_document(raw))
    }

    pub fn from_document(raw: RawDocument) -> Self {
        let sections = raw.sections.into_iter().map(Section::normalize).collect();
        Self { sections }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn find_section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    /// Section for a known section id, or `SectionNotFound`
    pub fn section(&self, id: SectionId) -> Result<&Section> {
        self.find_section(id.as_str())
            .ok_or_else(|| Error::SectionNotFound(id.as_str().to_string()))
    }
}

impl Section {
    fn normalize(raw: RawSection) -> Self {
        let partitioned = !raw.year_ranges.is_empty();
        let mut partitions = Vec::new();

        for map in raw.year_ranges {
            for (key, entries) in map {
                let range = match key.parse::<YearRange>() {
                    Ok(range) => Some(range),
                    Err(_) => {
                        warn!("Section {}: unparsable range key {:?}", raw.id, key);
                        None
                    }
                };
                partitions.push(Partition {
                    entries: normalize_entries(&raw.id, &key, entries),
                    key,
                    range,
                });
            }
        }

        if !raw.years.is_empty() {
            partitions.push(Partition {
                key: String::new(),
                range: None,
                entries: normalize_entries(&raw.id, "", raw.years),
            });
        }

        Self {
            title: raw.title.unwrap_or_else(|| raw.id.clone()),
            id: raw.id,
            logo: raw.logo,
            icon: raw.icon,
            description: raw.description,
            partitioned,
            partitions,
        }
    }

    /// Entries across every partition, in authored order
    pub fn entries(&self) -> impl Iterator<Item = &YearEntry> {
        self.partitions.iter().flat_map(|p| p.entries.iter())
    }

    /// First entry, in any partition, whose year parses to `year`
    pub fn find_year_entry(&self, year: i32) -> Option<&YearEntry> {
        self.entries().find(|e| e.year == Some(year))
    }

    /// Entry for `year` registered under exactly `range`
    ///
    /// Entries in other partitions never match, even with the same year.
    /// A section authored with the flat shape has no partitions to
    /// constrain by, so its entries match when the year lies in `range`.
    pub fn find_year_entry_in_range(&self, range: &YearRange, year: i32) -> Option<&YearEntry> {
        if self.partitioned {
            self.partitions
                .iter()
                .filter(|p| p.range.as_ref() == Some(range))
                .flat_map(|p| p.entries.iter())
                .find(|e| e.year == Some(year))
        } else if range.contains(year) {
            self.find_year_entry(year)
        } else {
            None
        }
    }

    /// Authored entry for `year`
    ///
    /// With a range the lookup is constrained to that partition; without one
    /// every partition is searched.
    pub fn year_entry(&self, range: Option<&YearRange>, year: i32) -> Result<&YearEntry> {
        let found = match range {
            Some(range) => self.find_year_entry_in_range(range, year),
            None => self.find_year_entry(year),
        };
        found.ok_or(Error::YearEntryNotFound(year))
    }

    /// Authored entry for `year`, or a generic placeholder
    pub fn entry_or_generic(&self, range: Option<&YearRange>, year: i32) -> Cow<'_, YearEntry> {
        match self.year_entry(range, year) {
            Ok(entry) => Cow::Borrowed(entry),
            Err(e) => {
                debug!("Section {}: {}, using generic content", self.id, e);
                Cow::Owned(YearEntry::generic(year, range))
            }
        }
    }

    /// Range keys in authored order, flat list excluded
    pub fn range_keys(&self) -> Vec<&str> {
        self.partitions
            .iter()
            .filter(|p| !p.key.is_empty())
            .map(|p| p.key.as_str())
            .collect()
    }

    pub fn stats(&self) -> SectionStats {
        self.entries().fold(
            SectionStats {
                total_years: 0,
                total_events: 0,
            },
            |acc, e| SectionStats {
                total_years: acc.total_years + 1,
                total_events: acc.total_events + e.highlights.len() + e.activities.len(),
            },
        )
    }
}

impl YearEntry {
    /// Placeholder for a year without authored content
    pub fn generic(year: i32, range: Option<&YearRange>) -> Self {
        let summary = match range {
            Some(range) => format!("Historical period within the {} era", range),
            None => format!("Historical period of {}", year),
        };
        Self {
            year_label: year.to_string(),
            year: Some(year),
            title: format!("Year {}", year),
            summary,
            content: format!(
                "Detailed records for {} are still being compiled. The Nigerian Air Force \
                 continued its operations, training and administration throughout this year.",
                year
            ),
            highlights: Vec::new(),
            activities: vec![
                "Routine operations and training".to_string(),
                "Personnel development and administration".to_string(),
                "Maintenance of equipment and facilities".to_string(),
            ],
            images: Vec::new(),
            generic: true,
        }
    }
}

fn normalize_entries(section_id: &str, key: &str, raw: Vec<RawYearEntry>) -> Vec<YearEntry> {
    let mut seen = HashSet::new();
    let mut entries = Vec::with_capacity(raw.len());
    for raw_entry in raw {
        let entry = normalize_entry(raw_entry);
        if !seen.insert(entry.year_label.clone()) {
            warn!(
                "Section {}: duplicate year {:?} in partition {:?} ignored",
                section_id, entry.year_label, key
            );
            continue;
        }
        entries.push(entry);
    }
    entries
}

fn normalize_entry(raw: RawYearEntry) -> YearEntry {
    let year_label = raw.year.into_text().trim().to_string();
    let year = parse_leading_year(&year_label);
    YearEntry {
        title: raw.title.unwrap_or_else(|| format!("Year {}", year_label)),
        summary: raw.summary.unwrap_or_default(),
        content: raw.content.unwrap_or_default(),
        highlights: raw.highlights.into_iter().map(normalize_highlight).collect(),
        activities: raw.activities,
        images: raw.images,
        year_label,
        year,
        generic: false,
    }
}

fn normalize_highlight(raw: RawHighlight) -> Highlight {
    Highlight {
        title: raw.title.unwrap_or_default(),
        description: raw.description.unwrap_or_default(),
        image: raw.image.filter(|s| !s.trim().is_empty()),
    }
}
