//! Wire shape of the content document
//!
//! Every field except a section's `id` is optional; a missing field
//! deserialises to an empty default so rendering never trips over it.

use serde::Deserialize;
use std::collections::BTreeMap;

/// Top-level content document
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDocument {
    #[serde(default)]
    pub sections: Vec<RawSection>,
}

/// Section as authored, in either content shape
#[derive(Debug, Clone, Deserialize)]
pub struct RawSection {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub description: Option<String>,

    /// Legacy flat shape
    #[serde(default)]
    pub years: Vec<RawYearEntry>,

    /// Range-partitioned shape; each map normally holds one range key
    #[serde(default, rename = "year-ranges")]
    pub year_ranges: Vec<BTreeMap<String, Vec<RawYearEntry>>>,
}

/// Year label: authored as a string, occasionally as a bare number
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum YearLabel {
    Number(i64),
    Text(String),
}

impl YearLabel {
    pub fn into_text(self) -> String {
        match self {
            YearLabel::Number(n) => n.to_string(),
            YearLabel::Text(s) => s,
        }
    }
}

impl Default for YearLabel {
    fn default() -> Self {
        YearLabel::Text(String::new())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawYearEntry {
    #[serde(default)]
    pub year: YearLabel,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub highlights: Vec<RawHighlight>,
    #[serde(default)]
    pub activities: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawHighlight {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}
