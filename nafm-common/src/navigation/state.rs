//! Page states and the selection context

use crate::{ObjectId, SectionId, YearRange};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Logical page, without its data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageKind {
    Landing,
    Section,
    YearList,
    YearDetail,
}

impl PageKind {
    /// Request path of the page
    pub fn path(&self) -> &'static str {
        match self {
            PageKind::Landing => "/",
            PageKind::Section => "/section",
            PageKind::YearList => "/year-list",
            PageKind::YearDetail => "/year-detail",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PageKind::Landing => "landing",
            PageKind::Section => "section",
            PageKind::YearList => "year-list",
            PageKind::YearDetail => "year-detail",
        }
    }
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PageKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim() {
            "landing" | "" | "index" => Ok(PageKind::Landing),
            "section" => Ok(PageKind::Section),
            "year-list" => Ok(PageKind::YearList),
            "year-detail" => Ok(PageKind::YearDetail),
            other => Err(crate::Error::InvalidInput(format!("unknown page: {}", other))),
        }
    }
}

/// The kiosk's current selection
///
/// Rebuilt from the URL on every page load and only changed by accepted
/// transitions. Returning to the landing page empties it completely.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionContext {
    pub picked_object: Option<ObjectId>,
    pub section_id: Option<SectionId>,
    pub year_range: Option<YearRange>,
    pub year: Option<i32>,
}

impl SelectionContext {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Context after an object has been picked
    pub fn for_object(object: ObjectId) -> Self {
        Self {
            picked_object: Some(object),
            section_id: Some(object.section()),
            year_range: None,
            year: None,
        }
    }
}

/// Page together with the data it is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Landing,
    SectionOverview {
        section: SectionId,
    },
    /// `range` is `None` until a year range has been detected
    YearList {
        section: SectionId,
        range: Option<YearRange>,
    },
    YearDetail {
        section: SectionId,
        range: YearRange,
        year: i32,
    },
}

impl Page {
    pub fn kind(&self) -> PageKind {
        match self {
            Page::Landing => PageKind::Landing,
            Page::SectionOverview { .. } => PageKind::Section,
            Page::YearList { .. } => PageKind::YearList,
            Page::YearDetail { .. } => PageKind::YearDetail,
        }
    }

    pub fn section(&self) -> Option<SectionId> {
        match *self {
            Page::Landing => None,
            Page::SectionOverview { section }
            | Page::YearList { section, .. }
            | Page::YearDetail { section, .. } => Some(section),
        }
    }
}

/// Short visitor-facing hint carried back to a page after a rejected
/// interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Hint {
    AwaitingRange,
    OutOfRange,
}

impl Hint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Hint::AwaitingRange => "awaiting-range",
            Hint::OutOfRange => "out-of-range",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Hint::AwaitingRange => {
                "Interaction not available yet. Please wait for year range detection to enable interaction."
            }
            Hint::OutOfRange => "That year is outside the selected year range.",
        }
    }
}

impl FromStr for Hint {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s {
            "awaiting-range" => Ok(Hint::AwaitingRange),
            "out-of-range" => Ok(Hint::OutOfRange),
            other => Err(crate::Error::InvalidInput(format!("unknown hint: {}", other))),
        }
    }
}
