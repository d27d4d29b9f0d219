//! URL state codec
//!
//! Pages share no session store; the selection travels between them in the
//! query string (`section`, `object`, `year`, `range`). Only validated, typed
//! values are ever written into a URL, so the values never need escaping.

use super::state::{Hint, PageKind, SelectionContext};
use crate::year_range::parse_leading_year;
use crate::{Error, ObjectId, Result, RfidTable, SectionId, YearRange};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw query parameters as they arrive from the browser
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageQuery {
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
}

/// A page plus the selection it carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageUrl {
    pub kind: PageKind,
    pub context: SelectionContext,
    pub hint: Option<Hint>,
}

impl PageUrl {
    /// URL for `kind`, keeping only the parts of `context` the page uses
    pub fn new(kind: PageKind, context: SelectionContext) -> Self {
        let context = match kind {
            PageKind::Landing => SelectionContext::empty(),
            PageKind::Section => SelectionContext {
                year_range: None,
                year: None,
                ..context
            },
            PageKind::YearList => SelectionContext { year: None, ..context },
            PageKind::YearDetail => context,
        };
        Self {
            kind,
            context,
            hint: None,
        }
    }

    pub fn landing() -> Self {
        Self::new(PageKind::Landing, SelectionContext::empty())
    }

    pub fn with_hint(mut self, hint: Hint) -> Self {
        self.hint = Some(hint);
        self
    }

    /// Query string without the leading `?`; empty for the landing page
    pub fn query_string(&self) -> String {
        let mut pairs: Vec<(&str, String)> = Vec::new();
        if let Some(section) = self.context.section_id {
            pairs.push(("section", section.as_str().to_string()));
        }
        if let Some(object) = self.context.picked_object {
            pairs.push(("object", object.as_str().to_string()));
        }
        if let Some(range) = self.context.year_range {
            pairs.push(("range", range.to_string()));
        }
        if let Some(year) = self.context.year {
            pairs.push(("year", year.to_string()));
        }
        if let Some(hint) = self.hint {
            pairs.push(("hint", hint.as_str().to_string()));
        }
        pairs
            .into_iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl fmt::Display for PageUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let query = self.query_string();
        if query.is_empty() {
            f.write_str(self.kind.path())
        } else {
            write!(f, "{}?{}", self.kind.path(), query)
        }
    }
}

impl PageQuery {
    /// Validate the query for `kind` and rebuild the page URL
    ///
    /// Missing required parameters or contradictory values are
    /// `InvalidInput`; callers send the visitor back to the landing page.
    /// A year-detail URL without a range gets the tag-table range containing
    /// the year, or a single-year range when no tag covers it.
    pub fn page_url(&self, kind: PageKind, rfid: &RfidTable) -> Result<PageUrl> {
        if kind == PageKind::Landing {
            return Ok(PageUrl::landing());
        }

        let object = non_empty(&self.object)
            .map(|o| o.parse::<ObjectId>())
            .transpose()
            .map_err(|e| Error::InvalidInput(e.to_string()))?;
        let section = match non_empty(&self.section) {
            Some(s) => Some(
                s.parse::<SectionId>()
                    .map_err(|e| Error::InvalidInput(e.to_string()))?,
            ),
            None => object.map(|o| o.section()),
        };
        let section = section.ok_or_else(|| {
            Error::InvalidInput(format!("{} page requires a section", kind))
        })?;
        if let Some(object) = object {
            if object.section() != section {
                return Err(Error::InvalidInput(format!(
                    "object {} does not open section {}",
                    object, section
                )));
            }
        }

        let mut context = SelectionContext {
            picked_object: object,
            section_id: Some(section),
            year_range: None,
            year: None,
        };

        match kind {
            PageKind::Landing | PageKind::Section => {}
            PageKind::YearList => {
                // Older year-list links carried the range in `year`
                let raw = non_empty(&self.range).or_else(|| non_empty(&self.year));
                context.year_range = raw
                    .map(|r| carried_range(r, rfid))
                    .transpose()?;
            }
            PageKind::YearDetail => {
                let year = non_empty(&self.year)
                    .and_then(parse_leading_year)
                    .ok_or_else(|| Error::InvalidInput("year-detail page requires a year".into()))?;
                let range = match non_empty(&self.range) {
                    Some(r) => carried_range(r, rfid)?,
                    None => rfid
                        .range_containing(year)
                        .unwrap_or_else(|| YearRange::single(year)),
                };
                if !range.contains(year) {
                    return Err(Error::InvalidInput(format!(
                        "year {} outside range {}",
                        year, range
                    )));
                }
                context.year_range = Some(range);
                context.year = Some(year);
            }
        }

        let mut url = PageUrl::new(kind, context);
        url.hint = non_empty(&self.hint).and_then(|h| h.parse().ok());
        Ok(url)
    }
}

/// Range carried in a URL: one of the tag table's ranges, or a single year
fn carried_range(raw: &str, rfid: &RfidTable) -> Result<YearRange> {
    let range = raw
        .parse::<YearRange>()
        .map_err(|e| Error::InvalidInput(e.to_string()))?;
    if rfid.has_range(&range) || range.len() == 1 {
        Ok(range)
    } else {
        Err(Error::InvalidInput(format!(
            "range {} is not a known year range",
            range
        )))
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
