//! RFID tag → year range resolution
//!
//! Each year-range object on the exhibit carries an RFID tag. The reader
//! reports the tag's UID as hex byte groups (`"D3 2F 29 14"`); this module
//! maps that UID to the range the object stands for.
//!
//! The table is configuration data. [`RfidTable::canonical`] is the table
//! shipped with the exhibit; deployments override it from the config file
//! once the physical tag labels have been checked.

use crate::{Error, Result, YearRange};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Canonical tag table: seven decade ranges from 1962 to 2031
const CANONICAL_TAGS: [(&str, i32, i32); 7] = [
    ("D3 2F 29 14", 1962, 1971),
    ("33 18 E3 13", 1972, 1981),
    ("D3 AB 07 2D", 1982, 1991),
    ("CA D3 42 00", 1992, 2001),
    ("D3 4F E6 0C", 2002, 2011),
    ("53 AA DB 13", 2012, 2021),
    ("D3 21 39 DD", 2022, 2031),
];

/// One row of the tag table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagMapping {
    pub uid: String,
    pub range: YearRange,
}

/// Summary of the loaded table, exposed for diagnostics
#[derive(Debug, Clone, Serialize)]
pub struct RfidTableInfo {
    pub count: usize,
    pub mappings: Vec<TagMapping>,
    pub year_ranges: Vec<YearRange>,
    pub uids: Vec<String>,
}

/// Fixed lookup table from normalised tag UID to year range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RfidTable {
    entries: Vec<TagMapping>,
}

/// Uppercase, trim and collapse internal whitespace runs to one space
pub fn normalize_uid(uid: &str) -> String {
    uid.split_whitespace()
        .map(|group| group.to_ascii_uppercase())
        .collect::<Vec<_>>()
        .join(" ")
}

impl RfidTable {
    /// The table shipped with the exhibit
    pub fn canonical() -> Self {
        let entries = CANONICAL_TAGS
            .iter()
            .map(|(uid, start, end)| TagMapping {
                uid: (*uid).to_string(),
                range: YearRange::from_ordered(*start, *end),
            })
            .collect();
        Self { entries }
    }

    /// Build a table from configured mappings
    ///
    /// UIDs must be unique after normalisation and ranges pairwise disjoint,
    /// otherwise a single tag could resolve ambiguously.
    pub fn from_mappings(mappings: Vec<TagMapping>) -> Result<Self> {
        if mappings.is_empty() {
            return Err(Error::Config("RFID table must not be empty".to_string()));
        }

        let mut seen = HashSet::new();
        let mut entries: Vec<TagMapping> = Vec::with_capacity(mappings.len());
        for mapping in mappings {
            let uid = normalize_uid(&mapping.uid);
            if uid.is_empty() {
                return Err(Error::Config("RFID tag with empty uid".to_string()));
            }
            if !seen.insert(uid.clone()) {
                return Err(Error::Config(format!("Duplicate RFID uid: {}", uid)));
            }
            if let Some(clash) = entries.iter().find(|e| e.range.overlaps(&mapping.range)) {
                return Err(Error::Config(format!(
                    "RFID ranges overlap: {} ({}) and {} ({})",
                    clash.uid, clash.range, uid, mapping.range
                )));
            }
            entries.push(TagMapping {
                uid,
                range: mapping.range,
            });
        }

        Ok(Self { entries })
    }

    /// Resolve a tag UID to its year range
    ///
    /// `None` means "no detection", not a failure.
    pub fn resolve(&self, uid: &str) -> Option<YearRange> {
        let normalized = normalize_uid(uid);
        self.entries
            .iter()
            .find(|e| e.uid == normalized)
            .map(|e| e.range)
    }

    /// Like [`RfidTable::resolve`] but reports the miss as `UnknownTag`
    pub fn resolve_known(&self, uid: &str) -> Result<YearRange> {
        self.resolve(uid)
            .ok_or_else(|| Error::UnknownTag(uid.to_string()))
    }

    pub fn is_known(&self, uid: &str) -> bool {
        self.resolve(uid).is_some()
    }

    /// All ranges in table order
    pub fn ranges(&self) -> Vec<YearRange> {
        self.entries.iter().map(|e| e.range).collect()
    }

    /// All (normalised) UIDs in table order
    pub fn uids(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.uid.clone()).collect()
    }

    /// Whether `range` is exactly one of the table's ranges
    pub fn has_range(&self, range: &YearRange) -> bool {
        self.entries.iter().any(|e| e.range == *range)
    }

    /// The table range containing `year`, if any
    pub fn range_containing(&self, year: i32) -> Option<YearRange> {
        self.entries
            .iter()
            .map(|e| e.range)
            .find(|r| r.contains(year))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn info(&self) -> RfidTableInfo {
        RfidTableInfo {
            count: self.entries.len(),
            mappings: self.entries.clone(),
            year_ranges: self.ranges(),
            uids: self.uids(),
        }
    }
}

impl Default for RfidTable {
    fn default() -> Self {
        Self::canonical()
    }
}
