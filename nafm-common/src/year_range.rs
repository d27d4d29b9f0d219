//! Inclusive year intervals
//!
//! A `YearRange` is what one physical "year range" object on the exhibit
//! stands for. Its canonical text form is `"start-end"`, which is also the
//! form carried in URLs, channel payloads and content-document keys.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed interval `[start, end]` of years, `start <= end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct YearRange {
    start: i32,
    end: i32,
}

impl YearRange {
    /// Create a range, rejecting `start > end`
    pub fn new(start: i32, end: i32) -> Result<Self> {
        if start > end {
            return Err(Error::InvalidRange(format!("{}-{}", start, end)));
        }
        Ok(Self { start, end })
    }

    /// Range from bounds already known to be ordered
    pub(crate) const fn from_ordered(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    /// Single-year range
    pub fn single(year: i32) -> Self {
        Self { start: year, end: year }
    }

    pub fn start(&self) -> i32 {
        self.start
    }

    pub fn end(&self) -> i32 {
        self.end
    }

    pub fn contains(&self, year: i32) -> bool {
        year >= self.start && year <= self.end
    }

    /// Number of years in the range (always >= 1)
    pub fn len(&self) -> usize {
        (i64::from(self.end) - i64::from(self.start)) as usize + 1
    }

    /// A range is never empty; provided for clippy's `len_without_is_empty`
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Every year of the range in ascending order
    pub fn years(&self) -> impl Iterator<Item = i32> {
        self.start..=self.end
    }

    pub fn overlaps(&self, other: &YearRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Year before `year`, if both lie in the range
    pub fn previous(&self, year: i32) -> Option<i32> {
        if !self.contains(year) {
            return None;
        }
        year.checked_sub(1).filter(|y| self.contains(*y))
    }

    /// Year after `year`, if both lie in the range
    pub fn next(&self, year: i32) -> Option<i32> {
        if !self.contains(year) {
            return None;
        }
        year.checked_add(1).filter(|y| self.contains(*y))
    }
}

impl fmt::Display for YearRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

impl FromStr for YearRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let (start, end) = trimmed
            .split_once('-')
            .ok_or_else(|| Error::InvalidRange(s.to_string()))?;
        let start = start
            .trim()
            .parse::<i32>()
            .map_err(|_| Error::InvalidRange(s.to_string()))?;
        let end = end
            .trim()
            .parse::<i32>()
            .map_err(|_| Error::InvalidRange(s.to_string()))?;
        YearRange::new(start, end)
    }
}

impl TryFrom<String> for YearRange {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<YearRange> for String {
    fn from(range: YearRange) -> Self {
        range.to_string()
    }
}

/// Leading integer of a year label
///
/// Content labels are usually a plain year (`"1975"`) but occasionally a
/// sub-range (`"1975-1977"`); both resolve to their first year.
pub fn parse_leading_year(label: &str) -> Option<i32> {
    let trimmed = label.trim();
    let digits: String = trimmed.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}
