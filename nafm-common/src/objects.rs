//! Exhibit objects and the sections they open
//!
//! Three physical objects sit on the exhibit; lifting one opens its section.
//! The mapping is a bijection defined once here and used by every page,
//! the state machine and the hub.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Physical exhibit object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectId {
    Naf,
    Nafsfa,
    Evol,
}

/// Content section opened by an object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SectionId {
    NafHistory,
    NafsfaHistory,
    FinanceEvolution,
}

impl ObjectId {
    pub const ALL: [ObjectId; 3] = [ObjectId::Naf, ObjectId::Nafsfa, ObjectId::Evol];

    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectId::Naf => "naf",
            ObjectId::Nafsfa => "nafsfa",
            ObjectId::Evol => "evol",
        }
    }

    pub fn section(&self) -> SectionId {
        match self {
            ObjectId::Naf => SectionId::NafHistory,
            ObjectId::Nafsfa => SectionId::NafsfaHistory,
            ObjectId::Evol => SectionId::FinanceEvolution,
        }
    }

    /// Name shown in page headers
    pub fn display_name(&self) -> &'static str {
        match self {
            ObjectId::Naf => "NAF History",
            ObjectId::Nafsfa => "NAFSFA History",
            ObjectId::Evol => "Evolution of NAF Finance",
        }
    }
}

impl SectionId {
    pub const ALL: [SectionId; 3] = [
        SectionId::NafHistory,
        SectionId::NafsfaHistory,
        SectionId::FinanceEvolution,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionId::NafHistory => "naf-history",
            SectionId::NafsfaHistory => "nafsfa-history",
            SectionId::FinanceEvolution => "finance-evolution",
        }
    }

    pub fn object(&self) -> ObjectId {
        match self {
            SectionId::NafHistory => ObjectId::Naf,
            SectionId::NafsfaHistory => ObjectId::Nafsfa,
            SectionId::FinanceEvolution => ObjectId::Evol,
        }
    }

    /// Icon used when the content document does not provide one
    pub fn default_icon(&self) -> &'static str {
        match self {
            SectionId::NafHistory => "✈️",
            SectionId::NafsfaHistory => "🎖️",
            SectionId::FinanceEvolution => "💰",
        }
    }

    /// Description used when the content document does not provide one
    pub fn default_description(&self) -> &'static str {
        match self {
            SectionId::NafHistory => {
                "Explore the rich history and heritage of the Nigerian Air Force from its inception to the present day."
            }
            SectionId::NafsfaHistory => {
                "Discover the evolution and achievements of the NAF School of Finance and Accounts through the years."
            }
            SectionId::FinanceEvolution => {
                "Learn about the development and modernization of NAF finance specialty and its impact on operations."
            }
        }
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectId {
    type Err = Error;

    /// Case-insensitive; the hardware reports upper-case names
    fn from_str(s: &str) -> Result<Self> {
        let lowered = s.trim().to_ascii_lowercase();
        ObjectId::ALL
            .into_iter()
            .find(|o| o.as_str() == lowered)
            .ok_or_else(|| Error::UnknownObject(s.to_string()))
    }
}

impl FromStr for SectionId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        SectionId::ALL
            .into_iter()
            .find(|sec| sec.as_str() == trimmed)
            .ok_or_else(|| Error::SectionNotFound(s.to_string()))
    }
}
