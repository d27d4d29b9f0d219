//! Content store
//!
//! The exhibit's content is one JSON document: `{ "sections": [...] }`.
//! Sections come in two shapes, a flat `years` list or a `year-ranges`
//! list of `{ "<start-end>": [entries] }` partitions. Both are normalised
//! at load time into [`Section`] → [`Partition`] → [`YearEntry`], so every
//! lookup below has a single code path.

mod document;
mod store;

pub use document::{RawDocument, RawHighlight, RawSection, RawYearEntry, YearLabel};
pub use store::{ContentStore, Highlight, Partition, Section, SectionStats, YearEntry};
