//! # NAF Museum Kiosk Common Library
//!
//! Shared code for the kiosk service and its tests:
//! - Year ranges and the RFID tag table
//! - Exhibit object ⇄ section mapping
//! - Content store (loading, normalisation, lookups, generic fallback)
//! - Navigation state machine and URL state codec
//! - Channel signals, event bus and the channel adapter
//! - Configuration loading

pub mod config;
pub mod content;
pub mod error;
pub mod events;
pub mod navigation;
pub mod objects;
pub mod rfid;
pub mod year_range;

pub use error::{Error, Result};
pub use objects::{ObjectId, SectionId};
pub use rfid::RfidTable;
pub use year_range::YearRange;
