//! Common error types for the kiosk

use thiserror::Error;

/// Common result type for kiosk operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy shared by the content store, the state machine and the
/// HTTP layer.
///
/// Only `ContentUnavailable` and `SectionNotFound` ever reach a visitor.
/// The remaining variants are recovered where they occur (generic content,
/// "no detection", rejected transition) and end up in the log.
#[derive(Error, Debug)]
pub enum Error {
    /// Content document could not be read or parsed
    #[error("Content unavailable: {0}")]
    ContentUnavailable(String),

    /// No section with this id in the content document
    #[error("Section not found: {0}")]
    SectionNotFound(String),

    /// No authored entry for this year
    #[error("Year entry not found: {0}")]
    YearEntryNotFound(i32),

    /// RFID tag id is not in the tag table
    #[error("Unknown tag: {0}")]
    UnknownTag(String),

    /// Exhibit object name is not one of the known objects
    #[error("Unknown object: {0}")]
    UnknownObject(String),

    /// Transition precondition not met; state is unchanged
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    /// No page is listening on the event channel
    #[error("Channel disconnected")]
    ChannelDisconnected,

    /// Malformed year range string
    #[error("Invalid year range: {0}")]
    InvalidRange(String),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Whether the error must be shown to the visitor instead of being
    /// absorbed locally.
    pub fn is_visitor_facing(&self) -> bool {
        matches!(self, Error::ContentUnavailable(_) | Error::SectionNotFound(_))
    }
}
