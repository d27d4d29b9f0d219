//! Transition inputs and effects

use super::url::PageUrl;
use crate::events::{OutboundSignal, StatusSnapshot};
use crate::Error;

/// Everything that can drive the state machine
///
/// Channel-originated identifiers stay as received; the machine decides
/// whether they are known.
#[derive(Debug, Clone, PartialEq)]
pub enum TransitionInput {
    /// Object lifted off its stand (or chosen on the landing page)
    ObjectPicked { object: String },
    /// Object returned; resets the selection
    ObjectDropped,
    /// RFID reader saw a tag
    TagDetected { uid: String, object: Option<String> },
    /// Hub confirmed a year range for an object
    YearDropped { range: String, object: String },
    /// Hub could not recognise the range object
    RangeNotDetected { object: Option<String> },
    /// Visitor chose a year card on the year list
    YearCardClicked { year: i32 },
    /// Previous year on the detail page
    PreviousYear,
    /// Next year on the detail page
    NextYear,
    /// Reply to a status pull
    StatusSynced(StatusSnapshot),
    /// Informational: sensors report no object
    NoObjectDetected { message: String },
    /// Informational: the hardware saw an unregistered tag
    UnknownTag { uid: String },
    /// Informational: hardware link status
    HardwareStatus { connected: bool },
    ChannelConnected,
    ChannelDisconnected,
    ChannelError { message: String },
}

impl TransitionInput {
    /// Interactions made on the page itself (as opposed to channel pushes)
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            TransitionInput::YearCardClicked { .. }
                | TransitionInput::PreviousYear
                | TransitionInput::NextYear
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            TransitionInput::ObjectPicked { .. } => "object-pick",
            TransitionInput::ObjectDropped => "object-drop",
            TransitionInput::TagDetected { .. } => "tag-detected",
            TransitionInput::YearDropped { .. } => "year-range-drop",
            TransitionInput::RangeNotDetected { .. } => "range-not-detected",
            TransitionInput::YearCardClicked { .. } => "year-card-click",
            TransitionInput::PreviousYear => "previous-year",
            TransitionInput::NextYear => "next-year",
            TransitionInput::StatusSynced(_) => "status-synced",
            TransitionInput::NoObjectDetected { .. } => "no-object-detected",
            TransitionInput::UnknownTag { .. } => "unknown-tag",
            TransitionInput::HardwareStatus { .. } => "hardware-status",
            TransitionInput::ChannelConnected => "channel-connected",
            TransitionInput::ChannelDisconnected => "channel-disconnected",
            TransitionInput::ChannelError { .. } => "channel-error",
        }
    }
}

/// Side effect requested by a transition, carried out by the caller
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Full page navigation; the current page's subscription ends
    Navigate(PageUrl),
    /// Same page, new data: re-render in place
    Render,
    /// Transient message for the visitor
    Feedback(String),
    /// Message for the hub
    Emit(OutboundSignal),
    /// Connection indicator changed
    ConnectionStatus(bool),
}

/// How an input was handled
#[derive(Debug)]
pub enum Outcome {
    Accepted,
    /// Held until the channel reconnects
    Deferred,
    /// Precondition unmet; state unchanged, no effects
    Rejected(Error),
}

/// Result of [`super::NavigationMachine::apply`]
#[derive(Debug)]
pub struct Transition {
    pub outcome: Outcome,
    pub effects: Vec<Effect>,
}

impl Transition {
    pub fn accepted(effects: Vec<Effect>) -> Self {
        Self {
            outcome: Outcome::Accepted,
            effects,
        }
    }

    pub fn rejected(error: Error) -> Self {
        Self {
            outcome: Outcome::Rejected(error),
            effects: Vec::new(),
        }
    }

    pub fn deferred() -> Self {
        Self {
            outcome: Outcome::Deferred,
            effects: Vec::new(),
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self.outcome, Outcome::Accepted)
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self.outcome, Outcome::Rejected(_))
    }

    /// Navigation target, if the transition leaves the page
    pub fn navigation(&self) -> Option<&PageUrl> {
        self.effects.iter().find_map(|e| match e {
            Effect::Navigate(url) => Some(url),
            _ => None,
        })
    }
}
