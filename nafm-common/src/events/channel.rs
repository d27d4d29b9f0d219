//! Channel adapter
//!
//! Turns what arrives on a page's subscription into machine inputs.

use super::ChannelSignal;
use crate::navigation::TransitionInput;

/// One item read from a page's subscription
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelMessage {
    Signal(ChannelSignal),
    Connected,
    Disconnected,
    Error(String),
}

impl From<ChannelSignal> for ChannelMessage {
    fn from(signal: ChannelSignal) -> Self {
        ChannelMessage::Signal(signal)
    }
}

/// Map a channel message to the input it drives
pub fn to_input(message: ChannelMessage) -> TransitionInput {
    match message {
        ChannelMessage::Connected => TransitionInput::ChannelConnected,
        ChannelMessage::Disconnected => TransitionInput::ChannelDisconnected,
        ChannelMessage::Error(message) => TransitionInput::ChannelError { message },
        ChannelMessage::Signal(signal) => match signal {
            ChannelSignal::ObjectPicked { object } => TransitionInput::ObjectPicked { object },
            ChannelSignal::ObjectDropped { .. } | ChannelSignal::SystemReset { .. } => {
                TransitionInput::ObjectDropped
            }
            ChannelSignal::NoObjectDetected { message } => {
                TransitionInput::NoObjectDetected { message }
            }
            ChannelSignal::RfidDetected { uid, object } => TransitionInput::TagDetected {
                uid,
                object: Some(object).filter(|o| !o.trim().is_empty()),
            },
            ChannelSignal::UnknownRfid { uid, .. } => TransitionInput::UnknownTag { uid },
            ChannelSignal::YearDropped { year, object } => TransitionInput::YearDropped {
                range: year,
                object,
            },
            ChannelSignal::ReturnToSection { object, .. } => TransitionInput::RangeNotDetected {
                object: Some(object).filter(|o| !o.trim().is_empty()),
            },
            ChannelSignal::SimulationStatus(status) => TransitionInput::StatusSynced(status),
            ChannelSignal::HardwareStatus { connected, .. } => {
                TransitionInput::HardwareStatus { connected }
            }
        },
    }
}
