//! Event channel types
//!
//! Provides the named signals exchanged with the exhibit hub and the
//! EventBus that distributes them to every open page.

mod channel;

pub use channel::{to_input, ChannelMessage};

use crate::{Error, ObjectId, YearRange};
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;

/// Signals pushed by the exhibit hub
///
/// Payloads keep the hub's wire shapes; identifiers that originate in
/// hardware (`object`, `uid`, `year`) stay strings here and are validated
/// by the state machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ChannelSignal {
    /// Visitor lifted an object off its stand
    ObjectPicked { object: String },

    /// Object put back; every page returns to landing
    ObjectDropped { message: String },

    /// Sensors see no object; informational
    NoObjectDetected { message: String },

    /// Reader saw a tag; the page resolves it to a range
    RfidDetected { uid: String, object: String },

    /// Reader saw a tag the hardware does not know
    UnknownRfid { uid: String, message: String },

    /// Year range accepted for the picked object
    YearDropped { year: String, object: String },

    /// Range object was not recognised; year list goes back to the section
    ReturnToSection { object: String, message: String },

    /// Reply to a `get_status` pull
    SimulationStatus(StatusSnapshot),

    /// Hub state cleared
    SystemReset { message: String },

    /// Hardware link came up or went down
    HardwareStatus { connected: bool, message: String },
}

impl ChannelSignal {
    /// Signal name used as the SSE event field
    pub fn name(&self) -> &'static str {
        match self {
            ChannelSignal::ObjectPicked { .. } => "object_picked",
            ChannelSignal::ObjectDropped { .. } => "object_dropped",
            ChannelSignal::NoObjectDetected { .. } => "no_object_detected",
            ChannelSignal::RfidDetected { .. } => "rfid_detected",
            ChannelSignal::UnknownRfid { .. } => "unknown_rfid",
            ChannelSignal::YearDropped { .. } => "year_dropped",
            ChannelSignal::ReturnToSection { .. } => "return_to_section",
            ChannelSignal::SimulationStatus(_) => "simulation_status",
            ChannelSignal::SystemReset { .. } => "system_reset",
            ChannelSignal::HardwareStatus { .. } => "hardware_status",
        }
    }
}

/// Messages a page sends back to the hub
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum OutboundSignal {
    /// A detected tag resolved to a range on the page side
    ResolveYearFromRfid {
        uid: String,
        year_range: YearRange,
        object: String,
    },

    /// Pull the hub's current status
    GetStatus,
}

/// Hub-level view of where the visitor is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HubState {
    Main,
    Section,
    YearList,
}

impl fmt::Display for HubState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HubState::Main => "main",
            HubState::Section => "section",
            HubState::YearList => "year-list",
        };
        f.write_str(s)
    }
}

/// Status snapshot answering a `get_status` pull
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub picked_object: Option<ObjectId>,
    pub dropped_year: Option<YearRange>,
    pub current_state: HubState,
    pub hardware_connected: bool,
    pub available_objects: Vec<ObjectId>,
    pub available_years: Vec<YearRange>,
}

/// Distribution bus for channel signals
///
/// Wraps a tokio broadcast channel:
/// - Non-blocking publish (slow subscribers don't block the hub)
/// - One receiver per open page
/// - Lagged receivers are detected and treated as a channel drop
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<ChannelSignal>,
    capacity: usize,
}

impl EventBus {
    /// Create a bus buffering up to `capacity` signals per subscriber
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future signals
    pub fn subscribe(&self) -> broadcast::Receiver<ChannelSignal> {
        self.tx.subscribe()
    }

    /// Publish a signal
    ///
    /// Returns the number of pages reached, or `ChannelDisconnected` when
    /// no page is listening.
    pub fn emit(&self, signal: ChannelSignal) -> crate::Result<usize> {
        self.tx.send(signal).map_err(|_| Error::ChannelDisconnected)
    }

    /// Publish a signal, ignoring whether anyone is listening
    pub fn emit_lossy(&self, signal: ChannelSignal) {
        let _ = self.tx.send(signal);
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
