//! Exhibit hub
//!
//! Holds what the exhibit hardware has reported (picked object, dropped
//! range, hub-level page, hardware link) and publishes a channel signal on
//! the bus for every change. Hardware lines, simulation requests and page
//! sessions all go through the same operations.

use nafm_common::events::{ChannelSignal, EventBus, HubState, OutboundSignal, StatusSnapshot};
use nafm_common::{Error, ObjectId, Result, RfidTable, YearRange};
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy)]
struct HubStatus {
    picked_object: Option<ObjectId>,
    dropped_year: Option<YearRange>,
    current_state: HubState,
    hardware_connected: bool,
}

impl HubStatus {
    fn idle() -> Self {
        Self {
            picked_object: None,
            dropped_year: None,
            current_state: HubState::Main,
            hardware_connected: false,
        }
    }
}

/// Shared exhibit state plus the bus every page subscribes to
///
/// Every operation holds the status lock until its signal is published, so
/// pages see signals in the order the state changed.
pub struct ExhibitHub {
    status: RwLock<HubStatus>,
    bus: EventBus,
    rfid: Arc<RfidTable>,
}

impl ExhibitHub {
    pub fn new(bus: EventBus, rfid: Arc<RfidTable>) -> Self {
        Self {
            status: RwLock::new(HubStatus::idle()),
            bus,
            rfid,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChannelSignal> {
        self.bus.subscribe()
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn rfid(&self) -> &Arc<RfidTable> {
        &self.rfid
    }

    fn publish(&self, signal: ChannelSignal) {
        debug!(
            "Publishing {} to {} page(s)",
            signal.name(),
            self.bus.subscriber_count()
        );
        self.bus.emit_lossy(signal);
    }

    /// Object lifted off its stand; clears any earlier range
    pub async fn object_picked(&self, object: &str) -> Result<ObjectId> {
        let object = object.parse::<ObjectId>()?;
        let mut status = self.status.write().await;
        status.picked_object = Some(object);
        status.dropped_year = None;
        status.current_state = HubState::Section;
        info!("Object '{}' picked", object);
        self.publish(ChannelSignal::ObjectPicked {
            object: object.as_str().to_string(),
        });
        Ok(object)
    }

    /// Object put back; returns the object that was picked, if any
    pub async fn object_removed(&self) -> Option<ObjectId> {
        let mut status = self.status.write().await;
        let removed = status.picked_object.take();
        status.dropped_year = None;
        status.current_state = HubState::Main;
        info!(
            "Object {} removed, returning to main page",
            removed.map(|o| o.as_str()).unwrap_or("(none)")
        );
        self.publish(ChannelSignal::ObjectDropped {
            message: "Object removed, returning to main page".to_string(),
        });
        removed
    }

    /// A year range object was placed for `object`
    ///
    /// `object` defaults to the picked one. The range must be one of the tag
    /// table's ranges and the object must be the picked object. An
    /// unrecognised range sends the year list back to its section.
    pub async fn year_detected(&self, range: &str, object: Option<&str>) -> Result<YearRange> {
        // Check and update under one guard so a removal cannot slip between them
        let mut status = self.status.write().await;
        let Some(picked) = status.picked_object else {
            return Err(Error::InvalidTransition(
                "No object picked - pick an object first".to_string(),
            ));
        };

        if let Some(raw) = object {
            let object = raw.parse::<ObjectId>()?;
            if object != picked {
                return Err(Error::InvalidTransition(format!(
                    "range placed for '{}' while '{}' is picked",
                    object, picked
                )));
            }
        }

        let range = match range.parse::<YearRange>() {
            Ok(r) if self.rfid.has_range(&r) => r,
            Ok(r) => {
                self.return_to_section(picked);
                return Err(Error::InvalidRange(r.to_string()));
            }
            Err(e) => {
                self.return_to_section(picked);
                return Err(e);
            }
        };

        status.dropped_year = Some(range);
        status.current_state = HubState::YearList;
        info!("Year range {} detected for '{}'", range, picked);
        self.publish(ChannelSignal::YearDropped {
            year: range.to_string(),
            object: picked.as_str().to_string(),
        });
        Ok(range)
    }

    fn return_to_section(&self, picked: ObjectId) {
        warn!("Year range not recognised for '{}'", picked);
        self.publish(ChannelSignal::ReturnToSection {
            object: picked.as_str().to_string(),
            message: "Year range not recognised".to_string(),
        });
    }

    /// A page resolved a tag to a range on its side
    pub async fn resolve_year(
        &self,
        uid: &str,
        year_range: YearRange,
        object: &str,
    ) -> Result<YearRange> {
        match self.rfid.resolve(uid) {
            Some(r) if r == year_range => {}
            Some(r) => {
                return Err(Error::InvalidInput(format!(
                    "tag {} maps to {}, not {}",
                    uid, r, year_range
                )))
            }
            None => return Err(Error::UnknownTag(uid.to_string())),
        }
        self.year_detected(&year_range.to_string(), Some(object)).await
    }

    /// Reader saw a tag; pages resolve it themselves
    pub async fn rfid_detected(&self, uid: &str, object: &str) {
        debug!("RFID {} detected for '{}'", uid, object);
        self.publish(ChannelSignal::RfidDetected {
            uid: uid.to_string(),
            object: object.to_ascii_lowercase(),
        });
    }

    pub async fn unknown_rfid(&self, uid: &str) {
        warn!("Unknown RFID card detected: {}", uid);
        self.publish(ChannelSignal::UnknownRfid {
            uid: uid.to_string(),
            message: "Unknown RFID card detected".to_string(),
        });
    }

    /// Sensors report nothing on any stand
    pub async fn no_object_detected(&self) {
        self.publish(ChannelSignal::NoObjectDetected {
            message: "No object detected".to_string(),
        });
    }

    /// Hardware cleared everything
    pub async fn system_reset(&self) {
        let mut status = self.status.write().await;
        status.picked_object = None;
        status.dropped_year = None;
        status.current_state = HubState::Main;
        info!("System reset");
        self.publish(ChannelSignal::SystemReset {
            message: "System reset complete".to_string(),
        });
    }

    /// Hardware link came up or went down
    pub async fn set_hardware_connected(&self, connected: bool, message: &str) {
        let mut status = self.status.write().await;
        if status.hardware_connected != connected {
            status.hardware_connected = connected;
            info!("Hardware {}: {}", if connected { "connected" } else { "disconnected" }, message);
            self.publish(ChannelSignal::HardwareStatus {
                connected,
                message: message.to_string(),
            });
        }
    }

    pub async fn status(&self) -> StatusSnapshot {
        let status = *self.status.read().await;
        StatusSnapshot {
            picked_object: status.picked_object,
            dropped_year: status.dropped_year,
            current_state: status.current_state,
            hardware_connected: status.hardware_connected,
            available_objects: ObjectId::ALL.to_vec(),
            available_years: self.rfid.ranges(),
        }
    }

    /// Deliver a message from a page; `get_status` is answered directly
    pub async fn handle_outbound(&self, signal: OutboundSignal) -> Option<StatusSnapshot> {
        match signal {
            OutboundSignal::ResolveYearFromRfid {
                uid,
                year_range,
                object,
            } => {
                if let Err(e) = self.resolve_year(&uid, year_range, &object).await {
                    warn!("Tag {} not applied: {}", uid, e);
                }
                None
            }
            OutboundSignal::GetStatus => Some(self.status().await),
        }
    }
}
