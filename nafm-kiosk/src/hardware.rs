//! Hardware line bridge
//!
//! The exhibit controller writes one command per line on a serial device:
//!
//! ```text
//! OBJECT_PICKED:NAF
//! OBJECT_REMOVED:NAF
//! YEAR_DETECTED:1962-1971:NAF
//! RFID_DETECTED:D3 2F 29 14:NAF
//! UNKNOWN_RFID:AA BB CC DD
//! ```
//!
//! plus banner and debug lines. [`parse_line`] classifies a line without
//! side effects; [`pump`] feeds a line source into the exhibit hub;
//! [`run_bridge`] keeps the serial device open for the life of the process.
//!
//! The controller talks at 9600 baud. Before each open the bridge sets the
//! device to that speed in raw mode with `stty`; when that fails (no `stty`,
//! or the path is a pipe rather than a tty) the device is read as it is.

use crate::exhibit::ExhibitHub;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info, warn};

const READY_BANNER: &str = "NAF Object Recognition System Ready";
const MONITORING_BANNER: &str = "Monitoring light sensors and RFID...";
const RESET_PREFIX: &str = "All objects removed - system reset";
const NO_OBJECT_PREFIX: &str = "NO_OBJECT";

/// Delay before reopening the device after a failure
const REOPEN_DELAY: Duration = Duration::from_secs(5);

/// Controller line speed
pub const BAUD_RATE: u32 = 9600;

/// One classified controller line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HardwareLine {
    ObjectPicked(String),
    ObjectRemoved(String),
    YearDetected { range: String, object: String },
    RfidDetected { uid: String, object: String },
    UnknownRfid(String),
    NoObject,
    Ready,
    Monitoring,
    Reset,
    /// Free text worth logging (errors, warnings, results)
    Message(String),
    /// Sensor chatter and blank lines
    Ignored,
}

/// Classify one line from the controller
pub fn parse_line(line: &str) -> HardwareLine {
    let line = line.trim();
    if line.is_empty() || line.starts_with("Sensors -") || line.starts_with("Card UID:") {
        return HardwareLine::Ignored;
    }

    let mut parts = line.split(':').map(str::trim);
    let command = parts.next().unwrap_or_default();
    let first = parts.next().unwrap_or_default().to_string();
    let second = parts.next().unwrap_or_default().to_string();

    match command {
        "OBJECT_PICKED" if !first.is_empty() => HardwareLine::ObjectPicked(first),
        "OBJECT_REMOVED" => HardwareLine::ObjectRemoved(first),
        "YEAR_DETECTED" if !first.is_empty() && !second.is_empty() => {
            HardwareLine::YearDetected {
                range: first,
                object: second,
            }
        }
        "RFID_DETECTED" if !first.is_empty() => HardwareLine::RfidDetected {
            uid: first,
            object: second,
        },
        "UNKNOWN_RFID" if !first.is_empty() => HardwareLine::UnknownRfid(first),
        "LIGHT_BRIGHT_DETECTED" => HardwareLine::Ignored,
        _ if line.starts_with(NO_OBJECT_PREFIX) => HardwareLine::NoObject,
        _ if line == READY_BANNER => HardwareLine::Ready,
        _ if line == MONITORING_BANNER => HardwareLine::Monitoring,
        _ if line.starts_with(RESET_PREFIX) => HardwareLine::Reset,
        _ => {
            let lower = line.to_ascii_lowercase();
            if ["error", "warning", "failed", "success"]
                .iter()
                .any(|k| lower.contains(k))
            {
                HardwareLine::Message(line.to_string())
            } else {
                HardwareLine::Ignored
            }
        }
    }
}

/// Carry out one controller line on the hub
pub async fn apply_line(hub: &ExhibitHub, line: HardwareLine) {
    match line {
        HardwareLine::ObjectPicked(object) => {
            if let Err(e) = hub.object_picked(&object).await {
                warn!("Ignoring pick: {}", e);
            }
        }
        HardwareLine::ObjectRemoved(_) => {
            hub.object_removed().await;
        }
        HardwareLine::YearDetected { range, object } => {
            if let Err(e) = hub.year_detected(&range, Some(&object)).await {
                warn!("Ignoring year range {} for {}: {}", range, object, e);
            }
        }
        HardwareLine::RfidDetected { uid, object } => hub.rfid_detected(&uid, &object).await,
        HardwareLine::UnknownRfid(uid) => hub.unknown_rfid(&uid).await,
        HardwareLine::NoObject => hub.no_object_detected().await,
        HardwareLine::Ready => hub.set_hardware_connected(true, "Controller ready").await,
        HardwareLine::Monitoring => info!("Controller monitoring started"),
        HardwareLine::Reset => hub.system_reset().await,
        HardwareLine::Message(text) => info!("Controller: {}", text),
        HardwareLine::Ignored => {}
    }
}

/// Feed every line from `reader` into the hub until end of input
///
/// Returns the number of lines read.
pub async fn pump<R>(reader: R, hub: &ExhibitHub) -> std::io::Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut count = 0;
    while let Some(line) = lines.next_line().await? {
        count += 1;
        debug!("Controller line: {}", line);
        apply_line(hub, parse_line(&line)).await;
    }
    Ok(count)
}

/// Keep the serial device open, reopening it after errors
pub async fn run_bridge(device: PathBuf, hub: Arc<ExhibitHub>) {
    info!("Hardware bridge reading {}", device.display());
    loop {
        configure_port(&device).await;
        match tokio::fs::File::open(&device).await {
            Ok(file) => {
                hub.set_hardware_connected(true, "Serial link open").await;
                match pump(BufReader::new(file), &hub).await {
                    Ok(count) => info!("Serial device closed after {} lines", count),
                    Err(e) => warn!("Serial read error on {}: {}", device.display(), e),
                }
                hub.set_hardware_connected(false, "Connection lost").await;
            }
            Err(e) => {
                warn!("Cannot open {}: {}", device.display(), e);
                hub.set_hardware_connected(false, "Controller not connected").await;
            }
        }
        tokio::time::sleep(REOPEN_DELAY).await;
    }
}

/// `stty` arguments putting `device` at [`BAUD_RATE`] in raw mode
pub fn stty_args(device: &Path) -> Vec<OsString> {
    vec![
        "-F".into(),
        device.into(),
        BAUD_RATE.to_string().into(),
        "raw".into(),
        "-echo".into(),
    ]
}

async fn configure_port(device: &Path) {
    match Command::new("stty").args(stty_args(device)).output().await {
        Ok(output) if output.status.success() => {
            debug!("{} set to {} baud, raw", device.display(), BAUD_RATE);
        }
        Ok(output) => warn!(
            "stty could not configure {}: {}",
            device.display(),
            String::from_utf8_lossy(&output.stderr).trim()
        ),
        Err(e) => warn!("stty unavailable, reading {} unconfigured: {}", device.display(), e),
    }
}
