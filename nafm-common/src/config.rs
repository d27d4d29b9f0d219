//! Configuration loading
//!
//! Every setting resolves in the same order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default
//!
//! A missing config file is not an error; the kiosk runs on defaults.

use crate::rfid::TagMapping;
use crate::{Error, Result, RfidTable};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5550";
pub const DEFAULT_CONTENT_PATH: &str = "data.json";
pub const DEFAULT_EVENT_CAPACITY: usize = 100;
pub const DEFAULT_LOG_FILTER: &str = "nafm_kiosk=info,nafm_common=info,tower_http=info";

pub const ENV_CONFIG: &str = "NAFM_CONFIG";
pub const ENV_BIND: &str = "NAFM_BIND";
pub const ENV_CONTENT: &str = "NAFM_CONTENT";
pub const ENV_ASSETS: &str = "NAFM_ASSETS";
pub const ENV_SERIAL_PORT: &str = "SERIAL_PORT";

/// Settings as written in the TOML file; every field is optional
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Listen address, e.g. `0.0.0.0:5550`
    #[serde(default)]
    pub bind_addr: Option<String>,

    /// Content document (JSON)
    #[serde(default)]
    pub content_path: Option<PathBuf>,

    /// Directory served under `/assets` (logos, images)
    #[serde(default)]
    pub assets_dir: Option<PathBuf>,

    /// Serial device carrying the hardware line protocol
    #[serde(default)]
    pub serial_port: Option<String>,

    /// Signals buffered per open page
    #[serde(default)]
    pub event_capacity: Option<usize>,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub rfid: RfidConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directives; `RUST_LOG` takes precedence
    #[serde(default = "default_log_filter")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_filter(),
        }
    }
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

/// `[[rfid.tags]]` entries replacing the built-in tag table
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RfidConfig {
    #[serde(default)]
    pub tags: Vec<TagMapping>,
}

impl TomlConfig {
    /// Parse a config file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::Config(e.to_string()))
    }

    /// Tag table from `[[rfid.tags]]`, or the built-in table when none are given
    pub fn rfid_table(&self) -> Result<RfidTable> {
        if self.rfid.tags.is_empty() {
            Ok(RfidTable::canonical())
        } else {
            RfidTable::from_mappings(self.rfid.tags.clone())
        }
    }
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_file: Option<PathBuf>,
    pub bind_addr: Option<String>,
    pub content_path: Option<PathBuf>,
    pub assets_dir: Option<PathBuf>,
    pub serial_port: Option<String>,
}

/// Fully resolved kiosk configuration
#[derive(Debug, Clone)]
pub struct KioskConfig {
    pub bind_addr: SocketAddr,
    pub content_path: PathBuf,
    pub assets_dir: Option<PathBuf>,
    pub serial_port: Option<String>,
    pub event_capacity: usize,
    pub log_filter: String,
    pub rfid: RfidTable,
    /// File the settings came from, if any
    pub source: Option<PathBuf>,
}

impl Default for KioskConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 5550)),
            content_path: PathBuf::from(DEFAULT_CONTENT_PATH),
            assets_dir: None,
            serial_port: None,
            event_capacity: DEFAULT_EVENT_CAPACITY,
            log_filter: default_log_filter(),
            rfid: RfidTable::canonical(),
            source: None,
        }
    }
}

impl KioskConfig {
    /// Locate and read the config file, then resolve every setting
    pub fn load(overrides: &ConfigOverrides) -> Result<Self> {
        let source = locate_config_file(overrides.config_file.as_deref())?;
        let file = match &source {
            Some(path) => {
                info!("Loading config from {}", path.display());
                TomlConfig::load(path)?
            }
            None => {
                warn!("No config file found, using defaults");
                TomlConfig::default()
            }
        };
        let mut config = Self::resolve(overrides, &file)?;
        config.source = source;
        Ok(config)
    }

    /// Apply the priority order to each setting
    pub fn resolve(overrides: &ConfigOverrides, file: &TomlConfig) -> Result<Self> {
        let bind = resolve_setting(
            overrides.bind_addr.as_deref(),
            ENV_BIND,
            file.bind_addr.as_deref(),
        )
        .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind
            .parse::<SocketAddr>()
            .map_err(|e| Error::Config(format!("bind address '{}': {}", bind, e)))?;

        let content_path = resolve_setting(
            overrides.content_path.as_deref().and_then(Path::to_str),
            ENV_CONTENT,
            file.content_path.as_deref().and_then(Path::to_str),
        )
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONTENT_PATH));

        let assets_dir = resolve_setting(
            overrides.assets_dir.as_deref().and_then(Path::to_str),
            ENV_ASSETS,
            file.assets_dir.as_deref().and_then(Path::to_str),
        )
        .map(PathBuf::from);

        let serial_port = resolve_setting(
            overrides.serial_port.as_deref(),
            ENV_SERIAL_PORT,
            file.serial_port.as_deref(),
        );

        let event_capacity = file.event_capacity.unwrap_or(DEFAULT_EVENT_CAPACITY);
        if event_capacity == 0 {
            return Err(Error::Config("event_capacity must be at least 1".into()));
        }

        Ok(Self {
            bind_addr,
            content_path,
            assets_dir,
            serial_port,
            event_capacity,
            log_filter: file.logging.level.clone(),
            rfid: file.rfid_table()?,
            source: None,
        })
    }
}

/// CLI value, then environment variable, then config file value
///
/// Empty values count as unset.
pub fn resolve_setting(cli_arg: Option<&str>, env_var_name: &str, file_value: Option<&str>) -> Option<String> {
    if let Some(value) = cli_arg.filter(|v| !v.trim().is_empty()) {
        return Some(value.to_string());
    }

    if let Ok(value) = std::env::var(env_var_name) {
        if !value.trim().is_empty() {
            return Some(value);
        }
    }

    file_value
        .filter(|v| !v.trim().is_empty())
        .map(str::to_string)
}

/// Find the config file to read
///
/// An explicit path (argument or `NAFM_CONFIG`) must exist. Otherwise the
/// user config directory is tried, then `/etc/nafm/config.toml`.
pub fn locate_config_file(cli_arg: Option<&Path>) -> Result<Option<PathBuf>> {
    let explicit = cli_arg
        .map(Path::to_path_buf)
        .or_else(|| std::env::var(ENV_CONFIG).ok().filter(|v| !v.is_empty()).map(PathBuf::from));
    if let Some(path) = explicit {
        if path.exists() {
            return Ok(Some(path));
        }
        return Err(Error::Config(format!("Config file not found: {}", path.display())));
    }

    let user_config = dirs::config_dir().map(|d| d.join("nafm").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Ok(Some(path));
        }
    }

    let system_config = PathBuf::from("/etc/nafm/config.toml");
    if system_config.exists() {
        return Ok(Some(system_config));
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let file = TomlConfig::from_toml_str("").unwrap();
        assert!(file.bind_addr.is_none());
        assert_eq!(file.logging.level, DEFAULT_LOG_FILTER);
        assert_eq!(file.rfid_table().unwrap(), RfidTable::canonical());
    }

    #[test]
    fn test_rfid_overrides_parsed() {
        let file = TomlConfig::from_toml_str(
            r#"
            [[rfid.tags]]
            uid = "aa bb cc dd"
            range = "1900-1909"

            [[rfid.tags]]
            uid = "11 22 33 44"
            range = "1910-1919"
            "#,
        )
        .unwrap();
        let table = file.rfid_table().unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.resolve("AA BB CC DD"), Some("1900-1909".parse().unwrap()));
    }

    #[test]
    fn test_overlapping_rfid_overrides_rejected() {
        let file = TomlConfig::from_toml_str(
            r#"
            [[rfid.tags]]
            uid = "AA"
            range = "1900-1910"

            [[rfid.tags]]
            uid = "BB"
            range = "1910-1919"
            "#,
        )
        .unwrap();
        assert!(matches!(file.rfid_table(), Err(Error::Config(_))));
    }

    #[test]
    fn test_inverted_range_fails_to_parse() {
        let result = TomlConfig::from_toml_str(
            r#"
            [[rfid.tags]]
            uid = "AA"
            range = "1919-1910"
            "#,
        );
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let file = TomlConfig::from_toml_str("event_capacity = 0").unwrap();
        let result = KioskConfig::resolve(&ConfigOverrides::default(), &file);
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
