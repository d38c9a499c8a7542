//! Bridge configuration loading from file and environment variables.

use serde::Deserialize;
use std::time::Duration;

use crate::error::BridgeError;

/// Top-level bridge configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub bridge: BridgeConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Reader and relay endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct BridgeConfig {
    /// Device to read scan lines from; `-` reads stdin. The serial line
    /// settings (baud rate, raw mode) must already be applied to the device.
    #[serde(default = "default_device")]
    pub device: String,

    /// Base URL of the relay server.
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub json: bool,
}

fn default_device() -> String {
    "-".to_string()
}

fn default_server_url() -> String {
    "http://127.0.0.1:3030".to_string()
}

fn default_timeout_secs() -> u64 {
    5
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            device: default_device(),
            server_url: default_server_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl BridgeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Loads configuration from a TOML file, falling back to defaults.
///
/// Environment variable overrides:
/// - `RFID_BRIDGE_DEVICE` overrides `bridge.device`
/// - `RFID_BRIDGE_SERVER_URL` overrides `bridge.server_url`
/// - `RFID_LOG_LEVEL` overrides `logging.level`
/// - `RFID_LOG_JSON` overrides `logging.json`
///
/// # Errors
///
/// Returns `BridgeError::Io` if the file exists but cannot be read and
/// `BridgeError::Config` if it cannot be parsed.
pub fn load_config(path: Option<&str>) -> Result<Config, BridgeError> {
    let mut config = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => {
                toml::from_str(&contents).map_err(|e| BridgeError::Config(e.to_string()))?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = p, "config file not found, using defaults");
                Config::default()
            }
            Err(e) => return Err(BridgeError::Io(e)),
        },
        None => Config::default(),
    };

    if let Ok(device) = std::env::var("RFID_BRIDGE_DEVICE") {
        config.bridge.device = device;
    }
    if let Ok(url) = std::env::var("RFID_BRIDGE_SERVER_URL") {
        config.bridge.server_url = url;
    }
    if let Ok(level) = std::env::var("RFID_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Ok(json) = std::env::var("RFID_LOG_JSON") {
        config.logging.json = json == "true" || json == "1";
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn file_values_are_applied() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[bridge]\ndevice = \"/dev/ttyACM0\"\nserver_url = \"http://relay:3030\"\ntimeout_secs = 2"
        )
        .unwrap();

        let config = load_config(file.path().to_str()).unwrap();
        assert_eq!(config.bridge.device, "/dev/ttyACM0");
        assert_eq!(config.bridge.timeout(), Duration::from_secs(2));
    }

    #[test]
    fn garbage_file_is_a_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[bridge\n").unwrap();

        assert!(matches!(
            load_config(file.path().to_str()),
            Err(BridgeError::Config(_))
        ));
    }
}
