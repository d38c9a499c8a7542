//! Server configuration loading from file and environment variables.

use rfid_core::{DEFAULT_CAPACITY, DEFAULT_DENYLISTED_TAG};
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use thiserror::Error;

/// Top-level server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server network settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Scan history settings.
    #[serde(default)]
    pub history: HistoryConfig,

    /// Tag validation settings.
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Viewer page settings.
    #[serde(default)]
    pub static_files: StaticFilesConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Network configuration for the HTTP server.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to. Defaults to all interfaces so the reader
    /// can reach the ingestion endpoint over the network.
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Bounded history configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryConfig {
    /// Number of most recent scans retained and broadcast.
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

/// Denylist configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ValidationConfig {
    /// Tag codes that are always classified `BAD`. Exact match.
    #[serde(default = "default_denylist")]
    pub denylist: Vec<String>,
}

/// Static file configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StaticFilesConfig {
    /// Directory served as the fallback for unmatched routes.
    #[serde(default = "default_static_dir")]
    pub dir: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "rfid_server=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    3030
}

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

fn default_denylist() -> Vec<String> {
    vec![DEFAULT_DENYLISTED_TAG.to_string()]
}

fn default_static_dir() -> String {
    "public".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            denylist: default_denylist(),
        }
    }
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            dir: default_static_dir(),
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

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// A setting parsed but holds an unusable value.
    #[error("invalid config value for {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

impl Config {
    /// Checks values that parse fine but cannot be used.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` for a zero history capacity.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history.capacity == 0 {
            return Err(ConfigError::Invalid {
                field: "history.capacity",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Loads configuration from a TOML file, falling back to defaults.
///
/// Environment variable overrides:
/// - `RFID_HOST` overrides `server.host`
/// - `RFID_PORT` overrides `server.port`
/// - `RFID_HISTORY_CAPACITY` overrides `history.capacity`
/// - `RFID_DENYLIST` overrides `validation.denylist` (comma separated)
/// - `RFID_STATIC_DIR` overrides `static_files.dir`
/// - `RFID_LOG_LEVEL` overrides `logging.level`
/// - `RFID_LOG_JSON` overrides `logging.json` (set to "true" to enable)
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed,
/// or if the resulting configuration is invalid.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    load_config_with_env(path, |key| std::env::var(key).ok())
}

/// Like [`load_config`], reading overrides through `env` instead of the
/// process environment.
///
/// # Errors
///
/// See [`load_config`].
pub fn load_config_with_env<F>(path: Option<&str>, env: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = p, "config file not found, using defaults");
                Config::default()
            }
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => Config::default(),
    };

    if let Some(host) = env("RFID_HOST") {
        if let Ok(parsed) = host.parse() {
            config.server.host = parsed;
        }
    }
    if let Some(port) = env("RFID_PORT") {
        if let Ok(parsed) = port.parse() {
            config.server.port = parsed;
        }
    }
    if let Some(capacity) = env("RFID_HISTORY_CAPACITY") {
        config.history.capacity = capacity.parse().map_err(|_| ConfigError::Invalid {
            field: "RFID_HISTORY_CAPACITY",
            reason: format!("not a non-negative integer: {capacity:?}"),
        })?;
    }
    if let Some(denylist) = env("RFID_DENYLIST") {
        config.validation.denylist = denylist
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect();
    }
    if let Some(dir) = env("RFID_STATIC_DIR") {
        config.static_files.dir = dir;
    }
    if let Some(level) = env("RFID_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(json) = env("RFID_LOG_JSON") {
        config.logging.json = json == "true" || json == "1";
    }

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn defaults_match_reference_deployment() {
        let config = load_config_with_env(None, no_env).unwrap();
        assert_eq!(config.server.host, IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        assert_eq!(config.server.port, 3030);
        assert_eq!(config.history.capacity, 10);
        assert_eq!(config.validation.denylist, vec!["84DBBD5A".to_string()]);
        assert_eq!(config.static_files.dir, "public");
        assert!(!config.logging.json);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let config = load_config_with_env(path.to_str(), no_env).unwrap();
        assert_eq!(config.history.capacity, 10);
    }

    #[test]
    fn file_values_are_applied() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[server]
port = 4040

[history]
capacity = 3

[validation]
denylist = ["AAAA", "BBBB"]
"#
        )
        .unwrap();

        let config = load_config_with_env(file.path().to_str(), no_env).unwrap();
        assert_eq!(config.server.port, 4040);
        assert_eq!(config.history.capacity, 3);
        assert_eq!(config.validation.denylist, vec!["AAAA", "BBBB"]);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[history]\ncapacity = \"ten\"").unwrap();

        let err = load_config_with_env(file.path().to_str(), no_env).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn env_overrides_file() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("RFID_PORT", "5050"),
            ("RFID_HISTORY_CAPACITY", "25"),
            ("RFID_DENYLIST", " AAAA , ,CCCC"),
            ("RFID_LOG_JSON", "1"),
        ]);
        let config =
            load_config_with_env(None, |key| env.get(key).map(|v| v.to_string())).unwrap();

        assert_eq!(config.server.port, 5050);
        assert_eq!(config.history.capacity, 25);
        assert_eq!(config.validation.denylist, vec!["AAAA", "CCCC"]);
        assert!(config.logging.json);
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let env = |key: &str| (key == "RFID_HISTORY_CAPACITY").then(|| "0".to_string());
        let err = load_config_with_env(None, env).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "history.capacity",
                ..
            }
        ));
    }
}
