//! Application configuration structs
//!
//! Loads the listen address from the panel settings file and runtime knobs
//! from environment variables.

use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Listen address used when the settings file is missing, unreadable or empty
pub const DEFAULT_LISTEN_ADDRESS: &str = ":62001";

/// Settings file location, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "Panel_Setting/config.json";

/// Environment variable overriding the settings file location
pub const CONFIG_PATH_VAR: &str = "PANEL_CONFIG_PATH";

/// Environment variable holding the per-session idle timeout in seconds
pub const IDLE_TIMEOUT_VAR: &str = "PANEL_IDLE_TIMEOUT_SECS";

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Address the gateway listens on, e.g. `":62001"` or `"127.0.0.1:9000"`
    pub listen_address: String,
    /// Idle timeout per session; `None` waits for the next message forever
    pub idle_timeout: Option<Duration>,
}

/// On-disk shape of `Panel_Setting/config.json`
#[derive(Debug, Clone, Default, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    port: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen_address: DEFAULT_LISTEN_ADDRESS.to_string(),
            idle_timeout: None,
        }
    }
}

impl AppConfig {
    /// Path of the settings file, honouring `PANEL_CONFIG_PATH`
    #[must_use]
    pub fn config_path() -> PathBuf {
        env::var(CONFIG_PATH_VAR)
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from)
    }

    /// Load configuration from a JSON settings file
    ///
    /// An empty `port` field yields the default listen address.
    ///
    /// # Errors
    /// Returns an error if the file is missing, unreadable or malformed
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let load_error = |source| ConfigError::Load {
            path: path.display().to_string(),
            source,
        };

        let settings = config::Config::builder()
            .add_source(config::File::from(path).format(config::FileFormat::Json))
            .build()
            .and_then(|settings| settings.try_deserialize::<SettingsFile>())
            .map_err(load_error)?;

        Ok(Self {
            listen_address: non_empty_or_default(settings.port),
            ..Self::default()
        })
    }

    /// Apply environment overrides on top of the file settings
    ///
    /// Leaves `self` untouched when a variable holds an invalid value.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.idle_timeout = parse_idle_timeout(env::var(IDLE_TIMEOUT_VAR).ok().as_deref())?;
        Ok(())
    }

    /// Address in a form `TcpListener::bind` accepts
    ///
    /// A bare `":PORT"` becomes `0.0.0.0:PORT`, every IPv4 interface. Use
    /// `"[::]:PORT"` in the settings file to listen on IPv6 as well.
    #[must_use]
    pub fn bind_address(&self) -> String {
        let address = self.listen_address.trim();
        if address.is_empty() {
            return format!("0.0.0.0{DEFAULT_LISTEN_ADDRESS}");
        }
        if address.starts_with(':') {
            format!("0.0.0.0{address}")
        } else {
            address.to_string()
        }
    }
}

fn non_empty_or_default(address: String) -> String {
    if address.trim().is_empty() {
        DEFAULT_LISTEN_ADDRESS.to_string()
    } else {
        address
    }
}

/// Parse the idle timeout variable; unset or `0` disables the timeout
fn parse_idle_timeout(value: Option<&str>) -> Result<Option<Duration>, ConfigError> {
    let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };

    let secs: u64 = raw
        .parse()
        .map_err(|_| ConfigError::InvalidValue(IDLE_TIMEOUT_VAR, raw.to_string()))?;

    Ok((secs > 0).then(|| Duration::from_secs(secs)))
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load config file {path}: {source}")]
    Load {
        path: String,
        #[source]
        source: config::ConfigError,
    },

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
