//! Process startup helpers

use crate::protocol::ServerIdentity;
use panel_common::{AppConfig, DEFAULT_LISTEN_ADDRESS};
use std::path::Path;

/// Log the server identity and start time
pub fn log_startup(identity: ServerIdentity) {
    tracing::info!(
        version = identity.version,
        protocol = identity.protocol,
        "Panel gateway started"
    );
    tracing::info!(
        start_time = %chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "Start time"
    );
}

/// Load configuration, falling back to defaults on any recoverable error
pub fn load_config(path: &Path) -> AppConfig {
    let mut config = AppConfig::from_file(path).unwrap_or_else(|e| {
        tracing::error!(
            error = %e,
            default = DEFAULT_LISTEN_ADDRESS,
            "Failed to read config file, using default address"
        );
        AppConfig::default()
    });

    if let Err(e) = config.apply_env() {
        tracing::warn!(error = %e, "Ignoring invalid environment override");
    }

    tracing::info!(
        listen_address = %config.listen_address,
        idle_timeout = ?config.idle_timeout,
        "Configuration loaded"
    );
    config
}
