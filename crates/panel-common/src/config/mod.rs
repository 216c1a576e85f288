//! Configuration structs

mod app_config;

pub use app_config::{
    AppConfig, ConfigError, CONFIG_PATH_VAR, DEFAULT_CONFIG_PATH, DEFAULT_LISTEN_ADDRESS,
    IDLE_TIMEOUT_VAR,
};
