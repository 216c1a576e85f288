//! Built-in commands
//!
//! `ping` answers `"pong"`, `version` reports the server identity and
//! `echo` returns its data unchanged.

use super::{CommandRegistry, ResolveError};
use crate::protocol::ServerIdentity;
use serde_json::Value;

/// Register the built-in commands
pub fn register_builtins(registry: &mut CommandRegistry, identity: ServerIdentity) {
    registry
        .register_fn("ping", |_| Ok(Value::from("pong")))
        .register_fn("version", move |_| {
            serde_json::to_value(identity).map_err(ResolveError::internal)
        })
        .register_fn("echo", |data| Ok(data.unwrap_or(Value::Null)));
}

impl CommandRegistry {
    /// Registry pre-loaded with the built-in commands
    #[must_use]
    pub fn with_builtins(identity: ServerIdentity) -> Self {
        let mut registry = Self::new();
        register_builtins(&mut registry, identity);
        registry
    }
}
