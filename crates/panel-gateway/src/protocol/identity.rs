//! Server identity
//!
//! Version and protocol-version tags. Both are fixed for the process lifetime
//! and are never negotiated with clients.

use serde::Serialize;

/// Build version tag
pub const VERSION: &str = "DEV20250816";

/// Panel protocol-version tag
pub const PROTOCOL_VERSION: &str = "500";

/// Immutable identity injected into the server at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ServerIdentity {
    /// Build version tag
    pub version: &'static str,
    /// Protocol-version tag
    pub protocol: &'static str,
}

impl ServerIdentity {
    /// Identity of this build
    #[must_use]
    pub const fn current() -> Self {
        Self {
            version: VERSION,
            protocol: PROTOCOL_VERSION,
        }
    }
}

impl Default for ServerIdentity {
    fn default() -> Self {
        Self::current()
    }
}

impl std::fmt::Display for ServerIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "version {} (protocol {})", self.version, self.protocol)
    }
}
