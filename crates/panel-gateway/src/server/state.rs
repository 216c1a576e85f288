//! Gateway state
//!
//! Application state for the gateway server.

use crate::protocol::ServerIdentity;
use crate::resolver::Resolver;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Gateway application state
///
/// Read-only for sessions; the shutdown flag is the only value that changes.
#[derive(Clone)]
pub struct GatewayState {
    /// Resolver shared by every session
    resolver: Arc<dyn Resolver>,
    /// Version and protocol tags
    identity: ServerIdentity,
    /// Idle timeout applied to each session
    idle_timeout: Option<Duration>,
    /// Broadcasts shutdown to live sessions
    shutdown: Arc<watch::Sender<bool>>,
}

impl GatewayState {
    /// Create a new gateway state
    pub fn new(resolver: Arc<dyn Resolver>, identity: ServerIdentity) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            resolver,
            identity,
            idle_timeout: None,
            shutdown: Arc::new(shutdown),
        }
    }

    /// Set the per-session idle timeout
    pub fn with_idle_timeout(mut self, idle_timeout: Option<Duration>) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    /// Get a handle to the resolver
    pub fn resolver(&self) -> Arc<dyn Resolver> {
        Arc::clone(&self.resolver)
    }

    /// Get the server identity
    pub fn identity(&self) -> ServerIdentity {
        self.identity
    }

    /// Get the per-session idle timeout
    pub fn idle_timeout(&self) -> Option<Duration> {
        self.idle_timeout
    }

    /// Subscribe to the shutdown signal
    pub fn shutdown_receiver(&self) -> watch::Receiver<bool> {
        self.shutdown.subscribe()
    }

    /// Tell every live session to close
    pub fn begin_shutdown(&self) {
        self.shutdown.send_replace(true);
    }

    /// Check whether shutdown has started
    pub fn is_shutting_down(&self) -> bool {
        *self.shutdown.borrow()
    }
}

impl std::fmt::Debug for GatewayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayState")
            .field("identity", &self.identity)
            .field("idle_timeout", &self.idle_timeout)
            .field("shutting_down", &self.is_shutting_down())
            .finish()
    }
}
