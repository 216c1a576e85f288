//! Individual connection
//!
//! Represents a single upgraded connection and its state.

use super::{Frame, Transport};
use crate::protocol::Response;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::{Duration, Instant};

/// Connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionState {
    /// Handshake complete, nothing read yet
    Open,
    /// Waiting for the next message
    Reading,
    /// Message handed to the resolver
    Dispatching,
    /// Writing the response
    Writing,
    /// Connection is closed
    Closed,
}

/// A single upgraded connection
pub struct Connection<T> {
    /// Unique session ID
    session_id: String,

    /// Remote peer address
    remote_addr: SocketAddr,

    /// Current connection state
    state: ConnectionState,

    /// Underlying message channel
    transport: T,

    /// Responses written so far
    exchanges: u64,

    /// Connection creation time
    created_at: Instant,
}

impl<T: Transport> Connection<T> {
    /// Create a new connection with a fresh session ID
    pub fn new(remote_addr: SocketAddr, transport: T) -> Self {
        Self {
            session_id: uuid::Uuid::new_v4().simple().to_string(),
            remote_addr,
            state: ConnectionState::Open,
            transport,
            exchanges: 0,
            created_at: Instant::now(),
        }
    }

    /// Get the session ID
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Get the remote peer address
    pub fn remote_addr(&self) -> SocketAddr {
        self.remote_addr
    }

    /// Get the current state
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Set the connection state
    pub fn set_state(&mut self, state: ConnectionState) {
        self.state = state;
    }

    /// Check if the connection is closed
    pub fn is_closed(&self) -> bool {
        self.state == ConnectionState::Closed
    }

    /// Number of responses written
    pub fn exchanges(&self) -> u64 {
        self.exchanges
    }

    /// Get connection age
    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }

    /// Receive the next frame
    pub async fn recv(&mut self) -> Option<Result<Frame, axum::Error>> {
        self.state = ConnectionState::Reading;
        self.transport.recv().await
    }

    /// Write a response
    pub async fn send(&mut self, response: Response) -> Result<(), axum::Error> {
        self.state = ConnectionState::Writing;
        self.transport.send(response.into_payload()).await?;
        self.exchanges += 1;
        Ok(())
    }

    /// Send a close frame and mark the connection closed
    ///
    /// Closing is best effort; a peer that already went away is not an error.
    pub async fn close(&mut self, code: u16, reason: &str) {
        if self.is_closed() {
            return;
        }
        if let Err(e) = self.transport.close(code, reason).await {
            tracing::debug!(
                session_id = %self.session_id,
                error = %e,
                "Close frame not delivered"
            );
        }
        self.state = ConnectionState::Closed;
    }

    /// Answer a close frame from the peer and mark the connection closed
    pub async fn acknowledge_close(&mut self) {
        if self.is_closed() {
            return;
        }
        if let Err(e) = self.transport.acknowledge_close().await {
            tracing::debug!(
                session_id = %self.session_id,
                error = %e,
                "Close reply not delivered"
            );
        }
        self.state = ConnectionState::Closed;
    }

    /// Release the connection, dropping the underlying transport
    pub fn release(mut self) {
        self.state = ConnectionState::Closed;
    }
}

impl<T> std::fmt::Debug for Connection<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("session_id", &self.session_id)
            .field("remote_addr", &self.remote_addr)
            .field("state", &self.state)
            .field("exchanges", &self.exchanges)
            .finish()
    }
}
