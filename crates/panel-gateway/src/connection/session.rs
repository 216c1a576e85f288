//! Session loop
//!
//! Drives one connection from open to close: read a message, resolve it,
//! write the response, repeat. Exactly one exchange is in flight at a time.

use super::{Connection, ConnectionState, Frame, Transport};
use crate::resolver::Resolver;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Close code sent when the server shuts down
const CLOSE_GOING_AWAY: u16 = 1001;

/// Close code for idle timeouts
const CLOSE_NORMAL: u16 = 1000;

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// Peer sent a close frame or the stream ended
    PeerClosed,
    /// Reading from the transport failed
    ReadFailed,
    /// Writing a response failed
    WriteFailed,
    /// No message arrived within the idle timeout
    IdleTimeout,
    /// The server is shutting down
    Shutdown,
}

impl SessionEnd {
    /// Short name for log output
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PeerClosed => "peer_closed",
            Self::ReadFailed => "read_failed",
            Self::WriteFailed => "write_failed",
            Self::IdleTimeout => "idle_timeout",
            Self::Shutdown => "shutdown",
        }
    }
}

impl std::fmt::Display for SessionEnd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of waiting for the next frame
enum Wait {
    Frame(Option<Result<Frame, axum::Error>>),
    IdleTimeout,
    Shutdown,
}

/// The read-dispatch-write loop for one connection
pub struct Session<T> {
    connection: Connection<T>,
    resolver: Arc<dyn Resolver>,
    idle_timeout: Option<Duration>,
    shutdown: watch::Receiver<bool>,
}

impl<T: Transport> Session<T> {
    /// Create a session with no idle timeout
    pub fn new(
        connection: Connection<T>,
        resolver: Arc<dyn Resolver>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            connection,
            resolver,
            idle_timeout: None,
            shutdown,
        }
    }

    /// Close the session when no message arrives within `timeout`
    pub fn with_idle_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.idle_timeout = timeout;
        self
    }

    /// Run until the connection fails, closes, idles out or the server stops
    ///
    /// The connection is released on every path before this returns.
    pub async fn run(mut self) -> SessionEnd {
        tracing::info!(
            session_id = %self.connection.session_id(),
            remote_addr = %self.connection.remote_addr(),
            "Client connected"
        );

        let end = self.drive().await;
        self.finish(end).await;
        end
    }

    async fn drive(&mut self) -> SessionEnd {
        loop {
            let frame = match self.wait_for_frame().await {
                Wait::Frame(Some(Ok(frame))) => frame,
                Wait::Frame(Some(Err(e))) => {
                    tracing::warn!(
                        session_id = %self.connection.session_id(),
                        error = %e,
                        "Failed to read message"
                    );
                    return SessionEnd::ReadFailed;
                }
                Wait::Frame(None) => {
                    tracing::info!(
                        session_id = %self.connection.session_id(),
                        "Connection closed by peer"
                    );
                    return SessionEnd::PeerClosed;
                }
                Wait::IdleTimeout => {
                    tracing::info!(
                        session_id = %self.connection.session_id(),
                        timeout = ?self.idle_timeout,
                        "Session idle timeout"
                    );
                    return SessionEnd::IdleTimeout;
                }
                Wait::Shutdown => return SessionEnd::Shutdown,
            };

            let message = match frame {
                Frame::Data(message) => message,
                Frame::Ping | Frame::Pong => {
                    tracing::trace!(session_id = %self.connection.session_id(), "Control frame");
                    continue;
                }
                Frame::Close { code, reason } => {
                    tracing::info!(
                        session_id = %self.connection.session_id(),
                        code = ?code,
                        reason = %reason,
                        "Client closed connection"
                    );
                    self.connection.acknowledge_close().await;
                    return SessionEnd::PeerClosed;
                }
            };

            tracing::trace!(
                session_id = %self.connection.session_id(),
                message = %message,
                "Received message"
            );

            self.connection.set_state(ConnectionState::Dispatching);
            let response = self.resolver.resolve(&message);

            if let Err(e) = self.connection.send(response).await {
                tracing::warn!(
                    session_id = %self.connection.session_id(),
                    error = %e,
                    "Failed to send response"
                );
                return SessionEnd::WriteFailed;
            }
        }
    }

    async fn wait_for_frame(&mut self) -> Wait {
        let stopping = *self.shutdown.borrow();
        if stopping {
            return Wait::Shutdown;
        }

        let idle_timeout = self.idle_timeout;
        tokio::select! {
            frame = with_timeout(idle_timeout, self.connection.recv()) => {
                frame.map_or(Wait::IdleTimeout, Wait::Frame)
            }
            () = shutdown_requested(&mut self.shutdown) => Wait::Shutdown,
        }
    }

    async fn finish(mut self, end: SessionEnd) {
        match end {
            SessionEnd::Shutdown => {
                self.connection
                    .close(CLOSE_GOING_AWAY, "server shutting down")
                    .await;
            }
            SessionEnd::IdleTimeout => self.connection.close(CLOSE_NORMAL, "idle timeout").await,
            SessionEnd::PeerClosed | SessionEnd::ReadFailed | SessionEnd::WriteFailed => {}
        }

        tracing::info!(
            session_id = %self.connection.session_id(),
            remote_addr = %self.connection.remote_addr(),
            exchanges = self.connection.exchanges(),
            duration = ?self.connection.age(),
            reason = %end,
            "Connection released"
        );
        self.connection.release();
    }
}

/// Await `future`, giving up after `limit` when one is set
async fn with_timeout<F: Future>(limit: Option<Duration>, future: F) -> Option<F::Output> {
    match limit {
        Some(limit) => tokio::time::timeout(limit, future).await.ok(),
        None => Some(future.await),
    }
}

/// Resolve once shutdown is signalled; never resolves if the sender is gone
async fn shutdown_requested(shutdown: &mut watch::Receiver<bool>) {
    let sender_dropped = shutdown.wait_for(|stop| *stop).await.is_err();
    if sender_dropped {
        std::future::pending::<()>().await;
    }
}
