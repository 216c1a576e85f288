//! Connection management
//!
//! A connection is owned by exactly one session, which drives it from
//! handshake to close.

mod connection;
mod session;
mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use connection::{Connection, ConnectionState};
pub use session::{Session, SessionEnd};
pub use transport::{Frame, Transport};
