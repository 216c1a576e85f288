//! Panel protocol definitions
//!
//! Defines the message and response payloads exchanged over a session and
//! the fixed identity the server advertises.

mod identity;
mod messages;

pub use identity::{ServerIdentity, PROTOCOL_VERSION, VERSION};
pub use messages::{Message, Payload, Response};
