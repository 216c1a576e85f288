//! Command resolution
//!
//! The session loop hands every received message to a [`Resolver`] and
//! writes back whatever it returns. Resolvers never touch the connection.

mod builtins;
mod envelope;
mod error;
mod registry;

pub use builtins::register_builtins;
pub use envelope::{CommandReply, CommandRequest, ErrorBody};
pub use error::{ResolveError, ResolveResult};
pub use registry::{CommandHandler, CommandRegistry};

use crate::protocol::{Message, Response};

/// Maps one message to one response
///
/// Implementations must be total: failures are encoded in the returned
/// response, never surfaced as transport errors.
pub trait Resolver: Send + Sync + 'static {
    /// Produce the response for a message
    fn resolve(&self, message: &Message) -> Response;
}

impl<F> Resolver for F
where
    F: Fn(&Message) -> Response + Send + Sync + 'static,
{
    fn resolve(&self, message: &Message) -> Response {
        self(message)
    }
}
