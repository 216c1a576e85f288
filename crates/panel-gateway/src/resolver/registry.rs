//! Command registry
//!
//! Routes decoded commands to handlers by name.

use super::{CommandReply, CommandRequest, ResolveError, ResolveResult, Resolver};
use crate::protocol::{Message, Response};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Trait implemented by every command handler
pub trait CommandHandler: Send + Sync {
    /// Execute the command with its optional data
    fn handle(&self, data: Option<Value>) -> ResolveResult<Value>;
}

/// Adapter letting plain functions act as handlers
struct FnHandler<F>(F);

impl<F> CommandHandler for FnHandler<F>
where
    F: Fn(Option<Value>) -> ResolveResult<Value> + Send + Sync,
{
    fn handle(&self, data: Option<Value>) -> ResolveResult<Value> {
        (self.0)(data)
    }
}

/// Registry mapping command names to handlers
#[derive(Default, Clone)]
pub struct CommandRegistry {
    handlers: HashMap<String, Arc<dyn CommandHandler>>,
}

impl CommandRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for a command name, replacing any previous one
    pub fn register(&mut self, name: &str, handler: impl CommandHandler + 'static) -> &mut Self {
        if self
            .handlers
            .insert(name.to_owned(), Arc::new(handler))
            .is_some()
        {
            tracing::debug!(cmd = name, "Replaced command handler");
        }
        self
    }

    /// Register a function as the handler for a command name
    pub fn register_fn<F>(&mut self, name: &str, handler: F) -> &mut Self
    where
        F: Fn(Option<Value>) -> ResolveResult<Value> + Send + Sync + 'static,
    {
        self.register(name, FnHandler(handler))
    }

    /// Check whether a command is registered
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Registered command names, sorted
    #[must_use]
    pub fn commands(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Run a decoded command
    pub fn dispatch(&self, request: &CommandRequest) -> CommandReply {
        let Some(handler) = self.handlers.get(&request.cmd) else {
            tracing::debug!(cmd = %request.cmd, "Unknown command");
            let err = ResolveError::UnknownCommand(request.cmd.clone());
            return CommandReply::failure(Some(request), &err);
        };

        match handler.handle(request.data.clone()) {
            Ok(data) => CommandReply::success(request, data),
            Err(err) => {
                tracing::debug!(cmd = %request.cmd, error = %err, "Command failed");
                CommandReply::failure(Some(request), &err)
            }
        }
    }
}

impl Resolver for CommandRegistry {
    fn resolve(&self, message: &Message) -> Response {
        let reply = match CommandRequest::parse(message) {
            Ok(request) => self.dispatch(&request),
            Err(err) => {
                tracing::debug!(message = %message, error = %err, "Failed to decode command");
                CommandReply::failure(None, &err)
            }
        };
        reply.into_response()
    }
}

impl std::fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("commands", &self.commands())
            .finish()
    }
}
