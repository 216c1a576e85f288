//! # panel-gateway
//!
//! WebSocket command gateway for the panel control protocol. Each accepted
//! connection runs its own read-dispatch-write session against a pluggable
//! resolver.

pub mod connection;
pub mod protocol;
pub mod resolver;
pub mod server;
pub mod startup;

pub use server::run;
