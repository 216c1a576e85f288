//! Integration test utilities for the panel gateway
//!
//! This crate provides helpers for running end-to-end tests against a live
//! gateway over real WebSocket connections.


pub use helpers::*;
