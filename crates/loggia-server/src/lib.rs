//! The `loggia-server` library crate exposes the resolution and control
//! engine to conversational clients over WebSocket sessions.
//!
//! Each session is a message-driven cooperative loop: receive a structured
//! intent, resolve and execute it through the engine, and broadcast the
//! result together with a full device-state snapshot. Messages of one
//! session are processed strictly sequentially, so within one conversation
//! there is a total order of actions; sessions run concurrently with each
//! other.
//!
//! Any internal fault is caught at the cycle boundary and converted into a
//! reported error message; the session keeps serving instead of closing
//! the connection.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// Provisioning of the demo home layout.
pub mod seed;
/// The WebSocket server.
pub mod server;
/// The per-connection session loop.
pub mod session;
