//! The `loggia-engine` library crate resolves structured action intents
//! against a live device registry and applies them transactionally.
//!
//! An intent is produced by an external reasoning component that turns free
//! text into a device selection plus an action. That component is an
//! untrusted upstream producer: this crate re-validates every field before
//! any state changes.
//!
//! Core functionalities of this crate include:
//!
//! - Storing rooms, devices, and each device's current state behind the
//!   [`registry::Registry`] seam, with per-device serialization of updates
//! - Finding candidate devices from a free-text selection query matched
//!   against device names, kinds, and room names
//! - Deciding whether to act, ask for clarification, or report not-found,
//!   depending on how many devices the query matched
//! - Validating an action against the per-kind precondition and range
//!   rules before mutating anything
//! - Executing a validated action atomically and reporting the result as a
//!   human-readable reply
//!
//! Rejections, ambiguous selections, and unmatched queries are expected,
//! user-facing outcomes represented as data; only persistence faults
//! surface as errors.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// The engine pipeline tying all components together.
pub mod engine;
/// Error management.
pub mod error;
/// Execution of validated actions.
pub mod executor;
/// Resolution of selection queries into candidate devices.
pub mod finder;
/// The disambiguation policy applied to candidate devices.
pub mod policy;
/// The device registry and its in-memory implementation.
pub mod registry;
/// Per-kind action validation rules.
pub mod validator;

#[cfg(test)]
mod tests;
