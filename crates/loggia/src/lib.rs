//! The data model shared by every component of the `loggia` smart-home
//! system.
//!
//! This crate provides APIs to:
//!
//! - Describe rooms and the devices they own, together with each device's
//!   typed state. Device state is a closed variant per device kind, so the
//!   accepted attributes and their ranges are known at compile time, plus an
//!   open extension bag for kinds the engine does not validate yet.
//! - Describe the actions a device accepts, along with their fixed value
//!   ranges.
//! - Exchange structured intents and replies between the engine and an
//!   external reasoning component. An intent carries free-text selection
//!   criteria and an optional action; a reply carries a human-readable
//!   message, candidate devices when the selection is ambiguous, and device
//!   snapshots.
//! - Preserve user and room-membership data for a future authorization
//!   layer. This crate stores that data but never enforces it.
//!
//! All exchanged structures are serializable and deserializable, so the
//! same types describe both the in-memory records and the wire format.
//!
//! This crate can be compiled for both `std` and `no_std` environments.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![no_std]

extern crate alloc;

/// User, role, and room-membership data.
pub mod access;
/// Device actions and their value ranges.
pub mod action;
/// Description of a device and its owning room.
pub mod device;
/// Structured intents produced by an external reasoning component.
pub mod intent;
/// Replies and session frames sent back to clients.
pub mod reply;
/// Typed device state and partial state updates.
pub mod state;

#[cfg(test)]
pub(crate) fn serialize<T: serde::Serialize>(value: T) -> serde_json::Value {
    serde_json::to_value(value).unwrap()
}

#[cfg(test)]
pub(crate) fn deserialize<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> T {
    serde_json::from_value(value).unwrap()
}
