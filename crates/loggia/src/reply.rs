use alloc::string::String;
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use crate::device::{Device, DeviceId, DeviceSnapshot};

/// A device proposed to the user when a selection is ambiguous.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Device identifier.
    pub id: DeviceId,
    /// Device display name.
    pub name: String,
    /// Name of the owning room.
    pub room: String,
}

impl From<&Device> for Candidate {
    fn from(device: &Device) -> Self {
        Self {
            id: device.id,
            name: device.name.clone(),
            room: device.room.name.clone(),
        }
    }
}

/// The outcome of a single resolution turn, addressed to the external
/// reasoning component and its client.
///
/// Every turn produces a human-readable message. Ambiguous selections also
/// carry the list of [`Candidate`]s so that the caller can issue a narrowed
/// query on its next turn; turns that touched a single device carry its
/// post-turn [`DeviceSnapshot`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnReply {
    /// Human-readable result message.
    pub message: String,
    /// Candidate devices for an ambiguous selection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidates: Option<Vec<Candidate>>,
    /// The device the turn resolved to, as persisted after the turn.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<DeviceSnapshot>,
}

impl TurnReply {
    /// Creates a [`TurnReply`] carrying only a message.
    #[must_use]
    #[inline]
    pub const fn message(message: String) -> Self {
        Self {
            message,
            candidates: None,
            device: None,
        }
    }

    /// Creates a [`TurnReply`] asking the user to disambiguate among the
    /// given [`Candidate`]s.
    #[must_use]
    #[inline]
    pub const fn clarify(message: String, candidates: Vec<Candidate>) -> Self {
        Self {
            message,
            candidates: Some(candidates),
            device: None,
        }
    }

    /// Creates a [`TurnReply`] for a turn resolved against a single device.
    #[must_use]
    #[inline]
    pub const fn resolved(message: String, device: DeviceSnapshot) -> Self {
        Self {
            message,
            candidates: None,
            device: Some(device),
        }
    }
}

/// A state broadcast addressed to a live session.
///
/// Sent after every turn that ran the engine, including rejected ones, and
/// on session establishment. The snapshot is always a consistent read taken
/// after any mutation of the same turn committed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUpdate {
    /// Human-readable result message.
    pub message: String,
    /// Full snapshot of all registered devices.
    pub devices: Vec<DeviceSnapshot>,
}

impl SessionUpdate {
    /// Creates a [`SessionUpdate`].
    #[must_use]
    #[inline]
    pub const fn new(message: String, devices: Vec<DeviceSnapshot>) -> Self {
        Self { message, devices }
    }
}

/// A frame transmitted over a live session connection.
///
/// A single connection interleaves per-turn replies with full state
/// broadcasts, so frames are tagged with their kind on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionFrame {
    /// The outcome of a resolution turn.
    Reply(TurnReply),
    /// A full device-state broadcast.
    Update(SessionUpdate),
}
