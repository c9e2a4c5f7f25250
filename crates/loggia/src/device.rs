use alloc::string::String;

use serde::{Deserialize, Serialize};

use crate::state::DeviceState;

/// All [`DeviceKind`]s.
pub const ALL_DEVICE_KINDS: &[DeviceKind] = &[DeviceKind::Light, DeviceKind::Thermostat];

/// The identifier of a [`Room`].
///
/// Identifiers are assigned at provisioning time and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(u32);

impl core::fmt::Display for RoomId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.0.fmt(f)
    }
}

impl RoomId {
    /// Creates a [`RoomId`].
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the integer value of the identifier.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

/// A room owning zero or more devices.
///
/// Rooms are created at provisioning time and are never deleted while a
/// device still references them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Room identifier.
    pub id: RoomId,
    /// Room display name.
    pub name: String,
}

impl Room {
    /// Creates a [`Room`].
    #[must_use]
    #[inline]
    pub const fn new(id: RoomId, name: String) -> Self {
        Self { id, name }
    }
}

/// The identifier of a [`Device`].
///
/// Identifiers are unique across the whole system and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(u32);

impl core::fmt::Display for DeviceId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.0.fmt(f)
    }
}

impl DeviceId {
    /// Creates a [`DeviceId`].
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the integer value of the identifier.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

/// All supported device kinds.
///
/// The kind of a device determines which actions it accepts and which
/// attributes its state carries. Adding a new kind only requires a new
/// variant here and the matching validation rules; stored state needs no
/// migration because it is persisted as an open attribute map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    /// A light with an on/off switch and a brightness level.
    Light,
    /// A thermostat with a target temperature.
    Thermostat,
}

impl core::fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.name().fmt(f)
    }
}

impl DeviceKind {
    /// Returns the [`DeviceKind`] name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Thermostat => "thermostat",
        }
    }
}

/// A controllable device.
///
/// A device belongs to exactly one [`Room`] and carries a typed
/// [`DeviceState`] constrained by its [`DeviceKind`]. Devices are created
/// during provisioning and mutated exclusively through the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    /// Device identifier.
    pub id: DeviceId,
    /// Device display name.
    pub name: String,
    /// Device kind.
    pub kind: DeviceKind,
    /// Owning room.
    pub room: Room,
    /// Current device state.
    pub state: DeviceState,
}

impl Device {
    /// Creates a [`Device`].
    #[must_use]
    #[inline]
    pub const fn new(
        id: DeviceId,
        name: String,
        kind: DeviceKind,
        room: Room,
        state: DeviceState,
    ) -> Self {
        Self {
            id,
            name,
            kind,
            room,
            state,
        }
    }
}

/// A full read of a single device as currently persisted.
///
/// Snapshots are what sessions and the external reasoning component
/// observe; they flatten the owning room down to its display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceSnapshot {
    /// Device identifier.
    pub id: DeviceId,
    /// Device display name.
    pub name: String,
    /// Device kind.
    pub kind: DeviceKind,
    /// Name of the owning room.
    pub room: String,
    /// Current device state.
    pub state: DeviceState,
}

impl From<&Device> for DeviceSnapshot {
    fn from(device: &Device) -> Self {
        Self {
            id: device.id,
            name: device.name.clone(),
            kind: device.kind,
            room: device.room.name.clone(),
            state: device.state.clone(),
        }
    }
}
