use hashbrown::DefaultHashBuilder;

use indexmap::IndexMap;

use serde::{Deserialize, Serialize};

use serde_json::Value;

use alloc::string::String;

/// The open attribute bag used by device kinds this crate does not model.
///
/// Attributes are kept in insertion order so that serialized state remains
/// stable across reads.
pub type Attributes = IndexMap<String, Value, DefaultHashBuilder>;

/// The typed state of a device.
///
/// Each supported device kind owns a closed variant, so the attribute names
/// and value types are fixed at compile time. States are persisted and
/// transmitted as open attribute maps, which lets new kinds add attributes
/// without a schema migration; unrecognized maps deserialize into the
/// [`DeviceState::Extension`] bag and are validated at the boundary by the
/// engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DeviceState {
    /// The state of a light.
    Light {
        /// Whether the light is on.
        on: bool,
        /// Brightness level, in the `0..=100` range.
        brightness: u8,
    },
    /// The state of a thermostat.
    Thermostat {
        /// Target temperature in degrees Celsius.
        temperature: i16,
    },
    /// The state of a device kind unknown to this crate.
    Extension(Attributes),
}

impl DeviceState {
    /// Creates the [`DeviceState`] of a light.
    #[must_use]
    pub const fn light(on: bool, brightness: u8) -> Self {
        Self::Light { on, brightness }
    }

    /// Creates the [`DeviceState`] of a thermostat.
    #[must_use]
    pub const fn thermostat(temperature: i16) -> Self {
        Self::Thermostat { temperature }
    }

    /// Merges a [`StatePatch`] into the state.
    ///
    /// The merge is all-or-nothing: when the patch targets an attribute the
    /// state does not carry, the state is left untouched and `false` is
    /// returned.
    pub fn merge(&mut self, patch: &StatePatch) -> bool {
        match (self, patch) {
            (Self::Light { on, .. }, StatePatch::Power(value)) => {
                *on = *value;
                true
            }
            (Self::Light { brightness, .. }, StatePatch::Brightness(value)) => {
                *brightness = *value;
                true
            }
            (Self::Thermostat { temperature }, StatePatch::Temperature(value)) => {
                *temperature = *value;
                true
            }
            _ => false,
        }
    }
}

/// A partial update to a [`DeviceState`].
///
/// A patch touches exactly one attribute; every other attribute of the
/// state is preserved by the merge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StatePatch {
    /// Switches a light on or off.
    Power(bool),
    /// Changes the brightness level of a light.
    Brightness(u8),
    /// Changes the target temperature of a thermostat.
    Temperature(i16),
}
