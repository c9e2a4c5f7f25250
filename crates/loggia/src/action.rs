use core::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// The inclusive safe range accepted by [`Action::SetTemperature`],
/// in degrees Celsius.
pub const TEMPERATURE_RANGE: RangeInclusive<i16> = 15..=28;

/// The inclusive range accepted by [`Action::SetBrightness`].
pub const BRIGHTNESS_RANGE: RangeInclusive<u8> = 0..=100;

/// A named, typed device mutation.
///
/// Every action has its own precondition and range rules, evaluated by the
/// engine before any state changes. On the wire an action is an adjacently
/// tagged pair of an action name and a parameters map, the exact shape the
/// external reasoning component produces.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "parameters", rename_all = "snake_case")]
pub enum Action {
    /// Sets the target temperature of a thermostat, in degrees Celsius.
    SetTemperature {
        /// Requested temperature.
        value: i16,
    },
    /// Switches a light on or off.
    SetPower {
        /// Requested power state.
        on: bool,
    },
    /// Sets the brightness level of a light.
    SetBrightness {
        /// Requested brightness.
        value: u8,
    },
}

impl core::fmt::Display for Action {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.name().fmt(f)
    }
}

impl Action {
    /// Returns the [`Action`] name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SetTemperature { .. } => "set_temperature",
            Self::SetPower { .. } => "set_power",
            Self::SetBrightness { .. } => "set_brightness",
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{deserialize, serialize};

    use super::{Action, BRIGHTNESS_RANGE, TEMPERATURE_RANGE};

    #[test]
    fn test_action_wire_format() {
        assert_eq!(
            serialize(Action::SetTemperature { value: 21 }),
            serde_json::json!({
                "action": "set_temperature",
                "parameters": {"value": 21},
            })
        );
        assert_eq!(
            serialize(Action::SetPower { on: true }),
            serde_json::json!({
                "action": "set_power",
                "parameters": {"on": true},
            })
        );
        assert_eq!(
            serialize(Action::SetBrightness { value: 50 }),
            serde_json::json!({
                "action": "set_brightness",
                "parameters": {"value": 50},
            })
        );

        for action in [
            Action::SetTemperature { value: 21 },
            Action::SetPower { on: false },
            Action::SetBrightness { value: 0 },
        ] {
            assert_eq!(deserialize::<Action>(serialize(action)), action);
        }
    }

    #[test]
    fn test_ranges_are_inclusive() {
        assert!(TEMPERATURE_RANGE.contains(&15));
        assert!(TEMPERATURE_RANGE.contains(&28));
        assert!(!TEMPERATURE_RANGE.contains(&14));
        assert!(!TEMPERATURE_RANGE.contains(&29));

        assert!(BRIGHTNESS_RANGE.contains(&0));
        assert!(BRIGHTNESS_RANGE.contains(&100));
        assert!(!BRIGHTNESS_RANGE.contains(&101));
    }
}
