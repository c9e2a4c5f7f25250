use loggia::action::{Action, BRIGHTNESS_RANGE, TEMPERATURE_RANGE};
use loggia::device::{Device, DeviceKind};
use loggia::state::{DeviceState, StatePatch};

/// The verdict of validating one action against one device.
///
/// Verdicts are data, not faults: a rejection is an expected, user-facing
/// outcome, distinct from internal errors. Validation never partially
/// applies; either the action proceeds with a [`Verdict::Apply`] patch or
/// no state changes at all.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// Every precondition and range check passed; the patch may be merged
    /// and persisted.
    Apply {
        /// The state update to merge.
        patch: StatePatch,
        /// Confirmation message for the user.
        confirmation: String,
    },
    /// The request is valid but redundant; nothing changes.
    Unchanged {
        /// Message explaining why nothing changed.
        message: String,
    },
    /// A precondition or range check failed; nothing changes.
    Rejected {
        /// The specific, human-readable rejection reason.
        reason: String,
    },
}

/// Validates an [`Action`] against the per-kind rule table.
#[must_use]
pub fn validate(device: &Device, action: &Action) -> Verdict {
    match (device.kind, action) {
        (DeviceKind::Thermostat, Action::SetTemperature { value }) => {
            set_temperature(device, *value)
        }
        (DeviceKind::Light, Action::SetPower { on }) => set_power(device, *on),
        (DeviceKind::Light, Action::SetBrightness { value }) => set_brightness(device, *value),
        _ => Verdict::Rejected {
            reason: format!(
                "{} is a {}, it does not support {}.",
                device.name,
                device.kind,
                action.name()
            ),
        },
    }
}

fn set_temperature(device: &Device, value: i16) -> Verdict {
    if !TEMPERATURE_RANGE.contains(&value) {
        return Verdict::Rejected {
            reason: format!(
                "Temperature {value}°C is outside the safe range ({}-{}).",
                TEMPERATURE_RANGE.start(),
                TEMPERATURE_RANGE.end()
            ),
        };
    }

    Verdict::Apply {
        patch: StatePatch::Temperature(value),
        confirmation: format!("{} set to {value}°C.", device.name),
    }
}

fn set_power(device: &Device, on: bool) -> Verdict {
    let DeviceState::Light { on: current, .. } = device.state else {
        return mismatched_state(device);
    };

    let word = if on { "on" } else { "off" };
    if current == on {
        return Verdict::Unchanged {
            message: format!("{} is already {word}.", device.name),
        };
    }

    Verdict::Apply {
        patch: StatePatch::Power(on),
        confirmation: format!("{} turned {word}.", device.name),
    }
}

fn set_brightness(device: &Device, value: u8) -> Verdict {
    let DeviceState::Light { on, .. } = device.state else {
        return mismatched_state(device);
    };

    if !BRIGHTNESS_RANGE.contains(&value) {
        return Verdict::Rejected {
            reason: format!(
                "Brightness {value} is outside the allowed range ({}-{}).",
                BRIGHTNESS_RANGE.start(),
                BRIGHTNESS_RANGE.end()
            ),
        };
    }

    if !on {
        return Verdict::Rejected {
            reason: format!(
                "{} must be turned on before adjusting its brightness.",
                device.name
            ),
        };
    }

    Verdict::Apply {
        patch: StatePatch::Brightness(value),
        confirmation: format!("{} brightness set to {value}.", device.name),
    }
}

// The registry rejects mismatched states at provisioning time, so this can
// only be reached through a corrupted record.
fn mismatched_state(device: &Device) -> Verdict {
    Verdict::Rejected {
        reason: format!(
            "The state of {} does not match its kind, so the request cannot be applied.",
            device.name
        ),
    }
}
