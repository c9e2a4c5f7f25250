use loggia::action::Action;
use loggia::device::{Device, DeviceId};

use tracing::{info, warn};

use crate::error::Result;
use crate::registry::Registry;
use crate::validator::{self, Verdict};

/// The outcome of executing one action against one device.
///
/// Rejections and redundant requests are outcomes too: the caller must
/// still be able to report why nothing changed, along with the unchanged
/// device.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    /// Human-readable confirmation or rejection message.
    pub message: String,
    /// The device as persisted after the execution. Equals the prior
    /// state when nothing changed.
    pub device: Device,
    /// Whether the execution mutated the device.
    pub changed: bool,
}

/// Applies an [`Action`] to the device with the given identifier.
///
/// The device is looked up again here: the identifier comes from an
/// untrusted upstream and may have vanished between resolution and
/// execution. On acceptance the validated patch is merged and persisted
/// through the registry, which linearizes concurrent updates to the same
/// device.
///
/// # Errors
///
/// - No device carries the identifier
/// - The underlying store could not be read or written; in that case no
///   partial state is left committed.
pub async fn execute<R: Registry>(registry: &R, id: DeviceId, action: &Action) -> Result<Outcome> {
    let device = registry.get(id).await?;

    match validator::validate(&device, action) {
        Verdict::Apply {
            patch,
            confirmation,
        } => {
            let updated = registry.update_state(id, patch).await?;
            info!(
                device = %updated.name,
                action = action.name(),
                "command executed"
            );
            Ok(Outcome {
                message: confirmation,
                device: updated,
                changed: true,
            })
        }
        Verdict::Unchanged { message } => {
            info!(
                device = %device.name,
                action = action.name(),
                "command was a no-op"
            );
            Ok(Outcome {
                message,
                device,
                changed: false,
            })
        }
        Verdict::Rejected { reason } => {
            warn!(
                device = %device.name,
                action = action.name(),
                %reason,
                "command rejected"
            );
            Ok(Outcome {
                message: reason,
                device,
                changed: false,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use loggia::action::Action;
    use loggia::device::DeviceId;
    use loggia::state::DeviceState;

    use crate::error::ErrorKind;
    use crate::registry::Registry;
    use crate::tests::demo_registry;

    use super::execute;

    #[tokio::test]
    async fn test_execute_persists_accepted_actions() {
        let registry = demo_registry().await;

        let outcome = execute(
            &registry,
            DeviceId::new(2),
            &Action::SetTemperature { value: 24 },
        )
        .await
        .unwrap();

        assert!(outcome.changed);
        assert_eq!(outcome.message, "Living Room Thermostat set to 24°C.");
        assert_eq!(outcome.device.state, DeviceState::thermostat(24));

        // The registry observed the commit.
        let stored = registry.get(DeviceId::new(2)).await.unwrap();
        assert_eq!(stored.state, DeviceState::thermostat(24));
    }

    #[tokio::test]
    async fn test_execute_is_idempotent_for_equal_values() {
        let registry = demo_registry().await;

        for _ in 0..2 {
            let outcome = execute(
                &registry,
                DeviceId::new(2),
                &Action::SetTemperature { value: 21 },
            )
            .await
            .unwrap();

            assert_eq!(outcome.message, "Living Room Thermostat set to 21°C.");
            assert_eq!(outcome.device.state, DeviceState::thermostat(21));
        }
    }

    #[tokio::test]
    async fn test_execute_returns_the_prior_state_on_rejection() {
        let registry = demo_registry().await;

        // Living Room Light is off: brightness is rejected.
        let outcome = execute(
            &registry,
            DeviceId::new(1),
            &Action::SetBrightness { value: 50 },
        )
        .await
        .unwrap();

        assert!(!outcome.changed);
        assert_eq!(
            outcome.message,
            "Living Room Light must be turned on before adjusting its brightness."
        );
        assert_eq!(outcome.device.state, DeviceState::light(false, 70));

        let stored = registry.get(DeviceId::new(1)).await.unwrap();
        assert_eq!(stored.state, DeviceState::light(false, 70));
    }

    #[tokio::test]
    async fn test_execute_on_a_vanished_device() {
        let registry = demo_registry().await;

        let error = execute(&registry, DeviceId::new(9), &Action::SetPower { on: true })
            .await
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::NotFound);
    }
}
