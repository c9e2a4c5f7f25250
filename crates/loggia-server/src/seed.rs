use loggia::access::Role;
use loggia::device::DeviceKind;
use loggia::state::DeviceState;

use loggia_engine::error::Result;
use loggia_engine::registry::{MemoryRegistry, Registry};

use tracing::info;

/// Provisions the demo home layout into an empty registry.
///
/// Two users share two rooms: `sef` owns both, `guest` may control the
/// living room. The layout covers the interesting selection cases, with
/// two lights ambiguous by kind and one thermostat unique per room.
///
/// A registry that already holds devices, for instance one restored from
/// a journal, is left untouched.
///
/// # Errors
///
/// An error is returned when the registry cannot be read or written.
pub async fn demo_home(registry: &MemoryRegistry) -> Result<()> {
    if !registry.list().await?.is_empty() {
        info!("registry already provisioned, keeping it");
        return Ok(());
    }

    let sef = registry.add_user("sef").await?;
    let guest = registry.add_user("guest").await?;

    let living = registry.add_room("Living Room").await?;
    let bedroom = registry.add_room("Bedroom").await?;

    let _ = registry.grant(&sef, &living, Role::Owner).await?;
    let _ = registry.grant(&sef, &bedroom, Role::Owner).await?;
    let _ = registry.grant(&guest, &living, Role::Controller).await?;

    let _ = registry
        .add_device(
            "Living Room Light",
            DeviceKind::Light,
            &living,
            DeviceState::light(false, 70),
        )
        .await?;
    let _ = registry
        .add_device(
            "Living Room Thermostat",
            DeviceKind::Thermostat,
            &living,
            DeviceState::thermostat(21),
        )
        .await?;
    let _ = registry
        .add_device(
            "Bedroom Light",
            DeviceKind::Light,
            &bedroom,
            DeviceState::light(true, 40),
        )
        .await?;

    info!("demo home provisioned");
    Ok(())
}

#[cfg(test)]
mod tests {
    use loggia::state::DeviceState;

    use loggia_engine::registry::{MemoryRegistry, Registry};

    use super::demo_home;

    #[tokio::test]
    async fn test_demo_home_layout() {
        let registry = MemoryRegistry::new();
        demo_home(&registry).await.unwrap();

        assert_eq!(registry.users().await.len(), 2);
        assert_eq!(registry.rooms().await.len(), 2);
        assert_eq!(registry.memberships().await.len(), 3);

        let devices = registry.list().await.unwrap();
        assert_eq!(devices.len(), 3);
        assert_eq!(devices[0].name, "Living Room Light");
        assert_eq!(devices[0].state, DeviceState::light(false, 70));
        assert_eq!(devices[1].state, DeviceState::thermostat(21));
        assert_eq!(devices[2].state, DeviceState::light(true, 40));
    }

    #[tokio::test]
    async fn test_demo_home_keeps_a_provisioned_registry() {
        let registry = MemoryRegistry::new();
        demo_home(&registry).await.unwrap();
        demo_home(&registry).await.unwrap();

        assert_eq!(registry.list().await.unwrap().len(), 3);
        assert_eq!(registry.users().await.len(), 2);
    }
}
