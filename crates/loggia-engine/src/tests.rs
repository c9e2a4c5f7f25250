use loggia::access::Role;
use loggia::device::DeviceKind;
use loggia::state::DeviceState;

use crate::registry::MemoryRegistry;

// The demo home layout: two users, two rooms, three devices.
pub(crate) async fn demo_registry() -> MemoryRegistry {
    let registry = MemoryRegistry::new();

    let sef = registry.add_user("sef").await.unwrap();
    let guest = registry.add_user("guest").await.unwrap();

    let living = registry.add_room("Living Room").await.unwrap();
    let bedroom = registry.add_room("Bedroom").await.unwrap();

    let _ = registry.grant(&sef, &living, Role::Owner).await.unwrap();
    let _ = registry.grant(&sef, &bedroom, Role::Owner).await.unwrap();
    let _ = registry
        .grant(&guest, &living, Role::Controller)
        .await
        .unwrap();

    let _ = registry
        .add_device(
            "Living Room Light",
            DeviceKind::Light,
            &living,
            DeviceState::light(false, 70),
        )
        .await
        .unwrap();
    let _ = registry
        .add_device(
            "Living Room Thermostat",
            DeviceKind::Thermostat,
            &living,
            DeviceState::thermostat(21),
        )
        .await
        .unwrap();
    let _ = registry
        .add_device(
            "Bedroom Light",
            DeviceKind::Light,
            &bedroom,
            DeviceState::light(true, 40),
        )
        .await
        .unwrap();

    registry
}
