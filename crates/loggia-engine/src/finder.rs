use loggia::device::Device;

use crate::error::Result;
use crate::registry::Registry;

/// The maximum number of devices a single selection query may return.
///
/// The cap bounds worst-case work; queries broader than this are expected
/// to be narrowed by the caller on a later turn.
pub const MAX_MATCHES: usize = 10;

/// Resolves a free-text selection query into candidate devices.
///
/// The query is matched case-insensitively as a substring against the
/// device name, the device kind name, and the owning room name,
/// independently: a device matches when any of the three fields contains
/// it. Candidates keep registry order, so ties are broken by ascending
/// identifier, and at most [`MAX_MATCHES`] devices are returned.
///
/// The empty query matches every device. This is deliberate: it serves
/// "list the system state" turns.
///
/// # Errors
///
/// An error is returned when the registry cannot be read.
pub async fn find<R: Registry>(registry: &R, query: &str) -> Result<Vec<Device>> {
    let query = query.trim().to_lowercase();

    let devices = registry.list().await?;
    Ok(devices
        .into_iter()
        .filter(|device| matches(device, &query))
        .take(MAX_MATCHES)
        .collect())
}

fn matches(device: &Device, query: &str) -> bool {
    device.name.to_lowercase().contains(query)
        || device.kind.name().contains(query)
        || device.room.name.to_lowercase().contains(query)
}

#[cfg(test)]
mod tests {
    use loggia::device::DeviceKind;
    use loggia::state::DeviceState;

    use crate::registry::MemoryRegistry;
    use crate::tests::demo_registry;

    use super::{MAX_MATCHES, find};

    #[tokio::test]
    async fn test_match_by_name_kind_and_room() {
        let registry = demo_registry().await;

        // Device name fragment.
        let matches = find(&registry, "bedroom light").await.unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].name, "Bedroom Light");

        // Device kind.
        let matches = find(&registry, "thermostat").await.unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].name, "Living Room Thermostat");

        // Room name: matches every device of the room.
        let matches = find(&registry, "living room").await.unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].name, "Living Room Light");
        assert_eq!(matches[1].name, "Living Room Thermostat");
    }

    #[tokio::test]
    async fn test_matching_is_case_insensitive() {
        let registry = demo_registry().await;

        let matches = find(&registry, "LIVING ROOM THERMOSTAT").await.unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].name, "Living Room Thermostat");
    }

    #[tokio::test]
    async fn test_empty_query_matches_every_device() {
        let registry = demo_registry().await;

        let matches = find(&registry, "").await.unwrap();
        assert_eq!(matches.len(), 3);

        // Registry order, identifiers ascending.
        let ids: Vec<u32> = matches.iter().map(|d| d.id.value()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_no_match() {
        let registry = demo_registry().await;

        let matches = find(&registry, "garage door").await.unwrap();
        assert!(matches.is_empty());
    }

    #[tokio::test]
    async fn test_matches_are_capped() {
        let registry = MemoryRegistry::new();
        let room = registry.add_room("Hall").await.unwrap();
        for n in 0..MAX_MATCHES + 5 {
            let _ = registry
                .add_device(
                    &format!("Hall Light {n}"),
                    DeviceKind::Light,
                    &room,
                    DeviceState::light(false, 0),
                )
                .await
                .unwrap();
        }

        let matches = find(&registry, "hall").await.unwrap();
        assert_eq!(matches.len(), MAX_MATCHES);
    }
}
