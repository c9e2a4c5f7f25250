use std::fs;
use std::path::PathBuf;

use loggia::access::{Membership, Role, User, UserId};
use loggia::device::{Device, DeviceId, DeviceKind, Room, RoomId};
use loggia::state::{DeviceState, StatePatch};

use indexmap::IndexMap;

use serde::{Deserialize, Serialize};

use tokio::sync::RwLock;

use tracing::debug;

use crate::error::{Error, ErrorKind, Result};

fn not_found(entity: &str, id: impl std::fmt::Display) -> Error {
    Error::new(
        ErrorKind::NotFound,
        format!("No {entity} with identifier `{id}`."),
    )
}

/// The durable store of rooms, devices, and device state.
///
/// The registry is the only component allowed to mutate a device. Updates
/// to the same device are linearized: each accepted patch is merged into
/// the state read at the time it runs, and the merge together with its
/// persistence is atomic relative to other updates to that device.
pub trait Registry: Send + Sync {
    /// Returns the [`Device`] with the given identifier.
    ///
    /// # Errors
    ///
    /// An error is returned when no device carries the identifier.
    fn get(&self, id: DeviceId) -> impl Future<Output = Result<Device>> + Send;

    /// Returns all registered [`Device`]s, in stable registration order.
    ///
    /// The returned sequence reflects all updates committed before the
    /// call.
    ///
    /// # Errors
    ///
    /// An error is returned when the underlying store cannot be read.
    fn list(&self) -> impl Future<Output = Result<Vec<Device>>> + Send;

    /// Merges a [`StatePatch`] into the state of the device with the given
    /// identifier, persists the result, and returns the updated [`Device`].
    ///
    /// # Errors
    ///
    /// - No device carries the identifier
    /// - The patch does not fit the state of the device
    /// - The updated state could not be persisted; in that case the stored
    ///   state is left unchanged.
    fn update_state(
        &self,
        id: DeviceId,
        patch: StatePatch,
    ) -> impl Future<Output = Result<Device>> + Send;
}

#[derive(Debug, Default)]
struct Inner {
    rooms: IndexMap<RoomId, Room>,
    devices: IndexMap<DeviceId, Device>,
    users: Vec<User>,
    memberships: Vec<Membership>,
    next_room_id: u32,
    next_device_id: u32,
    next_user_id: u32,
}

// The journal row layout. Maps are journaled as plain sequences so that
// the file stays readable and diffable.
#[derive(Debug, Default, Serialize, Deserialize)]
struct JournalRecord {
    rooms: Vec<Room>,
    devices: Vec<Device>,
    users: Vec<User>,
    memberships: Vec<Membership>,
}

impl JournalRecord {
    fn from_inner(inner: &Inner) -> Self {
        Self {
            rooms: inner.rooms.values().cloned().collect(),
            devices: inner.devices.values().cloned().collect(),
            users: inner.users.clone(),
            memberships: inner.memberships.clone(),
        }
    }

    fn into_inner(self) -> Inner {
        let next_room_id = self.rooms.iter().map(|r| r.id.value() + 1).max();
        let next_device_id = self.devices.iter().map(|d| d.id.value() + 1).max();
        let next_user_id = self.users.iter().map(|u| u.id.value() + 1).max();
        Inner {
            rooms: self.rooms.into_iter().map(|r| (r.id, r)).collect(),
            devices: self.devices.into_iter().map(|d| (d.id, d)).collect(),
            users: self.users,
            memberships: self.memberships,
            next_room_id: next_room_id.unwrap_or(1),
            next_device_id: next_device_id.unwrap_or(1),
            next_user_id: next_user_id.unwrap_or(1),
        }
    }
}

/// An in-memory [`Registry`] with an optional on-disk journal.
///
/// All records live in insertion-ordered maps behind a single read-write
/// lock, so identifier order and registration order coincide. When a
/// journal path is configured, every committed change is written to disk
/// before the mutating call returns; a failed write rolls the in-memory
/// change back, leaving no partial state committed.
#[derive(Debug)]
pub struct MemoryRegistry {
    inner: RwLock<Inner>,
    journal: Option<PathBuf>,
}

impl Default for MemoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRegistry {
    /// Creates an empty [`MemoryRegistry`] without a journal.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                next_room_id: 1,
                next_device_id: 1,
                next_user_id: 1,
                ..Inner::default()
            }),
            journal: None,
        }
    }

    /// Creates a [`MemoryRegistry`] journaled to the given path.
    ///
    /// When the path already holds a journal, the registry is restored
    /// from it; identifiers continue after the highest restored one.
    ///
    /// # Errors
    ///
    /// An error is returned when an existing journal cannot be read or
    /// parsed.
    pub fn with_journal(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let inner = if path.exists() {
            let bytes = fs::read(&path).map_err(|e| {
                Error::new(
                    ErrorKind::Persistence,
                    format!("Failed to read the journal at `{}`: {e}.", path.display()),
                )
            })?;
            let record: JournalRecord = serde_json::from_slice(&bytes).map_err(|e| {
                Error::new(
                    ErrorKind::Persistence,
                    format!("Failed to parse the journal at `{}`: {e}.", path.display()),
                )
            })?;
            record.into_inner()
        } else {
            Inner {
                next_room_id: 1,
                next_device_id: 1,
                next_user_id: 1,
                ..Inner::default()
            }
        };

        Ok(Self {
            inner: RwLock::new(inner),
            journal: Some(path),
        })
    }

    /// Registers a [`Room`].
    ///
    /// # Errors
    ///
    /// An error is returned when the journal cannot be written.
    pub async fn add_room(&self, name: &str) -> Result<Room> {
        let mut inner = self.inner.write().await;

        let room = Room::new(RoomId::new(inner.next_room_id), name.to_string());
        inner.next_room_id += 1;
        let _ = inner.rooms.insert(room.id, room.clone());

        self.persist_or_rollback(&mut inner, |inner| {
            let _ = inner.rooms.shift_remove(&room.id);
            inner.next_room_id -= 1;
        })?;

        Ok(room)
    }

    /// Registers a [`User`].
    ///
    /// # Errors
    ///
    /// An error is returned when the journal cannot be written.
    pub async fn add_user(&self, username: &str) -> Result<User> {
        let mut inner = self.inner.write().await;

        let user = User::new(UserId::new(inner.next_user_id), username.to_string());
        inner.next_user_id += 1;
        inner.users.push(user.clone());

        self.persist_or_rollback(&mut inner, |inner| {
            let _ = inner.users.pop();
            inner.next_user_id -= 1;
        })?;

        Ok(user)
    }

    /// Grants a user the given [`Role`] within a room.
    ///
    /// The membership is context for a future authorization layer; the
    /// engine never enforces it.
    ///
    /// # Errors
    ///
    /// - The room or the user is not registered
    /// - The journal cannot be written.
    pub async fn grant(&self, user: &User, room: &Room, role: Role) -> Result<Membership> {
        let mut inner = self.inner.write().await;

        if !inner.rooms.contains_key(&room.id) {
            return Err(not_found("room", room.id));
        }
        if !inner.users.iter().any(|u| u.id == user.id) {
            return Err(not_found("user", user.id));
        }

        let membership = Membership::new(user.id, room.id, role);
        inner.memberships.push(membership.clone());

        self.persist_or_rollback(&mut inner, |inner| {
            let _ = inner.memberships.pop();
        })?;

        Ok(membership)
    }

    /// Registers a [`Device`] within a room.
    ///
    /// The initial state must fit the device kind; devices of an
    /// unvalidated kind cannot be registered.
    ///
    /// # Errors
    ///
    /// - The room is not registered
    /// - The initial state does not fit the device kind
    /// - The journal cannot be written.
    pub async fn add_device(
        &self,
        name: &str,
        kind: DeviceKind,
        room: &Room,
        state: DeviceState,
    ) -> Result<Device> {
        if !state_fits(kind, &state) {
            return Err(Error::new(
                ErrorKind::State,
                format!("The initial state of `{name}` does not fit the `{kind}` kind."),
            ));
        }

        let mut inner = self.inner.write().await;

        let room = inner
            .rooms
            .get(&room.id)
            .ok_or_else(|| not_found("room", room.id))?
            .clone();

        let device = Device::new(
            DeviceId::new(inner.next_device_id),
            name.to_string(),
            kind,
            room,
            state,
        );
        inner.next_device_id += 1;
        let _ = inner.devices.insert(device.id, device.clone());

        self.persist_or_rollback(&mut inner, |inner| {
            let _ = inner.devices.shift_remove(&device.id);
            inner.next_device_id -= 1;
        })?;

        Ok(device)
    }

    /// Returns all registered [`Room`]s, in registration order.
    pub async fn rooms(&self) -> Vec<Room> {
        self.inner.read().await.rooms.values().cloned().collect()
    }

    /// Returns all registered [`User`]s, in registration order.
    pub async fn users(&self) -> Vec<User> {
        self.inner.read().await.users.clone()
    }

    /// Returns all registered [`Membership`]s.
    pub async fn memberships(&self) -> Vec<Membership> {
        self.inner.read().await.memberships.clone()
    }

    fn persist_or_rollback<F>(&self, inner: &mut Inner, rollback: F) -> Result<()>
    where
        F: FnOnce(&mut Inner),
    {
        match self.persist(inner) {
            Ok(()) => Ok(()),
            Err(e) => {
                rollback(inner);
                Err(e)
            }
        }
    }

    fn persist(&self, inner: &Inner) -> Result<()> {
        let Some(ref path) = self.journal else {
            return Ok(());
        };

        let record = JournalRecord::from_inner(inner);
        let bytes = serde_json::to_vec_pretty(&record).map_err(|e| {
            Error::new(
                ErrorKind::Persistence,
                format!("Failed to serialize the journal: {e}."),
            )
        })?;

        fs::write(path, bytes).map_err(|e| {
            Error::new(
                ErrorKind::Persistence,
                format!("Failed to write the journal at `{}`: {e}.", path.display()),
            )
        })?;

        debug!("Journal written to `{}`", path.display());
        Ok(())
    }
}

const fn state_fits(kind: DeviceKind, state: &DeviceState) -> bool {
    matches!(
        (kind, state),
        (DeviceKind::Light, DeviceState::Light { .. })
            | (DeviceKind::Thermostat, DeviceState::Thermostat { .. })
    )
}

impl Registry for MemoryRegistry {
    async fn get(&self, id: DeviceId) -> Result<Device> {
        self.inner
            .read()
            .await
            .devices
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found("device", id))
    }

    async fn list(&self) -> Result<Vec<Device>> {
        Ok(self.inner.read().await.devices.values().cloned().collect())
    }

    async fn update_state(&self, id: DeviceId, patch: StatePatch) -> Result<Device> {
        // The write guard is held across read-modify-write-persist, so
        // concurrent updates to the same device are linearized rather than
        // silently lost.
        let mut inner = self.inner.write().await;

        let device = inner.devices.get(&id).ok_or_else(|| not_found("device", id))?;

        let mut updated = device.clone();
        if !updated.state.merge(&patch) {
            return Err(Error::new(
                ErrorKind::State,
                format!("Patch {patch:?} does not fit the state of `{}`.", updated.name),
            ));
        }

        let previous = inner.devices.insert(id, updated.clone());
        self.persist_or_rollback(&mut inner, |inner| {
            if let Some(previous) = previous {
                let _ = inner.devices.insert(id, previous);
            }
        })?;

        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use loggia::device::{DeviceId, DeviceKind, Room, RoomId};
    use loggia::state::{DeviceState, StatePatch};

    use crate::error::ErrorKind;
    use crate::tests::demo_registry;

    use super::{MemoryRegistry, Registry};

    #[tokio::test]
    async fn test_get_and_list() {
        let registry = demo_registry().await;

        let devices = registry.list().await.unwrap();
        assert_eq!(devices.len(), 3);

        // Registration order and identifier order coincide.
        let ids: Vec<u32> = devices.iter().map(|d| d.id.value()).collect();
        assert_eq!(ids, vec![1, 2, 3]);

        let light = registry.get(DeviceId::new(1)).await.unwrap();
        assert_eq!(light.name, "Living Room Light");
        assert_eq!(light.state, DeviceState::light(false, 70));

        let missing = registry.get(DeviceId::new(7)).await.unwrap_err();
        assert_eq!(missing.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_update_state_merges_atomically() {
        let registry = demo_registry().await;

        let updated = registry
            .update_state(DeviceId::new(1), StatePatch::Power(true))
            .await
            .unwrap();
        assert_eq!(updated.state, DeviceState::light(true, 70));

        let updated = registry
            .update_state(DeviceId::new(1), StatePatch::Brightness(50))
            .await
            .unwrap();
        assert_eq!(updated.state, DeviceState::light(true, 50));

        // The stored record matches what was returned.
        let stored = registry.get(DeviceId::new(1)).await.unwrap();
        assert_eq!(stored.state, DeviceState::light(true, 50));
    }

    #[tokio::test]
    async fn test_update_state_on_a_missing_device() {
        let registry = demo_registry().await;

        let error = registry
            .update_state(DeviceId::new(7), StatePatch::Power(true))
            .await
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_update_state_with_a_mismatched_patch() {
        let registry = demo_registry().await;

        // Device 2 is the thermostat.
        let error = registry
            .update_state(DeviceId::new(2), StatePatch::Power(true))
            .await
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::State);

        let stored = registry.get(DeviceId::new(2)).await.unwrap();
        assert_eq!(stored.state, DeviceState::thermostat(21));
    }

    #[tokio::test]
    async fn test_add_device_checks_room_and_state() {
        let registry = MemoryRegistry::new();
        let room = registry.add_room("Kitchen").await.unwrap();

        let error = registry
            .add_device(
                "Kitchen Light",
                DeviceKind::Light,
                &room,
                DeviceState::thermostat(20),
            )
            .await
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::State);

        let unknown_room = Room::new(RoomId::new(9), "Attic".to_string());
        let error = registry
            .add_device(
                "Attic Light",
                DeviceKind::Light,
                &unknown_room,
                DeviceState::light(false, 0),
            )
            .await
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_journal_round_trip() {
        let path = std::env::temp_dir().join(format!(
            "loggia-registry-journal-{}.json",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);

        {
            let registry = MemoryRegistry::with_journal(&path).unwrap();
            let room = registry.add_room("Living Room").await.unwrap();
            let device = registry
                .add_device(
                    "Living Room Light",
                    DeviceKind::Light,
                    &room,
                    DeviceState::light(false, 70),
                )
                .await
                .unwrap();
            let _ = registry
                .update_state(device.id, StatePatch::Power(true))
                .await
                .unwrap();
        }

        let restored = MemoryRegistry::with_journal(&path).unwrap();
        let devices = restored.list().await.unwrap();
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].state, DeviceState::light(true, 70));

        // Identifiers continue after the restored ones.
        let room = restored.rooms().await[0].clone();
        let new_device = restored
            .add_device(
                "Living Room Thermostat",
                DeviceKind::Thermostat,
                &room,
                DeviceState::thermostat(21),
            )
            .await
            .unwrap();
        assert_eq!(new_device.id, DeviceId::new(2));

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_updates_to_the_same_device_both_survive() {
        let registry = std::sync::Arc::new(demo_registry().await);

        let power = {
            let registry = registry.clone();
            tokio::spawn(async move {
                registry
                    .update_state(DeviceId::new(1), StatePatch::Power(true))
                    .await
            })
        };
        let brightness = {
            let registry = registry.clone();
            tokio::spawn(async move {
                registry
                    .update_state(DeviceId::new(1), StatePatch::Brightness(50))
                    .await
            })
        };

        let _ = power.await.unwrap().unwrap();
        let _ = brightness.await.unwrap().unwrap();

        // Neither update may clobber the other's attribute.
        let device = registry.get(DeviceId::new(1)).await.unwrap();
        assert_eq!(device.state, DeviceState::light(true, 50));
    }
}
