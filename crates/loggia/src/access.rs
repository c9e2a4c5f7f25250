use alloc::string::String;

use serde::{Deserialize, Serialize};

use crate::device::RoomId;

/// All [`Role`]s.
pub const ALL_ROLES: &[Role] = &[Role::Owner, Role::Controller, Role::Viewer];

/// The identifier of a [`User`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(u32);

impl core::fmt::Display for UserId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.0.fmt(f)
    }
}

impl UserId {
    /// Creates a [`UserId`].
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

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User identifier.
    pub id: UserId,
    /// Unique username.
    pub username: String,
}

impl User {
    /// Creates a [`User`].
    #[must_use]
    #[inline]
    pub const fn new(id: UserId, username: String) -> Self {
        Self { id, username }
    }
}

/// The role a user holds within a room.
///
/// Roles are ownership and permission data carried for a future
/// authorization layer. The resolution engine preserves them but never
/// enforces them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full control of the room, including granting access to others.
    Owner,
    /// May control the devices of the room.
    Controller,
    /// May observe the devices of the room.
    Viewer,
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.name().fmt(f)
    }
}

impl Role {
    /// Returns the [`Role`] name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Controller => "controller",
            Self::Viewer => "viewer",
        }
    }
}

/// The membership of a user in a room, with the role held there.
///
/// A user maps to zero or more rooms; each pair carries exactly one role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    /// Member user.
    pub user_id: UserId,
    /// Room the user belongs to.
    pub room_id: RoomId,
    /// Role held in the room.
    pub role: Role,
}

impl Membership {
    /// Creates a [`Membership`].
    #[must_use]
    #[inline]
    pub const fn new(user_id: UserId, room_id: RoomId, role: Role) -> Self {
        Self {
            user_id,
            room_id,
            role,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::device::RoomId;
    use crate::{deserialize, serialize};

    use super::{ALL_ROLES, Membership, Role, UserId};

    #[test]
    fn test_role() {
        for role in ALL_ROLES {
            assert_eq!(deserialize::<Role>(serialize(role)), *role);
        }

        assert_eq!(serialize(Role::Owner), serde_json::json!("owner"));
    }

    #[test]
    fn test_membership() {
        let membership = Membership::new(UserId::new(2), RoomId::new(1), Role::Controller);

        assert_eq!(
            serialize(&membership),
            serde_json::json!({
                "user_id": 2,
                "room_id": 1,
                "role": "controller",
            })
        );
        assert_eq!(deserialize::<Membership>(serialize(&membership)), membership);
    }
}
