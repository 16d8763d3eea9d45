//! PlayerRoom - membership edge between a user and a room

use serde::{Deserialize, Serialize};

use crate::{LocationId, PlayerRoomId, Role, RoomId, UserId};

/// A user's membership in a room.
///
/// # Invariants
///
/// - at most one membership per (user, room) pair (enforced by the store)
/// - `active_location` is always set once joined
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRoom {
    id: PlayerRoomId,
    user_id: UserId,
    room_id: RoomId,
    role: Role,
    active_location: LocationId,
}

impl PlayerRoom {
    pub fn new(user_id: UserId, room_id: RoomId, role: Role, active_location: LocationId) -> Self {
        Self {
            id: PlayerRoomId::new(),
            user_id,
            room_id,
            role,
            active_location,
        }
    }

    pub fn with_id(mut self, id: PlayerRoomId) -> Self {
        self.id = id;
        self
    }

    #[inline]
    pub fn id(&self) -> PlayerRoomId {
        self.id
    }

    #[inline]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    #[inline]
    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    #[inline]
    pub fn role(&self) -> Role {
        self.role
    }

    #[inline]
    pub fn active_location(&self) -> LocationId {
        self.active_location
    }
}
