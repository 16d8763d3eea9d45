//! Room entity - a single game session

use serde::{Deserialize, Serialize};

use crate::{InviteCode, RoomId, RoomName, User, UserId, UserName};

/// A game session owned by its creator.
///
/// # Invariants
///
/// - `creator` is never absent
/// - `invite_code` is unique across rooms when present; `None` disables invites
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    id: RoomId,
    name: RoomName,
    creator: UserId,
    creator_name: UserName,
    invite_code: Option<InviteCode>,
}

impl Room {
    pub fn new(name: RoomName, creator: &User) -> Self {
        Self {
            id: RoomId::new(),
            name,
            creator: creator.id(),
            creator_name: creator.name().clone(),
            invite_code: None,
        }
    }

    /// Rebuild a room from stored fields.
    pub fn from_parts(
        id: RoomId,
        name: RoomName,
        creator: UserId,
        creator_name: UserName,
        invite_code: Option<InviteCode>,
    ) -> Self {
        Self {
            id,
            name,
            creator,
            creator_name,
            invite_code,
        }
    }

    pub fn with_invite_code(mut self, code: InviteCode) -> Self {
        self.invite_code = Some(code);
        self
    }

    #[inline]
    pub fn id(&self) -> RoomId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &RoomName {
        &self.name
    }

    #[inline]
    pub fn creator(&self) -> UserId {
        self.creator
    }

    #[inline]
    pub fn creator_name(&self) -> &UserName {
        &self.creator_name
    }

    #[inline]
    pub fn invite_code(&self) -> Option<&InviteCode> {
        self.invite_code.as_ref()
    }

    /// Whether `user` owns this room. Ownership is independent of membership rows.
    pub fn is_creator(&self, user: UserId) -> bool {
        self.creator == user
    }
}
