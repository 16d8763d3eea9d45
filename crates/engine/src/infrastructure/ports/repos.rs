//! Repository port traits for database access.

use async_trait::async_trait;
use tabletop_domain::{
    InviteCode, Label, LabelId, LabelSelection, Location, LocationId, PlayerRoom, Role, Room,
    RoomId, User, UserId, UserOptions,
};

use super::error::RepoError;

// =============================================================================
// Users
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepo: Send + Sync {
    /// Case-insensitive lookup by name.
    async fn find_by_name(&self, name: &str) -> Result<Option<User>, RepoError>;
    async fn create(&self, user: &User) -> Result<(), RepoError>;
    /// Replace the display defaults stored for a user.
    async fn set_default_options(
        &self,
        id: UserId,
        options: &UserOptions,
    ) -> Result<(), RepoError>;
}

// =============================================================================
// Rooms and locations
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoomRepo: Send + Sync {
    async fn find_by_invite_code(&self, code: &InviteCode) -> Result<Option<Room>, RepoError>;
    /// Resolve a room by its creator's name (case-insensitive) and its own name.
    async fn find_by_creator_and_name(
        &self,
        creator_name: &str,
        room_name: &str,
    ) -> Result<Option<Room>, RepoError>;
    /// Store a room together with its first location and the creator's
    /// membership. Either all three rows are written or none is.
    ///
    /// Fails with `RepoError::ConstraintViolation` if the creator already has
    /// a room with this name.
    async fn create_with_owner(
        &self,
        room: &Room,
        location: &Location,
        owner: &PlayerRoom,
    ) -> Result<(), RepoError>;
    async fn set_invite_code(
        &self,
        room_id: RoomId,
        code: Option<InviteCode>,
    ) -> Result<(), RepoError>;
}

// =============================================================================
// Memberships (PlayerRoom)
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MembershipRepo: Send + Sync {
    async fn find(&self, user_id: UserId, room_id: RoomId)
        -> Result<Option<PlayerRoom>, RepoError>;
    /// Fails with `RepoError::ConstraintViolation` if the user already has a
    /// membership in the room.
    async fn create(&self, membership: &PlayerRoom) -> Result<(), RepoError>;
    /// Active location of the earliest-created member holding `role`.
    async fn first_location_with_role(
        &self,
        room_id: RoomId,
        role: Role,
    ) -> Result<Option<LocationId>, RepoError>;
}

// =============================================================================
// Labels
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LabelRepo: Send + Sync {
    async fn get(&self, id: LabelId) -> Result<Option<Label>, RepoError>;
    async fn create(&self, label: &Label) -> Result<(), RepoError>;
    /// Removes the label and every selection that references it.
    ///
    /// Returns the visibility the label had when it was removed, or `None`
    /// if there was nothing to remove.
    async fn delete(&self, id: LabelId) -> Result<Option<bool>, RepoError>;
    /// Write the visibility flag and report whether it actually flipped.
    ///
    /// The check and the write are one statement, so two concurrent writers
    /// can never both observe the same previous value.
    async fn set_visibility(&self, id: LabelId, visible: bool) -> Result<bool, RepoError>;
    async fn add_selection(&self, selection: &LabelSelection) -> Result<(), RepoError>;
    /// Returns whether a selection was removed.
    async fn remove_selection(&self, selection: &LabelSelection) -> Result<bool, RepoError>;
    async fn list_selections(
        &self,
        user_id: UserId,
        room_id: RoomId,
    ) -> Result<Vec<LabelId>, RepoError>;
}
