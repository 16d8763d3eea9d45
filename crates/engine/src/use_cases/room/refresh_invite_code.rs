//! Refresh invite code use case.

use std::sync::Arc;

use tabletop_domain::{InviteCode, User};

use crate::infrastructure::ports::{RandomPort, RoomRepo};

use super::error::RoomError;

/// Replaces a room's invitation code with a fresh random one.
pub struct RefreshInviteCode {
    rooms: Arc<dyn RoomRepo>,
    random: Arc<dyn RandomPort>,
}

impl RefreshInviteCode {
    pub fn new(rooms: Arc<dyn RoomRepo>, random: Arc<dyn RandomPort>) -> Self {
        Self { rooms, random }
    }

    /// Only the room's creator may rotate the code. Old codes stop working.
    pub async fn execute(
        &self,
        actor: &User,
        creator_name: &str,
        room_name: &str,
    ) -> Result<InviteCode, RoomError> {
        let room = self
            .rooms
            .find_by_creator_and_name(creator_name, room_name)
            .await?
            .ok_or(RoomError::NotFound)?;

        if !room.is_creator(actor.id()) {
            return Err(RoomError::NotCreator);
        }

        let code = InviteCode::new(self.random.gen_uuid().simple().to_string())?;
        self.rooms
            .set_invite_code(room.id(), Some(code.clone()))
            .await?;
        tracing::info!(room_id = %room.id(), "Invite code refreshed");
        Ok(code)
    }
}
