//! Room administration use cases.

use std::sync::Arc;

mod create_room;
mod error;
mod refresh_invite_code;

pub use create_room::{CreateRoom, CreatedRoom};
pub use error::RoomError;
pub use refresh_invite_code::RefreshInviteCode;

/// Container for room use cases.
pub struct RoomUseCases {
    pub create: Arc<CreateRoom>,
    pub refresh_invite_code: Arc<RefreshInviteCode>,
}

impl RoomUseCases {
    pub fn new(create: Arc<CreateRoom>, refresh_invite_code: Arc<RefreshInviteCode>) -> Self {
        Self {
            create,
            refresh_invite_code,
        }
    }
}
