//! Session use cases.
//!
//! Orchestrates session-level flows (claiming invites, admitting members).

use std::sync::Arc;

mod join_room;

pub use join_room::{inherit_location, session_url, JoinRoom, JoinRoomError, JoinRoomResult};

/// Container for session use cases.
pub struct SessionUseCases {
    pub join_room: Arc<JoinRoom>,
}

impl SessionUseCases {
    pub fn new(join_room: Arc<JoinRoom>) -> Self {
        Self { join_room }
    }
}
