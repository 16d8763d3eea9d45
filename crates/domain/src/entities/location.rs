//! Location entity - a scene within a room

use serde::{Deserialize, Serialize};

use crate::{LocationId, LocationName, RoomId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    id: LocationId,
    room_id: RoomId,
    name: LocationName,
}

impl Location {
    pub fn new(room_id: RoomId, name: LocationName) -> Self {
        Self {
            id: LocationId::new(),
            room_id,
            name,
        }
    }

    pub fn with_id(mut self, id: LocationId) -> Self {
        self.id = id;
        self
    }

    #[inline]
    pub fn id(&self) -> LocationId {
        self.id
    }

    #[inline]
    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    #[inline]
    pub fn name(&self) -> &LocationName {
        &self.name
    }
}
