//! Create room use case.

use std::sync::Arc;

use tabletop_domain::{Location, LocationName, PlayerRoom, Role, Room, RoomName, User};

use crate::infrastructure::ports::RoomRepo;
use crate::use_cases::session::session_url;

use super::error::RoomError;

const FIRST_LOCATION_NAME: &str = "Start";

#[derive(Debug, Clone)]
pub struct CreatedRoom {
    pub room: Room,
    pub location: Location,
    pub membership: PlayerRoom,
    pub session_url: String,
}

/// Creates a room with its first location and seats the creator as DM there.
pub struct CreateRoom {
    rooms: Arc<dyn RoomRepo>,
}

impl CreateRoom {
    pub fn new(rooms: Arc<dyn RoomRepo>) -> Self {
        Self { rooms }
    }

    pub async fn execute(&self, creator: &User, name: &str) -> Result<CreatedRoom, RoomError> {
        let name = RoomName::new(name)?;
        if self
            .rooms
            .find_by_creator_and_name(creator.name().as_str(), name.as_str())
            .await?
            .is_some()
        {
            return Err(RoomError::AlreadyExists);
        }

        let room = Room::new(name, creator);
        let location = Location::new(room.id(), LocationName::new(FIRST_LOCATION_NAME)?);
        let membership = PlayerRoom::new(creator.id(), room.id(), Role::Dm, location.id());
        self.rooms
            .create_with_owner(&room, &location, &membership)
            .await
            .map_err(|e| {
                if e.is_constraint() {
                    RoomError::AlreadyExists
                } else {
                    RoomError::Repo(e)
                }
            })?;

        tracing::info!(
            room_id = %room.id(),
            creator = %creator.name(),
            name = %room.name(),
            "Room created"
        );
        let session_url = session_url(room.creator_name(), room.name());
        Ok(CreatedRoom {
            room,
            location,
            membership,
            session_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{MockRoomRepo, RepoError};
    use tabletop_domain::UserName;

    fn alice() -> User {
        User::new(UserName::new("alice").unwrap())
    }

    #[tokio::test]
    async fn creator_becomes_dm_at_the_first_location() {
        let alice = alice();
        let alice_id = alice.id();

        let mut rooms = MockRoomRepo::new();
        rooms
            .expect_find_by_creator_and_name()
            .returning(|_, _| Ok(None));
        rooms
            .expect_create_with_owner()
            .withf(move |room, location, owner| {
                owner.user_id() == alice_id
                    && owner.role() == Role::Dm
                    && owner.room_id() == room.id()
                    && owner.active_location() == location.id()
            })
            .times(1)
            .returning(|_, _, _| Ok(()));

        let use_case = CreateRoom::new(Arc::new(rooms));
        let created = use_case.execute(&alice, "Tavern").await.unwrap();

        assert_eq!(created.membership.active_location(), created.location.id());
        assert_eq!(created.location.room_id(), created.room.id());
        assert_eq!(created.location.name().as_str(), FIRST_LOCATION_NAME);
        assert_eq!(created.session_url, "/game/alice/Tavern");
        assert!(created.room.invite_code().is_none());
    }

    #[tokio::test]
    async fn duplicate_name_for_same_creator_is_rejected() {
        let alice = alice();
        let existing = Room::new(RoomName::new("Tavern").unwrap(), &alice);

        let mut rooms = MockRoomRepo::new();
        rooms
            .expect_find_by_creator_and_name()
            .returning(move |_, _| Ok(Some(existing.clone())));
        rooms.expect_create_with_owner().never();

        let use_case = CreateRoom::new(Arc::new(rooms));
        let err = use_case.execute(&alice, "Tavern").await.unwrap_err();
        assert!(matches!(err, RoomError::AlreadyExists));
    }

    #[tokio::test]
    async fn losing_a_concurrent_create_is_already_exists() {
        let mut rooms = MockRoomRepo::new();
        rooms
            .expect_find_by_creator_and_name()
            .returning(|_, _| Ok(None));
        rooms
            .expect_create_with_owner()
            .returning(|_, _, _| Err(RepoError::constraint("rooms.create: UNIQUE")));

        let use_case = CreateRoom::new(Arc::new(rooms));
        let err = use_case.execute(&alice(), "Tavern").await.unwrap_err();
        assert!(matches!(err, RoomError::AlreadyExists));
    }

    #[tokio::test]
    async fn storage_failure_is_surfaced() {
        let mut rooms = MockRoomRepo::new();
        rooms
            .expect_find_by_creator_and_name()
            .returning(|_, _| Ok(None));
        rooms
            .expect_create_with_owner()
            .returning(|_, _, _| Err(RepoError::database("rooms.create", "disk I/O error")));

        let use_case = CreateRoom::new(Arc::new(rooms));
        let err = use_case.execute(&alice(), "Tavern").await.unwrap_err();
        assert!(matches!(err, RoomError::Repo(_)));
    }
}
