//! Join a room through its invitation code.

use std::sync::Arc;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use tabletop_domain::{
    InviteCode, LocationId, PlayerRoom, Role, Room, RoomId, RoomName, User, UserName,
};

use crate::infrastructure::ports::{MembershipRepo, RepoError, RoomRepo};

/// Everything but unreserved characters is escaped, including `/`.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Client route for a room, both segments percent-encoded.
pub fn session_url(creator: &UserName, room: &RoomName) -> String {
    format!(
        "/game/{}/{}",
        utf8_percent_encode(creator.as_str(), PATH_SEGMENT),
        utf8_percent_encode(room.as_str(), PATH_SEGMENT)
    )
}

/// Starting location for a new member: the earliest player's location,
/// otherwise the earliest DM's.
pub async fn inherit_location(
    memberships: &dyn MembershipRepo,
    room_id: RoomId,
) -> Result<LocationId, JoinRoomError> {
    if let Some(location) = memberships
        .first_location_with_role(room_id, Role::Player)
        .await?
    {
        return Ok(location);
    }
    memberships
        .first_location_with_role(room_id, Role::Dm)
        .await?
        .ok_or(JoinRoomError::InconsistentRoom(room_id))
}

#[derive(Debug, Clone)]
pub struct JoinRoomResult {
    pub room: Room,
    pub session_url: String,
    /// The membership created by this call, if the user was not yet a member.
    pub admitted: Option<PlayerRoom>,
}

#[derive(Debug, thiserror::Error)]
pub enum JoinRoomError {
    #[error("No room for invite code")]
    NotFound,
    #[error("Room {0} has no member to inherit a location from")]
    InconsistentRoom(RoomId),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

/// Use case for claiming an invitation code.
pub struct JoinRoom {
    rooms: Arc<dyn RoomRepo>,
    memberships: Arc<dyn MembershipRepo>,
}

impl JoinRoom {
    pub fn new(rooms: Arc<dyn RoomRepo>, memberships: Arc<dyn MembershipRepo>) -> Self {
        Self { rooms, memberships }
    }

    /// Admit `user` to the room behind `code`.
    ///
    /// The creator and existing members are let through unchanged, so calling
    /// this twice never creates a second membership.
    pub async fn execute(
        &self,
        code: &str,
        user: &User,
    ) -> Result<JoinRoomResult, JoinRoomError> {
        let code = InviteCode::new(code).map_err(|_| JoinRoomError::NotFound)?;
        let room = self
            .rooms
            .find_by_invite_code(&code)
            .await?
            .ok_or(JoinRoomError::NotFound)?;
        let session_url = session_url(room.creator_name(), room.name());

        if room.is_creator(user.id())
            || self.memberships.find(user.id(), room.id()).await?.is_some()
        {
            return Ok(JoinRoomResult {
                room,
                session_url,
                admitted: None,
            });
        }

        let location = inherit_location(self.memberships.as_ref(), room.id()).await?;
        let membership = PlayerRoom::new(user.id(), room.id(), Role::Player, location);
        let admitted = match self.memberships.create(&membership).await {
            Ok(()) => Some(membership),
            // A concurrent join for the same user won the insert.
            Err(e) if e.is_constraint() => None,
            Err(e) => return Err(e.into()),
        };

        if admitted.is_some() {
            tracing::info!(
                user = %user.name(),
                room_id = %room.id(),
                location_id = %location,
                "Player joined room"
            );
        }
        Ok(JoinRoomResult {
            room,
            session_url,
            admitted,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{MockMembershipRepo, MockRoomRepo};

    struct Fixture {
        creator: User,
        room: Room,
    }

    fn fixture() -> Fixture {
        let creator = User::new(UserName::new("A").unwrap());
        let room = Room::new(RoomName::new("Tavern").unwrap(), &creator)
            .with_invite_code(InviteCode::new("abc123").unwrap());
        Fixture { creator, room }
    }

    fn rooms_returning(room: Room) -> MockRoomRepo {
        let mut rooms = MockRoomRepo::new();
        rooms
            .expect_find_by_invite_code()
            .withf(|code| code.as_str() == "abc123")
            .returning(move |_| Ok(Some(room.clone())));
        rooms
    }

    #[test]
    fn session_url_escapes_both_segments() {
        let creator = UserName::new("Dungeon Master").unwrap();
        let room = RoomName::new("Tavern/Inn #1").unwrap();
        assert_eq!(
            session_url(&creator, &room),
            "/game/Dungeon%20Master/Tavern%2FInn%20%231"
        );
        assert_eq!(
            session_url(&UserName::new("a-b_c.d~e").unwrap(), &room),
            "/game/a-b_c.d~e/Tavern%2FInn%20%231"
        );
    }

    #[tokio::test]
    async fn unknown_code_is_not_found() {
        let mut rooms = MockRoomRepo::new();
        rooms.expect_find_by_invite_code().returning(|_| Ok(None));
        let use_case = JoinRoom::new(Arc::new(rooms), Arc::new(MockMembershipRepo::new()));

        let err = use_case
            .execute("nope", &User::new(UserName::new("B").unwrap()))
            .await
            .unwrap_err();
        assert!(matches!(err, JoinRoomError::NotFound));
    }

    #[tokio::test]
    async fn malformed_code_is_not_found_without_a_lookup() {
        let use_case = JoinRoom::new(
            Arc::new(MockRoomRepo::new()),
            Arc::new(MockMembershipRepo::new()),
        );
        let err = use_case
            .execute("  ", &User::new(UserName::new("B").unwrap()))
            .await
            .unwrap_err();
        assert!(matches!(err, JoinRoomError::NotFound));
    }

    #[tokio::test]
    async fn code_with_surrounding_whitespace_does_not_match() {
        let use_case = JoinRoom::new(
            Arc::new(MockRoomRepo::new()),
            Arc::new(MockMembershipRepo::new()),
        );
        let err = use_case
            .execute(" abc123 ", &User::new(UserName::new("B").unwrap()))
            .await
            .unwrap_err();
        assert!(matches!(err, JoinRoomError::NotFound));
    }

    #[tokio::test]
    async fn creator_joins_without_a_new_membership() {
        let f = fixture();
        let mut memberships = MockMembershipRepo::new();
        memberships.expect_create().never();

        let use_case = JoinRoom::new(
            Arc::new(rooms_returning(f.room.clone())),
            Arc::new(memberships),
        );
        let result = use_case.execute("abc123", &f.creator).await.unwrap();

        assert!(result.admitted.is_none());
        assert_eq!(result.session_url, "/game/A/Tavern");
    }

    #[tokio::test]
    async fn existing_member_is_idempotent() {
        let f = fixture();
        let bob = User::new(UserName::new("B").unwrap());
        let existing = PlayerRoom::new(bob.id(), f.room.id(), Role::Player, LocationId::new());

        let mut memberships = MockMembershipRepo::new();
        memberships
            .expect_find()
            .returning(move |_, _| Ok(Some(existing.clone())));
        memberships.expect_create().never();

        let use_case = JoinRoom::new(
            Arc::new(rooms_returning(f.room.clone())),
            Arc::new(memberships),
        );
        let first = use_case.execute("abc123", &bob).await.unwrap();
        let second = use_case.execute("abc123", &bob).await.unwrap();

        assert!(first.admitted.is_none());
        assert_eq!(first.session_url, second.session_url);
    }

    #[tokio::test]
    async fn new_player_inherits_dm_location_when_no_players_exist() {
        let f = fixture();
        let bob = User::new(UserName::new("B").unwrap());
        let dm_location = LocationId::new();
        let bob_id = bob.id();
        let room_id = f.room.id();

        let mut memberships = MockMembershipRepo::new();
        memberships.expect_find().returning(|_, _| Ok(None));
        memberships
            .expect_first_location_with_role()
            .withf(|_, role| *role == Role::Player)
            .returning(|_, _| Ok(None));
        memberships
            .expect_first_location_with_role()
            .withf(|_, role| *role == Role::Dm)
            .returning(move |_, _| Ok(Some(dm_location)));
        memberships
            .expect_create()
            .withf(move |m| {
                m.user_id() == bob_id
                    && m.room_id() == room_id
                    && m.role() == Role::Player
                    && m.active_location() == dm_location
            })
            .times(1)
            .returning(|_| Ok(()));

        let use_case = JoinRoom::new(
            Arc::new(rooms_returning(f.room.clone())),
            Arc::new(memberships),
        );
        let result = use_case.execute("abc123", &bob).await.unwrap();

        let admitted = result.admitted.unwrap();
        assert_eq!(admitted.active_location(), dm_location);
    }

    #[tokio::test]
    async fn player_location_is_preferred_over_dm() {
        let player_location = LocationId::new();
        let mut memberships = MockMembershipRepo::new();
        memberships
            .expect_first_location_with_role()
            .withf(|_, role| *role == Role::Player)
            .times(1)
            .returning(move |_, _| Ok(Some(player_location)));

        let location = inherit_location(&memberships, RoomId::new()).await.unwrap();
        assert_eq!(location, player_location);
    }

    #[tokio::test]
    async fn room_without_members_is_inconsistent() {
        let f = fixture();
        let mut memberships = MockMembershipRepo::new();
        memberships.expect_find().returning(|_, _| Ok(None));
        memberships
            .expect_first_location_with_role()
            .returning(|_, _| Ok(None));
        memberships.expect_create().never();

        let use_case = JoinRoom::new(
            Arc::new(rooms_returning(f.room.clone())),
            Arc::new(memberships),
        );
        let err = use_case
            .execute("abc123", &User::new(UserName::new("B").unwrap()))
            .await
            .unwrap_err();
        assert!(matches!(err, JoinRoomError::InconsistentRoom(id) if id == f.room.id()));
    }

    #[tokio::test]
    async fn losing_a_concurrent_insert_is_not_an_error() {
        let f = fixture();
        let mut memberships = MockMembershipRepo::new();
        memberships.expect_find().returning(|_, _| Ok(None));
        memberships
            .expect_first_location_with_role()
            .returning(|_, _| Ok(Some(LocationId::new())));
        memberships
            .expect_create()
            .returning(|_| Err(RepoError::constraint("player_rooms.create: UNIQUE")));

        let use_case = JoinRoom::new(
            Arc::new(rooms_returning(f.room.clone())),
            Arc::new(memberships),
        );
        let result = use_case
            .execute("abc123", &User::new(UserName::new("B").unwrap()))
            .await
            .unwrap();
        assert!(result.admitted.is_none());
    }
}
