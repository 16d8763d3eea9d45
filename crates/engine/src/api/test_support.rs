//! Shared fixtures for api tests.

use std::sync::Arc;

use tokio::sync::mpsc;

use tabletop_domain::{
    InviteCode, Location, LocationName, PlayerRoom, Role, Room, RoomId, RoomName, SessionId,
    User, UserName,
};
use tabletop_shared::ServerMessage;

use crate::app::{App, Repositories};
use crate::infrastructure::config::EngineConfig;
use crate::infrastructure::ports::{MembershipRepo, RoomRepo, UserRepo};
use crate::infrastructure::sqlite_store::SqliteStore;

/// Room "Tavern" created by A (DM at "Hall") with invite code `abc123`.
/// B and C exist but are not members.
pub(crate) struct Seed {
    pub app: Arc<App>,
    pub store: SqliteStore,
    pub alice: User,
    pub bob: User,
    pub carol: User,
    pub room: Room,
    pub location: Location,
}

pub(crate) async fn seeded_app() -> Seed {
    let store = SqliteStore::in_memory().await.unwrap();

    let alice = User::new(UserName::new("A").unwrap());
    let bob = User::new(UserName::new("B").unwrap());
    let carol = User::new(UserName::new("C").unwrap());
    for user in [&alice, &bob, &carol] {
        UserRepo::create(&store, user).await.unwrap();
    }

    let room = Room::new(RoomName::new("Tavern").unwrap(), &alice)
        .with_invite_code(InviteCode::new("abc123").unwrap());
    let location = Location::new(room.id(), LocationName::new("Hall").unwrap());
    let dm = PlayerRoom::new(alice.id(), room.id(), Role::Dm, location.id());
    store
        .create_with_owner(&room, &location, &dm)
        .await
        .unwrap();

    let app = Arc::new(App::new(
        EngineConfig::default(),
        Repositories::from_store(store.clone()),
    ));

    Seed {
        app,
        store,
        alice,
        bob,
        carol,
        room,
        location,
    }
}

impl Seed {
    /// Give `user` a player membership in the seeded room.
    pub async fn admit(&self, user: &User) -> PlayerRoom {
        let membership =
            PlayerRoom::new(user.id(), self.room.id(), Role::Player, self.location.id());
        MembershipRepo::create(&self.store, &membership)
            .await
            .unwrap();
        membership
    }
}

/// Bind a fresh session for `user` in `room_id`, returning its outbound queue.
pub(crate) async fn bind_session(
    app: &App,
    user: &User,
    room_id: RoomId,
) -> (SessionId, mpsc::Receiver<ServerMessage>) {
    let (tx, rx) = mpsc::channel(16);
    let session_id = SessionId::new();
    let membership = PlayerRoom::new(user.id(), room_id, Role::Player, Default::default());
    app.sessions
        .bind(session_id, user.clone(), membership, tx)
        .await
        .unwrap();
    (session_id, rx)
}

/// Everything currently queued for a session.
pub(crate) fn drain(rx: &mut mpsc::Receiver<ServerMessage>) -> Vec<ServerMessage> {
    let mut messages = Vec::new();
    while let Ok(message) = rx.try_recv() {
        messages.push(message);
    }
    messages
}
