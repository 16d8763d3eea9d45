//! Application state and composition.

use std::sync::Arc;

use crate::api::connections::SessionRegistry;
use crate::api::fanout::Fanout;
use crate::api::label_locks::LabelLocks;
use crate::infrastructure::{
    config::EngineConfig,
    ports::{LabelRepo, MembershipRepo, RandomPort, RoomRepo, SystemRandom, UserRepo},
    sqlite_store::SqliteStore,
};
use crate::use_cases;

/// Main application state.
///
/// Holds the repositories, use cases, the live session registry and the
/// per-label locks that order label events.
/// Passed to HTTP/WebSocket handlers via Axum state.
pub struct App {
    pub config: EngineConfig,
    pub repositories: Repositories,
    pub use_cases: UseCases,
    pub sessions: Arc<SessionRegistry>,
    pub fanout: Fanout,
    pub label_locks: LabelLocks,
}

/// Container for all repository ports.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepo>,
    pub rooms: Arc<dyn RoomRepo>,
    pub memberships: Arc<dyn MembershipRepo>,
    pub labels: Arc<dyn LabelRepo>,
}

impl Repositories {
    /// Every port served by one SQLite store.
    pub fn from_store(store: SqliteStore) -> Self {
        let store = Arc::new(store);
        Self {
            users: store.clone(),
            rooms: store.clone(),
            memberships: store.clone(),
            labels: store,
        }
    }
}

/// Container for all use cases.
pub struct UseCases {
    pub label: use_cases::LabelUseCases,
    pub session: use_cases::SessionUseCases,
    pub room: use_cases::RoomUseCases,
}

impl App {
    /// Create a new App with all dependencies wired up.
    pub fn new(config: EngineConfig, repositories: Repositories) -> Self {
        Self::with_random(config, repositories, Arc::new(SystemRandom))
    }

    pub fn with_random(
        config: EngineConfig,
        repositories: Repositories,
        random: Arc<dyn RandomPort>,
    ) -> Self {
        let label = use_cases::LabelUseCases::new(repositories.labels.clone());

        let join_room = Arc::new(use_cases::session::JoinRoom::new(
            repositories.rooms.clone(),
            repositories.memberships.clone(),
        ));
        let session = use_cases::SessionUseCases::new(join_room);

        let create_room = Arc::new(use_cases::room::CreateRoom::new(
            repositories.rooms.clone(),
        ));
        let refresh_invite_code = Arc::new(use_cases::room::RefreshInviteCode::new(
            repositories.rooms.clone(),
            random,
        ));
        let room = use_cases::RoomUseCases::new(create_room, refresh_invite_code);

        let sessions = Arc::new(SessionRegistry::new());
        let fanout = Fanout::new(sessions.clone());

        Self {
            config,
            repositories,
            use_cases: UseCases {
                label,
                session,
                room,
            },
            sessions,
            fanout,
            label_locks: LabelLocks::new(),
        }
    }
}
