//! Session registry for live WebSocket clients.
//!
//! Maps every bound session to its user and room membership, and keeps a
//! per-room index so fanout never scans unrelated rooms. Both maps sit behind
//! one lock and always change together.

use std::collections::{HashMap, HashSet};

use tokio::sync::{mpsc, RwLock};
use tokio_util::sync::CancellationToken;

use tabletop_domain::{PlayerRoom, Role, RoomId, SessionId, User, UserId};
use tabletop_shared::ServerMessage;

use crate::infrastructure::ports::SessionError;

/// Snapshot of what a session is bound to.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionInfo {
    pub session_id: SessionId,
    pub user: User,
    pub player_room: PlayerRoom,
}

impl SessionInfo {
    #[inline]
    pub fn user_id(&self) -> UserId {
        self.user.id()
    }

    #[inline]
    pub fn room_id(&self) -> RoomId {
        self.player_room.room_id()
    }

    #[inline]
    pub fn role(&self) -> Role {
        self.player_room.role()
    }
}

/// A session that may receive an event, with the user it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Recipient {
    pub session_id: SessionId,
    pub user_id: UserId,
}

/// Why a queued message could not be handed to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendFailure {
    /// The session's outbound buffer is full.
    Backlogged,
    /// The session's writer has gone away.
    Closed,
    /// The session was unbound before delivery.
    Gone,
}

impl std::fmt::Display for SendFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Backlogged => write!(f, "outbound buffer full"),
            Self::Closed => write!(f, "channel closed"),
            Self::Gone => write!(f, "session no longer bound"),
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct SendOutcome {
    pub delivered: usize,
    pub failed: Vec<(SessionId, SendFailure)>,
}

struct SessionEntry {
    info: SessionInfo,
    sender: mpsc::Sender<ServerMessage>,
    cancel: CancellationToken,
}

#[derive(Default)]
struct RegistryState {
    sessions: HashMap<SessionId, SessionEntry>,
    rooms: HashMap<RoomId, HashSet<SessionId>>,
}

/// Tracks every bound session.
#[derive(Default)]
pub struct SessionRegistry {
    state: RwLock<RegistryState>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a session to a user and their membership in a room.
    ///
    /// The returned token is cancelled when the session is unbound, so the
    /// connection task can shut its socket down.
    pub async fn bind(
        &self,
        session_id: SessionId,
        user: User,
        player_room: PlayerRoom,
        sender: mpsc::Sender<ServerMessage>,
    ) -> Result<CancellationToken, SessionError> {
        if player_room.user_id() != user.id() {
            return Err(SessionError::MembershipMismatch);
        }

        let mut state = self.state.write().await;
        if state.sessions.contains_key(&session_id) {
            return Err(SessionError::DuplicateSession(session_id));
        }

        let room_id = player_room.room_id();
        let cancel = CancellationToken::new();
        tracing::debug!(
            session_id = %session_id,
            user = %user.name(),
            room_id = %room_id,
            role = %player_room.role(),
            "Session bound"
        );
        state.sessions.insert(
            session_id,
            SessionEntry {
                info: SessionInfo {
                    session_id,
                    user,
                    player_room,
                },
                sender,
                cancel: cancel.clone(),
            },
        );
        state.rooms.entry(room_id).or_default().insert(session_id);
        Ok(cancel)
    }

    /// Remove a session. Idempotent; unknown ids are ignored.
    pub async fn unbind(&self, session_id: SessionId) -> Option<SessionInfo> {
        let mut state = self.state.write().await;
        let entry = state.sessions.remove(&session_id)?;
        let room_id = entry.info.room_id();
        if let Some(members) = state.rooms.get_mut(&room_id) {
            members.remove(&session_id);
            if members.is_empty() {
                state.rooms.remove(&room_id);
            }
        }
        entry.cancel.cancel();
        tracing::debug!(session_id = %session_id, room_id = %room_id, "Session unbound");
        Some(entry.info)
    }

    pub async fn lookup(&self, session_id: SessionId) -> Result<SessionInfo, SessionError> {
        let state = self.state.read().await;
        state
            .sessions
            .get(&session_id)
            .map(|entry| entry.info.clone())
            .ok_or(SessionError::UnknownSession(session_id))
    }

    pub async fn user_of(&self, session_id: SessionId) -> Result<User, SessionError> {
        let state = self.state.read().await;
        state
            .sessions
            .get(&session_id)
            .map(|entry| entry.info.user.clone())
            .ok_or(SessionError::UnknownSession(session_id))
    }

    /// Sessions bound to `room_id`, optionally without one session and
    /// optionally limited to one user's sessions.
    pub async fn sessions_in(
        &self,
        room_id: RoomId,
        exclude: Option<SessionId>,
        only_user: Option<UserId>,
    ) -> HashSet<SessionId> {
        self.recipients_in(room_id, exclude, only_user)
            .await
            .into_iter()
            .map(|recipient| recipient.session_id)
            .collect()
    }

    /// Same filter as [`Self::sessions_in`], keeping each session's user.
    pub async fn recipients_in(
        &self,
        room_id: RoomId,
        exclude: Option<SessionId>,
        only_user: Option<UserId>,
    ) -> Vec<Recipient> {
        let state = self.state.read().await;
        let Some(members) = state.rooms.get(&room_id) else {
            return Vec::new();
        };
        members
            .iter()
            .filter(|id| Some(**id) != exclude)
            .filter_map(|id| state.sessions.get(id))
            .map(|entry| Recipient {
                session_id: entry.info.session_id,
                user_id: entry.info.user_id(),
            })
            .filter(|recipient| only_user.map_or(true, |user| recipient.user_id == user))
            .collect()
    }

    pub async fn session_count(&self) -> usize {
        self.state.read().await.sessions.len()
    }

    /// Queue each message on its session's channel without waiting.
    pub(crate) async fn send_each(
        &self,
        deliveries: Vec<(SessionId, ServerMessage)>,
    ) -> SendOutcome {
        let state = self.state.read().await;
        let mut outcome = SendOutcome::default();
        for (session_id, message) in deliveries {
            let Some(entry) = state.sessions.get(&session_id) else {
                outcome.failed.push((session_id, SendFailure::Gone));
                continue;
            };
            match entry.sender.try_send(message) {
                Ok(()) => outcome.delivered += 1,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    outcome.failed.push((session_id, SendFailure::Backlogged))
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    outcome.failed.push((session_id, SendFailure::Closed))
                }
            }
        }
        outcome
    }
}
