//! HTTP routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

use tabletop_domain::{PlayerRoom, Room, User, UserOptions};
use tabletop_shared::{
    ClaimInviteRequest, CreateRoomRequest, InviteCodeResponse, JoinResponse, MemberData,
    ServerMessage,
};

use super::auth::CurrentUser;
use crate::app::App;
use crate::infrastructure::ports::RepoError;
use crate::use_cases::room::RoomError;
use crate::use_cases::session::JoinRoomError;

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/", get(health))
        .route("/api/health", get(health))
        .route("/api/upload-limit", get(upload_limit))
        .route("/api/options", get(get_options).put(set_options))
        .route("/api/invite", post(claim_invite))
        .route("/api/rooms", post(create_room))
        .route(
            "/api/rooms/{creator}/{room}/invite-code",
            post(refresh_invite_code),
        )
}

async fn health() -> &'static str {
    "OK"
}

/// Maximum accepted upload size in bytes, as a bare JSON number.
async fn upload_limit(State(app): State<Arc<App>>) -> Json<u64> {
    Json(app.config.max_upload_size_bytes)
}

// =============================================================================
// User options
// =============================================================================

async fn get_options(CurrentUser(user): CurrentUser) -> Json<UserOptions> {
    Json(user.default_options().clone())
}

async fn set_options(
    State(app): State<Arc<App>>,
    CurrentUser(user): CurrentUser,
    Json(options): Json<UserOptions>,
) -> Result<Json<UserOptions>, ApiError> {
    options
        .validate()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    app.repositories
        .users
        .set_default_options(user.id(), &options)
        .await?;
    tracing::debug!(user = %user.name(), "Default options updated");
    Ok(Json(options))
}

// =============================================================================
// Rooms
// =============================================================================

async fn claim_invite(
    State(app): State<Arc<App>>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<ClaimInviteRequest>,
) -> Result<Json<JoinResponse>, ApiError> {
    let result = app
        .use_cases
        .session
        .join_room
        .execute(&body.code, &user)
        .await
        .map_err(|e| match e {
            JoinRoomError::NotFound => ApiError::NotFound,
            JoinRoomError::InconsistentRoom(room_id) => {
                tracing::error!(
                    room_id = %room_id,
                    user = %user.name(),
                    "Room has no member to inherit a location from, join aborted"
                );
                ApiError::Internal(e.to_string())
            }
            JoinRoomError::Repo(e) => e.into(),
        })?;

    if let Some(membership) = &result.admitted {
        announce_member(&app, &result.room, &user, membership).await;
    }

    Ok(Json(JoinResponse {
        session_url: result.session_url,
    }))
}

/// Tell every session of the room's creator about a new member.
async fn announce_member(app: &App, room: &Room, user: &User, membership: &PlayerRoom) {
    let message = ServerMessage::RoomMemberAdded(MemberData {
        user_id: user.id().to_uuid(),
        name: user.name().to_string(),
        location: membership.active_location().to_uuid(),
    });
    let deliveries = app
        .sessions
        .sessions_in(room.id(), None, Some(room.creator()))
        .await
        .into_iter()
        .map(|session_id| (session_id, message.clone()))
        .collect();
    app.fanout.deliver(message.event_name(), deliveries).await;
}

async fn create_room(
    State(app): State<Arc<App>>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<CreateRoomRequest>,
) -> Result<(StatusCode, Json<JoinResponse>), ApiError> {
    let created = app
        .use_cases
        .room
        .create
        .execute(&user, &body.name)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(JoinResponse {
            session_url: created.session_url,
        }),
    ))
}

async fn refresh_invite_code(
    State(app): State<Arc<App>>,
    CurrentUser(user): CurrentUser,
    Path((creator, room)): Path<(String, String)>,
) -> Result<Json<InviteCodeResponse>, ApiError> {
    let code = app
        .use_cases
        .room
        .refresh_invite_code
        .execute(&user, &creator, &room)
        .await?;
    Ok(Json(InviteCodeResponse {
        code: code.to_string(),
    }))
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug)]
pub enum ApiError {
    NotFound,
    BadRequest(String),
    Unauthorized,
    Forbidden,
    Conflict(String),
    Internal(String),
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Not found").into_response(),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized").into_response(),
            ApiError::Forbidden => (StatusCode::FORBIDDEN, "Forbidden").into_response(),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg).into_response(),
            ApiError::Internal(detail) => {
                tracing::error!(error = %detail, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response()
            }
        }
    }
}

impl From<RepoError> for ApiError {
    fn from(e: RepoError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl From<RoomError> for ApiError {
    fn from(e: RoomError) -> Self {
        match e {
            RoomError::NotFound => ApiError::NotFound,
            RoomError::AlreadyExists => ApiError::Conflict(e.to_string()),
            RoomError::NotCreator => ApiError::Forbidden,
            RoomError::Validation(e) => ApiError::BadRequest(e.to_string()),
            RoomError::Repo(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    use super::*;
    use crate::api::test_support::{bind_session, seeded_app, Seed};
    use crate::infrastructure::ports::{MembershipRepo, RoomRepo, UserRepo};
    use tabletop_domain::{InviteCode, Role};

    fn post_json(uri: &str, user: Option<&str>, body: serde_json::Value) -> Request<Body> {
        let mut builder = Request::post(uri).header("content-type", "application/json");
        if let Some(user) = user {
            builder = builder.header("x-user", user);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn router(seed: &Seed) -> Router {
        routes().with_state(seed.app.clone())
    }

    #[tokio::test]
    async fn claim_invite_admits_player_and_notifies_creator_sessions() {
        let seed = seeded_app().await;
        let (_alice_session, mut alice_rx) =
            bind_session(&seed.app, &seed.alice, seed.room.id()).await;

        let response = router(&seed)
            .oneshot(post_json(
                "/api/invite",
                Some("B"),
                serde_json::json!({ "code": "abc123" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "sessionUrl": "/game/A/Tavern" })
        );

        let membership = seed
            .store
            .find(seed.bob.id(), seed.room.id())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(membership.role(), Role::Player);
        assert_eq!(membership.active_location(), seed.location.id());

        assert_eq!(
            alice_rx.try_recv().unwrap(),
            ServerMessage::RoomMemberAdded(MemberData {
                user_id: seed.bob.id().to_uuid(),
                name: "B".to_string(),
                location: seed.location.id().to_uuid(),
            })
        );
    }

    #[tokio::test]
    async fn claiming_twice_is_idempotent_and_quiet() {
        let seed = seeded_app().await;
        let request = || {
            post_json(
                "/api/invite",
                Some("b"),
                serde_json::json!({ "code": "abc123" }),
            )
        };

        let first = router(&seed).oneshot(request()).await.unwrap();
        let first = body_json(first).await;

        let (_alice_session, mut alice_rx) =
            bind_session(&seed.app, &seed.alice, seed.room.id()).await;
        let second = router(&seed).oneshot(request()).await.unwrap();
        assert_eq!(second.status(), StatusCode::OK);
        assert_eq!(body_json(second).await, first);
        assert!(alice_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn unknown_code_is_not_found() {
        let seed = seeded_app().await;
        let response = router(&seed)
            .oneshot(post_json(
                "/api/invite",
                Some("B"),
                serde_json::json!({ "code": "nope" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn missing_or_unknown_user_is_unauthorized() {
        let seed = seeded_app().await;
        for user in [None, Some("mallory")] {
            let response = router(&seed)
                .oneshot(post_json(
                    "/api/invite",
                    user,
                    serde_json::json!({ "code": "abc123" }),
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[tokio::test]
    async fn create_room_then_refresh_code_then_join() {
        let seed = seeded_app().await;

        let response = router(&seed)
            .oneshot(post_json(
                "/api/rooms",
                Some("B"),
                serde_json::json!({ "name": "Bob's Keep" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "sessionUrl": "/game/B/Bob%27s%20Keep" })
        );

        // Only the creator may rotate the code.
        let response = router(&seed)
            .oneshot(post_json(
                "/api/rooms/B/Bob's%20Keep/invite-code",
                Some("A"),
                serde_json::json!({}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = router(&seed)
            .oneshot(post_json(
                "/api/rooms/B/Bob's%20Keep/invite-code",
                Some("B"),
                serde_json::json!({}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let code = body_json(response).await["code"]
            .as_str()
            .unwrap()
            .to_string();

        let room = seed
            .store
            .find_by_invite_code(&InviteCode::new(code.clone()).unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(room.name().as_str(), "Bob's Keep");

        // The creator's DM location is inherited by the first player.
        let response = router(&seed)
            .oneshot(post_json(
                "/api/invite",
                Some("A"),
                serde_json::json!({ "code": code }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let alice = seed
            .store
            .find(seed.alice.id(), room.id())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(alice.role(), Role::Player);
    }

    #[tokio::test]
    async fn duplicate_room_is_a_conflict() {
        let seed = seeded_app().await;
        let response = router(&seed)
            .oneshot(post_json(
                "/api/rooms",
                Some("A"),
                serde_json::json!({ "name": "Tavern" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn upload_limit_is_a_bare_number() {
        let seed = seeded_app().await;
        let response = router(&seed)
            .oneshot(
                Request::get("/api/upload-limit")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            serde_json::json!(seed.app.config.max_upload_size_bytes)
        );
    }

    fn options_request(method: &str, user: &str, body: Option<serde_json::Value>) -> Request<Body> {
        let builder = Request::builder()
            .method(method)
            .uri("/api/options")
            .header("x-user", user)
            .header("content-type", "application/json");
        match body {
            Some(body) => builder.body(Body::from(body.to_string())).unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    #[tokio::test]
    async fn options_start_at_defaults_and_can_be_replaced() {
        let seed = seeded_app().await;

        let response = router(&seed)
            .oneshot(options_request("GET", "A", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["ruler_colour"], "#F00");
        assert_eq!(body["grid_size"], 50);
        assert_eq!(body["mouse_pan_mode"], 3);

        let response = router(&seed)
            .oneshot(options_request(
                "PUT",
                "A",
                Some(serde_json::json!({ "grid_size": 70, "invert_alt": true })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let stored = seed.store.find_by_name("A").await.unwrap().unwrap();
        assert_eq!(stored.default_options().grid_size, 70);
        assert!(stored.default_options().invert_alt);
        assert_eq!(stored.default_options().ruler_colour, "#F00");

        // Other users keep their own defaults.
        let response = router(&seed)
            .oneshot(options_request("GET", "B", None))
            .await
            .unwrap();
        assert_eq!(body_json(response).await["grid_size"], 50);
    }

    #[tokio::test]
    async fn invalid_options_are_rejected() {
        let seed = seeded_app().await;
        let response = router(&seed)
            .oneshot(options_request(
                "PUT",
                "A",
                Some(serde_json::json!({ "mouse_pan_mode": 9 })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let stored = seed.store.find_by_name("A").await.unwrap().unwrap();
        assert_eq!(stored.default_options(), &UserOptions::default());
    }

    #[tokio::test]
    async fn options_require_a_known_user() {
        let seed = seeded_app().await;
        let response = router(&seed)
            .oneshot(options_request("GET", "nobody", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
