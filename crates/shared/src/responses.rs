//! HTTP request and response bodies.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/invite`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimInviteRequest {
    pub code: String,
}

/// Where the client should navigate to enter a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinResponse {
    pub session_url: String,
}

/// Body of `POST /api/rooms`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRoomRequest {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InviteCodeResponse {
    pub code: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_response_uses_session_url_key() {
        let body = JoinResponse {
            session_url: "/game/a/b".into(),
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"sessionUrl":"/game/a/b"}"#
        );
    }
}
