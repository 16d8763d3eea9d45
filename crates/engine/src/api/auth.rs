//! Authenticated user extraction.
//!
//! Credentials are checked by the fronting proxy, which forwards the user
//! name in a trusted header. Handlers only ever see a resolved `User`.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tabletop_domain::User;

use super::http::ApiError;
use crate::app::App;

/// The user making the request.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl FromRequestParts<Arc<App>> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        app: &Arc<App>,
    ) -> Result<Self, Self::Rejection> {
        let name = parts
            .headers
            .get(app.config.auth_user_header.as_str())
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or(ApiError::Unauthorized)?;

        match app.repositories.users.find_by_name(name).await? {
            Some(user) => Ok(Self(user)),
            None => {
                tracing::debug!(user = %name, "Rejecting request from unknown user");
                Err(ApiError::Unauthorized)
            }
        }
    }
}
