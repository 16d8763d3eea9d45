//! API layer - HTTP and WebSocket entry points.

use std::sync::Arc;

use axum::{
    http::{HeaderName, HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod auth;
pub mod connections;
pub mod fanout;
pub mod http;
pub mod label_locks;
pub mod websocket;

#[cfg(test)]
pub(crate) mod test_support;

use crate::app::App;
use crate::infrastructure::config::EngineConfig;

/// Build the full router: HTTP routes plus the game socket.
pub fn router(app: Arc<App>) -> Router {
    let cors = build_cors_layer(&app.config);

    let router = http::routes()
        .route("/ws/game/{creator}/{room}", get(websocket::ws_handler))
        .with_state(app)
        .layer(TraceLayer::new_for_http());

    match cors {
        Some(cors) => router.layer(cors),
        None => router,
    }
}

/// CORS for browser clients served from another origin.
///
/// Disabled unless origins are configured. `*` allows any origin.
fn build_cors_layer(config: &EngineConfig) -> Option<CorsLayer> {
    let allowed_origins = config
        .cors_allowed_origins
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())?;

    let mut allowed_headers = vec![axum::http::header::CONTENT_TYPE];
    // Clients send the identity header on every request, which triggers preflights.
    match HeaderName::from_bytes(config.auth_user_header.as_bytes()) {
        Ok(header) => allowed_headers.push(header),
        Err(e) => tracing::warn!(
            header = %config.auth_user_header,
            error = %e,
            "Auth header is not a valid header name, leaving it out of CORS"
        ),
    }

    let mut cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(allowed_headers);

    if allowed_origins == "*" {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();

        if origins.is_empty() {
            return None;
        }

        cors = cors.allow_origin(origins);
    }

    Some(cors)
}
