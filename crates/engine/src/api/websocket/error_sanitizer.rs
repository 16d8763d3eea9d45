//! Error sanitization for client-facing messages.
//!
//! Prevents leaking internal details (paths, DB errors) to clients.

/// Sanitize a repository error.
///
/// Logs the full error server-side, returns a generic message for the client.
pub fn sanitize_repo_error<E: std::fmt::Display>(error: &E, operation: &str) -> String {
    tracing::error!(
        error = %error,
        operation = operation,
        "Repository error"
    );

    format!("Failed to {} - please try again", operation)
}

/// Error codes sent in `Error` frames.
pub mod codes {
    pub const PARSE_ERROR: &str = "PARSE_ERROR";
    pub const INVALID_REQUEST: &str = "INVALID_REQUEST";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
}
