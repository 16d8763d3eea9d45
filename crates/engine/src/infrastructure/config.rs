//! Engine configuration loaded from the environment.

/// Default cap for uploaded assets, advertised to clients.
pub const DEFAULT_MAX_UPLOAD_SIZE_BYTES: u64 = 10 * 1024 * 1024;

const DEFAULT_SERVER_HOST: &str = "0.0.0.0";
const DEFAULT_SERVER_PORT: u16 = 8000;
const DEFAULT_DATABASE_URL: &str = "sqlite:tabletop.db?mode=rwc";
const DEFAULT_AUTH_USER_HEADER: &str = "x-user";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub server_host: String,
    pub server_port: u16,
    pub database_url: String,
    pub max_upload_size_bytes: u64,
    /// Header carrying the authenticated user name, set by the fronting proxy.
    pub auth_user_header: String,
    /// Comma separated origins, or `*`. CORS is disabled when unset.
    pub cors_allowed_origins: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            server_host: DEFAULT_SERVER_HOST.into(),
            server_port: DEFAULT_SERVER_PORT,
            database_url: DEFAULT_DATABASE_URL.into(),
            max_upload_size_bytes: DEFAULT_MAX_UPLOAD_SIZE_BYTES,
            auth_user_header: DEFAULT_AUTH_USER_HEADER.into(),
            cors_allowed_origins: None,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Unparseable numbers fall
    /// back to their defaults with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let server_port = non_empty("SERVER_PORT")
            .or_else(|| non_empty("PORT"))
            .map(|raw| {
                raw.parse().unwrap_or_else(|_| {
                    tracing::warn!(value = %raw, "Invalid SERVER_PORT, using default");
                    defaults.server_port
                })
            })
            .unwrap_or(defaults.server_port);

        let max_upload_size_bytes = non_empty("MAX_UPLOAD_SIZE_BYTES")
            .map(|raw| {
                raw.parse().unwrap_or_else(|_| {
                    tracing::warn!(value = %raw, "Invalid MAX_UPLOAD_SIZE_BYTES, using default");
                    defaults.max_upload_size_bytes
                })
            })
            .unwrap_or(defaults.max_upload_size_bytes);

        Self {
            server_host: non_empty("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port,
            database_url: non_empty("DATABASE_URL").unwrap_or(defaults.database_url),
            max_upload_size_bytes,
            auth_user_header: non_empty("AUTH_USER_HEADER")
                .map(|h| h.to_ascii_lowercase())
                .unwrap_or(defaults.auth_user_header),
            cors_allowed_origins: non_empty("CORS_ALLOWED_ORIGINS"),
        }
    }
}
