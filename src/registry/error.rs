// ABOUTME: Call-level errors returned by registry clients.
// ABOUTME: Per-image delete rejections are data, not errors, and live elsewhere.

/// A registry request that failed as a whole.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("repository not found: {0}")]
    RepositoryNotFound(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("request cancelled")]
    Cancelled,

    #[error("registry error {code}: {message}")]
    Service { code: String, message: String },
}
