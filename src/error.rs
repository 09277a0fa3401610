// Error types for starboard.
// Covers repository reference parsing, GitHub API failures, and configuration errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StarboardError {
    #[error("Invalid GitHub URL: {0}")]
    InvalidReference(String),

    #[error("GitHub API error: {0}")]
    Api(#[from] reqwest::Error),

    #[error("Authentication failed: invalid or expired token")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded, resets at {reset_at}")]
    RateLimited { reset_at: String },

    #[error("{0}")]
    Upstream(String),

    #[error("Failed to decode content: {0}")]
    Decode(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl StarboardError {
    /// Whether this error came from talking to the upstream API.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            StarboardError::Api(_)
                | StarboardError::Unauthorized
                | StarboardError::NotFound(_)
                | StarboardError::RateLimited { .. }
                | StarboardError::Upstream(_)
                | StarboardError::Decode(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, StarboardError>;
