//! Error types for session store operations.

/// Error type for session store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A required argument (session id or payload) was missing.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No live session exists under the id. Expired sessions report this too.
    #[error("Session not found: {0}")]
    NotFound(String),
}

/// Result type for session store operations.
pub type Result<T> = std::result::Result<T, Error>;
