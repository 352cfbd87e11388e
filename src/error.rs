use thiserror::Error;

/// Errors surfaced by session store backends.
///
/// The transfer handler itself never exposes these to callers; protocol
/// operations are total and degrade to the anonymous/empty path on failure.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("backend unavailable: {0}")]
    Unavailable(String),
    #[error("internal error: {0}")]
    Internal(String),
}

pub type SessionResult<T> = Result<T, SessionError>;

#[cfg(feature = "redis")]
pub(crate) fn serde_error(err: serde_json::Error) -> SessionError {
    SessionError::Internal(err.to_string())
}

#[cfg(feature = "redis")]
pub(crate) fn redis_error(err: redis::RedisError) -> SessionError {
    SessionError::Unavailable(err.to_string())
}
