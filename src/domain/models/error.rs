use thiserror::Error;

use super::ExecutionStatus;

/// Errors surfaced by the Boa client. None of them are retried internally.
#[derive(Debug, Error)]
pub enum BoaError {
    /// The remote service could not be reached, or answered with a non-success
    /// HTTP status.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The service ran the procedure but reported an application level fault.
    #[error("Remote fault {code}: {message}")]
    RemoteFault { code: i64, message: String },

    /// Login was rejected by the service.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// An authenticated operation was attempted without a live session.
    #[error("Not logged in")]
    NotAuthenticated,

    /// The service answered with a status or shape this client does not
    /// understand, usually a version or endpoint mismatch.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Output was requested before the job finished executing.
    #[error("Job output is not ready, execution status is {0}")]
    OutputNotReady(ExecutionStatus),

    /// Output exists in principle but could not be retrieved.
    #[error("Job output is unavailable: {0}")]
    OutputUnavailable(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for BoaError {
    fn from(err: reqwest::Error) -> BoaError {
        return BoaError::Transport(err.to_string());
    }
}

pub type Result<T> = std::result::Result<T, BoaError>;
