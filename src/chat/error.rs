//! Error taxonomy for the completion proxy.

use std::time::Duration;

use thiserror::Error;

use crate::agent::AgentError;

/// Errors surfaced to callers of the completion proxy.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Malformed caller input; reported before any remote call is made.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The remote agent service rejected a call. Never retried here; the
    /// remote status code and message are passed through to the caller.
    #[error("agent service error ({status}): {message}")]
    Service {
        /// Status code supplied by the remote service.
        status: u16,
        /// Message supplied by the remote service.
        message: String,
    },

    /// The run was still pending when the poll deadline elapsed.
    #[error("run did not reach a terminal status within {0:?}")]
    RunTimedOut(Duration),

    /// The conversation holds no agent-authored text to return.
    #[error("agent produced no reply")]
    EmptyReply,

    /// Anything else.
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl From<AgentError> for ChatError {
    fn from(err: AgentError) -> Self {
        match err {
            AgentError::Service { status, message } => Self::Service { status, message },
            other => Self::Unexpected(other.to_string()),
        }
    }
}
