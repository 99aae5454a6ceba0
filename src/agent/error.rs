//! Error types for the agent-service boundary.

use thiserror::Error;

/// Errors produced while talking to the persistent-agent service.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The service answered with a non-success status code.
    #[error("agent service returned {status}: {message}")]
    Service {
        /// HTTP status code supplied by the remote service.
        status: u16,
        /// Error message supplied by the remote service.
        message: String,
    },

    /// The request never produced a usable response.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The configured endpoint is not a valid URL.
    #[error("invalid endpoint URL: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    /// The response body could not be decoded.
    #[error("malformed response body: {0}")]
    MalformedBody(#[from] serde_json::Error),
}

impl AgentError {
    /// Remote status code, when the service itself rejected the call.
    #[must_use]
    pub const fn remote_status(&self) -> Option<u16> {
        match self {
            Self::Service { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_error_carries_remote_status() {
        let err = AgentError::Service {
            status: 429,
            message: "too many requests".to_string(),
        };
        assert_eq!(err.remote_status(), Some(429));
        assert_eq!(
            err.to_string(),
            "agent service returned 429: too many requests"
        );
    }

    #[test]
    fn test_non_service_errors_have_no_remote_status() -> Result<(), Box<dyn std::error::Error>> {
        let err = AgentError::InvalidEndpoint("not a url".parse::<url::Url>().err().ok_or("parse unexpectedly succeeded")?);
        assert_eq!(err.remote_status(), None);
        Ok(())
    }
}
