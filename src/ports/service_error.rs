//! Errors surfaced by the remote cycle services.

/// Failure of a remote cycle call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// Request never produced a response.
    #[error("network error: {0}")]
    Network(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u64,
    },

    /// Server answered with a non-success status.
    #[error("server returned {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Error body or reason phrase.
        message: String,
    },

    /// The addressed cycle does not exist on the server.
    #[error("not found: {0}")]
    NotFound(String),

    /// Response body could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),
}

impl ServiceError {
    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        ServiceError::Network(message.into())
    }

    /// Creates a status error.
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        ServiceError::Status {
            status,
            message: message.into(),
        }
    }

    /// Returns true for errors where the server rejected the request itself.
    pub fn is_client_error(&self) -> bool {
        match self {
            ServiceError::Status { status, .. } => (400..500).contains(status),
            ServiceError::NotFound(_) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_status_errors() {
        let err = ServiceError::status(403, "forbidden");
        assert_eq!(err.to_string(), "server returned 403: forbidden");
    }

    #[test]
    fn classifies_client_errors() {
        assert!(ServiceError::status(422, "bad dates").is_client_error());
        assert!(ServiceError::NotFound("cycle".into()).is_client_error());
        assert!(!ServiceError::status(502, "bad gateway").is_client_error());
        assert!(!ServiceError::network("reset").is_client_error());
    }
}
