//! Error types for the transport core

use bridge_traits::error::BridgeError;
use bridge_traits::http::HttpResponse;
use bytes::Bytes;
use std::fmt;
use thiserror::Error;

/// How a request failed at the transport level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The fixed client timeout elapsed
    Timeout,
    /// The server could not be reached
    Connect,
    /// The server answered with a non-2xx status
    Status,
    /// Any other bridge failure
    Other,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureKind::Timeout => "timeout",
            FailureKind::Connect => "connect",
            FailureKind::Status => "status",
            FailureKind::Other => "other",
        };
        f.write_str(name)
    }
}

/// The raw, unclassified failure of a call.
///
/// This is what callers receive when a request fails. Classification only
/// drives the user notification and never replaces this value.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct TransportFailure {
    pub kind: FailureKind,
    /// HTTP status, absent for timeouts and unreachable servers
    pub status: Option<u16>,
    /// Transport-level message
    pub message: String,
    /// Raw response body, when the server answered
    pub body: Option<Bytes>,
}

impl TransportFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            status: None,
            message: message.into(),
            body: None,
        }
    }

    /// Failure for a response whose status is outside 2xx.
    pub fn from_response(response: HttpResponse) -> Self {
        Self {
            kind: FailureKind::Status,
            status: Some(response.status),
            message: format!("Request failed with status code {}", response.status),
            body: Some(response.body),
        }
    }

    pub fn is_timeout(&self) -> bool {
        self.kind == FailureKind::Timeout
    }
}

impl From<BridgeError> for TransportFailure {
    fn from(error: BridgeError) -> Self {
        match error {
            BridgeError::Timeout(message) => Self::new(FailureKind::Timeout, message),
            BridgeError::ConnectionFailed(message) => Self::new(FailureKind::Connect, message),
            other => Self::new(FailureKind::Other, other.to_string()),
        }
    }
}

/// Errors returned by [`ApiClient`](crate::ApiClient) and the facades
#[derive(Error, Debug)]
pub enum ApiError {
    /// The call was dispatched and failed; carries the original failure
    #[error(transparent)]
    Transport(#[from] TransportFailure),

    /// A request interceptor refused the call before dispatch
    #[error("Request rejected before dispatch: {0}")]
    Rejected(String),

    /// A 2xx body could not be decoded into the expected type
    #[error("Failed to decode response body: {0}")]
    Decode(String),

    /// The request could not be built
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// The original transport failure, if the call got that far.
    pub fn transport_failure(&self) -> Option<&TransportFailure> {
        match self {
            ApiError::Transport(failure) => Some(failure),
            _ => None,
        }
    }

    /// HTTP status of the failed response, if any.
    pub fn status(&self) -> Option<u16> {
        self.transport_failure().and_then(|failure| failure.status)
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_failure_from_response() {
        let response = HttpResponse {
            status: 422,
            headers: HashMap::new(),
            body: Bytes::from_static(br#"{"detail":"bad field"}"#),
        };

        let failure = TransportFailure::from_response(response);
        assert_eq!(failure.kind, FailureKind::Status);
        assert_eq!(failure.status, Some(422));
        assert_eq!(failure.message, "Request failed with status code 422");
        assert!(failure.body.is_some());
    }

    #[test]
    fn test_failure_from_bridge_error() {
        let failure: TransportFailure = BridgeError::Timeout("timed out".to_string()).into();
        assert!(failure.is_timeout());
        assert_eq!(failure.status, None);

        let failure: TransportFailure =
            BridgeError::ConnectionFailed("refused".to_string()).into();
        assert_eq!(failure.kind, FailureKind::Connect);

        let failure: TransportFailure = BridgeError::NotAvailable("fetch".to_string()).into();
        assert_eq!(failure.kind, FailureKind::Other);
        assert_eq!(failure.message, "Bridge capability not available: fetch");
    }

    #[test]
    fn test_api_error_status() {
        let error = ApiError::from(TransportFailure {
            kind: FailureKind::Status,
            status: Some(404),
            message: "Request failed with status code 404".to_string(),
            body: None,
        });
        assert_eq!(error.status(), Some(404));
        assert_eq!(error.to_string(), "Request failed with status code 404");

        let error = ApiError::Rejected("no token".to_string());
        assert_eq!(error.status(), None);
        assert!(error.transport_failure().is_none());
    }
}
