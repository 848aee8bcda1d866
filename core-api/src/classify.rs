//! Error Classification & Notification
//!
//! Maps a [`TransportFailure`] onto one of four user-facing categories and
//! turns the result into an error toast. Classification is a pure function of
//! the failure; the caller still receives the original failure.
//!
//! | condition                 | category        | message                                  |
//! |---------------------------|-----------------|------------------------------------------|
//! | HTTP 404                  | `not-found`     | `interface not found`                    |
//! | HTTP 500                  | `server-error`  | `internal server error`                  |
//! | other HTTP 4xx            | `client-error`  | body `detail`, transport message, fallback |
//! | no HTTP status            | `network-error` | `network error, please check connection` |
//!
//! Statuses outside the table (3xx, 5xx other than 500) share the
//! network-error message and are logged as unexpected.

use bridge_traits::ui::{Notification, Notifier};
use serde_json::Value;
use std::fmt;
use tracing::warn;

use crate::error::TransportFailure;

pub const NOT_FOUND_MESSAGE: &str = "interface not found";
pub const SERVER_ERROR_MESSAGE: &str = "internal server error";
pub const NETWORK_ERROR_MESSAGE: &str = "network error, please check connection";
pub const CLIENT_ERROR_FALLBACK: &str = "request failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    NotFound,
    ServerError,
    ClientError,
    NetworkError,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::NotFound => "not-found",
            ErrorCategory::ServerError => "server-error",
            ErrorCategory::ClientError => "client-error",
            ErrorCategory::NetworkError => "network-error",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display-oriented view of a failure
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedError {
    pub category: ErrorCategory,
    pub message: String,
    pub cause: TransportFailure,
}

/// Classify a failure. Deterministic and side-effect free apart from a
/// warning for statuses outside the table.
pub fn classify(failure: &TransportFailure) -> ClassifiedError {
    let (category, message) = match failure.status {
        Some(404) => (ErrorCategory::NotFound, NOT_FOUND_MESSAGE.to_string()),
        Some(500) => (ErrorCategory::ServerError, SERVER_ERROR_MESSAGE.to_string()),
        Some(status) if (400..500).contains(&status) => {
            (ErrorCategory::ClientError, client_error_message(failure))
        }
        Some(status) => {
            warn!(status, "Unclassified response status, reporting as network error");
            (ErrorCategory::NetworkError, NETWORK_ERROR_MESSAGE.to_string())
        }
        None => (ErrorCategory::NetworkError, NETWORK_ERROR_MESSAGE.to_string()),
    };

    ClassifiedError {
        category,
        message,
        cause: failure.clone(),
    }
}

/// Show the classified error as an error toast.
pub fn notify(notifier: &dyn Notifier, error: &ClassifiedError) {
    notifier.notify(Notification::error(error.message.clone()));
}

fn client_error_message(failure: &TransportFailure) -> String {
    if let Some(detail) = failure.body.as_deref().and_then(extract_detail) {
        return detail;
    }

    if !failure.message.is_empty() {
        return failure.message.clone();
    }

    CLIENT_ERROR_FALLBACK.to_string()
}

/// Read the `detail` field of an error body.
///
/// A string detail is returned as-is. A list of validation errors (each with
/// a `msg`) is joined with `"; "`. Empty strings, non-JSON bodies and any
/// other shape count as no detail.
pub fn extract_detail(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;

    match value.get("detail")? {
        Value::String(detail) if !detail.is_empty() => Some(detail.clone()),
        Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;
    use bytes::Bytes;
    use std::sync::Mutex;

    fn status_failure(status: u16, body: &'static [u8]) -> TransportFailure {
        TransportFailure {
            kind: FailureKind::Status,
            status: Some(status),
            message: format!("Request failed with status code {}", status),
            body: Some(Bytes::from_static(body)),
        }
    }

    #[test]
    fn test_not_found() {
        let classified = classify(&status_failure(404, br#"{"detail":"Not Found"}"#));
        assert_eq!(classified.category, ErrorCategory::NotFound);
        assert_eq!(classified.message, "interface not found");
    }

    #[test]
    fn test_server_error() {
        let classified = classify(&status_failure(500, br#"{"detail":"boom"}"#));
        assert_eq!(classified.category, ErrorCategory::ServerError);
        assert_eq!(classified.message, "internal server error");
    }

    #[test]
    fn test_client_error_uses_detail() {
        let classified = classify(&status_failure(422, br#"{"detail":"bad field"}"#));
        assert_eq!(classified.category, ErrorCategory::ClientError);
        assert_eq!(classified.message, "bad field");
    }

    #[test]
    fn test_client_error_validation_list() {
        let body = br#"{"detail":[{"loc":["query","days"],"msg":"value is not a valid integer"},{"msg":"field required"}]}"#;
        let classified = classify(&status_failure(422, body));
        assert_eq!(
            classified.message,
            "value is not a valid integer; field required"
        );
    }

    #[test]
    fn test_client_error_falls_back_to_transport_message() {
        let classified = classify(&status_failure(400, b"<html>Bad Request</html>"));
        assert_eq!(classified.message, "Request failed with status code 400");

        let classified = classify(&status_failure(409, br#"{"detail":""}"#));
        assert_eq!(classified.message, "Request failed with status code 409");
    }

    #[test]
    fn test_client_error_fixed_fallback() {
        let failure = TransportFailure {
            kind: FailureKind::Status,
            status: Some(403),
            message: String::new(),
            body: None,
        };
        assert_eq!(classify(&failure).message, "request failed");
    }

    #[test]
    fn test_network_error_without_status() {
        let failure = TransportFailure::new(FailureKind::Connect, "connection refused");
        let classified = classify(&failure);
        assert_eq!(classified.category, ErrorCategory::NetworkError);
        assert_eq!(classified.message, "network error, please check connection");

        let failure = TransportFailure::new(FailureKind::Timeout, "timeout of 30000ms exceeded");
        assert_eq!(classify(&failure).category, ErrorCategory::NetworkError);
    }

    #[test]
    fn test_unlisted_status_reports_network_error() {
        let classified = classify(&status_failure(503, b""));
        assert_eq!(classified.category, ErrorCategory::NetworkError);
        assert_eq!(classified.message, NETWORK_ERROR_MESSAGE);
    }

    #[test]
    fn test_classification_keeps_cause() {
        let failure = status_failure(404, b"");
        let classified = classify(&failure);
        assert_eq!(classified.cause, failure);
    }

    #[test]
    fn test_notify_sends_error_toast() {
        #[derive(Default)]
        struct Recorder(Mutex<Vec<Notification>>);

        impl Notifier for Recorder {
            fn notify(&self, notification: Notification) {
                self.0.lock().unwrap().push(notification);
            }
        }

        let recorder = Recorder::default();
        notify(&recorder, &classify(&status_failure(500, b"")));

        let sent = recorder.0.lock().unwrap();
        assert_eq!(sent.as_slice(), &[Notification::error("internal server error")]);
    }

    #[test]
    fn test_extract_detail_shapes() {
        assert_eq!(extract_detail(br#"{"detail":"x"}"#), Some("x".to_string()));
        assert_eq!(extract_detail(br#"{"detail":42}"#), None);
        assert_eq!(extract_detail(br#"{"message":"x"}"#), None);
        assert_eq!(extract_detail(b"not json"), None);
        assert_eq!(extract_detail(b""), None);
    }
}
