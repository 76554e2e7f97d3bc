use serde_json::Value;

/// Failure classes surfaced by [`ApiClient`](super::ApiClient).
///
/// Variants are `Clone` because a single refresh result is shared by every
/// caller that joined the in-flight refresh.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, connect, timeout, reset)
    #[error("network error: {0}")]
    Network(String),

    /// HTTP 401, credentials were cleared
    #[error("unauthorized: credentials have been cleared")]
    Unauthorized,

    /// HTTP 440, the backend's session-expired code
    #[error("session expired")]
    SessionExpired,

    /// Any other non-2xx response
    #[error("request failed with status {status}")]
    Status { status: u16, body: Value },

    /// The response body could not be decoded
    #[error("invalid response body: {0}")]
    Decode(String),

    /// A refresh was requested but no refresh token is stored
    #[error("no refresh token available")]
    NoRefreshToken,

    /// The token store failed to read or persist credentials
    #[error("token storage error: {0}")]
    Storage(String),
}

impl ApiError {
    /// HTTP status associated with this error, if a response was received
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized => Some(401),
            ApiError::SessionExpired => Some(440),
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Response body for status errors, `Value::Null` otherwise
    pub fn body(&self) -> &Value {
        static NULL: Value = Value::Null;
        match self {
            ApiError::Status { body, .. } => body,
            _ => &NULL,
        }
    }

    pub fn is_auth_expired(&self) -> bool {
        matches!(self, ApiError::Unauthorized | ApiError::SessionExpired)
    }

    /// Transient failures that an idempotent request may retry
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Network(_) => true,
            ApiError::Status { status, .. } => matches!(status, 408 | 429 | 500..=599),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::Unauthorized.status(), Some(401));
        assert_eq!(ApiError::SessionExpired.status(), Some(440));
        assert_eq!(ApiError::Network("reset".into()).status(), None);
        let err = ApiError::Status { status: 422, body: json!({"errors": {}}) };
        assert_eq!(err.status(), Some(422));
        assert!(err.body().get("errors").is_some());
    }

    #[test]
    fn test_retryable_classification() {
        assert!(ApiError::Network("timeout".into()).is_retryable());
        assert!(ApiError::Status { status: 503, body: Value::Null }.is_retryable());
        assert!(ApiError::Status { status: 429, body: Value::Null }.is_retryable());
        assert!(!ApiError::Status { status: 422, body: Value::Null }.is_retryable());
        assert!(!ApiError::Unauthorized.is_retryable());
        assert!(!ApiError::SessionExpired.is_retryable());
    }
}
