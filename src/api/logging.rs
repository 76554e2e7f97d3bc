//! Structured request logging with correlation ids

use serde_json::{Value, json};
use std::time::Duration;
use log::{debug, warn};

const REDACTED_HEADERS: &[&str] = &["authorization", "cookie", "x-refresh-token"];

/// Logs one JSON line per request and response, correlated by id
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestLogger;

impl RequestLogger {
    pub fn new() -> Self {
        Self
    }

    pub fn log_request(&self, correlation_id: &str, method: &str, url: &str, headers: &[(String, String)]) {
        let log_data = json!({
            "event": "http_request",
            "correlation_id": correlation_id,
            "method": method,
            "url": url,
            "headers": sanitize_headers(headers),
            "timestamp": chrono::Utc::now().to_rfc3339()
        });

        debug!("HTTP Request: {}", log_data);
    }

    pub fn log_response(&self, correlation_id: &str, status_code: u16, duration: Duration) {
        let log_data = json!({
            "event": "http_response",
            "correlation_id": correlation_id,
            "status_code": status_code,
            "duration_ms": duration.as_millis(),
            "timestamp": chrono::Utc::now().to_rfc3339()
        });

        if status_code >= 400 {
            warn!("HTTP Response (Error): {}", log_data);
        } else {
            debug!("HTTP Response: {}", log_data);
        }
    }

    pub fn log_failure(&self, correlation_id: &str, error: &str, duration: Duration) {
        let log_data = json!({
            "event": "http_failure",
            "correlation_id": correlation_id,
            "error": error,
            "duration_ms": duration.as_millis(),
            "timestamp": chrono::Utc::now().to_rfc3339()
        });

        warn!("HTTP Failure: {}", log_data);
    }
}

/// Replace credential-bearing header values before they reach the log
pub fn sanitize_headers(headers: &[(String, String)]) -> Value {
    let mut sanitized = serde_json::Map::new();
    for (name, value) in headers {
        let value = if REDACTED_HEADERS.contains(&name.to_ascii_lowercase().as_str()) {
            "[REDACTED]".to_string()
        } else {
            value.clone()
        };
        sanitized.insert(name.clone(), Value::String(value));
    }
    Value::Object(sanitized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorization_is_redacted() {
        let headers = vec![
            ("Authorization".to_string(), "Bearer secret-token".to_string()),
            ("Accept".to_string(), "application/json".to_string()),
        ];
        let sanitized = sanitize_headers(&headers);
        assert_eq!(sanitized["Authorization"], "[REDACTED]");
        assert_eq!(sanitized["Accept"], "application/json");
    }
}
