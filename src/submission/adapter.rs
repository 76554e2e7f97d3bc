use super::mapping::{error_message, map_errors};
use super::payload::build_payload;
use crate::api::client::{ApiClient, RequestConfig};
use crate::api::constants;
use crate::api::error::ApiError;
use crate::api::transport::{Method, RequestBody};
use crate::form::config::CategoryConfig;
use crate::form::field::Field;
use crate::form::mode::FormMode;
use crate::form::snapshot::FormSnapshot;
use log::{info, warn};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SubmissionKind {
    Created,
    Updated,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionOutcome {
    pub kind: SubmissionKind,
    pub listing_id: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SubmissionError {
    /// Client-side validation failed; nothing was sent
    #[error("Please fix the {} highlighted field(s)", .0.len())]
    Invalid(BTreeMap<Field, String>),

    /// 400/422 with field errors keyed by frontend name
    #[error("{message}")]
    ServerValidation {
        message: String,
        errors: BTreeMap<String, String>,
    },

    #[error("The selected files are too large to upload")]
    PayloadTooLarge,

    #[error("The server failed to save the listing (status {status}), please try again later")]
    Server { status: u16 },

    #[error("Could not reach the server, check your connection: {0}")]
    Network(String),

    #[error("Your session has expired, please sign in again")]
    AuthExpired,

    #[error("Unexpected response from the server: {message}")]
    Unexpected { status: Option<u16>, message: String },
}

impl From<ApiError> for SubmissionError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::Network(message) => SubmissionError::Network(message),
            ApiError::Unauthorized | ApiError::SessionExpired | ApiError::NoRefreshToken => {
                SubmissionError::AuthExpired
            }
            ApiError::Status { status, body } => match status {
                400 | 422 => SubmissionError::ServerValidation {
                    message: error_message(&body).unwrap_or_else(|| "The listing could not be saved".to_string()),
                    errors: map_errors(&body),
                },
                413 => SubmissionError::PayloadTooLarge,
                500..=599 => SubmissionError::Server { status },
                _ => SubmissionError::Unexpected {
                    status: Some(status),
                    message: error_message(&body).unwrap_or_else(|| format!("status {}", status)),
                },
            },
            ApiError::Decode(message) | ApiError::Storage(message) => {
                SubmissionError::Unexpected { status: None, message }
            }
        }
    }
}

/// Send the form to the create or update endpoint through the upload client
pub async fn submit(
    client: &ApiClient,
    snapshot: &FormSnapshot,
    config: &CategoryConfig,
    mode: &FormMode,
) -> Result<SubmissionOutcome, SubmissionError> {
    let payload = build_payload(snapshot, config, mode);
    let (endpoint, kind) = if mode.is_edit() {
        (constants::UPDATE_LISTING_ENDPOINT, SubmissionKind::Updated)
    } else {
        (constants::CREATE_LISTING_ENDPOINT, SubmissionKind::Created)
    };

    info!(
        "Submitting {} listing to {} ({} parts, {} bytes of media)",
        config.key,
        endpoint,
        payload.parts().len(),
        payload.file_bytes()
    );

    let response = client
        .upload_client()
        .request(Method::Post, endpoint, RequestBody::Multipart(payload), RequestConfig::default())
        .await
        .map_err(|e| {
            warn!("Submission to {} failed: {}", endpoint, e);
            SubmissionError::from(e)
        })?;

    let body = response.json_body().map_err(SubmissionError::from)?;
    Ok(SubmissionOutcome {
        kind,
        listing_id: listing_id(&body).or_else(|| mode.record_id().map(str::to_string)),
        message: error_message(&body),
    })
}

fn listing_id(body: &Value) -> Option<String> {
    let id = body
        .get("data")
        .and_then(|d| d.get("id"))
        .or_else(|| body.get("id"))?;
    match id {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_classification() {
        let status = |status: u16, body: Value| SubmissionError::from(ApiError::Status { status, body });

        assert!(matches!(status(422, json!({"errors": {}})), SubmissionError::ServerValidation { .. }));
        assert!(matches!(status(400, json!({})), SubmissionError::ServerValidation { .. }));
        assert_eq!(status(413, Value::Null), SubmissionError::PayloadTooLarge);
        assert_eq!(status(500, Value::Null), SubmissionError::Server { status: 500 });
        assert!(matches!(
            status(409, json!({"message": "duplicate"})),
            SubmissionError::Unexpected { status: Some(409), .. }
        ));
        assert_eq!(
            SubmissionError::from(ApiError::Network("reset".into())),
            SubmissionError::Network("reset".into())
        );
        assert_eq!(SubmissionError::from(ApiError::SessionExpired), SubmissionError::AuthExpired);
    }

    #[test]
    fn test_messages_are_distinct() {
        let messages: Vec<String> = [
            SubmissionError::PayloadTooLarge,
            SubmissionError::Server { status: 500 },
            SubmissionError::Network("timeout".into()),
            SubmissionError::AuthExpired,
        ]
        .iter()
        .map(ToString::to_string)
        .collect();
        for (i, a) in messages.iter().enumerate() {
            for b in &messages[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_listing_id_probe() {
        assert_eq!(listing_id(&json!({"data": {"id": 5}})).as_deref(), Some("5"));
        assert_eq!(listing_id(&json!({"id": "abc"})).as_deref(), Some("abc"));
        assert_eq!(listing_id(&json!({"ok": true})), None);
    }
}
