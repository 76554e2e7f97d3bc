use super::auth::{AuthSession, TokenPair};
use super::constants::{self, headers};
use super::error::ApiError;
use super::logging::RequestLogger;
use super::transport::{ApiRequest, ApiResponse, Method, RequestBody, Transport};
use futures::future::FutureExt;
use log::{debug, warn};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Which backend client flavour a request goes through.
///
/// All flavours share one [`AuthSession`]; they differ in accept headers and
/// time budgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientKind {
    Json,
    Upload,
    Download,
}

impl ClientKind {
    fn default_timeout(&self) -> Option<Duration> {
        match self {
            ClientKind::Json => None,
            ClientKind::Upload | ClientKind::Download => Some(Duration::from_secs(300)),
        }
    }

    fn accept(&self) -> &'static str {
        match self {
            ClientKind::Json | ClientKind::Upload => headers::CONTENT_TYPE_JSON,
            ClientKind::Download => headers::ACCEPT_ANY,
        }
    }
}

/// Per-request options
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    pub query: Vec<(String, String)>,
    pub timeout: Option<Duration>,
    /// Send without an Authorization header and skip the expiry check
    pub anonymous: bool,
}

impl RequestConfig {
    pub fn with_query(query: Vec<(String, String)>) -> Self {
        Self {
            query,
            ..Self::default()
        }
    }
}

/// Marketplace backend client
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    kind: ClientKind,
    transport: Arc<dyn Transport>,
    session: Arc<AuthSession>,
    logger: RequestLogger,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, transport: Arc<dyn Transport>, session: Arc<AuthSession>) -> Self {
        Self {
            base_url: base_url.into(),
            kind: ClientKind::Json,
            transport,
            session,
            logger: RequestLogger::new(),
        }
    }

    /// Same configuration and session, tuned for multipart uploads
    pub fn upload_client(&self) -> Self {
        Self {
            kind: ClientKind::Upload,
            ..self.clone()
        }
    }

    /// Same configuration and session, tuned for file downloads
    pub fn download_client(&self) -> Self {
        Self {
            kind: ClientKind::Download,
            ..self.clone()
        }
    }

    pub fn kind(&self) -> ClientKind {
        self.kind
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<AuthSession> {
        &self.session
    }

    /// Send a request and classify the outcome.
    ///
    /// 401 clears credentials, 440 clears them and raises the session notice,
    /// 403/429/500 are only logged. Any non-2xx is returned as an error.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
        config: RequestConfig,
    ) -> Result<ApiResponse, ApiError> {
        if !config.anonymous && self.session.needs_refresh(chrono::Utc::now()) {
            if let Err(e) = self.refresh_session().await {
                warn!("Proceeding with stale credentials after failed refresh: {}", e);
            }
        }

        let correlation_id = uuid::Uuid::new_v4().to_string();
        let mut request_headers = vec![
            (headers::ACCEPT.to_string(), self.kind.accept().to_string()),
            (headers::X_CORRELATION_ID.to_string(), correlation_id.clone()),
        ];
        if !config.anonymous {
            if let Some(authorization) = self.session.authorization() {
                request_headers.push((headers::AUTHORIZATION.to_string(), authorization));
            }
        }

        let request = ApiRequest {
            method,
            base_url: self.base_url.clone(),
            path: path.to_string(),
            query: config.query,
            headers: request_headers,
            body,
            timeout: config.timeout.or_else(|| self.kind.default_timeout()),
        };

        self.logger
            .log_request(&correlation_id, method.as_str(), &request.url(), &request.headers);
        let started = Instant::now();

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                self.logger.log_failure(&correlation_id, &e.0, started.elapsed());
                return Err(ApiError::Network(e.0));
            }
        };
        self.logger
            .log_response(&correlation_id, response.status, started.elapsed());

        self.classify(method, path, response)
    }

    fn classify(&self, method: Method, path: &str, response: ApiResponse) -> Result<ApiResponse, ApiError> {
        if response.is_success() {
            return Ok(response);
        }

        match response.status {
            401 => {
                warn!("{} {} returned 401, clearing credentials", method.as_str(), path);
                self.session.clear();
                Err(ApiError::Unauthorized)
            }
            constants::STATUS_SESSION_EXPIRED => {
                warn!("{} {} returned 440, session expired", method.as_str(), path);
                self.session.expire();
                Err(ApiError::SessionExpired)
            }
            403 => {
                warn!("{} {} forbidden", method.as_str(), path);
                Err(status_error(&response))
            }
            429 => {
                warn!("{} {} rate limited", method.as_str(), path);
                Err(status_error(&response))
            }
            500 => {
                warn!("{} {} internal server error", method.as_str(), path);
                Err(status_error(&response))
            }
            status => {
                debug!("{} {} failed with status {}", method.as_str(), path, status);
                Err(status_error(&response))
            }
        }
    }

    pub async fn get_json(&self, path: &str, query: Vec<(String, String)>) -> Result<Value, ApiError> {
        self.request(Method::Get, path, RequestBody::Empty, RequestConfig::with_query(query))
            .await?
            .json_body()
    }

    pub async fn post_json(&self, path: &str, body: Value) -> Result<Value, ApiError> {
        self.request(Method::Post, path, RequestBody::Json(body), RequestConfig::default())
            .await?
            .json_body()
    }

    /// Exchange the stored refresh token, joining any refresh already running
    pub async fn refresh_session(&self) -> Result<TokenPair, ApiError> {
        let transport = self.transport.clone();
        let base_url = self.base_url.clone();

        self.session
            .refresh_with(move |refresh_token| {
                async move {
                    let request = ApiRequest {
                        method: Method::Post,
                        base_url,
                        path: constants::REFRESH_TOKEN_ENDPOINT.to_string(),
                        query: Vec::new(),
                        headers: vec![(headers::ACCEPT.to_string(), headers::CONTENT_TYPE_JSON.to_string())],
                        body: RequestBody::Json(json!({ "refresh_token": refresh_token })),
                        timeout: None,
                    };

                    let response = transport
                        .send(request)
                        .await
                        .map_err(|e| ApiError::Network(e.0))?;

                    match response.status {
                        200..=299 => TokenPair::from_refresh_response(&response.json_body()?, Some(refresh_token.as_str())),
                        401 => Err(ApiError::Unauthorized),
                        constants::STATUS_SESSION_EXPIRED => Err(ApiError::SessionExpired),
                        _ => Err(status_error(&response)),
                    }
                }
                .boxed()
            })
            .await
    }
}

fn status_error(response: &ApiResponse) -> ApiError {
    ApiError::Status {
        status: response.status,
        body: response.lossy_body(),
    }
}
