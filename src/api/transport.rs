//! HTTP transport seam
//!
//! [`ApiClient`](super::ApiClient) talks to the backend through the
//! [`Transport`] trait. [`HttpTransport`] is the production implementation on
//! top of `reqwest`; [`ScriptedTransport`] is the in-memory test double that
//! replays canned responses.

use super::error::ApiError;
use super::multipart::{MultipartPayload, Part};
use crate::config::ApiSettings;
use anyhow::Context;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(Value),
    Multipart(MultipartPayload),
}

/// A fully prepared request, headers included
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub base_url: String,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
    pub timeout: Option<Duration>,
}

impl ApiRequest {
    pub fn url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.path)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn json(status: u16, body: &Value) -> Self {
        Self::new(status, body.to_string())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body as JSON; an empty body decodes to `Value::Null`
    pub fn json_body(&self) -> Result<Value, ApiError> {
        if self.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&self.body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Best-effort body for error reporting: JSON if it parses, text otherwise
    pub fn lossy_body(&self) -> Value {
        self.json_body().unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&self.body).into_owned()))
    }
}

/// The request did not produce a response
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{0}")]
pub struct TransportError(pub String);

#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;
}

/// `reqwest`-backed transport with connection pooling
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(settings: &ApiSettings) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .timeout(Duration::from_secs(settings.timeout_secs))
            .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
            .user_agent(settings.user_agent.clone())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client })
    }

    fn to_form(payload: MultipartPayload) -> Result<reqwest::multipart::Form, TransportError> {
        let mut form = reqwest::multipart::Form::new();
        for part in payload.into_parts() {
            form = match part {
                Part::Text { name, value } => form.text(name, value),
                Part::File {
                    name,
                    file_name,
                    mime_type,
                    bytes,
                } => {
                    let part = reqwest::multipart::Part::bytes(bytes)
                        .file_name(file_name)
                        .mime_str(&mime_type)
                        .map_err(|e| TransportError(format!("invalid mime type '{}': {}", mime_type, e)))?;
                    form.part(name, part)
                }
            };
        }
        Ok(form)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, request.url());
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }
        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart(payload) => builder.multipart(Self::to_form(payload)?),
        };

        let response = builder.send().await.map_err(|e| TransportError(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError(e.to_string()))?
            .to_vec();

        Ok(ApiResponse { status, body })
    }
}

#[derive(Debug, Clone)]
enum Scripted {
    Respond(ApiResponse, Option<Duration>),
    Fail(String),
}

#[derive(Debug)]
struct Route {
    method: Method,
    path: String,
    /// Only match requests carrying this query pair
    query: Option<(String, String)>,
    queue: VecDeque<Scripted>,
}

impl Route {
    fn matches(&self, request: &ApiRequest) -> bool {
        self.method == request.method
            && self.path == request.path
            && self
                .query
                .as_ref()
                .is_none_or(|pair| request.query.iter().any(|q| q == pair))
    }
}

#[derive(Debug, Default)]
struct ScriptedInner {
    routes: Vec<Route>,
    requests: Vec<ApiRequest>,
}

/// In-memory transport that replays scripted responses per `(method, path)`.
///
/// Responses queue up per route; the last one is sticky and repeats once the
/// queue drains. Unscripted routes answer 404. Every request is recorded.
#[derive(Debug, Clone, Default)]
pub struct ScriptedTransport {
    inner: Arc<Mutex<ScriptedInner>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, method: Method, path: &str, query: Option<(String, String)>, scripted: Scripted) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        match inner
            .routes
            .iter_mut()
            .find(|r| r.method == method && r.path == path && r.query == query)
        {
            Some(route) => route.queue.push_back(scripted),
            None => inner.routes.push(Route {
                method,
                path: path.to_string(),
                query,
                queue: VecDeque::from([scripted]),
            }),
        }
    }

    pub fn respond(&self, method: Method, path: &str, status: u16, body: Value) -> &Self {
        self.push(method, path, None, Scripted::Respond(ApiResponse::json(status, &body), None));
        self
    }

    /// Like [`respond`](Self::respond) but the response arrives after `delay`
    pub fn respond_after(&self, delay: Duration, method: Method, path: &str, status: u16, body: Value) -> &Self {
        self.push(method, path, None, Scripted::Respond(ApiResponse::json(status, &body), Some(delay)));
        self
    }

    /// Respond after `delay`, only to requests whose query has `key=value`.
    ///
    /// Query routes are tried before plain routes for the same path.
    pub fn respond_to_query(
        &self,
        method: Method,
        path: &str,
        (key, value): (&str, &str),
        delay: Duration,
        status: u16,
        body: Value,
    ) -> &Self {
        let query = Some((key.to_string(), value.to_string()));
        self.push(method, path, query, Scripted::Respond(ApiResponse::json(status, &body), Some(delay)));
        self
    }

    /// Fail the request without a response
    pub fn fail(&self, method: Method, path: &str, message: &str) -> &Self {
        self.push(method, path, None, Scripted::Fail(message.to_string()));
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).requests.clone()
    }

    pub fn request_count(&self, method: Method, path: &str) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .requests
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    pub fn last_request(&self, method: Method, path: &str) -> Option<ApiRequest> {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .requests
            .iter()
            .rev()
            .find(|r| r.method == method && r.path == path)
            .cloned()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let scripted = {
            let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            inner.requests.push(request.clone());
            let index = inner
                .routes
                .iter()
                .position(|r| r.query.is_some() && r.matches(&request))
                .or_else(|| inner.routes.iter().position(|r| r.query.is_none() && r.matches(&request)));
            index
                .and_then(|i| inner.routes.get_mut(i))
                .and_then(|route| {
                    if route.queue.len() > 1 {
                        route.queue.pop_front()
                    } else {
                        route.queue.front().cloned()
                    }
                })
        };

        match scripted {
            Some(Scripted::Respond(response, delay)) => {
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                Ok(response)
            }
            Some(Scripted::Fail(message)) => Err(TransportError(message)),
            None => Ok(ApiResponse::json(404, &serde_json::json!({"message": "not found"}))),
        }
    }
}
