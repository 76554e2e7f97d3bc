//! Credential storage and the shared auth session
//!
//! Every [`ApiClient`](super::ApiClient) variant (plain, upload, download)
//! built from one [`AuthSession`] sees the same default `Authorization` header,
//! so a refresh performed through any of them updates all of them.

use super::error::ApiError;
use anyhow::Context;
use chrono::{DateTime, Utc};
use futures::future::{BoxFuture, FutureExt, Shared};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

/// Access/refresh token pair as persisted between runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl TokenPair {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: None,
            expires_at: None,
        }
    }

    pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(refresh_token.into());
        self
    }

    pub fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Tokens without an expiry never count as expired
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map(|at| at <= now).unwrap_or(false)
    }

    /// Parse a refresh response: `{access_token, refresh_token?, expires_in?}`,
    /// optionally wrapped in `data`. A missing refresh token keeps `previous`.
    pub fn from_refresh_response(body: &Value, previous_refresh: Option<&str>) -> Result<Self, ApiError> {
        let source = body.get("data").filter(|d| d.is_object()).unwrap_or(body);

        let access_token = source
            .get("access_token")
            .or_else(|| source.get("token"))
            .and_then(Value::as_str)
            .ok_or_else(|| ApiError::Decode("no access token in refresh response".to_string()))?;

        let refresh_token = source
            .get("refresh_token")
            .and_then(Value::as_str)
            .or(previous_refresh)
            .map(str::to_string);

        let expires_at = source
            .get("expires_in")
            .and_then(Value::as_i64)
            .map(|secs| Utc::now() + chrono::Duration::seconds(secs));

        Ok(Self {
            access_token: access_token.to_string(),
            refresh_token,
            expires_at,
        })
    }
}

/// Persisted credential storage
pub trait TokenStore: Send + Sync {
    fn load(&self) -> anyhow::Result<Option<TokenPair>>;
    fn save(&self, tokens: &TokenPair) -> anyhow::Result<()>;
    fn clear(&self) -> anyhow::Result<()>;
}

/// JSON file token store, `tokens.json` next to the config file
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> anyhow::Result<Option<TokenPair>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read token file: {:?}", self.path))?;
        let tokens = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse token file: {:?}", self.path))?;
        Ok(Some(tokens))
    }

    fn save(&self, tokens: &TokenPair) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create token directory: {:?}", parent))?;
        }
        let content = serde_json::to_string_pretty(tokens)?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write token file: {:?}", self.path))?;
        Ok(())
    }

    fn clear(&self) -> anyhow::Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .with_context(|| format!("Failed to remove token file: {:?}", self.path))?;
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: Mutex<Option<TokenPair>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(tokens: TokenPair) -> Self {
        Self {
            tokens: Mutex::new(Some(tokens)),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> anyhow::Result<Option<TokenPair>> {
        Ok(self.tokens.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    fn save(&self, tokens: &TokenPair) -> anyhow::Result<()> {
        *self.tokens.lock().unwrap_or_else(|e| e.into_inner()) = Some(tokens.clone());
        Ok(())
    }

    fn clear(&self) -> anyhow::Result<()> {
        *self.tokens.lock().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }
}

/// Receives the blocking "session expired" notice
pub trait SessionNotifier: Send + Sync {
    fn session_expired(&self, message: &str);
}

/// Notifier that only logs
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl SessionNotifier for LogNotifier {
    fn session_expired(&self, message: &str) {
        warn!("{}", message);
    }
}

pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please log in again.";

type RefreshResult = Result<TokenPair, ApiError>;
type SharedRefresh = Shared<BoxFuture<'static, RefreshResult>>;

struct InFlightRefresh {
    id: u64,
    future: SharedRefresh,
}

/// Explicit auth context: persisted tokens, the in-memory default header and
/// the single in-flight refresh.
pub struct AuthSession {
    store: Arc<dyn TokenStore>,
    notifier: Arc<dyn SessionNotifier>,
    default_header: RwLock<Option<String>>,
    in_flight: Mutex<Option<InFlightRefresh>>,
    refresh_ids: AtomicU64,
}

impl AuthSession {
    pub fn new(store: Arc<dyn TokenStore>, notifier: Arc<dyn SessionNotifier>) -> Self {
        let header = match store.load() {
            Ok(tokens) => tokens.map(|t| bearer(&t.access_token)),
            Err(e) => {
                warn!("Ignoring unreadable token store: {:#}", e);
                None
            }
        };

        Self {
            store,
            notifier,
            default_header: RwLock::new(header),
            in_flight: Mutex::new(None),
            refresh_ids: AtomicU64::new(0),
        }
    }

    /// Session backed by an in-memory store and the logging notifier
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryTokenStore::new()), Arc::new(LogNotifier))
    }

    /// `Authorization` header value for the next request
    pub fn authorization(&self) -> Option<String> {
        if let Some(header) = self.default_header.read().unwrap_or_else(|e| e.into_inner()).clone() {
            return Some(header);
        }
        self.tokens().map(|t| bearer(&t.access_token))
    }

    pub fn tokens(&self) -> Option<TokenPair> {
        match self.store.load() {
            Ok(tokens) => tokens,
            Err(e) => {
                warn!("Failed to load tokens: {:#}", e);
                None
            }
        }
    }

    pub fn set_tokens(&self, tokens: TokenPair) -> Result<(), ApiError> {
        self.store
            .save(&tokens)
            .map_err(|e| ApiError::Storage(format!("{:#}", e)))?;
        *self.default_header.write().unwrap_or_else(|e| e.into_inner()) = Some(bearer(&tokens.access_token));
        debug!("Stored new access token");
        Ok(())
    }

    /// Drop persisted tokens and the in-memory default header
    pub fn clear(&self) {
        if let Err(e) = self.store.clear() {
            warn!("Failed to clear persisted tokens: {:#}", e);
        }
        *self.default_header.write().unwrap_or_else(|e| e.into_inner()) = None;
        info!("Cleared stored credentials");
    }

    /// Clear credentials and raise the session-expired notice
    pub fn expire(&self) {
        self.clear();
        self.notifier.session_expired(SESSION_EXPIRED_MESSAGE);
    }

    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        self.tokens()
            .map(|t| t.is_expired(now) && t.refresh_token.is_some())
            .unwrap_or(false)
    }

    pub fn is_refreshing(&self) -> bool {
        self.in_flight.lock().unwrap_or_else(|e| e.into_inner()).is_some()
    }

    /// Run `start` as the refresh, or join the refresh already in flight.
    ///
    /// `start` receives the stored refresh token. Exactly one awaiter applies
    /// the result and clears the guard once it settles, success or not.
    pub async fn refresh_with<F>(&self, start: F) -> RefreshResult
    where
        F: FnOnce(String) -> BoxFuture<'static, RefreshResult>,
    {
        let (id, future) = {
            let mut guard = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
            match guard.as_ref() {
                Some(in_flight) => {
                    debug!("Joining in-flight token refresh #{}", in_flight.id);
                    (in_flight.id, in_flight.future.clone())
                }
                None => {
                    let refresh_token = self
                        .tokens()
                        .and_then(|t| t.refresh_token)
                        .ok_or(ApiError::NoRefreshToken)?;
                    let id = self.refresh_ids.fetch_add(1, Ordering::SeqCst) + 1;
                    info!("Starting token refresh #{}", id);
                    let future = start(refresh_token).shared();
                    *guard = Some(InFlightRefresh {
                        id,
                        future: future.clone(),
                    });
                    (id, future)
                }
            }
        };

        let result = future.await;

        // Tokens are applied before the guard is released
        let mut guard = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        if guard.as_ref().is_some_and(|in_flight| in_flight.id == id) {
            let applied = self.apply_refresh(id, &result);
            *guard = None;
            drop(guard);
            applied?;
        }

        result
    }

    fn apply_refresh(&self, id: u64, result: &RefreshResult) -> Result<(), ApiError> {
        match result {
            Ok(tokens) => {
                self.set_tokens(tokens.clone())?;
                info!("Token refresh #{} succeeded", id);
            }
            Err(ApiError::SessionExpired) => {
                warn!("Token refresh #{} hit an expired session", id);
                self.expire();
            }
            Err(e) if e.is_auth_expired() => {
                warn!("Token refresh #{} rejected: {}", id, e);
                self.clear();
            }
            Err(e) => warn!("Token refresh #{} failed: {}", id, e),
        }
        Ok(())
    }
}

fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}
