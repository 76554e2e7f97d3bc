//! Shared fixtures for integration tests
#![allow(dead_code)]

use listing_engine::Session;
use listing_engine::api::{AuthSession, LogNotifier, MemoryTokenStore, ScriptedTransport, TokenPair};
use listing_engine::config::Config;
use std::sync::Arc;

pub const BASE_URL: &str = "http://backend.test/api";
pub const ACCESS_TOKEN: &str = "test-access-token";

pub fn config() -> Config {
    let mut config = Config::default();
    config.api.base_url = BASE_URL.to_string();
    config.retry.jitter = false;
    config.retry.base_delay_ms = 10;
    config
}

/// Session over `transport` with a valid, non-expiring token
pub fn session(transport: &ScriptedTransport) -> Session {
    let store = MemoryTokenStore::with_tokens(TokenPair::new(ACCESS_TOKEN).with_refresh_token("test-refresh"));
    let auth = Arc::new(AuthSession::new(Arc::new(store), Arc::new(LogNotifier)));
    Session::with_transport(config(), Arc::new(transport.clone()), auth)
}

/// Session over `transport` with no stored credentials
pub fn anonymous_session(transport: &ScriptedTransport) -> Session {
    Session::with_transport(config(), Arc::new(transport.clone()), Arc::new(AuthSession::in_memory()))
}
