//! Per-user session context
//!
//! Built once from [`Config`], it owns the API client (and with it the auth
//! session) and the dropdown cache. Components receive it or pieces of it
//! explicitly; [`Session::clear`] drops cached data and credentials together.

use crate::api::auth::{AuthSession, FileTokenStore, LogNotifier};
use crate::api::client::ApiClient;
use crate::api::retry::{RetryConfig, RetryPolicy};
use crate::api::transport::{HttpTransport, Transport};
use crate::config::Config;
use crate::dropdown::DropdownCache;
use crate::form::{CategoryConfig, FormSession};
use crate::listing::{FeedFilters, ListingFeed, ScrollGate, ScrollGateConfig};
use anyhow::Result;
use log::info;
use std::sync::Arc;

pub struct Session {
    config: Config,
    client: ApiClient,
    cache: Arc<DropdownCache>,
}

impl Session {
    /// HTTP transport and tokens persisted under the config directory
    pub fn from_config(config: Config) -> Result<Self> {
        let transport = Arc::new(HttpTransport::new(&config.api)?);
        let store = Arc::new(FileTokenStore::new(Config::tokens_path()?));
        let auth = Arc::new(AuthSession::new(store, Arc::new(LogNotifier)));
        Ok(Self::with_transport(config, transport, auth))
    }

    pub fn with_transport(config: Config, transport: Arc<dyn Transport>, auth: Arc<AuthSession>) -> Self {
        let client = ApiClient::new(config.api.base_url.clone(), transport, auth);
        let retry = RetryPolicy::new(RetryConfig::from(&config.retry));
        let cache = Arc::new(DropdownCache::with_retry(config.cache.ttl(), retry));
        info!("Session ready for {}", config.api.base_url);
        Self { config, client, cache }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn auth(&self) -> &Arc<AuthSession> {
        self.client.session()
    }

    pub fn cache(&self) -> &Arc<DropdownCache> {
        &self.cache
    }

    /// A new form for `category_key`; `context_subcategory` applies to unknown keys
    pub fn form(&self, category_key: &str, context_subcategory: Option<u32>) -> FormSession {
        FormSession::new(
            CategoryConfig::resolve(category_key, context_subcategory),
            self.client.clone(),
            self.cache.clone(),
        )
    }

    pub fn feed(&self, filters: FeedFilters) -> ListingFeed {
        ListingFeed::new(self.config.feed.per_page, filters)
    }

    pub fn scroll_gate(&self) -> ScrollGate {
        ScrollGate::new(ScrollGateConfig::from(&self.config.feed))
    }

    /// Forget cached reference data and stored credentials
    pub fn clear(&self) {
        self.cache.clear();
        self.client.session().clear();
    }
}
