//! "Load more" listing feed
//!
//! Pages are requested one at a time; a trigger while a page is in flight is
//! refused. Items merge in arrival order with duplicates (by id) dropped.

use super::status::Listing;
use crate::api::client::ApiClient;
use crate::api::constants;
use crate::api::error::ApiError;
use crate::api::pagination::{PaginatedList, normalize};
use log::{debug, warn};
use serde_json::Value;
use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedFilters {
    pub category: Option<String>,
    pub search: Option<String>,
}

impl FeedFilters {
    fn query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(category) = self.category.as_deref().filter(|c| !c.is_empty()) {
            query.push(("category".to_string(), category.to_string()));
        }
        if let Some(search) = self.search.as_deref().filter(|s| !s.trim().is_empty()) {
            query.push(("search".to_string(), search.trim().to_string()));
        }
        query
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub query: Vec<(String, String)>,
}

#[derive(Debug, Clone)]
pub struct ListingFeed {
    per_page: u32,
    filters: FeedFilters,
    next_page: u32,
    items: Vec<Listing>,
    seen: HashSet<String>,
    has_more: bool,
    is_loading: bool,
    last_error: Option<String>,
}

impl ListingFeed {
    pub fn new(per_page: u32, filters: FeedFilters) -> Self {
        Self {
            per_page: per_page.max(1),
            filters,
            next_page: 1,
            items: Vec::new(),
            seen: HashSet::new(),
            has_more: true,
            is_loading: false,
            last_error: None,
        }
    }

    pub fn items(&self) -> &[Listing] {
        &self.items
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Claim the next page, or `None` while busy or exhausted
    pub fn begin_page(&mut self) -> Option<PageRequest> {
        if self.is_loading || !self.has_more {
            return None;
        }
        self.is_loading = true;

        let mut query = self.filters.query();
        query.push(("page".to_string(), self.next_page.to_string()));
        query.push(("per_page".to_string(), self.per_page.to_string()));
        Some(PageRequest {
            page: self.next_page,
            query,
        })
    }

    /// Merge a finished page; returns how many new items were added
    pub fn finish_page(&mut self, request: &PageRequest, result: Result<PaginatedList<Value>, ApiError>) -> usize {
        self.is_loading = false;

        let page = match result {
            Ok(page) => page,
            Err(e) => {
                warn!("Loading feed page {} failed: {}", request.page, e);
                self.last_error = Some(e.to_string());
                return 0;
            }
        };
        self.last_error = None;
        self.has_more = page.has_more(self.per_page as usize);
        self.next_page = page.current_page.unwrap_or(request.page) + 1;

        let mut added = 0;
        for listing in page.filter_map(|item| Listing::from_value(&item)).items {
            if self.seen.insert(listing.id.clone()) {
                self.items.push(listing);
                added += 1;
            }
        }
        debug!("Feed page {} added {} listings (has_more: {})", request.page, added, self.has_more);
        added
    }

    /// Fetch and merge the next page
    pub async fn load_more(&mut self, client: &ApiClient) -> Result<usize, ApiError> {
        let Some(request) = self.begin_page() else {
            return Ok(0);
        };
        let result = client
            .get_json(constants::LISTINGS_ENDPOINT, request.query.clone())
            .await
            .map(|payload| normalize(&payload));

        let error = result.as_ref().err().cloned();
        let added = self.finish_page(&request, result);
        match error {
            Some(e) => Err(e),
            None => Ok(added),
        }
    }

    /// Start over, optionally with new filters
    pub fn reset(&mut self, filters: Option<FeedFilters>) {
        let filters = filters.unwrap_or_else(|| self.filters.clone());
        *self = Self::new(self.per_page, filters);
    }
}
