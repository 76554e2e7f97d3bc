use crate::api::client::{ApiClient, RequestConfig};
use crate::api::constants;
use crate::api::error::ApiError;
use crate::api::transport::{Method, RequestBody};
use log::info;

/// A delete the user has asked for but not yet confirmed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteRequest {
    listing_id: String,
}

/// A delete that passed the confirm step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmedDelete {
    listing_id: String,
}

impl DeleteRequest {
    pub fn new(listing_id: impl Into<String>) -> Self {
        Self {
            listing_id: listing_id.into(),
        }
    }

    pub fn listing_id(&self) -> &str {
        &self.listing_id
    }

    pub fn confirm(self) -> ConfirmedDelete {
        ConfirmedDelete {
            listing_id: self.listing_id,
        }
    }
}

impl ConfirmedDelete {
    pub fn listing_id(&self) -> &str {
        &self.listing_id
    }
}

impl ApiClient {
    pub async fn delete_listing(&self, delete: ConfirmedDelete) -> Result<(), ApiError> {
        let endpoint = constants::listing_endpoint(delete.listing_id());
        self.request(Method::Delete, &endpoint, RequestBody::Empty, RequestConfig::default())
            .await?;
        info!("Deleted listing {}", delete.listing_id());
        Ok(())
    }
}
