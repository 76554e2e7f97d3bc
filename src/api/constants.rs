//! Backend endpoints and header names

/// Create a new listing
pub const CREATE_LISTING_ENDPOINT: &str = "/upload-form";

/// Update an existing listing
pub const UPDATE_LISTING_ENDPOINT: &str = "/upload/update";

/// Exchange a refresh token for a new access token
pub const REFRESH_TOKEN_ENDPOINT: &str = "/refresh-token";

/// Paginated listing feed
pub const LISTINGS_ENDPOINT: &str = "/listings";

/// Reference data for the top of each dropdown chain
pub const STATES_ENDPOINT: &str = "/states";
pub const BRANDS_ENDPOINT: &str = "/brands";

/// Dependent dropdown endpoints
pub const DISTRICTS_ENDPOINT: &str = "/districts";
pub const CITIES_ENDPOINT: &str = "/cities";
pub const MODELS_ENDPOINT: &str = "/models";

/// Backend-specific status code for an expired session
pub const STATUS_SESSION_EXPIRED: u16 = 440;

pub mod headers {
    pub const AUTHORIZATION: &str = "Authorization";
    pub const ACCEPT: &str = "Accept";
    pub const CONTENT_TYPE_JSON: &str = "application/json";
    pub const ACCEPT_ANY: &str = "*/*";
    pub const X_CORRELATION_ID: &str = "X-Correlation-Id";
}

/// Endpoint for a single listing record
pub fn listing_endpoint(id: &str) -> String {
    format!("{}/{}", LISTINGS_ENDPOINT, urlencoding::encode(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_endpoint_encodes_id() {
        assert_eq!(listing_endpoint("42"), "/listings/42");
        assert_eq!(listing_endpoint("a b"), "/listings/a%20b");
    }
}
