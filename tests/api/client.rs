use crate::support;
use chrono::{Duration as ChronoDuration, Utc};
use listing_engine::api::{
    ApiClient, ApiError, AuthSession, LogNotifier, MemoryTokenStore, Method, ScriptedTransport, TokenPair,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn expired_client(transport: &ScriptedTransport) -> ApiClient {
    let tokens = TokenPair::new("expired-token")
        .with_refresh_token("refresh-1")
        .with_expiry(Utc::now() - ChronoDuration::seconds(60));
    let auth = Arc::new(AuthSession::new(
        Arc::new(MemoryTokenStore::with_tokens(tokens)),
        Arc::new(LogNotifier),
    ));
    ApiClient::new(support::BASE_URL, Arc::new(transport.clone()), auth)
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_requests_share_one_refresh() {
    let transport = ScriptedTransport::new();
    transport
        .respond_after(
            Duration::from_millis(50),
            Method::Post,
            "/refresh-token",
            200,
            json!({"access_token": "fresh-token", "expires_in": 3600}),
        )
        .respond(Method::Get, "/states", 200, json!([]))
        .respond(Method::Get, "/listings", 200, json!([]));

    let json_client = expired_client(&transport);
    let upload = json_client.upload_client();
    let download = json_client.download_client();

    let (a, b, c) = tokio::join!(
        json_client.get_json("/states", Vec::new()),
        upload.get_json("/listings", Vec::new()),
        download.get_json("/states", Vec::new()),
    );
    assert!(a.is_ok() && b.is_ok() && c.is_ok());

    assert_eq!(transport.request_count(Method::Post, "/refresh-token"), 1);
    let refresh = transport.last_request(Method::Post, "/refresh-token").unwrap();
    assert!(refresh.header("Authorization").is_none());

    for request in transport.requests().iter().filter(|r| r.path != "/refresh-token") {
        assert_eq!(request.header("Authorization"), Some("Bearer fresh-token"));
    }
    let tokens = json_client.session().tokens().unwrap();
    assert_eq!(tokens.access_token, "fresh-token");
    assert_eq!(tokens.refresh_token.as_deref(), Some("refresh-1"));
    assert!(!json_client.session().is_refreshing());
}

#[tokio::test(start_paused = true)]
async fn test_failed_refresh_is_shared_and_cleared() {
    let transport = ScriptedTransport::new();
    transport.respond_after(
        Duration::from_millis(50),
        Method::Post,
        "/refresh-token",
        401,
        json!({"message": "revoked"}),
    );
    let client = expired_client(&transport);

    let (first, second) = tokio::join!(client.refresh_session(), client.refresh_session());
    assert_eq!(first, Err(ApiError::Unauthorized));
    assert_eq!(second, Err(ApiError::Unauthorized));
    assert_eq!(transport.request_count(Method::Post, "/refresh-token"), 1);
    assert!(!client.session().is_refreshing());
    assert!(client.session().tokens().is_none());
}

#[tokio::test]
async fn test_unauthorized_response_clears_credentials() {
    let transport = ScriptedTransport::new();
    transport.respond(Method::Get, "/listings", 401, json!({"message": "Unauthenticated."}));
    let session = support::session(&transport);

    let result = session.client().get_json("/listings", Vec::new()).await;
    assert_eq!(result, Err(ApiError::Unauthorized));
    assert!(session.auth().tokens().is_none());
    assert!(session.auth().authorization().is_none());
    assert_eq!(transport.request_count(Method::Get, "/listings"), 1);
}

#[tokio::test]
async fn test_session_expired_status_clears_credentials() {
    let transport = ScriptedTransport::new();
    transport.respond(Method::Get, "/listings", 440, json!({}));
    let session = support::session(&transport);

    let result = session.client().get_json("/listings", Vec::new()).await;
    assert_eq!(result, Err(ApiError::SessionExpired));
    assert!(session.auth().tokens().is_none());
}

#[tokio::test]
async fn test_anonymous_session_sends_no_authorization() {
    let transport = ScriptedTransport::new();
    transport.respond(Method::Get, "/states", 200, json!({"data": []}));
    let session = support::anonymous_session(&transport);

    session.client().get_json("/states", Vec::new()).await.unwrap();
    let request = transport.last_request(Method::Get, "/states").unwrap();
    assert!(request.header("Authorization").is_none());
    assert!(request.header("X-Correlation-Id").is_some());
}
