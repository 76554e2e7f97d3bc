use crate::support;
use listing_engine::api::{Method, Part, RequestBody, ScriptedTransport};
use listing_engine::form::{Field, FormMode, FormSession, MediaFile, MediaKind};
use listing_engine::submission::{SubmissionError, SubmissionKind};
use serde_json::json;

fn filled_form(session: &listing_engine::Session) -> FormSession {
    let mut form = session.form("lands-plots", None);
    refill(&mut form);
    form
}

fn refill(form: &mut FormSession) {
    let engine = form.engine_mut();
    engine.set_field(Field::Title, "Corner plot near highway");
    engine.set_field(Field::Description, "East facing plot with clear title deeds");
    engine.set_field(Field::Price, "1500000");
    engine.set_field(Field::State, "1");
    engine.set_field(Field::District, "10");
    engine.set_field(Field::City, "100");
    engine.set_field(Field::Length, "40");
    engine.set_field(Field::Breadth, "30");
}

fn multipart_parts(transport: &ScriptedTransport, path: &str) -> Vec<Part> {
    match transport.last_request(Method::Post, path).map(|r| r.body) {
        Some(RequestBody::Multipart(payload)) => payload.into_parts(),
        other => panic!("expected a multipart request to {}, got {:?}", path, other),
    }
}

fn text<'a>(parts: &'a [Part], name: &str) -> Option<&'a str> {
    parts.iter().find_map(|part| match part {
        Part::Text { name: n, value } if n == name => Some(value.as_str()),
        _ => None,
    })
}

#[tokio::test]
async fn test_create_posts_to_upload_form_without_action_id() {
    let transport = ScriptedTransport::new();
    transport.respond(Method::Post, "/upload-form", 201, json!({"data": {"id": 88}, "message": "Created"}));
    let session = support::session(&transport);
    let mut form = filled_form(&session);
    form.engine_mut()
        .media_mut()
        .add(MediaFile::new("front.jpg", "image/jpeg", vec![1, 2, 3]));

    let outcome = form.submit().await.unwrap();
    assert_eq!(outcome.kind, SubmissionKind::Created);
    assert_eq!(outcome.listing_id.as_deref(), Some("88"));
    assert_eq!(transport.request_count(Method::Post, "/upload/update"), 0);

    let parts = multipart_parts(&transport, "/upload-form");
    assert_eq!(text(&parts, "action_id"), None);
    assert_eq!(text(&parts, "plot_area"), Some("1200"));
    assert_eq!(text(&parts, "state_id"), Some("1"));
    assert!(text(&parts, "subcategory_id").is_some());
    assert!(parts.iter().any(|p| matches!(p, Part::File { name, .. } if name == "images[0]")));

    let request = transport.last_request(Method::Post, "/upload-form").unwrap();
    assert_eq!(request.header("Authorization"), Some("Bearer test-access-token"));

    // Accepted forms start over
    assert_eq!(form.engine().value(Field::Title), "");
}

#[tokio::test]
async fn test_edit_posts_to_update_with_action_id() {
    let transport = ScriptedTransport::new();
    transport.respond(Method::Post, "/upload/update", 200, json!({"message": "Updated"}));
    let session = support::session(&transport);
    let mut form = filled_form(&session);
    form.set_mode(FormMode::Edit {
        record_id: "501".to_string(),
    });
    let media = form.engine_mut().media_mut();
    media.add_existing(MediaKind::Image, "9", None);
    media.add_existing(MediaKind::Image, "12", None);
    media.remove_existing("9");

    let outcome = form.submit().await.unwrap();
    assert_eq!(outcome.kind, SubmissionKind::Updated);
    assert_eq!(outcome.listing_id.as_deref(), Some("501"));
    assert_eq!(transport.request_count(Method::Post, "/upload-form"), 0);

    let parts = multipart_parts(&transport, "/upload/update");
    assert_eq!(text(&parts, "action_id"), Some("501"));
    assert_eq!(text(&parts, "existing_images[0]"), Some("12"));
    assert_eq!(text(&parts, "media_to_delete"), Some("9"));
}

#[tokio::test]
async fn test_form_returns_to_create_after_update() {
    let transport = ScriptedTransport::new();
    transport
        .respond(Method::Post, "/upload/update", 200, json!({"message": "Updated"}))
        .respond(Method::Post, "/upload-form", 201, json!({"data": {"id": 90}}));
    let session = support::session(&transport);
    let mut form = filled_form(&session);
    form.set_mode(FormMode::Edit {
        record_id: "501".to_string(),
    });

    form.submit().await.unwrap();
    assert_eq!(form.mode(), &FormMode::Create);

    refill(&mut form);
    let outcome = form.submit().await.unwrap();
    assert_eq!(outcome.kind, SubmissionKind::Created);
    assert_eq!(transport.request_count(Method::Post, "/upload/update"), 1);
    let parts = multipart_parts(&transport, "/upload-form");
    assert_eq!(text(&parts, "action_id"), None);
}

#[tokio::test]
async fn test_invalid_form_is_not_sent() {
    let transport = ScriptedTransport::new();
    let session = support::session(&transport);
    let mut form = session.form("lands-plots", None);

    let error = form.submit().await.unwrap_err();
    assert!(matches!(error, SubmissionError::Invalid(ref errors) if errors.len() == 9));
    assert!(transport.requests().is_empty());
    assert!(form.engine().snapshot().api_error.is_none());
}

#[tokio::test]
async fn test_server_field_errors_land_in_the_snapshot() {
    let transport = ScriptedTransport::new();
    transport.respond(
        Method::Post,
        "/upload-form",
        422,
        json!({
            "message": "The given data was invalid.",
            "errors": {
                "subcategory_id": ["required"],
                "plot_area": ["The plot area must be at least 10.", "ignored"],
                "district_id": ["Unknown district"]
            }
        }),
    );
    let session = support::session(&transport);
    let mut form = filled_form(&session);

    let error = form.submit().await.unwrap_err();
    let SubmissionError::ServerValidation { errors, .. } = &error else {
        panic!("expected server validation error, got {:?}", error);
    };
    assert_eq!(errors.len(), 3);

    let snapshot = form.engine().snapshot();
    assert_eq!(snapshot.errors.get("category").map(String::as_str), Some("required"));
    assert_eq!(
        snapshot.errors.get("plotArea").map(String::as_str),
        Some("The plot area must be at least 10.")
    );
    assert_eq!(snapshot.errors.get("district").map(String::as_str), Some("Unknown district"));
    assert_eq!(snapshot.focused_field, Some(Field::District));
    assert_eq!(snapshot.api_error.as_deref(), Some("The given data was invalid."));
    // Values survive a rejected submission
    assert_eq!(form.engine().value(Field::Title), "Corner plot near highway");
}

#[tokio::test]
async fn test_server_failure_sets_banner() {
    let transport = ScriptedTransport::new();
    transport.respond(Method::Post, "/upload-form", 503, json!({"message": "maintenance"}));
    let session = support::session(&transport);
    let mut form = filled_form(&session);

    let error = form.submit().await.unwrap_err();
    assert_eq!(error, SubmissionError::Server { status: 503 });
    let banner = form.engine().snapshot().api_error.clone().unwrap();
    assert!(banner.contains("503"));
    assert!(form.engine().snapshot().errors.is_empty());
}

#[tokio::test]
async fn test_expired_session_on_submit() {
    let transport = ScriptedTransport::new();
    transport.respond(Method::Post, "/upload-form", 401, json!({}));
    let session = support::session(&transport);
    let mut form = filled_form(&session);

    assert_eq!(form.submit().await.unwrap_err(), SubmissionError::AuthExpired);
    assert!(session.auth().tokens().is_none());
}
