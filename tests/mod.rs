/// Integration tests for listing-engine
///
/// Tests are organized into logical groupings:
/// - api: client, token refresh and live backend checks
/// - form: validation and submission through a form session
mod api;
mod form;
mod support;
