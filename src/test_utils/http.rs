use axum::{body::Body, http::StatusCode, response::Response};

/// Assert that `response` is a successful HTML response.
#[track_caller]
pub(crate) fn assert_html_ok(response: &Response<Body>) {
    assert_eq!(response.status(), StatusCode::OK);

    let content_type = response
        .headers()
        .get("content-type")
        .expect("content-type header missing");
    assert_eq!(content_type, "text/html; charset=utf-8");
}
