#![allow(dead_code)]

// tests/common/mod.rs
use actix_web::body::BoxBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;

// Logging is auto-installed for every test binary
#[ctor::ctor]
fn init_logging() {
    gatekeeper_test_support::logging::init();
}

/// Problem-details shape plus the expected status and code.
pub async fn assert_problem(resp: ServiceResponse<BoxBody>, status: u16, code: &str) {
    let status = StatusCode::from_u16(status).expect("valid status code");
    gatekeeper_test_support::problem_details::assert_problem_details_from_service_response(
        resp, code, status, None,
    )
    .await;
}

/// The uniform 403 "off limits" page.
pub async fn assert_off_limits(resp: ServiceResponse<BoxBody>) {
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let content_type = resp
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/html"), "got {content_type}");
    let body = actix_web::test::read_body(resp).await;
    let body = String::from_utf8_lossy(&body);
    assert!(body.contains("This is off limits."), "body was {body}");
}
