use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};

use crate::auth::gate::{DENY_PATH, ERROR_PATH};

const ERROR_PAGE: &str = include_str!("../../static/error.html");

/// Every denial renders the same page with 403, whatever the cause.
async fn off_limits() -> HttpResponse {
    HttpResponse::build(StatusCode::FORBIDDEN)
        .content_type("text/html; charset=utf-8")
        .insert_header(("cache-control", "no-store"))
        .body(ERROR_PAGE)
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(ERROR_PATH, web::route().to(off_limits))
        .route(DENY_PATH, web::route().to(off_limits));
}
