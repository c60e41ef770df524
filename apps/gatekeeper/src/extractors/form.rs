use actix_web::error::UrlencodedError;
use actix_web::{web, HttpRequest};
use tracing::debug;

use crate::error::AppError;
use crate::errors::ErrorCode;

/// `web::Form` config whose failures render as problem details.
pub fn form_config() -> web::FormConfig {
    web::FormConfig::default()
        .limit(16 * 1024)
        .error_handler(form_error_handler)
}

fn form_error_handler(err: UrlencodedError, _req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, "Form parsing failed");
    let detail = match err {
        UrlencodedError::ContentType => "Expected an application/x-www-form-urlencoded body",
        UrlencodedError::Overflow { .. } | UrlencodedError::UnknownLength => {
            "Request body too large"
        }
        _ => "Invalid form body: missing or malformed fields",
    };
    AppError::bad_request(ErrorCode::BadRequest, detail).into()
}
