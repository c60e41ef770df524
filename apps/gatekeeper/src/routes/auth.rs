use actix_web::{web, HttpResponse, Result};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::routes::validation::{require_email, require_password};
use crate::services::users;
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub email: String,
    /// Rendered as a string for existing clients
    pub role: String,
}

async fn login(
    form: web::Form<LoginForm>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let LoginForm { email, password } = form.into_inner();
    let email = email.trim();
    require_email(email)?;
    require_password("password", &password)?;

    let issued = users::login(&app_state, email, password).await?;

    Ok(HttpResponse::Ok().json(LoginResponse {
        token: issued.token,
        email: issued.email,
        role: issued.role.to_string(),
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/login", web::post().to(login));
}
