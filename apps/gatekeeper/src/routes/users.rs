use actix_web::{web, HttpResponse, Result};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr, PickFirst};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::extractors::{AuthClaims, Validate, ValidatedJson};
use crate::repos::users::UserRecord;
use crate::routes::validation::{require_email, require_password};
use crate::services::users;
use crate::state::app_state::AppState;

#[serde_as]
#[derive(Debug, Deserialize)]
pub struct SaveUserRequest {
    pub email: String,
    #[serde(alias = "password")]
    pub pass: String,
    /// Number or numeric string
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[serde(default)]
    pub role: i32,
}

impl Validate for SaveUserRequest {
    fn validate(&self) -> Result<(), AppError> {
        require_email(self.email.trim())?;
        require_password("pass", &self.pass)?;
        if self.role < 0 {
            return Err(AppError::invalid("role must not be negative"));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub email: String,
    /// Current password
    pub pass: String,
    /// Replacement password
    pub pass2: String,
}

impl Validate for ChangePasswordRequest {
    fn validate(&self) -> Result<(), AppError> {
        require_email(self.email.trim())?;
        require_password("pass", &self.pass)?;
        require_password("pass2", &self.pass2)
    }
}

#[derive(Debug, Deserialize)]
pub struct DeleteUserRequest {
    pub email: String,
}

impl Validate for DeleteUserRequest {
    fn validate(&self) -> Result<(), AppError> {
        require_email(self.email.trim())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EmailResponse {
    pub email: String,
}

/// Listing entry. Password hashes are never part of it.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserSummary {
    pub name: String,
    pub email: String,
    pub role: String,
    /// Created, RFC 3339
    pub date: String,
    /// Last updated, RFC 3339
    pub update: String,
}

impl From<UserRecord> for UserSummary {
    fn from(user: UserRecord) -> Self {
        Self {
            name: user.name,
            email: user.email,
            role: user.role.to_string(),
            date: rfc3339(user.created_at),
            update: rfc3339(user.updated_at),
        }
    }
}

fn rfc3339(at: OffsetDateTime) -> String {
    at.format(&Rfc3339).unwrap_or_else(|_| at.unix_timestamp().to_string())
}

async fn save_user(
    body: ValidatedJson<SaveUserRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let SaveUserRequest { email, pass, role } = body.into_inner();
    let record = users::save_user(&app_state, email.trim(), pass, role).await?;
    Ok(HttpResponse::Ok().json(EmailResponse {
        email: record.email,
    }))
}

async fn change_password(
    AuthClaims(caller): AuthClaims,
    body: ValidatedJson<ChangePasswordRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let ChangePasswordRequest { email, pass, pass2 } = body.into_inner();
    let email = email.trim().to_string();
    users::change_password(&app_state, &caller, &email, pass, pass2).await?;
    Ok(HttpResponse::Ok().json(EmailResponse { email }))
}

async fn list_users(
    offset: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let offset = offset.parse::<u64>().map_err(|_| {
        AppError::bad_request(
            ErrorCode::InvalidPathParam,
            "offset must be a non-negative integer",
        )
    })?;

    let listing: Vec<UserSummary> = users::list_users(&app_state, offset)
        .await?
        .into_iter()
        .map(UserSummary::from)
        .collect();
    Ok(HttpResponse::Ok().json(listing))
}

async fn delete_user(
    body: ValidatedJson<DeleteUserRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let email = body.into_inner().email.trim().to_string();
    users::delete_user(&app_state, &email).await?;
    Ok(HttpResponse::Ok().json(EmailResponse { email }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/user", web::post().to(save_user))
        .route("/user/repassword", web::post().to(change_password))
        .route("/user/delete", web::post().to(delete_user))
        .route("/users/{offset}", web::get().to(list_users));
}
