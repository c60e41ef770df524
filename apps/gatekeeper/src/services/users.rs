//! User lifecycle: login, create, change password, list, delete.

use tracing::{debug, info};

use crate::auth::claims::Claims;
use crate::auth::password::CredentialError;
use crate::error::AppError;
use crate::logging::pii::Redacted;
use crate::logging::security;
use crate::repos::users::{NewUser, StoreError, UserRecord};
use crate::state::app_state::AppState;

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub email: String,
    pub role: i32,
}

/// Verify credentials and issue a token. Unknown email and wrong password
/// produce the same error.
pub async fn login(state: &AppState, email: &str, password: String) -> Result<IssuedToken, AppError> {
    let Some(user) = state.users.find(email).await? else {
        return Err(reject_unknown(state, email, password).await);
    };

    check_password(state, &user, password).await?;

    let claims = Claims::issue(
        &user.email,
        user.role,
        &state.security.issuer,
        state.security.token_ttl,
    );
    let token = state.tokens.create(&claims).await?;

    info!(email = %Redacted(&user.email), role = user.role, "Token issued");
    Ok(IssuedToken {
        token,
        email: user.email,
        role: user.role,
    })
}

/// Create or overwrite an account.
pub async fn save_user(
    state: &AppState,
    email: &str,
    password: String,
    role: i32,
) -> Result<UserRecord, AppError> {
    let hash = state.credentials.hash(password).await?;
    let record = state.users.upsert(NewUser::new(email, hash, role)).await?;
    info!(email = %Redacted(&record.email), role, "User saved");
    Ok(record)
}

/// Replace `email`'s password after checking the current one.
///
/// The caller must either hold the privileged role or be changing their own password.
pub async fn change_password(
    state: &AppState,
    caller: &Claims,
    email: &str,
    current: String,
    replacement: String,
) -> Result<(), AppError> {
    if caller.role != state.security.privileged_role && caller.subject != email {
        security::access_denied("/user/repassword", "not_account_owner", Some(&caller.subject));
        return Err(AppError::forbidden());
    }

    let Some(user) = state.users.find(email).await? else {
        return Err(reject_unknown(state, email, current).await);
    };

    check_password(state, &user, current).await?;

    let hash = state.credentials.hash(replacement).await?;
    state
        .users
        .upsert(NewUser {
            email: user.email,
            name: user.name,
            password_hash: hash,
            role: user.role,
        })
        .await?;

    info!(email = %Redacted(email), "Password changed");
    Ok(())
}

pub async fn list_users(state: &AppState, offset: u64) -> Result<Vec<UserRecord>, AppError> {
    let users = state.users.list(offset).await?;
    debug!(offset, count = users.len(), "Listed users");
    Ok(users)
}

pub async fn delete_user(state: &AppState, email: &str) -> Result<(), AppError> {
    if !state.users.delete(email).await? {
        return Err(StoreError::NotFound.into());
    }
    info!(email = %Redacted(email), "User deleted");
    Ok(())
}

async fn check_password(state: &AppState, user: &UserRecord, plaintext: String) -> Result<(), AppError> {
    match state
        .credentials
        .verify(user.password_hash.clone(), plaintext)
        .await
    {
        Ok(()) => Ok(()),
        Err(e @ (CredentialError::Mismatch | CredentialError::MalformedHash(_))) => {
            security::login_failed("bad_password", &user.email);
            Err(e.into())
        }
        Err(e) => Err(e.into()),
    }
}

/// Unknown accounts still pay for a bcrypt verify so response time does not
/// reveal which emails exist.
async fn reject_unknown(state: &AppState, email: &str, plaintext: String) -> AppError {
    security::login_failed("unknown_user", email);
    match state.credentials.verify_decoy(plaintext).await {
        Err(CredentialError::Mismatch) | Ok(()) => AppError::invalid_credentials(),
        Err(e) => e.into(),
    }
}
