//! Path-based authorization policy.
//!
//! Evaluated in a fixed order; the first rule that decides wins:
//!
//! 1. the login path passes
//! 2. anything outside the protected prefix passes
//! 3. no bearer token goes to the error path
//! 4. a token that fails to decode goes to the error path
//! 5. the privileged role passes
//! 6. the self-service path passes for any valid token
//! 7. everything else goes to the deny path
//!
//! Callers only ever see the effective path. Why a request was turned away
//! stays in [`Denial`] for logging.

use std::sync::Arc;

use crate::auth::claims::Claims;
use crate::auth::token::{TokenCodec, TokenError};

pub const LOGIN_PATH: &str = "/login";
pub const PROTECTED_PREFIX: &str = "/user";
pub const SELF_SERVICE_PATH: &str = "/user/repassword";
pub const ERROR_PATH: &str = "/error";
pub const DENY_PATH: &str = "/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatePolicy {
    pub login_path: String,
    pub protected_prefix: String,
    pub self_service_path: String,
    pub error_path: String,
    pub deny_path: String,
    pub privileged_role: i32,
}

impl GatePolicy {
    pub fn new(privileged_role: i32) -> Self {
        Self {
            login_path: LOGIN_PATH.to_string(),
            protected_prefix: PROTECTED_PREFIX.to_string(),
            self_service_path: SELF_SERVICE_PATH.to_string(),
            error_path: ERROR_PATH.to_string(),
            deny_path: DENY_PATH.to_string(),
            privileged_role,
        }
    }

    pub fn is_protected(&self, path: &str) -> bool {
        path != self.login_path && path.starts_with(&self.protected_prefix)
    }
}

#[derive(Debug)]
pub enum Denial {
    MissingToken,
    RejectedToken(TokenError),
    InsufficientRole { subject: String, role: i32 },
}

impl Denial {
    pub fn reason(&self) -> &'static str {
        match self {
            Denial::MissingToken => "missing_token",
            Denial::RejectedToken(e) => e.reason(),
            Denial::InsufficientRole { .. } => "insufficient_role",
        }
    }
}

/// Outcome of [`AuthGate::authorize`].
#[derive(Debug)]
pub struct Decision {
    /// Path the request should be dispatched to
    pub path: String,
    /// Present when a token was verified and the request allowed
    pub claims: Option<Claims>,
    pub denial: Option<Denial>,
}

impl Decision {
    fn pass(path: &str, claims: Option<Claims>) -> Self {
        Self {
            path: path.to_string(),
            claims,
            denial: None,
        }
    }

    fn redirect(path: &str, denial: Denial) -> Self {
        Self {
            path: path.to_string(),
            claims: None,
            denial: Some(denial),
        }
    }

    pub fn is_allowed(&self) -> bool {
        self.denial.is_none()
    }
}

pub struct AuthGate {
    policy: GatePolicy,
    tokens: Arc<TokenCodec>,
}

impl AuthGate {
    pub fn new(policy: GatePolicy, tokens: Arc<TokenCodec>) -> Self {
        Self { policy, tokens }
    }

    pub fn policy(&self) -> &GatePolicy {
        &self.policy
    }

    pub async fn authorize(&self, path: &str, bearer: Option<&str>) -> Decision {
        let policy = &self.policy;

        if !policy.is_protected(path) {
            return Decision::pass(path, None);
        }

        let token = match bearer.map(str::trim) {
            Some(token) if !token.is_empty() => token,
            _ => return Decision::redirect(&policy.error_path, Denial::MissingToken),
        };

        let claims = match self.tokens.decode(token).await {
            Ok(claims) => claims,
            Err(e) => return Decision::redirect(&policy.error_path, Denial::RejectedToken(e)),
        };

        if claims.role == policy.privileged_role || path == policy.self_service_path {
            return Decision::pass(path, Some(claims));
        }

        Decision::redirect(
            &policy.deny_path,
            Denial::InsufficientRole {
                subject: claims.subject,
                role: claims.role,
            },
        )
    }
}
