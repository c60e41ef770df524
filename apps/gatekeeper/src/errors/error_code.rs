//! Error codes for the gatekeeper API.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//! Every code maps 1:1 to the SCREAMING_SNAKE_CASE string that appears in
//! HTTP responses.

use core::fmt;

/// Centralized error codes for the gatekeeper API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authentication & Authorization
    /// Authentication required
    Unauthorized,
    /// Email/password pair did not verify
    InvalidCredentials,
    /// Authenticated caller may not act on this resource
    Forbidden,

    // Request Validation
    /// Field-level validation failed
    ValidationError,
    /// Body or form could not be parsed
    BadRequest,
    /// Path parameter could not be parsed
    InvalidPathParam,

    // Resource Not Found
    /// User not found
    UserNotFound,

    // System Errors
    /// Signing or verification keys could not be fetched in time
    KeyMaterialUnavailable,
    /// Token could not be signed
    TokenSigningFailed,
    /// Password hashing backend failed
    CredentialBackend,
    /// User store failure
    StoreError,
    /// Configuration error
    ConfigError,
    /// Internal server error
    Internal,
}

impl ErrorCode {
    /// Returns the canonical string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Forbidden => "FORBIDDEN",

            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST",
            Self::InvalidPathParam => "INVALID_PATH_PARAM",

            Self::UserNotFound => "USER_NOT_FOUND",

            Self::KeyMaterialUnavailable => "KEY_MATERIAL_UNAVAILABLE",
            Self::TokenSigningFailed => "TOKEN_SIGNING_FAILED",
            Self::CredentialBackend => "CREDENTIAL_BACKEND",
            Self::StoreError => "STORE_ERROR",
            Self::ConfigError => "CONFIG_ERROR",
            Self::Internal => "INTERNAL",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
