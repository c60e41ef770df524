//! Error handling for the gatekeeper service.

pub mod error_code;

pub use error_code::ErrorCode;
