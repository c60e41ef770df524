pub mod auth_claims;
pub mod form;
pub mod validated_json;

pub use auth_claims::AuthClaims;
pub use form::form_config;
pub use validated_json::{Validate, ValidatedJson};
