pub mod claims;
pub mod gate;
pub mod password;
pub mod token;

pub use claims::Claims;
pub use gate::{AuthGate, Decision, Denial, GatePolicy};
pub use password::{CredentialError, CredentialVerifier};
pub use token::{TokenCodec, TokenError};
