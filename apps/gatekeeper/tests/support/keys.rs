//! Key fixtures and token minting for tests.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use gatekeeper::auth::token::encode_token;
use gatekeeper::storage::FsKeySource;
use gatekeeper::{Claims, SecurityConfig};

pub const BUCKET: &str = "test-bucket";
pub const PRIVILEGED: i32 = 5;

/// `tests/fixtures/keys`, laid out as `<bucket>/<object>`.
pub fn fixture_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("keys")
}

pub fn fixture_key_source() -> Arc<FsKeySource> {
    Arc::new(FsKeySource::new(fixture_root()))
}

/// Fixture bucket with the cheapest bcrypt cost.
pub fn test_security() -> SecurityConfig {
    SecurityConfig::new(BUCKET)
        .with_bcrypt_cost(4)
        .with_issuer("gatekeeper-test")
}

fn private_pem() -> Vec<u8> {
    std::fs::read(fixture_root().join(BUCKET).join("signature/id_rsa"))
        .expect("fixture private key should be readable")
}

/// Signed token for `email` with `role`, valid for ten minutes.
pub fn mint_token(email: &str, role: i32) -> String {
    let claims = Claims::issue(email, role, "gatekeeper-test", Duration::from_secs(600));
    encode_token(&claims, &private_pem()).expect("fixture key should sign")
}

/// Signed token that expired a minute ago.
pub fn mint_expired_token(email: &str, role: i32) -> String {
    let mut claims = Claims::issue(email, role, "gatekeeper-test", Duration::from_secs(0));
    claims.expires_at -= 60;
    encode_token(&claims, &private_pem()).expect("fixture key should sign")
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}
