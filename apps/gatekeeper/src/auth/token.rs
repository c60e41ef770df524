//! RS256 token signing and verification.
//!
//! The algorithm is fixed. A token's header is inspected before any
//! signature work, and anything other than `RS256` is refused, so `none`
//! and HMAC downgrades never reach the verifier.

use std::sync::Arc;
use std::time::Duration;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::Deserialize;
use thiserror::Error;
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::auth::claims::Claims;
use crate::state::security_config::SecurityConfig;
use crate::storage::{load_with_timeout, FetchError, KeySource, ObjectLocation};

const ALGORITHM: Algorithm = Algorithm::RS256;
const ALGORITHM_NAME: &str = "RS256";

#[derive(Debug, Error)]
pub enum TokenError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("key material is not a usable RSA PEM: {0}")]
    KeyParse(#[source] jsonwebtoken::errors::Error),
    #[error("malformed token: {0}")]
    Malformed(String),
    #[error("token declares unsupported algorithm '{0}'")]
    UnsupportedAlgorithm(String),
    #[error("token signature does not verify")]
    Signature,
    #[error("token has expired")]
    Expired,
    #[error("claims expiry is not in the future")]
    ExpiryNotInFuture,
    #[error("failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

impl TokenError {
    /// Short stable label for logs.
    pub fn reason(&self) -> &'static str {
        match self {
            TokenError::Fetch(_) => "key_fetch_failed",
            TokenError::KeyParse(_) => "key_parse_failed",
            TokenError::Malformed(_) => "malformed_token",
            TokenError::UnsupportedAlgorithm(_) => "unsupported_algorithm",
            TokenError::Signature => "invalid_signature",
            TokenError::Expired => "token_expired",
            TokenError::ExpiryNotInFuture => "expiry_not_in_future",
            TokenError::Signing(_) => "signing_failed",
        }
    }
}

#[derive(Deserialize)]
struct RawHeader {
    alg: String,
}

/// Sign `claims` with a PEM RSA private key (PKCS#1 or PKCS#8).
///
/// Expiry is not checked here; see [`TokenCodec::create`].
pub fn encode_token(claims: &Claims, private_pem: &[u8]) -> Result<String, TokenError> {
    let key = EncodingKey::from_rsa_pem(private_pem).map_err(TokenError::KeyParse)?;
    jsonwebtoken::encode(&Header::new(ALGORITHM), claims, &key).map_err(TokenError::Signing)
}

/// Verify `token` against a PEM RSA public key and return its claims.
pub fn decode_token(token: &str, public_pem: &[u8]) -> Result<Claims, TokenError> {
    let key = DecodingKey::from_rsa_pem(public_pem).map_err(TokenError::KeyParse)?;

    precheck(token)?;

    let mut validation = Validation::new(ALGORITHM);
    validation.leeway = 0;
    validation.validate_aud = false;
    validation.set_required_spec_claims(&["exp"]);

    let claims = jsonwebtoken::decode::<Claims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(classify_decode_error)?;

    // the library tolerates exp == now; we do not
    if claims.is_expired_at(OffsetDateTime::now_utc().unix_timestamp()) {
        return Err(TokenError::Expired);
    }
    Ok(claims)
}

fn classify_decode_error(e: jsonwebtoken::errors::Error) -> TokenError {
    if matches!(e.kind(), ErrorKind::InvalidRsaKey(_) | ErrorKind::InvalidKeyFormat) {
        return TokenError::KeyParse(e);
    }
    match e.kind() {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        ErrorKind::InvalidAlgorithm => TokenError::UnsupportedAlgorithm(ALGORITHM_NAME.into()),
        ErrorKind::Json(_)
        | ErrorKind::Utf8(_)
        | ErrorKind::Base64(_)
        | ErrorKind::MissingRequiredClaim(_)
        | ErrorKind::InvalidToken => TokenError::Malformed(e.to_string()),
        // structure and header already passed precheck; what is left is the crypto
        _ => TokenError::Signature,
    }
}

/// Structure and header checks done before the signature is looked at.
fn precheck(token: &str) -> Result<(), TokenError> {
    let segments: Vec<&str> = token.split('.').collect();
    let [header, payload, signature] = segments.as_slice() else {
        return Err(TokenError::Malformed(format!(
            "expected 3 segments, found {}",
            segments.len()
        )));
    };
    if header.is_empty() || payload.is_empty() || signature.is_empty() {
        return Err(TokenError::Malformed("empty segment".into()));
    }

    let header_bytes = URL_SAFE_NO_PAD
        .decode(header)
        .map_err(|_| TokenError::Malformed("header is not base64url".into()))?;
    URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|_| TokenError::Malformed("claims are not base64url".into()))?;
    URL_SAFE_NO_PAD
        .decode(signature)
        .map_err(|_| TokenError::Signature)?;

    let raw: RawHeader = serde_json::from_slice(&header_bytes)
        .map_err(|_| TokenError::Malformed("header is not a JSON object with alg".into()))?;
    if raw.alg != ALGORITHM_NAME {
        return Err(TokenError::UnsupportedAlgorithm(raw.alg));
    }
    Ok(())
}

/// Signs and verifies with keys fetched fresh from a [`KeySource`] on every call.
pub struct TokenCodec {
    source: Arc<dyn KeySource>,
    signing_key: ObjectLocation,
    verifying_key: ObjectLocation,
    fetch_timeout: Duration,
}

impl TokenCodec {
    pub fn new(source: Arc<dyn KeySource>, security: &SecurityConfig) -> Self {
        Self {
            source,
            signing_key: security.signing_location(),
            verifying_key: security.verifying_location(),
            fetch_timeout: security.key_fetch_timeout,
        }
    }

    pub async fn create(&self, claims: &Claims) -> Result<String, TokenError> {
        if claims.is_expired() {
            return Err(TokenError::ExpiryNotInFuture);
        }
        let pem = self.fetch(&self.signing_key).await?;
        encode_token(claims, &pem)
    }

    pub async fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        let pem = self.fetch(&self.verifying_key).await?;
        decode_token(token, &pem)
    }

    /// Fetch both keys, check they parse and that they belong together.
    pub async fn probe(&self) -> Result<(), TokenError> {
        let private_pem = self.fetch(&self.signing_key).await?;
        let public_pem = self.fetch(&self.verifying_key).await?;

        let claims = Claims::issue("probe", 0, "probe", Duration::from_secs(60));
        let token = encode_token(&claims, &private_pem)?;
        decode_token(&token, &public_pem)?;

        info!(
            signing_key = %self.signing_key,
            verifying_key = %self.verifying_key,
            "Key material verified"
        );
        Ok(())
    }

    async fn fetch(&self, location: &ObjectLocation) -> Result<Vec<u8>, FetchError> {
        debug!(%location, "Loading key material");
        load_with_timeout(self.source.as_ref(), location, self.fetch_timeout).await
    }
}
