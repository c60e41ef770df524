use std::time::Duration;

use crate::storage::ObjectLocation;

/// Object path of the PEM private key inside the key bucket.
pub const DEFAULT_SIGNING_KEY_OBJECT: &str = "signature/id_rsa";
/// Object path of the PEM (PKCS#8) public key inside the key bucket.
pub const DEFAULT_VERIFYING_KEY_OBJECT: &str = "signature/id_rsa.pub.pkcs8";
pub const DEFAULT_ISSUER: &str = "gatekeeper";
pub const DEFAULT_PRIVILEGED_ROLE: i32 = 5;

/// Token, key and credential settings, fixed at startup.
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// Bucket holding both key objects
    pub bucket: String,
    pub signing_key_object: String,
    pub verifying_key_object: String,
    /// `iss` claim written into every issued token
    pub issuer: String,
    pub token_ttl: Duration,
    /// The one role allowed to manage users
    pub privileged_role: i32,
    pub bcrypt_cost: u32,
    pub key_fetch_timeout: Duration,
    pub hash_timeout: Duration,
}

impl SecurityConfig {
    /// Defaults for everything except the bucket.
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            signing_key_object: DEFAULT_SIGNING_KEY_OBJECT.to_string(),
            verifying_key_object: DEFAULT_VERIFYING_KEY_OBJECT.to_string(),
            issuer: DEFAULT_ISSUER.to_string(),
            token_ttl: Duration::from_secs(24 * 60 * 60),
            privileged_role: DEFAULT_PRIVILEGED_ROLE,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            key_fetch_timeout: Duration::from_secs(5),
            hash_timeout: Duration::from_secs(10),
        }
    }

    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }

    pub fn with_key_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.key_fetch_timeout = timeout;
        self
    }

    pub fn with_hash_timeout(mut self, timeout: Duration) -> Self {
        self.hash_timeout = timeout;
        self
    }

    pub fn signing_location(&self) -> ObjectLocation {
        ObjectLocation::new(&self.bucket, &self.signing_key_object)
    }

    pub fn verifying_location(&self) -> ObjectLocation {
        ObjectLocation::new(&self.bucket, &self.verifying_key_object)
    }
}
