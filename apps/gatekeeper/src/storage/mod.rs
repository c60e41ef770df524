//! Key material loading from an object store.
//!
//! Every call is a fresh fetch. Nothing here caches bytes between calls;
//! whatever sits at the configured location when a token is signed or
//! verified is authoritative.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

pub mod fs;
pub mod http;
pub mod memory;

pub use fs::FsKeySource;
pub use http::HttpKeySource;
pub use memory::MemoryKeySource;

/// A blob address: bucket plus object key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectLocation {
    pub bucket: String,
    pub key: String,
}

impl ObjectLocation {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }
}

impl fmt::Display for ObjectLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gs://{}/{}", self.bucket, self.key)
    }
}

/// Why a fetch failed.
#[derive(Debug, Error)]
pub enum FetchCause {
    #[error("object not found")]
    NotFound,
    #[error("object store answered HTTP {0}")]
    Status(u16),
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid object key")]
    InvalidKey,
    #[error("timed out after {0:?}")]
    TimedOut(Duration),
}

/// Key material could not be loaded. Carries the location and the underlying cause.
#[derive(Debug, Error)]
#[error("failed to fetch {location}: {cause}")]
pub struct FetchError {
    pub location: ObjectLocation,
    #[source]
    pub cause: FetchCause,
}

impl FetchError {
    pub fn new(location: &ObjectLocation, cause: impl Into<FetchCause>) -> Self {
        Self {
            location: location.clone(),
            cause: cause.into(),
        }
    }
}

/// Source of raw key bytes.
#[async_trait]
pub trait KeySource: Send + Sync {
    async fn load(&self, location: &ObjectLocation) -> Result<Vec<u8>, FetchError>;
}

/// `load` bounded by `timeout`; elapsed time surfaces as `FetchCause::TimedOut`.
pub async fn load_with_timeout(
    source: &dyn KeySource,
    location: &ObjectLocation,
    timeout: Duration,
) -> Result<Vec<u8>, FetchError> {
    match tokio::time::timeout(timeout, source.load(location)).await {
        Ok(result) => result,
        Err(_) => Err(FetchError::new(location, FetchCause::TimedOut(timeout))),
    }
}
