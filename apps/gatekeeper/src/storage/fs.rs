use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use super::{FetchCause, FetchError, KeySource, ObjectLocation};

/// Buckets as directories under `root`: `<root>/<bucket>/<object>`.
#[derive(Debug, Clone)]
pub struct FsKeySource {
    root: PathBuf,
}

impl FsKeySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, location: &ObjectLocation) -> Option<PathBuf> {
        let bucket = Path::new(&location.bucket);
        let key = Path::new(&location.key);
        let plain = |p: &Path| {
            !p.as_os_str().is_empty() && p.components().all(|c| matches!(c, Component::Normal(_)))
        };
        if !plain(bucket) || !plain(key) {
            return None;
        }
        Some(self.root.join(bucket).join(key))
    }
}

#[async_trait]
impl KeySource for FsKeySource {
    async fn load(&self, location: &ObjectLocation) -> Result<Vec<u8>, FetchError> {
        let path = self
            .resolve(location)
            .ok_or_else(|| FetchError::new(location, FetchCause::InvalidKey))?;
        debug!(path = %path.display(), "Reading key object from disk");

        tokio::fs::read(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => FetchError::new(location, FetchCause::NotFound),
            _ => FetchError::new(location, e),
        })
    }
}
