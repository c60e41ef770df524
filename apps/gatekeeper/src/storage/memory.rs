use std::collections::HashMap;

use async_trait::async_trait;

use super::{FetchCause, FetchError, KeySource, ObjectLocation};

/// Fixed in-process objects. Missing entries are `NotFound`.
#[derive(Debug, Default, Clone)]
pub struct MemoryKeySource {
    objects: HashMap<ObjectLocation, Vec<u8>>,
}

impl MemoryKeySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_object(mut self, location: ObjectLocation, bytes: impl Into<Vec<u8>>) -> Self {
        self.objects.insert(location, bytes.into());
        self
    }
}

#[async_trait]
impl KeySource for MemoryKeySource {
    async fn load(&self, location: &ObjectLocation) -> Result<Vec<u8>, FetchError> {
        self.objects
            .get(location)
            .cloned()
            .ok_or_else(|| FetchError::new(location, FetchCause::NotFound))
    }
}
