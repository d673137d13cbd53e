//! In-memory backend

use std::collections::{BTreeMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use super::ObjectStore;
use crate::error::{Error, Result};
use crate::key::ObjectKey;

/// Bucket held entirely in memory.
///
/// Records every copy call in the order it was received, including calls
/// that failed.
#[derive(Debug, Default)]
pub struct MemoryStore {
    bucket: String,
    inner: Mutex<MemoryInner>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    objects: BTreeMap<String, Vec<u8>>,
    denied: HashSet<String>,
    calls: Vec<(String, String)>,
}

impl MemoryStore {
    /// Create an empty bucket
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            inner: Mutex::new(MemoryInner::default()),
        }
    }

    /// Store an object
    pub fn put(&self, key: &str, body: impl Into<Vec<u8>>) {
        self.lock().objects.insert(key.to_string(), body.into());
    }

    /// Fetch an object
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.lock().objects.get(key).cloned()
    }

    /// All keys currently stored, in order
    pub fn keys(&self) -> Vec<String> {
        self.lock().objects.keys().cloned().collect()
    }

    /// Make any copy touching `key` fail with access denied
    pub fn deny(&self, key: &str) {
        self.lock().denied.insert(key.to_string());
    }

    /// Copy calls received so far as `(source, destination)` pairs
    pub fn calls(&self) -> Vec<(String, String)> {
        self.lock().calls.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryInner> {
        // A panic while holding the lock cannot leave the maps half-updated
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn copy_object(&self, source: &ObjectKey, destination: &ObjectKey) -> Result<()> {
        let source = source.to_string();
        let destination = destination.to_string();

        let mut inner = self.lock();
        inner.calls.push((source.clone(), destination.clone()));

        for key in [&source, &destination] {
            if inner.denied.contains(key) {
                return Err(Error::AccessDenied {
                    bucket: self.bucket.clone(),
                    key: key.clone(),
                });
            }
        }

        let body = inner
            .objects
            .get(&source)
            .cloned()
            .ok_or_else(|| Error::SourceNotFound {
                bucket: self.bucket.clone(),
                key: source.clone(),
            })?;
        inner.objects.insert(destination, body);
        Ok(())
    }
}
