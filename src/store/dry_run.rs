//! Dry-run backend

use async_trait::async_trait;
use tracing::info;

use super::ObjectStore;
use crate::error::Result;
use crate::key::ObjectKey;

/// Backend that logs the copies it would issue without contacting storage.
///
/// Selected with `--dry-run` instead of branching inside the replicator.
#[derive(Debug, Clone)]
pub struct DryRunStore {
    bucket: String,
}

impl DryRunStore {
    /// Create a dry-run handle for `bucket`
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
        }
    }
}

#[async_trait]
impl ObjectStore for DryRunStore {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn copy_object(&self, source: &ObjectKey, destination: &ObjectKey) -> Result<()> {
        info!(
            "DRY RUN: would copy s3://{}/{} to {}",
            self.bucket, source, destination
        );
        Ok(())
    }
}
