//! Object Store Module
//!
//! The backend seam the replicator copies through. The handle is passed in
//! explicitly so tests and dry runs can substitute their own backend.

mod dry_run;
mod memory;
mod s3_backend;

pub use dry_run::DryRunStore;
pub use memory::MemoryStore;
pub use s3_backend::S3Store;

use crate::key::ObjectKey;

/// A remote container of objects addressed by key
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// Name of the bucket this handle operates on
    fn bucket(&self) -> &str;

    /// Server-side copy of `source` to `destination` within the same bucket.
    ///
    /// An existing object at `destination` is overwritten. Success means
    /// only that the backend acknowledged the call.
    async fn copy_object(&self, source: &ObjectKey, destination: &ObjectKey) -> crate::Result<()>;
}
