//! Index Alias - Directory-style aliases for static sites on S3
//!
//! Static site generators emit `foo/index.html`, but object stores only
//! serve exact keys. After a site is uploaded, Index Alias copies every
//! nested index document to the matching "directory" key so that
//! `foo/index.html` is also reachable at `foo/`.
//!
//! # Architecture
//!
//! The replicator walks the local publish root, derives bucket keys from
//! relative paths, and issues one server-side copy per index document
//! through an [`ObjectStore`](store::ObjectStore) handle supplied by the
//! caller. Runs are sequential and abort on the first error.
//!
//! # Features
//!
//! - Segment-based key model with a single filesystem conversion point
//! - S3 and S3-compatible backends via `rust-s3`
//! - Dry-run and in-memory backends
//! - Single-key replication driven by S3 "Object Created" notifications

pub mod config;
pub mod error;
pub mod event;
pub mod key;
pub mod replicator;
pub mod scan;
pub mod store;

pub use config::IndexAliasConfig;
pub use error::{Error, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::IndexAliasConfig;
    pub use crate::error::{Error, Result};
    pub use crate::event::S3ObjectCreatedEvent;
    pub use crate::key::ObjectKey;
    pub use crate::replicator::{replicate_aliases, ReplicationSummary, Replicator};
    pub use crate::store::{DryRunStore, MemoryStore, ObjectStore, S3Store};
}
