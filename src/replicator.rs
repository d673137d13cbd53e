//! Index Replicator
//!
//! Publishes a directory-style alias for every index document of an
//! already-uploaded site: `blog/2024/index.html` is copied to `blog/2024/`.
//!
//! Candidates are processed one at a time. The first error from the
//! filesystem or the backend aborts the run; nothing is retried.

use std::path::Path;

use tracing::{debug, info};

use crate::error::Result;
use crate::key::{ObjectKey, DEFAULT_INDEX_DOCUMENT};
use crate::scan::find_index_documents;
use crate::store::ObjectStore;

/// Outcome of a completed run, for diagnostics only
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplicationSummary {
    /// Index documents found under the publish root
    pub scanned: usize,
    /// `(source, alias)` pairs copied, in order
    pub copied: Vec<(ObjectKey, ObjectKey)>,
    /// Candidates without an alias (the site root)
    pub skipped: usize,
}

/// Copies index documents to their directory-style aliases
#[derive(Debug, Clone)]
pub struct Replicator {
    index_document: String,
}

impl Default for Replicator {
    fn default() -> Self {
        Self::new(DEFAULT_INDEX_DOCUMENT)
    }
}

impl Replicator {
    /// Create a replicator for the given index document name
    pub fn new(index_document: impl Into<String>) -> Self {
        Self {
            index_document: index_document.into(),
        }
    }

    /// Index document name this replicator looks for
    pub fn index_document(&self) -> &str {
        &self.index_document
    }

    /// Alias every index document found under `root` in `store`
    pub async fn replicate_aliases(
        &self,
        root: &Path,
        store: &dyn ObjectStore,
    ) -> Result<ReplicationSummary> {
        let candidates = find_index_documents(root, &self.index_document)?;
        info!(
            "Found {} index document(s) under {}",
            candidates.len(),
            root.display()
        );

        let mut summary = ReplicationSummary {
            scanned: candidates.len(),
            ..Default::default()
        };

        for candidate in candidates {
            match self.replicate_key(store, &candidate.key).await? {
                Some(alias) => summary.copied.push((candidate.key, alias)),
                None => summary.skipped += 1,
            }
        }

        info!(
            "Replicated {} alias(es) in bucket {}, skipped {}",
            summary.copied.len(),
            store.bucket(),
            summary.skipped
        );
        Ok(summary)
    }

    /// Alias a single uploaded key.
    ///
    /// Returns the alias that was written, or `None` when the key is not an
    /// index document or has no shorter alias.
    pub async fn replicate_key(
        &self,
        store: &dyn ObjectStore,
        key: &ObjectKey,
    ) -> Result<Option<ObjectKey>> {
        let alias = match key.alias(&self.index_document) {
            Some(alias) => alias,
            None => {
                debug!("No alias for {}, skipping", key);
                return Ok(None);
            }
        };

        info!("{} -> {}", key, alias);
        store.copy_object(key, &alias).await?;
        Ok(Some(alias))
    }
}

/// Alias every `index.html` under `root` in `store`
pub async fn replicate_aliases(root: &Path, store: &dyn ObjectStore) -> Result<ReplicationSummary> {
    Replicator::default().replicate_aliases(root, store).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::store::{DryRunStore, MemoryStore};
    use std::fs;
    use tempfile::{tempdir, TempDir};

    const PAGES: [&str; 3] = ["index.html", "about/index.html", "blog/2024/index.html"];

    /// Local publish root plus a bucket holding the uploaded pages
    fn site() -> (TempDir, MemoryStore) {
        let dir = tempdir().unwrap();
        let store = MemoryStore::new("site.example.com");
        for page in PAGES {
            let path = dir.path().join("public").join(page);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, page).unwrap();
            store.put(page, page);
        }
        (dir, store)
    }

    fn pair(source: &str, alias: &str) -> (String, String) {
        (source.to_string(), alias.to_string())
    }

    #[tokio::test]
    async fn test_replicates_nested_index_documents() {
        let (dir, store) = site();

        let summary = replicate_aliases(&dir.path().join("public"), &store).await.unwrap();

        assert_eq!(
            store.calls(),
            [
                pair("about/index.html", "about/"),
                pair("blog/2024/index.html", "blog/2024/"),
            ]
        );
        assert_eq!(summary.scanned, 3);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.copied.len(), 2);
        assert_eq!(store.get("about/").as_deref(), Some(&b"about/index.html"[..]));
        assert_eq!(store.get("blog/2024/").as_deref(), Some(&b"blog/2024/index.html"[..]));
    }

    #[tokio::test]
    async fn test_root_index_is_never_copied() {
        let (dir, store) = site();

        replicate_aliases(&dir.path().join("public"), &store).await.unwrap();

        assert!(store.calls().iter().all(|(source, _)| source != "index.html"));
        assert!(!store.keys().iter().any(|k| k.is_empty()));
    }

    #[tokio::test]
    async fn test_aborts_on_first_missing_source() {
        let dir = tempdir().unwrap();
        let store = MemoryStore::new("site.example.com");
        for page in PAGES {
            let path = dir.path().join("public").join(page);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, page).unwrap();
        }
        store.put("index.html", "root");
        store.put("blog/2024/index.html", "blog");

        let err = replicate_aliases(&dir.path().join("public"), &store).await.unwrap_err();

        assert!(matches!(err, Error::SourceNotFound { ref key, .. } if key == "about/index.html"));
        assert_eq!(store.calls(), [pair("about/index.html", "about/")]);
        assert!(store.get("blog/2024/").is_none());
    }

    #[tokio::test]
    async fn test_aborts_on_access_denied() {
        let (dir, store) = site();
        store.deny("about/");

        let err = replicate_aliases(&dir.path().join("public"), &store).await.unwrap_err();

        assert!(matches!(err, Error::AccessDenied { .. }));
        assert_eq!(store.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_second_run_is_idempotent() {
        let (dir, store) = site();
        let root = dir.path().join("public");

        replicate_aliases(&root, &store).await.unwrap();
        let first_calls = store.calls();
        let first_state: Vec<_> = store.keys().into_iter().map(|k| (store.get(&k), k)).collect();

        replicate_aliases(&root, &store).await.unwrap();
        let second_calls = store.calls()[first_calls.len()..].to_vec();
        let second_state: Vec<_> = store.keys().into_iter().map(|k| (store.get(&k), k)).collect();

        assert_eq!(first_calls, second_calls);
        assert_eq!(first_state, second_state);
    }

    #[tokio::test]
    async fn test_processing_order_does_not_change_result() {
        let (dir, forward) = site();
        replicate_aliases(&dir.path().join("public"), &forward).await.unwrap();

        let reverse = MemoryStore::new("site.example.com");
        for page in PAGES {
            reverse.put(page, page);
        }
        let replicator = Replicator::default();
        for page in PAGES.iter().rev() {
            let key = ObjectKey::parse(page).unwrap();
            replicator.replicate_key(&reverse, &key).await.unwrap();
        }

        assert_eq!(forward.keys(), reverse.keys());
        for key in forward.keys() {
            assert_eq!(forward.get(&key), reverse.get(&key));
        }
    }

    #[tokio::test]
    async fn test_missing_root_aborts_before_any_copy() {
        let dir = tempdir().unwrap();
        let store = MemoryStore::new("site.example.com");

        let err = replicate_aliases(&dir.path().join("public"), &store).await.unwrap_err();

        assert!(matches!(err, Error::Io(_)));
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn test_replicate_key_ignores_other_documents() {
        let store = MemoryStore::new("site.example.com");
        store.put("blog/post.html", "post");
        let replicator = Replicator::default();

        let key = ObjectKey::parse("blog/post.html").unwrap();
        assert_eq!(replicator.replicate_key(&store, &key).await.unwrap(), None);
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn test_custom_index_document() {
        let store = MemoryStore::new("site.example.com");
        store.put("docs/default.htm", "docs");
        let replicator = Replicator::new("default.htm");

        let key = ObjectKey::parse("docs/default.htm").unwrap();
        let alias = replicator.replicate_key(&store, &key).await.unwrap();

        assert_eq!(alias.unwrap().to_string(), "docs/");
        assert_eq!(replicator.index_document(), "default.htm");
    }

    #[tokio::test]
    async fn test_dry_run_reports_without_copying() {
        let (dir, _) = site();
        let store = DryRunStore::new("site.example.com");

        let summary = replicate_aliases(&dir.path().join("public"), &store).await.unwrap();

        let copied: Vec<_> = summary
            .copied
            .iter()
            .map(|(s, a)| pair(&s.to_string(), &a.to_string()))
            .collect();
        assert_eq!(
            copied,
            [
                pair("about/index.html", "about/"),
                pair("blog/2024/index.html", "blog/2024/"),
            ]
        );
    }
}
