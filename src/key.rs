//! Object Keys
//!
//! Bucket keys are modelled as forward-slash delimited segment sequences.
//! Platform paths are converted exactly once, at the filesystem boundary,
//! so separator differences never leak into key derivation.

use std::fmt;
use std::path::{Component, Path};

use crate::error::{Error, Result};

/// Default name of the document served for a directory-style key
pub const DEFAULT_INDEX_DOCUMENT: &str = "index.html";

/// A key within a bucket
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectKey {
    /// Non-empty segments, none containing '/'
    segments: Vec<String>,
    /// Rendered with a trailing '/'
    directory: bool,
}

impl ObjectKey {
    /// Build a key from already-split segments
    pub fn from_segments<I, S>(segments: I, directory: bool) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        for segment in &segments {
            if segment.is_empty() {
                return Err(Error::InvalidKey("empty segment".into()));
            }
            if segment.contains('/') {
                return Err(Error::InvalidKey(format!("segment {segment:?} contains '/'")));
            }
        }
        Ok(Self { segments, directory })
    }

    /// Parse a raw bucket key such as `blog/2024/index.html` or `about/`
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.is_empty() {
            return Err(Error::InvalidKey("key is empty".into()));
        }
        if raw.starts_with('/') {
            return Err(Error::InvalidKey(format!("{raw:?} has a leading '/'")));
        }

        let (body, directory) = match raw.strip_suffix('/') {
            Some(body) => (body, true),
            None => (raw, false),
        };

        let segments: Vec<&str> = body.split('/').collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(Error::InvalidKey(format!("{raw:?} has an empty segment")));
        }

        Self::from_segments(segments, directory)
    }

    /// Convert a path relative to the publish root into a key.
    ///
    /// Only plain UTF-8 components are accepted; `..`, roots and prefixes
    /// are rejected rather than normalized.
    pub fn from_relative_path(path: &Path) -> Result<Self> {
        let mut segments = Vec::new();
        for component in path.components() {
            match component {
                Component::Normal(name) => {
                    let name = name
                        .to_str()
                        .ok_or_else(|| Error::NonUtf8Path(path.to_path_buf()))?;
                    segments.push(name.to_string());
                }
                Component::CurDir => {}
                _ => {
                    return Err(Error::InvalidKey(format!(
                        "{} is not a plain relative path",
                        path.display()
                    )));
                }
            }
        }

        if segments.is_empty() {
            return Err(Error::InvalidKey("relative path is empty".into()));
        }
        Self::from_segments(segments, false)
    }

    /// Key segments
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Last segment, unless this is a directory key
    pub fn file_name(&self) -> Option<&str> {
        if self.directory {
            return None;
        }
        self.segments.last().map(String::as_str)
    }

    /// Whether the key renders with a trailing '/'
    pub fn is_directory(&self) -> bool {
        self.directory
    }

    /// Whether the key has no segments (never valid on a backend)
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Directory-style alias of an index document key.
    ///
    /// `a/b/index.html` becomes `a/b/`. Returns `None` when the key does
    /// not name `index_document` or when the alias would be empty, which
    /// is the case for the site root.
    pub fn alias(&self, index_document: &str) -> Option<ObjectKey> {
        if self.file_name() != Some(index_document) {
            return None;
        }

        let parent = &self.segments[..self.segments.len() - 1];
        if parent.is_empty() {
            return None;
        }

        Some(ObjectKey {
            segments: parent.to_vec(),
            directory: true,
        })
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))?;
        if self.directory && !self.segments.is_empty() {
            f.write_str("/")?;
        }
        Ok(())
    }
}

impl std::str::FromStr for ObjectKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
