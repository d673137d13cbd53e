//! Index Alias Configuration
//!
//! Configuration is read from a TOML file. Every section is optional; a
//! missing file yields the defaults, which publish the `public` folder to
//! the default site bucket.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::key::DEFAULT_INDEX_DOCUMENT;

/// Bucket published to when nothing else is configured
pub const DEFAULT_BUCKET: &str = "man.hwangsehyun.com";

/// Main Index Alias configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexAliasConfig {
    /// Target bucket
    #[serde(default)]
    pub bucket: BucketConfig,

    /// Local site layout
    #[serde(default)]
    pub site: SiteConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Target bucket configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketConfig {
    /// Bucket name
    #[serde(default = "default_bucket_name")]
    pub name: String,

    /// AWS region name
    #[serde(default = "default_region")]
    pub region: String,

    /// Custom S3-compatible endpoint (MinIO, R2, ...)
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Use path-style instead of virtual-host addressing
    #[serde(default)]
    pub path_style: bool,

    /// Static access key; credentials are resolved from the environment
    /// when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_key: Option<String>,

    /// Static secret key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<String>,
}

/// Local site layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Publish root the site was uploaded from
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// File name served for directory-style keys
    #[serde(default = "default_index_document")]
    pub index_document: String,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (pretty, json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_bucket_name() -> String {
    DEFAULT_BUCKET.to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_root() -> PathBuf {
    PathBuf::from("public")
}

fn default_index_document() -> String {
    DEFAULT_INDEX_DOCUMENT.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for BucketConfig {
    fn default() -> Self {
        Self {
            name: default_bucket_name(),
            region: default_region(),
            endpoint: None,
            path_style: false,
            access_key: None,
            secret_key: None,
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            index_document: default_index_document(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl IndexAliasConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML file, falling back to defaults when
    /// the file does not exist
    pub fn load_or_default(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            Self::from_file(path)
        } else {
            tracing::debug!("No configuration at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Load configuration from a TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> crate::Result<Self> {
        let config: IndexAliasConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: &Path) -> crate::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> crate::Result<()> {
        if self.bucket.name.is_empty() {
            return Err(crate::Error::Config("bucket.name cannot be empty".into()));
        }

        if self.bucket.region.is_empty() {
            return Err(crate::Error::Config("bucket.region cannot be empty".into()));
        }

        if self.bucket.access_key.is_some() != self.bucket.secret_key.is_some() {
            return Err(crate::Error::Config(
                "bucket.access_key and bucket.secret_key must be set together".into(),
            ));
        }

        if self.site.root.as_os_str().is_empty() {
            return Err(crate::Error::Config("site.root cannot be empty".into()));
        }

        if self.site.index_document.is_empty() || self.site.index_document.contains('/') {
            return Err(crate::Error::Config(format!(
                "site.index_document {:?} must be a single file name",
                self.site.index_document
            )));
        }

        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(crate::Error::Config(format!(
                "logging.format must be \"pretty\" or \"json\", got {:?}",
                self.logging.format
            )));
        }

        Ok(())
    }

    /// Get the publish root
    pub fn root(&self) -> &Path {
        &self.site.root
    }

    /// Get the index document name
    pub fn index_document(&self) -> &str {
        &self.site.index_document
    }
}
