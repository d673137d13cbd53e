//! Index Alias Error Types

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for Index Alias operations
pub type Result<T> = std::result::Result<T, Error>;

/// Index Alias error types
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Configuration serialization error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    // Filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Not a directory: {0:?}")]
    NotADirectory(PathBuf),

    #[error("Path is not valid UTF-8: {0:?}")]
    NonUtf8Path(PathBuf),

    // Key errors
    #[error("Invalid object key: {0}")]
    InvalidKey(String),

    // Backend errors
    #[error("Source object not found: s3://{bucket}/{key}")]
    SourceNotFound { bucket: String, key: String },

    #[error("Access denied to s3://{bucket}/{key}")]
    AccessDenied { bucket: String, key: String },

    #[error("Copy of s3://{bucket}/{source_key} to {destination} rejected with status {status}")]
    CopyRejected {
        bucket: String,
        source_key: String,
        destination: String,
        status: u16,
    },

    #[error("S3 error: {0}")]
    S3(#[from] s3::error::S3Error),

    #[error("Credentials error: {0}")]
    Credentials(#[from] s3::creds::error::CredentialsError),

    // Event errors
    #[error("Unsupported event: {0}")]
    Event(String),

    #[error("Event parse error: {0}")]
    EventParse(#[from] serde_json::Error),
}

impl Error {
    /// Check if this error was raised by the storage backend
    pub fn is_backend_failure(&self) -> bool {
        matches!(
            self,
            Error::SourceNotFound { .. }
                | Error::AccessDenied { .. }
                | Error::CopyRejected { .. }
                | Error::S3(_)
                | Error::Credentials(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_failure_classification() {
        let missing = Error::SourceNotFound {
            bucket: "site".into(),
            key: "about/index.html".into(),
        };
        assert!(missing.is_backend_failure());
        assert_eq!(
            missing.to_string(),
            "Source object not found: s3://site/about/index.html"
        );

        assert!(!Error::InvalidKey("".into()).is_backend_failure());
        assert!(!Error::Config("bucket.name cannot be empty".into()).is_backend_failure());
    }
}
