//! S3 backend
//!
//! Issues server-side CopyObject requests through `rust-s3`. Object bytes
//! never pass through this process; only the bucket and the two keys are sent.

use async_trait::async_trait;
use s3::creds::Credentials;
use s3::error::S3Error;
use s3::{Bucket, Region};
use tracing::debug;

use super::ObjectStore;
use crate::config::BucketConfig;
use crate::error::{Error, Result};
use crate::key::ObjectKey;

/// Handle to a single S3 (or S3-compatible) bucket
pub struct S3Store {
    name: String,
    bucket: Box<Bucket>,
}

impl S3Store {
    /// Build a handle from bucket configuration.
    ///
    /// No request is made here; credentials that are not configured are
    /// resolved from the environment or the shared profile.
    pub fn from_config(config: &BucketConfig) -> Result<Self> {
        let region = match &config.endpoint {
            Some(endpoint) => Region::Custom {
                region: config.region.clone(),
                endpoint: endpoint.clone(),
            },
            None => config
                .region
                .parse::<Region>()
                .map_err(|e| Error::Config(format!("invalid region {:?}: {}", config.region, e)))?,
        };

        let credentials = match (&config.access_key, &config.secret_key) {
            (Some(access_key), Some(secret_key)) => {
                Credentials::new(Some(access_key.as_str()), Some(secret_key.as_str()), None, None, None)?
            }
            _ => Credentials::default()?,
        };

        let mut bucket = Bucket::new(&config.name, region, credentials)?;
        if use_path_style(config) {
            bucket = bucket.with_path_style();
        }

        Ok(Self {
            name: config.name.clone(),
            bucket,
        })
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    fn bucket(&self) -> &str {
        &self.name
    }

    async fn copy_object(&self, source: &ObjectKey, destination: &ObjectKey) -> Result<()> {
        let from = source.to_string();
        let to = destination.to_string();
        debug!("CopyObject s3://{}/{} -> {}", self.name, from, to);

        // x-amz-copy-source is sent verbatim by rust-s3, so it must be encoded here
        let status = match self.bucket.copy_object_internal(copy_source(source), &to).await {
            Ok(status) => status,
            Err(S3Error::HttpFailWithBody(status, _)) => status,
            Err(e) => return Err(e.into()),
        };

        check_copy_status(&self.name, &from, &to, status)
    }
}

/// Dotted bucket names cannot be addressed virtual-host style over TLS:
/// `*.s3.amazonaws.com` only covers a single label.
fn use_path_style(config: &BucketConfig) -> bool {
    config.path_style || config.name.contains('.')
}

/// URL-encode each key segment for the `x-amz-copy-source` header,
/// keeping the '/' separators
fn copy_source(key: &ObjectKey) -> String {
    let mut encoded = key
        .segments()
        .iter()
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/");
    if key.is_directory() {
        encoded.push('/');
    }
    encoded
}

/// Map a CopyObject response status onto the error taxonomy
fn check_copy_status(bucket: &str, source: &str, destination: &str, status: u16) -> Result<()> {
    match status {
        200..=299 => Ok(()),
        404 => Err(Error::SourceNotFound {
            bucket: bucket.to_string(),
            key: source.to_string(),
        }),
        403 => Err(Error::AccessDenied {
            bucket: bucket.to_string(),
            key: destination.to_string(),
        }),
        status => Err(Error::CopyRejected {
            bucket: bucket.to_string(),
            source_key: source.to_string(),
            destination: destination.to_string(),
            status,
        }),
    }
}
