//! Object Created notifications
//!
//! Parses the EventBridge form of an S3 "Object Created" notification so a
//! single freshly uploaded index document can be aliased on its own,
//! without rescanning the publish root.

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::key::ObjectKey;

const DETAIL_TYPE_OBJECT_CREATED: &str = "Object Created";
const SOURCE_S3: &str = "aws.s3";

/// EventBridge envelope of an S3 notification
#[derive(Debug, Clone, Deserialize)]
pub struct S3ObjectCreatedEvent {
    #[serde(rename = "detail-type")]
    pub detail_type: String,
    pub source: String,
    pub detail: ObjectCreatedDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObjectCreatedDetail {
    pub bucket: BucketRef,
    pub object: ObjectRef,
    /// API call that created the object (PutObject, CopyObject, ...)
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BucketRef {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObjectRef {
    pub key: String,
    #[serde(default)]
    pub size: Option<u64>,
}

impl S3ObjectCreatedEvent {
    /// Parse and validate a notification
    pub fn from_json(json: &str) -> Result<Self> {
        let event: S3ObjectCreatedEvent = serde_json::from_str(json)?;
        event.validate()?;
        Ok(event)
    }

    fn validate(&self) -> Result<()> {
        if self.source != SOURCE_S3 {
            return Err(Error::Event(format!(
                "expected source {:?}, got {:?}",
                SOURCE_S3, self.source
            )));
        }
        if self.detail_type != DETAIL_TYPE_OBJECT_CREATED {
            return Err(Error::Event(format!(
                "expected detail-type {:?}, got {:?}",
                DETAIL_TYPE_OBJECT_CREATED, self.detail_type
            )));
        }
        if self.detail.bucket.name.is_empty() {
            return Err(Error::Event("bucket name is empty".into()));
        }
        Ok(())
    }

    /// Bucket the object was created in
    pub fn bucket(&self) -> &str {
        &self.detail.bucket.name
    }

    /// Key of the created object, taken verbatim
    pub fn key(&self) -> Result<ObjectKey> {
        ObjectKey::parse(&self.detail.object.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replicator::Replicator;
    use crate::store::MemoryStore;

    fn notification(detail_type: &str, key: &str) -> String {
        format!(
            r#"{{
  "version": "0",
  "id": "17793124-05d4-b198-2fde-7ededc63b103",
  "detail-type": "{detail_type}",
  "source": "aws.s3",
  "account": "111122223333",
  "time": "2024-03-01T00:00:00Z",
  "region": "ap-northeast-1",
  "resources": ["arn:aws:s3:::site.example.com"],
  "detail": {{
    "version": "0",
    "bucket": {{ "name": "site.example.com" }},
    "object": {{ "key": "{key}", "size": 5576, "etag": "b1946ac92492d2347c6235b4d2611184", "sequencer": "00617F08299329D189" }},
    "request-id": "N4N7GDK58NMKJ12R",
    "requester": "123456789012",
    "reason": "PutObject"
  }}
}}"#
        )
    }

    #[test]
    fn test_parse_object_created() {
        let event = S3ObjectCreatedEvent::from_json(&notification("Object Created", "about/index.html")).unwrap();
        assert_eq!(event.bucket(), "site.example.com");
        assert_eq!(event.key().unwrap().to_string(), "about/index.html");
        assert_eq!(event.detail.reason.as_deref(), Some("PutObject"));
        assert_eq!(event.detail.object.size, Some(5576));
    }

    #[test]
    fn test_rejects_other_detail_types() {
        let err = S3ObjectCreatedEvent::from_json(&notification("Object Deleted", "about/index.html")).unwrap_err();
        assert!(matches!(err, Error::Event(_)));
    }

    #[test]
    fn test_rejects_other_sources() {
        let json = notification("Object Created", "a/index.html").replace("\"aws.s3\"", "\"aws.ec2\"");
        assert!(matches!(S3ObjectCreatedEvent::from_json(&json), Err(Error::Event(_))));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = S3ObjectCreatedEvent::from_json("{\"detail-type\": ").unwrap_err();
        assert!(matches!(err, Error::EventParse(_)));
    }

    #[tokio::test]
    async fn test_event_key_is_replicated() {
        let event = S3ObjectCreatedEvent::from_json(&notification("Object Created", "blog/2024/index.html")).unwrap();
        let store = MemoryStore::new(event.bucket());
        store.put("blog/2024/index.html", "blog");

        let alias = Replicator::default()
            .replicate_key(&store, &event.key().unwrap())
            .await
            .unwrap();

        assert_eq!(alias.unwrap().to_string(), "blog/2024/");
        assert_eq!(store.get("blog/2024/").as_deref(), Some(&b"blog"[..]));
    }

    #[tokio::test]
    async fn test_event_for_root_index_is_skipped() {
        let event = S3ObjectCreatedEvent::from_json(&notification("Object Created", "index.html")).unwrap();
        let store = MemoryStore::new(event.bucket());
        store.put("index.html", "root");

        let alias = Replicator::default()
            .replicate_key(&store, &event.key().unwrap())
            .await
            .unwrap();

        assert!(alias.is_none());
        assert!(store.calls().is_empty());
    }
}
