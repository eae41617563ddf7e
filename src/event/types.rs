//! Event and receipt types

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

// ============================================================================
// Object-created notification
// ============================================================================

/// Object-created notification in the S3 event layout
///
/// ```json
/// {"Records": [{"s3": {"bucket": {"name": "inbox"}, "object": {"key": "uploads/Deal.xlsx"}}}]}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageEvent {
    #[serde(rename = "Records", default)]
    pub records: Vec<EventRecord>,
}

/// One notification record; fields other than `s3` are ignored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub s3: EventS3,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventS3 {
    pub bucket: EventBucket,
    pub object: EventObject,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventBucket {
    pub name: String,
}

/// Object key as delivered: URL-encoded, spaces as `+`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventObject {
    pub key: String,
}

impl StorageEvent {
    /// Parse a notification from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build a single-record event, mainly for tests and the CLI
    pub fn single(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            records: vec![EventRecord {
                s3: EventS3 {
                    bucket: EventBucket {
                        name: bucket.into(),
                    },
                    object: EventObject { key: key.into() },
                },
            }],
        }
    }

    /// Bucket and decoded key of the first record
    ///
    /// Later records are ignored.
    pub fn first_object(&self) -> Result<(String, String)> {
        let record = self
            .records
            .first()
            .ok_or_else(|| Error::event("event has no records"))?;

        let bucket = record.s3.bucket.name.clone();
        if bucket.is_empty() {
            return Err(Error::event("record has an empty bucket name"));
        }

        let key = decode_key(&record.s3.object.key)?;
        if key.is_empty() {
            return Err(Error::event("record has an empty object key"));
        }

        Ok((bucket, key))
    }
}

/// Undo form encoding of an object key
fn decode_key(raw: &str) -> Result<String> {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|key| key.into_owned())
        .map_err(|e| Error::event(format!("object key is not valid UTF-8: {e}")))
}

// ============================================================================
// Receipt
// ============================================================================

/// Result of a successful ingestion
///
/// Serializes as `{"statusCode": 200, "body": {"output_key": .., "metadata_key": ..}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReceipt {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: ReceiptBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptBody {
    /// Key of the normalized table
    pub output_key: String,
    /// Key of the type manifest
    pub metadata_key: String,
}

impl IngestReceipt {
    /// Successful receipt for the written keys
    pub fn ok(output_key: impl Into<String>, metadata_key: impl Into<String>) -> Self {
        Self {
            status_code: 200,
            body: ReceiptBody {
                output_key: output_key.into(),
                metadata_key: metadata_key.into(),
            },
        }
    }
}
