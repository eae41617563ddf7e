//! Cloud storage support (S3, R2, GCS, Azure, local)
//!
//! A [`Storage`] is an explicit handle on one bucket or directory. It is
//! built by the caller and passed to the pipeline; nothing here is global.

use super::writer::OutputFormat;
use crate::error::{Error, Result};
use bytes::Bytes;
use object_store::aws::AmazonS3Builder;
use object_store::azure::MicrosoftAzureBuilder;
use object_store::gcp::GoogleCloudStorageBuilder;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Object keys written for one ingested file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputKeys {
    /// Normalized table
    pub data_key: String,
    /// Type manifest
    pub metadata_key: String,
}

impl OutputKeys {
    /// Derive output keys from the source object's file name
    ///
    /// Format: `{prefix}/{stem}.{csv|parquet}` and `{prefix}/{stem}_metadata.json`
    ///
    /// Examples:
    /// - `uploads/Deal.xlsx` → `processed/Deal.csv`, `processed/Deal_metadata.json`
    pub fn for_source(prefix: &str, source_key: &str, format: OutputFormat) -> Self {
        let file_name = source_key.rsplit('/').next().unwrap_or(source_key);
        let stem = Path::new(file_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(file_name);

        let prefix = prefix.trim_matches('/');
        let join = |name: String| {
            if prefix.is_empty() {
                name
            } else {
                format!("{prefix}/{name}")
            }
        };

        Self {
            data_key: join(format!("{stem}.{}", format.extension())),
            metadata_key: join(format!("{stem}_metadata.json")),
        }
    }
}

/// A full object URL split into its storage root and key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRef {
    /// URL or directory accepted by [`Storage::parse`]
    pub root: String,
    /// Key relative to the root
    pub key: String,
}

impl ObjectRef {
    /// Split an object URL or local file path
    ///
    /// - `s3://bucket/uploads/Deal.xlsx` → root `s3://bucket`, key `uploads/Deal.xlsx`
    /// - `./data/deals.csv` → root `./data`, key `deals.csv`
    pub fn parse(url: &str) -> Result<Self> {
        for scheme in CLOUD_SCHEMES {
            if let Some(rest) = url.strip_prefix(&format!("{scheme}://")) {
                let (bucket, key) = rest
                    .split_once('/')
                    .filter(|(bucket, key)| !bucket.is_empty() && !key.is_empty())
                    .ok_or_else(|| Error::config(format!("Object URL has no key: {url}")))?;
                return Ok(Self {
                    root: format!("{scheme}://{bucket}"),
                    key: key.to_string(),
                });
            }
        }

        let path = Path::new(url.strip_prefix("file://").unwrap_or(url));
        let key = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::config(format!("Path has no file name: {url}")))?;
        let root = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                parent.to_string_lossy().to_string()
            }
            _ => ".".to_string(),
        };

        Ok(Self {
            root,
            key: key.to_string(),
        })
    }
}

/// URL schemes backed by a cloud object store
const CLOUD_SCHEMES: [&str; 4] = ["s3", "r2", "gs", "az"];

/// Handle on a bucket, container or local directory
#[derive(Debug, Clone)]
pub struct Storage {
    store: Arc<dyn ObjectStore>,
    /// Key prefix inside the bucket
    prefix: String,
    /// `s3`, `r2`, `gs`, `az`, `file` or `memory`
    scheme: String,
}

impl Storage {
    /// Open a bucket, container or directory
    ///
    /// Accepts `s3://`, `r2://`, `gs://` and `az://` URLs with an optional
    /// key prefix after the bucket, or a local directory (created if missing).
    /// Credentials and endpoints come from the environment.
    pub fn parse(url: &str) -> Result<Self> {
        let cloud = url
            .split_once("://")
            .filter(|(scheme, _)| CLOUD_SCHEMES.contains(scheme));
        let Some((scheme, rest)) = cloud else {
            return Self::local(url);
        };

        let (bucket, prefix) = match rest.split_once('/') {
            Some((bucket, prefix)) => (bucket, prefix.trim_end_matches('/').to_string()),
            None => (rest, String::new()),
        };
        if bucket.is_empty() {
            return Err(Error::config(format!("Missing bucket in {url}")));
        }

        let client_error = |e: object_store::Error| {
            Error::config(format!("Failed to create {scheme} client: {e}"))
        };
        let store: Arc<dyn ObjectStore> = match scheme {
            "gs" => Arc::new(
                GoogleCloudStorageBuilder::from_env()
                    .with_bucket_name(bucket)
                    .build()
                    .map_err(client_error)?,
            ),
            "az" => Arc::new(
                MicrosoftAzureBuilder::from_env()
                    .with_container_name(bucket)
                    .build()
                    .map_err(client_error)?,
            ),
            _ => {
                let mut builder = AmazonS3Builder::from_env().with_bucket_name(bucket);
                // R2 is S3-compatible behind its own endpoint
                if scheme == "r2" {
                    if let Ok(endpoint) = std::env::var("R2_ENDPOINT_URL") {
                        builder = builder.with_endpoint(endpoint);
                    }
                }
                Arc::new(builder.build().map_err(client_error)?)
            }
        };

        Ok(Self {
            store,
            prefix,
            scheme: scheme.to_string(),
        })
    }

    /// Handle on an S3 bucket by name
    pub fn s3_bucket(bucket: &str) -> Result<Self> {
        Self::parse(&format!("s3://{bucket}"))
    }

    /// In-memory store, for tests and dry runs
    pub fn in_memory() -> Self {
        Self {
            store: Arc::new(InMemory::new()),
            prefix: String::new(),
            scheme: "memory".to_string(),
        }
    }

    fn local(path: &str) -> Result<Self> {
        let dir = path.strip_prefix("file://").unwrap_or(path);
        std::fs::create_dir_all(dir)?;

        let store = LocalFileSystem::new_with_prefix(dir)
            .map_err(|e| Error::config(format!("Failed to open directory {dir}: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            prefix: String::new(),
            scheme: "file".to_string(),
        })
    }

    fn object_path(&self, key: &str) -> ObjectPath {
        if self.prefix.is_empty() {
            ObjectPath::from(key)
        } else {
            ObjectPath::from(format!("{}/{key}", self.prefix))
        }
    }

    /// Read an object fully into memory
    pub async fn get(&self, key: &str) -> Result<Bytes> {
        let path = self.object_path(key);
        let result = self
            .store
            .get(&path)
            .await
            .map_err(|e| Error::storage(format!("Failed to read {path}: {e}")))?;
        let data = result
            .bytes()
            .await
            .map_err(|e| Error::storage(format!("Failed to read {path}: {e}")))?;

        debug!(scheme = %self.scheme, %path, bytes = data.len(), "Fetched object");
        Ok(data)
    }

    /// Write bytes to an object, returning its full path for logging
    pub async fn put(&self, key: &str, data: Bytes) -> Result<String> {
        let path = self.object_path(key);
        let size = data.len();

        self.store
            .put(&path, data.into())
            .await
            .map_err(|e| Error::storage(format!("Failed to write {path}: {e}")))?;

        debug!(scheme = %self.scheme, %path, bytes = size, "Wrote object");
        Ok(format!("{}://{path}", self.scheme))
    }
}
