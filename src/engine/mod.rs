//! Ingestion engine
//!
//! Wires decoding, header detection, type inference and output together.
//!
//! # Overview
//!
//! The engine module provides:
//! - `IngestPipeline` - runs one file from raw bytes to typed output
//! - `ProcessedTable` / `IngestOutput` - intermediate results
//! - `IngestStats` - counters for logging

mod types;

pub use types::{IngestOutput, IngestStats, ProcessedTable};

use crate::config::IngestConfig;
use crate::decode::{decoder_for, DecoderConfig, DecoderFormat};
use crate::error::Result;
use crate::event::{IngestReceipt, StorageEvent};
use crate::header::HeaderLocator;
use crate::output::{encode_table, OutputFormat, OutputKeys, ParquetWriterConfig, Storage};
use crate::schema::TypeInferencer;
use crate::types::RawTable;
use bytes::Bytes;
use std::time::Instant;
use tracing::{debug, info};

/// Pipeline from an uploaded table file to a normalized table and manifest
#[derive(Debug, Clone)]
pub struct IngestPipeline {
    locator: HeaderLocator,
    inferencer: TypeInferencer,
    decoder: DecoderConfig,
    prefix: String,
    format: OutputFormat,
    parquet: ParquetWriterConfig,
    pretty_manifest: bool,
}

impl Default for IngestPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl IngestPipeline {
    /// Create a pipeline with default settings
    pub fn new() -> Self {
        Self::with_config(&IngestConfig::default())
    }

    /// Create a pipeline from a validated config
    pub fn from_config(config: &IngestConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_config(config))
    }

    fn with_config(config: &IngestConfig) -> Self {
        Self {
            locator: config.header.locator(),
            inferencer: config.inference.inferencer(),
            decoder: config.decode.clone(),
            prefix: config.output.prefix.clone(),
            format: config.output.format,
            parquet: config.output.parquet_writer(),
            pretty_manifest: config.output.pretty_manifest,
        }
    }

    /// Replace the header locator
    #[must_use]
    pub fn with_locator(mut self, locator: HeaderLocator) -> Self {
        self.locator = locator;
        self
    }

    /// Replace the type inferencer
    #[must_use]
    pub fn with_inferencer(mut self, inferencer: TypeInferencer) -> Self {
        self.inferencer = inferencer;
        self
    }

    /// Set the output format
    #[must_use]
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the output key prefix
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Header detection followed by type inference
    pub fn process(&self, raw: RawTable) -> Result<ProcessedTable> {
        let (detection, headered) = self.locator.locate(raw)?;
        let (table, manifest) = self.inferencer.infer_and_cast(headered);

        Ok(ProcessedTable {
            detection,
            table,
            manifest,
        })
    }

    /// Decode file bytes, picking the decoder from the key's extension
    pub fn decode(&self, source_key: &str, bytes: &[u8]) -> Result<RawTable> {
        let format = DecoderFormat::from_path(source_key)?;
        let decoder = decoder_for(format, &self.decoder)?;
        debug!(source_key, %format, bytes = bytes.len(), "Decoding input");
        decoder.decode(bytes)
    }

    /// Run the whole pipeline on in-memory bytes without touching storage
    pub fn ingest_bytes(&self, source_key: &str, bytes: &[u8]) -> Result<IngestOutput> {
        let raw = self.decode(source_key, bytes)?;
        let processed = self.process(raw)?;

        let data = encode_table(&processed.table, self.format, &self.parquet)?;
        let manifest_json = if self.pretty_manifest {
            serde_json::to_vec_pretty(&processed.manifest)?
        } else {
            serde_json::to_vec(&processed.manifest)?
        };

        Ok(IngestOutput {
            keys: OutputKeys::for_source(&self.prefix, source_key, self.format),
            data,
            manifest_json,
            processed,
        })
    }

    /// Fetch `key` from `source`, ingest it and write both outputs to `dest`
    pub async fn run(&self, source: &Storage, key: &str, dest: &Storage) -> Result<IngestReceipt> {
        let start = Instant::now();

        // Reject unknown extensions before downloading anything
        DecoderFormat::from_path(key)?;

        let bytes = source.get(key).await?;
        info!(key, bytes = bytes.len(), "Processing file");

        let output = self.ingest_bytes(key, &bytes)?;
        let stats = output.processed.stats();
        debug!(%stats, "Processed table");

        let data_path = dest
            .put(&output.keys.data_key, Bytes::from(output.data))
            .await?;
        let manifest_path = dest
            .put(&output.keys.metadata_key, Bytes::from(output.manifest_json))
            .await?;

        info!(
            source = key,
            output = %data_path,
            metadata = %manifest_path,
            rows = stats.rows,
            columns = stats.columns,
            duration_ms = start.elapsed().as_millis() as u64,
            "File processed"
        );

        Ok(IngestReceipt::ok(output.keys.data_key, output.keys.metadata_key))
    }

    /// Handle an object-created event, reading from the S3 bucket it names
    pub async fn handle_event(&self, event: &StorageEvent, dest: &Storage) -> Result<IngestReceipt> {
        self.handle_event_with(event, Storage::s3_bucket, dest).await
    }

    /// Handle an event, resolving the source bucket with `open_bucket`
    pub async fn handle_event_with<F>(
        &self,
        event: &StorageEvent,
        open_bucket: F,
        dest: &Storage,
    ) -> Result<IngestReceipt>
    where
        F: FnOnce(&str) -> Result<Storage>,
    {
        let (bucket, key) = event.first_object()?;
        info!(%bucket, %key, "Received object event");

        let source = open_bucket(&bucket)?;
        self.run(&source, &key, dest).await
    }
}
