//! Output module
//!
//! Handles persisting typed tables and their type manifests.
//!
//! # Overview
//!
//! This module provides utilities for:
//! - Writing typed tables as delimited text or Parquet
//! - Converting typed tables to Arrow RecordBatches
//! - Naming output objects after their source file
//! - Reading and writing objects in cloud storage (S3, R2, GCS, Azure) or locally

mod cloud;
mod schema;
mod writer;

pub use cloud::{ObjectRef, OutputKeys, Storage};
pub use schema::{arrow_schema, to_record_batch};
pub use writer::{encode_table, write_csv, write_parquet, OutputFormat, ParquetWriterConfig};
