// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::float_cmp)]

//! # sheet-ingest
//!
//! Normalizes loosely structured CSV and Excel uploads into typed tables.
//!
//! Spreadsheets from the wild carry title rows, blank spacer rows and
//! columns, and cells that mix numbers with notes. This crate finds the real
//! header row, turns it into clean column names, and gives every column a
//! single coarse type (numeric, date or string), nulling cells that do not
//! fit.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sheet_ingest::{IngestPipeline, Storage, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let pipeline = IngestPipeline::new();
//!     let source = Storage::parse("s3://inbox")?;
//!     let dest = Storage::parse("s3://keye-output-files")?;
//!
//!     let receipt = pipeline.run(&source, "uploads/Deal.xlsx", &dest).await?;
//!     println!("{}", receipt.body.output_key);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! bytes ──► Decode ──► RawTable ──► HeaderLocator ──► HeaderedTable
//!          (csv/xlsx)               clean + detect
//!                                   + normalize names
//!
//! HeaderedTable ──► TypeInferencer ──► TypedTable + TypeManifest ──► Output
//!                   numeric > date > string                          (csv/parquet + json)
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Cell and table types shared by every stage
pub mod types;

/// Input decoders (CSV, XLSX)
pub mod decode;

/// Header row detection and column name normalization
pub mod header;

/// Column type inference and casting
pub mod schema;

/// Table and manifest output, storage access
pub mod output;

/// Object-created events and ingestion receipts
pub mod event;

/// Ingestion pipeline
pub mod engine;

/// Configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use config::IngestConfig;
pub use engine::IngestPipeline;
pub use event::{IngestReceipt, StorageEvent};
pub use header::{HeaderLocator, HeaderPolicy};
pub use output::{OutputFormat, Storage};
pub use schema::{ColumnType, TypeInferencer, TypeManifest};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
