//! Engine types
//!
//! Results produced by the ingestion pipeline.

use crate::header::HeaderDetection;
use crate::output::OutputKeys;
use crate::schema::TypeManifest;
use crate::types::TypedTable;

/// A table after header detection and type inference
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedTable {
    /// How the header row was chosen
    pub detection: HeaderDetection,
    /// Typed columns in source order
    pub table: TypedTable,
    /// Column name to type tag
    pub manifest: TypeManifest,
}

impl ProcessedTable {
    /// Summary counters for logging
    pub fn stats(&self) -> IngestStats {
        IngestStats {
            header_row: self.detection.header_row,
            rows: self.table.num_rows(),
            columns: self.table.num_columns(),
            nulls: self.table.columns().iter().map(|c| c.null_count()).sum(),
        }
    }
}

/// Encoded objects ready to upload
#[derive(Debug, Clone)]
pub struct IngestOutput {
    /// Keys the two objects are written under
    pub keys: OutputKeys,
    /// Serialized normalized table
    pub data: Vec<u8>,
    /// Serialized type manifest
    pub manifest_json: Vec<u8>,
    /// The table the bytes were produced from
    pub processed: ProcessedTable,
}

/// Counters for one ingested file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    /// Header position in the cleaned table
    pub header_row: usize,
    /// Data rows written
    pub rows: usize,
    /// Columns written
    pub columns: usize,
    /// Null cells across all columns
    pub nulls: usize,
}

impl std::fmt::Display for IngestStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} rows x {} columns, header at row {}, {} nulls",
            self.rows, self.columns, self.header_row, self.nulls
        )
    }
}
