//! Typed table writers
//!
//! Serialises typed tables to in-memory buffers ready for upload.

use super::schema::to_record_batch;
use crate::error::{Error, Result};
use crate::schema::ColumnType;
use crate::types::{
    format_datetime, format_number, is_midnight, TypedColumn, TypedTable, TypedValue,
};
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use serde::{Deserialize, Serialize};

/// Serialisation format for the normalized table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Comma-separated text, nulls as empty fields
    #[default]
    Csv,
    /// Parquet file
    Parquet,
}

impl OutputFormat {
    /// File extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Parquet => "parquet",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "parquet" => Ok(OutputFormat::Parquet),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}

/// Serialise a table in the requested format
pub fn encode_table(
    table: &TypedTable,
    format: OutputFormat,
    parquet: &ParquetWriterConfig,
) -> Result<Vec<u8>> {
    match format {
        OutputFormat::Csv => write_csv(table),
        OutputFormat::Parquet => write_parquet(table, parquet),
    }
}

// ============================================================================
// CSV
// ============================================================================

/// Write a typed table as CSV with a header line
///
/// Date columns print as `YYYY-MM-DD` unless some value carries a time of day.
pub fn write_csv(table: &TypedTable) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(table.column_names())?;

    let with_time: Vec<bool> = table.columns().iter().map(column_has_time).collect();

    for row in 0..table.num_rows() {
        let record: Vec<String> = table
            .columns()
            .iter()
            .zip(&with_time)
            .map(|(column, with_time)| format_value(&column.values[row], *with_time))
            .collect();
        writer.write_record(&record)?;
    }

    writer
        .into_inner()
        .map_err(|e| Error::output(format!("Failed to flush CSV: {e}")))
}

fn column_has_time(column: &TypedColumn) -> bool {
    column.column_type == ColumnType::Date
        && column.values.iter().any(|v| match v {
            TypedValue::Date(d) => !is_midnight(d),
            _ => false,
        })
}

fn format_value(value: &TypedValue, with_time: bool) -> String {
    match value {
        TypedValue::Null => String::new(),
        TypedValue::Number(n) => format_number(*n),
        TypedValue::Date(d) => format_datetime(d, with_time),
        TypedValue::Text(s) => s.clone(),
    }
}

// ============================================================================
// Parquet
// ============================================================================

/// Configuration for Parquet output
#[derive(Debug, Clone, PartialEq)]
pub struct ParquetWriterConfig {
    compression: Compression,
    row_group_size: usize,
}

impl Default for ParquetWriterConfig {
    fn default() -> Self {
        Self {
            compression: Compression::SNAPPY,
            row_group_size: 1024 * 1024, // 1M rows
        }
    }
}

impl ParquetWriterConfig {
    /// Create a new config with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set row group size
    #[must_use]
    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Use no compression
    #[must_use]
    pub fn uncompressed(mut self) -> Self {
        self.compression = Compression::UNCOMPRESSED;
        self
    }

    fn build_properties(&self) -> WriterProperties {
        WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build()
    }
}

/// Write a typed table as a single-batch Parquet file
pub fn write_parquet(table: &TypedTable, config: &ParquetWriterConfig) -> Result<Vec<u8>> {
    let batch = to_record_batch(table)?;
    let props = config.build_properties();
    let mut writer = ArrowWriter::try_new(Vec::new(), batch.schema(), Some(props))?;
    writer.write(&batch)?;
    Ok(writer.into_inner()?)
}
