//! Decoder types and traits
//!
//! Defines the core decoder abstractions.

use crate::error::{Error, Result};
use crate::types::RawTable;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Format of an input file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecoderFormat {
    /// Delimited text
    Csv,
    /// Excel workbook (first or named sheet)
    Xlsx,
}

impl DecoderFormat {
    /// Pick the format from a file name or object key extension
    pub fn from_path(path: &str) -> Result<Self> {
        let extension = Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);

        match extension.as_deref() {
            Some("csv") => Ok(DecoderFormat::Csv),
            Some("xlsx" | "xlsm") => Ok(DecoderFormat::Xlsx),
            _ => Err(Error::unsupported_format(path)),
        }
    }
}

impl std::fmt::Display for DecoderFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecoderFormat::Csv => write!(f, "csv"),
            DecoderFormat::Xlsx => write!(f, "xlsx"),
        }
    }
}

/// Configuration for decoding input files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// CSV delimiter (default: comma)
    pub csv_delimiter: char,
    /// Worksheet to read (default: first sheet)
    pub sheet: Option<String>,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            csv_delimiter: ',',
            sheet: None,
        }
    }
}

impl DecoderConfig {
    /// Set the CSV delimiter
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.csv_delimiter = delimiter;
        self
    }

    /// Set the worksheet name
    #[must_use]
    pub fn with_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.sheet = Some(sheet.into());
        self
    }
}

/// Trait for decoding file bytes into a raw table
pub trait TableDecoder: Send + Sync {
    /// Decode the file contents
    fn decode(&self, bytes: &[u8]) -> Result<RawTable>;

    /// Format handled by this decoder
    fn format(&self) -> DecoderFormat;
}
