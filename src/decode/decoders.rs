//! Decoder implementations
//!
//! Each decoder handles a specific file format.

use super::types::{DecoderConfig, DecoderFormat, TableDecoder};
use crate::error::{Error, Result};
use crate::types::{Cell, RawTable};
use calamine::{Data, DataType, Reader, Xlsx};
use std::io::Cursor;
use tracing::debug;

/// Build the decoder for a format
pub fn decoder_for(
    format: DecoderFormat,
    config: &DecoderConfig,
) -> Result<Box<dyn TableDecoder>> {
    match format {
        DecoderFormat::Csv => Ok(Box::new(CsvDecoder::with_delimiter(
            config.csv_delimiter,
        )?)),
        DecoderFormat::Xlsx => Ok(Box::new(match &config.sheet {
            Some(sheet) => XlsxDecoder::with_sheet(sheet.clone()),
            None => XlsxDecoder::new(),
        })),
    }
}

// ============================================================================
// CSV Decoder
// ============================================================================

/// CSV decoder that reads every line as data, header included
#[derive(Debug, Clone)]
pub struct CsvDecoder {
    /// Field delimiter
    delimiter: u8,
}

impl Default for CsvDecoder {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CsvDecoder {
    /// Create a new CSV decoder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a CSV decoder with a custom delimiter
    pub fn with_delimiter(delimiter: char) -> Result<Self> {
        let delimiter = u8::try_from(delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| {
                Error::config(format!("CSV delimiter must be ASCII: {delimiter:?}"))
            })?;
        Ok(Self { delimiter })
    }
}

impl TableDecoder for CsvDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<RawTable> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(self.delimiter)
            .from_reader(bytes);

        let mut rows = Vec::new();
        for record in reader.byte_records() {
            let record = record?;
            rows.push(
                record
                    .iter()
                    .map(|field| parse_csv_cell(&String::from_utf8_lossy(field)))
                    .collect(),
            );
        }

        let table = RawTable::new(rows);
        debug!(
            rows = table.num_rows(),
            columns = table.num_columns(),
            "Decoded CSV"
        );
        Ok(table)
    }

    fn format(&self) -> DecoderFormat {
        DecoderFormat::Csv
    }
}

/// Tag a CSV field: blank, finite number, or text
///
/// Numbers keep the field's spelling so string columns can write it back.
pub(super) fn parse_csv_cell(field: &str) -> Cell {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return Cell::Empty;
    }

    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Cell::NumericText {
            value,
            text: field.to_string(),
        },
        _ => Cell::String(field.to_string()),
    }
}

// ============================================================================
// XLSX Decoder
// ============================================================================

/// Excel workbook decoder reading a single worksheet
#[derive(Debug, Clone, Default)]
pub struct XlsxDecoder {
    /// Worksheet name, first sheet when unset
    sheet: Option<String>,
}

impl XlsxDecoder {
    /// Create a decoder for the first worksheet
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a decoder for a named worksheet
    pub fn with_sheet(sheet: impl Into<String>) -> Self {
        Self {
            sheet: Some(sheet.into()),
        }
    }
}

impl TableDecoder for XlsxDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<RawTable> {
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))
            .map_err(|e| Error::spreadsheet(format!("Failed to open workbook: {e}")))?;

        let index = match &self.sheet {
            Some(name) => workbook
                .sheet_names()
                .iter()
                .position(|n| n == name)
                .ok_or_else(|| Error::spreadsheet(format!("Worksheet not found: {name}")))?,
            None => 0,
        };

        let range = workbook
            .worksheet_range_at(index)
            .ok_or_else(|| Error::spreadsheet("Workbook has no worksheets"))?
            .map_err(|e| Error::spreadsheet(format!("Failed to read worksheet: {e}")))?;

        let rows = range
            .rows()
            .map(|row| row.iter().map(spreadsheet_cell).collect())
            .collect();

        let table = RawTable::new(rows);
        debug!(
            rows = table.num_rows(),
            columns = table.num_columns(),
            sheet = index,
            "Decoded worksheet"
        );
        Ok(table)
    }

    fn format(&self) -> DecoderFormat {
        DecoderFormat::Xlsx
    }
}

/// Map a worksheet cell onto a tagged cell
pub(super) fn spreadsheet_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::DateTime(_) | Data::DateTimeIso(_) => data
            .as_datetime()
            .map_or_else(|| Cell::Other(data.to_string()), Cell::Date),
        Data::Bool(b) => Cell::Other(b.to_string()),
        Data::DurationIso(s) => Cell::Other(s.clone()),
        Data::Error(e) => Cell::Other(e.to_string()),
    }
}
