//! Common types used throughout sheet-ingest
//!
//! The tables here flow one way through the pipeline:
//! `RawTable` (decoder) → `HeaderedTable` (header locator) → `TypedTable`
//! (type inferencer). Each stage consumes the previous table by value.

use crate::schema::ColumnType;
use chrono::{NaiveDateTime, Timelike};
use std::fmt;

// ============================================================================
// Cells
// ============================================================================

/// A scalar cell value tagged with its observed kind
///
/// The tag is assigned once by the decoder. Header detection and type
/// inference branch on it and never re-inspect raw bytes.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    /// Null, missing, or whitespace-only
    #[default]
    Empty,
    /// Non-empty text
    String(String),
    /// Native numeric value
    Number(f64),
    /// Text that parses as a number, keeping its source spelling (`007`, `1.50`)
    NumericText { value: f64, text: String },
    /// Date or timestamp
    Date(NaiveDateTime),
    /// Anything else the source could hold (booleans, error cells, durations)
    Other(String),
}

impl Cell {
    /// Build a text cell, mapping whitespace-only input to `Empty`
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.trim().is_empty() {
            Cell::Empty
        } else {
            Cell::String(value)
        }
    }

    /// Whether this cell holds no data
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::String(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Whether this cell is a non-empty string
    pub fn is_text(&self) -> bool {
        matches!(self, Cell::String(s) if !s.trim().is_empty())
    }

    /// Whether this cell is numeric or a date/timestamp
    pub fn is_numeric_or_date(&self) -> bool {
        matches!(
            self,
            Cell::Number(_) | Cell::NumericText { .. } | Cell::Date(_)
        )
    }

    /// Text form of the cell, `None` when empty
    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::String(s) if s.trim().is_empty() => None,
            Cell::String(s) | Cell::Other(s) | Cell::NumericText { text: s, .. } => {
                Some(s.clone())
            }
            Cell::Number(n) => Some(format_number(*n)),
            Cell::Date(d) => Some(format_datetime(d, !is_midnight(d))),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_text() {
            Some(text) => write!(f, "{text}"),
            None => Ok(()),
        }
    }
}

/// Format a number without a trailing `.0` when it is integral
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// Format a timestamp as `YYYY-MM-DD`, or with the time when requested
pub fn format_datetime(d: &NaiveDateTime, with_time: bool) -> String {
    if with_time {
        d.format("%Y-%m-%d %H:%M:%S").to_string()
    } else {
        d.format("%Y-%m-%d").to_string()
    }
}

/// Whether a timestamp falls exactly on midnight
pub fn is_midnight(d: &NaiveDateTime) -> bool {
    d.hour() == 0 && d.minute() == 0 && d.second() == 0 && d.nanosecond() == 0
}

// ============================================================================
// Raw Table
// ============================================================================

/// Grid of cells with no trusted header, as produced by a decoder
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawTable {
    rows: Vec<Vec<Cell>>,
    width: usize,
}

impl RawTable {
    /// Create a table from rows, padding ragged rows with `Empty`
    pub fn new(mut rows: Vec<Vec<Cell>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut rows {
            row.resize(width, Cell::Empty);
        }
        Self { rows, width }
    }

    /// Create a table from string rows, tagging each cell with `Cell::text`
    pub fn from_strings<R, S>(rows: impl IntoIterator<Item = R>) -> Self
    where
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            rows.into_iter()
                .map(|row| row.into_iter().map(Cell::text).collect())
                .collect(),
        )
    }

    /// Rows of the table
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Consume the table, returning its rows
    pub fn into_rows(self) -> Vec<Vec<Cell>> {
        self.rows
    }

    /// Number of rows
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns (width of the widest row)
    pub fn num_columns(&self) -> usize {
        self.width
    }

    /// Whether the table has no rows or no columns
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.width == 0
    }
}

// ============================================================================
// Headered Table
// ============================================================================

/// A table whose column names have been resolved
///
/// Names are not required to be unique.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HeaderedTable {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl HeaderedTable {
    /// Create a headered table, padding or truncating rows to the column count
    pub fn new(columns: Vec<String>, mut rows: Vec<Vec<Cell>>) -> Self {
        let width = columns.len();
        for row in &mut rows {
            row.resize(width, Cell::Empty);
        }
        Self { columns, rows }
    }

    /// Column names
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Data rows (the header row is not included)
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Number of data rows
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Iterate over the cells of one column
    pub fn column(&self, index: usize) -> impl Iterator<Item = &Cell> + '_ {
        self.rows.iter().map(move |row| &row[index])
    }

    /// Split into column names and column-major cell vectors
    pub fn into_columns(self) -> Vec<(String, Vec<Cell>)> {
        let mut columns: Vec<(String, Vec<Cell>)> = self
            .columns
            .into_iter()
            .map(|name| (name, Vec::with_capacity(self.rows.len())))
            .collect();

        for row in self.rows {
            for (cell, (_, values)) in row.into_iter().zip(columns.iter_mut()) {
                values.push(cell);
            }
        }

        columns
    }
}

// ============================================================================
// Typed Table
// ============================================================================

/// A value in a typed column
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    Null,
    Number(f64),
    Date(NaiveDateTime),
    Text(String),
}

impl TypedValue {
    /// Whether this value is null
    pub fn is_null(&self) -> bool {
        matches!(self, TypedValue::Null)
    }

    /// Turn the value back into a cell, for re-running inference
    pub fn to_cell(&self) -> Cell {
        match self {
            TypedValue::Null => Cell::Empty,
            TypedValue::Number(n) => Cell::Number(*n),
            TypedValue::Date(d) => Cell::Date(*d),
            TypedValue::Text(s) => Cell::text(s.clone()),
        }
    }
}

/// A column holding values of a single inferred type (plus nulls)
#[derive(Debug, Clone, PartialEq)]
pub struct TypedColumn {
    pub name: String,
    pub column_type: ColumnType,
    pub values: Vec<TypedValue>,
}

impl TypedColumn {
    /// Number of null values
    pub fn null_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_null()).count()
    }
}

/// Output of type inference: one homogeneous column per input column
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TypedTable {
    columns: Vec<TypedColumn>,
}

impl TypedTable {
    /// Create a typed table from columns
    pub fn new(columns: Vec<TypedColumn>) -> Self {
        Self { columns }
    }

    /// Columns of the table
    pub fn columns(&self) -> &[TypedColumn] {
        &self.columns
    }

    /// Look up a column by name (first match)
    pub fn column(&self, name: &str) -> Option<&TypedColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Column names in order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Number of columns
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows, taken from the first column
    ///
    /// A table without columns reports 0 rows.
    pub fn num_rows(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }

    /// Convert back into a headered table of cells
    pub fn to_headered(&self) -> HeaderedTable {
        let names = self.columns.iter().map(|c| c.name.clone()).collect();
        let rows = (0..self.num_rows())
            .map(|i| self.columns.iter().map(|c| c.values[i].to_cell()).collect())
            .collect();
        HeaderedTable::new(names, rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_cell_text_whitespace_is_empty() {
        assert_eq!(Cell::text("   "), Cell::Empty);
        assert_eq!(Cell::text(""), Cell::Empty);
        assert_eq!(Cell::text(" a "), Cell::String(" a ".to_string()));
    }

    #[test]
    fn test_cell_kinds() {
        assert!(Cell::Empty.is_empty());
        assert!(Cell::String("\t".to_string()).is_empty());
        assert!(Cell::text("Name").is_text());
        assert!(Cell::Number(1.0).is_numeric_or_date());
        assert!(!Cell::Other("true".to_string()).is_numeric_or_date());
        assert!(!Cell::Other("true".to_string()).is_text());
    }

    #[test]
    fn test_numeric_text_keeps_spelling() {
        let cell = Cell::NumericText {
            value: 7.0,
            text: "007".to_string(),
        };
        assert!(cell.is_numeric_or_date());
        assert!(!cell.is_text());
        assert!(!cell.is_empty());
        assert_eq!(cell.as_text(), Some("007".to_string()));
        assert_eq!(cell.to_string(), "007");
    }

    #[test]
    fn test_typed_table_without_columns_has_no_rows() {
        assert_eq!(TypedTable::new(vec![]).num_rows(), 0);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(30.0), "30");
        assert_eq!(format_number(-2.0), "-2");
        assert_eq!(format_number(2.5), "2.5");
    }

    #[test]
    fn test_cell_as_text_date() {
        let d = NaiveDate::from_ymd_opt(2020, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(Cell::Date(d).as_text(), Some("2020-01-01".to_string()));

        let d = d.with_hour(13).unwrap();
        assert_eq!(
            Cell::Date(d).as_text(),
            Some("2020-01-01 13:00:00".to_string())
        );
    }

    #[test]
    fn test_raw_table_pads_ragged_rows() {
        let table = RawTable::from_strings(vec![vec!["a", "b", "c"], vec!["d"]]);
        assert_eq!(table.num_columns(), 3);
        assert_eq!(table.rows()[1], vec![Cell::text("d"), Cell::Empty, Cell::Empty]);
    }

    #[test]
    fn test_headered_into_columns() {
        let table = HeaderedTable::new(
            vec!["a".to_string(), "b".to_string()],
            vec![
                vec![Cell::Number(1.0), Cell::text("x")],
                vec![Cell::Number(2.0), Cell::Empty],
            ],
        );
        let columns = table.into_columns();
        assert_eq!(columns.len(), 2);
        assert_eq!(columns[0].1, vec![Cell::Number(1.0), Cell::Number(2.0)]);
        assert_eq!(columns[1].1, vec![Cell::text("x"), Cell::Empty]);
    }
}
