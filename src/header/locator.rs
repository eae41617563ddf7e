//! Header row detection and column name normalization

use super::types::{HeaderDetection, HeaderPolicy, RowScore, DEFAULT_SCAN_ROWS};
use crate::error::{Error, Result};
use crate::types::{Cell, HeaderedTable, RawTable};
use tracing::{debug, info, warn};

/// Rows shown in debug previews
const PREVIEW_ROWS: usize = 10;

/// Locates the header row of a raw table and applies it
#[derive(Debug, Clone)]
pub struct HeaderLocator {
    policy: HeaderPolicy,
    scan_rows: usize,
}

impl Default for HeaderLocator {
    fn default() -> Self {
        Self::new()
    }
}

impl HeaderLocator {
    /// Create a locator using the scoring policy over the first 10 rows
    pub fn new() -> Self {
        Self {
            policy: HeaderPolicy::default(),
            scan_rows: DEFAULT_SCAN_ROWS,
        }
    }

    /// Set the selection policy
    #[must_use]
    pub fn with_policy(mut self, policy: HeaderPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set how many leading rows are considered
    #[must_use]
    pub fn with_scan_rows(mut self, scan_rows: usize) -> Self {
        self.scan_rows = scan_rows.max(1);
        self
    }

    /// The configured policy
    pub fn policy(&self) -> HeaderPolicy {
        self.policy
    }

    /// Detect the header row without applying it
    ///
    /// The returned row index refers to the table after empty rows and
    /// columns have been removed.
    pub fn detect(&self, table: &RawTable) -> Result<HeaderDetection> {
        let cleaned = clean_table(table.clone())?;
        Ok(self.detect_cleaned(&cleaned))
    }

    /// Find the header, promote it to column names and drop the rows above it
    pub fn locate_and_apply(&self, table: RawTable) -> Result<HeaderedTable> {
        self.locate(table).map(|(_, headered)| headered)
    }

    /// Like [`locate_and_apply`](Self::locate_and_apply), also returning the detection
    pub fn locate(&self, table: RawTable) -> Result<(HeaderDetection, HeaderedTable)> {
        debug!(
            "Initial table preview (first {PREVIEW_ROWS} rows):\n{}",
            preview(table.rows())
        );

        let cleaned = clean_table(table)?;
        debug!(
            rows = cleaned.num_rows(),
            columns = cleaned.num_columns(),
            "Table after removing empty rows and columns:\n{}",
            preview(cleaned.rows())
        );

        let detection = self.detect_cleaned(&cleaned);
        let headered = apply_header(cleaned, detection.header_row);

        debug!(
            columns = ?headered.columns(),
            "Cleaned table preview (first {PREVIEW_ROWS} rows):\n{}",
            preview(headered.rows())
        );

        Ok((detection, headered))
    }

    /// Score candidates and pick the header on an already-cleaned table
    fn detect_cleaned(&self, table: &RawTable) -> HeaderDetection {
        let scores: Vec<RowScore> = table
            .rows()
            .iter()
            .take(self.scan_rows)
            .enumerate()
            .map(|(row, cells)| score_row(row, cells))
            .collect();

        for score in &scores {
            debug!(
                row = score.row,
                string_count = score.string_count,
                numeric_or_date_count = score.numeric_or_date_count,
                score = score.score(),
                "Header candidate"
            );
        }

        let (header_row, fell_back) = match self.policy {
            HeaderPolicy::Threshold => {
                let width = table.num_columns();
                match scores.iter().find(|s| s.passes_threshold(width)) {
                    Some(score) => (score.row, false),
                    None => (0, true),
                }
            }
            HeaderPolicy::Scoring => {
                // max_by_key keeps the last maximum, so compare in reverse
                let best = scores
                    .iter()
                    .rev()
                    .max_by_key(|s| s.score())
                    .map_or(0, |s| s.row);
                (best, false)
            }
        };

        if fell_back {
            warn!(
                scanned = scores.len(),
                "No header-like row found, using the first row"
            );
        }
        info!(policy = %self.policy, header_row, "Detected header row");

        HeaderDetection {
            header_row,
            scores,
            fell_back,
        }
    }
}

/// Count string and numeric/date cells in one candidate row
fn score_row(row: usize, cells: &[Cell]) -> RowScore {
    RowScore {
        row,
        string_count: cells.iter().filter(|c| c.is_text()).count(),
        numeric_or_date_count: cells.iter().filter(|c| c.is_numeric_or_date()).count(),
    }
}

/// Remove rows and columns made only of empty cells
///
/// Fails with [`Error::EmptyTable`] when nothing remains.
pub fn clean_table(table: RawTable) -> Result<RawTable> {
    let width = table.num_columns();
    let rows: Vec<Vec<Cell>> = table
        .into_rows()
        .into_iter()
        .filter(|row| !row.iter().all(Cell::is_empty))
        .collect();

    let keep: Vec<bool> = (0..width)
        .map(|col| rows.iter().any(|row| !row[col].is_empty()))
        .collect();

    let rows: Vec<Vec<Cell>> = rows
        .into_iter()
        .map(|row| {
            row.into_iter()
                .zip(&keep)
                .filter_map(|(cell, keep)| keep.then_some(cell))
                .collect()
        })
        .collect();

    let cleaned = RawTable::new(rows);
    if cleaned.is_empty() {
        return Err(Error::EmptyTable);
    }
    Ok(cleaned)
}

/// Promote `header_row` to column names, keeping only the rows below it
fn apply_header(table: RawTable, header_row: usize) -> HeaderedTable {
    let mut rows = table.into_rows();
    let data = rows.split_off(header_row + 1);
    let header = rows.pop().unwrap_or_default();

    let columns = header
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let raw = cell.as_text().unwrap_or_else(|| format!("column_{i}"));
            normalize_column_name(&raw)
        })
        .collect();

    HeaderedTable::new(columns, data)
}

/// Normalize a header cell into a column name
///
/// Trims, lowercases, turns spaces into underscores, collapses `__` into `_`
/// in a single left-to-right pass and removes parentheses. Runs of three or
/// more spaces keep a residual double underscore.
pub fn normalize_column_name(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .replace(' ', "_")
        .replace("__", "_")
        .replace(['(', ')'], "")
}

/// Render the first rows of a table for debug logging
fn preview(rows: &[Vec<Cell>]) -> String {
    rows.iter()
        .take(PREVIEW_ROWS)
        .enumerate()
        .map(|(i, row)| {
            let cells: Vec<String> = row.iter().map(ToString::to_string).collect();
            format!("{i:>3} | {}", cells.join(" | "))
        })
        .collect::<Vec<_>>()
        .join("\n")
}
