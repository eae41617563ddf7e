//! Header detection module
//!
//! Finds the most plausible header row in a table whose header position is
//! unknown, promotes it to column names and discards everything above it.
//!
//! # Overview
//!
//! 1. Drop rows and columns that are entirely empty
//! 2. Score the first `scan_rows` rows as header candidates
//! 3. Promote the chosen row and normalize its cells into column names

mod locator;
mod types;

pub use locator::{clean_table, normalize_column_name, HeaderLocator};
pub use types::{HeaderDetection, HeaderPolicy, RowScore, DEFAULT_SCAN_ROWS};
