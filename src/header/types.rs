//! Header detection types

use serde::{Deserialize, Serialize};

/// Number of leading rows considered as header candidates
pub const DEFAULT_SCAN_ROWS: usize = 10;

/// How a header row is chosen among the candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderPolicy {
    /// Highest `string_count - numeric_or_date_count`, earliest row on ties
    #[default]
    Scoring,
    /// First row that is at least half strings and under half numbers/dates,
    /// falling back to the first row
    Threshold,
}

impl std::fmt::Display for HeaderPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HeaderPolicy::Scoring => write!(f, "scoring"),
            HeaderPolicy::Threshold => write!(f, "threshold"),
        }
    }
}

impl std::str::FromStr for HeaderPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "scoring" => Ok(HeaderPolicy::Scoring),
            "threshold" => Ok(HeaderPolicy::Threshold),
            other => Err(format!("unknown header policy: {other}")),
        }
    }
}

/// Cell counts for one header candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowScore {
    /// Position of the row in the cleaned table
    pub row: usize,
    /// Non-empty string cells
    pub string_count: usize,
    /// Numeric or date cells
    pub numeric_or_date_count: usize,
}

impl RowScore {
    /// `string_count - numeric_or_date_count`
    pub fn score(&self) -> i64 {
        self.string_count as i64 - self.numeric_or_date_count as i64
    }

    /// Whether this row passes the threshold policy for a table of `width` columns
    pub fn passes_threshold(&self, width: usize) -> bool {
        // string_count >= ceil(width / 2) and numeric_or_date_count < width / 2
        2 * self.string_count >= width && 2 * self.numeric_or_date_count < width
    }
}

/// Outcome of header detection on a cleaned table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderDetection {
    /// Header position in the cleaned table
    pub header_row: usize,
    /// Scores of every candidate that was examined
    pub scores: Vec<RowScore>,
    /// Whether no candidate qualified and the first row was used
    pub fell_back: bool,
}
