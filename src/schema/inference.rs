//! Column type inference over headered tables

use super::types::{ColumnType, TypeManifest};
use crate::types::{Cell, HeaderedTable, TypedColumn, TypedTable, TypedValue};
use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, info, warn};

/// Fraction of non-null cells that must coerce for a type to be chosen
pub const DEFAULT_PROMOTION_RATIO: f64 = 0.5;

/// The only date format attempted
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Type inferencer with configuration options
#[derive(Debug, Clone)]
pub struct TypeInferencer {
    /// Minimum share of non-null cells that must coerce (inclusive)
    promotion_ratio: f64,
    /// strftime-style date format
    date_format: String,
}

impl Default for TypeInferencer {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeInferencer {
    /// Create an inferencer with a 50% threshold and `%Y-%m-%d` dates
    pub fn new() -> Self {
        Self {
            promotion_ratio: DEFAULT_PROMOTION_RATIO,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }

    /// Set the promotion ratio
    #[must_use]
    pub fn with_promotion_ratio(mut self, ratio: f64) -> Self {
        self.promotion_ratio = ratio;
        self
    }

    /// Set the date format
    #[must_use]
    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    /// Infer a type for every column and rewrite the table in those types
    ///
    /// Never fails: cells that do not coerce to their column's type become null.
    pub fn infer_and_cast(&self, table: HeaderedTable) -> (TypedTable, TypeManifest) {
        debug!(
            columns = table.num_columns(),
            rows = table.num_rows(),
            "Inferring column types"
        );

        let columns: Vec<TypedColumn> = table
            .into_columns()
            .into_iter()
            .map(|(name, cells)| self.infer_column(name, &cells))
            .collect();

        let manifest = columns
            .iter()
            .map(|c| (c.name.clone(), c.column_type))
            .collect();

        (TypedTable::new(columns), manifest)
    }

    /// Infer and cast a single column
    pub fn infer_column(&self, name: String, cells: &[Cell]) -> TypedColumn {
        let non_null = cells.iter().filter(|c| !c.is_empty()).count();

        let (column_type, values) = if non_null == 0 {
            (ColumnType::String, vec![TypedValue::Null; cells.len()])
        } else if let Some(values) = self.try_coerce(cells, non_null, coerce_number) {
            (ColumnType::Numeric, values)
        } else if let Some(values) =
            self.try_coerce(cells, non_null, |cell| self.coerce_date(cell))
        {
            (ColumnType::Date, values)
        } else {
            (ColumnType::String, cells.iter().map(cast_text).collect())
        };

        let dropped = values.iter().filter(|v| v.is_null()).count() - (cells.len() - non_null);
        if dropped > 0 {
            warn!(
                column = %name,
                %column_type,
                dropped,
                "Cells failed to coerce and were set to null"
            );
        }
        info!(column = %name, %column_type, non_null, "Inferred column type");

        TypedColumn {
            name,
            column_type,
            values,
        }
    }

    /// Coerce every cell, keeping the result only if enough cells succeeded
    fn try_coerce<F>(&self, cells: &[Cell], non_null: usize, coerce: F) -> Option<Vec<TypedValue>>
    where
        F: Fn(&Cell) -> Option<TypedValue>,
    {
        let values: Vec<TypedValue> = cells
            .iter()
            .map(|cell| coerce(cell).unwrap_or(TypedValue::Null))
            .collect();

        let parsed = values.iter().filter(|v| !v.is_null()).count();
        (parsed > 0 && parsed as f64 >= non_null as f64 * self.promotion_ratio).then_some(values)
    }

    /// Parse a cell as a date in the configured format
    fn coerce_date(&self, cell: &Cell) -> Option<TypedValue> {
        match cell {
            Cell::Date(d) => Some(TypedValue::Date(*d)),
            Cell::String(s) | Cell::NumericText { text: s, .. } => {
                parse_date(s.trim(), &self.date_format).map(TypedValue::Date)
            }
            _ => None,
        }
    }
}

/// Parse a cell as a finite number
fn coerce_number(cell: &Cell) -> Option<TypedValue> {
    let n = match cell {
        Cell::Number(n) | Cell::NumericText { value: n, .. } => *n,
        Cell::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(TypedValue::Number(n))
}

/// Parse text with a strict format, accepting date-only formats at midnight
fn parse_date(s: &str, format: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, format).ok().or_else(|| {
        NaiveDate::parse_from_str(s, format)
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
    })
}

/// Keep a cell's source text, mapping empties to null
fn cast_text(cell: &Cell) -> TypedValue {
    cell.as_text().map_or(TypedValue::Null, TypedValue::Text)
}
