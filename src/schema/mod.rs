//! Column type inference module
//!
//! Classifies every column of a headered table as numeric, date or string
//! and rewrites its cells in that type.
//!
//! # Features
//!
//! - **Numeric coercion**: numbers and numeric text, failures become null
//! - **Date coercion**: one fixed format (`%Y-%m-%d` by default), failures become null
//! - **Noise tolerance**: a type wins when at least half of the non-null cells coerce
//! - **Type manifest**: ordered column → type tag mapping, serialisable as JSON

mod inference;
mod types;

pub use inference::{TypeInferencer, DEFAULT_DATE_FORMAT, DEFAULT_PROMOTION_RATIO};
pub use types::{ColumnType, TypeManifest};

#[cfg(test)]
mod tests;
