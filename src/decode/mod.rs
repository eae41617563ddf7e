//! Input decoder module
//!
//! Supports: CSV, XLSX
//!
//! # Overview
//!
//! Decoders turn raw file bytes into a [`RawTable`](crate::types::RawTable)
//! without assuming anything about where the header is. Every cell is tagged
//! with its kind once, here.

mod decoders;
mod types;

pub use decoders::{decoder_for, CsvDecoder, XlsxDecoder};
pub use types::{DecoderConfig, DecoderFormat, TableDecoder};
