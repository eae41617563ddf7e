//! Configuration types for ingestion runs
//!
//! Every section is optional in YAML; missing fields take the defaults the
//! pipeline uses when no file is given.

use crate::decode::DecoderConfig;
use crate::error::{Error, Result};
use crate::header::{HeaderLocator, HeaderPolicy, DEFAULT_SCAN_ROWS};
use crate::output::{OutputFormat, ParquetWriterConfig};
use crate::schema::{TypeInferencer, DEFAULT_DATE_FORMAT, DEFAULT_PROMOTION_RATIO};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete ingestion configuration loaded from YAML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Header detection settings
    pub header: HeaderConfig,

    /// Type inference settings
    pub inference: InferenceConfig,

    /// Input decoding settings
    pub decode: DecoderConfig,

    /// Output naming and format
    pub output: OutputConfig,
}

impl IngestConfig {
    /// Load and validate a config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read config {}: {e}", path.display()))
        })?;
        Self::from_yaml_str(&content)
    }

    /// Parse and validate YAML text
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.header.scan_rows == 0 {
            return Err(Error::config("header.scan_rows must be at least 1"));
        }

        let ratio = self.inference.promotion_ratio;
        if !(ratio > 0.0 && ratio <= 1.0) {
            return Err(Error::config(format!(
                "inference.promotion_ratio must be in (0, 1], got {ratio}"
            )));
        }

        if self.inference.date_format.trim().is_empty() {
            return Err(Error::config("inference.date_format must not be empty"));
        }

        if self.output.row_group_size == 0 {
            return Err(Error::config("output.row_group_size must be at least 1"));
        }

        if !self.decode.csv_delimiter.is_ascii() {
            return Err(Error::config(format!(
                "decode.csv_delimiter must be ASCII, got {:?}",
                self.decode.csv_delimiter
            )));
        }

        Ok(())
    }
}

// ============================================================================
// Sections
// ============================================================================

/// Header detection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderConfig {
    /// Selection policy (scoring or threshold)
    pub policy: HeaderPolicy,

    /// Leading rows considered as header candidates
    pub scan_rows: usize,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            policy: HeaderPolicy::default(),
            scan_rows: DEFAULT_SCAN_ROWS,
        }
    }
}

impl HeaderConfig {
    /// Build the locator for these settings
    pub fn locator(&self) -> HeaderLocator {
        HeaderLocator::new()
            .with_policy(self.policy)
            .with_scan_rows(self.scan_rows)
    }
}

/// Type inference settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Fraction of non-null cells that must parse for a column to be promoted
    pub promotion_ratio: f64,

    /// chrono format string for date text
    pub date_format: String,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            promotion_ratio: DEFAULT_PROMOTION_RATIO,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

impl InferenceConfig {
    /// Build the inferencer for these settings
    pub fn inferencer(&self) -> TypeInferencer {
        TypeInferencer::new()
            .with_promotion_ratio(self.promotion_ratio)
            .with_date_format(self.date_format.clone())
    }
}

/// Output naming and format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Destination URL or directory; required by commands that write
    pub destination: Option<String>,

    /// Key prefix for written objects
    pub prefix: String,

    /// Serialisation of the normalized table
    pub format: OutputFormat,

    /// Indent the manifest JSON
    pub pretty_manifest: bool,

    /// Snappy-compress Parquet output
    pub compress: bool,

    /// Parquet rows per row group
    pub row_group_size: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            destination: None,
            prefix: default_prefix(),
            format: OutputFormat::default(),
            pretty_manifest: false,
            compress: true,
            row_group_size: DEFAULT_ROW_GROUP_SIZE,
        }
    }
}

impl OutputConfig {
    /// Build the Parquet writer settings
    pub fn parquet_writer(&self) -> ParquetWriterConfig {
        let config = ParquetWriterConfig::new().with_row_group_size(self.row_group_size);
        if self.compress {
            config
        } else {
            config.uncompressed()
        }
    }
}

const DEFAULT_ROW_GROUP_SIZE: usize = 1024 * 1024;

fn default_prefix() -> String {
    "processed".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_empty_config() {
        let config = IngestConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, IngestConfig::default());
        assert_eq!(config.header.scan_rows, 10);
        assert_eq!(config.inference.promotion_ratio, 0.5);
        assert_eq!(config.inference.date_format, "%Y-%m-%d");
        assert_eq!(config.output.prefix, "processed");
        assert_eq!(config.output.format, OutputFormat::Csv);
        assert_eq!(config.output.parquet_writer(), ParquetWriterConfig::default());
    }

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
header:
  policy: threshold
  scan_rows: 5
inference:
  promotion_ratio: 0.8
  date_format: "%d/%m/%Y"
decode:
  csv_delimiter: ";"
  sheet: "Deals"
output:
  destination: "s3://keye-output-files"
  prefix: "normalized"
  format: parquet
  pretty_manifest: true
  compress: false
  row_group_size: 5000
"#;

        let config = IngestConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.header.policy, HeaderPolicy::Threshold);
        assert_eq!(config.header.scan_rows, 5);
        assert_eq!(config.inference.promotion_ratio, 0.8);
        assert_eq!(config.inference.date_format, "%d/%m/%Y");
        assert_eq!(config.decode.csv_delimiter, ';');
        assert_eq!(config.decode.sheet.as_deref(), Some("Deals"));
        assert_eq!(
            config.output.destination.as_deref(),
            Some("s3://keye-output-files")
        );
        assert_eq!(config.output.prefix, "normalized");
        assert_eq!(config.output.format, OutputFormat::Parquet);
        assert!(config.output.pretty_manifest);
        assert_eq!(
            config.output.parquet_writer(),
            ParquetWriterConfig::new()
                .with_row_group_size(5000)
                .uncompressed()
        );
        assert_eq!(config.header.locator().policy(), HeaderPolicy::Threshold);
    }

    #[test]
    fn test_partial_section_keeps_defaults() {
        let config = IngestConfig::from_yaml_str("header:\n  policy: threshold\n").unwrap();
        assert_eq!(config.header.scan_rows, DEFAULT_SCAN_ROWS);
        assert_eq!(config.inference, InferenceConfig::default());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let cases = [
            "header:\n  scan_rows: 0\n",
            "inference:\n  promotion_ratio: 0\n",
            "inference:\n  promotion_ratio: 1.5\n",
            "inference:\n  date_format: \"  \"\n",
            "decode:\n  csv_delimiter: \"é\"\n",
            "output:\n  row_group_size: 0\n",
        ];

        for yaml in cases {
            let err = IngestConfig::from_yaml_str(yaml).unwrap_err();
            assert!(matches!(err, Error::Config { .. }), "{yaml}: {err}");
        }
    }

    #[test]
    fn test_unknown_policy_is_parse_error() {
        let err = IngestConfig::from_yaml_str("header:\n  policy: magic\n").unwrap_err();
        assert!(matches!(err, Error::YamlParse(_)));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ingest.yaml");
        std::fs::write(&path, "output:\n  format: parquet\n").unwrap();

        let config = IngestConfig::from_file(&path).unwrap();
        assert_eq!(config.output.format, OutputFormat::Parquet);

        let missing = IngestConfig::from_file(dir.path().join("missing.yaml"));
        assert!(matches!(missing, Err(Error::Config { .. })));
    }
}
