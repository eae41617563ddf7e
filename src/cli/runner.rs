//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands};
use crate::config::IngestConfig;
use crate::engine::IngestPipeline;
use crate::error::{Error, Result, ResultExt};
use crate::event::StorageEvent;
use crate::header::HeaderPolicy;
use crate::output::{ObjectRef, OutputFormat, Storage};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tracing::debug;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Process {
                input,
                output,
                policy,
                format,
                prefix,
            } => {
                let value = self
                    .process(
                        input,
                        output.as_deref(),
                        *policy,
                        *format,
                        prefix.as_deref(),
                    )
                    .await?;
                print_json(&value);
                Ok(())
            }
            Commands::Inspect { input, policy } => {
                let value = self.inspect(input, *policy).await?;
                print_json(&value);
                Ok(())
            }
            Commands::Event { event, output } => {
                let value = self.event(event, output.as_deref()).await?;
                print_json(&value);
                Ok(())
            }
        }
    }

    /// Load the config file, or defaults when none was given
    fn load_config(&self) -> Result<IngestConfig> {
        match &self.cli.config {
            Some(path) => IngestConfig::from_file(path),
            None => Ok(IngestConfig::default()),
        }
    }

    /// Normalize one file and return the receipt as JSON
    pub async fn process(
        &self,
        input: &str,
        output: Option<&str>,
        policy: Option<HeaderPolicy>,
        format: Option<OutputFormat>,
        prefix: Option<&str>,
    ) -> Result<Value> {
        let mut config = self.load_config()?;
        if let Some(policy) = policy {
            config.header.policy = policy;
        }
        if let Some(format) = format {
            config.output.format = format;
        }
        if let Some(prefix) = prefix {
            config.output.prefix = prefix.to_string();
        }

        let pipeline = IngestPipeline::from_config(&config)?;
        let object = ObjectRef::parse(input)?;
        let source = Storage::parse(&object.root)?;

        let destination = output
            .map(String::from)
            .or_else(|| config.output.destination.clone())
            .unwrap_or_else(|| object.root.clone());
        let dest = Storage::parse(&destination)?;
        debug!(%input, %destination, "Resolved storage");

        let receipt = pipeline.run(&source, &object.key, &dest).await?;
        Ok(serde_json::to_value(receipt)?)
    }

    /// Run detection and inference on one file and describe the result
    pub async fn inspect(&self, input: &str, policy: Option<HeaderPolicy>) -> Result<Value> {
        let mut config = self.load_config()?;
        if let Some(policy) = policy {
            config.header.policy = policy;
        }

        let pipeline = IngestPipeline::from_config(&config)?;
        let object = ObjectRef::parse(input)?;
        let bytes = Storage::parse(&object.root)?.get(&object.key).await?;

        let raw = pipeline.decode(&object.key, &bytes)?;
        let processed = pipeline.process(raw)?;
        let detection = &processed.detection;

        let candidates: Vec<Value> = detection
            .scores
            .iter()
            .map(|s| {
                json!({
                    "row": s.row,
                    "string_count": s.string_count,
                    "numeric_or_date_count": s.numeric_or_date_count,
                    "score": s.score(),
                })
            })
            .collect();

        let columns: Vec<Value> = processed
            .table
            .columns()
            .iter()
            .map(|c| {
                json!({
                    "name": c.name,
                    "type": c.column_type,
                    "nulls": c.null_count(),
                })
            })
            .collect();

        Ok(json!({
            "input": input,
            "policy": config.header.policy,
            "header_row": detection.header_row,
            "fell_back": detection.fell_back,
            "candidates": candidates,
            "rows": processed.table.num_rows(),
            "columns": columns,
        }))
    }

    /// Replay an event file against its S3 bucket
    pub async fn event(&self, event_path: &Path, output: Option<&str>) -> Result<Value> {
        let config = self.load_config()?;
        let pipeline = IngestPipeline::from_config(&config)?;

        let content = fs::read_to_string(event_path)
            .with_context(|| format!("Failed to read event {}", event_path.display()))?;
        let event = StorageEvent::from_json(&content)?;

        let destination = output
            .map(String::from)
            .or_else(|| config.output.destination.clone())
            .ok_or_else(|| {
                Error::config("Output destination not specified (use -o or output.destination)")
            })?;
        let dest = Storage::parse(&destination)?;

        let receipt = pipeline.handle_event(&event, &dest).await?;
        Ok(serde_json::to_value(receipt)?)
    }
}

fn print_json(value: &Value) {
    println!(
        "{}",
        serde_json::to_string_pretty(value).unwrap_or_default()
    );
}
