//! CLI commands and argument parsing

use crate::header::HeaderPolicy;
use crate::output::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Normalize uploaded CSV and Excel tables
#[derive(Parser, Debug)]
#[command(name = "sheet-ingest")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Normalize one file and write the table and its type manifest
    Process {
        /// Input file (local path or s3://, r2://, gs://, az:// URL)
        input: String,

        /// Output destination (local path or cloud URL), defaults to the
        /// configured destination or the input's directory
        #[arg(short, long)]
        output: Option<String>,

        /// Header selection policy (scoring, threshold)
        #[arg(long)]
        policy: Option<HeaderPolicy>,

        /// Output table format (csv, parquet)
        #[arg(long)]
        format: Option<OutputFormat>,

        /// Key prefix for written objects
        #[arg(long)]
        prefix: Option<String>,
    },

    /// Show header candidates and inferred types without writing anything
    Inspect {
        /// Input file (local path or cloud URL)
        input: String,

        /// Header selection policy (scoring, threshold)
        #[arg(long)]
        policy: Option<HeaderPolicy>,
    },

    /// Replay an object-created event from a JSON file
    Event {
        /// Event JSON file
        event: PathBuf,

        /// Output destination (local path or cloud URL)
        #[arg(short, long)]
        output: Option<String>,
    },
}
