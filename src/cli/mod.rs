//! Command-line parsing for the macro panel builder.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the pipeline code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{AnchorRule, DEFAULT_ANCHOR_COLUMN, DEFAULT_INCEPTION_GAP_COLUMN, FrequencyHint};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "panel", version, about = "Monthly macro-economic panel builder")]
pub struct Cli {
    /// More log output (debug level).
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only warnings and errors on stderr.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build the merged monthly panel from the raw files.
    Run(RunArgs),
    /// Load one raw file and show what the loader makes of it.
    Inspect(InspectArgs),
    /// Print the series catalog.
    Catalog(CatalogArgs),
}

/// Options for a full pipeline run.
#[derive(Debug, Args, Clone)]
pub struct RunArgs {
    /// Root data directory (holds `raw/`, `processed/` and `final/`).
    #[arg(long, env = "MACRO_PANEL_DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// Raw input directory [default: <data-dir>/raw].
    #[arg(long)]
    pub raw_dir: Option<PathBuf>,

    /// Per-series output directory [default: <data-dir>/processed].
    #[arg(long)]
    pub processed_dir: Option<PathBuf>,

    /// Merged output directory [default: <data-dir>/final].
    #[arg(long)]
    pub final_dir: Option<PathBuf>,

    /// Catalog CSV (`file,column,policy`) replacing the built-in table.
    #[arg(long, env = "MACRO_PANEL_CATALOG", value_name = "CSV")]
    pub catalog: Option<PathBuf>,

    /// Column that anchors the start of the range, or `latest-start`.
    #[arg(long, default_value = DEFAULT_ANCHOR_COLUMN)]
    pub anchor: AnchorRule,

    /// Column allowed to be absent before its first observation (repeatable).
    #[arg(long = "inception-gap", value_name = "COLUMN", default_values_t = [DEFAULT_INCEPTION_GAP_COLUMN.to_string()])]
    pub inception_gap: Vec<String>,

    /// Process series on the rayon thread pool.
    #[arg(long)]
    pub parallel: bool,

    /// Skip the per-series CSV files.
    #[arg(long)]
    pub no_processed: bool,

    /// Also write a JSON run summary.
    #[arg(long, value_name = "JSON")]
    pub summary_json: Option<PathBuf>,
}

/// Options for inspecting a single raw file.
#[derive(Debug, Args, Clone)]
pub struct InspectArgs {
    /// Raw CSV file.
    pub file: PathBuf,

    /// Date column name [default: `date`, else the first column].
    #[arg(long)]
    pub date_col: Option<String>,

    /// Value column name [default: first non-date column].
    #[arg(long)]
    pub value_col: Option<String>,

    /// Frequency hint: infer, D, M or Q.
    #[arg(long, default_value = "infer")]
    pub freq: FrequencyHint,
}

/// Options for printing the catalog.
#[derive(Debug, Args, Clone)]
pub struct CatalogArgs {
    /// Catalog CSV to show instead of the built-in table.
    #[arg(long, env = "MACRO_PANEL_CATALOG", value_name = "CSV")]
    pub catalog: Option<PathBuf>,
}
