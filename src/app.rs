//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - installs the log subscriber
//! - resolves the pipeline configuration
//! - runs the pipeline and prints the summary

use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::cli::{CatalogArgs, Command, InspectArgs, RunArgs};
use crate::domain::{AlignmentRules, PipelineConfig, SeriesConfig, builtin_catalog, load_catalog};
use crate::error::AppError;
use crate::io::{LoadOptions, load_series};
use crate::observe::TracingObserver;
use crate::report::{format_catalog, format_inspection, format_run_summary};

pub mod pipeline;

/// Entry point for the `panel` binary.
pub fn run() -> Result<(), AppError> {
    // A missing .env file is fine.
    dotenvy::dotenv().ok();

    // We want `panel` and `panel --parallel` to behave like `panel run ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Command::Run(args) => handle_run(&args),
        Command::Inspect(args) => handle_inspect(&args),
        Command::Catalog(args) => handle_catalog(&args),
    }
}

/// Install the stderr log subscriber. `RUST_LOG` wins over `-v`/`-q`.
fn init_logging(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("macro_panel={default_level}")));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    // Only the first subscriber is installed.
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn handle_run(args: &RunArgs) -> Result<(), AppError> {
    let config = config_from_args(args)?;
    info!(
        raw_dir = %config.raw_dir.display(),
        series = config.catalog.len(),
        anchor = %config.alignment.anchor,
        parallel = config.parallel,
        "building panel"
    );

    let run = pipeline::run_pipeline(&config, &TracingObserver)?;

    for path in &run.written.series {
        info!(path = %path.display(), "wrote series");
    }
    info!(path = %run.written.panel.display(), rows = run.panel.rows(), columns = run.panel.width(), "wrote panel");
    info!(path = %run.written.report.display(), events = run.report.len(), "wrote missing-value report");
    if let Some(path) = &config.summary_json {
        info!(path = %path.display(), "wrote run summary");
    }

    println!("{}", format_run_summary(&run.summary));
    Ok(())
}

fn handle_inspect(args: &InspectArgs) -> Result<(), AppError> {
    let options = LoadOptions {
        date_column: args.date_col.clone(),
        value_column: args.value_col.clone(),
        frequency: args.freq,
    };
    let raw = load_series(&args.file, &options)?;
    println!("{}", format_inspection(&raw));
    Ok(())
}

fn handle_catalog(args: &CatalogArgs) -> Result<(), AppError> {
    let catalog = resolve_catalog(args.catalog.as_deref())?;
    print!("{}", format_catalog(&catalog));
    Ok(())
}

fn resolve_catalog(path: Option<&std::path::Path>) -> Result<Vec<SeriesConfig>, AppError> {
    match path {
        Some(path) => Ok(load_catalog(path)?),
        None => Ok(builtin_catalog()),
    }
}

/// Resolve directories, catalog and alignment rules from `panel run` flags.
pub fn config_from_args(args: &RunArgs) -> Result<PipelineConfig, AppError> {
    let data_dir = &args.data_dir;
    Ok(PipelineConfig {
        raw_dir: args.raw_dir.clone().unwrap_or_else(|| data_dir.join("raw")),
        processed_dir: args.processed_dir.clone().unwrap_or_else(|| data_dir.join("processed")),
        final_dir: args.final_dir.clone().unwrap_or_else(|| data_dir.join("final")),
        catalog: resolve_catalog(args.catalog.as_deref())?,
        alignment: AlignmentRules {
            anchor: args.anchor.clone(),
            inception_gap: args.inception_gap.clone(),
        },
        parallel: args.parallel,
        write_processed: !args.no_processed,
        summary_json: args.summary_json.clone(),
    })
}

/// Rewrite argv so `panel` defaults to `panel run`.
///
/// Rules:
/// - `panel`                      -> `panel run`
/// - `panel --parallel ...`       -> `panel run --parallel ...`
/// - `panel --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("run".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "run".to_string());
    }
    argv
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use crate::domain::AnchorRule;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_runs_the_pipeline() {
        assert_eq!(rewrite_args(argv(&["panel"])), argv(&["panel", "run"]));
        assert_eq!(
            rewrite_args(argv(&["panel", "--parallel"])),
            argv(&["panel", "run", "--parallel"])
        );
    }

    #[test]
    fn subcommands_and_help_are_left_alone() {
        assert_eq!(rewrite_args(argv(&["panel", "--help"])), argv(&["panel", "--help"]));
        assert_eq!(
            rewrite_args(argv(&["panel", "inspect", "x.csv"])),
            argv(&["panel", "inspect", "x.csv"])
        );
    }

    fn run_args(extra: &[&str]) -> RunArgs {
        let mut full = vec!["panel", "run", "--data-dir", "base"];
        full.extend_from_slice(extra);
        match crate::cli::Cli::parse_from(full).command {
            Command::Run(args) => args,
            other => panic!("expected run, got {other:?}"),
        }
    }

    #[test]
    fn directories_default_under_data_dir() {
        let config = config_from_args(&run_args(&[])).unwrap();
        assert_eq!(config.raw_dir, PathBuf::from("base/raw"));
        assert_eq!(config.processed_dir, PathBuf::from("base/processed"));
        assert_eq!(config.final_dir, PathBuf::from("base/final"));
        assert!(config.write_processed);
        assert_eq!(config.alignment, AlignmentRules::default());
    }

    #[test]
    fn explicit_flags_override_defaults() {
        let config = config_from_args(&run_args(&[
            "--final-dir",
            "out",
            "--anchor",
            "latest-start",
            "--no-processed",
        ]))
        .unwrap();
        assert_eq!(config.final_dir, PathBuf::from("out"));
        assert_eq!(config.raw_dir, PathBuf::from("base/raw"));
        assert_eq!(config.alignment.anchor, AnchorRule::LatestStart);
        assert!(!config.write_processed);
    }

    #[test]
    fn custom_catalog_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.csv");
        std::fs::write(&path, "file,column,policy\ngold.csv,gold_price_usd,last\n").unwrap();

        let config = config_from_args(&run_args(&["--catalog", path.to_str().unwrap()])).unwrap();
        assert_eq!(config.catalog, vec![SeriesConfig::new("gold.csv", "gold_price_usd", "last")]);

        let err = config_from_args(&run_args(&["--catalog", "does/not/exist.csv"])).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
