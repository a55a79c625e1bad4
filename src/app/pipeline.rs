//! The end-to-end panel build shared by the CLI subcommands.
//!
//! load -> resample -> align -> merge -> export
//!
//! Per-series failures are collected and skipped. A missing anchor, an empty
//! range or a misaligned column stops the run before anything is written.

use crate::align::{Alignment, align_all};
use crate::domain::{MergedPanel, PipelineConfig};
use crate::error::PipelineError;
use crate::io::{WrittenFiles, write_outputs, write_summary_json};
use crate::observe::PipelineObserver;
use crate::process::{ProcessingOutcome, process_all};
use crate::report::{MissingValueReport, RunSummary, build_summary, merge_panel};

/// All computed outputs of a single `panel run`.
#[derive(Debug)]
pub struct RunOutput {
    pub outcome: ProcessingOutcome,
    pub alignment: Alignment,
    pub panel: MergedPanel,
    /// Processing events followed by alignment events.
    pub report: MissingValueReport,
    pub summary: RunSummary,
    pub written: WrittenFiles,
}

/// Execute the full pipeline and write its artifacts.
pub fn run_pipeline(config: &PipelineConfig, observer: &dyn PipelineObserver) -> Result<RunOutput, PipelineError> {
    let outcome = process_all(&config.raw_dir, &config.catalog, config.parallel, observer);

    let alignment = align_all(&outcome.processed, &config.alignment, observer)?;

    let mut report = outcome.report.clone();
    report.extend(alignment.events.iter().cloned());

    let panel = merge_panel(&alignment.index, &alignment.series)?;

    let processed_dir = config.write_processed.then_some(config.processed_dir.as_path());
    let written = write_outputs(processed_dir, &config.final_dir, &alignment.series, &panel, &report)?;

    let summary = build_summary(&alignment, &panel, &report, &outcome.failures);
    if let Some(path) = &config.summary_json {
        write_summary_json(path, &summary)?;
    }

    Ok(RunOutput {
        outcome,
        alignment,
        panel,
        report,
        summary,
        written,
    })
}
