//! Read/write the JSON run summary.
//!
//! The summary mirrors what the terminal shows, for scripts that want the
//! numbers without scraping text. Schema: `report::RunSummary`.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::error::PipelineError;
use crate::report::RunSummary;

/// Write the run summary as pretty-printed JSON.
pub fn write_summary_json(path: &Path, summary: &RunSummary) -> Result<(), PipelineError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| PipelineError::io(parent, e))?;
    }
    let file = File::create(path).map_err(|e| PipelineError::io(path, e))?;
    serde_json::to_writer_pretty(BufWriter::new(file), summary)
        .map_err(|e| PipelineError::io(path, std::io::Error::other(e)))
}
