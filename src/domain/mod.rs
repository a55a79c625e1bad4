//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - policy/frequency enums (`ResamplePolicy`, `Frequency`, `FrequencyHint`)
//! - series at each stage (`RawSeries`, `ProcessedSeries`, `AlignedSeries`)
//! - the merged output (`CommonDateIndex`, `MergedPanel`) and audit events
//! - the built-in series catalog (`catalog`)

pub mod catalog;
pub mod types;

pub use catalog::*;
pub use types::*;
