//! Merging and reporting.
//!
//! - panel assembly with the alignment integrity check (`merge`)
//! - the missing-value audit trail and per-column stats (`missing`)
//! - the run summary shared by terminal output and JSON export (`summary`)
//! - terminal formatting (`format`)
//!
//! We keep formatting code in one place so the pipeline stages stay free of
//! presentation concerns.

pub mod format;
pub mod merge;
pub mod missing;
pub mod summary;

pub use format::*;
pub use merge::*;
pub use missing::*;
pub use summary::*;
