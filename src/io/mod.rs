//! Input/output helpers.
//!
//! - raw CSV ingest + cleaning (`ingest`)
//! - panel, per-series and report CSV exports (`export`)
//! - JSON run summary (`summary`)

pub mod export;
pub mod ingest;
pub mod summary;

pub use export::*;
pub use ingest::*;
pub use summary::*;
