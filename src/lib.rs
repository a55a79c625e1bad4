//! `macro-panel` library crate.
//!
//! The binary (`panel`) is a thin wrapper around this library so that:
//!
//! - every pipeline stage is testable without spawning processes
//! - the stages can be driven from other front-ends (notebooks, services)
//!
//! Data flows `io::ingest` -> `resample` -> `process` -> `align` -> `report`
//! -> `io::export`, orchestrated by `app::pipeline`.

pub mod align;
pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod io;
pub mod observe;
pub mod process;
pub mod report;
pub mod resample;
