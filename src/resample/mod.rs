//! Month-end resampling.
//!
//! Responsibilities:
//!
//! - month-end calendar arithmetic (`calendar`)
//! - native frequency inference from date spacing (`frequency`)
//! - converting a daily/monthly/quarterly series to month-end (`resampler`)

pub mod calendar;
pub mod frequency;
pub mod resampler;

pub use calendar::*;
pub use frequency::*;
pub use resampler::*;
