//! Core logic for the clocker timestamping tool.
//!
//! This crate contains:
//! - The append-only timestamp log and its line format
//! - Go-style rendering of elapsed durations
//! - Classification of interactive input lines
//! - The clock seam used to obtain instants

mod clock;
mod duration;
pub mod input;
mod log;
mod options;

pub use clock::{Clock, SystemClock};
pub use duration::format_duration;
pub use input::{Input, classify};
pub use log::{OutOfRange, TimestampLog, TimestampRecord, format_record};
pub use options::FormatOptions;
