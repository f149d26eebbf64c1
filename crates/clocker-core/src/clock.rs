//! Time source abstraction.

use chrono::{DateTime, Local};

/// Source of the instants recorded in a timestamp log.
///
/// Production code uses [`SystemClock`]; tests supply fixed or stepping
/// clocks so rendered output is reproducible.
pub trait Clock {
    /// Returns the current instant in the host's local timezone.
    fn now(&self) -> DateTime<Local>;
}

/// Reads the host wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}
