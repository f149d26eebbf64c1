//! Rendering options for timestamp lines.

use serde::{Deserialize, Serialize};

/// Controls which fields appear in a rendered timestamp line.
///
/// Annotations are always rendered when present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatOptions {
    /// Omit the absolute local date and time.
    #[serde(default)]
    pub suppress_instant: bool,
    /// Omit the elapsed time since the first record.
    #[serde(default)]
    pub suppress_delta: bool,
}
