//! Destinations for the flushed timestamp log.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};

/// How an output file is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Append to an existing file.
    Append,
    /// Create the file, truncating any previous contents.
    Overwrite,
}

/// Opens `path` for writing the flushed log.
///
/// Append mode requires the file to exist already.
pub fn open_file(path: &Path, mode: OpenMode) -> io::Result<File> {
    match mode {
        OpenMode::Append => OpenOptions::new().append(true).open(path),
        OpenMode::Overwrite => File::create(path),
    }
}

/// Resolves the sink for a run: the named file, or standard output when no
/// file was given.
pub fn open(path: Option<&Path>, mode: OpenMode) -> Result<Box<dyn Write + Send>> {
    let Some(path) = path else {
        tracing::debug!("writing log to stdout");
        return Ok(Box::new(io::stdout()));
    };

    let file = open_file(path, mode)
        .with_context(|| format!("failed to open {}", path.display()))?;
    tracing::debug!(path = %path.display(), ?mode, "writing log to file");
    Ok(Box::new(file))
}
