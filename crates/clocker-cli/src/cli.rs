//! Command-line argument definitions.

use std::path::PathBuf;

use clap::Parser;
use clocker_core::FormatOptions;

use crate::Config;
use crate::sink::OpenMode;

/// Interactive event timestamps.
///
/// Press enter to record a timestamp. Type text to annotate the latest
/// timestamp, or `<index> <word>` to annotate an earlier one. The full log
/// is written out on Ctrl-C or end of input.
#[derive(Debug, Parser)]
#[command(name = "clocker", version, about, long_about = None)]
pub struct Cli {
    /// Do not include the absolute timestamp in the output.
    #[arg(short = 'T', long)]
    pub no_timestamp: bool,

    /// Do not include the delta since the first timestamp.
    #[arg(short = 'D', long)]
    pub no_delta: bool,

    /// Overwrite FILE instead of appending to it.
    #[arg(short, long)]
    pub overwrite: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// File to write the log to. Defaults to standard output.
    pub file: Option<PathBuf>,
}

impl Cli {
    /// Combines flags with loaded configuration.
    ///
    /// Flags can only turn a field off; they never re-enable one the
    /// configuration suppressed.
    pub const fn format_options(&self, config: &Config) -> FormatOptions {
        FormatOptions {
            suppress_instant: self.no_timestamp || config.format.suppress_instant,
            suppress_delta: self.no_delta || config.format.suppress_delta,
        }
    }

    pub const fn open_mode(&self) -> OpenMode {
        if self.overwrite {
            OpenMode::Overwrite
        } else {
            OpenMode::Append
        }
    }
}
