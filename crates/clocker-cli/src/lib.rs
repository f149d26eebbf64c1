//! Clocker CLI library.
//!
//! This crate provides the interactive loop and the command-line glue
//! around the core timestamp log.

mod cli;
mod config;
pub mod session;
pub mod sink;

pub use cli::Cli;
pub use config::Config;
pub use session::{Session, SessionError, Termination};
