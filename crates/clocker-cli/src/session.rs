//! The interactive loop that drives a timestamp log.
//!
//! A [`Session`] owns the log, the formatting options and the sink. [`run`]
//! feeds it lines from an async reader until end of input, a read failure,
//! or the interrupt future resolves, then flushes the log to the sink.

use std::borrow::Cow;
use std::future::Future;
use std::io::{self, Write};
use std::pin::pin;

use clocker_core::{Clock, FormatOptions, Input, TimestampLog, classify};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Annotation attached to the record taken when a session starts.
pub const STARTED: &str = "started";

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The input stream closed.
    EndOfInput,
    /// The interrupt future resolved.
    Interrupted,
}

/// Fatal errors from the interactive loop.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to read input: {0}")]
    Read(#[source] io::Error),

    #[error("failed to write feedback: {0}")]
    Echo(#[source] io::Error),

    #[error("failed to flush timestamp log: {0}")]
    Flush(#[source] io::Error),
}

/// A single run of the timestamp tool.
///
/// The sink is held until the first [`Session::flush`], which consumes it,
/// so the log reaches the sink at most once.
pub struct Session<S, C> {
    log: TimestampLog,
    options: FormatOptions,
    clock: C,
    sink: Option<S>,
}

impl<S: Write, C: Clock> Session<S, C> {
    pub const fn new(sink: S, options: FormatOptions, clock: C) -> Self {
        Self {
            log: TimestampLog::new(),
            options,
            clock,
            sink: Some(sink),
        }
    }

    pub const fn log(&self) -> &TimestampLog {
        &self.log
    }

    pub const fn is_flushed(&self) -> bool {
        self.sink.is_none()
    }

    /// Records the initial `started` timestamp and returns its rendering.
    pub fn start(&mut self) -> String {
        let index = self
            .log
            .append(self.clock.now(), vec![STARTED.to_string()]);
        self.render(index)
    }

    /// Applies one line of user input and returns the feedback line.
    pub fn handle(&mut self, line: &str) -> String {
        let result = match classify(line) {
            Input::Blank => Ok(self.log.append(self.clock.now(), Vec::new())),
            Input::Indexed { index, text } => self.log.annotate(index, text),
            Input::Free { text } => self.log.annotate_last(text),
        };

        match result {
            Ok(index) => self.render(index),
            Err(err) => {
                tracing::warn!(%err, "annotation rejected");
                format!("{}: {err}", err.index)
            }
        }
    }

    /// Writes the whole log to the sink and flushes it.
    ///
    /// Only the first call writes anything; later calls return `Ok(None)`.
    pub fn flush(&mut self) -> io::Result<Option<u64>> {
        let Some(mut sink) = self.sink.take() else {
            tracing::debug!("log already flushed");
            return Ok(None);
        };

        let written = self.log.serialize(&mut sink, self.options)?;
        sink.flush()?;
        tracing::info!(records = self.log.len(), bytes = written, "flushed timestamp log");
        Ok(Some(written))
    }

    fn render(&self, index: usize) -> String {
        self.log
            .format(index, self.options)
            .unwrap_or_else(|err| err.to_string())
    }
}

/// Runs the interactive loop until input ends or `interrupt` resolves.
///
/// Echoes one feedback line per input line to `echo`. Lines are decoded
/// lossily, so bytes that are not UTF-8 still become annotations. The log
/// is flushed to the session's sink before returning, including when
/// reading fails.
pub async fn run<R, E, S, C, F>(
    mut input: R,
    echo: &mut E,
    session: &mut Session<S, C>,
    interrupt: F,
) -> Result<Termination, SessionError>
where
    R: AsyncBufRead + Unpin,
    E: Write,
    S: Write,
    C: Clock,
    F: Future<Output = ()>,
{
    let mut interrupt = pin!(interrupt);
    let mut buf = Vec::new();

    let started = session.start();
    let outcome = match writeln!(echo, "{started}") {
        Err(err) => Err(SessionError::Echo(err)),
        Ok(()) => loop {
            tokio::select! {
                () = &mut interrupt => {
                    tracing::info!("interrupted");
                    break Ok(Termination::Interrupted);
                }
                read = input.read_until(b'\n', &mut buf) => match read {
                    Ok(0) => {
                        tracing::info!("end of input");
                        break Ok(Termination::EndOfInput);
                    }
                    Ok(_) => {
                        let feedback = session.handle(&decode_line(&buf));
                        buf.clear();
                        if let Err(err) = writeln!(echo, "{feedback}") {
                            break Err(SessionError::Echo(err));
                        }
                    }
                    Err(err) => break Err(SessionError::Read(err)),
                },
            }
        },
    };

    let flushed = session.flush().map_err(SessionError::Flush);
    match (outcome, flushed) {
        (Ok(termination), Ok(_)) => Ok(termination),
        (Ok(_), Err(err)) => Err(err),
        (Err(err), flushed) => {
            if let Err(flush_err) = flushed {
                tracing::error!(error = %flush_err, "flush after failure also failed");
            }
            Err(err)
        }
    }
}

/// Strips the line terminator and replaces invalid UTF-8.
fn decode_line(raw: &[u8]) -> Cow<'_, str> {
    let line = raw.strip_suffix(b"\n").unwrap_or(raw);
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    String::from_utf8_lossy(line)
}
