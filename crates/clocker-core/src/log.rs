//! The append-only timestamp log and its line format.

use std::io::{self, Write};

use chrono::{DateTime, Local};
use thiserror::Error;

use crate::duration::format_duration;
use crate::options::FormatOptions;

/// Layout of the absolute instant in a rendered line.
const INSTANT_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// The requested record does not exist.
///
/// Carries the index after negative indices were resolved, so an empty log
/// reports `-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("index out of range: {index}")]
pub struct OutOfRange {
    pub index: i64,
}

/// One logged instant and the notes attached to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampRecord {
    instant: DateTime<Local>,
    annotations: Vec<String>,
}

impl TimestampRecord {
    /// When the record was taken. Never changes after creation.
    pub const fn instant(&self) -> DateTime<Local> {
        self.instant
    }

    /// Annotations in the order they were added.
    pub fn annotations(&self) -> &[String] {
        &self.annotations
    }
}

/// Ordered, append-only sequence of timestamp records.
///
/// Indices are assigned by creation order starting at zero and never
/// change. Record 0 is the reference instant for every delta.
#[derive(Debug, Clone, Default)]
pub struct TimestampLog {
    records: Vec<TimestampRecord>,
}

impl TimestampLog {
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TimestampRecord> {
        self.records.get(index)
    }

    pub fn records(&self) -> &[TimestampRecord] {
        &self.records
    }

    /// The instant of record 0, if any record exists.
    pub fn start(&self) -> Option<DateTime<Local>> {
        self.records.first().map(TimestampRecord::instant)
    }

    /// Appends a record and returns its index.
    pub fn append(&mut self, instant: DateTime<Local>, annotations: Vec<String>) -> usize {
        self.records.push(TimestampRecord {
            instant,
            annotations,
        });
        let index = self.records.len() - 1;
        tracing::debug!(index, %instant, "appended timestamp");
        index
    }

    /// Adds `text` to the annotations of the record at `index`.
    ///
    /// A negative `index` means the most recent record. Returns the index
    /// that was annotated. Fails without touching the log when the resolved
    /// index does not name a record.
    pub fn annotate(&mut self, index: i64, text: impl Into<String>) -> Result<usize, OutOfRange> {
        let resolved = if index < 0 {
            self.last_index()
        } else {
            index
        };

        let record = usize::try_from(resolved)
            .ok()
            .and_then(|i| self.records.get_mut(i).map(|record| (i, record)));
        let Some((position, record)) = record else {
            return Err(OutOfRange { index: resolved });
        };

        record.annotations.push(text.into());
        Ok(position)
    }

    /// Annotates the most recent record.
    pub fn annotate_last(&mut self, text: impl Into<String>) -> Result<usize, OutOfRange> {
        self.annotate(-1, text)
    }

    /// Renders the record at `index` relative to record 0.
    pub fn format(&self, index: usize, options: FormatOptions) -> Result<String, OutOfRange> {
        let (Some(record), Some(start)) = (self.records.get(index), self.start()) else {
            return Err(OutOfRange {
                index: i64::try_from(index).unwrap_or(i64::MAX),
            });
        };
        Ok(format_record(index, record, options, start))
    }

    /// Writes every record, one line each, to `sink`.
    ///
    /// Returns the number of bytes written. The first failed write aborts
    /// the dump; lines already written stay in the sink.
    pub fn serialize<W: Write>(&self, sink: &mut W, options: FormatOptions) -> io::Result<u64> {
        let Some(start) = self.start() else {
            return Ok(0);
        };

        let mut written = 0u64;
        for (index, record) in self.records.iter().enumerate() {
            let mut line = format_record(index, record, options, start);
            line.push('\n');
            sink.write_all(line.as_bytes())?;
            written += line.len() as u64;
        }
        Ok(written)
    }

    fn last_index(&self) -> i64 {
        i64::try_from(self.records.len()).map_or(i64::MAX, |len| len - 1)
    }
}

/// Renders one record as `<index>[: <instant>][ +<delta>][: <a1>; <a2>]`.
///
/// With the instant suppressed, the delta field takes the `: ` separator
/// instead of a bare space.
pub fn format_record(
    index: usize,
    record: &TimestampRecord,
    options: FormatOptions,
    start: DateTime<Local>,
) -> String {
    let mut line = index.to_string();

    if !options.suppress_instant {
        line.push_str(": ");
        line.push_str(&record.instant.format(INSTANT_FORMAT).to_string());
    }

    if !options.suppress_delta {
        line.push_str(if options.suppress_instant { ": +" } else { " +" });
        line.push_str(&format_duration(record.instant - start));
    }

    if !record.annotations.is_empty() {
        line.push_str(": ");
        line.push_str(&record.annotations.join("; "));
    }

    line
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{TimeDelta, TimeZone};
    use insta::assert_snapshot;

    fn new_year() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn sample_log() -> TimestampLog {
        let start = new_year();
        let mut log = TimestampLog::new();
        log.append(start, vec!["started".to_string()]);
        log.append(start + TimeDelta::microseconds(1_234_567), Vec::new());
        log.append(
            start + TimeDelta::seconds(123) + TimeDelta::milliseconds(100),
            vec!["lap".to_string()],
        );
        log
    }

    /// Writer that accepts a fixed number of writes and then fails.
    struct FailingWriter {
        remaining: usize,
        buf: Vec<u8>,
    }

    impl Write for FailingWriter {
        fn write(&mut self, data: &[u8]) -> io::Result<usize> {
            if self.remaining == 0 {
                return Err(io::Error::other("disk full"));
            }
            self.remaining -= 1;
            self.buf.extend_from_slice(data);
            Ok(data.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn append_returns_sequential_indices() {
        let mut log = TimestampLog::new();
        let indices: Vec<usize> = (0..5).map(|_| log.append(new_year(), Vec::new())).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4]);
        assert_eq!(log.len(), 5);
    }

    #[test]
    fn annotate_appends_to_target_only() {
        let mut log = sample_log();
        let before = log.records().to_vec();

        assert_eq!(log.annotate(0, "first").unwrap(), 0);
        assert_eq!(log.annotate(0, "second").unwrap(), 0);

        assert_eq!(log.get(0).unwrap().annotations(), ["started", "first", "second"]);
        assert_eq!(log.get(1).unwrap(), &before[1]);
        assert_eq!(log.get(2).unwrap(), &before[2]);
        assert_eq!(log.get(0).unwrap().instant(), before[0].instant());
    }

    #[test]
    fn negative_index_targets_last_record() {
        let mut log = sample_log();
        assert_eq!(log.annotate(-1, "a").unwrap(), 2);
        assert_eq!(log.annotate(-7, "b").unwrap(), 2);
        assert_eq!(log.annotate_last("c").unwrap(), 2);
        assert_eq!(log.get(2).unwrap().annotations(), ["lap", "a", "b", "c"]);
    }

    #[test]
    fn annotate_on_empty_log_is_out_of_range() {
        let mut log = TimestampLog::new();
        let err = log.annotate(-1, "nothing").unwrap_err();
        assert_eq!(err, OutOfRange { index: -1 });
        assert!(log.is_empty());
    }

    #[test]
    fn annotate_past_end_does_not_mutate() {
        let mut log = sample_log();
        let before = log.records().to_vec();

        let err = log.annotate(3, "late").unwrap_err();
        assert_eq!(err, OutOfRange { index: 3 });
        assert_eq!(err.to_string(), "index out of range: 3");
        assert_eq!(log.records(), before.as_slice());
    }

    #[test]
    fn format_full_line_at_start() {
        let mut log = TimestampLog::new();
        log.append(new_year(), Vec::new());
        assert_snapshot!(log.format(0, FormatOptions::default()).unwrap(), @"0: 2024-01-01 00:00:00.000000 +0s");
    }

    #[test]
    fn format_without_instant_moves_separator_to_delta() {
        let mut log = TimestampLog::new();
        log.append(new_year(), vec!["x".to_string()]);
        let options = FormatOptions {
            suppress_instant: true,
            suppress_delta: false,
        };
        assert_snapshot!(log.format(0, options).unwrap(), @"0: +0s: x");
    }

    #[test]
    fn format_without_delta() {
        let log = sample_log();
        let options = FormatOptions {
            suppress_instant: false,
            suppress_delta: true,
        };
        assert_snapshot!(log.format(1, options).unwrap(), @"1: 2024-01-01 00:00:01.234567");
    }

    #[test]
    fn format_with_everything_suppressed_keeps_annotations() {
        let log = sample_log();
        let options = FormatOptions {
            suppress_instant: true,
            suppress_delta: true,
        };
        assert_eq!(log.format(0, options).unwrap(), "0: started");
        assert_eq!(log.format(1, options).unwrap(), "1");
    }

    #[test]
    fn format_joins_annotations() {
        let mut log = sample_log();
        log.annotate(2, "fast").unwrap();
        assert_snapshot!(log.format(2, FormatOptions::default()).unwrap(), @"2: 2024-01-01 00:02:03.100000 +2m3.1s: lap; fast");
    }

    #[test]
    fn format_unknown_index_is_an_error() {
        let log = sample_log();
        assert_eq!(
            log.format(9, FormatOptions::default()),
            Err(OutOfRange { index: 9 })
        );
        assert!(TimestampLog::new().format(0, FormatOptions::default()).is_err());
    }

    #[test]
    fn serialize_writes_one_line_per_record() {
        let log = sample_log();
        let mut out = Vec::new();
        let written = log.serialize(&mut out, FormatOptions::default()).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "0: 2024-01-01 00:00:00.000000 +0s: started",
                "1: 2024-01-01 00:00:01.234567 +1.234567s",
                "2: 2024-01-01 00:02:03.100000 +2m3.1s: lap",
            ]
        );
        assert!(text.ends_with('\n'));
        let expected: usize = lines.iter().map(|line| line.len() + 1).sum();
        assert_eq!(written, expected as u64);
        assert_eq!(written, text.len() as u64);
    }

    #[test]
    fn serialize_is_repeatable() {
        let log = sample_log();
        let mut first = Vec::new();
        let mut second = Vec::new();
        log.serialize(&mut first, FormatOptions::default()).unwrap();
        log.serialize(&mut second, FormatOptions::default()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn serialize_stops_at_first_write_error() {
        let log = sample_log();
        let mut sink = FailingWriter {
            remaining: 1,
            buf: Vec::new(),
        };

        let err = log.serialize(&mut sink, FormatOptions::default()).unwrap_err();
        assert_eq!(err.to_string(), "disk full");
        assert_eq!(
            String::from_utf8(sink.buf).unwrap(),
            "0: 2024-01-01 00:00:00.000000 +0s: started\n"
        );
    }

    #[test]
    fn serialize_empty_log_writes_nothing() {
        let mut out = Vec::new();
        let written = TimestampLog::new()
            .serialize(&mut out, FormatOptions::default())
            .unwrap();
        assert_eq!(written, 0);
        assert!(out.is_empty());
    }
}
