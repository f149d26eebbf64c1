//! Duration rendering in the compact `1h2m3.5s` notation.

use chrono::TimeDelta;

const NANOS_PER_MICRO: u128 = 1_000;
const NANOS_PER_MILLI: u128 = 1_000_000;
const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Formats an elapsed duration the way Go's `time.Duration` prints.
///
/// Durations under a second use the largest fitting unit of `ns`, `µs` or
/// `ms`. Longer durations print hours and minutes only when non-zero
/// (`1h0m0s`, `2m3.1s`, `1.234567s`). Fractional digits keep nanosecond
/// precision with trailing zeros trimmed, and a zero duration is `0s`.
pub fn format_duration(delta: TimeDelta) -> String {
    let total = i128::from(delta.num_seconds()) * 1_000_000_000 + i128::from(delta.subsec_nanos());
    let sign = if total < 0 { "-" } else { "" };
    let nanos = total.unsigned_abs();

    if nanos == 0 {
        return "0s".to_string();
    }

    if nanos < NANOS_PER_SEC {
        let body = if nanos < NANOS_PER_MICRO {
            format!("{nanos}ns")
        } else if nanos < NANOS_PER_MILLI {
            format!("{}µs", fixed_point(nanos, 3))
        } else {
            format!("{}ms", fixed_point(nanos, 6))
        };
        return format!("{sign}{body}");
    }

    let secs = nanos / NANOS_PER_SEC;
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = fixed_point(nanos % (60 * NANOS_PER_SEC), 9);

    if hours > 0 {
        format!("{sign}{hours}h{minutes}m{seconds}s")
    } else if minutes > 0 {
        format!("{sign}{minutes}m{seconds}s")
    } else {
        format!("{sign}{seconds}s")
    }
}

/// Renders `value / 10^digits` with the fraction's trailing zeros removed.
fn fixed_point(value: u128, digits: u32) -> String {
    let scale = 10u128.pow(digits);
    let whole = value / scale;
    let fraction = value % scale;
    if fraction == 0 {
        return whole.to_string();
    }
    let fraction = format!("{fraction:0width$}", width = digits as usize);
    format!("{whole}.{}", fraction.trim_end_matches('0'))
}
