//! Conversion between durations and ffmpeg's `HH:MM:SS.mmm` time text.
//!
//! Durations are carried as [`std::time::Duration`] (nanosecond ticks). The
//! text form has millisecond resolution: anything finer is truncated, never
//! rounded, so `parse(&to_text(d))` returns `d` truncated to whole milliseconds.

use std::time::Duration;

const MILLIS_PER_HOUR: u128 = 3_600_000;
const MILLIS_PER_MINUTE: u128 = 60_000;
const MILLIS_PER_SECOND: u128 = 1_000;

/// Formats a duration as `HH:MM:SS.mmm`.
///
/// Hours are not clamped to a day and grow past two digits when needed.
///
/// ```
/// use ffdrive_core::timecode;
/// use std::time::Duration;
///
/// assert_eq!(timecode::to_text(Duration::from_millis(90_500)), "00:01:30.500");
/// assert_eq!(timecode::to_text(Duration::from_secs(100 * 3600)), "100:00:00.000");
/// ```
#[must_use]
pub fn to_text(duration: Duration) -> String {
    let total_millis = duration.as_millis();
    let hours = total_millis / MILLIS_PER_HOUR;
    let minutes = (total_millis % MILLIS_PER_HOUR) / MILLIS_PER_MINUTE;
    let seconds = (total_millis % MILLIS_PER_MINUTE) / MILLIS_PER_SECOND;
    let millis = total_millis % MILLIS_PER_SECOND;
    format!("{hours:02}:{minutes:02}:{seconds:02}.{millis:03}")
}

/// Formats a duration as decimal seconds with millisecond precision (`90.500`).
///
/// Used inside filter expressions such as `enable='between(t,1.000,2.500)'`,
/// where ffmpeg expects plain seconds rather than a clock time.
#[must_use]
pub fn to_seconds_text(duration: Duration) -> String {
    let total_millis = duration.as_millis();
    format!(
        "{}.{:03}",
        total_millis / MILLIS_PER_SECOND,
        total_millis % MILLIS_PER_SECOND
    )
}

/// Parses `H:MM:SS.fff` text back into a duration.
///
/// The text is split on `:` and `.` and must yield exactly four numeric
/// components. The last component is a decimal fraction of a second: `5`,
/// `50` and `500` all mean 500 ms, and digits past the third are dropped.
#[must_use]
pub fn parse(text: &str) -> Option<Duration> {
    let pieces: Vec<&str> = text.trim().split([':', '.']).collect();
    if pieces.len() != 4 {
        return None;
    }

    let hours = parse_component(pieces[0])?;
    let minutes = parse_component(pieces[1])?;
    let seconds = parse_component(pieces[2])?;
    let millis = parse_fraction_millis(pieces[3])?;

    let total_secs = hours
        .checked_mul(3600)?
        .checked_add(minutes.checked_mul(60)?)?
        .checked_add(seconds)?;
    Some(Duration::from_secs(total_secs) + Duration::from_millis(millis))
}

/// Drops any sub-millisecond remainder.
#[must_use]
pub fn truncate_to_millis(duration: Duration) -> Duration {
    Duration::new(duration.as_secs(), duration.subsec_millis() * 1_000_000)
}

fn parse_component(piece: &str) -> Option<u64> {
    if piece.is_empty() || !piece.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    piece.parse().ok()
}

fn parse_fraction_millis(piece: &str) -> Option<u64> {
    if piece.is_empty() || !piece.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let digits: String = piece.chars().chain("000".chars()).take(3).collect();
    digits.parse().ok()
}
