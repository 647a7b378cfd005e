// ============================================================================
// ffdrive-core/src/probe.rs
// ============================================================================
//
// PROBE PARSER: Metadata extraction from ffmpeg diagnostic text
//
// ffmpeg prints a human-readable description of its inputs on stderr. This
// module pulls typed fields out of that text with one named extraction
// function per field. Parsing is total: a field whose pattern does not match
// takes its documented default instead of failing the whole probe.
//
// Every search takes the FIRST match in the text. Sources with several audio
// or video streams only ever surface the first stream's fields.

use std::time::Duration;

use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::geometry::FrameSize;
use crate::timecode;

static DURATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[Dd]uration:\s*([\d:.]*)").expect("valid duration pattern"));
static BITRATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[Bb]itrate:\s*([\d.]*)").expect("valid bitrate pattern"));
static AUDIO_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[Aa]udio:(.*)").expect("valid audio pattern"));
static VIDEO_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[Vv]ideo:(.*)").expect("valid video pattern"));
static FPS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+(?:\.\d+)?)\s*fps").expect("valid fps pattern"));
static DIMENSIONS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{2,4})x(\d{2,4})").expect("valid dimensions pattern"));
static CREATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"creation_time(.*)").expect("valid creation_time pattern"));
static TIMESTAMP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{4}-\d{2}-\d{2})[ T](\d{2}:\d{2}:\d{2})").expect("valid timestamp pattern")
});

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Metadata extracted from one block of diagnostic text.
///
/// Every field is best-effort; see the extraction functions for defaults.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbeResult {
    pub duration: Duration,
    /// Bit rate in kb/s from the first `bitrate:` label.
    pub audio_bitrate_kbps: f64,
    pub audio_format: String,
    pub video_format: String,
    pub frame_rate: f64,
    pub dimensions: FrameSize,
    pub creation_time: NaiveDateTime,
}

impl Default for ProbeResult {
    fn default() -> Self {
        Self {
            duration: Duration::ZERO,
            audio_bitrate_kbps: 0.0,
            audio_format: String::new(),
            video_format: String::new(),
            frame_rate: 0.0,
            dimensions: FrameSize::default(),
            creation_time: zero_timestamp(),
        }
    }
}

/// The timestamp reported when no creation time could be parsed (Unix epoch).
#[must_use]
pub fn zero_timestamp() -> NaiveDateTime {
    NaiveDateTime::default()
}

/// Parses a block of diagnostic text. Never fails.
#[must_use]
pub fn parse(diagnostics: &str) -> ProbeResult {
    let video_format = extract_video_format(diagnostics);
    let frame_rate = extract_frame_rate(&video_format);

    ProbeResult {
        duration: extract_duration(diagnostics),
        audio_bitrate_kbps: extract_bitrate(diagnostics),
        audio_format: extract_audio_format(diagnostics),
        frame_rate,
        video_format,
        dimensions: extract_dimensions(diagnostics),
        creation_time: extract_creation_time(diagnostics),
    }
}

/// `Duration: H:MM:SS.fff`, or zero when absent or malformed.
#[must_use]
pub fn extract_duration(diagnostics: &str) -> Duration {
    DURATION_RE
        .captures(diagnostics)
        .and_then(|caps| timecode::parse(&caps[1]))
        .unwrap_or(Duration::ZERO)
}

/// Numeric token after the first `bitrate:` label, or 0.0.
#[must_use]
pub fn extract_bitrate(diagnostics: &str) -> f64 {
    BITRATE_RE
        .captures(diagnostics)
        .and_then(|caps| caps[1].parse::<f64>().ok())
        .unwrap_or(0.0)
}

/// Remainder of the first line labelled `Audio:`, or an empty string.
#[must_use]
pub fn extract_audio_format(diagnostics: &str) -> String {
    capture_rest_of_line(&AUDIO_RE, diagnostics)
}

/// Remainder of the first line labelled `Video:`, or an empty string.
#[must_use]
pub fn extract_video_format(diagnostics: &str) -> String {
    capture_rest_of_line(&VIDEO_RE, diagnostics)
}

/// `<number> fps` inside the video format description, or 0.0.
#[must_use]
pub fn extract_frame_rate(video_format: &str) -> f64 {
    FPS_RE
        .captures(video_format)
        .and_then(|caps| caps[1].parse::<f64>().ok())
        .unwrap_or(0.0)
}

/// First `WxH` token with 2-4 digits per side anywhere in the text.
///
/// This is a heuristic and can pick up unrelated numeric pairs that happen
/// to precede the real frame size.
#[must_use]
pub fn extract_dimensions(diagnostics: &str) -> FrameSize {
    DIMENSIONS_RE
        .captures(diagnostics)
        .map(|caps| {
            FrameSize::new(
                caps[1].parse().unwrap_or(0),
                caps[2].parse().unwrap_or(0),
            )
        })
        .unwrap_or_default()
}

/// `YYYY-MM-DD HH:MM:SS` on the first `creation_time` line, or the zero timestamp.
///
/// ISO-8601 `T` separators are accepted; fractional seconds and zone suffixes
/// are ignored.
#[must_use]
pub fn extract_creation_time(diagnostics: &str) -> NaiveDateTime {
    CREATION_RE
        .captures(diagnostics)
        .and_then(|caps| {
            let span = caps.get(1)?.as_str();
            let stamp = TIMESTAMP_RE.captures(span)?;
            let text = format!("{} {}", &stamp[1], &stamp[2]);
            NaiveDateTime::parse_from_str(&text, TIMESTAMP_FORMAT).ok()
        })
        .unwrap_or_else(zero_timestamp)
}

fn capture_rest_of_line(pattern: &Regex, diagnostics: &str) -> String {
    pattern
        .captures(diagnostics)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}
