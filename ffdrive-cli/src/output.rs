// ============================================================================
// ffdrive-cli/src/output.rs
// ============================================================================
//
// TERMINAL OUTPUT: Styled results, JSON output and spinners
//
// Human-readable output goes to stdout with owo-colors styling. With `--json`
// each command prints exactly one JSON document to stdout instead, and no
// spinner is drawn.

use std::fmt::Display;
use std::time::Duration;

use ffdrive_core::{CoreError, MediaFile, format_bytes, timecode, utils};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use serde::Serialize;

use crate::error::CliResult;

/// Lines of tool diagnostics shown under an error.
const DIAGNOSTIC_TAIL_LINES: usize = 12;

pub fn print_heading(text: &str) {
    println!("{}", format!("===== {text} =====").bold().cyan());
}

/// Label in bright cyan, value as is.
pub fn print_info<T: Display>(label: &str, value: T) {
    println!("  {:<14} {}", format!("{label}:").bright_cyan(), value);
}

pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

pub fn print_warning(message: &str) {
    eprintln!("{} {}", "Warning:".yellow().bold(), message);
}

/// Prints an error and, for tool failures, the tail of what ffmpeg said.
pub fn print_error(error: &CoreError) {
    eprintln!("{} {}", "Error:".bold().bright_red(), error);
    if let Some(diagnostics) = error.diagnostics() {
        let tail = diagnostic_tail(diagnostics, DIAGNOSTIC_TAIL_LINES);
        if !tail.is_empty() {
            eprintln!("{}", "ffmpeg output:".dimmed());
            for line in tail {
                eprintln!("  {}", line.dimmed());
            }
        }
    }
}

/// Last `count` non-empty lines of `diagnostics`.
pub fn diagnostic_tail(diagnostics: &str, count: usize) -> Vec<&str> {
    let lines: Vec<&str> = diagnostics
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .collect();
    let start = lines.len().saturating_sub(count);
    lines[start..].to_vec()
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| CoreError::InvalidInput(format!("cannot encode JSON output: {e}")))?;
    println!("{text}");
    Ok(())
}

pub fn print_media(media: &MediaFile) {
    let info = &media.info;
    print_heading("Media");
    print_info("File", media.path.display());
    print_info("Size", format_bytes(utils::file_size(&media.path)));
    print_info("Duration", timecode::to_text(info.duration));
    print_info("Dimensions", info.dimensions);
    print_info("Frame rate", format!("{:.2} fps", info.frame_rate));
    print_info("Video", display_or_none(&info.video_format));
    print_info("Audio", display_or_none(&info.audio_format));
    print_info("Bitrate", format!("{} kb/s", info.audio_bitrate_kbps));
    print_info("Created", info.creation_time);
}

fn display_or_none(text: &str) -> &str {
    if text.is_empty() { "none" } else { text }
}

/// Spinner shown while ffmpeg runs. Hidden when `hidden` is set.
pub fn spinner(message: &str, hidden: bool) -> ProgressBar {
    if hidden {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.cyan} {msg} [{elapsed}]")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}
