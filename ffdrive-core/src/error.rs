// ============================================================================
// ffdrive-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Error types for the ffdrive-core library
//
// Every fallible operation in the crate returns `CoreResult<T>`. Parse misses
// in the probe parser are deliberately NOT errors; they yield field defaults.
//
// KEY COMPONENTS:
// - CoreError: the error enum, grouped into invalid input, tool invocation
//   failures, overlay batch failures and plumbing errors
// - CoreResult: result alias
// - Helper constructors for the common tool-failure shapes

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::timecode;

/// Errors produced by ffdrive-core.
#[derive(Error, Debug)]
pub enum CoreError {
    // ---- Invalid input ----
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Requested time {} is beyond the media duration {}", timecode::to_text(.requested.clone()), timecode::to_text(.duration.clone()))]
    OutOfRange {
        requested: Duration,
        duration: Duration,
    },

    // ---- Tool invocation ----
    #[error("Required external command '{0}' not found")]
    DependencyNotFound(String),

    #[error("Failed to start '{0}': {1}")]
    CommandStart(String, #[source] io::Error),

    #[error("Could not split command line: {0}")]
    CommandParse(String),

    #[error("ffmpeg exited with {}", describe_exit(.exit_code))]
    ToolFailed {
        exit_code: Option<i32>,
        diagnostics: String,
    },

    #[error("ffmpeg did not produce the expected output {}", .path.display())]
    MissingArtifact { path: PathBuf, diagnostics: String },

    #[error("ffmpeg invocation exceeded the time limit of {}s", .limit.as_secs())]
    Timeout { limit: Duration },

    // ---- Overlay batching ----
    #[error("Overlay batch {} of {total} failed: {source}", .batch + 1)]
    OverlayBatchFailed {
        batch: usize,
        total: usize,
        #[source]
        source: Box<CoreError>,
    },

    // ---- Plumbing ----
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Could not parse configuration file: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

impl CoreError {
    /// Returns the captured tool diagnostics carried by this error, if any.
    ///
    /// Batch failures delegate to the batch that originated them.
    pub fn diagnostics(&self) -> Option<&str> {
        match self {
            CoreError::ToolFailed { diagnostics, .. }
            | CoreError::MissingArtifact { diagnostics, .. } => Some(diagnostics),
            CoreError::OverlayBatchFailed { source, .. } => source.diagnostics(),
            _ => None,
        }
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "no status (terminated by signal)".to_string(),
    }
}

/// Result alias used throughout ffdrive-core.
pub type CoreResult<T> = Result<T, CoreError>;

/// Builds a `ToolFailed` error from an exit code and the captured diagnostics.
pub fn command_failed_error(exit_code: Option<i32>, diagnostics: impl Into<String>) -> CoreError {
    CoreError::ToolFailed {
        exit_code,
        diagnostics: diagnostics.into(),
    }
}

/// Maps a spawn failure onto `DependencyNotFound` or `CommandStart`.
pub fn command_start_error(cmd_name: &str, err: io::Error) -> CoreError {
    if err.kind() == io::ErrorKind::NotFound {
        CoreError::DependencyNotFound(cmd_name.to_string())
    } else {
        CoreError::CommandStart(cmd_name.to_string(), err)
    }
}
