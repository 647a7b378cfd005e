//! Subcommand implementations.
//!
//! Each module exposes a `run` function taking the shared [`Context`] and the
//! parsed arguments for that subcommand.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ffdrive_core::utils::replace_file;
use ffdrive_core::{CoreConfig, DiagnosticHistory, FfmpegInvoker};
use log::debug;
use serde_json::json;

use crate::error::CliResult;
use crate::output;

pub mod audio;
pub mod check;
pub mod command;
pub mod frame;
pub mod overlay;
pub mod probe;
pub mod segment;
pub mod transcode;
pub mod watermark;

/// State shared by every subcommand.
pub struct Context {
    pub config: CoreConfig,
    pub invoker: FfmpegInvoker,
    pub json: bool,
}

impl Context {
    pub fn new(config: CoreConfig, json: bool) -> Self {
        let history = Arc::new(DiagnosticHistory::new(config.diagnostic_history));
        let invoker =
            FfmpegInvoker::new(&config.ffmpeg_path, history).with_timeout(config.timeout());
        Self {
            config,
            invoker,
            json,
        }
    }

    /// Runs `operation` under a spinner.
    pub fn with_spinner<T>(
        &self,
        message: &str,
        operation: impl FnOnce() -> CliResult<T>,
    ) -> CliResult<T> {
        let pb = output::spinner(message, self.json);
        let result = operation();
        pb.finish_and_clear();
        result
    }

    /// Reports where a result was written.
    pub fn report_output(&self, action: &str, path: &Path) -> CliResult<()> {
        if self.json {
            output::print_json(&json!({ "action": action, "output": path }))
        } else {
            output::print_success(&format!("{action}: {}", path.display()));
            Ok(())
        }
    }
}

/// Moves a temporary artifact to `destination` when one was requested.
pub fn deliver(artifact: PathBuf, destination: Option<&Path>) -> CliResult<PathBuf> {
    match destination {
        Some(destination) if destination != artifact => {
            debug!("Moving {} to {}", artifact.display(), destination.display());
            replace_file(&artifact, destination)?;
            Ok(destination.to_path_buf())
        }
        _ => Ok(artifact),
    }
}
