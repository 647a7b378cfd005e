// ============================================================================
// ffdrive-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: The seam between ffdrive and the ffmpeg executable
//
// Everything that touches a real process goes through `ToolInvoker`. The rest
// of the crate only produces command-line strings and interprets the captured
// diagnostic text, so tests substitute a scripted invoker.
//
// KEY COMPONENTS:
// - ToolInvoker / ToolOutput: the invocation contract
// - FfmpegInvoker: std::process implementation with optional timeout
// - DiagnosticHistory: bounded, thread-safe log of recent outputs
// - check_dependency: verifies the configured executable can be started

use std::path::Path;
use std::process::{Command, Stdio};

use log::{debug, error, warn};

use crate::error::{CoreError, CoreResult};

mod history;
mod invoker;

pub use history::{DEFAULT_HISTORY_CAPACITY, DiagnosticHistory};
pub use invoker::FfmpegInvoker;

/// Captured result of one tool invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// Everything the tool wrote to stderr.
    pub diagnostics: String,
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
}

impl ToolOutput {
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs one assembled command line.
///
/// A non-zero exit is reported through [`ToolOutput::exit_code`], not as an
/// error; the caller decides whether it matters (probing, for instance,
/// expects ffmpeg to complain about the missing output).
pub trait ToolInvoker {
    fn invoke(&self, command_line: &str, working_dir: Option<&Path>) -> CoreResult<ToolOutput>;
}

impl<T: ToolInvoker + ?Sized> ToolInvoker for &T {
    fn invoke(&self, command_line: &str, working_dir: Option<&Path>) -> CoreResult<ToolOutput> {
        (**self).invoke(command_line, working_dir)
    }
}

/// Checks that `program` can be started and returns the first line of its
/// `-version` banner.
pub fn check_dependency(program: &Path) -> CoreResult<String> {
    let name = program.to_string_lossy().into_owned();
    let output = Command::new(program)
        .arg("-version")
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output();

    match output {
        Ok(output) => {
            let banner = String::from_utf8_lossy(&output.stdout)
                .lines()
                .next()
                .unwrap_or_default()
                .trim()
                .to_string();
            debug!("Found dependency {name}: {banner}");
            Ok(banner)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!("Dependency '{name}' not found.");
            Err(CoreError::DependencyNotFound(name))
        }
        Err(e) => {
            error!("Failed to start dependency check command '{name}': {e}");
            Err(CoreError::CommandStart(name, e))
        }
    }
}
