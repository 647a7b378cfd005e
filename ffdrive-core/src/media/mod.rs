//! Orchestrators that combine the assembler, the probe parser and the overlay
//! planner with a [`ToolInvoker`].

mod probe;
mod transcode;

use std::path::Path;

use log::error;

use crate::command::{TranscodeRequest, assemble};
use crate::config::CoreConfig;
use crate::error::{CoreError, CoreResult, command_failed_error};
use crate::external::{ToolInvoker, ToolOutput};
use crate::utils::file_size;

pub use probe::{MediaFile, probe_file};
pub use transcode::{FrameFormat, MediaTranscoder};

/// Runs `request` and requires a successful exit and a non-empty `artifact`.
pub(crate) fn run_to_artifact<I: ToolInvoker + ?Sized>(
    invoker: &I,
    config: &CoreConfig,
    request: &TranscodeRequest,
    artifact: &Path,
) -> CoreResult<ToolOutput> {
    let output = invoker.invoke(&assemble(request), config.working_dir.as_deref())?;
    if !output.success() {
        error!("ffmpeg failed while writing {}", artifact.display());
        return Err(command_failed_error(output.exit_code, output.diagnostics));
    }
    if file_size(artifact) == 0 {
        error!("ffmpeg reported success but {} is missing or empty", artifact.display());
        return Err(CoreError::MissingArtifact {
            path: artifact.to_path_buf(),
            diagnostics: output.diagnostics,
        });
    }
    Ok(output)
}
