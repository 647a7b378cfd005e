// ============================================================================
// ffdrive-core/src/media/probe.rs
// ============================================================================
//
// MEDIA PROBE: Inspects a file by running ffmpeg with no output
//
// ffmpeg describes its inputs on stderr and then exits non-zero because no
// output was given. That exit status is expected here; only failures to run
// the tool at all are errors.

use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, info};
use serde::Serialize;

use crate::command::{TranscodeRequest, assemble, is_blank_path};
use crate::config::CoreConfig;
use crate::error::{CoreError, CoreResult};
use crate::external::ToolInvoker;
use crate::probe::{self, ProbeResult};
use crate::timecode;

/// A probed media file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaFile {
    pub path: PathBuf,
    pub info: ProbeResult,
}

impl MediaFile {
    pub fn duration(&self) -> Duration {
        self.info.duration
    }

    /// Fails with `OutOfRange` when `at` lies past the probed duration.
    pub fn ensure_within(&self, at: Duration) -> CoreResult<()> {
        if at > self.info.duration {
            return Err(CoreError::OutOfRange {
                requested: at,
                duration: self.info.duration,
            });
        }
        Ok(())
    }
}

/// Probes `path` and parses the diagnostic text into a [`MediaFile`].
pub fn probe_file<I: ToolInvoker + ?Sized>(
    invoker: &I,
    config: &CoreConfig,
    path: &Path,
) -> CoreResult<MediaFile> {
    if is_blank_path(path) {
        return Err(CoreError::InvalidInput(
            "input file path cannot be empty".to_string(),
        ));
    }
    if !path.is_file() {
        return Err(CoreError::InputNotFound(path.to_path_buf()));
    }

    let request = TranscodeRequest::new(path);
    let output = invoker.invoke(&assemble(&request), config.working_dir.as_deref())?;
    debug!(
        "Probe of {} exited with {:?}",
        path.display(),
        output.exit_code
    );

    let info = probe::parse(&output.diagnostics);
    info!(
        "Probed {}: duration {}, {} @ {:.2} fps",
        path.display(),
        timecode::to_text(info.duration),
        info.dimensions,
        info.frame_rate
    );
    Ok(MediaFile {
        path: path.to_path_buf(),
        info,
    })
}
