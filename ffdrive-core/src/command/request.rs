// ============================================================================
// ffdrive-core/src/command/request.rs
// ============================================================================
//
// TRANSCODE REQUEST: Structured description of one ffmpeg invocation
//
// A single request type carries the superset of every option the assembler
// knows how to render. Optional fields are emitted only when present; there is
// no way to ask for "ffmpeg's own default" once a field is set.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::geometry::FrameSize;

/// A complex filter graph: the extra `-i` clauses it needs plus the graph text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplexFilter {
    /// Pre-rendered input clauses (`-i "a.png" -i "b.png"`).
    pub inputs: String,
    /// Filter graph text, unquoted and unescaped.
    pub commands: String,
}

impl ComplexFilter {
    #[must_use]
    pub fn new(inputs: impl Into<String>, commands: impl Into<String>) -> Self {
        Self {
            inputs: inputs.into(),
            commands: commands.into(),
        }
    }

    /// Total rendered length, the quantity the overlay planner budgets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inputs.len() + self.commands.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inputs.trim().is_empty()
    }
}

/// Everything needed to assemble one ffmpeg command line.
///
/// Build with [`TranscodeRequest::new`] and the `with_*` methods, then render
/// with [`crate::command::assemble`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscodeRequest {
    // ---- Inputs / outputs ----
    pub input_path: PathBuf,
    /// Extra inputs, each rendered as its own `-i` clause in order.
    pub additional_inputs: Vec<PathBuf>,
    /// `None` sends the output to the platform null device.
    pub output_path: Option<PathBuf>,

    // ---- General flags ----
    pub overwrite: bool,
    pub quality_scale: Option<u32>,
    pub disable_audio: bool,

    // ---- Raw option strings (appended verbatim) ----
    pub options: Option<String>,
    pub input_options: Option<String>,
    pub output_options: Option<String>,

    // ---- Codecs and format ----
    pub video_codec: Option<String>,
    pub audio_codec: Option<String>,
    pub format: Option<String>,

    // ---- Rates (KB for buffer/rate limits, k for bitrates) ----
    pub buffer_size: Option<u32>,
    pub max_rate: Option<u32>,
    pub min_rate: Option<u32>,
    pub video_bitrate: Option<u32>,
    pub audio_bitrate: Option<u32>,
    pub audio_channels: Option<u32>,
    pub audio_rate: Option<u32>,
    pub pass: Option<u32>,

    // ---- Video shaping ----
    pub size: Option<FrameSize>,
    pub video_profile: Option<String>,
    pub preset: Option<String>,
    pub video_filter: Option<String>,

    pub complex_filter: Option<ComplexFilter>,
}

impl TranscodeRequest {
    #[must_use]
    pub fn new(input_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_additional_input(mut self, path: impl Into<PathBuf>) -> Self {
        self.additional_inputs.push(path.into());
        self
    }

    #[must_use]
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    #[must_use]
    pub fn with_quality_scale(mut self, scale: u32) -> Self {
        self.quality_scale = Some(scale);
        self
    }

    #[must_use]
    pub fn with_disable_audio(mut self, disable: bool) -> Self {
        self.disable_audio = disable;
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: impl Into<String>) -> Self {
        self.options = Some(options.into());
        self
    }

    #[must_use]
    pub fn with_input_options(mut self, options: impl Into<String>) -> Self {
        self.input_options = Some(options.into());
        self
    }

    #[must_use]
    pub fn with_output_options(mut self, options: impl Into<String>) -> Self {
        self.output_options = Some(options.into());
        self
    }

    #[must_use]
    pub fn with_video_codec(mut self, codec: impl Into<String>) -> Self {
        self.video_codec = Some(codec.into());
        self
    }

    #[must_use]
    pub fn with_audio_codec(mut self, codec: impl Into<String>) -> Self {
        self.audio_codec = Some(codec.into());
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    #[must_use]
    pub fn with_buffer_size(mut self, kilobytes: u32) -> Self {
        self.buffer_size = Some(kilobytes);
        self
    }

    #[must_use]
    pub fn with_max_rate(mut self, kilobytes: u32) -> Self {
        self.max_rate = Some(kilobytes);
        self
    }

    #[must_use]
    pub fn with_min_rate(mut self, kilobytes: u32) -> Self {
        self.min_rate = Some(kilobytes);
        self
    }

    #[must_use]
    pub fn with_video_bitrate(mut self, kbps: u32) -> Self {
        self.video_bitrate = Some(kbps);
        self
    }

    #[must_use]
    pub fn with_audio_bitrate(mut self, kbps: u32) -> Self {
        self.audio_bitrate = Some(kbps);
        self
    }

    #[must_use]
    pub fn with_audio_channels(mut self, channels: u32) -> Self {
        self.audio_channels = Some(channels);
        self
    }

    #[must_use]
    pub fn with_audio_rate(mut self, hz: u32) -> Self {
        self.audio_rate = Some(hz);
        self
    }

    #[must_use]
    pub fn with_pass(mut self, pass: u32) -> Self {
        self.pass = Some(pass);
        self
    }

    #[must_use]
    pub fn with_size(mut self, size: FrameSize) -> Self {
        self.size = Some(size);
        self
    }

    #[must_use]
    pub fn with_video_profile(mut self, profile: impl Into<String>) -> Self {
        self.video_profile = Some(profile.into());
        self
    }

    #[must_use]
    pub fn with_preset(mut self, preset: impl Into<String>) -> Self {
        self.preset = Some(preset.into());
        self
    }

    #[must_use]
    pub fn with_video_filter(mut self, filter: impl Into<String>) -> Self {
        self.video_filter = Some(filter.into());
        self
    }

    #[must_use]
    pub fn with_complex_filter(mut self, filter: ComplexFilter) -> Self {
        self.complex_filter = Some(filter);
        self
    }

    /// Checks the request before it is handed to ffmpeg.
    ///
    /// The input path must be non-empty and exist; an output path, when set,
    /// must be non-empty.
    pub fn validate(&self) -> CoreResult<()> {
        if is_blank_path(&self.input_path) {
            return Err(CoreError::InvalidInput(
                "input file path cannot be empty".to_string(),
            ));
        }
        if !self.input_path.exists() {
            return Err(CoreError::InputNotFound(self.input_path.clone()));
        }
        if self.output_path.as_deref().is_some_and(is_blank_path) {
            return Err(CoreError::InvalidInput(
                "output file path cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

pub(crate) fn is_blank_path(path: &Path) -> bool {
    path.as_os_str().to_string_lossy().trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_complex_filter_len_and_empty() {
        let filter = ComplexFilter::new("-i \"a.png\"", "[0:v][1:v]overlay=0:0");
        assert_eq!(filter.len(), 10 + 21);
        assert!(!filter.is_empty());
        assert!(ComplexFilter::new("  ", "overlay").is_empty());
    }

    #[test]
    fn test_validate_rejects_empty_input() {
        let err = TranscodeRequest::new("").validate().unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(_)));
    }

    #[test]
    fn test_validate_rejects_missing_input() {
        let tmp = tempdir().unwrap();
        let missing = tmp.path().join("missing.mp4");
        let err = TranscodeRequest::new(&missing).validate().unwrap_err();
        assert!(matches!(err, CoreError::InputNotFound(ref p) if p == &missing));
    }

    #[test]
    fn test_validate_rejects_blank_output() {
        let tmp = tempdir().unwrap();
        let input = tmp.path().join("in.mp4");
        std::fs::write(&input, b"x").unwrap();

        assert!(TranscodeRequest::new(&input).validate().is_ok());
        assert!(TranscodeRequest::new(&input).with_output("out.mp4").validate().is_ok());
        assert!(TranscodeRequest::new(&input).with_output(" ").validate().is_err());
    }
}
