// ============================================================================
// ffdrive-core/src/media/transcode.rs
// ============================================================================
//
// MEDIA TRANSCODER: Operations that produce a derived file from a source
//
// Every operation writes to a fresh temporary path first and only touches the
// caller-visible location once ffmpeg has succeeded and the artifact has been
// verified. With `replace_original` set, the verified artifact replaces the
// source file; otherwise its temporary path is returned.
//
// KEY COMPONENTS:
// - MediaTranscoder: holds the probed source, the invoker and the config
// - extract_frame / extract_segment: time-window operations, range-checked
//   against the probed duration before anything runs
// - watermark: single image through the `movie` source filter
// - apply_overlays: rasterize, plan batches, run them in order, clean up

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use log::{debug, info, warn};
use tempfile::TempPath;

use crate::command::TranscodeRequest;
use crate::config::CoreConfig;
use crate::error::{CoreError, CoreResult};
use crate::external::ToolInvoker;
use crate::geometry::{FrameSize, PixelOffset};
use crate::overlay::{
    Anchor, FfmpegRasterizer, OverlayBatchPlanner, OverlayRasterizer, OverlaySpec,
};
use crate::temp_files;
use crate::timecode;
use crate::utils::{extension_of, replace_file};

use super::probe::{MediaFile, probe_file};
use super::run_to_artifact;

/// Still-image format for frame extraction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FrameFormat {
    #[default]
    Png,
    Jpeg,
    Bmp,
}

impl FrameFormat {
    pub fn extension(self) -> &'static str {
        match self {
            FrameFormat::Png => "png",
            FrameFormat::Jpeg => "jpg",
            FrameFormat::Bmp => "bmp",
        }
    }
}

impl fmt::Display for FrameFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for FrameFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(FrameFormat::Png),
            "jpg" | "jpeg" => Ok(FrameFormat::Jpeg),
            "bmp" => Ok(FrameFormat::Bmp),
            other => Err(CoreError::InvalidInput(format!(
                "unsupported frame format '{other}'"
            ))),
        }
    }
}

/// Produces derived files from one probed source.
pub struct MediaTranscoder<'a, I: ToolInvoker> {
    invoker: &'a I,
    config: &'a CoreConfig,
    media: MediaFile,
}

impl<'a, I: ToolInvoker> MediaTranscoder<'a, I> {
    /// Probes `path` and wraps the result.
    pub fn open(invoker: &'a I, config: &'a CoreConfig, path: &Path) -> CoreResult<Self> {
        let media = probe_file(invoker, config, path)?;
        Ok(Self::new(invoker, config, media))
    }

    /// Wraps an already-probed file.
    pub fn new(invoker: &'a I, config: &'a CoreConfig, media: MediaFile) -> Self {
        Self {
            invoker,
            config,
            media,
        }
    }

    pub fn media(&self) -> &MediaFile {
        &self.media
    }

    fn source(&self) -> &Path {
        &self.media.path
    }

    /// Empty output file under the temp dir, deleted unless kept.
    fn temp_output(&self, prefix: &str, extension: &str) -> CoreResult<TempPath> {
        temp_files::create_temp_asset(&self.config.temp_base_dir(), prefix, extension)
    }

    /// Moves a verified artifact over the source, or keeps it and hands back
    /// its path. The artifact is deleted if either step fails.
    fn finish(&self, artifact: TempPath, replace_original: bool) -> CoreResult<PathBuf> {
        if replace_original {
            replace_file(&artifact, self.source())?;
            info!("Replaced {}", self.source().display());
            Ok(self.source().to_path_buf())
        } else {
            keep_artifact(artifact)
        }
    }

    /// Runs an arbitrary request against this source.
    ///
    /// The request's input is forced to the probed file; an output path is
    /// required.
    pub fn transcode(&self, mut request: TranscodeRequest) -> CoreResult<PathBuf> {
        request.input_path = self.source().to_path_buf();
        let output = request.output_path.clone().ok_or_else(|| {
            CoreError::InvalidInput("transcode requires an output path".to_string())
        })?;
        request.validate()?;

        info!("Transcoding {} -> {}", self.source().display(), output.display());
        run_to_artifact(self.invoker, self.config, &request, &output)?;
        Ok(output)
    }

    /// Extracts the frame at `at` and returns the encoded image bytes.
    pub fn extract_frame(
        &self,
        at: Duration,
        format: FrameFormat,
        size: Option<FrameSize>,
    ) -> CoreResult<Vec<u8>> {
        self.media.ensure_within(at)?;

        let asset = temp_files::create_temp_asset(
            &self.config.temp_base_dir(),
            "frame",
            format.extension(),
        )?;
        let mut request = TranscodeRequest::new(self.source())
            .with_overwrite(true)
            .with_disable_audio(true)
            .with_output_options(format!("-f image2 -ss {} -vframes 1", timecode::to_text(at)))
            .with_output(&*asset);
        request.size = size.filter(|s| !s.is_empty());

        debug!("Extracting {format} frame at {}", timecode::to_text(at));
        run_to_artifact(self.invoker, self.config, &request, &asset)?;

        let bytes = fs::read(&asset)?;
        asset.close()?;
        Ok(bytes)
    }

    /// Extracts `[from, to)` into a new file of the given container.
    pub fn extract_segment(
        &self,
        from: Duration,
        to: Duration,
        container: &str,
        size: Option<FrameSize>,
    ) -> CoreResult<PathBuf> {
        if to < from {
            return Err(CoreError::InvalidInput(format!(
                "segment end {} is before its start {}",
                timecode::to_text(to),
                timecode::to_text(from)
            )));
        }
        self.media.ensure_within(from)?;

        let output = self.temp_output("segment", container)?;
        let mut request = TranscodeRequest::new(self.source())
            .with_overwrite(true)
            .with_output_options(format!(
                "-ss {} -t {}",
                timecode::to_text(from),
                timecode::to_text(to - from)
            ))
            .with_output(&*output);
        request.size = size.filter(|s| !s.is_empty());

        info!(
            "Extracting segment {}..{} of {}",
            timecode::to_text(from),
            timecode::to_text(to),
            self.source().display()
        );
        run_to_artifact(self.invoker, self.config, &request, &output)?;
        keep_artifact(output)
    }

    /// Burns `image` into the video at an anchored position.
    pub fn watermark(
        &self,
        image: &Path,
        position: Anchor,
        offset: PixelOffset,
        replace_original: bool,
    ) -> CoreResult<PathBuf> {
        if !image.is_file() {
            return Err(CoreError::InputNotFound(image.to_path_buf()));
        }
        let extension = extension_of(self.source())?;
        let output = self.temp_output("watermarked", &extension)?;

        let filter = format!(
            "movie='{}' [logo]; [in][logo] overlay={} [out]",
            escape_filter_path(image),
            position.position_expr(offset)
        );
        let request = TranscodeRequest::new(self.source())
            .with_overwrite(true)
            .with_video_filter(filter)
            .with_output(&*output);

        info!("Watermarking {} with {}", self.source().display(), image.display());
        run_to_artifact(self.invoker, self.config, &request, &output)?;
        self.finish(output, replace_original)
    }

    /// Draws `overlays` onto the video, splitting the work into chained passes
    /// when the filter graph would exceed the configured budget.
    pub fn apply_overlays(
        &self,
        overlays: Vec<OverlaySpec>,
        replace_original: bool,
    ) -> CoreResult<PathBuf> {
        let rasterizer = FfmpegRasterizer::new(self.invoker, self.config);
        self.apply_overlays_with(&rasterizer, overlays, replace_original)
    }

    /// [`Self::apply_overlays`] with a caller-supplied rasterizer.
    pub fn apply_overlays_with<R: OverlayRasterizer + ?Sized>(
        &self,
        rasterizer: &R,
        mut overlays: Vec<OverlaySpec>,
        replace_original: bool,
    ) -> CoreResult<PathBuf> {
        for overlay in &overlays {
            overlay.validate()?;
        }
        let planner = OverlayBatchPlanner::new(self.config.max_filter_graph_chars)?;
        let extension = extension_of(self.source())?;
        let work_dir = temp_files::create_temp_dir(self.config, "ffdrive_overlays")?;

        let mut assets: Vec<TempPath> = Vec::new();
        let result = self.run_overlay_passes(
            rasterizer,
            &planner,
            &mut overlays,
            &mut assets,
            work_dir.path(),
            &extension,
        );
        release_assets(assets);

        let last_output = result?;
        let output = self.temp_output("overlaid", &extension)?;
        replace_file(&last_output, &output)?;
        drop(work_dir);
        self.finish(output, replace_original)
    }

    fn run_overlay_passes<R: OverlayRasterizer + ?Sized>(
        &self,
        rasterizer: &R,
        planner: &OverlayBatchPlanner,
        overlays: &mut [OverlaySpec],
        assets: &mut Vec<TempPath>,
        work_dir: &Path,
        extension: &str,
    ) -> CoreResult<PathBuf> {
        for overlay in overlays.iter_mut().filter(|o| o.is_visible()) {
            let asset = rasterizer.rasterize(overlay, self.source(), work_dir)?;
            overlay.asset = Some(asset.to_path_buf());
            assets.push(asset);
        }

        let batches = planner.plan(overlays, self.source(), work_dir, extension)?;
        let total = batches.len();
        info!(
            "Applying {} overlay(s) to {} in {total} pass(es)",
            assets.len(),
            self.source().display()
        );

        let mut last_output = None;
        for (index, batch) in batches.into_iter().enumerate() {
            if batch.is_copy() {
                debug!("Nothing to draw; copying {}", batch.input.display());
                fs::copy(&batch.input, &batch.output)?;
            } else {
                debug!(
                    "Overlay pass {} of {total}: {} overlay(s)",
                    index + 1,
                    batch.overlays.len()
                );
                let request = TranscodeRequest::new(&batch.input)
                    .with_overwrite(true)
                    .with_complex_filter(batch.filter)
                    .with_output(&batch.output);
                run_to_artifact(self.invoker, self.config, &request, &batch.output).map_err(
                    |source| CoreError::OverlayBatchFailed {
                        batch: index,
                        total,
                        source: Box::new(source),
                    },
                )?;
            }
            last_output = Some(batch.output);
        }

        last_output.ok_or_else(|| CoreError::InvalidInput("overlay plan was empty".to_string()))
    }

    /// Re-encodes the audio into a new container chosen by extension.
    pub fn convert_audio(&self, container: &str) -> CoreResult<PathBuf> {
        let output = self.temp_output("audio", container)?;
        let request = TranscodeRequest::new(self.source())
            .with_overwrite(true)
            .with_output(&*output);

        info!("Converting {} to {container}", self.source().display());
        run_to_artifact(self.invoker, self.config, &request, &output)?;
        keep_artifact(output)
    }
}

/// Stops `artifact` from being deleted on drop.
fn keep_artifact(artifact: TempPath) -> CoreResult<PathBuf> {
    artifact.keep().map_err(|e| CoreError::Io(e.error))
}

/// Deletes every rasterized asset, logging rather than failing on errors.
fn release_assets(assets: Vec<TempPath>) {
    for asset in assets {
        let path = asset.to_path_buf();
        if let Err(e) = asset.close() {
            warn!("Failed to remove overlay asset {}: {e}", path.display());
        }
    }
}

/// Escapes a path for use inside a single-quoted filter argument.
fn escape_filter_path(path: &Path) -> String {
    path.to_string_lossy()
        .replace('\\', "\\\\")
        .replace('\'', "\\'")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_format_parsing() {
        assert_eq!("PNG".parse::<FrameFormat>().unwrap(), FrameFormat::Png);
        assert_eq!("jpeg".parse::<FrameFormat>().unwrap(), FrameFormat::Jpeg);
        assert_eq!(FrameFormat::Jpeg.extension(), "jpg");
        assert!("gif".parse::<FrameFormat>().is_err());
    }

    #[test]
    fn test_escape_filter_path() {
        assert_eq!(escape_filter_path(Path::new(r"C:\logos\a.png")), r"C:\\logos\\a.png");
        assert_eq!(escape_filter_path(Path::new("it's.png")), r"it\'s.png");
    }
}
