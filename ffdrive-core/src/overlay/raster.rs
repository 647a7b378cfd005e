// ============================================================================
// ffdrive-core/src/overlay/raster.rs
// ============================================================================
//
// OVERLAY RASTERIZATION: Produces the image asset behind each overlay
//
// Shapes are drawn by ffmpeg itself so no image library is needed:
// - Rectangle: one frame of the lavfi `color` source
// - Ellipse: an RGBA frame whose alpha is set by a `geq` ellipse test
// - BlurredRectangle: the covered region of the source frame at the overlay
//   start, cropped and blurred with `gblur`
//
// Every asset is returned as a `TempPath`; the file is deleted when it drops.

use std::path::Path;

use log::debug;
use tempfile::TempPath;

use crate::command::TranscodeRequest;
use crate::config::CoreConfig;
use crate::error::{CoreError, CoreResult};
use crate::external::ToolInvoker;
use crate::media;
use crate::temp_files;
use crate::timecode;

use super::spec::{OverlayKind, OverlaySpec};

const ELLIPSE_ALPHA: &str = "if(lte(pow(X-W/2,2)/pow(W/2,2)+pow(Y-H/2,2)/pow(H/2,2),1),255,0)";

/// Turns an overlay description into an image file.
pub trait OverlayRasterizer {
    /// Writes the asset for `overlay` into `dir`. `source` is the video the
    /// overlay will be composited onto.
    fn rasterize(&self, overlay: &OverlaySpec, source: &Path, dir: &Path) -> CoreResult<TempPath>;
}

/// [`OverlayRasterizer`] that renders every kind through ffmpeg.
pub struct FfmpegRasterizer<'a, I: ToolInvoker> {
    invoker: &'a I,
    config: &'a CoreConfig,
}

impl<'a, I: ToolInvoker> FfmpegRasterizer<'a, I> {
    pub fn new(invoker: &'a I, config: &'a CoreConfig) -> Self {
        Self { invoker, config }
    }

    fn check_size(&self, overlay: &OverlaySpec) -> CoreResult<()> {
        let size = overlay.size;
        if size.is_empty() {
            return Err(CoreError::InvalidInput(format!(
                "overlay {} has zero area and cannot be rasterized",
                overlay.id
            )));
        }
        if size.width > self.config.max_overlay_width || size.height > self.config.max_overlay_height {
            return Err(CoreError::InvalidInput(format!(
                "overlay {} is {size}, larger than the {}x{} limit",
                overlay.id, self.config.max_overlay_width, self.config.max_overlay_height
            )));
        }
        Ok(())
    }

    /// Builds the ffmpeg request that writes `overlay` to `asset`.
    pub fn request_for(&self, overlay: &OverlaySpec, source: &Path, asset: &Path) -> TranscodeRequest {
        let size = overlay.size;
        let base = match overlay.kind {
            OverlayKind::Rectangle => TranscodeRequest::new(format!("color=c=black:s={size}"))
                .with_input_options("-f lavfi"),
            OverlayKind::Ellipse => TranscodeRequest::new(format!("color=c=black:s={size}"))
                .with_input_options("-f lavfi")
                .with_video_filter(format!("format=rgba,geq=r=0:g=0:b=0:a='{ELLIPSE_ALPHA}'")),
            OverlayKind::BlurredRectangle => TranscodeRequest::new(source)
                .with_input_options(format!("-ss {}", timecode::to_text(overlay.start)))
                .with_video_filter(format!(
                    "crop={}:{}:{},gblur=sigma={}",
                    size.width,
                    size.height,
                    overlay.position.crop_expr(overlay.offset),
                    self.config.blur_radius
                ))
                .with_disable_audio(true),
        };
        base.with_overwrite(true)
            .with_output_options("-frames:v 1")
            .with_output(asset)
    }
}

impl<I: ToolInvoker> OverlayRasterizer for FfmpegRasterizer<'_, I> {
    fn rasterize(&self, overlay: &OverlaySpec, source: &Path, dir: &Path) -> CoreResult<TempPath> {
        self.check_size(overlay)?;
        let asset = temp_files::create_temp_asset(dir, "overlay", "png")?;
        let request = self.request_for(overlay, source, &asset);
        debug!("Rasterizing {:?} overlay {} ({})", overlay.kind, overlay.id, overlay.size);
        media::run_to_artifact(self.invoker, self.config, &request, &asset)?;
        Ok(asset)
    }
}
