//! `ffdrive watermark`: burns an image into the video.

use ffdrive_core::MediaTranscoder;
use ffdrive_core::geometry::PixelOffset;

use super::{Context, deliver};
use crate::cli::WatermarkArgs;
use crate::error::CliResult;

pub fn run(ctx: &Context, args: WatermarkArgs) -> CliResult<()> {
    let transcoder = MediaTranscoder::open(&ctx.invoker, &ctx.config, &args.input)?;
    let placement = &args.placement;
    let offset = PixelOffset::new(placement.offset_x, placement.offset_y);

    let result = ctx.with_spinner("Watermarking", || {
        transcoder.watermark(&args.image, placement.position, offset, args.replace)
    })?;
    let written = deliver(result, args.output.as_deref())?;
    ctx.report_output("Watermarked", &written)
}
