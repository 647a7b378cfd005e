//! `ffdrive frame`: writes one frame of the input as an image.

use std::fs;

use ffdrive_core::{MediaTranscoder, timecode};

use super::Context;
use crate::cli::FrameArgs;
use crate::error::{CliErrorContext, CliResult};

pub fn run(ctx: &Context, args: FrameArgs) -> CliResult<()> {
    let transcoder = MediaTranscoder::open(&ctx.invoker, &ctx.config, &args.input)?;

    let message = format!("Extracting frame at {}", timecode::to_text(args.at));
    let bytes = ctx.with_spinner(&message, || {
        transcoder.extract_frame(args.at, args.format, args.size)
    })?;

    fs::write(&args.output, &bytes)
        .cli_context(format!("cannot write {}", args.output.display()))?;
    ctx.report_output("Frame written", &args.output)
}
