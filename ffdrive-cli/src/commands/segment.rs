//! `ffdrive segment`: cuts a time window into a new file.

use ffdrive_core::MediaTranscoder;
use ffdrive_core::utils::extension_of;

use super::{Context, deliver};
use crate::cli::SegmentArgs;
use crate::error::CliResult;

pub fn run(ctx: &Context, args: SegmentArgs) -> CliResult<()> {
    let transcoder = MediaTranscoder::open(&ctx.invoker, &ctx.config, &args.input)?;
    let container = match args.container {
        Some(container) => container,
        None => extension_of(&args.input)?,
    };

    let segment = ctx.with_spinner("Extracting segment", || {
        transcoder.extract_segment(args.from, args.to, &container, args.size)
    })?;
    let written = deliver(segment, args.output.as_deref())?;
    ctx.report_output("Segment written", &written)
}
