//! `ffdrive transcode`: runs a request built from command-line settings.

use ffdrive_core::MediaTranscoder;

use super::Context;
use crate::cli::TranscodeArgs;
use crate::error::CliResult;

pub fn run(ctx: &Context, args: TranscodeArgs) -> CliResult<()> {
    let transcoder = MediaTranscoder::open(&ctx.invoker, &ctx.config, &args.input)?;
    let request = args.request.to_request(&args.input).with_output(&args.output);

    let written = ctx.with_spinner("Transcoding", || transcoder.transcode(request))?;
    ctx.report_output("Transcoded", &written)
}
