//! `ffdrive audio`: re-encodes into an audio container.

use ffdrive_core::MediaTranscoder;

use super::{Context, deliver};
use crate::cli::AudioArgs;
use crate::error::CliResult;

pub fn run(ctx: &Context, args: AudioArgs) -> CliResult<()> {
    let transcoder = MediaTranscoder::open(&ctx.invoker, &ctx.config, &args.input)?;
    let audio = ctx.with_spinner("Converting audio", || transcoder.convert_audio(&args.container))?;
    let written = deliver(audio, args.output.as_deref())?;
    ctx.report_output("Audio written", &written)
}
