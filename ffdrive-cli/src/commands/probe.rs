//! `ffdrive probe`: prints what ffmpeg reports about a file.

use ffdrive_core::probe_file;

use super::Context;
use crate::cli::ProbeArgs;
use crate::error::CliResult;
use crate::output;

pub fn run(ctx: &Context, args: ProbeArgs) -> CliResult<()> {
    let media = probe_file(&ctx.invoker, &ctx.config, &args.input)?;
    if ctx.json {
        output::print_json(&media)
    } else {
        output::print_media(&media);
        Ok(())
    }
}
