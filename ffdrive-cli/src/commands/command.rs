//! `ffdrive command`: prints the ffmpeg command line a request would run.
//!
//! Nothing is executed and the input is not probed.

use ffdrive_core::{TranscodeRequest, assemble};
use serde_json::json;

use super::Context;
use crate::cli::CommandArgs;
use crate::error::CliResult;
use crate::output;

pub fn build_request(args: &CommandArgs) -> TranscodeRequest {
    let request = args.request.to_request(&args.input);
    match &args.output {
        Some(output) => request.with_output(output),
        None => request,
    }
}

pub fn run(ctx: &Context, args: CommandArgs) -> CliResult<()> {
    let request = build_request(&args);
    request.validate()?;
    let line = assemble(&request);

    if ctx.json {
        output::print_json(&json!({
            "program": ctx.config.ffmpeg_path,
            "arguments": line,
        }))
    } else {
        println!("{} {line}", ctx.config.ffmpeg_path.display());
        Ok(())
    }
}
