//! `ffdrive check`: verifies the configured ffmpeg executable starts.

use ffdrive_core::check_dependency;
use serde_json::json;

use super::Context;
use crate::error::CliResult;
use crate::output;

pub fn run(ctx: &Context) -> CliResult<()> {
    let program = &ctx.config.ffmpeg_path;
    let banner = check_dependency(program)?;

    if ctx.json {
        return output::print_json(&json!({ "program": program, "version": banner }));
    }
    output::print_heading("ffmpeg");
    output::print_info("Program", program.display());
    output::print_info("Version", &banner);
    output::print_success("ffmpeg is available");
    Ok(())
}
