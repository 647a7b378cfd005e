// ffdrive-cli/src/lib.rs
//
// Library portion of the ffdrive CLI: argument definitions, logging setup,
// terminal output and the subcommand implementations.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod output;

pub use cli::{Cli, Commands};
pub use error::CliResult;

use commands::Context;
use ffdrive_core::CoreConfig;
use log::debug;

/// Loads configuration and dispatches the parsed command line.
pub fn run(cli: Cli) -> CliResult<()> {
    let config = CoreConfig::load(cli.config.as_deref())?;
    debug!("Using ffmpeg at {}", config.ffmpeg_path.display());
    let ctx = Context::new(config, cli.json);

    match cli.command {
        Commands::Check => commands::check::run(&ctx),
        Commands::Probe(args) => commands::probe::run(&ctx, args),
        Commands::Command(args) => commands::command::run(&ctx, args),
        Commands::Transcode(args) => commands::transcode::run(&ctx, args),
        Commands::Frame(args) => commands::frame::run(&ctx, args),
        Commands::Segment(args) => commands::segment::run(&ctx, args),
        Commands::Watermark(args) => commands::watermark::run(&ctx, args),
        Commands::Overlay(args) => commands::overlay::run(&ctx, args),
        Commands::Audio(args) => commands::audio::run(&ctx, args),
    }
}
