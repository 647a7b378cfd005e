// ffdrive-cli/src/main.rs
//
// Entry point for the `ffdrive` binary: parses arguments, installs the
// logger, runs the selected subcommand and maps failures to exit code 1.

use std::process;

use clap::Parser;
use ffdrive_cli::{Cli, logging, output, run};
use log::debug;

fn main() {
    let cli = Cli::parse();

    match logging::init(cli.verbose, cli.log_dir.as_deref()) {
        Ok(Some(path)) => debug!("Logging to {}", path.display()),
        Ok(None) => {}
        Err(e) => output::print_warning(&format!("could not set up log file: {e}")),
    }

    if let Err(e) = run(cli) {
        output::print_error(&e);
        process::exit(1);
    }
}
