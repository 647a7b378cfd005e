// ============================================================================
// ffdrive-cli/src/logging.rs
// ============================================================================
//
// LOGGING: env_logger setup for the CLI
//
// The core library logs through the `log` facade. This module installs the
// backend: `info` by default, `debug` with `--verbose`, and `RUST_LOG` wins
// over both. With `--log-dir` the records go to a timestamped file instead of
// stderr.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use env_logger::{Builder, Env, Target};
use log::{Level, LevelFilter};
use owo_colors::OwoColorize;

use crate::error::CliResult;

/// Returns the current local timestamp formatted as "YYYYMMDD_HHMMSS".
pub fn get_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Path of the log file for a run started now.
pub fn log_file_path(log_dir: &Path) -> PathBuf {
    log_dir.join(format!("ffdrive_{}.log", get_timestamp()))
}

pub fn default_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Installs the global logger. Returns the log file path when one is used.
pub fn init(verbose: bool, log_dir: Option<&Path>) -> CliResult<Option<PathBuf>> {
    let level = default_level(verbose);
    let mut builder = Builder::from_env(Env::default().default_filter_or(level.as_str()));

    let log_path = match log_dir {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            let path = log_file_path(dir);
            let file = File::create(&path)?;
            builder
                .format(|buf, record| {
                    writeln!(
                        buf,
                        "{} {:<5} {}",
                        buf.timestamp(),
                        record.level(),
                        record.args()
                    )
                })
                .target(Target::Pipe(Box::new(file)));
            Some(path)
        }
        None => {
            builder
                .format(|buf, record| {
                    let label = format!("{:<5}", record.level());
                    let label = match record.level() {
                        Level::Error => label.bright_red().to_string(),
                        Level::Warn => label.yellow().to_string(),
                        Level::Info => label.green().to_string(),
                        Level::Debug => label.blue().to_string(),
                        Level::Trace => label.magenta().to_string(),
                    };
                    writeln!(buf, "{label} {}", record.args())
                })
                .target(Target::Stderr);
            None
        }
    };

    // A second init (tests, embedding) keeps the first logger.
    let _ = builder.try_init();
    Ok(log_path)
}
