//! Temporary file management utilities.
//!
//! Intermediate artifacts (overlay assets, pass outputs, extracted frames) live
//! under the configured temp directory. The tempfile types remove their file or
//! directory when dropped, so error paths clean up too.

use std::path::Path;

use tempfile::{Builder as TempFileBuilder, TempDir, TempPath};

use crate::config::CoreConfig;
use crate::error::CoreResult;

/// Creates a temporary directory with prefix under the configured temp dir.
/// Auto-cleaned when dropped.
pub fn create_temp_dir(config: &CoreConfig, prefix: &str) -> CoreResult<TempDir> {
    let base = config.temp_base_dir();
    std::fs::create_dir_all(&base)?;
    Ok(TempFileBuilder::new()
        .prefix(&format!("{prefix}_"))
        .tempdir_in(base)?)
}

/// Creates an empty file with prefix and extension and returns its path.
/// The file is deleted when the returned `TempPath` is dropped or closed.
pub fn create_temp_asset(dir: &Path, prefix: &str, extension: &str) -> CoreResult<TempPath> {
    std::fs::create_dir_all(dir)?;
    let file = TempFileBuilder::new()
        .prefix(&format!("{prefix}_"))
        .suffix(&format!(".{extension}"))
        .tempfile_in(dir)?;
    Ok(file.into_temp_path())
}
