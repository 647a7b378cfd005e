//! Utility functions for formatting and file operations.

use std::fs;
use std::path::Path;

use log::debug;

use crate::error::{CoreError, CoreResult};

/// Formats bytes with appropriate binary units (B, KiB, MiB, GiB).
#[must_use]
pub fn format_bytes(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    const MIB: f64 = KIB * 1024.0;
    const GIB: f64 = MIB * 1024.0;

    let bytes_f64 = bytes as f64;
    if bytes_f64 >= GIB {
        format!("{:.2} GiB", bytes_f64 / GIB)
    } else if bytes_f64 >= MIB {
        format!("{:.2} MiB", bytes_f64 / MIB)
    } else if bytes_f64 >= KIB {
        format!("{:.2} KiB", bytes_f64 / KIB)
    } else {
        format!("{bytes} B")
    }
}

/// Lower-cased extension of `path`, without the dot.
pub fn extension_of(path: &Path) -> CoreResult<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .map(str::to_ascii_lowercase)
        .ok_or_else(|| {
            CoreError::InvalidInput(format!("{} has no file extension", path.display()))
        })
}

/// Moves `from` onto `to`, replacing it.
///
/// Tries a rename first and falls back to copy + remove when the two paths
/// are on different filesystems.
pub fn replace_file(from: &Path, to: &Path) -> CoreResult<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if from.exists() => {
            debug!(
                "Rename {} -> {} failed ({e}); copying instead",
                from.display(),
                to.display()
            );
            fs::copy(from, to)?;
            fs::remove_file(from)?;
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Size in bytes of the file at `path`, or 0 if it does not exist.
#[must_use]
pub fn file_size(path: &Path) -> u64 {
    fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.00 KiB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.00 MiB");
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of(Path::new("clip.MP4")).unwrap(), "mp4");
        assert!(extension_of(Path::new("noext")).is_err());
    }

    #[test]
    fn test_replace_file_overwrites_destination() {
        let tmp = tempdir().unwrap();
        let from = tmp.path().join("new.mp4");
        let to = tmp.path().join("old.mp4");
        fs::write(&from, b"new").unwrap();
        fs::write(&to, b"old").unwrap();

        replace_file(&from, &to).unwrap();
        assert!(!from.exists());
        assert_eq!(fs::read(&to).unwrap(), b"new");
    }

    #[test]
    fn test_replace_file_missing_source() {
        let tmp = tempdir().unwrap();
        let err = replace_file(&tmp.path().join("nope"), &tmp.path().join("dest"));
        assert!(err.is_err());
    }

    #[test]
    fn test_file_size() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("f");
        fs::write(&path, b"1234").unwrap();
        assert_eq!(file_size(&path), 4);
        assert_eq!(file_size(&tmp.path().join("missing")), 0);
    }
}
