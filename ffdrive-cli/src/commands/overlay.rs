//! `ffdrive overlay`: draws timed overlays described in a JSON file.
//!
//! The file holds an array of overlay objects:
//!
//! ```json
//! [
//!   { "start": 1000, "end": 4000, "size": { "width": 200, "height": 80 },
//!     "offset": { "x": 16, "y": 16 }, "position": "bottom_right",
//!     "kind": "blurred_rectangle" }
//! ]
//! ```
//!
//! Times are milliseconds.

use std::fs;
use std::path::Path;

use ffdrive_core::MediaTranscoder;
use ffdrive_core::overlay::{OverlaySpec, dedup_overlays};
use log::info;

use super::{Context, deliver};
use crate::cli::OverlayArgs;
use crate::error::{CliErrorContext, CliResult};

/// Reads and validates an overlay file.
pub fn load_overlays(path: &Path, dedup: bool) -> CliResult<Vec<OverlaySpec>> {
    let text = fs::read_to_string(path).cli_context(format!("cannot read {}", path.display()))?;
    let overlays: Vec<OverlaySpec> =
        serde_json::from_str(&text).cli_context(format!("cannot parse {}", path.display()))?;
    for overlay in &overlays {
        overlay.validate()?;
    }

    if !dedup {
        return Ok(overlays);
    }
    let before = overlays.len();
    let unique = dedup_overlays(overlays);
    if unique.len() < before {
        info!("Dropped {} duplicate overlay(s)", before - unique.len());
    }
    Ok(unique)
}

pub fn run(ctx: &Context, args: OverlayArgs) -> CliResult<()> {
    let overlays = load_overlays(&args.overlays, args.dedup)?;
    let transcoder = MediaTranscoder::open(&ctx.invoker, &ctx.config, &args.input)?;

    let message = format!("Applying {} overlay(s)", overlays.len());
    let result = ctx.with_spinner(&message, || {
        transcoder.apply_overlays(overlays, args.replace)
    })?;
    let written = deliver(result, args.output.as_deref())?;
    ctx.report_output("Overlays applied", &written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ffdrive_core::CoreError;
    use tempfile::tempdir;

    const TWO_SAME: &str = r#"[
        {"start": 0, "end": 1000, "size": {"width": 10, "height": 10}},
        {"start": 0, "end": 1000, "size": {"width": 10, "height": 10}, "kind": "ellipse"}
    ]"#;

    #[test]
    fn test_load_overlays_with_dedup() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("overlays.json");
        fs::write(&path, TWO_SAME).unwrap();

        assert_eq!(load_overlays(&path, false).unwrap().len(), 2);
        assert_eq!(load_overlays(&path, true).unwrap().len(), 1);
    }

    #[test]
    fn test_load_overlays_rejects_bad_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("overlays.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            load_overlays(&path, false),
            Err(CoreError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_load_overlays_rejects_reversed_window() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("overlays.json");
        fs::write(
            &path,
            r#"[{"start": 5000, "end": 1000, "size": {"width": 8, "height": 8}}]"#,
        )
        .unwrap();
        let err = load_overlays(&path, false).unwrap_err();
        assert!(err.to_string().contains("ends"));
    }
}
