//! Filter-graph rendering for a run of overlays.
//!
//! Input 0 is the video being overlaid; overlay `k` (1-based) is input `k`.
//! Each overlay is composited onto the previous result through a labelled
//! intermediate stream, and the last link is left unlabelled so ffmpeg maps it
//! to the output:
//!
//! ```text
//! [0:v][1:v]overlay=...[ov1];[ov1][2:v]overlay=...[ov2];[ov2][3:v]overlay=...
//! ```

use crate::command::ComplexFilter;
use crate::error::{CoreError, CoreResult};

use super::spec::OverlaySpec;

/// Renders the inputs and commands text for `overlays`, skipping zero-area
/// entries. Every visible overlay must already have its asset assigned.
pub fn render(overlays: &[OverlaySpec]) -> CoreResult<ComplexFilter> {
    let visible: Vec<&OverlaySpec> = overlays.iter().filter(|o| o.is_visible()).collect();

    let mut inputs = Vec::with_capacity(visible.len());
    let mut commands = Vec::with_capacity(visible.len());

    for (index, overlay) in visible.iter().enumerate() {
        let clause = overlay.input_clause().ok_or_else(|| {
            CoreError::InvalidInput(format!("overlay {} has not been rasterized", overlay.id))
        })?;
        inputs.push(clause);

        let stream = index + 1;
        let source = if index == 0 {
            "[0:v]".to_string()
        } else {
            format!("[ov{index}]")
        };
        let sink = if stream == visible.len() {
            String::new()
        } else {
            format!("[ov{stream}]")
        };
        commands.push(format!("{source}[{stream}:v]{}{sink}", overlay.filter_clause()));
    }

    Ok(ComplexFilter::new(inputs.join(" "), commands.join(";")))
}
