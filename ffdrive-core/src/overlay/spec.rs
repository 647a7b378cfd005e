// ============================================================================
// ffdrive-core/src/overlay/spec.rs
// ============================================================================
//
// OVERLAY SPEC: One timed visual overlay and its filter-graph fragments
//
// An overlay is a shape drawn over the video between `start` and `end`. The
// shape itself is rasterized to an image asset at render time; the asset path
// is written back into the overlay so the filter graph can reference it.
//
// Identity for deduplication is geometry plus timing. The generated id is for
// logging and correlation only.

use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::command::escape::quote_path;
use crate::error::{CoreError, CoreResult};
use crate::geometry::{FrameSize, PixelOffset};
use crate::timecode;

/// Anchor point an overlay offset is measured from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    #[default]
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Center,
    MiddleLeft,
    MiddleRight,
    CenterTop,
    CenterBottom,
}

impl Anchor {
    pub const ALL: [Anchor; 9] = [
        Anchor::TopLeft,
        Anchor::TopRight,
        Anchor::BottomLeft,
        Anchor::BottomRight,
        Anchor::Center,
        Anchor::MiddleLeft,
        Anchor::MiddleRight,
        Anchor::CenterTop,
        Anchor::CenterBottom,
    ];

    /// `X:Y` position for the `overlay` filter.
    #[must_use]
    pub fn position_expr(self, offset: PixelOffset) -> String {
        self.expr(offset, ("main_w", "main_h"), ("overlay_w", "overlay_h"))
    }

    /// `X:Y` position for the `crop` filter, selecting the same region of the
    /// source frame that `position_expr` would cover.
    #[must_use]
    pub fn crop_expr(self, offset: PixelOffset) -> String {
        self.expr(offset, ("in_w", "in_h"), ("out_w", "out_h"))
    }

    fn expr(self, offset: PixelOffset, outer: (&str, &str), inner: (&str, &str)) -> String {
        let (ow, oh) = outer;
        let (iw, ih) = inner;
        let PixelOffset { x, y } = offset;

        let left = format!("{x}");
        let right = format!("{ow}-{iw}-{x}");
        let h_center = format!("({ow}-{iw})/2-{x}");
        let top = format!("{y}");
        let bottom = format!("{oh}-{ih}-{y}");
        let v_center = format!("({oh}-{ih})/2-{y}");

        let (horizontal, vertical) = match self {
            Anchor::TopLeft => (left, top),
            Anchor::TopRight => (right, top),
            Anchor::BottomLeft => (left, bottom),
            Anchor::BottomRight => (right, bottom),
            Anchor::Center => (h_center, v_center),
            Anchor::MiddleLeft => (left, v_center),
            Anchor::MiddleRight => (right, v_center),
            Anchor::CenterTop => (h_center, top),
            Anchor::CenterBottom => (h_center, bottom),
        };
        format!("{horizontal}:{vertical}")
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Anchor::TopLeft => "top-left",
            Anchor::TopRight => "top-right",
            Anchor::BottomLeft => "bottom-left",
            Anchor::BottomRight => "bottom-right",
            Anchor::Center => "center",
            Anchor::MiddleLeft => "middle-left",
            Anchor::MiddleRight => "middle-right",
            Anchor::CenterTop => "center-top",
            Anchor::CenterBottom => "center-bottom",
        };
        f.write_str(name)
    }
}

impl FromStr for Anchor {
    type Err = CoreError;

    /// Accepts the display names and their snake_case forms.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Anchor::ALL
            .into_iter()
            .find(|anchor| anchor.to_string() == wanted)
            .ok_or_else(|| CoreError::InvalidInput(format!("unknown anchor position '{s}'")))
    }
}

/// What an overlay draws.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayKind {
    /// Solid black rectangle.
    #[default]
    Rectangle,
    /// Solid black ellipse inscribed in the overlay size, transparent outside.
    Ellipse,
    /// The covered region of the source frame, blurred.
    BlurredRectangle,
}

/// A single timed overlay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlaySpec {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    #[serde(with = "millis")]
    pub start: Duration,
    #[serde(with = "millis")]
    pub end: Duration,
    pub size: FrameSize,
    #[serde(default)]
    pub offset: PixelOffset,
    #[serde(default)]
    pub position: Anchor,
    #[serde(default)]
    pub kind: OverlayKind,
    /// Rasterized image backing this overlay, set at render time.
    #[serde(skip)]
    pub asset: Option<PathBuf>,
}

impl OverlaySpec {
    /// Creates an overlay with a fresh id. Fails when `end < start`.
    pub fn new(
        start: Duration,
        end: Duration,
        size: FrameSize,
        position: Anchor,
        offset: PixelOffset,
        kind: OverlayKind,
    ) -> CoreResult<Self> {
        let spec = Self {
            id: Uuid::new_v4(),
            start,
            end,
            size,
            offset,
            position,
            kind,
            asset: None,
        };
        spec.validate()?;
        Ok(spec)
    }

    /// Checks the visible window. Needed for specs built by deserialization.
    pub fn validate(&self) -> CoreResult<()> {
        if self.end < self.start {
            return Err(CoreError::InvalidInput(format!(
                "overlay {} ends ({}) before it starts ({})",
                self.id,
                timecode::to_text(self.end),
                timecode::to_text(self.start)
            )));
        }
        Ok(())
    }

    /// Zero-area overlays are skipped everywhere.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        !self.size.is_empty()
    }

    /// `-i "<asset>"`, or `None` until the overlay has been rasterized.
    #[must_use]
    pub fn input_clause(&self) -> Option<String> {
        self.asset
            .as_deref()
            .map(|path| format!("-i {}", quote_path(path)))
    }

    /// `overlay=<pos>:enable='between(t,<start>,<end>)'`.
    #[must_use]
    pub fn filter_clause(&self) -> String {
        format!(
            "overlay={}:enable='between(t,{},{})'",
            self.position.position_expr(self.offset),
            timecode::to_seconds_text(self.start),
            timecode::to_seconds_text(self.end)
        )
    }
}

impl PartialEq for OverlaySpec {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start
            && self.end == other.end
            && self.offset == other.offset
            && self.size == other.size
    }
}

impl Eq for OverlaySpec {}

impl Hash for OverlaySpec {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.start.hash(state);
        self.end.hash(state);
        self.offset.hash(state);
        self.size.hash(state);
    }
}

/// Removes overlays equal in timing and geometry, keeping the first of each.
#[must_use]
pub fn dedup_overlays(overlays: Vec<OverlaySpec>) -> Vec<OverlaySpec> {
    let mut seen = HashSet::new();
    overlays
        .into_iter()
        .filter(|overlay| seen.insert(overlay.clone()))
        .collect()
}

/// Serde adapter storing a `Duration` as whole milliseconds.
mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overlay(start_ms: u64, end_ms: u64) -> OverlaySpec {
        OverlaySpec::new(
            Duration::from_millis(start_ms),
            Duration::from_millis(end_ms),
            FrameSize::new(100, 50),
            Anchor::TopLeft,
            PixelOffset::new(10, 20),
            OverlayKind::Rectangle,
        )
        .unwrap()
    }

    #[test]
    fn test_anchor_expressions() {
        let offset = PixelOffset::new(5, 7);
        let expected = [
            (Anchor::TopLeft, "5:7"),
            (Anchor::TopRight, "main_w-overlay_w-5:7"),
            (Anchor::BottomLeft, "5:main_h-overlay_h-7"),
            (Anchor::BottomRight, "main_w-overlay_w-5:main_h-overlay_h-7"),
            (Anchor::Center, "(main_w-overlay_w)/2-5:(main_h-overlay_h)/2-7"),
            (Anchor::MiddleLeft, "5:(main_h-overlay_h)/2-7"),
            (Anchor::MiddleRight, "main_w-overlay_w-5:(main_h-overlay_h)/2-7"),
            (Anchor::CenterTop, "(main_w-overlay_w)/2-5:7"),
            (Anchor::CenterBottom, "(main_w-overlay_w)/2-5:main_h-overlay_h-7"),
        ];
        for (anchor, expr) in expected {
            assert_eq!(anchor.position_expr(offset), expr, "{anchor}");
        }
    }

    #[test]
    fn test_anchor_from_str() {
        for anchor in Anchor::ALL {
            assert_eq!(anchor.to_string().parse::<Anchor>().unwrap(), anchor);
        }
        assert_eq!("BOTTOM_RIGHT".parse::<Anchor>().unwrap(), Anchor::BottomRight);
        assert!("middle".parse::<Anchor>().is_err());
    }

    #[test]
    fn test_crop_expr_uses_crop_variables() {
        assert_eq!(
            Anchor::BottomRight.crop_expr(PixelOffset::new(1, 2)),
            "in_w-out_w-1:in_h-out_h-2"
        );
    }

    #[test]
    fn test_end_before_start_is_rejected() {
        let result = OverlaySpec::new(
            Duration::from_secs(5),
            Duration::from_secs(4),
            FrameSize::new(10, 10),
            Anchor::Center,
            PixelOffset::default(),
            OverlayKind::Ellipse,
        );
        assert!(matches!(result, Err(CoreError::InvalidInput(_))));
    }

    #[test]
    fn test_fragments() {
        let mut spec = overlay(1_000, 2_500);
        assert_eq!(spec.input_clause(), None);
        spec.asset = Some(PathBuf::from("/tmp/a.png"));
        assert_eq!(spec.input_clause().as_deref(), Some("-i \"/tmp/a.png\""));
        assert_eq!(spec.filter_clause(), "overlay=10:20:enable='between(t,1.000,2.500)'");
    }

    #[test]
    fn test_equality_ignores_id_kind_and_asset() {
        let a = overlay(0, 1_000);
        let mut b = overlay(0, 1_000);
        b.kind = OverlayKind::BlurredRectangle;
        b.asset = Some(PathBuf::from("x.png"));
        assert_ne!(a.id, b.id);
        assert_eq!(a, b);

        let mut c = overlay(0, 1_000);
        c.offset = PixelOffset::new(0, 0);
        assert_ne!(a, c);
    }

    #[test]
    fn test_dedup_keeps_first_occurrence_in_order() {
        let first = overlay(0, 1_000);
        let second = overlay(2_000, 3_000);
        let duplicate = overlay(0, 1_000);
        let kept = dedup_overlays(vec![first.clone(), second.clone(), duplicate]);
        let ids: Vec<Uuid> = kept.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
    }

    #[test]
    fn test_deserialize_from_json() {
        let json = r#"{"start": 1500, "end": 3000, "size": {"width": 64, "height": 32},
                       "position": "bottom_right", "kind": "blurred_rectangle"}"#;
        let spec: OverlaySpec = serde_json::from_str(json).unwrap();
        assert_eq!(spec.start, Duration::from_millis(1_500));
        assert_eq!(spec.position, Anchor::BottomRight);
        assert_eq!(spec.kind, OverlayKind::BlurredRectangle);
        assert_eq!(spec.offset, PixelOffset::default());
        assert!(spec.asset.is_none());
    }
}
