//! Pixel geometry shared by requests, overlays and probe results.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Width and height in pixels. A zero-area size means "unset" for
/// requests and "skip" for overlays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when either side is zero.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl fmt::Display for FrameSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for FrameSize {
    type Err = CoreError;

    /// Parses `WIDTHxHEIGHT`, e.g. `1280x720`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::InvalidInput(format!("invalid frame size '{s}', expected WxH"));
        let (width, height) = s.trim().split_once(['x', 'X']).ok_or_else(invalid)?;
        Ok(Self::new(
            width.parse().map_err(|_| invalid())?,
            height.parse().map_err(|_| invalid())?,
        ))
    }
}

/// Pixel offset from an anchor point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelOffset {
    pub x: i32,
    pub y: i32,
}

impl PixelOffset {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_size_display() {
        assert_eq!(FrameSize::new(640, 480).to_string(), "640x480");
    }

    #[test]
    fn test_frame_size_is_empty() {
        assert!(FrameSize::default().is_empty());
        assert!(FrameSize::new(0, 480).is_empty());
        assert!(FrameSize::new(640, 0).is_empty());
        assert!(!FrameSize::new(1, 1).is_empty());
    }

    #[test]
    fn test_frame_size_from_str() {
        assert_eq!("1280x720".parse::<FrameSize>().unwrap(), FrameSize::new(1280, 720));
        assert_eq!(" 64X48 ".parse::<FrameSize>().unwrap(), FrameSize::new(64, 48));
        assert!("1280".parse::<FrameSize>().is_err());
        assert!("axb".parse::<FrameSize>().is_err());
        assert!("-1x5".parse::<FrameSize>().is_err());
    }
}
