//! Core library for driving the ffmpeg command-line tool.
//!
//! The crate renders structured requests into ffmpeg command lines, splits
//! large overlay sets into chained passes that fit a filter-graph budget, and
//! parses ffmpeg's diagnostic output into typed metadata. Process execution
//! sits behind the [`external::ToolInvoker`] trait.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use ffdrive_core::{CoreConfig, FfmpegInvoker, DiagnosticHistory, MediaTranscoder};
//! use ffdrive_core::overlay::{Anchor, OverlayKind, OverlaySpec};
//! use ffdrive_core::geometry::{FrameSize, PixelOffset};
//! use std::path::Path;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let config = CoreConfig::load(None).unwrap();
//! let history = Arc::new(DiagnosticHistory::new(config.diagnostic_history));
//! let invoker = FfmpegInvoker::new(&config.ffmpeg_path, history).with_timeout(config.timeout());
//!
//! let transcoder = MediaTranscoder::open(&invoker, &config, Path::new("clip.mp4")).unwrap();
//! println!("duration: {:?}", transcoder.media().duration());
//!
//! let overlay = OverlaySpec::new(
//!     Duration::from_secs(1),
//!     Duration::from_secs(3),
//!     FrameSize::new(120, 40),
//!     Anchor::BottomRight,
//!     PixelOffset::new(16, 16),
//!     OverlayKind::BlurredRectangle,
//! )
//! .unwrap();
//! let output = transcoder.apply_overlays(vec![overlay], false).unwrap();
//! println!("written to {}", output.display());
//! ```

pub mod command;
pub mod config;
pub mod error;
pub mod external;
pub mod geometry;
pub mod media;
pub mod overlay;
pub mod probe;
pub mod temp_files;
pub mod timecode;
pub mod utils;

// Re-exports for public API
pub use command::{ComplexFilter, TranscodeRequest, assemble};
pub use config::{CoreConfig, CoreConfigBuilder};
pub use error::{CoreError, CoreResult};
pub use external::{DiagnosticHistory, FfmpegInvoker, ToolInvoker, ToolOutput, check_dependency};
pub use media::{FrameFormat, MediaFile, MediaTranscoder, probe_file};
pub use probe::ProbeResult;
pub use temp_files::{create_temp_asset, create_temp_dir};
pub use utils::format_bytes;
