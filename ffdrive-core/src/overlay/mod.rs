//! Timed visual overlays: description, filter-graph rendering, pass planning
//! and rasterization.

pub mod graph;
mod planner;
mod raster;
mod spec;

pub use planner::{OverlayBatch, OverlayBatchPlanner};
pub use raster::{FfmpegRasterizer, OverlayRasterizer};
pub use spec::{Anchor, OverlayKind, OverlaySpec, dedup_overlays};
