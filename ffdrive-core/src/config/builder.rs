// ============================================================================
// ffdrive-core/src/config/builder.rs
// ============================================================================
//
// CONFIGURATION BUILDER: Builder Pattern for CoreConfig
//
// Fluent construction of a CoreConfig starting from the defaults. `build`
// runs the same validation as `CoreConfig::load`.

use std::path::PathBuf;

use super::CoreConfig;
use crate::error::CoreResult;

/// Builder for creating CoreConfig instances.
#[derive(Debug, Clone, Default)]
pub struct CoreConfigBuilder {
    config: CoreConfig,
}

impl CoreConfigBuilder {
    /// Creates a new builder holding the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing configuration, e.g. one loaded from a file.
    pub fn from_config(config: CoreConfig) -> Self {
        Self { config }
    }

    /// Sets the ffmpeg executable.
    pub fn ffmpeg_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.ffmpeg_path = path.into();
        self
    }

    /// Sets the directory ffmpeg runs in.
    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.working_dir = Some(dir.into());
        self
    }

    /// Sets the directory for intermediate artifacts.
    pub fn temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.temp_dir = Some(dir.into());
        self
    }

    /// Sets the filter-graph character budget for one overlay pass.
    pub fn max_filter_graph_chars(mut self, chars: usize) -> Self {
        self.config.max_filter_graph_chars = chars;
        self
    }

    /// Sets the largest overlay that will be rasterized.
    pub fn max_overlay_size(mut self, width: u32, height: u32) -> Self {
        self.config.max_overlay_width = width;
        self.config.max_overlay_height = height;
        self
    }

    /// Sets how many recent diagnostic outputs are retained.
    pub fn diagnostic_history(mut self, capacity: usize) -> Self {
        self.config.diagnostic_history = capacity;
        self
    }

    /// Sets the per-invocation time limit in seconds.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = Some(secs);
        self
    }

    pub fn blur_radius(mut self, radius: u32) -> Self {
        self.config.blur_radius = radius;
        self
    }

    /// Validates and returns the configuration.
    pub fn build(self) -> CoreResult<CoreConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
