//! Configuration for ffdrive-core.
//!
//! Values are resolved in layers: built-in defaults, then an optional TOML
//! file, then `FFDRIVE_*` environment variables. [`CoreConfig::load`] applies
//! all three and validates the result.

mod builder;
mod utils;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

pub use builder::CoreConfigBuilder;
pub use utils::{get_env_opt_path, get_env_path, get_env_u32, get_env_u64, get_env_usize};

// Default constants

/// Default filter-graph character budget for one ffmpeg pass. Stays well
/// under the 8191-character command-line ceiling of the Windows shell.
pub const DEFAULT_MAX_FILTER_GRAPH_CHARS: usize = 8000;

/// Largest overlay asset that will be rasterized (8K UHD).
pub const DEFAULT_MAX_OVERLAY_WIDTH: u32 = 7680;
pub const DEFAULT_MAX_OVERLAY_HEIGHT: u32 = 4320;

/// Number of recent diagnostic outputs kept for inspection.
pub const DEFAULT_DIAGNOSTIC_HISTORY: usize = crate::external::DEFAULT_HISTORY_CAPACITY;

/// Blur strength (gaussian sigma) for blurred-rectangle overlays.
pub const DEFAULT_BLUR_RADIUS: u32 = 10;

// Environment variable names

pub const ENV_FFMPEG_PATH: &str = "FFDRIVE_FFMPEG_PATH";
pub const ENV_WORKING_DIR: &str = "FFDRIVE_WORKING_DIR";
pub const ENV_TEMP_DIR: &str = "FFDRIVE_TEMP_DIR";
pub const ENV_MAX_FILTER_GRAPH_CHARS: &str = "FFDRIVE_MAX_FILTER_GRAPH_CHARS";
pub const ENV_MAX_OVERLAY_WIDTH: &str = "FFDRIVE_MAX_OVERLAY_WIDTH";
pub const ENV_MAX_OVERLAY_HEIGHT: &str = "FFDRIVE_MAX_OVERLAY_HEIGHT";
pub const ENV_DIAGNOSTIC_HISTORY: &str = "FFDRIVE_DIAGNOSTIC_HISTORY";
pub const ENV_TIMEOUT_SECS: &str = "FFDRIVE_TIMEOUT_SECS";
pub const ENV_BLUR_RADIUS: &str = "FFDRIVE_BLUR_RADIUS";

/// Main configuration structure for ffdrive-core.
///
/// # Examples
///
/// ```rust
/// use ffdrive_core::config::CoreConfigBuilder;
///
/// let config = CoreConfigBuilder::new()
///     .ffmpeg_path("/usr/local/bin/ffmpeg")
///     .max_filter_graph_chars(4000)
///     .timeout_secs(600)
///     .build()
///     .unwrap();
/// assert_eq!(config.max_filter_graph_chars, 4000);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// ffmpeg executable to run.
    pub ffmpeg_path: PathBuf,

    /// Working directory for ffmpeg; inherited when unset.
    pub working_dir: Option<PathBuf>,

    /// Where intermediate artifacts go; the system temp dir when unset.
    pub temp_dir: Option<PathBuf>,

    /// Filter-graph character budget for one overlay pass.
    pub max_filter_graph_chars: usize,

    pub max_overlay_width: u32,
    pub max_overlay_height: u32,

    /// Capacity of the diagnostic history ring buffer.
    pub diagnostic_history: usize,

    /// Kill ffmpeg after this many seconds. No limit when unset.
    pub timeout_secs: Option<u64>,

    pub blur_radius: u32,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: ffmpeg_sidecar::paths::ffmpeg_path(),
            working_dir: None,
            temp_dir: None,
            max_filter_graph_chars: DEFAULT_MAX_FILTER_GRAPH_CHARS,
            max_overlay_width: DEFAULT_MAX_OVERLAY_WIDTH,
            max_overlay_height: DEFAULT_MAX_OVERLAY_HEIGHT,
            diagnostic_history: DEFAULT_DIAGNOSTIC_HISTORY,
            timeout_secs: None,
            blur_radius: DEFAULT_BLUR_RADIUS,
        }
    }
}

impl CoreConfig {
    /// Defaults, then `path` if given, then the environment; validated.
    pub fn load(path: Option<&Path>) -> CoreResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Reads a TOML file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> CoreResult<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            CoreError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> CoreResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Overrides fields from `FFDRIVE_*` variables. Unparseable values are
    /// ignored and the current value kept.
    pub fn apply_env_overrides(&mut self) {
        self.ffmpeg_path = get_env_path(ENV_FFMPEG_PATH, self.ffmpeg_path.clone());
        self.working_dir = get_env_opt_path(ENV_WORKING_DIR, self.working_dir.take());
        self.temp_dir = get_env_opt_path(ENV_TEMP_DIR, self.temp_dir.take());
        self.max_filter_graph_chars =
            get_env_usize(ENV_MAX_FILTER_GRAPH_CHARS, self.max_filter_graph_chars);
        self.max_overlay_width = get_env_u32(ENV_MAX_OVERLAY_WIDTH, self.max_overlay_width);
        self.max_overlay_height = get_env_u32(ENV_MAX_OVERLAY_HEIGHT, self.max_overlay_height);
        self.diagnostic_history = get_env_usize(ENV_DIAGNOSTIC_HISTORY, self.diagnostic_history);
        let timeout = get_env_u64(ENV_TIMEOUT_SECS, self.timeout_secs.unwrap_or(0));
        self.timeout_secs = (timeout > 0).then_some(timeout);
        self.blur_radius = get_env_u32(ENV_BLUR_RADIUS, self.blur_radius);
    }

    pub fn validate(&self) -> CoreResult<()> {
        if self.ffmpeg_path.as_os_str().is_empty() {
            return Err(CoreError::Config("ffmpeg_path cannot be empty".to_string()));
        }
        if self.max_filter_graph_chars == 0 {
            return Err(CoreError::Config(
                "max_filter_graph_chars must be greater than zero".to_string(),
            ));
        }
        if self.max_overlay_width == 0 || self.max_overlay_height == 0 {
            return Err(CoreError::Config(
                "overlay size limits must be greater than zero".to_string(),
            ));
        }
        if self.diagnostic_history == 0 {
            return Err(CoreError::Config(
                "diagnostic_history must be greater than zero".to_string(),
            ));
        }
        if self.timeout_secs == Some(0) {
            return Err(CoreError::Config(
                "timeout_secs must be greater than zero when set".to_string(),
            ));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Directory for intermediate artifacts.
    pub fn temp_base_dir(&self) -> PathBuf {
        self.temp_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = CoreConfig::default();
        assert_eq!(config.max_filter_graph_chars, 8000);
        assert_eq!(config.max_overlay_width, 7680);
        assert_eq!(config.max_overlay_height, 4320);
        assert_eq!(config.diagnostic_history, 25);
        assert_eq!(config.timeout(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = CoreConfig::from_toml_str(
            r#"
            ffmpeg_path = "/opt/ffmpeg/bin/ffmpeg"
            max_filter_graph_chars = 2048
            timeout_secs = 30
            "#,
        )
        .unwrap();
        assert_eq!(config.ffmpeg_path, PathBuf::from("/opt/ffmpeg/bin/ffmpeg"));
        assert_eq!(config.max_filter_graph_chars, 2048);
        assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.blur_radius, DEFAULT_BLUR_RADIUS);
    }

    #[test]
    fn test_bad_toml_is_parse_error() {
        let err = CoreConfig::from_toml_str("max_filter_graph_chars = \"lots\"").unwrap_err();
        assert!(matches!(err, CoreError::ConfigParse(_)));
    }

    #[test]
    fn test_from_file_missing() {
        let tmp = tempdir().unwrap();
        let err = CoreConfig::from_file(&tmp.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));
    }

    #[test]
    fn test_validate_rejects_zero_budget() {
        let config = CoreConfig {
            max_filter_graph_chars: 0,
            ..CoreConfig::default()
        };
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));
    }

    #[test]
    fn test_temp_base_dir_falls_back_to_system() {
        let config = CoreConfig::default();
        assert_eq!(config.temp_base_dir(), std::env::temp_dir());
    }
}
