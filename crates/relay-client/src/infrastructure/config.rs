//! TOML configuration for the relay client.
//!
//! The file supplies everything the engine needs at startup: the relay
//! service URL, the initial window region and click offset, and the executor
//! timing constants. Example:
//!
//! ```toml
//! [server]
//! url = "ws://127.0.0.1:3000"
//!
//! [window]
//! x = 100
//! y = 100
//! width = 800
//! height = 600
//!
//! [offset]
//! dx = 0
//! dy = 0
//!
//! [timing]
//! settle_ms = 100
//! ```
//!
//! Every field has a serde default, so a missing file or a file from an
//! older version still loads. The window region and offset are mutable at
//! runtime only through calibration, which writes the new `[window]`
//! section back here on commit.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::execute::ExecutorTuning;
use relay_core::{ClickOffset, GeometryError, Mapping, WindowRegion};

/// Default config file name, resolved relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "relay.toml";

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// The configured window region is degenerate.
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct RelayConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub offset: OffsetConfig,
    #[serde(default)]
    pub timing: TimingConfig,
}

/// Relay service connection settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    /// WebSocket URL of the relay service.
    #[serde(default = "default_server_url")]
    pub url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: default_server_url(),
        }
    }
}

/// Initial target window rectangle in screen pixels.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WindowConfig {
    #[serde(default = "default_window_x")]
    pub x: i32,
    #[serde(default = "default_window_y")]
    pub y: i32,
    #[serde(default = "default_window_width")]
    pub width: u32,
    #[serde(default = "default_window_height")]
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            x: default_window_x(),
            y: default_window_y(),
            width: default_window_width(),
            height: default_window_height(),
        }
    }
}

/// Static pixel correction applied after coordinate scaling.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct OffsetConfig {
    #[serde(default)]
    pub dx: i32,
    #[serde(default)]
    pub dy: i32,
}

/// Executor timing constants, all in milliseconds except the drag distance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimingConfig {
    #[serde(default = "default_key_hold_ms")]
    pub key_hold_ms: u64,
    #[serde(default = "default_focus_pause_ms")]
    pub focus_pause_ms: u64,
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
    #[serde(default = "default_drag_duration_ms")]
    pub drag_duration_ms: u64,
    #[serde(default = "default_drag_distance_px")]
    pub drag_distance_px: i32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            key_hold_ms: default_key_hold_ms(),
            focus_pause_ms: default_focus_pause_ms(),
            settle_ms: default_settle_ms(),
            drag_duration_ms: default_drag_duration_ms(),
            drag_distance_px: default_drag_distance_px(),
        }
    }
}

fn default_server_url() -> String {
    "ws://127.0.0.1:3000".to_string()
}

fn default_window_x() -> i32 {
    100
}

fn default_window_y() -> i32 {
    100
}

fn default_window_width() -> u32 {
    800
}

fn default_window_height() -> u32 {
    600
}

fn default_key_hold_ms() -> u64 {
    50
}

fn default_focus_pause_ms() -> u64 {
    100
}

fn default_settle_ms() -> u64 {
    100
}

fn default_drag_duration_ms() -> u64 {
    200
}

fn default_drag_distance_px() -> i32 {
    120
}

// ── Load / save / conversions ─────────────────────────────────────────────────

impl RelayConfig {
    /// Loads the config from `path`, falling back to defaults when the file
    /// does not exist yet.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Ok(toml::from_str(&text)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Writes the config to `path`.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let text = toml::to_string_pretty(self)?;
        std::fs::write(path, text).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Builds the runtime mapping, validating the window region.
    pub fn mapping(&self) -> Result<Mapping, ConfigError> {
        let region = WindowRegion::new(
            self.window.x,
            self.window.y,
            self.window.width,
            self.window.height,
        )?;
        Ok(Mapping {
            region,
            offset: ClickOffset {
                dx: self.offset.dx,
                dy: self.offset.dy,
            },
        })
    }

    /// Builds the executor tuning constants.
    pub fn tuning(&self) -> ExecutorTuning {
        ExecutorTuning {
            key_hold: Duration::from_millis(self.timing.key_hold_ms),
            focus_pause: Duration::from_millis(self.timing.focus_pause_ms),
            settle: Duration::from_millis(self.timing.settle_ms),
            drag_duration: Duration::from_millis(self.timing.drag_duration_ms),
            drag_distance_px: self.timing.drag_distance_px,
        }
    }

    /// Copies a committed calibration back into the config so it can be
    /// persisted.
    pub fn apply_mapping(&mut self, mapping: &Mapping) {
        self.window = WindowConfig {
            x: mapping.region.origin_x,
            y: mapping.region.origin_y,
            width: mapping.region.width,
            height: mapping.region.height,
        };
        self.offset = OffsetConfig {
            dx: mapping.offset.dx,
            dy: mapping.offset.dy,
        };
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_loads_all_defaults() {
        let config: RelayConfig = toml::from_str("").unwrap();
        assert_eq!(config, RelayConfig::default());
        assert_eq!(config.server.url, "ws://127.0.0.1:3000");
        assert_eq!(config.window.width, 800);
        assert_eq!(config.timing.settle_ms, 100);
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let config: RelayConfig = toml::from_str(
            r#"
            [window]
            x = 250
            width = 1024
            "#,
        )
        .unwrap();
        assert_eq!(config.window.x, 250);
        assert_eq!(config.window.width, 1024);
        assert_eq!(config.window.y, 100);
        assert_eq!(config.window.height, 600);
    }

    #[test]
    fn test_mapping_rejects_degenerate_window() {
        let config: RelayConfig = toml::from_str(
            r#"
            [window]
            width = 0
            "#,
        )
        .unwrap();
        assert!(matches!(config.mapping(), Err(ConfigError::Geometry(_))));
    }

    #[test]
    fn test_round_trip_through_toml() {
        let mut config = RelayConfig::default();
        config.apply_mapping(&Mapping {
            region: WindowRegion::new(10, 20, 640, 480).unwrap(),
            offset: ClickOffset { dx: -2, dy: 6 },
        });

        let text = toml::to_string_pretty(&config).unwrap();
        let reloaded: RelayConfig = toml::from_str(&text).unwrap();
        assert_eq!(reloaded, config);
        assert_eq!(reloaded.window.width, 640);
        assert_eq!(reloaded.offset.dy, 6);
    }

    #[test]
    fn test_tuning_settle_is_nonzero_by_default() {
        let tuning = RelayConfig::default().tuning();
        assert!(tuning.settle > Duration::ZERO);
    }
}
