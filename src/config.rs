//! Card configuration.
//!
//! Every section has defaults matching the stock card layout, so an
//! empty TOML file (or no file at all) yields a working configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Upper bound on the number of device indices probed.
pub const MAX_PROBE_COUNT: u32 = 16;

/// Width and height of a surface, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Size {
    /// Creates a new size.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Configuration for camera probing and frame capture.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Number of device indices probed on entry to QR mode, starting at 0.
    pub probe_count: u32,
    /// Period between frame ticks while scanning, in milliseconds.
    pub tick_interval_ms: u64,
    /// Requested frame width in pixels.
    pub width: u32,
    /// Requested frame height in pixels.
    pub height: u32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            probe_count: 4,
            tick_interval_ms: 20,
            width: 640,
            height: 480,
        }
    }
}

impl CaptureConfig {
    /// Creates a new configuration with the specified dimensions.
    pub fn with_dimensions(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Returns the tick period as a [`Duration`].
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidDimensions);
        }
        if self.probe_count == 0 || self.probe_count > MAX_PROBE_COUNT {
            return Err(ConfigError::InvalidProbeCount(self.probe_count));
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::InvalidTickInterval);
        }
        Ok(())
    }
}

/// Surface sizes for each card layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Card size while in password mode.
    pub password: Size,
    /// Card size while in QR mode.
    pub qr: Size,
    /// Area the viewfinder image is scaled into.
    pub viewfinder: Size,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            password: Size::new(420, 280),
            qr: Size::new(420, 420),
            viewfinder: Size::new(370, 290),
        }
    }
}

impl LayoutConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.password.is_empty() || self.qr.is_empty() || self.viewfinder.is_empty() {
            return Err(ConfigError::InvalidLayout);
        }
        Ok(())
    }
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct OutputConfig {
    /// Metrics server port (0 to disable).
    pub metrics_port: u16,
}

/// Configuration validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// Frame width or height is zero.
    #[error("invalid frame dimensions")]
    InvalidDimensions,
    /// Probe count outside 1-16.
    #[error("invalid probe count {0} (must be 1-16)")]
    InvalidProbeCount(u32),
    /// Tick interval of zero.
    #[error("invalid tick interval (must be at least 1 ms)")]
    InvalidTickInterval,
    /// A surface size is zero.
    #[error("layout sizes must be non-zero")]
    InvalidLayout,
    /// The file could not be read.
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    /// The file is not valid TOML for this schema.
    #[error("failed to parse config file: {0}")]
    ParseError(String),
}

/// Full configuration file format.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CardConfig {
    /// Camera probing and tick settings.
    #[serde(default)]
    pub capture: CaptureConfig,
    /// Surface sizes.
    #[serde(default)]
    pub layout: LayoutConfig,
    /// Exporter settings.
    #[serde(default)]
    pub output: OutputConfig,
}

impl CardConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        Self::from_toml(&content)
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: CardConfig =
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.capture.validate()?;
        self.layout.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = CardConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.capture.probe_count, 4);
        assert_eq!(config.capture.tick_interval(), Duration::from_millis(20));
    }

    #[test]
    fn test_zero_dimensions_invalid() {
        let mut config = CaptureConfig::default();
        config.width = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidDimensions)
        ));
    }

    #[test]
    fn test_probe_count_bounds() {
        let mut config = CaptureConfig::default();
        config.probe_count = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidProbeCount(0))
        ));
        config.probe_count = MAX_PROBE_COUNT + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = CardConfig::from_toml(
            r#"
            [capture]
            tick_interval_ms = 40

            [layout]
            qr = { width = 500, height = 500 }
            "#,
        )
        .unwrap();

        assert_eq!(config.capture.tick_interval_ms, 40);
        assert_eq!(config.capture.probe_count, 4);
        assert_eq!(config.layout.qr, Size::new(500, 500));
        assert_eq!(config.layout.password, Size::new(420, 280));
        assert_eq!(config.output.metrics_port, 0);
    }

    #[test]
    fn test_empty_layout_rejected() {
        let result = CardConfig::from_toml("[layout]\nviewfinder = { width = 0, height = 10 }\n");
        assert!(matches!(result, Err(ConfigError::InvalidLayout)));
    }

    #[test]
    fn test_malformed_toml() {
        assert!(matches!(
            CardConfig::from_toml("capture = 3"),
            Err(ConfigError::ParseError(_))
        ));
    }
}
