//! Board configuration.

use crate::scale::{ScaleError, Viewport, check_range};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Settings for a board: viewport geometry, zoom and colors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub viewport_width: f64,
    pub viewport_height: f64,
    /// Pixels kept free on each side of the plot area.
    pub margin: f64,
    /// Initial half-width of the visible domain.
    pub range: f64,
    /// Largest range the zoom control offers; drives grid dash density.
    pub max_range: f64,
    /// Seed the shape list with the two base vector indicators.
    pub show_base_vectors: bool,
    pub base_i_color: String,
    pub base_j_color: String,
    pub grid_color: String,
    pub axis_color: String,
    pub background_color: String,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            viewport_width: 400.0,
            viewport_height: 400.0,
            margin: 20.0,
            range: 15.0,
            max_range: 30.0,
            show_base_vectors: true,
            base_i_color: "#2e7d32".to_string(),
            base_j_color: "#c62828".to_string(),
            grid_color: "#cccccc".to_string(),
            axis_color: "#333333".to_string(),
            background_color: "#fafafa".to_string(),
        }
    }
}

impl BoardConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        log::info!("Loaded board configuration from {}", path.display());
        Self::from_json_str(&json)
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.viewport_width, self.viewport_height, self.margin)
    }

    /// Check that the viewport and ranges produce valid axis scales.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.viewport()
            .scales(self.range)
            .map_err(|e: ScaleError| ConfigError::Invalid(e.to_string()))?;
        if !(self.max_range.is_finite() && self.max_range > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "max_range must be positive, got {}",
                self.max_range
            )));
        }
        check_range(self.range, self.max_range).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(())
    }
}
