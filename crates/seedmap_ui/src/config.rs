//! # Viewport Configuration
//!
//! ```toml
//! min_zoom = 0.5
//! max_zoom = 2.0
//! zoom_step = 0.1
//! initial_zoom = 1.0
//! detection_radius_px = 12.0
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ViewportError, ViewportResult};

/// Zoom limits and picking tolerance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewportConfig {
    /// Smallest zoom factor.
    pub min_zoom: f64,
    /// Largest zoom factor.
    pub max_zoom: f64,
    /// Zoom change per wheel notch or button press.
    pub zoom_step: f64,
    /// Zoom after construction and `reset_view`.
    pub initial_zoom: f64,
    /// Click tolerance in screen pixels.
    pub detection_radius_px: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            min_zoom: 0.5,
            max_zoom: 2.0,
            zoom_step: 0.1,
            initial_zoom: 1.0,
            detection_radius_px: 12.0,
        }
    }
}

impl ViewportConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for malformed TOML or inconsistent values.
    pub fn from_toml_str(text: &str) -> ViewportResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| ViewportError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the file cannot be read or is invalid.
    pub fn from_toml_file(path: impl AsRef<Path>) -> ViewportResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ViewportError::InvalidConfig(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Checks that the zoom range is positive and ordered.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` naming the offending key.
    pub fn validate(&self) -> ViewportResult<()> {
        let finite = [
            ("min_zoom", self.min_zoom),
            ("max_zoom", self.max_zoom),
            ("zoom_step", self.zoom_step),
            ("initial_zoom", self.initial_zoom),
            ("detection_radius_px", self.detection_radius_px),
        ];
        if let Some((key, value)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ViewportError::InvalidConfig(format!(
                "{key} must be finite, got {value}"
            )));
        }
        if self.min_zoom <= 0.0 {
            return Err(ViewportError::InvalidConfig(format!(
                "min_zoom must be positive, got {}",
                self.min_zoom
            )));
        }
        if self.max_zoom < self.min_zoom {
            return Err(ViewportError::InvalidConfig(format!(
                "max_zoom ({}) is below min_zoom ({})",
                self.max_zoom, self.min_zoom
            )));
        }
        if !(self.min_zoom..=self.max_zoom).contains(&self.initial_zoom) {
            return Err(ViewportError::InvalidConfig(format!(
                "initial_zoom {} outside [{}, {}]",
                self.initial_zoom, self.min_zoom, self.max_zoom
            )));
        }
        if self.zoom_step <= 0.0 {
            return Err(ViewportError::InvalidConfig(
                "zoom_step must be positive".to_string(),
            ));
        }
        if self.detection_radius_px < 0.0 {
            return Err(ViewportError::InvalidConfig(
                "detection_radius_px must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}
