use serde::{Deserialize, Serialize};

use crate::consts::{
    CT_WINDOW_CENTER, CT_WINDOW_WIDTH, DEFAULT_DRAG_ZOOM_SENSITIVITY, DEFAULT_HIT_TOLERANCE_PX,
    DEFAULT_MAX_HISTORY, DEFAULT_MAX_ZOOM, DEFAULT_MEASUREMENT_COLOR, DEFAULT_MIN_ZOOM,
    DEFAULT_WHEEL_ZOOM_SENSITIVITY, MR_WINDOW_CENTER, MR_WINDOW_WIDTH, OTHER_WINDOW_CENTER,
    OTHER_WINDOW_WIDTH,
};
use crate::error::{MeridianError, Result};
use crate::measurement::MeasurementScope;
use crate::types::WindowLevel;

/// Top-level viewer configuration. Every section falls back to its default
/// when omitted from a config file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    #[serde(default)]
    pub viewport: ViewportConfig,
    #[serde(default)]
    pub measurement: MeasurementConfig,
    #[serde(default)]
    pub window_presets: WindowLevelPresets,
}

impl ViewerConfig {
    /// Reject settings the state containers cannot honor.
    pub fn validate(&self) -> Result<()> {
        let v = &self.viewport;
        if !(v.min_zoom.is_finite() && v.max_zoom.is_finite()) || v.min_zoom <= 0.0 {
            return Err(MeridianError::InvalidConfig(format!(
                "zoom range must be positive and finite, got [{}, {}]",
                v.min_zoom, v.max_zoom
            )));
        }
        if v.min_zoom > v.max_zoom {
            return Err(MeridianError::InvalidConfig(format!(
                "min_zoom {} exceeds max_zoom {}",
                v.min_zoom, v.max_zoom
            )));
        }
        if !(self.measurement.hit_tolerance_px >= 0.0) {
            return Err(MeridianError::InvalidConfig(format!(
                "hit_tolerance_px must be >= 0, got {}",
                self.measurement.hit_tolerance_px
            )));
        }
        for (name, wl) in [
            ("ct", self.window_presets.ct),
            ("mr", self.window_presets.mr),
            ("other", self.window_presets.other),
        ] {
            if !(wl.width > 0.0) {
                return Err(MeridianError::InvalidConfig(format!(
                    "window preset '{name}' must have a positive width, got {}",
                    wl.width
                )));
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Exponential zoom factor per wheel unit.
    pub wheel_zoom_sensitivity: f64,
    /// Exponential zoom factor per pixel of vertical drag with the zoom tool.
    pub drag_zoom_sensitivity: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
            wheel_zoom_sensitivity: DEFAULT_WHEEL_ZOOM_SENSITIVITY,
            drag_zoom_sensitivity: DEFAULT_DRAG_ZOOM_SENSITIVITY,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasurementConfig {
    /// Click radius in screen pixels.
    pub hit_tolerance_px: f64,
    pub default_color: String,
    pub default_scope: MeasurementScope,
    pub max_history: usize,
}

impl Default for MeasurementConfig {
    fn default() -> Self {
        Self {
            hit_tolerance_px: DEFAULT_HIT_TOLERANCE_PX,
            default_color: DEFAULT_MEASUREMENT_COLOR.to_string(),
            default_scope: MeasurementScope::Frame,
            max_history: DEFAULT_MAX_HISTORY,
        }
    }
}

/// Initial window/level applied when a volume of a given modality is loaded.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowLevelPresets {
    pub ct: WindowLevel,
    pub mr: WindowLevel,
    pub other: WindowLevel,
}

impl WindowLevelPresets {
    pub fn for_modality(&self, modality: &str) -> WindowLevel {
        match modality.trim().to_ascii_uppercase().as_str() {
            "CT" => self.ct,
            "MR" => self.mr,
            _ => self.other,
        }
    }
}

impl Default for WindowLevelPresets {
    fn default() -> Self {
        Self {
            ct: WindowLevel::new(CT_WINDOW_CENTER, CT_WINDOW_WIDTH),
            mr: WindowLevel::new(MR_WINDOW_CENTER, MR_WINDOW_WIDTH),
            other: WindowLevel::new(OTHER_WINDOW_CENTER, OTHER_WINDOW_WIDTH),
        }
    }
}
