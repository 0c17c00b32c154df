//! JSON configuration for the renderer.

use crate::{
    error::HudError,
    style::{RenderStyle, Rgb},
    symbols::GeoMarker,
    telemetry::{AltitudeUnit, SpeedUnit},
};
use log::debug;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Every field is optional and falls back to the renderer defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HudConfig {
    pub line_width: u32,
    pub color: Rgb,
    pub font_scale: f64,
    pub speed_unit: SpeedUnit,
    pub altitude_unit: AltitudeUnit,
    pub render_size: Option<(u32, u32)>,
    /// Roll of the camera mount relative to the airframe, in degrees.
    pub camera_roll_deg: f64,
    pub points_of_interest: Vec<GeoMarker>,
}

impl Default for HudConfig {
    fn default() -> Self {
        Self {
            line_width: 1,
            color: Rgb::GREEN2,
            font_scale: 0.6,
            speed_unit: SpeedUnit::Knots,
            altitude_unit: AltitudeUnit::Feet,
            render_size: None,
            camera_roll_deg: 0.0,
            points_of_interest: Vec::new(),
        }
    }
}

impl HudConfig {
    pub fn from_json_str(json: &str) -> Result<Self, HudError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, HudError> {
        let path = path.as_ref();
        let config = Self::from_json_str(&fs::read_to_string(path)?)?;
        debug!(
            "loaded HUD config from {} with {} points of interest",
            path.display(),
            config.points_of_interest.len()
        );

        Ok(config)
    }

    /// Builds the style this configuration describes, clamping out-of-range values.
    pub fn style(&self) -> RenderStyle {
        let mut style = RenderStyle::default();
        style.set_line_width(self.line_width);
        style.set_color(self.color);
        style.set_font_scale(self.font_scale);
        style.set_units(self.speed_unit, self.altitude_unit);
        if let Some((width, height)) = self.render_size {
            style.set_render_size(width, height);
        }
        style.set_camera_roll_deg(self.camera_roll_deg);
        style
    }
}
