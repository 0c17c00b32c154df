use crate::telemetry::{AltitudeUnit, SpeedUnit};
use log::warn;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub const MIN_LINE_WIDTH: u32 = 1;
pub const MIN_FONT_SCALE: f64 = 0.4;

/// An 8-bit colour, red first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const GREEN2: Rgb = Rgb(0, 238, 0);
    pub const MEDIUM_ORCHID: Rgb = Rgb(186, 85, 211);
    pub const YELLOW: Rgb = Rgb(255, 255, 50);
}

impl Default for Rgb {
    fn default() -> Self {
        Rgb::GREEN2
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Rgb(r, g, b)
    }
}

/// How symbology is drawn. Read-only while a frame is drawn.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderStyle {
    line_width: u32,
    color: Rgb,
    font_scale: f64,
    speed_unit: SpeedUnit,
    altitude_unit: AltitudeUnit,
    render_size: Option<(u32, u32)>,
    camera_roll_deg: f64,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            line_width: 1,
            color: Rgb::default(),
            font_scale: 0.6,
            speed_unit: SpeedUnit::default(),
            altitude_unit: AltitudeUnit::default(),
            render_size: None,
            camera_roll_deg: 0.0,
        }
    }
}

impl RenderStyle {
    pub fn set_line_width(&mut self, line_width: u32) {
        if line_width < MIN_LINE_WIDTH {
            warn!("line width {line_width} is below {MIN_LINE_WIDTH}, clamping");
        }
        self.line_width = line_width.max(MIN_LINE_WIDTH);
    }

    pub fn set_color(&mut self, color: Rgb) {
        self.color = color;
    }

    /// Sets the font scale, clamping to [`MIN_FONT_SCALE`]. A non-finite scale is replaced by
    /// the floor as well.
    pub fn set_font_scale(&mut self, font_scale: f64) {
        if !font_scale.is_finite() || font_scale < MIN_FONT_SCALE {
            warn!("font scale {font_scale} is below {MIN_FONT_SCALE}, clamping");
            self.font_scale = MIN_FONT_SCALE;
            return;
        }
        self.font_scale = font_scale;
    }

    pub fn set_units(&mut self, speed_unit: SpeedUnit, altitude_unit: AltitudeUnit) {
        self.speed_unit = speed_unit;
        self.altitude_unit = altitude_unit;
    }

    pub fn set_render_size(&mut self, width: u32, height: u32) {
        self.render_size = Some((width, height));
    }

    pub fn set_camera_roll_deg(&mut self, camera_roll_deg: f64) {
        self.camera_roll_deg = camera_roll_deg;
    }

    pub fn line_width(&self) -> u32 {
        self.line_width
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn font_scale(&self) -> f64 {
        self.font_scale
    }

    pub fn speed_unit(&self) -> SpeedUnit {
        self.speed_unit
    }

    pub fn altitude_unit(&self) -> AltitudeUnit {
        self.altitude_unit
    }

    pub fn render_size(&self) -> Option<(u32, u32)> {
        self.render_size
    }

    pub fn camera_roll_deg(&self) -> f64 {
        self.camera_roll_deg
    }
}
