//! HUD symbology.
//!
//! Every routine draws onto a [`Canvas`](crate::canvas::Canvas) and reads the frame through a
//! [`DrawContext`]. A point that does not project skips the primitives that needed it, and a
//! symbol with several vertices is dropped whole if any vertex is missing.

use crate::{
    filter::LowPass,
    geometry::{self, D2R, Quaternion},
    projection::{Projection, Projector},
    style::RenderStyle,
    telemetry::Telemetry,
};
use nalgebra::Vector3;

pub mod autopilot;
pub mod conformal;
pub mod poi;
pub mod tape;

pub use poi::{GeoMarker, GroundMarker};
pub use tape::Tape;

pub const VELOCITY_FILTER_COEFFICIENT: f64 = 0.2;
pub const COURSE_FILTER_COEFFICIENT: f64 = 0.5;

/// Everything a routine reads while drawing one frame.
#[derive(Clone, Copy, Debug)]
pub struct DrawContext<'a> {
    pub telemetry: &'a Telemetry,
    pub projector: &'a Projector,
    pub style: &'a RenderStyle,
}

impl<'a> DrawContext<'a> {
    pub fn new(telemetry: &'a Telemetry, projector: &'a Projector, style: &'a RenderStyle) -> Self {
        Self {
            telemetry,
            projector,
            style,
        }
    }

    /// Projects a direction or offset relative to the aircraft position.
    pub fn project_offset(&self, offset: &Vector3<f64>) -> Projection {
        self.projector.project(&(self.telemetry.ned() + offset))
    }

    /// Projects the point `pitch_deg` above the level plane and `bearing_deg` right of the
    /// heading that `q0` describes, one metre from the aircraft.
    pub fn ladder_point(&self, q0: &Quaternion, pitch_deg: f64, bearing_deg: f64) -> Projection {
        let q1 = geometry::from_euler(-bearing_deg * D2R, -pitch_deg * D2R, 0.0);
        let direction = geometry::transform(&geometry::compose(&q1, q0), &Vector3::x());
        self.project_offset(&direction)
    }

    /// Quaternion for the current heading.
    pub fn heading(&self) -> Quaternion {
        geometry::heading(self.telemetry.attitude().yaw)
    }

    /// Height used to size screen-relative symbols.
    pub fn render_height(&self, canvas_height: u32) -> u32 {
        self.style
            .render_size()
            .map_or(canvas_height, |(_, height)| height)
    }
}

/// Owns the state that persists between frames.
///
/// Independent renderers share nothing, so several cameras can be drawn side by side.
#[derive(Clone, Debug, PartialEq)]
pub struct HudRenderer {
    velocity_filter: LowPass,
    course_filter: LowPass,
}

impl Default for HudRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl HudRenderer {
    pub fn new() -> Self {
        Self {
            velocity_filter: LowPass::new(VELOCITY_FILTER_COEFFICIENT),
            course_filter: LowPass::new(COURSE_FILTER_COEFFICIENT),
        }
    }

    pub fn filtered_velocity(&self) -> &Vector3<f64> {
        self.velocity_filter.value()
    }

    pub fn filtered_course(&self) -> &Vector3<f64> {
        self.course_filter.value()
    }
}
