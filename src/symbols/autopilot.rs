//! Flight-director cues and the boresight reticle.

use super::{DrawContext, HudRenderer};
use crate::{
    canvas::{Canvas, Stroke},
    geometry::{self, D2R, R2D},
    projection::{Pixel, all_visible},
    style::Rgb,
};
use log::trace;

/// Bearing of the v-bar tips from the centre line, in degrees.
const VBAR_SPAN: f64 = 10.0;
/// Pitch of the v-bar notch below the commanded pitch, in degrees.
const VBAR_NOTCH: f64 = 1.5;
/// Depth of the v-bar wedge, in degrees.
const VBAR_DEPTH: f64 = 3.0;

const BIRD_SPAN: f64 = 10.0;
const BIRD_DEPTH: f64 = 3.0;

/// (pitch, bearing) of the heading bug outline, in degrees, starting at the right corner.
const HEADING_BUG: [(f64, f64); 7] = [
    (0.0, 2.0),
    (0.0, -2.0),
    (1.5, -2.0),
    (1.5, -1.0),
    (0.0, 0.0),
    (1.5, 1.0),
    (1.5, 2.0),
];

/// Lines of a filled-in wedge: the centre to each outer corner, then the triangle itself.
fn wedge(canvas: &mut impl Canvas, center: Pixel, [a, b, c]: [Pixel; 3], color: Rgb, width: u32) {
    canvas.line(center, a, color, width);
    canvas.line(center, c, color, width);
    canvas.line(a, b, color, width);
    canvas.line(a, c, color, width);
    canvas.line(b, c, color, width);
}

impl HudRenderer {
    /// Draws the commanded-attitude v-bars, banked about the nose by the commanded roll.
    pub fn draw_vbars(&self, canvas: &mut impl Canvas, ctx: &DrawContext) {
        let q0 = ctx.heading();
        let targets = ctx.telemetry.autopilot();
        let pitch = targets.pitch_deg;
        let roll = targets.roll();
        let nose_pitch = ctx.telemetry.attitude().pitch * R2D;

        let Some([anchor, center]) = all_visible([
            ctx.ladder_point(&q0, nose_pitch, 0.0),
            ctx.ladder_point(&q0, pitch, 0.0),
        ]) else {
            trace!("v-bars are out of view");
            return;
        };
        let center = geometry::rotate_about(center, anchor, roll);

        for side in [1.0, -1.0] {
            let corners = all_visible([
                ctx.ladder_point(&q0, pitch - VBAR_DEPTH, side * VBAR_SPAN),
                ctx.ladder_point(&q0, pitch - VBAR_DEPTH, side * (VBAR_SPAN + VBAR_DEPTH)),
                ctx.ladder_point(&q0, pitch - VBAR_NOTCH, side * (VBAR_SPAN + VBAR_DEPTH)),
            ]);

            match corners {
                Some(corners) => wedge(
                    canvas,
                    center,
                    corners.map(|p| geometry::rotate_about(p, anchor, roll)),
                    Rgb::MEDIUM_ORCHID,
                    ctx.style.line_width(),
                ),
                None => trace!("v-bar wedge is out of view"),
            }
        }
    }

    /// Draws a notch on the horizon at the commanded heading.
    pub fn draw_heading_bug(&self, canvas: &mut impl Canvas, ctx: &DrawContext) {
        let q0 = geometry::heading(ctx.telemetry.autopilot().heading());
        let outline = HEADING_BUG.map(|(pitch, bearing)| ctx.ladder_point(&q0, pitch, bearing));
        match all_visible(outline) {
            Some(outline) => canvas.polygon(
                &outline,
                Rgb::MEDIUM_ORCHID,
                ctx.style.line_width(),
                Stroke::Outline,
            ),
            None => trace!("heading bug is out of view"),
        }
    }

    /// Draws the aircraft symbol at the current pitch and heading, banked by the current roll.
    pub fn draw_bird(&self, canvas: &mut impl Canvas, ctx: &DrawContext) {
        let q0 = ctx.heading();
        let attitude = ctx.telemetry.attitude();
        let pitch = attitude.pitch * R2D;
        let width = ctx.style.line_width();

        let Some(center) = ctx.ladder_point(&q0, pitch, 0.0).visible() else {
            trace!("flight director bird is out of view");
            return;
        };

        for side in [1.0, -1.0] {
            let wing = all_visible([
                ctx.ladder_point(&q0, pitch - BIRD_DEPTH, side * BIRD_SPAN),
                ctx.ladder_point(&q0, pitch - BIRD_DEPTH, side * (BIRD_SPAN - BIRD_DEPTH)),
            ]);

            if let Some(wing) = wing {
                let [tip, root] = wing.map(|p| geometry::rotate_about(p, center, attitude.roll));
                canvas.line(center, tip, Rgb::YELLOW, width);
                canvas.line(center, root, Rgb::YELLOW, width);
                canvas.line(tip, root, Rgb::YELLOW, width);
            }
        }
    }

    /// Draws a chevron on the horizon along the smoothed ground track.
    pub fn draw_course(&mut self, canvas: &mut impl Canvas, ctx: &DrawContext) {
        let course = self.course_filter.update(ctx.telemetry.velocity());
        let track = course.y.atan2(course.x);
        let q0 = geometry::heading(track);
        let roll = -ctx.style.camera_roll_deg() * D2R;

        let Some([tip, right, left]) = all_visible([
            ctx.ladder_point(&q0, 0.0, 0.0),
            ctx.ladder_point(&q0, 1.5, 1.0),
            ctx.ladder_point(&q0, 1.5, -1.0),
        ]) else {
            trace!("course pointer is out of view");
            return;
        };

        let width = ctx.style.line_width();
        canvas.line(tip, geometry::rotate_about(right, tip, roll), Rgb::YELLOW, width);
        canvas.line(tip, geometry::rotate_about(left, tip, roll), Rgb::YELLOW, width);
    }

    /// Draws two rings where the body x axis points.
    pub fn draw_nose(&self, canvas: &mut impl Canvas, ctx: &DrawContext) {
        let height = ctx.render_height(canvas.size().1) as f64;
        let inner = (height / 80.0).round() as i32;
        let outer = (height / 40.0).round() as i32;

        match ctx.project_offset(&ctx.telemetry.attitude().nose()).visible() {
            Some(center) => {
                canvas.circle(center, inner, ctx.style.color(), ctx.style.line_width());
                canvas.circle(center, outer, ctx.style.color(), ctx.style.line_width());
            }
            None => trace!("nose reticle is out of view"),
        }
    }
}
