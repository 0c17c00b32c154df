//! World-locked symbology: horizon, compass ticks, pitch ladder and velocity vector.

use super::{DrawContext, HudRenderer};
use crate::{
    canvas::{Canvas, VAlign},
    geometry::{D2R, Quaternion},
    projection::{Pixel, all_visible},
};
use log::trace;
use nalgebra::Vector3;

pub const HORIZON_DIVISIONS: usize = 10;
pub const COMPASS_TICKS: usize = 12;
pub const COMPASS_TICK_HEIGHT: f64 = 0.02;
pub const COMPASS_LABEL_HEIGHT: f64 = 0.03;

/// Pitch bands drawn on the ladder, in degrees. Each is drawn above and below the horizon.
pub const LADDER_BANDS: [u32; 6] = [5, 10, 15, 20, 25, 30];
/// Bearing of the inner end of each ladder run, in degrees.
pub const LADDER_INNER: f64 = 2.0;
/// Bearing of the outer end of each ladder run, in degrees.
pub const LADDER_OUTER: f64 = 8.0;

pub const VELOCITY_VECTOR_RADIUS: i32 = 4;

/// Samples the unit circle in the level plane and pairs up neighbours.
///
/// Always returns exactly `divs` segments, the last closing the circle.
pub fn horizon_segments(divs: usize) -> Vec<(Vector3<f64>, Vector3<f64>)> {
    let sample = |i: usize| {
        let angle = (i as f64 * 360.0 / divs as f64) * D2R;
        Vector3::new(angle.cos(), angle.sin(), 0.0)
    };

    (0..divs).map(|i| (sample(i), sample(i + 1))).collect()
}

fn compass_label_offsets() -> [(&'static str, Vector3<f64>); 4] {
    [
        ("N", Vector3::new(1.0, 0.0, -COMPASS_LABEL_HEIGHT)),
        ("S", Vector3::new(-1.0, 0.0, -COMPASS_LABEL_HEIGHT)),
        ("E", Vector3::new(0.0, 1.0, -COMPASS_LABEL_HEIGHT)),
        ("W", Vector3::new(0.0, -1.0, -COMPASS_LABEL_HEIGHT)),
    ]
}

/// Draws a straight line when both ends are visible. Returns the number of primitives drawn.
fn segment(canvas: &mut impl Canvas, ctx: &DrawContext, ends: Option<[Pixel; 2]>) -> usize {
    match ends {
        Some([from, to]) => {
            canvas.line(from, to, ctx.style.color(), ctx.style.line_width());
            1
        }
        None => 0,
    }
}

fn scaled(from: Pixel, to: Pixel, factor: f64) -> Pixel {
    let du = to.u() as f64 - from.u() as f64;
    let dv = to.v() as f64 - from.v() as f64;
    from.offset((factor * du) as i32, (factor * dv) as i32)
}

impl HudRenderer {
    /// Draws the horizon circle around the aircraft. Returns the number of segments drawn.
    pub fn draw_horizon(&self, canvas: &mut impl Canvas, ctx: &DrawContext, divs: usize) -> usize {
        horizon_segments(divs)
            .iter()
            .map(|(a, b)| {
                let ends = all_visible([ctx.project_offset(a), ctx.project_offset(b)]);
                segment(canvas, ctx, ends)
            })
            .sum()
    }

    pub fn draw_compass_points(&self, canvas: &mut impl Canvas, ctx: &DrawContext) -> usize {
        let mut drawn = 0;
        for (base, _) in horizon_segments(COMPASS_TICKS) {
            let top = base - Vector3::z() * COMPASS_TICK_HEIGHT;
            let ends = all_visible([ctx.project_offset(&base), ctx.project_offset(&top)]);
            drawn += segment(canvas, ctx, ends);
        }

        for (label, offset) in compass_label_offsets() {
            if let Some(anchor) = ctx.project_offset(&offset).visible() {
                canvas.label(
                    label,
                    anchor,
                    1.0,
                    ctx.style.color(),
                    ctx.style.line_width(),
                    VAlign::Above,
                );
                drawn += 1;
            }
        }

        drawn
    }

    pub fn draw_pitch_ladder(&self, canvas: &mut impl Canvas, ctx: &DrawContext) -> usize {
        let q0 = ctx.heading();
        LADDER_BANDS
            .iter()
            .map(|&band| self.draw_ladder_band(canvas, ctx, &q0, band))
            .sum()
    }

    /// Draws one band above and below the horizon. Returns the number of primitives drawn.
    pub fn draw_ladder_band(
        &self,
        canvas: &mut impl Canvas,
        ctx: &DrawContext,
        q0: &Quaternion,
        band: u32,
    ) -> usize {
        let pitch = band as f64;
        let label = band.to_string();
        let mut drawn = 0;

        for side in [1.0, -1.0] {
            let inner = side * LADDER_INNER;
            let outer = side * LADDER_OUTER;

            // Solid run above the horizon.
            if let Some([a, b]) = all_visible([
                ctx.ladder_point(q0, pitch, inner),
                ctx.ladder_point(q0, pitch, outer),
            ]) {
                canvas.line(a, b, ctx.style.color(), ctx.style.line_width());
                self.ladder_label(canvas, ctx, &label, scaled(a, b, 1.25));
                drawn += 2;
            }
            drawn += segment(
                canvas,
                ctx,
                all_visible([
                    ctx.ladder_point(q0, pitch - 0.5, inner),
                    ctx.ladder_point(q0, pitch, inner),
                ]),
            );

            // Three dashes below, drooping slightly towards the outer end.
            if let Some([a, b]) = all_visible([
                ctx.ladder_point(q0, -pitch, inner),
                ctx.ladder_point(q0, -pitch - 0.5, outer),
            ]) {
                for i in 0..3 {
                    let start = scaled(a, b, 0.375 * i as f64);
                    let du = (0.25 * (b.u() as f64 - a.u() as f64)) as i32;
                    let dv = (0.25 * (b.v() as f64 - a.v() as f64)) as i32;
                    canvas.line(
                        start,
                        start.offset(du, dv),
                        ctx.style.color(),
                        ctx.style.line_width(),
                    );
                }
                self.ladder_label(canvas, ctx, &label, scaled(a, b, 1.25));
                drawn += 4;
            }
            drawn += segment(
                canvas,
                ctx,
                all_visible([
                    ctx.ladder_point(q0, -pitch + 0.5, inner),
                    ctx.ladder_point(q0, -pitch, inner),
                ]),
            );
        }

        if drawn == 0 {
            trace!("pitch ladder band {band} is out of view");
        }

        drawn
    }

    fn ladder_label(&self, canvas: &mut impl Canvas, ctx: &DrawContext, label: &str, at: Pixel) {
        canvas.label(
            label,
            at,
            ctx.style.font_scale(),
            ctx.style.color(),
            ctx.style.line_width(),
            VAlign::Center,
        );
    }

    /// Marks where the smoothed velocity points, one second ahead of the aircraft.
    pub fn draw_velocity_vector(&mut self, canvas: &mut impl Canvas, ctx: &DrawContext) {
        let velocity = self.velocity_filter.update(ctx.telemetry.velocity());
        match ctx.project_offset(&velocity).visible() {
            Some(center) => canvas.circle(center, VELOCITY_VECTOR_RADIUS, ctx.style.color(), 1),
            None => trace!("velocity vector is out of view"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        canvas::DrawCommand,
        geometry::heading,
        symbols::testing::*,
        telemetry::Attitude,
    };
    use approx::assert_relative_eq;
    use quickcheck_macros::quickcheck;

    #[quickcheck]
    fn horizon_has_divs_segments_on_unit_circle(divs: u8) -> bool {
        let divs = divs as usize + 1;
        let segments = horizon_segments(divs);

        segments.len() == divs
            && segments.iter().all(|(a, b)| {
                (a.norm() - 1.0).abs() < 1e-12 && (b.norm() - 1.0).abs() < 1e-12 && a.z == 0.0
            })
            && segments.windows(2).all(|pair| pair[0].1 == pair[1].0)
    }

    #[test]
    fn horizon_closes_the_circle() {
        let segments = horizon_segments(10);
        assert_relative_eq!(segments[0].0, segments[9].1, epsilon = 1e-12);
    }

    #[test]
    fn level_horizon_is_deterministic() {
        let attitude = Attitude::default();
        let (telemetry, projector, style) = (telemetry(attitude), projector(&attitude), style());
        let ctx = DrawContext::new(&telemetry, &projector, &style);
        let renderer = HudRenderer::new();

        let mut first = canvas();
        let mut second = canvas();
        let drawn = renderer.draw_horizon(&mut first, &ctx, HORIZON_DIVISIONS);
        renderer.draw_horizon(&mut second, &ctx, HORIZON_DIVISIONS);

        // Samples at 0, 36, 72, 324 and 360 degrees are ahead of the image plane.
        assert_eq!(drawn, 4);
        assert_eq!(first, second);
        assert!(first.lines().all(|(a, b)| a.v() == 360 && b.v() == 360));
    }

    #[test]
    fn north_label_is_in_frame() {
        let attitude = Attitude::default();
        let (telemetry, projector, style) = (telemetry(attitude), projector(&attitude), style());
        let ctx = DrawContext::new(&telemetry, &projector, &style);

        let anchor = ctx
            .project_offset(&Vector3::new(1.0, 0.0, -COMPASS_LABEL_HEIGHT))
            .visible()
            .expect("north is ahead");
        assert!((0..WIDTH as i32).contains(&anchor.u()));
        assert!((0..HEIGHT as i32).contains(&anchor.v()));

        let mut list = canvas();
        HudRenderer::new().draw_compass_points(&mut list, &ctx);
        assert_eq!(list.texts().collect::<Vec<_>>(), vec!["N"]);
    }

    #[test]
    fn looking_down_hides_upper_ladder_but_not_compass() {
        let attitude = Attitude::new(0.0, -90.0 * D2R, 0.0);
        let (telemetry, projector, style) = (telemetry(attitude), projector(&attitude), style());
        let ctx = DrawContext::new(&telemetry, &projector, &style);
        let renderer = HudRenderer::new();

        for band in LADDER_BANDS {
            let pitch = band as f64;
            for bearing in [LADDER_INNER, LADDER_OUTER, -LADDER_INNER, -LADDER_OUTER] {
                assert!(!ctx.ladder_point(&heading(0.0), pitch, bearing).is_visible());
            }
        }

        // Points straight below the aircraft still project.
        assert!(ctx.project_offset(&Vector3::new(0.0, 0.0, 1.0)).is_visible());

        // Band 5 is too shallow either way; band 30 keeps only its dashed half.
        let mut list = canvas();
        assert_eq!(renderer.draw_ladder_band(&mut list, &ctx, &heading(0.0), 5), 0);
        assert_eq!(renderer.draw_ladder_band(&mut list, &ctx, &heading(0.0), 30), 10);
    }

    #[test]
    fn level_band_draws_runs_ticks_and_dashes() {
        let attitude = Attitude::default();
        let (telemetry, projector, style) = (telemetry(attitude), projector(&attitude), style());
        let ctx = DrawContext::new(&telemetry, &projector, &style);

        let mut list = canvas();
        let drawn = HudRenderer::new().draw_ladder_band(&mut list, &ctx, &heading(0.0), 10);

        // Per side: run + label + tick above, three dashes + label + tick below.
        assert_eq!(drawn, 16);
        assert_eq!(list.len(), 16);
        assert_eq!(list.texts().filter(|t| *t == "10").count(), 4);
    }

    #[test]
    fn velocity_vector_is_smoothed() {
        let attitude = Attitude::default();
        let mut telemetry = telemetry(attitude);
        telemetry.update_velocity(Vector3::new(20.0, 0.0, 0.0));
        let (projector, style) = (projector(&attitude), style());
        let ctx = DrawContext::new(&telemetry, &projector, &style);

        let mut renderer = HudRenderer::new();
        let mut list = canvas();
        renderer.draw_velocity_vector(&mut list, &ctx);

        assert_relative_eq!(*renderer.filtered_velocity(), Vector3::new(4.0, 0.0, 0.0));
        assert_eq!(
            list.commands(),
            &[DrawCommand::Circle {
                center: Pixel::new(640, 360),
                radius: VELOCITY_VECTOR_RADIUS,
                color: style.color(),
                width: 1,
            }]
        );
    }
}
