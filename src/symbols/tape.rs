//! Screen-locked speed and altitude tapes.

use super::{DrawContext, HudRenderer};
use crate::{
    canvas::{Canvas, Stroke},
    projection::Pixel,
    telemetry::FlightMode,
};
use log::trace;

/// Which side of the screen a tape sits on. Ticks point away from the centre of the screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TapeSide {
    Left,
    Right,
}

impl TapeSide {
    /// Horizontal direction ticks and their labels extend in.
    fn outward(&self) -> i32 {
        match self {
            TapeSide::Left => -1,
            TapeSide::Right => 1,
        }
    }
}

/// Largest tick index, in either direction, a tape lays out.
const MAX_TICK: f64 = 1e9;

/// The range of tick indices a tape draws, end exclusive for ticks and inclusive for the bug.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TapeScale {
    pub min: i64,
    pub max: i64,
}

impl TapeScale {
    /// One tick per unit around `speed`, never below zero. `None` when `speed` is not finite
    /// or too large to lay out.
    pub fn speed(speed: f64) -> Option<Self> {
        let base = base_tick(speed / 10.0)? * 10;
        Some(Self {
            min: (base - 30).max(0),
            max: base + 40,
        })
    }

    /// One tick per ten units around `altitude`.
    pub fn altitude(altitude: f64) -> Option<Self> {
        let base = base_tick(altitude / 100.0)? * 10;
        Some(Self {
            min: base - 30,
            max: base + 30,
        })
    }

    pub fn contains(&self, ticks: f64) -> bool {
        (self.min as f64..=self.max as f64).contains(&ticks)
    }
}

fn base_tick(ticks: f64) -> Option<i64> {
    let base = ticks.floor();
    (base.abs() <= MAX_TICK).then_some(base as i64)
}

/// Screen layout of one tape: its reference point, the vertical band it may draw in, and the
/// spacing between ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tape {
    center: Pixel,
    min_row: i32,
    max_row: i32,
    spacing: i32,
    side: TapeSide,
}

impl Tape {
    pub fn new(width: u32, height: u32, spacing: i32, side: TapeSide) -> Self {
        let (width, height) = (width as f64, height as f64);
        let cx = match side {
            TapeSide::Left => width * 0.2,
            TapeSide::Right => width * 0.8,
        };
        let min_row = (height * 0.2) as i32;

        Self {
            center: Pixel::new(cx as i32, (height * 0.5) as i32),
            min_row,
            max_row: height as i32 - min_row,
            spacing,
            side,
        }
    }

    pub fn speed(width: u32, height: u32, spacing: i32) -> Self {
        Self::new(width, height, spacing, TapeSide::Left)
    }

    pub fn altitude(width: u32, height: u32, spacing: i32) -> Self {
        Self::new(width, height, spacing, TapeSide::Right)
    }

    pub fn center(&self) -> Pixel {
        self.center
    }

    pub fn band(&self) -> (i32, i32) {
        (self.min_row, self.max_row)
    }

    pub fn spacing(&self) -> i32 {
        self.spacing
    }

    /// Row of a mark `delta` ticks above the current value. Marks far off the tape pin to the
    /// raster limits.
    pub fn row(&self, delta: f64) -> i32 {
        self.center.v().saturating_sub((delta * self.spacing as f64) as i32)
    }

    pub fn in_band(&self, row: i32) -> bool {
        (self.min_row..=self.max_row).contains(&row)
    }

    fn clamp(&self, row: i32) -> i32 {
        row.clamp(self.min_row, self.max_row)
    }

    fn at(&self, du: i32, row: i32) -> Pixel {
        Pixel::new(self.center.u() + du, row)
    }
}

/// What a tape shows this frame, in tick units.
struct Reading<'a> {
    value: f64,
    target: Option<f64>,
    scale: TapeScale,
    readout: String,
    units: &'a str,
    tick_label: fn(i64) -> String,
}

impl HudRenderer {
    pub fn draw_speed_tape(&self, canvas: &mut impl Canvas, ctx: &DrawContext) {
        let unit = ctx.style.speed_unit();
        let speed = ctx.telemetry.airspeed(unit);
        let Some(scale) = TapeScale::speed(speed) else {
            trace!("speed {speed} is off any tape");
            return;
        };
        let reading = Reading {
            value: speed,
            target: autopilot_target(ctx, ctx.telemetry.target_speed(unit)),
            scale,
            readout: format!("{speed:.0}"),
            units: unit.label(),
            tick_label: |i| i.to_string(),
        };

        let (width, height) = canvas.size();
        let spacing = self.tape_spacing(&*canvas, ctx, &reading.readout);
        self.draw_tape(canvas, ctx, &Tape::speed(width, height, spacing), &reading);
    }

    pub fn draw_altitude_tape(&self, canvas: &mut impl Canvas, ctx: &DrawContext) {
        let unit = ctx.style.altitude_unit();
        let altitude = ctx.telemetry.altitude(unit);
        let Some(scale) = TapeScale::altitude(altitude) else {
            trace!("altitude {altitude} is off any tape");
            return;
        };
        let reading = Reading {
            value: altitude / 10.0,
            target: autopilot_target(ctx, ctx.telemetry.target_altitude(unit) / 10.0),
            scale,
            readout: format!("{:.0}", (altitude / 10.0).round() * 10.0),
            units: unit.label(),
            tick_label: |i| (i * 10).to_string(),
        };

        let (width, height) = canvas.size();
        let spacing = self.tape_spacing(&*canvas, ctx, &reading.readout);
        self.draw_tape(canvas, ctx, &Tape::altitude(width, height, spacing), &reading);
    }

    /// Ticks are one text line apart.
    fn tape_spacing(&self, canvas: &impl Canvas, ctx: &DrawContext, text: &str) -> i32 {
        canvas
            .text_size(text, ctx.style.font_scale(), ctx.style.line_width())
            .height
    }

    fn draw_tape(
        &self,
        canvas: &mut impl Canvas,
        ctx: &DrawContext,
        tape: &Tape,
        reading: &Reading,
    ) {
        let color = ctx.style.color();
        let width = ctx.style.line_width();
        let scale = ctx.style.font_scale();
        let outward = tape.side.outward();
        let inward = -outward;
        let (cx, cy) = (tape.center.u(), tape.center.v());

        // Boxed readout of the current value, pointing at the tape.
        let size = canvas.text_size(&reading.readout, scale, width);
        let pad = 5 + 2 * width as i32;
        let box_w = size.width + pad;
        let box_h = size.height + pad;
        let notch = (box_h as f64 * 0.7) as i32;
        let text_u = match tape.side {
            TapeSide::Left => cx + notch,
            TapeSide::Right => cx - notch - size.width,
        };
        canvas.text(
            &reading.readout,
            Pixel::new(text_u, cy + size.height / 2),
            scale,
            color,
            width,
        );
        canvas.polygon(
            &[
                tape.center,
                tape.at(inward * notch, cy - box_h / 2),
                tape.at(inward * (notch + box_w), cy - box_h / 2),
                tape.at(inward * (notch + box_w), cy + box_h / 2 + 1),
                tape.at(inward * notch, cy + box_h / 2 + 1),
            ],
            color,
            width,
            Stroke::Outline,
        );

        // Spine, clamped to the band.
        let TapeScale { min, max } = reading.scale;
        canvas.line(
            tape.at(0, tape.clamp(tape.row(min as f64 - reading.value))),
            tape.at(0, tape.clamp(tape.row(max as f64 - reading.value))),
            color,
            width,
        );

        for i in min..max {
            let row = tape.row(i as f64 - reading.value);
            if !tape.in_band(row) {
                continue;
            }

            let major = i.rem_euclid(5) == 0;
            let length = if major { 6 } else { 4 };
            canvas.line(tape.at(0, row), tape.at(outward * length, row), color, width);

            if major {
                let label = (reading.tick_label)(i);
                let size = canvas.text_size(&label, scale, width);
                let du = match tape.side {
                    TapeSide::Left => -8 - size.width,
                    TapeSide::Right => 8,
                };
                canvas.text(&label, tape.at(du, row + size.height / 2), scale, color, width);
            }
        }

        let size = canvas.text_size(reading.units, scale, width);
        canvas.text(
            reading.units,
            Pixel::new(
                cx - (size.height as f64 * 0.5) as i32,
                tape.max_row + size.height + 2 * width as i32,
            ),
            scale,
            color,
            width,
        );

        let Some(target) = reading.target else {
            return;
        };
        let row = tape.row(target - reading.value);
        if !reading.scale.contains(target) || !tape.in_band(row) {
            trace!("autopilot bug at {target} is off the tape");
            return;
        }
        canvas.polygon(
            &[
                tape.at(0, row),
                tape.at(inward * notch, row - box_h / 2),
                tape.at(inward * notch, row - box_h),
                tape.at(0, row - box_h),
                tape.at(0, row + box_h),
                tape.at(inward * notch, row + box_h),
                tape.at(inward * notch, row + box_h / 2),
            ],
            color,
            width,
            Stroke::Outline,
        );
    }
}

fn autopilot_target(ctx: &DrawContext, target: f64) -> Option<f64> {
    (ctx.telemetry.mode() == &FlightMode::Auto && target.is_finite()).then_some(target)
}
