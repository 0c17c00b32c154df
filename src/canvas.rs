//! Primitive draw commands and the surfaces that receive them.
//!
//! The crate never rasterizes. Symbology is authored against [`Canvas`], and callers bridge
//! that to whatever image library holds their frame. [`DrawList`] records the commands
//! instead, which is what the scene runner and the tests use.

use crate::{projection::Pixel, style::Rgb};
#[cfg(feature = "serde")]
use serde::Serialize;

/// Advance of one glyph at scale 1, in pixels.
pub const GLYPH_ADVANCE: f64 = 20.0;
/// Cap height of a glyph at scale 1, in pixels.
pub const GLYPH_HEIGHT: f64 = 21.0;

/// How a polygon is painted. HUD symbols are always outlines; `Filled` is for callers drawing
/// their own overlays on the same canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Stroke {
    Outline,
    Filled,
}

/// Pixel extent of a rendered string.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextSize {
    pub width: i32,
    pub height: i32,
}

/// Where a label sits vertically relative to its anchor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VAlign {
    Above,
    Center,
    Below,
}

/// A raster target. Text origins are the bottom-left corner of the string.
pub trait Canvas {
    /// Width and height in pixels.
    fn size(&self) -> (u32, u32);

    fn line(&mut self, from: Pixel, to: Pixel, color: Rgb, width: u32);

    fn circle(&mut self, center: Pixel, radius: i32, color: Rgb, width: u32);

    fn polygon(&mut self, points: &[Pixel], color: Rgb, width: u32, stroke: Stroke);

    fn text(&mut self, text: &str, origin: Pixel, scale: f64, color: Rgb, width: u32);

    fn text_size(&self, text: &str, scale: f64, width: u32) -> TextSize {
        let thickness = width.saturating_sub(1) as i32;
        TextSize {
            width: (text.chars().count() as f64 * GLYPH_ADVANCE * scale).round() as i32 + thickness,
            height: (GLYPH_HEIGHT * scale).round() as i32 + thickness,
        }
    }

    /// Draws `text` horizontally centred on `anchor`.
    fn label(
        &mut self,
        text: &str,
        anchor: Pixel,
        scale: f64,
        color: Rgb,
        width: u32,
        valign: VAlign,
    ) {
        let size = self.text_size(text, scale, width);
        let dv = match valign {
            VAlign::Above => 0,
            VAlign::Center => size.height / 2,
            VAlign::Below => size.height,
        };
        self.text(text, anchor.offset(-size.width / 2, dv), scale, color, width);
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "op", rename_all = "snake_case"))]
pub enum DrawCommand {
    Line {
        from: Pixel,
        to: Pixel,
        color: Rgb,
        width: u32,
    },
    Circle {
        center: Pixel,
        radius: i32,
        color: Rgb,
        width: u32,
    },
    Polygon {
        points: Vec<Pixel>,
        color: Rgb,
        width: u32,
        stroke: Stroke,
    },
    Text {
        text: String,
        origin: Pixel,
        scale: f64,
        color: Rgb,
        width: u32,
    },
}

/// A canvas that records every command it receives.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct DrawList {
    width: u32,
    height: u32,
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn lines(&self) -> impl Iterator<Item = (Pixel, Pixel)> + '_ {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Line { from, to, .. } => Some((*from, *to)),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn into_commands(self) -> Vec<DrawCommand> {
        self.commands
    }
}

impl Canvas for DrawList {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn line(&mut self, from: Pixel, to: Pixel, color: Rgb, width: u32) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            color,
            width,
        });
    }

    fn circle(&mut self, center: Pixel, radius: i32, color: Rgb, width: u32) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
            width,
        });
    }

    fn polygon(&mut self, points: &[Pixel], color: Rgb, width: u32, stroke: Stroke) {
        self.commands.push(DrawCommand::Polygon {
            points: points.to_vec(),
            color,
            width,
            stroke,
        });
    }

    fn text(&mut self, text: &str, origin: Pixel, scale: f64, color: Rgb, width: u32) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            origin,
            scale,
            color,
            width,
        });
    }
}
