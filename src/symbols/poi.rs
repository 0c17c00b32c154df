//! Points of interest: sun, moon and shadow, airports and ground annotations.

use super::{DrawContext, HudRenderer};
use crate::{
    canvas::{Canvas, VAlign},
    ephemeris::Ephemeris,
    error::HudError,
    geodesy::{Lla, NedReference},
    surface::ElevationSource,
};
use chrono::{DateTime, Utc};
use log::{debug, trace};
use nalgebra::Vector3;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

const METERS_TO_STATUTE_MILES: f64 = 0.000621371;
/// Markers farther than this, in statute miles, are not drawn.
pub const MARKER_RANGE_SM: f64 = 15.0;
/// Markers within this, in statute miles, show their distance.
pub const MARKER_DISTANCE_LABEL_SM: f64 = 7.5;
const LABEL_OFFSET: f64 = 0.02;
const SHADOW_SCALE: f64 = 0.7;

/// A named position in the session NED frame.
#[derive(Clone, Debug, PartialEq)]
pub struct GroundMarker {
    pub label: String,
    pub ned: Vector3<f64>,
}

impl GroundMarker {
    pub fn new(label: impl Into<String>, ned: Vector3<f64>) -> Self {
        Self {
            label: label.into(),
            ned,
        }
    }
}

/// A named geodetic position. Without an altitude it sits on the ground surface.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeoMarker {
    pub label: String,
    pub lat_deg: f64,
    pub lon_deg: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub alt_m: Option<f64>,
}

impl GeoMarker {
    pub fn new(label: impl Into<String>, lat_deg: f64, lon_deg: f64, alt_m: Option<f64>) -> Self {
        Self {
            label: label.into(),
            lat_deg,
            lon_deg,
            alt_m,
        }
    }

    /// Places the marker in the reference frame, reading the ground height when it has no altitude.
    pub fn to_ground(
        &self,
        reference: &NedReference,
        surface: &dyn ElevationSource,
    ) -> Result<GroundMarker, HudError> {
        let ned = ground_ned(
            reference,
            self.lat_deg,
            self.lon_deg,
            self.alt_m,
            surface,
        )?;

        Ok(GroundMarker::new(self.label.clone(), ned))
    }
}

/// NED position of a geodetic point. A missing altitude falls back to the surface height.
pub(crate) fn ground_ned(
    reference: &NedReference,
    lat_deg: f64,
    lon_deg: f64,
    alt_m: Option<f64>,
    surface: &dyn ElevationSource,
) -> Result<Vector3<f64>, HudError> {
    match alt_m {
        Some(alt_m) => reference.lla_to_ned(&Lla::new(lat_deg, lon_deg, alt_m)),
        None => {
            let origin_alt = reference.origin().alt_m;
            let mut ned = reference.lla_to_ned(&Lla::new(lat_deg, lon_deg, origin_alt))?;
            ned.z = -surface.elevation_or_zero(ned.y, ned.x);
            Ok(ned)
        }
    }
}

fn timestamp(unixtime: f64) -> Option<DateTime<Utc>> {
    if !unixtime.is_finite() {
        return None;
    }
    let secs = unixtime.floor();
    let nanos = ((unixtime - secs) * 1e9) as u32;
    DateTime::<Utc>::from_timestamp(secs as i64, nanos)
}

impl HudRenderer {
    /// Draws a ring at `ned` with `label` just above or below it.
    ///
    /// The ring and the label are placed independently, so either may be drawn alone.
    pub fn draw_labeled_point(
        &self,
        canvas: &mut impl Canvas,
        ctx: &DrawContext,
        ned: &Vector3<f64>,
        label: &str,
        scale: f64,
        valign: VAlign,
    ) {
        let (color, width) = (ctx.style.color(), ctx.style.line_width());

        match ctx.projector.project(ned).visible() {
            Some(center) => canvas.circle(center, 4 + width as i32, color, width),
            None => trace!("{label} marker is out of view"),
        }

        let dz = match valign {
            VAlign::Below => LABEL_OFFSET,
            _ => -LABEL_OFFSET,
        };
        if let Some(anchor) = ctx.projector.project(&(ned + Vector3::z() * dz)).visible() {
            canvas.label(label, anchor, scale, color, width, valign);
        }
    }

    /// Draws the sun, its shadow while it is up, and the moon.
    pub fn draw_astro(
        &self,
        canvas: &mut impl Canvas,
        ctx: &DrawContext,
        ephemeris: &dyn Ephemeris,
    ) {
        let Some(time) = timestamp(ctx.telemetry.unixtime()) else {
            debug!("skipping astro markers at unix time {}", ctx.telemetry.unixtime());
            return;
        };
        let (position, ned) = (ctx.telemetry.lla(), ctx.telemetry.ned());

        match ephemeris.sun_ned(position, time) {
            Some(sun) => {
                self.draw_labeled_point(canvas, ctx, &(ned + sun), "Sun", 1.0, VAlign::Above);
                if sun.z < 0.0 {
                    self.draw_labeled_point(
                        canvas,
                        ctx,
                        &(ned - sun),
                        "shadow",
                        SHADOW_SCALE,
                        VAlign::Above,
                    );
                }
            }
            None => debug!("no sun direction at {time}"),
        }

        match ephemeris.moon_ned(position, time) {
            Some(moon) => {
                self.draw_labeled_point(canvas, ctx, &(ned + moon), "Moon", 1.0, VAlign::Above)
            }
            None => debug!("no moon direction at {time}"),
        }
    }

    /// Draws a marker one metre out along its bearing, sized and labelled by distance.
    ///
    /// Returns whether the marker was in range.
    pub fn draw_ground_marker(
        &self,
        canvas: &mut impl Canvas,
        ctx: &DrawContext,
        marker: &GroundMarker,
    ) -> bool {
        let ned = ctx.telemetry.ned();
        let relative = marker.ned - ned;
        let distance = relative.norm();
        let distance_sm = distance * METERS_TO_STATUTE_MILES;

        if distance == 0.0 || distance_sm > MARKER_RANGE_SM {
            trace!("{} is out of range at {distance_sm:.1} sm", marker.label);
            return false;
        }

        let scale = 1.0 - distance_sm / 25.0;
        let label = if distance_sm <= MARKER_DISTANCE_LABEL_SM {
            format!("{} ({distance_sm:.1})", marker.label)
        } else {
            marker.label.clone()
        };

        self.draw_labeled_point(
            canvas,
            ctx,
            &(ned + relative / distance),
            &label,
            scale,
            VAlign::Below,
        );
        true
    }

    /// Returns how many markers were in range.
    pub fn draw_ground_markers(
        &self,
        canvas: &mut impl Canvas,
        ctx: &DrawContext,
        markers: &[GroundMarker],
    ) -> usize {
        let mut drawn = 0;
        for marker in markers {
            if self.draw_ground_marker(canvas, ctx, marker) {
                drawn += 1;
            }
        }

        drawn
    }

    /// Resolves geodetic markers against the session reference and draws them.
    ///
    /// Draws nothing until the reference is set.
    pub fn draw_geo_markers(
        &self,
        canvas: &mut impl Canvas,
        ctx: &DrawContext,
        markers: &[GeoMarker],
        surface: &dyn ElevationSource,
    ) -> usize {
        let Some(reference) = ctx.telemetry.reference() else {
            trace!("no NED reference for {} geo markers", markers.len());
            return 0;
        };

        let mut drawn = 0;
        for marker in markers {
            match marker.to_ground(reference, surface) {
                Ok(ground) => drawn += usize::from(self.draw_ground_marker(canvas, ctx, &ground)),
                Err(err) => debug!("skipping {}: {err}", marker.label),
            }
        }

        drawn
    }
}
