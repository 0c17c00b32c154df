//! Sun and moon directions for the astro markers.

use crate::geodesy::Lla;
use chrono::{DateTime, Utc};
use log::debug;
use nalgebra::Vector3;
use spa::{SolarPos, StdFloatOps};
use uom::si::{
    angle::{degree, radian},
    f64::Angle,
};

/// Source of unit NED directions towards the sun and moon as seen from `position`.
///
/// `None` means the body is unavailable and its markers are skipped.
pub trait Ephemeris: Send + Sync {
    fn sun_ned(&self, position: &Lla, time: DateTime<Utc>) -> Option<Vector3<f64>>;

    fn moon_ned(&self, position: &Lla, time: DateTime<Utc>) -> Option<Vector3<f64>>;
}

/// Unit NED vector for an azimuth clockwise from north and an elevation above the horizon.
pub fn direction_ned(azimuth: Angle, elevation: Angle) -> Vector3<f64> {
    let (az, el) = (azimuth.get::<radian>(), elevation.get::<radian>());
    Vector3::new(az.cos() * el.cos(), az.sin() * el.cos(), -el.sin())
}

/// Provides nothing; astro markers are never drawn.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoEphemeris;

impl Ephemeris for NoEphemeris {
    fn sun_ned(&self, _: &Lla, _: DateTime<Utc>) -> Option<Vector3<f64>> {
        None
    }

    fn moon_ned(&self, _: &Lla, _: DateTime<Utc>) -> Option<Vector3<f64>> {
        None
    }
}

/// Computes the sun with the solar position algorithm. Has no moon.
#[derive(Clone, Copy, Debug, Default)]
pub struct SolarEphemeris;

impl Ephemeris for SolarEphemeris {
    fn sun_ned(&self, position: &Lla, time: DateTime<Utc>) -> Option<Vector3<f64>> {
        let solar_pos: SolarPos =
            match spa::solar_position::<StdFloatOps>(time, position.lat_deg, position.lon_deg) {
                Ok(solar_pos) => solar_pos,
                Err(err) => {
                    debug!("no solar position for {position:?}: {err:?}");
                    return None;
                }
            };

        Some(direction_ned(
            Angle::new::<degree>(solar_pos.azimuth),
            Angle::new::<degree>(90.0 - solar_pos.zenith_angle),
        ))
    }

    fn moon_ned(&self, _: &Lla, _: DateTime<Utc>) -> Option<Vector3<f64>> {
        None
    }
}

/// Directions supplied from outside, held constant until replaced.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FixedEphemeris {
    sun: Option<Vector3<f64>>,
    moon: Option<Vector3<f64>>,
}

impl FixedEphemeris {
    /// Stores normalized copies of the given directions. Zero vectors count as missing.
    pub fn new(sun: Option<Vector3<f64>>, moon: Option<Vector3<f64>>) -> Self {
        Self {
            sun: sun.and_then(|v| v.try_normalize(f64::EPSILON)),
            moon: moon.and_then(|v| v.try_normalize(f64::EPSILON)),
        }
    }
}

impl Ephemeris for FixedEphemeris {
    fn sun_ned(&self, _: &Lla, _: DateTime<Utc>) -> Option<Vector3<f64>> {
        self.sun
    }

    fn moon_ned(&self, _: &Lla, _: DateTime<Utc>) -> Option<Vector3<f64>> {
        self.moon
    }
}
