//! Geodetic positions and the session NED frame.

use crate::error::HudError;
use nalgebra::Vector3;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use sguaba::{Coordinate, math::RigidBodyTransform, system, systems::Ecef, systems::Wgs84};
use uom::si::{
    angle::degree,
    f64::{Angle, Length},
    length::meter,
};

system!(pub struct SessionNed using NED);

/// Latitude and longitude in degrees, altitude in metres above the WGS84 ellipsoid.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Lla {
    pub lat_deg: f64,
    pub lon_deg: f64,
    pub alt_m: f64,
}

impl Lla {
    pub fn new(lat_deg: f64, lon_deg: f64, alt_m: f64) -> Self {
        Self {
            lat_deg,
            lon_deg,
            alt_m,
        }
    }

    pub fn to_wgs84(&self) -> Result<Wgs84, HudError> {
        Ok(Wgs84::builder()
            .latitude(Angle::new::<degree>(self.lat_deg))
            .ok_or(HudError::InvalidLatitude {
                latitude: self.lat_deg,
            })?
            .longitude(Angle::new::<degree>(self.lon_deg))
            .altitude(Length::new::<meter>(self.alt_m))
            .build())
    }
}

impl From<Wgs84> for Lla {
    fn from(wgs84: Wgs84) -> Self {
        Self::new(
            wgs84.latitude().get::<degree>(),
            wgs84.longitude().get::<degree>(),
            wgs84.altitude().get::<meter>(),
        )
    }
}

impl From<(f64, f64, f64)> for Lla {
    fn from((lat_deg, lon_deg, alt_m): (f64, f64, f64)) -> Self {
        Self::new(lat_deg, lon_deg, alt_m)
    }
}

impl From<Lla> for (f64, f64, f64) {
    fn from(lla: Lla) -> Self {
        (lla.lat_deg, lla.lon_deg, lla.alt_m)
    }
}

/// The tangent-plane origin that every NED value in a session is relative to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NedReference {
    origin: Lla,
    ecef_to_ned: RigidBodyTransform<Ecef, SessionNed>,
}

impl NedReference {
    pub fn new(origin: Lla) -> Result<Self, HudError> {
        let wgs84 = origin.to_wgs84()?;
        // SAFETY: `SessionNed` is only ever anchored at `origin` through this type.
        let ecef_to_ned = unsafe { RigidBodyTransform::ecef_to_ned_at(&wgs84) };

        Ok(Self {
            origin,
            ecef_to_ned,
        })
    }

    pub fn origin(&self) -> Lla {
        self.origin
    }

    /// Expresses a geodetic position as (north, east, down) metres from the origin.
    pub fn lla_to_ned(&self, lla: &Lla) -> Result<Vector3<f64>, HudError> {
        let ecef = Coordinate::<Ecef>::from_wgs84(&lla.to_wgs84()?);
        let ned = self.ecef_to_ned.transform(ecef);
        let [n, e, d] = ned.to_cartesian().map(|c| c.get::<meter>());

        Ok(Vector3::new(n, e, d))
    }

    pub fn ned_to_lla(&self, ned: &Vector3<f64>) -> Lla {
        let ned = Coordinate::<SessionNed>::from_cartesian(
            Length::new::<meter>(ned.x),
            Length::new::<meter>(ned.y),
            Length::new::<meter>(ned.z),
        );

        self.ecef_to_ned.inverse_transform(ned).to_wgs84().into()
    }
}
