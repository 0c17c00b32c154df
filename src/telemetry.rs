//! Per-frame aircraft state read by every drawing routine.
//!
//! Each setter replaces one field group wholesale. Callers finish every update for a frame
//! before the frame is drawn.

use crate::{
    error::HudError,
    geodesy::{Lla, NedReference},
    geometry::{self, D2R, Quaternion},
};
use nalgebra::Vector3;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::{convert::Infallible, fmt, str::FromStr};
use uom::si::{
    f64::{Length, Velocity},
    length::{foot, meter},
    velocity::{knot, meter_per_second},
};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum FlightMode {
    #[default]
    Manual,
    Auto,
    Other(String),
}

impl FromStr for FlightMode {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "manual" => FlightMode::Manual,
            "auto" => FlightMode::Auto,
            _ => FlightMode::Other(s.to_string()),
        })
    }
}

impl From<&str> for FlightMode {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(mode) => mode,
            Err(never) => match never {},
        }
    }
}

impl fmt::Display for FlightMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlightMode::Manual => write!(f, "manual"),
            FlightMode::Auto => write!(f, "auto"),
            FlightMode::Other(mode) => write!(f, "{mode}"),
        }
    }
}

/// Body attitude relative to NED, in radians.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Attitude {
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
}

impl Attitude {
    pub fn new(roll: f64, pitch: f64, yaw: f64) -> Self {
        Self { roll, pitch, yaw }
    }

    /// Quaternion whose active rotation takes NED axes onto body axes.
    pub fn quaternion(&self) -> Quaternion {
        geometry::from_euler(self.yaw, self.pitch, self.roll)
    }

    /// Unit vector along the body x axis, in NED.
    pub fn nose(&self) -> Vector3<f64> {
        geometry::rotate(&self.quaternion(), &Vector3::x())
    }
}

/// Airspeed in knots and altitude in metres.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AirData {
    pub airspeed_kt: f64,
    pub altitude_m: f64,
}

/// Commanded values: angles in degrees, speed in knots, altitude in metres.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AutopilotTargets {
    pub roll_deg: f64,
    pub pitch_deg: f64,
    pub heading_deg: f64,
    pub speed_kt: f64,
    pub altitude_m: f64,
}

impl AutopilotTargets {
    pub fn roll(&self) -> f64 {
        self.roll_deg * D2R
    }

    pub fn heading(&self) -> f64 {
        self.heading_deg * D2R
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SpeedUnit {
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "kt"))]
    Knots,
    #[cfg_attr(feature = "serde", serde(rename = "mps"))]
    MetersPerSecond,
}

impl SpeedUnit {
    pub fn label(&self) -> &'static str {
        match self {
            SpeedUnit::Knots => "Kt",
            SpeedUnit::MetersPerSecond => "Mps",
        }
    }

    pub fn from_knots(&self, speed_kt: f64) -> f64 {
        let speed = Velocity::new::<knot>(speed_kt);
        match self {
            SpeedUnit::Knots => speed.get::<knot>(),
            SpeedUnit::MetersPerSecond => speed.get::<meter_per_second>(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AltitudeUnit {
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "ft"))]
    Feet,
    #[cfg_attr(feature = "serde", serde(rename = "m"))]
    Meters,
}

impl AltitudeUnit {
    pub fn label(&self) -> &'static str {
        match self {
            AltitudeUnit::Feet => "Ft",
            AltitudeUnit::Meters => "M",
        }
    }

    pub fn from_meters(&self, altitude_m: f64) -> f64 {
        let altitude = Length::new::<meter>(altitude_m);
        match self {
            AltitudeUnit::Feet => altitude.get::<foot>(),
            AltitudeUnit::Meters => altitude.get::<meter>(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Telemetry {
    lla: Lla,
    unixtime: f64,
    ned: Vector3<f64>,
    velocity: Vector3<f64>,
    attitude: Attitude,
    air_data: AirData,
    mode: FlightMode,
    autopilot: AutopilotTargets,
    reference: Option<NedReference>,
}

impl Telemetry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update_lla(&mut self, lla: Lla) {
        self.lla = lla;
    }

    /// Seconds since the unix epoch.
    pub fn update_unixtime(&mut self, unixtime: f64) {
        self.unixtime = unixtime;
    }

    pub fn update_ned(&mut self, ned: Vector3<f64>) {
        self.ned = ned;
    }

    /// NED velocity in metres per second.
    pub fn update_velocity(&mut self, velocity: Vector3<f64>) {
        self.velocity = velocity;
    }

    pub fn update_attitude(&mut self, attitude: Attitude) {
        self.attitude = attitude;
    }

    pub fn update_air_data(&mut self, air_data: AirData) {
        self.air_data = air_data;
    }

    pub fn update_autopilot(&mut self, mode: FlightMode, targets: AutopilotTargets) {
        self.mode = mode;
        self.autopilot = targets;
    }

    /// Anchors the session NED frame.
    ///
    /// Setting the same origin again is a no-op; moving it fails.
    pub fn set_ned_reference(&mut self, origin: Lla) -> Result<(), HudError> {
        if let Some(current) = &self.reference {
            if current.origin() == origin {
                return Ok(());
            }

            return Err(HudError::ReferenceAlreadySet {
                current: current.origin().into(),
                requested: origin.into(),
            });
        }

        self.reference = Some(NedReference::new(origin)?);
        Ok(())
    }

    pub fn lla(&self) -> &Lla {
        &self.lla
    }

    pub fn unixtime(&self) -> f64 {
        self.unixtime
    }

    pub fn ned(&self) -> &Vector3<f64> {
        &self.ned
    }

    pub fn velocity(&self) -> &Vector3<f64> {
        &self.velocity
    }

    pub fn attitude(&self) -> &Attitude {
        &self.attitude
    }

    pub fn air_data(&self) -> &AirData {
        &self.air_data
    }

    pub fn mode(&self) -> &FlightMode {
        &self.mode
    }

    pub fn autopilot(&self) -> &AutopilotTargets {
        &self.autopilot
    }

    pub fn reference(&self) -> Option<&NedReference> {
        self.reference.as_ref()
    }

    pub fn airspeed(&self, unit: SpeedUnit) -> f64 {
        unit.from_knots(self.air_data.airspeed_kt)
    }

    pub fn altitude(&self, unit: AltitudeUnit) -> f64 {
        unit.from_meters(self.air_data.altitude_m)
    }

    pub fn target_speed(&self, unit: SpeedUnit) -> f64 {
        unit.from_knots(self.autopilot.speed_kt)
    }

    pub fn target_altitude(&self, unit: AltitudeUnit) -> f64 {
        unit.from_meters(self.autopilot.altitude_m)
    }
}
