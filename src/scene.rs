//! Offline scenes: a camera, a configuration and a sequence of telemetry frames.

use crate::{
    annotations::Annotations,
    canvas::DrawList,
    composer::FrameComposer,
    config::HudConfig,
    ephemeris::{FixedEphemeris, SolarEphemeris},
    error::HudError,
    geodesy::{Lla, NedReference},
    projection::{CameraIntrinsics, CameraPose, Projector},
    surface::{ElevationSource, NoSurface, TriangulatedSurface},
    telemetry::{AirData, Attitude, AutopilotTargets, FlightMode},
};
use log::{debug, info};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Telemetry for one frame. Absent groups keep their value from the previous frame.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FrameInput {
    /// World-to-camera rows, 3x4 or 4x4. Without it the camera sits on the nose.
    pub pose: Option<Vec<Vec<f64>>>,
    pub lla: Option<Lla>,
    pub unixtime: Option<f64>,
    /// Derived from `lla` when absent and the scene has a reference.
    pub ned: Option<Vector3<f64>>,
    pub velocity: Option<Vector3<f64>>,
    pub attitude: Option<Attitude>,
    pub air_data: Option<AirData>,
    pub mode: Option<String>,
    pub autopilot: Option<AutopilotTargets>,
    /// Sun direction from an external ephemeris. Replaces the scene ephemeris when given.
    pub sun: Option<Vector3<f64>>,
    pub moon: Option<Vector3<f64>>,
}

impl FrameInput {
    pub fn apply(&self, composer: &mut FrameComposer) -> Result<(), HudError> {
        let telemetry = composer.telemetry_mut();

        if let Some(lla) = self.lla {
            telemetry.update_lla(lla);
        }
        if let Some(unixtime) = self.unixtime {
            telemetry.update_unixtime(unixtime);
        }
        match (self.ned, self.lla) {
            (Some(ned), _) => telemetry.update_ned(ned),
            (None, Some(lla)) => {
                if let Some(reference) = telemetry.reference() {
                    let ned = reference.lla_to_ned(&lla)?;
                    telemetry.update_ned(ned);
                }
            }
            (None, None) => {}
        }
        if let Some(velocity) = self.velocity {
            telemetry.update_velocity(velocity);
        }
        if let Some(attitude) = self.attitude {
            telemetry.update_attitude(attitude);
        }
        if let Some(air_data) = self.air_data {
            telemetry.update_air_data(air_data);
        }
        if self.mode.is_some() || self.autopilot.is_some() {
            let mode = self
                .mode
                .as_deref()
                .map_or_else(|| telemetry.mode().clone(), FlightMode::from);
            let targets = self.autopilot.unwrap_or(*telemetry.autopilot());
            telemetry.update_autopilot(mode, targets);
        }

        let pose = match &self.pose {
            Some(rows) => Some(CameraPose::from_rows(rows)?),
            None if self.attitude.is_some() || self.ned.is_some() || self.lla.is_some() => {
                let telemetry = composer.telemetry();
                Some(CameraPose::from_attitude(
                    telemetry.ned(),
                    &telemetry.attitude().quaternion(),
                ))
            }
            None => None,
        };
        if let Some(pose) = pose {
            composer.set_pose(pose);
        }

        if self.sun.is_some() || self.moon.is_some() {
            composer.set_ephemeris(Box::new(FixedEphemeris::new(self.sun, self.moon)));
        }

        Ok(())
    }
}

/// Everything needed to render a sequence offline.
///
/// Relative paths are resolved against the directory of the scene file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scene {
    pub width: u32,
    pub height: u32,
    /// Rows of the 3x3 camera matrix.
    pub intrinsics: Vec<Vec<f64>>,
    #[serde(default)]
    pub config: HudConfig,
    /// Origin of the session NED frame.
    #[serde(default)]
    pub reference: Option<Lla>,
    /// Survey samples for the ground surface.
    #[serde(default)]
    pub surface: Option<PathBuf>,
    /// Directory holding `annotations.json`. Needs a reference.
    #[serde(default)]
    pub annotations: Option<PathBuf>,
    /// Compute the sun from position and time.
    #[serde(default)]
    pub solar: bool,
    #[serde(default)]
    pub frames: Vec<FrameInput>,
    #[serde(skip)]
    base_dir: PathBuf,
}

impl Scene {
    pub fn from_json_str(json: &str) -> Result<Self, HudError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, HudError> {
        let path = path.as_ref();
        let mut scene = Self::from_json_str(&fs::read_to_string(path)?)?;
        scene.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        info!(
            "loaded scene from {} with {} frames",
            path.display(),
            scene.frames.len()
        );

        Ok(scene)
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.base_dir.join(path)
    }

    /// Builds a composer for the scene camera with its reference, surface and markers loaded.
    pub fn composer(&self) -> Result<FrameComposer, HudError> {
        let intrinsics = CameraIntrinsics::from_rows(&self.intrinsics)?;
        let mut composer = FrameComposer::from_config(Projector::new(intrinsics), &self.config);

        if self.solar {
            composer.set_ephemeris(Box::new(SolarEphemeris));
        }

        let surface: Box<dyn ElevationSource> = match &self.surface {
            Some(path) => Box::new(TriangulatedSurface::from_path(self.resolve(path))?),
            None => Box::new(NoSurface),
        };

        if let Some(origin) = self.reference {
            composer.telemetry_mut().set_ned_reference(origin)?;
        }

        match (&self.annotations, self.reference) {
            (Some(dir), Some(origin)) => {
                let annotations = Annotations::load(
                    self.resolve(dir),
                    NedReference::new(origin)?,
                    surface.as_ref(),
                )?;
                composer.set_ground_markers(annotations.ground_markers());
            }
            (Some(dir), None) => debug!(
                "ignoring annotations in {} without a reference",
                dir.display()
            ),
            _ => {}
        }

        composer.set_surface(surface);
        Ok(composer)
    }

    /// Draws every frame in order with one composer.
    pub fn render(&self) -> Result<Vec<DrawList>, HudError> {
        let mut composer = self.composer()?;
        self.frames
            .iter()
            .enumerate()
            .map(|(index, frame)| {
                frame.apply(&mut composer)?;
                let mut canvas = DrawList::new(self.width, self.height);
                composer.draw(&mut canvas);
                debug!("frame {index}: {} draw commands", canvas.len());
                Ok(canvas)
            })
            .collect()
    }
}
