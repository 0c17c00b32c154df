//! Per-frame orchestration of the symbol routines.

#[cfg(feature = "serde")]
use crate::config::HudConfig;
use crate::{
    canvas::Canvas,
    ephemeris::{Ephemeris, NoEphemeris},
    projection::{CameraPose, Projector},
    style::RenderStyle,
    surface::{ElevationSource, NoSurface},
    symbols::{DrawContext, GeoMarker, GroundMarker, HudRenderer, conformal::HORIZON_DIVISIONS},
    telemetry::{FlightMode, Telemetry},
};
use log::debug;

/// A group of symbology drawn together.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    /// World-locked symbols: horizon, compass, ladder, astro and ground markers, velocity vector.
    Conformal,
    /// Screen-locked speed and altitude tapes.
    Fixed,
    /// Flight-director cues, or the nose reticle when flying by hand.
    Autopilot,
}

impl Stage {
    /// Later stages draw over earlier ones.
    pub const ORDER: [Stage; 3] = [Stage::Conformal, Stage::Fixed, Stage::Autopilot];
}

/// Owns everything needed to draw one camera's HUD, frame after frame.
pub struct FrameComposer {
    telemetry: Telemetry,
    projector: Projector,
    style: RenderStyle,
    renderer: HudRenderer,
    ephemeris: Box<dyn Ephemeris>,
    surface: Box<dyn ElevationSource>,
    geo_markers: Vec<GeoMarker>,
    ground_markers: Vec<GroundMarker>,
}

impl FrameComposer {
    /// A composer with no ephemeris, flat ground and no markers.
    pub fn new(projector: Projector, style: RenderStyle) -> Self {
        Self {
            telemetry: Telemetry::new(),
            projector,
            style,
            renderer: HudRenderer::new(),
            ephemeris: Box::new(NoEphemeris),
            surface: Box::new(NoSurface),
            geo_markers: Vec::new(),
            ground_markers: Vec::new(),
        }
    }

    /// Takes the style and points of interest from `config`.
    #[cfg(feature = "serde")]
    pub fn from_config(projector: Projector, config: &HudConfig) -> Self {
        let mut composer = Self::new(projector, config.style());
        composer.set_geo_markers(config.points_of_interest.clone());
        composer
    }

    pub fn with_ephemeris(mut self, ephemeris: impl Ephemeris + 'static) -> Self {
        self.ephemeris = Box::new(ephemeris);
        self
    }

    pub fn with_surface(mut self, surface: impl ElevationSource + 'static) -> Self {
        self.surface = Box::new(surface);
        self
    }

    pub fn set_ephemeris(&mut self, ephemeris: Box<dyn Ephemeris>) {
        self.ephemeris = ephemeris;
    }

    pub fn set_surface(&mut self, surface: Box<dyn ElevationSource>) {
        self.surface = surface;
    }

    pub fn set_geo_markers(&mut self, markers: Vec<GeoMarker>) {
        self.geo_markers = markers;
    }

    pub fn set_ground_markers(&mut self, markers: Vec<GroundMarker>) {
        self.ground_markers = markers;
    }

    pub fn set_pose(&mut self, pose: CameraPose) {
        self.projector.set_pose(pose);
    }

    pub fn telemetry(&self) -> &Telemetry {
        &self.telemetry
    }

    pub fn telemetry_mut(&mut self) -> &mut Telemetry {
        &mut self.telemetry
    }

    pub fn projector(&self) -> &Projector {
        &self.projector
    }

    pub fn style(&self) -> &RenderStyle {
        &self.style
    }

    pub fn style_mut(&mut self) -> &mut RenderStyle {
        &mut self.style
    }

    pub fn renderer(&self) -> &HudRenderer {
        &self.renderer
    }

    pub fn surface(&self) -> &dyn ElevationSource {
        self.surface.as_ref()
    }

    /// Draws every stage in [`Stage::ORDER`].
    pub fn draw(&mut self, canvas: &mut impl Canvas) {
        for stage in Stage::ORDER {
            self.draw_stage(stage, canvas);
        }
    }

    pub fn draw_stage(&mut self, stage: Stage, canvas: &mut impl Canvas) {
        debug!("drawing {stage:?} stage");

        let ctx = DrawContext::new(&self.telemetry, &self.projector, &self.style);
        let renderer = &mut self.renderer;
        match stage {
            Stage::Conformal => {
                renderer.draw_horizon(canvas, &ctx, HORIZON_DIVISIONS);
                renderer.draw_compass_points(canvas, &ctx);
                renderer.draw_pitch_ladder(canvas, &ctx);
                renderer.draw_astro(canvas, &ctx, self.ephemeris.as_ref());
                renderer.draw_geo_markers(canvas, &ctx, &self.geo_markers, self.surface.as_ref());
                renderer.draw_ground_markers(canvas, &ctx, &self.ground_markers);
                renderer.draw_velocity_vector(canvas, &ctx);
            }
            Stage::Fixed => {
                renderer.draw_speed_tape(canvas, &ctx);
                renderer.draw_altitude_tape(canvas, &ctx);
            }
            Stage::Autopilot => match self.telemetry.mode() {
                FlightMode::Manual => renderer.draw_nose(canvas, &ctx),
                _ => {
                    renderer.draw_vbars(canvas, &ctx);
                    renderer.draw_heading_bug(canvas, &ctx);
                    renderer.draw_bird(canvas, &ctx);
                    renderer.draw_course(canvas, &ctx);
                }
            },
        }

        debug!("finished {stage:?} stage");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        canvas::{DrawCommand, DrawList},
        projection::CameraIntrinsics,
        style::Rgb,
        telemetry::{AirData, Attitude, AutopilotTargets},
    };
    use nalgebra::Vector3;

    fn composer(mode: FlightMode) -> FrameComposer {
        let attitude = Attitude::new(0.05, 0.1, 0.3);
        let intrinsics = CameraIntrinsics::new(800.0, 800.0, 640.5, 360.5).unwrap();
        let pose = CameraPose::from_attitude(&Vector3::zeros(), &attitude.quaternion());

        let mut composer = FrameComposer::new(
            Projector::new(intrinsics).with_pose(pose),
            RenderStyle::default(),
        );
        let telemetry = composer.telemetry_mut();
        telemetry.update_attitude(attitude);
        telemetry.update_velocity(Vector3::new(30.0, 10.0, 0.0));
        telemetry.update_air_data(AirData {
            airspeed_kt: 62.0,
            altitude_m: 300.0,
        });
        telemetry.update_autopilot(
            mode,
            AutopilotTargets {
                roll_deg: 5.0,
                pitch_deg: 4.0,
                heading_deg: 20.0,
                speed_kt: 65.0,
                altitude_m: 310.0,
            },
        );
        composer
    }

    #[test]
    fn stages_run_conformal_then_fixed_then_autopilot() {
        assert_eq!(
            Stage::ORDER,
            [Stage::Conformal, Stage::Fixed, Stage::Autopilot]
        );

        let mut whole = DrawList::new(1280, 720);
        composer(FlightMode::Auto).draw(&mut whole);

        let mut staged = DrawList::new(1280, 720);
        let mut parts = composer(FlightMode::Auto);
        for stage in Stage::ORDER {
            parts.draw_stage(stage, &mut staged);
        }

        assert!(!whole.is_empty());
        assert_eq!(whole, staged);
    }

    #[test]
    fn manual_mode_draws_only_the_nose() {
        let mut list = DrawList::new(1280, 720);
        composer(FlightMode::Manual).draw_stage(Stage::Autopilot, &mut list);

        assert_eq!(list.len(), 2);
        assert!(
            list.commands()
                .iter()
                .all(|c| matches!(c, DrawCommand::Circle { .. }))
        );
    }

    #[test]
    fn auto_mode_draws_director_cues() {
        let mut list = DrawList::new(1280, 720);
        composer(FlightMode::Auto).draw_stage(Stage::Autopilot, &mut list);

        assert!(list.commands().iter().any(|c| matches!(
            c,
            DrawCommand::Polygon { color, .. } if *color == Rgb::MEDIUM_ORCHID
        )));
        assert!(
            !list
                .commands()
                .iter()
                .any(|c| matches!(c, DrawCommand::Circle { .. }))
        );
    }

    #[test]
    fn other_modes_count_as_autopilot() {
        let mut manual = DrawList::new(1280, 720);
        let mut loiter = DrawList::new(1280, 720);
        composer(FlightMode::Manual).draw_stage(Stage::Autopilot, &mut manual);
        composer("loiter".into()).draw_stage(Stage::Autopilot, &mut loiter);

        assert!(loiter.len() > manual.len());
    }

    #[test]
    fn without_pose_only_tapes_are_drawn() {
        let intrinsics = CameraIntrinsics::new(800.0, 800.0, 640.5, 360.5).unwrap();
        let mut composer = FrameComposer::new(Projector::new(intrinsics), RenderStyle::default());

        let mut list = DrawList::new(1280, 720);
        composer.draw_stage(Stage::Conformal, &mut list);
        composer.draw_stage(Stage::Autopilot, &mut list);
        assert!(list.is_empty());

        composer.draw_stage(Stage::Fixed, &mut list);
        assert!(!list.is_empty());
    }
}
