use aerohud::{
    CameraIntrinsics, CameraPose, DrawList, FrameComposer, Projection, Projector, Stage,
    canvas::DrawCommand,
    ephemeris::FixedEphemeris,
    style::RenderStyle,
    symbols::{DrawContext, GroundMarker, HudRenderer, conformal::COMPASS_LABEL_HEIGHT},
    telemetry::{AirData, Attitude, AutopilotTargets, FlightMode, Telemetry},
};
use nalgebra::Vector3;
use quickcheck_macros::quickcheck;

const WIDTH: u32 = 1280;
const HEIGHT: u32 = 720;

fn intrinsics() -> CameraIntrinsics {
    CameraIntrinsics::new(900.0, 900.0, 640.5, 360.5).expect("focal lengths are positive")
}

fn north_projector() -> Projector {
    Projector::new(intrinsics()).with_pose(CameraPose::looking_north())
}

fn composer(attitude: Attitude, mode: FlightMode) -> FrameComposer {
    let pose = CameraPose::from_attitude(&Vector3::zeros(), &attitude.quaternion());
    let mut composer = FrameComposer::new(
        Projector::new(intrinsics()).with_pose(pose),
        RenderStyle::default(),
    );

    let telemetry = composer.telemetry_mut();
    telemetry.update_attitude(attitude);
    telemetry.update_velocity(Vector3::new(25.0, 5.0, -1.0));
    telemetry.update_air_data(AirData {
        airspeed_kt: 55.0,
        altitude_m: 250.0,
    });
    telemetry.update_autopilot(
        mode,
        AutopilotTargets {
            roll_deg: -10.0,
            pitch_deg: 3.0,
            heading_deg: 15.0,
            speed_kt: 60.0,
            altitude_m: 260.0,
        },
    );
    composer
}

#[test]
fn level_horizon_is_repeatable_and_north_is_in_frame() {
    let telemetry = Telemetry::new();
    let (projector, style) = (north_projector(), RenderStyle::default());
    let ctx = DrawContext::new(&telemetry, &projector, &style);
    let renderer = HudRenderer::new();

    let frames: Vec<DrawList> = (0..3)
        .map(|_| {
            let mut list = DrawList::new(WIDTH, HEIGHT);
            renderer.draw_horizon(&mut list, &ctx, 10);
            list
        })
        .collect();
    assert!(!frames[0].is_empty());
    assert!(frames.windows(2).all(|pair| pair[0] == pair[1]));

    match projector.project(&Vector3::new(1.0, 0.0, -COMPASS_LABEL_HEIGHT)) {
        Projection::Visible(pixel) => {
            assert!((0..WIDTH as i32).contains(&pixel.u()));
            assert!((0..HEIGHT as i32).contains(&pixel.v()));
        }
        Projection::NotVisible => panic!("north label should be ahead of the camera"),
    }
}

#[quickcheck]
fn points_near_or_behind_the_camera_never_reach_a_pixel(n: i16, e: i16, d: i16) -> bool {
    let projector = north_projector();
    // Behind or within 0.1 m of the image plane of a north-looking camera.
    let north = -(n as f64).abs() / 100.0 + 0.1;
    let ned = Vector3::new(north, e as f64, d as f64);

    projector.project(&ned) == Projection::NotVisible
}

#[quickcheck]
fn projection_is_a_pure_function(n: u16, e: i16, d: i16) -> bool {
    let projector = north_projector();
    let ned = Vector3::new(n as f64 + 0.2, e as f64 / 10.0, d as f64 / 10.0);

    projector.project(&ned) == projector.clone().project(&ned)
}

#[test]
fn full_frame_draws_every_stage() {
    let mut composer = composer(Attitude::new(0.0, 0.05, 0.2), FlightMode::Auto)
        .with_ephemeris(FixedEphemeris::new(Some(Vector3::new(1.0, 0.2, -0.1)), None));
    composer.set_ground_markers(vec![GroundMarker::new(
        "KSGS",
        Vector3::new(4000.0, 1200.0, 250.0),
    )]);

    let mut list = DrawList::new(WIDTH, HEIGHT);
    composer.draw(&mut list);
    let texts: Vec<&str> = list.texts().collect();

    assert!(texts.contains(&"N"));
    assert!(texts.contains(&"Sun"));
    assert!(texts.iter().any(|t| t.starts_with("KSGS (")));
    assert!(texts.contains(&"Kt"));
    assert!(texts.contains(&"Ft"));
    // Director cues come last, so the frame ends with the course pointer.
    assert!(matches!(
        list.commands().last(),
        Some(DrawCommand::Line { .. })
    ));
}

#[test]
fn composers_do_not_share_filter_state() {
    let attitude = Attitude::default();
    let mut busy = composer(attitude, FlightMode::Manual);
    let mut idle = composer(attitude, FlightMode::Manual);

    for _ in 0..5 {
        busy.draw(&mut DrawList::new(WIDTH, HEIGHT));
    }
    idle.draw(&mut DrawList::new(WIDTH, HEIGHT));

    assert!(busy.renderer().filtered_velocity().x > idle.renderer().filtered_velocity().x);
}

#[test]
fn switching_to_manual_hides_director_cues() {
    let mut composer = composer(Attitude::default(), FlightMode::Auto);

    let mut auto = DrawList::new(WIDTH, HEIGHT);
    composer.draw_stage(Stage::Autopilot, &mut auto);

    let targets = *composer.telemetry().autopilot();
    composer
        .telemetry_mut()
        .update_autopilot(FlightMode::Manual, targets);
    let mut manual = DrawList::new(WIDTH, HEIGHT);
    composer.draw_stage(Stage::Autopilot, &mut manual);

    assert!(auto.len() > manual.len());
    assert_eq!(manual.len(), 2);
}

#[test]
fn out_of_range_air_data_skips_tapes_without_failing() {
    let cases = [
        (1e19, 250.0, 60.0),
        (55.0, f64::INFINITY, 60.0),
        (55.0, 250.0, -1e12),
    ];

    for (airspeed_kt, altitude_m, speed_kt) in cases {
        let mut composer = composer(Attitude::default(), FlightMode::Auto);
        let telemetry = composer.telemetry_mut();
        telemetry.update_air_data(AirData {
            airspeed_kt,
            altitude_m,
        });
        let targets = AutopilotTargets {
            speed_kt,
            ..*telemetry.autopilot()
        };
        telemetry.update_autopilot(FlightMode::Auto, targets);

        let mut list = DrawList::new(WIDTH, HEIGHT);
        composer.draw_stage(Stage::Fixed, &mut list);

        let texts: Vec<&str> = list.texts().collect();
        assert_eq!(texts.contains(&"Kt"), airspeed_kt.abs() < 1e10);
        assert_eq!(texts.contains(&"Ft"), altitude_m.is_finite());
    }
}
