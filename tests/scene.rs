use aerohud::{canvas::DrawCommand, scene::Scene};
use std::path::Path;

fn demo() -> Scene {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/scene.json");
    Scene::from_path(path).expect("demo scene parses")
}

#[test]
fn demo_scene_renders_every_frame() {
    let scene = demo();
    let lists = scene.render().expect("demo scene renders");

    assert_eq!(lists.len(), scene.frames.len());
    for list in &lists {
        assert!(list.texts().any(|t| t == "Kt"));
        assert!(list.texts().any(|t| t == "Ft"));
    }

    // Nearby airports carry their distance.
    assert!(lists[0].texts().any(|t| t.starts_with("KMSP (")));
}

#[test]
fn manual_frame_ends_with_the_nose_and_auto_frame_does_not() {
    let lists = demo().render().expect("demo scene renders");

    assert!(matches!(
        lists[0].commands().last(),
        Some(DrawCommand::Circle { .. })
    ));
    assert!(!matches!(
        lists[1].commands().last(),
        Some(DrawCommand::Circle { .. })
    ));
}

#[test]
fn draw_lists_serialize_as_json() {
    let lists = demo().render().expect("demo scene renders");
    let json = serde_json::to_value(&lists[0]).expect("draw lists serialize");

    assert_eq!(json["width"], 1280);
    assert_eq!(json["height"], 720);
    assert!(
        json["commands"]
            .as_array()
            .is_some_and(|commands| commands.iter().all(|c| c["op"].is_string()))
    );
}
