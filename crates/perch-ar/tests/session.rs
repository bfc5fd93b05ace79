use perch_ar::{
    ArController, ControllerEvent, Frame, GestureMode, HitPose, HitTestBackend, HitTestSourceId,
    InputEvent, PlacementState, PointerId, SelectSource,
};
use perch_base::{ControllerConfig, SessionError, SessionId};
use perch_geometry::{Camera, Ray, Viewport, vec2, vec3};
use perch_scene::{
    AnimationClip, AudioSource, LoadedScene, Node, Result, SceneGraph, TriMesh,
};

const EPSILON: f64 = 1e-9;
const SOURCE: HitTestSourceId = HitTestSourceId(11);

#[derive(Default)]
struct FakeBackend {
    unsupported: bool,
    requests: Vec<SessionId>,
    released: Vec<HitTestSourceId>,
    hits: Vec<HitPose>,
}

impl HitTestBackend for FakeBackend {
    fn supports_hit_test(&self) -> bool {
        !self.unsupported
    }

    fn request_hit_test_source(&mut self, session: SessionId) -> std::result::Result<(), SessionError> {
        self.requests.push(session);
        Ok(())
    }

    fn hit_test(&mut self, _source: HitTestSourceId) -> Vec<HitPose> {
        self.hits.clone()
    }

    fn release_hit_test_source(&mut self, source: HitTestSourceId) {
        self.released.push(source);
    }
}

fn camera() -> Camera {
    Camera {
        viewport: Viewport::new(800.0, 600.0),
        ..Camera::default()
    }
}

fn frame() -> Frame {
    Frame::new(0.016, camera())
}

fn floor_hit() -> HitPose {
    HitPose {
        position: vec3(0.0, 0.0, -2.0),
        ..HitPose::default()
    }
}

fn quad(z: f64) -> Result<TriMesh> {
    TriMesh::from_polygons(
        vec![
            vec3(-0.1, -0.1, z),
            vec3(0.1, -0.1, z),
            vec3(0.1, 0.1, z),
            vec3(-0.1, 0.1, z),
        ],
        &[vec![0, 1, 2, 3]],
    )
}

fn scene() -> Result<LoadedScene> {
    let mut graph = SceneGraph::new(Node::group("root"));
    let root = graph.root();
    graph.add_child(root, Node::mesh("Walk", quad(0.1)?))?;
    graph.add_child(root, Node::mesh("Idle", quad(-0.1)?))?;
    graph.add_child(root, Node::audio("chirp", AudioSource::default()))?;
    Ok(LoadedScene {
        graph: Some(graph),
        clips: vec![AnimationClip::new("Walk", 1.2), AnimationClip::new("Idle", 3.0)],
    })
}

fn controller() -> ArController<FakeBackend> {
    ArController::new(FakeBackend::default(), ControllerConfig::default()).expect("default config")
}

fn acquire(controller: &mut ArController<FakeBackend>, session: SessionId) {
    controller.begin_session(session).expect("hit test supported");
    controller.tick(frame());
    controller.tick(frame().with_event(InputEvent::HitTestSourceReady {
        session,
        source: SOURCE,
    }));
}

fn placed() -> Result<ArController<FakeBackend>> {
    let mut controller = controller();
    controller.load_asset(scene()?).expect("graph present");
    acquire(&mut controller, SessionId(1));
    controller.backend_mut().hits = vec![floor_hit()];
    controller.tick(frame());
    controller.tick(frame().with_event(InputEvent::Select(SelectSource::Screen(vec2(400.0, 300.0)))));
    assert_eq!(controller.placement_state(), PlacementState::Placed);
    Ok(controller)
}

fn select_center() -> InputEvent {
    InputEvent::Select(SelectSource::Screen(vec2(400.0, 300.0)))
}

#[test]
fn reticle_tracks_hits_while_searching() {
    let mut controller = controller();
    acquire(&mut controller, SessionId(1));
    assert!(!controller.reticle().is_visible());

    controller.backend_mut().hits = vec![floor_hit()];
    controller.tick(frame());
    assert_eq!(controller.reticle().pose(), Some(&floor_hit()));

    controller.backend_mut().hits.clear();
    controller.tick(frame());
    assert!(!controller.reticle().is_visible());
}

#[test]
fn source_is_requested_once_per_session() {
    let mut controller = controller();
    let session = SessionId(3);
    controller.begin_session(session).expect("hit test supported");

    let events = controller.tick(frame());
    assert_eq!(events, vec![ControllerEvent::HitTestRequested { session }]);
    for _ in 0..3 {
        assert!(controller.tick(frame()).is_empty());
    }
    assert_eq!(controller.backend().requests, vec![session]);
}

#[test]
fn select_places_once_and_stops_hit_testing() -> Result<()> {
    let mut controller = controller();
    let id = controller.load_asset(scene()?).expect("graph present");
    acquire(&mut controller, SessionId(1));
    controller.backend_mut().hits = vec![floor_hit()];
    controller.tick(frame());

    let events = controller.tick(frame().with_event(select_center()));
    assert!(events.contains(&ControllerEvent::Placed {
        asset: id,
        pose: floor_hit(),
    }));
    assert_eq!(controller.placement_state(), PlacementState::Placed);
    assert!(!controller.reticle().is_visible());
    assert_eq!(controller.backend().released, vec![SOURCE]);

    let placed_at = controller.asset().map(|asset| asset.transform.translation);
    assert_eq!(placed_at, Some(floor_hit().position));

    // A second select over the object is a mesh selection, not a re-placement.
    let events = controller.tick(frame().with_event(select_center()));
    assert!(!events.iter().any(|e| matches!(e, ControllerEvent::Placed { .. })));
    assert!(!controller.reticle().is_visible());
    assert_eq!(controller.backend().requests.len(), 1);
    Ok(())
}

#[test]
fn select_without_reticle_or_asset_is_ignored() -> Result<()> {
    let mut controller = controller();
    acquire(&mut controller, SessionId(1));
    controller.backend_mut().hits = vec![floor_hit()];
    controller.tick(frame().with_event(select_center()));
    assert_eq!(controller.placement_state(), PlacementState::Searching);

    controller.load_asset(scene()?);
    controller.backend_mut().hits.clear();
    controller.tick(frame().with_event(select_center()));
    assert_eq!(controller.placement_state(), PlacementState::Searching);
    Ok(())
}

#[test]
fn selecting_walk_mesh_plays_walk_clip_and_audio() -> Result<()> {
    let mut controller = placed()?;

    let events = controller.tick(frame().with_event(select_center()));
    assert_eq!(
        events,
        vec![
            ControllerEvent::Selected {
                mesh_index: 0,
                name: "Walk".to_string(),
            },
            ControllerEvent::AudioStarted { index: 0 },
            ControllerEvent::ClipStarted {
                index: 0,
                name: "Walk".to_string(),
            },
        ]
    );
    assert_eq!(controller.mixer().and_then(|m| m.active()), Some(0));
    assert!(controller.audio().emitters()[0].playing);

    assert!(controller.play_clip(1));
    assert_eq!(controller.mixer().and_then(|m| m.active()), Some(1));
    assert!(!controller.play_clip(9));
    Ok(())
}

#[test]
fn selection_miss_changes_nothing() -> Result<()> {
    let mut controller = placed()?;
    controller.tick(frame().with_event(select_center()));

    let away = Ray::new(vec3(0.0, 0.0, 0.0), vec3(0.0, 1.0, 0.0)).expect("non-zero direction");
    let events = controller.tick(frame().with_event(InputEvent::Select(SelectSource::Ray(away))));
    assert!(events.is_empty());
    assert_eq!(controller.selected().map(|s| s.name.as_str()), Some("Walk"));
    assert_eq!(controller.mixer().and_then(|m| m.active()), Some(0));
    Ok(())
}

#[test]
fn animation_advances_regardless_of_placement() -> Result<()> {
    let mut controller = controller();
    controller.load_asset(scene()?);
    assert!(controller.play_clip(0));
    controller.tick(Frame::new(0.5, camera()));
    controller.tick(Frame::new(1.0, camera()));

    let time = controller.mixer().and_then(|m| m.time()).expect("clip running");
    assert!((time - 0.3).abs() < EPSILON);
    Ok(())
}

#[test]
fn pinch_scales_placed_object() -> Result<()> {
    let mut controller = placed()?;
    let start = controller.asset().map(|a| a.transform.uniform_scale()).expect("asset");

    controller.tick(
        frame()
            .with_event(InputEvent::PointerDown {
                pointer: PointerId(1),
                position: vec2(100.0, 300.0),
            })
            .with_event(InputEvent::PointerDown {
                pointer: PointerId(2),
                position: vec2(300.0, 300.0),
            }),
    );
    assert_eq!(controller.gesture_mode(), GestureMode::Pinch);

    controller.tick(frame().with_event(InputEvent::PointerMove {
        pointer: PointerId(2),
        position: vec2(400.0, 300.0),
    }));
    let scale = controller.asset().map(|a| a.transform.uniform_scale()).expect("asset");
    assert!((scale - start * 1.5).abs() < EPSILON);

    controller.tick(
        frame()
            .with_event(InputEvent::PointerUp { pointer: PointerId(1) })
            .with_event(InputEvent::PointerCancel { pointer: PointerId(2) }),
    );
    assert_eq!(controller.gesture_mode(), GestureMode::Idle);
    Ok(())
}

#[test]
fn drag_moves_placed_object_and_is_ignored_before_placement() -> Result<()> {
    let mut controller = controller();
    controller.load_asset(scene()?);
    controller.tick(
        frame()
            .with_event(InputEvent::PointerDown {
                pointer: PointerId(1),
                position: vec2(400.0, 300.0),
            })
            .with_event(InputEvent::PointerMove {
                pointer: PointerId(1),
                position: vec2(700.0, 300.0),
            }),
    );
    assert_eq!(controller.gesture_mode(), GestureMode::Idle);

    let mut controller = placed()?;
    controller.tick(
        frame()
            .with_event(InputEvent::PointerDown {
                pointer: PointerId(1),
                position: vec2(400.0, 300.0),
            })
            .with_event(InputEvent::PointerMove {
                pointer: PointerId(1),
                position: vec2(700.0, 300.0),
            }),
    );
    let position = controller.asset().map(|a| a.transform.translation).expect("asset");
    assert!(position.x > 0.0);
    assert!((position.z + 2.0).abs() < EPSILON);
    Ok(())
}

#[test]
fn session_end_mid_search_resets_and_next_session_reacquires() -> Result<()> {
    let mut controller = controller();
    controller.load_asset(scene()?);
    acquire(&mut controller, SessionId(1));
    controller.backend_mut().hits = vec![floor_hit()];
    controller.tick(frame());
    assert!(controller.reticle().is_visible());

    let events = controller.tick(frame().with_event(InputEvent::SessionEnded {
        session: SessionId(1),
    }));
    assert!(events.contains(&ControllerEvent::SessionReset {
        session: SessionId(1)
    }));
    assert!(!controller.reticle().is_visible());
    assert_eq!(controller.placement_state(), PlacementState::Searching);
    assert!(!controller.hit_test().is_requested());
    assert_eq!(controller.backend().released, vec![SOURCE]);

    acquire(&mut controller, SessionId(2));
    assert_eq!(controller.backend().requests, vec![SessionId(1), SessionId(2)]);
    controller.tick(frame());
    assert!(controller.reticle().is_visible());
    Ok(())
}

#[test]
fn ending_session_after_placement_returns_to_searching() -> Result<()> {
    let mut controller = placed()?;
    controller.end_session().expect("session active");
    assert_eq!(controller.placement_state(), PlacementState::Searching);
    assert!(controller.session().is_none());
    Ok(())
}

#[test]
fn late_source_for_ended_session_is_released() {
    let mut controller = controller();
    controller.begin_session(SessionId(1)).expect("hit test supported");
    controller.tick(frame());
    controller.begin_session(SessionId(2)).expect("hit test supported");

    controller.tick(frame().with_event(InputEvent::HitTestSourceReady {
        session: SessionId(1),
        source: HitTestSourceId(7),
    }));
    assert_eq!(controller.backend().released, vec![HitTestSourceId(7)]);
    assert!(controller.hit_test().source().is_none());
    assert_eq!(controller.backend().requests, vec![SessionId(1), SessionId(2)]);
}

#[test]
fn unsupported_platform_fails_session_start() {
    let backend = FakeBackend {
        unsupported: true,
        ..FakeBackend::default()
    };
    let mut controller =
        ArController::new(backend, ControllerConfig::default()).expect("default config");
    assert_eq!(
        controller.begin_session(SessionId(1)),
        Err(SessionError::HitTestUnsupported)
    );
    assert!(controller.session().is_none());
    assert!(controller.tick(frame()).is_empty());
}

#[test]
fn loading_without_graph_leaves_controller_empty() -> Result<()> {
    let mut controller = placed()?;
    controller.tick(frame().with_event(select_center()));
    controller.tick(frame());

    assert!(controller.load_asset(LoadedScene::default()).is_none());
    let events = controller.tick(frame());
    assert!(events.contains(&ControllerEvent::AssetCleared));
    assert!(controller.asset().is_none());
    assert!(controller.mixer().is_none());
    assert!(controller.selected().is_none());
    assert_eq!(controller.placement_state(), PlacementState::Searching);
    Ok(())
}

#[test]
fn reloading_in_session_searches_again() -> Result<()> {
    let mut controller = placed()?;
    controller.load_asset(scene()?);

    let events = controller.tick(frame());
    assert!(events.contains(&ControllerEvent::HitTestRequested {
        session: SessionId(1)
    }));
    assert_eq!(controller.backend().requests.len(), 2);
    Ok(())
}

#[test]
fn panel_reflects_controller_state() -> Result<()> {
    let mut controller = placed()?;
    controller.tick(frame().with_event(select_center()));

    let panel = controller.panel();
    assert_eq!(panel.placement, PlacementState::Placed);
    assert!(!panel.reticle_visible);
    assert_eq!(panel.animations, ["Walk", "Idle"]);
    assert_eq!(panel.active_animation, Some(0));
    assert_eq!(panel.selected_mesh.as_deref(), Some("Walk"));
    assert_eq!(panel.audio.len(), 1);
    assert!(panel.audio[0].playing);
    Ok(())
}
