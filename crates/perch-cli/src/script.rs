use anyhow::{Context, Result};
use perch_ar::{
    ArController, ControllerEvent, Frame, HitPose, HitTestBackend, HitTestSourceId, InputEvent,
    PointerId, SelectSource,
};
use perch_base::{SessionError, SessionId};
use perch_geometry::{Camera, Deg, Quat, Ray, Vec2, Viewport, vec2};
use serde::Deserialize;
use tracing::{debug, info, warn};

#[derive(Debug, Deserialize)]
pub struct SimulationScript {
    #[serde(default = "default_session")]
    pub session: u64,
    #[serde(default = "default_true")]
    pub hit_test_supported: bool,
    pub frames: Vec<ScriptFrame>,
}

#[derive(Debug, Deserialize)]
pub struct ScriptFrame {
    #[serde(default = "default_elapsed")]
    pub elapsed: f64,
    pub camera: Option<CameraDocument>,
    #[serde(default)]
    pub hits: Vec<HitPose>,
    #[serde(default)]
    pub events: Vec<ScriptEvent>,
}

#[derive(Clone, Copy, Debug, Deserialize)]
pub struct CameraDocument {
    #[serde(default)]
    pub position: [f64; 3],
    #[serde(default = "identity_wxyz")]
    pub orientation: [f64; 4],
    #[serde(default = "default_fov")]
    pub fov_deg: f64,
    pub viewport: [f64; 2],
}

impl CameraDocument {
    pub fn to_camera(self) -> Camera {
        let [w, x, y, z] = self.orientation;
        Camera {
            position: self.position.into(),
            orientation: Quat::new(w, x, y, z),
            fov_y: Deg(self.fov_deg).into(),
            viewport: Viewport::new(self.viewport[0], self.viewport[1]),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptEvent {
    Tap { at: [f64; 2] },
    ControllerSelect { origin: [f64; 3], direction: [f64; 3] },
    PointerDown { pointer: u64, at: [f64; 2] },
    PointerMove { pointer: u64, at: [f64; 2] },
    PointerUp { pointer: u64 },
    PointerCancel { pointer: u64 },
    BeginSession { session: u64 },
    EndSession,
    PlayClip { index: usize },
}

// Lifecycle calls run in script order, before the frame's tick.
pub enum Dispatch {
    Input(InputEvent),
    BeginSession(SessionId),
    EndSession,
    PlayClip(usize),
}

impl ScriptEvent {
    pub fn dispatch(&self) -> Option<Dispatch> {
        let event = match *self {
            ScriptEvent::Tap { at } => InputEvent::Select(SelectSource::Screen(point(at))),
            ScriptEvent::ControllerSelect { origin, direction } => {
                InputEvent::Select(SelectSource::Ray(Ray::new(origin.into(), direction.into())?))
            }
            ScriptEvent::PointerDown { pointer, at } => InputEvent::PointerDown {
                pointer: PointerId(pointer),
                position: point(at),
            },
            ScriptEvent::PointerMove { pointer, at } => InputEvent::PointerMove {
                pointer: PointerId(pointer),
                position: point(at),
            },
            ScriptEvent::PointerUp { pointer } => InputEvent::PointerUp {
                pointer: PointerId(pointer),
            },
            ScriptEvent::PointerCancel { pointer } => InputEvent::PointerCancel {
                pointer: PointerId(pointer),
            },
            ScriptEvent::BeginSession { session } => {
                return Some(Dispatch::BeginSession(SessionId(session)));
            }
            ScriptEvent::EndSession => return Some(Dispatch::EndSession),
            ScriptEvent::PlayClip { index } => return Some(Dispatch::PlayClip(index)),
        };
        Some(Dispatch::Input(event))
    }
}

pub fn play(
    frames: Vec<ScriptFrame>,
    controller: &mut ArController<ScriptedBackend>,
) -> Result<Vec<ControllerEvent>> {
    let mut emitted = Vec::new();
    let mut camera = Camera::default();
    for (index, scripted) in frames.into_iter().enumerate() {
        if let Some(doc) = scripted.camera {
            camera = doc.to_camera();
        }
        controller.backend_mut().hits = scripted.hits;

        let mut frame = Frame::new(scripted.elapsed, camera);
        frame.events = controller.backend_mut().take_completions();
        for event in &scripted.events {
            match event.dispatch() {
                Some(Dispatch::Input(input)) => frame.events.push(input),
                Some(Dispatch::BeginSession(session)) => controller
                    .begin_session(session)
                    .with_context(|| format!("frame {index}: failed to start {session}"))?,
                Some(Dispatch::EndSession) => {
                    if let Err(err) = controller.end_session() {
                        warn!(frame = index, %err, "end_session ignored");
                    }
                }
                Some(Dispatch::PlayClip(clip)) => {
                    if !controller.play_clip(clip) {
                        info!(frame = index, clip, "no such clip");
                    }
                }
                None => info!(frame = index, ?event, "skipping degenerate event"),
            }
        }

        for event in controller.tick(frame) {
            info!(frame = index, ?event, "controller event");
            emitted.push(event);
        }
    }
    Ok(emitted)
}

fn point(at: [f64; 2]) -> Vec2 {
    vec2(at[0], at[1])
}

fn default_session() -> u64 {
    1
}

fn default_true() -> bool {
    true
}

fn default_elapsed() -> f64 {
    1.0 / 60.0
}

fn default_fov() -> f64 {
    60.0
}

fn identity_wxyz() -> [f64; 4] {
    [1.0, 0.0, 0.0, 0.0]
}

#[derive(Debug, Default)]
pub struct ScriptedBackend {
    pub supported: bool,
    pub hits: Vec<HitPose>,
    next_source: u64,
    completed: Vec<(SessionId, HitTestSourceId)>,
    live: Vec<HitTestSourceId>,
}

impl ScriptedBackend {
    pub fn new(supported: bool) -> Self {
        Self {
            supported,
            ..Self::default()
        }
    }

    pub fn take_completions(&mut self) -> Vec<InputEvent> {
        self.completed
            .drain(..)
            .map(|(session, source)| InputEvent::HitTestSourceReady { session, source })
            .collect()
    }

    pub fn live_sources(&self) -> usize {
        self.live.len()
    }
}

impl HitTestBackend for ScriptedBackend {
    fn supports_hit_test(&self) -> bool {
        self.supported
    }

    fn request_hit_test_source(
        &mut self,
        session: SessionId,
    ) -> std::result::Result<(), SessionError> {
        if !self.supported {
            return Err(SessionError::HitTestUnsupported);
        }
        self.next_source += 1;
        let source = HitTestSourceId(self.next_source);
        self.live.push(source);
        self.completed.push((session, source));
        debug!(%session, source = source.0, "scripted source requested");
        Ok(())
    }

    fn hit_test(&mut self, source: HitTestSourceId) -> Vec<HitPose> {
        if self.live.contains(&source) {
            self.hits.clone()
        } else {
            Vec::new()
        }
    }

    fn release_hit_test_source(&mut self, source: HitTestSourceId) {
        self.live.retain(|live| *live != source);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use perch_base::ControllerConfig;

    #[test]
    fn parses_minimal_script() -> serde_json::Result<()> {
        let script: SimulationScript = serde_json::from_str(
            r#"{
                "frames": [
                    { "camera": { "viewport": [800, 600] } },
                    {
                        "hits": [{ "position": [0, -1, -2] }],
                        "events": [{ "type": "tap", "at": [400, 300] }, { "type": "end_session" }]
                    }
                ]
            }"#,
        )?;
        assert_eq!(script.session, 1);
        assert!(script.hit_test_supported);
        assert_eq!(script.frames.len(), 2);
        assert!((script.frames[0].elapsed - 1.0 / 60.0).abs() < 1e-12);
        assert_eq!(script.frames[1].hits[0].position.z, -2.0);
        assert!(matches!(
            script.frames[1].events[0].dispatch(),
            Some(Dispatch::Input(InputEvent::Select(SelectSource::Screen(_))))
        ));
        assert!(matches!(
            script.frames[1].events[1].dispatch(),
            Some(Dispatch::EndSession)
        ));
        Ok(())
    }

    #[test]
    fn restarted_session_reacquires_a_source() -> Result<()> {
        let script: SimulationScript = serde_json::from_str(
            r#"{
                "frames": [
                    { "camera": { "viewport": [800, 600] } },
                    { "hits": [{ "position": [0, 0, -2] }] },
                    { "events": [{ "type": "end_session" }] },
                    { "events": [{ "type": "begin_session", "session": 2 }] },
                    { "hits": [{ "position": [0, 0, -2] }] }
                ]
            }"#,
        )?;
        let mut controller =
            ArController::new(ScriptedBackend::new(true), ControllerConfig::default())?;
        controller.begin_session(SessionId(script.session))?;

        let events = play(script.frames, &mut controller)?;
        assert!(events.contains(&ControllerEvent::SessionReset {
            session: SessionId(1)
        }));
        assert!(events.contains(&ControllerEvent::HitTestRequested {
            session: SessionId(2)
        }));
        assert_eq!(controller.session(), Some(SessionId(2)));
        assert!(controller.reticle().is_visible());
        assert_eq!(controller.backend().live_sources(), 1);
        Ok(())
    }

    #[test]
    fn scripted_sources_complete_on_next_frame() {
        let mut backend = ScriptedBackend::new(true);
        backend
            .request_hit_test_source(SessionId(4))
            .expect("supported");
        let events = backend.take_completions();
        assert_eq!(
            events,
            vec![InputEvent::HitTestSourceReady {
                session: SessionId(4),
                source: HitTestSourceId(1),
            }]
        );
        assert!(backend.take_completions().is_empty());

        backend.release_hit_test_source(HitTestSourceId(1));
        assert_eq!(backend.live_sources(), 0);
    }
}
