use perch_base::{AssetId, SessionError, SessionId};
use perch_geometry::{Camera, Ray, Vec2};

use crate::backend::HitTestSourceId;
use crate::hit_test::HitPose;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PointerId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SelectSource {
    Screen(Vec2),
    Ray(Ray),
}

#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    HitTestSourceReady {
        session: SessionId,
        source: HitTestSourceId,
    },
    HitTestSourceFailed {
        session: SessionId,
        error: SessionError,
    },
    SessionEnded {
        session: SessionId,
    },
    Select(SelectSource),
    PointerDown {
        pointer: PointerId,
        position: Vec2,
    },
    PointerMove {
        pointer: PointerId,
        position: Vec2,
    },
    PointerUp {
        pointer: PointerId,
    },
    PointerCancel {
        pointer: PointerId,
    },
}

#[derive(Clone, Debug)]
pub struct Frame {
    pub elapsed: f64,
    pub camera: Camera,
    pub events: Vec<InputEvent>,
}

impl Frame {
    pub fn new(elapsed: f64, camera: Camera) -> Self {
        Self {
            elapsed,
            camera,
            events: Vec::new(),
        }
    }

    pub fn with_event(mut self, event: InputEvent) -> Self {
        self.events.push(event);
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ControllerEvent {
    AssetLoaded { asset: AssetId },
    AssetCleared,
    HitTestRequested { session: SessionId },
    Placed { asset: AssetId, pose: HitPose },
    Selected { mesh_index: usize, name: String },
    ClipStarted { index: usize, name: String },
    AudioStarted { index: usize },
    SessionReset { session: SessionId },
}
